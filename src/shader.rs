//! # Shader Primitives
//!
//! Small math helpers shared by the animation plugins.

/// Integer hash with good avalanche for seeding noise lattices.
#[inline]
pub fn hash(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x45d9f3b);
    x ^= x >> 16;
    x = x.wrapping_mul(0x45d9f3b);
    x ^= x >> 16;
    x
}

/// Lattice value in [0, 1] for integer coordinates.
#[inline]
fn lattice(x: i32, y: i32, z: i32, seed: u32) -> f32 {
    let n = hash(
        seed.wrapping_add((x as u32).wrapping_mul(374761393))
            .wrapping_add((y as u32).wrapping_mul(668265263))
            .wrapping_add((z as u32).wrapping_mul(2147483647)),
    );
    n as f32 / u32::MAX as f32
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// 3D value noise in [0, 1], smooth in all three axes.
///
/// The third axis is normally time, so a 2D field drifts continuously.
pub fn noise3d(x: f32, y: f32, z: f32, seed: u32) -> f32 {
    let (xi, yi, zi) = (x.floor() as i32, y.floor() as i32, z.floor() as i32);
    let (u, v, w) = (
        smooth(x - x.floor()),
        smooth(y - y.floor()),
        smooth(z - z.floor()),
    );

    let plane = |zz: i32| {
        let a = lerp(lattice(xi, yi, zz, seed), lattice(xi + 1, yi, zz, seed), u);
        let b = lerp(lattice(xi, yi + 1, zz, seed), lattice(xi + 1, yi + 1, zz, seed), u);
        lerp(a, b, v)
    };
    lerp(plane(zi), plane(zi + 1), w)
}

/// Layered noise: octaves at doubling frequency and halving amplitude.
pub fn fbm3d(x: f32, y: f32, z: f32, octaves: usize, seed: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut total = 0.0;
    for i in 0..octaves.max(1) {
        value += amplitude
            * noise3d(
                x * frequency,
                y * frequency,
                z * frequency,
                seed.wrapping_add(i as u32 * 1000),
            );
        total += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    value / total
}

/// Euclidean distance between two points.
#[inline]
pub fn dist(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_range() {
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let n = noise3d(t, t * 1.3, t * 0.2, 7);
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let a = noise3d(3.20, 1.5, 0.4, 1);
        let b = noise3d(3.21, 1.5, 0.4, 1);
        assert!((a - b).abs() < 0.05);
    }

    #[test]
    fn test_noise_hits_lattice_values() {
        assert_eq!(noise3d(2.0, 3.0, 4.0, 9), lattice(2, 3, 4, 9));
    }

    #[test]
    fn test_fbm_range() {
        for i in 0..50 {
            let v = fbm3d(i as f32 * 0.3, 1.0, 2.0, 4, 3);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_dist() {
        assert_eq!(dist(3.0, 4.0, 0.0, 0.0), 5.0);
    }
}
