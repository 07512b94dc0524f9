//! # Fireworks
//!
//! Rockets rise from the bottom edge and burst into a ring of particles that
//! fall under gravity. Coordinates are in grid cells.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use super::{Control, ControlValue, FrameContext, Plugin};
use crate::render::Canvas;
use crate::render::canvas::{INK, PAPER};

const ROCKET_SCALE: f32 = 0.8;
const PARTICLE_SCALE: f32 = 0.6;

#[derive(Debug, Clone)]
struct Particle {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    ttl: u32,
}

#[derive(Debug, Clone)]
enum Rocket {
    Ascending {
        x: f32,
        y: f32,
        speed: f32,
        burst_at: f32,
    },
    Burst(Vec<Particle>),
}

impl Rocket {
    fn alive(&self) -> bool {
        match self {
            Rocket::Ascending { .. } => true,
            Rocket::Burst(particles) => particles.iter().any(|p| p.ttl > 0),
        }
    }
}

#[derive(Debug)]
pub struct Fireworks {
    launch_chance: f32,
    gravity: f32,
    dot_mult: f32,
    min_particles: u32,
    max_particles: u32,
    rockets: Vec<Rocket>,
    rng: StdRng,
}

impl Default for Fireworks {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Fireworks {
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            launch_chance: 0.03,
            gravity: 0.01,
            dot_mult: 1.0,
            min_particles: 8,
            max_particles: 16,
            rockets: Vec::new(),
            rng,
        }
    }

    pub fn active(&self) -> usize {
        self.rockets.len()
    }

    fn launch(&mut self, cols: usize, rows: usize) {
        let rocket = Rocket::Ascending {
            x: self.rng.random_range(0..cols.max(1)) as f32,
            y: rows as f32,
            speed: self.rng.random_range(0.2..0.4),
            burst_at: self.rng.random_range(4..8) as f32,
        };
        self.rockets.push(rocket);
    }

    fn burst(&mut self, x: f32, y: f32) -> Vec<Particle> {
        let count = if self.max_particles > self.min_particles {
            self.rng.random_range(self.min_particles..self.max_particles)
        } else {
            self.min_particles
        };
        (0..count)
            .map(|i| {
                let angle = TAU / count as f32 * i as f32;
                Particle {
                    x,
                    y,
                    dx: angle.cos() * self.rng.random_range(0.1f32..0.3),
                    dy: angle.sin() * self.rng.random_range(0.1f32..0.3),
                    ttl: self.rng.random_range(10..20),
                }
            })
            .collect()
    }
}

impl Plugin for Fireworks {
    fn name(&self) -> &'static str {
        "fireworks"
    }

    fn render(&mut self, canvas: &mut Canvas, _ctx: &mut FrameContext) {
        canvas.background(PAPER);
        if self.rng.random::<f32>() < self.launch_chance {
            self.launch(canvas.cols(), canvas.rows());
        }

        let dot = canvas.dot_size() as f32;
        let mut rockets = std::mem::take(&mut self.rockets);
        for rocket in &mut rockets {
            let burst_point = match rocket {
                Rocket::Ascending { x, y, speed, burst_at } => {
                    *y -= *speed;
                    canvas.fill_circle(
                        *x * dot + dot / 2.0,
                        *y * dot,
                        dot * ROCKET_SCALE * self.dot_mult,
                        INK,
                    );
                    (*y <= *burst_at).then_some((*x, *y))
                }
                Rocket::Burst(particles) => {
                    for p in particles.iter_mut().filter(|p| p.ttl > 0) {
                        p.x += p.dx;
                        p.y += p.dy;
                        p.dy += self.gravity;
                        p.ttl -= 1;
                        canvas.fill_circle(
                            p.x * dot + dot / 2.0,
                            p.y * dot + dot / 2.0,
                            dot * PARTICLE_SCALE * self.dot_mult,
                            INK,
                        );
                    }
                    None
                }
            };
            if let Some((x, y)) = burst_point {
                *rocket = Rocket::Burst(self.burst(x, y));
            }
        }
        rockets.retain(Rocket::alive);
        self.rockets = rockets;
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::range(
                "launch_chance",
                "Launch Probability",
                0.001,
                0.2,
                0.001,
                self.launch_chance,
            ),
            Control::range("gravity", "Gravity", 0.001, 0.05, 0.001, self.gravity),
            Control::range("dot_mult", "Dot Size Multiplier", 0.2, 2.0, 0.1, self.dot_mult),
            Control::range(
                "min_particles",
                "Min Particles",
                4.0,
                30.0,
                1.0,
                self.min_particles,
            ),
            Control::range(
                "max_particles",
                "Max Particles",
                5.0,
                50.0,
                1.0,
                self.max_particles,
            ),
            Control::button("reset", "Reset Fireworks"),
            Control::display("active", "Active Rockets", self.active() as u32),
        ]
    }

    fn set_control(&mut self, key: &str, value: &ControlValue) -> Result<(), String> {
        match key {
            "reset" => self.rockets.clear(),
            "launch_chance" => self.launch_chance = value.as_f32()?,
            "gravity" => self.gravity = value.as_f32()?,
            "dot_mult" => self.dot_mult = value.as_f32()?,
            "min_particles" => self.min_particles = value.as_f64()?.round() as u32,
            "max_particles" => self.max_particles = value.as_f64()?.round() as u32,
            _ => return Err(format!("Unknown control '{}' for fireworks", key)),
        }
        Ok(())
    }
}
