//! # Panel Splitter
//!
//! The grid is driven by two independently addressed panels. The top panel
//! owns rows `0..rows/2`, the bottom panel owns `rows/2..rows`.
//!
//! ## Bit Order
//!
//! Each panel's bit-sequence is **column-major**: columns `0..cols` outer,
//! and inside each column the panel's rows in [`ROW_ORDER`]. This is how the
//! dots are wired on the controller side, so it is a single constant applied
//! to both panels. Changing it moves every byte boundary the packer produces.
//!
//! ```text
//! ROW_ORDER = BottomUp, 28x14 grid
//!
//! top panel:    col 0: rows 6,5,4,3,2,1,0   col 1: rows 6..0   ...
//! bottom panel: col 0: rows 13,12,...,7     col 1: rows 13..7  ...
//!
//! bit index within a panel = col * 7 + (position of row in that column)
//! ```

use crate::display::DisplayConfig;
use crate::frame::BitFrame;

/// One of the two physical panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Rows `0..rows/2`, addressed as panel 0
    Top,
    /// Rows `rows/2..rows`, addressed as panel 1
    Bottom,
}

impl Panel {
    /// Both panels in the order they are written to the device.
    pub const ALL: [Panel; 2] = [Panel::Top, Panel::Bottom];

    /// Panel identifier byte used in commands.
    pub const fn id(self) -> u8 {
        match self {
            Panel::Top => 0,
            Panel::Bottom => 1,
        }
    }

    pub const fn from_id(id: u8) -> Option<Panel> {
        match id {
            0 => Some(Panel::Top),
            1 => Some(Panel::Bottom),
            _ => None,
        }
    }

    /// First grid row (inclusive) owned by this panel.
    pub const fn first_row(self, config: &DisplayConfig) -> usize {
        match self {
            Panel::Top => 0,
            Panel::Bottom => config.panel_rows(),
        }
    }

    /// Grid row of the `i`-th bit within a column of this panel.
    pub const fn row_at(self, config: &DisplayConfig, i: usize) -> usize {
        let first = self.first_row(config);
        match ROW_ORDER {
            RowOrder::BottomUp => first + config.panel_rows() - 1 - i,
            RowOrder::TopDown => first + i,
        }
    }
}

/// Direction rows are walked within one column of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Highest grid row of the panel first, ending at its lowest row.
    BottomUp,
    /// Lowest grid row of the panel first.
    TopDown,
}

/// Device wiring convention. Both panels use the same direction.
pub const ROW_ORDER: RowOrder = RowOrder::BottomUp;

/// The two panel bit-sequences of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBits {
    pub top: Vec<bool>,
    pub bottom: Vec<bool>,
}

impl PanelBits {
    pub fn get(&self, panel: Panel) -> &[bool] {
        match panel {
            Panel::Top => &self.top,
            Panel::Bottom => &self.bottom,
        }
    }
}

/// Bit index within `panel`'s sequence for grid cell `(x, y)`.
///
/// Returns `None` when the cell belongs to the other panel or lies outside the grid.
pub fn bit_index(config: &DisplayConfig, panel: Panel, x: usize, y: usize) -> Option<usize> {
    let first = panel.first_row(config);
    let height = config.panel_rows();
    if x >= config.cols || y < first || y >= first + height {
        return None;
    }
    let i = match ROW_ORDER {
        RowOrder::BottomUp => first + height - 1 - y,
        RowOrder::TopDown => y - first,
    };
    Some(x * height + i)
}

/// Grid cell `(x, y)` of bit `index` in `panel`'s sequence.
pub fn cell_of(config: &DisplayConfig, panel: Panel, index: usize) -> Option<(usize, usize)> {
    if index >= config.panel_cells() {
        return None;
    }
    let height = config.panel_rows();
    Some((index / height, panel.row_at(config, index % height)))
}

/// Bit-sequence for a single panel.
pub fn panel_bits(frame: &BitFrame, config: &DisplayConfig, panel: Panel) -> Vec<bool> {
    let height = config.panel_rows();
    let mut bits = Vec::with_capacity(config.panel_cells());
    for x in 0..config.cols {
        for i in 0..height {
            bits.push(frame.get(x, panel.row_at(config, i)));
        }
    }
    bits
}

/// Split a validated frame into its top and bottom panel sequences.
pub fn split(frame: &BitFrame, config: &DisplayConfig) -> PanelBits {
    PanelBits {
        top: panel_bits(frame, config, Panel::Top),
        bottom: panel_bits(frame, config, Panel::Bottom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

    fn random_frame() -> BitFrame {
        let mut rng = rand::rng();
        let bits = (0..CONFIG.cells()).map(|_| rng.random_bool(0.5)).collect();
        BitFrame::new(&CONFIG, bits).unwrap()
    }

    #[test]
    fn test_wiring_order_is_bottom_up() {
        assert_eq!(ROW_ORDER, RowOrder::BottomUp);
        // First bit of each panel is its lowest row in column 0
        assert_eq!(cell_of(&CONFIG, Panel::Top, 0), Some((0, 6)));
        assert_eq!(cell_of(&CONFIG, Panel::Bottom, 0), Some((0, 13)));
        // Column ends at the panel's upper edge
        assert_eq!(cell_of(&CONFIG, Panel::Top, 6), Some((0, 0)));
        assert_eq!(cell_of(&CONFIG, Panel::Bottom, 6), Some((0, 7)));
        // Next column starts again at the bottom
        assert_eq!(cell_of(&CONFIG, Panel::Top, 7), Some((1, 6)));
    }

    #[test]
    fn test_panel_ids() {
        assert_eq!(Panel::Top.id(), 0);
        assert_eq!(Panel::Bottom.id(), 1);
        assert_eq!(Panel::from_id(1), Some(Panel::Bottom));
        assert_eq!(Panel::from_id(2), None);
    }

    #[test]
    fn test_split_lengths() {
        for _ in 0..20 {
            let panels = split(&random_frame(), &CONFIG);
            assert_eq!(panels.top.len(), 196);
            assert_eq!(panels.bottom.len(), 196);
        }
    }

    #[test]
    fn test_split_is_a_permutation() {
        for _ in 0..20 {
            let frame = random_frame();
            let panels = split(&frame, &CONFIG);

            let mut seen = HashSet::new();
            for panel in Panel::ALL {
                for (i, &bit) in panels.get(panel).iter().enumerate() {
                    let (x, y) = cell_of(&CONFIG, panel, i).unwrap();
                    assert!(seen.insert((x, y)), "cell ({}, {}) mapped twice", x, y);
                    assert_eq!(bit, frame.get(x, y));
                }
            }
            assert_eq!(seen.len(), CONFIG.cells());
        }
    }

    #[test]
    fn test_bit_index_inverts_cell_of() {
        for panel in Panel::ALL {
            for i in 0..CONFIG.panel_cells() {
                let (x, y) = cell_of(&CONFIG, panel, i).unwrap();
                assert_eq!(bit_index(&CONFIG, panel, x, y), Some(i));
            }
        }
    }

    #[test]
    fn test_bit_index_rejects_other_panel() {
        assert_eq!(bit_index(&CONFIG, Panel::Top, 0, 7), None);
        assert_eq!(bit_index(&CONFIG, Panel::Bottom, 0, 6), None);
        assert_eq!(bit_index(&CONFIG, Panel::Top, 28, 0), None);
    }

    #[test]
    fn test_single_cell_lands_in_top_panel() {
        let mut frame = BitFrame::blank(&CONFIG);
        frame.set(0, 0, true);
        let panels = split(&frame, &CONFIG);
        let on: Vec<usize> = panels
            .top
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(on, vec![6]);
        assert!(panels.bottom.iter().all(|b| !b));
    }
}
