//! Fill colors for sectors and seats as pure functions of interaction state.

use crate::seats::DEFAULT_SEAT_FILL;

pub const SECTOR_FILL: &str = "#e0e0e0";
pub const SECTOR_FILL_HOVER: &str = "#ffe082";
pub const SECTOR_FILL_ACTIVE: &str = "#ffd54f";

pub const SEAT_FILL_TAKEN: &str = "#9e9e9e";
pub const SEAT_FILL_SELECTED: &str = "#ff9800";
pub const SEAT_STROKE: &str = "#1976d2";
pub const SEAT_STROKE_SELECTED: &str = "#d84315";

/// Active wins over hover.
pub fn sector_fill(is_active: bool, is_hovered: bool) -> &'static str {
    if is_active {
        SECTOR_FILL_ACTIVE
    } else if is_hovered {
        SECTOR_FILL_HOVER
    } else {
        SECTOR_FILL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatStyle<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
    pub stroke_width: f64,
    pub interactive: bool,
}

/// Style for a seat. `marker_fill` is the seat's own fill from markup, used
/// for available seats that are not selected.
pub fn seat_style(available: bool, selected: bool, marker_fill: &str) -> SeatStyle<'_> {
    if !available {
        return SeatStyle {
            fill: SEAT_FILL_TAKEN,
            stroke: SEAT_STROKE,
            stroke_width: 1.0,
            interactive: false,
        };
    }
    if selected {
        SeatStyle {
            fill: SEAT_FILL_SELECTED,
            stroke: SEAT_STROKE_SELECTED,
            stroke_width: 2.0,
            interactive: true,
        }
    } else {
        SeatStyle {
            fill: if marker_fill.is_empty() {
                DEFAULT_SEAT_FILL
            } else {
                marker_fill
            },
            stroke: SEAT_STROKE,
            stroke_width: 1.0,
            interactive: true,
        }
    }
}
