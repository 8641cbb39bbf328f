use serde::{Deserialize, Serialize};

/// A point (or offset) in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Axis-aligned rectangle in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// Format as an SVG `viewBox` attribute value.
    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }

    /// Parse an SVG `viewBox` attribute (whitespace and/or comma separated).
    pub fn parse_view_box(s: &str) -> Option<Rect> {
        let nums: Vec<f64> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match nums.as_slice() {
            [x, y, w, h] if *w >= 0.0 && *h >= 0.0 => Some(Rect::new(*x, *y, *w, *h)),
            _ => None,
        }
    }
}

/// Running min/max accumulator used to build bounding boxes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Extent {
    pub(crate) fn empty() -> Self {
        Extent {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn include(&mut self, p: Position) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// `None` when nothing was included or any edge or size overflows.
    pub(crate) fn to_rect(self) -> Option<Rect> {
        let edges = [self.min_x, self.min_y, self.max_x, self.max_y];
        if !edges.iter().all(|v| v.is_finite()) {
            return None;
        }
        Some(Rect::from_corners(
            self.min_x, self.min_y, self.max_x, self.max_y,
        ))
        .filter(Rect::is_finite)
    }
}
