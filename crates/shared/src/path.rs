//! SVG path data parsing and geometric bounds.
//!
//! Paths are parsed into absolute segments so bounds can be computed without a
//! rendering surface. Curve and arc bounds are tight: extrema are solved
//! analytically instead of taking the control-point hull.

use std::f64::consts::{PI, TAU};
use std::sync::OnceLock;

use regex::Regex;

use crate::geometry::{Extent, Position, Rect};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("path data is empty")]
    Empty,
    #[error("expected a path command at offset {offset}")]
    MissingCommand { offset: usize },
    #[error("unknown path command `{command}` at offset {offset}")]
    UnknownCommand { command: char, offset: usize },
    #[error("expected a number at offset {offset}")]
    ExpectedNumber { offset: usize },
    #[error("expected an arc flag (0 or 1) at offset {offset}")]
    ExpectedFlag { offset: usize },
    #[error("path coordinates overflow")]
    NonFinite,
}

/// One drawing command with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Position),
    LineTo(Position),
    CubicTo {
        ctrl1: Position,
        ctrl2: Position,
        to: Position,
    },
    QuadTo {
        ctrl: Position,
        to: Position,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Position,
    },
    Close,
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"-?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("number pattern is valid")
    })
}

/// Every number in `d` paired up as (x, y), ignoring command letters.
///
/// This is the coarse scan used for the combined venue box: it treats every
/// pair of numbers as a point, which is exact for absolute M/L/C/Q paths.
pub fn coordinate_pairs(d: &str) -> Vec<Position> {
    let nums: Vec<f64> = number_regex()
        .find_iter(d)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    nums.chunks_exact(2)
        .map(|pair| Position::new(pair[0], pair[1]))
        .collect()
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(d: &'a str) -> Self {
        Lexer {
            bytes: d.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn number(&mut self) -> Result<f64, PathError> {
        self.skip_separators();
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        let mut digits = 0;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
            digits += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            self.pos = start;
            return Err(PathError::ExpectedNumber { offset: start });
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.pos == exp_start {
                // Not an exponent after all.
                self.pos = mark;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(PathError::ExpectedNumber { offset: start })
    }

    fn flag(&mut self) -> Result<bool, PathError> {
        self.skip_separators();
        let offset = self.pos;
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(PathError::ExpectedFlag { offset }),
        }
    }

    fn point(&mut self) -> Result<Position, PathError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Position::new(x, y))
    }
}

fn offset_by(p: Position, base: Position, relative: bool) -> Position {
    if relative {
        Position::new(base.x + p.x, base.y + p.y)
    } else {
        p
    }
}

fn reflect(ctrl: Position, around: Position) -> Position {
    Position::new(2.0 * around.x - ctrl.x, 2.0 * around.y - ctrl.y)
}

/// Parse SVG path data into absolute segments.
pub fn parse(d: &str) -> Result<Vec<Segment>, PathError> {
    let mut lexer = Lexer::new(d);
    let mut segments = Vec::new();
    let mut current = Position::ORIGIN;
    let mut subpath_start = Position::ORIGIN;
    let mut command: Option<u8> = None;
    // Last cubic / quadratic control point, for S and T reflection.
    let mut last_cubic: Option<Position> = None;
    let mut last_quad: Option<Position> = None;

    loop {
        lexer.skip_separators();
        if lexer.at_end() {
            break;
        }
        let offset = lexer.pos;
        let next = lexer.peek().unwrap_or(b' ');
        if next.is_ascii_alphabetic() && next != b'e' && next != b'E' {
            lexer.pos += 1;
            command = Some(next);
        } else if command.is_none() {
            return Err(PathError::MissingCommand { offset });
        }
        let Some(cmd) = command else {
            return Err(PathError::MissingCommand { offset });
        };

        let relative = cmd.is_ascii_lowercase();
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::MoveTo(p));
                current = p;
                subpath_start = p;
                // Extra coordinate pairs after a moveto are implicit linetos.
                command = Some(if relative { b'l' } else { b'L' });
            }
            b'L' => {
                let p = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::LineTo(p));
                current = p;
            }
            b'H' => {
                let x = lexer.number()?;
                let p = Position::new(if relative { current.x + x } else { x }, current.y);
                segments.push(Segment::LineTo(p));
                current = p;
            }
            b'V' => {
                let y = lexer.number()?;
                let p = Position::new(current.x, if relative { current.y + y } else { y });
                segments.push(Segment::LineTo(p));
                current = p;
            }
            b'C' => {
                let ctrl1 = offset_by(lexer.point()?, current, relative);
                let ctrl2 = offset_by(lexer.point()?, current, relative);
                let to = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
                cubic_ctrl = Some(ctrl2);
                current = to;
            }
            b'S' => {
                let ctrl1 = last_cubic.map_or(current, |c| reflect(c, current));
                let ctrl2 = offset_by(lexer.point()?, current, relative);
                let to = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
                cubic_ctrl = Some(ctrl2);
                current = to;
            }
            b'Q' => {
                let ctrl = offset_by(lexer.point()?, current, relative);
                let to = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::QuadTo { ctrl, to });
                quad_ctrl = Some(ctrl);
                current = to;
            }
            b'T' => {
                let ctrl = last_quad.map_or(current, |c| reflect(c, current));
                let to = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::QuadTo { ctrl, to });
                quad_ctrl = Some(ctrl);
                current = to;
            }
            b'A' => {
                let rx = lexer.number()?;
                let ry = lexer.number()?;
                let x_axis_rotation = lexer.number()?;
                let large_arc = lexer.flag()?;
                let sweep = lexer.flag()?;
                let to = offset_by(lexer.point()?, current, relative);
                segments.push(Segment::ArcTo {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    to,
                });
                current = to;
            }
            b'Z' => {
                segments.push(Segment::Close);
                current = subpath_start;
                command = None;
            }
            other => {
                return Err(PathError::UnknownCommand {
                    command: other as char,
                    offset,
                });
            }
        }
        last_cubic = cubic_ctrl;
        last_quad = quad_ctrl;
    }

    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Parameters in (0, 1) where a cubic Bezier component has zero derivative.
fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;
    let mut roots = Vec::with_capacity(2);
    if a.abs() < 1e-12 {
        if b.abs() > 1e-12 {
            roots.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            roots.push((-b + sq) / (2.0 * a));
            roots.push((-b - sq) / (2.0 * a));
        }
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

fn cubic_at(p0: Position, p1: Position, p2: Position, p3: Position, t: f64) -> Position {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Position::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

fn quad_extremum(p0: f64, p1: f64, p2: f64) -> Option<f64> {
    let denom = p0 - 2.0 * p1 + p2;
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (p0 - p1) / denom;
    (t > 0.0 && t < 1.0).then_some(t)
}

fn quad_at(p0: Position, p1: Position, p2: Position, t: f64) -> Position {
    let mt = 1.0 - t;
    Position::new(
        mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
    )
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

fn angle_in_sweep(theta: f64, start: f64, delta: f64) -> bool {
    let rel = (theta - start).rem_euclid(TAU);
    if delta >= 0.0 {
        rel <= delta
    } else {
        rel == 0.0 || TAU - rel <= -delta
    }
}

/// Extend `ext` with the extreme points of an elliptical arc, using the
/// endpoint-to-center conversion from the SVG implementation notes.
#[allow(clippy::too_many_arguments)]
fn include_arc(
    ext: &mut Extent,
    from: Position,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Position,
) {
    ext.include(to);
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        return;
    }

    let phi = x_axis_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;
    let theta1 = vector_angle(1.0, 0.0, ux, uy);
    let mut delta = vector_angle(ux, uy, vx, vy);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let point_at = |theta: f64| {
        let (sin_t, cos_t) = theta.sin_cos();
        Position::new(
            cx + rx * cos_phi * cos_t - ry * sin_phi * sin_t,
            cy + rx * sin_phi * cos_t + ry * cos_phi * sin_t,
        )
    };

    let theta_x = (-ry * sin_phi).atan2(rx * cos_phi);
    let theta_y = (ry * cos_phi).atan2(rx * sin_phi);
    for base in [theta_x, theta_y] {
        for theta in [base, base + PI] {
            if angle_in_sweep(theta, theta1, delta) {
                ext.include(point_at(theta));
            }
        }
    }
}

/// Tight bounding box of already parsed segments.
pub fn segments_bounding_box(segments: &[Segment]) -> Option<Rect> {
    let mut ext = Extent::empty();
    let mut current = Position::ORIGIN;
    let mut subpath_start = Position::ORIGIN;

    for seg in segments {
        match *seg {
            Segment::MoveTo(p) => {
                ext.include(p);
                current = p;
                subpath_start = p;
            }
            Segment::LineTo(p) => {
                ext.include(current);
                ext.include(p);
                current = p;
            }
            Segment::CubicTo { ctrl1, ctrl2, to } => {
                ext.include(current);
                ext.include(to);
                let ts_x = cubic_extrema(current.x, ctrl1.x, ctrl2.x, to.x);
                let ts_y = cubic_extrema(current.y, ctrl1.y, ctrl2.y, to.y);
                for t in ts_x.into_iter().chain(ts_y) {
                    ext.include(cubic_at(current, ctrl1, ctrl2, to, t));
                }
                current = to;
            }
            Segment::QuadTo { ctrl, to } => {
                ext.include(current);
                ext.include(to);
                let ts = [
                    quad_extremum(current.x, ctrl.x, to.x),
                    quad_extremum(current.y, ctrl.y, to.y),
                ];
                for t in ts.into_iter().flatten() {
                    ext.include(quad_at(current, ctrl, to, t));
                }
                current = to;
            }
            Segment::ArcTo {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                to,
            } => {
                ext.include(current);
                include_arc(
                    &mut ext,
                    current,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    to,
                );
                current = to;
            }
            Segment::Close => {
                current = subpath_start;
            }
        }
    }
    ext.to_rect()
}

/// Tight geometric bounding box of SVG path data.
pub fn bounding_box(d: &str) -> Result<Rect, PathError> {
    let segments = parse(d)?;
    segments_bounding_box(&segments).ok_or(if segments.is_empty() {
        PathError::Empty
    } else {
        PathError::NonFinite
    })
}
