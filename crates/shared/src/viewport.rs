//! Clamped pan/zoom state shared by the venue map and the sector detail view.
//!
//! Pan is stored in content units (before scaling) and zoom scales around the
//! frame center, so the group transform is always
//! `translate(center * (1 - zoom) + pan * zoom) scale(zoom)`.

use crate::geometry::{Position, Rect};

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

pub const MAP_ZOOM: ZoomLimits = ZoomLimits { min: 0.3, max: 4.0 };
pub const MODAL_ZOOM: ZoomLimits = ZoomLimits { min: 0.4, max: 4.0 };

/// Zoom increment for one wheel notch.
pub const WHEEL_STEP: f64 = 0.1;
/// Zoom increment for the +/- buttons.
pub const BUTTON_STEP: f64 = 0.2;

const DEFAULT_ZOOM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    frame: Rect,
    limits: ZoomLimits,
    zoom: f64,
    pan: Position,
}

impl Viewport {
    pub fn new(frame: Rect, limits: ZoomLimits) -> Self {
        Viewport {
            frame,
            limits,
            zoom: DEFAULT_ZOOM,
            pan: Position::ORIGIN,
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// This viewport if it already covers `frame`, otherwise a default one
    /// for the new frame. Content changes never inherit stale pan/zoom.
    pub fn for_frame(self, frame: Rect) -> Self {
        if self.frame == frame {
            self
        } else {
            Viewport::new(frame, self.limits)
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Position {
        self.pan
    }

    pub fn is_default(&self) -> bool {
        self.zoom == DEFAULT_ZOOM && self.pan == Position::ORIGIN
    }

    pub fn reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.pan = Position::ORIGIN;
    }

    /// Half-width and half-height of the allowed pan range at `zoom`.
    ///
    /// The frame center may travel at most half of the visible window away
    /// from the middle of the view, so part of the content always stays
    /// visible. The visible window grows as zoom shrinks, so zooming out never
    /// narrows the range.
    pub fn pan_limits_at(&self, zoom: f64) -> Position {
        Position::new(
            self.frame.width / zoom / 2.0,
            self.frame.height / zoom / 2.0,
        )
    }

    pub fn pan_limits(&self) -> Position {
        self.pan_limits_at(self.zoom)
    }

    pub fn clamp_pan(&self, pan: Position) -> Position {
        let lim = self.pan_limits();
        Position::new(pan.x.clamp(-lim.x, lim.x), pan.y.clamp(-lim.y, lim.y))
    }

    pub fn set_pan(&mut self, pan: Position) {
        self.pan = self.clamp_pan(pan);
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        // Two decimals keep repeated +/- steps from drifting.
        let rounded = (zoom * 100.0).round() / 100.0;
        rounded.clamp(self.limits.min, self.limits.max)
    }

    /// Set the zoom factor (clamped) and re-clamp pan. Returns whether the
    /// zoom actually changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let new_zoom = self.clamp_zoom(zoom);
        let changed = (new_zoom - self.zoom).abs() > 1e-9;
        self.zoom = new_zoom;
        self.pan = self.clamp_pan(self.pan);
        changed
    }

    pub fn zoom_in(&mut self, step: f64) -> bool {
        self.set_zoom(self.zoom + step)
    }

    pub fn zoom_out(&mut self, step: f64) -> bool {
        self.set_zoom(self.zoom - step)
    }

    /// Change zoom while keeping the content under `anchor` (a point in
    /// frame/viewBox units) fixed on screen, as far as the pan clamp allows.
    pub fn zoom_at(&mut self, zoom: f64, anchor: Position) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = self.clamp_zoom(zoom);
        if (new_zoom - old_zoom).abs() < 1e-9 {
            return false;
        }
        let c = self.frame.center();
        let pan = Position::new(
            (anchor.x - c.x) / new_zoom - (anchor.x - c.x) / old_zoom + self.pan.x,
            (anchor.y - c.y) / new_zoom - (anchor.y - c.y) / old_zoom + self.pan.y,
        );
        self.zoom = new_zoom;
        self.pan = self.clamp_pan(pan);
        true
    }

    /// Map a content point to its rendered position in frame units.
    pub fn to_screen(&self, p: Position) -> Position {
        let c = self.frame.center();
        Position::new(
            c.x + self.zoom * (p.x + self.pan.x - c.x),
            c.y + self.zoom * (p.y + self.pan.y - c.y),
        )
    }

    /// SVG `transform` for the group holding the content.
    pub fn transform(&self) -> String {
        let c = self.frame.center();
        let tx = c.x * (1.0 - self.zoom) + self.pan.x * self.zoom;
        let ty = c.y * (1.0 - self.zoom) + self.pan.y * self.zoom;
        format!("translate({tx} {ty}) scale({})", self.zoom)
    }
}

/// Frame units per rendered CSS pixel for an SVG drawn with
/// `preserveAspectRatio="xMidYMid meet"` into a `container_w`×`container_h`
/// box.
pub fn units_per_pixel(frame: Rect, container_w: f64, container_h: f64) -> Option<f64> {
    if container_w <= 0.0 || container_h <= 0.0 {
        return None;
    }
    Some((frame.width / container_w).max(frame.height / container_h))
}

/// An in-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    origin: Position,
    start_pan: Position,
    moved: bool,
}

impl Drag {
    pub fn begin(client: Position, viewport: &Viewport) -> Self {
        Drag {
            origin: client,
            start_pan: viewport.pan(),
            moved: false,
        }
    }

    /// Whether the pointer ever left the click threshold.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Update the drag with a new client position. Movement inside
    /// `threshold` pixels is ignored until the threshold is first exceeded,
    /// so a press-release without travel stays a click.
    pub fn update(
        &mut self,
        client: Position,
        threshold: f64,
        units_per_px: f64,
        viewport: &mut Viewport,
    ) {
        let dx = client.x - self.origin.x;
        let dy = client.y - self.origin.y;
        if !self.moved && (dx.abs() > threshold || dy.abs() > threshold) {
            self.moved = true;
        }
        if self.moved {
            let z = viewport.zoom();
            viewport.set_pan(Position::new(
                self.start_pan.x + dx * units_per_px / z,
                self.start_pan.y + dy * units_per_px / z,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 200.0, 100.0), MODAL_ZOOM)
    }

    fn within_limits(vp: &Viewport) -> bool {
        let lim = vp.pan_limits();
        vp.pan().x.abs() <= lim.x + 1e-9 && vp.pan().y.abs() <= lim.y + 1e-9
    }

    #[test]
    fn test_zoom_in_caps_at_max() {
        let mut vp = viewport();
        for _ in 0..50 {
            vp.zoom_in(BUTTON_STEP);
        }
        assert!((vp.zoom() - MODAL_ZOOM.max).abs() < 1e-9);
        assert!(!vp.zoom_in(WHEEL_STEP), "zoom at max should report no change");
    }

    #[test]
    fn test_zoom_out_caps_at_min() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 10.0, 10.0), MAP_ZOOM);
        for _ in 0..50 {
            vp.zoom_out(WHEEL_STEP);
        }
        assert!((vp.zoom() - MAP_ZOOM.min).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_steps_do_not_drift() {
        let mut vp = viewport();
        for _ in 0..7 {
            vp.zoom_in(WHEEL_STEP);
        }
        for _ in 0..7 {
            vp.zoom_out(WHEEL_STEP);
        }
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn test_pan_clamped_after_arbitrary_drags() {
        let mut vp = viewport();
        vp.set_zoom(2.0);
        let mut drag = Drag::begin(Position::new(0.0, 0.0), &vp);
        for step in [
            (5000.0, 10.0),
            (-9000.0, 4000.0),
            (30.0, -30.0),
            (1e6, -1e6),
        ] {
            drag.update(Position::new(step.0, step.1), 3.0, 1.0, &mut vp);
            assert!(within_limits(&vp), "pan {:?} escaped", vp.pan());
        }
    }

    #[test]
    fn test_reducing_zoom_never_narrows_pan_range() {
        let vp = viewport();
        let mut z = MODAL_ZOOM.max;
        let mut prev = vp.pan_limits_at(z);
        while z > MODAL_ZOOM.min {
            z -= 0.1;
            let lim = vp.pan_limits_at(z);
            assert!(lim.x >= prev.x && lim.y >= prev.y);
            prev = lim;
        }
    }

    #[test]
    fn test_zooming_in_reclamps_pan() {
        let mut vp = viewport();
        vp.set_pan(Position::new(100.0, 50.0));
        assert_eq!(vp.pan(), Position::new(100.0, 50.0));
        vp.set_zoom(4.0);
        assert!(within_limits(&vp));
        assert!((vp.pan().x - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_below_threshold_is_a_click() {
        let mut vp = viewport();
        let mut drag = Drag::begin(Position::new(10.0, 10.0), &vp);
        drag.update(Position::new(12.0, 11.0), 3.0, 1.0, &mut vp);
        assert!(!drag.moved());
        assert_eq!(vp.pan(), Position::ORIGIN);
    }

    #[test]
    fn test_drag_scales_by_units_and_zoom() {
        let mut vp = viewport();
        vp.set_zoom(2.0);
        let mut drag = Drag::begin(Position::new(0.0, 0.0), &vp);
        drag.update(Position::new(20.0, 0.0), 3.0, 0.5, &mut vp);
        assert!(drag.moved());
        // 20px * 0.5 units/px / zoom 2 = 5 units
        assert!((vp.pan().x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_identity_at_default() {
        let vp = viewport();
        assert_eq!(vp.transform(), "translate(0 0) scale(1)");
    }

    #[test]
    fn test_transform_scales_around_center() {
        let mut vp = viewport();
        vp.set_zoom(2.0);
        // Frame center (100, 50) must stay put.
        let c = vp.to_screen(Position::new(100.0, 50.0));
        assert!((c.x - 100.0).abs() < 1e-9 && (c.y - 50.0).abs() < 1e-9);
        assert_eq!(vp.transform(), "translate(-100 -50) scale(2)");
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut vp = viewport();
        let anchor = Position::new(120.0, 60.0);
        // Content under the anchor before zooming.
        let before = vp.to_screen(anchor);
        assert!(vp.zoom_at(1.5, anchor));
        let after = vp.to_screen(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut vp = viewport();
        vp.set_zoom(3.0);
        vp.set_pan(Position::new(5.0, 5.0));
        vp.reset();
        assert!(vp.is_default());
    }

    #[test]
    fn test_for_frame_resets_only_on_new_frame() {
        let mut vp = viewport();
        vp.set_zoom(2.0);
        assert_eq!(vp.for_frame(vp.frame()).zoom(), 2.0);
        let moved = vp.for_frame(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(moved.is_default());
        assert_eq!(moved.frame(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_units_per_pixel_meet() {
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(units_per_pixel(frame, 400.0, 400.0), Some(0.5));
        assert_eq!(units_per_pixel(frame, 100.0, 100.0), Some(2.0));
        assert_eq!(units_per_pixel(frame, 0.0, 100.0), None);
    }
}
