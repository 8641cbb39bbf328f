use crate::geometry::{Extent, Rect};
use crate::models::Sector;
use crate::path;

/// Margin added around the combined venue box.
pub const VENUE_PADDING: f64 = 50.0;

/// Margin added around a single sector in the detail view.
pub const SECTOR_PADDING: f64 = 40.0;

/// Box used when a venue has no usable coordinates.
pub const EMPTY_VENUE_BOX: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1000.0,
    height: 800.0,
};

/// Box used when a sector path cannot be measured.
pub const FALLBACK_SECTOR_BOX: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 200.0,
    height: 200.0,
};

/// Combined box of every coordinate pair in every sector path, padded by
/// [`VENUE_PADDING`].
pub fn venue_bounds(sectors: &[Sector]) -> Rect {
    let mut ext = Extent::empty();
    for sector in sectors {
        for p in path::coordinate_pairs(&sector.svg_path_data) {
            ext.include(p);
        }
    }
    match ext.to_rect() {
        Some(r) => r.padded(VENUE_PADDING),
        None => EMPTY_VENUE_BOX,
    }
}

/// Map content box: the drawing's own view box when it declares a usable
/// one, otherwise [`venue_bounds`].
pub fn content_bounds(sectors: &[Sector], view_box: Option<Rect>) -> Rect {
    view_box
        .filter(|vb| vb.is_finite() && vb.width > 0.0 && vb.height > 0.0)
        .unwrap_or_else(|| venue_bounds(sectors))
}

/// Coordinate window for the sector detail view: the path's geometric box
/// padded by [`SECTOR_PADDING`]. Unmeasurable paths fall back to
/// [`FALLBACK_SECTOR_BOX`].
pub fn sector_frame(d: &str) -> Rect {
    path::bounding_box(d)
        .unwrap_or(FALLBACK_SECTOR_BOX)
        .padded(SECTOR_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn sector(id: &str, d: &str) -> Sector {
        Sector {
            id: id.to_string(),
            svg_path_data: d.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_venue_bounds_contains_every_pair_with_exact_padding() {
        let sectors = vec![
            sector("a", "M100 200 L300 200 L300 400 Z"),
            sector("b", "M-20 50 C0 0 40 10 250 610"),
        ];
        let r = venue_bounds(&sectors);
        assert!((r.x - (-20.0 - VENUE_PADDING)).abs() < 1e-9);
        assert!((r.y - (0.0 - VENUE_PADDING)).abs() < 1e-9);
        assert!((r.max_x() - (300.0 + VENUE_PADDING)).abs() < 1e-9);
        assert!((r.max_y() - (610.0 + VENUE_PADDING)).abs() < 1e-9);

        for s in &sectors {
            for p in path::coordinate_pairs(&s.svg_path_data) {
                assert!(r.x + VENUE_PADDING <= p.x && p.x <= r.max_x() - VENUE_PADDING);
                assert!(r.y + VENUE_PADDING <= p.y && p.y <= r.max_y() - VENUE_PADDING);
            }
        }
    }

    #[test]
    fn test_venue_bounds_empty_venue_uses_fixed_box() {
        assert_eq!(venue_bounds(&[]), EMPTY_VENUE_BOX);
        assert_eq!(venue_bounds(&[sector("a", "")]), EMPTY_VENUE_BOX);
    }

    #[test]
    fn test_sector_frame_pads_path_box() {
        let r = sector_frame("M10 20 L110 20 L110 70 Z");
        assert_eq!(r, Rect::new(-30.0, -20.0, 180.0, 130.0));
        assert!(r.contains(Position::new(10.0, 20.0)));
    }

    #[test]
    fn test_sector_frame_falls_back_on_malformed_path() {
        let expected = FALLBACK_SECTOR_BOX.padded(SECTOR_PADDING);
        assert_eq!(sector_frame("garbage"), expected);
        assert_eq!(sector_frame(""), expected);
    }

    #[test]
    fn test_overflowing_coordinates_use_fallback_boxes() {
        let d = "M0 0 L10 1e400 Z";
        let frame = sector_frame(d);
        assert_eq!(frame, FALLBACK_SECTOR_BOX.padded(SECTOR_PADDING));
        assert!(frame.is_finite());

        let bounds = venue_bounds(&[sector("a", d)]);
        assert_eq!(bounds, EMPTY_VENUE_BOX);
        assert!(bounds.is_finite());
    }

    #[test]
    fn test_content_bounds_prefers_declared_view_box() {
        let sectors = [sector("a", "M100 100 L300 100 L300 200 Z")];
        let declared = Rect::new(0.0, 0.0, 500.0, 400.0);
        assert_eq!(content_bounds(&sectors, Some(declared)), declared);
    }

    #[test]
    fn test_content_bounds_falls_back_to_path_bounds() {
        let sectors = [sector("a", "M100 100 L300 100 L300 200 Z")];
        let derived = venue_bounds(&sectors);
        assert_eq!(content_bounds(&sectors, None), derived);
        assert_eq!(
            content_bounds(&sectors, Some(Rect::new(0.0, 0.0, 0.0, 400.0))),
            derived
        );
        assert_eq!(
            content_bounds(&sectors, Some(Rect::new(0.0, 0.0, f64::INFINITY, 400.0))),
            derived
        );
    }
}
