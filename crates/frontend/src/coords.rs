use seatmap_shared::geometry::{Position, Rect};
use seatmap_shared::viewport;

/// Bounding client rect of the element with `id`.
pub fn container_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Pure function: convert a client position into `frame` units for an SVG
/// rendered with `preserveAspectRatio="xMidYMid meet"` into the given
/// container box. The letterbox margins are removed before scaling.
#[allow(clippy::too_many_arguments)]
pub fn client_to_frame(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
    rect_w: f64,
    rect_h: f64,
    frame: Rect,
) -> Option<Position> {
    let upp = viewport::units_per_pixel(frame, rect_w, rect_h)?;
    let offset_x = (rect_w - frame.width / upp) / 2.0;
    let offset_y = (rect_h - frame.height / upp) / 2.0;
    Some(Position::new(
        frame.x + (client_x - rect_left - offset_x) * upp,
        frame.y + (client_y - rect_top - offset_y) * upp,
    ))
}

/// Client position to frame units using the live container size.
pub fn client_point_in_frame(
    id: &str,
    client_x: f64,
    client_y: f64,
    frame: Rect,
) -> Option<Position> {
    let rect = container_rect(id)?;
    client_to_frame(
        client_x,
        client_y,
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        frame,
    )
}

/// Frame units per CSS pixel of the container. Falls back to 1 when the
/// container is not laid out yet.
pub fn units_per_px(id: &str, frame: Rect) -> f64 {
    container_rect(id)
        .and_then(|r| viewport::units_per_pixel(frame, r.width(), r.height()))
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_frame_center() {
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);
        let p = client_to_frame(210.0, 220.0, 10.0, 20.0, 400.0, 400.0, frame).unwrap();
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_frame_removes_letterbox() {
        // 200x100 frame in a 400x400 box renders 400x200 with 100px bands
        // above and below.
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);
        let top_left = client_to_frame(0.0, 100.0, 0.0, 0.0, 400.0, 400.0, frame).unwrap();
        assert!(top_left.x.abs() < 1e-9 && top_left.y.abs() < 1e-9);
    }

    #[test]
    fn test_client_to_frame_offset_origin() {
        let frame = Rect::new(-40.0, -40.0, 100.0, 100.0);
        let p = client_to_frame(0.0, 0.0, 0.0, 0.0, 200.0, 200.0, frame).unwrap();
        assert!((p.x + 40.0).abs() < 1e-9 && (p.y + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_frame_invalid_container() {
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(client_to_frame(1.0, 1.0, 0.0, 0.0, 0.0, 10.0, frame).is_none());
    }
}
