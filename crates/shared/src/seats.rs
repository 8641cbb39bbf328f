//! Seat geometry for a single sector.
//!
//! Two sources exist: structured rows from the venue API with explicit
//! coordinates, and a scan of raw SVG markup for seat circles. Both sit behind
//! [`SeatSource`]; [`seats_for_sector`] picks one based on what the sector
//! carries and never fails.

use crate::asset::parse_svg;
use crate::models::Sector;

pub const DEFAULT_SEAT_RADIUS: f64 = 4.0;
pub const DEFAULT_SEAT_FILL: &str = "#00c820";

/// A seat ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatMarker {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub available: bool,
    pub row_code: Option<String>,
    pub seat_number: Option<String>,
}

impl SeatMarker {
    /// Accessible label, e.g. "Row 3, seat 12" or the raw id.
    pub fn label(&self) -> String {
        match (&self.row_code, &self.seat_number) {
            (Some(row), Some(num)) => format!("Row {row}, seat {num}"),
            (None, Some(num)) => format!("Seat {num}"),
            _ => format!("Seat {}", self.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatWarning {
    /// Neither structured rows nor markup are available.
    MissingGeometry,
    /// Markup was supplied but could not be parsed.
    UnreadableMarkup,
}

impl SeatWarning {
    pub fn message(&self) -> &'static str {
        match self {
            SeatWarning::MissingGeometry => {
                "No seat geometry is available for this sector. Seats cannot be selected."
            }
            SeatWarning::UnreadableMarkup => {
                "The venue markup could not be read. Seats cannot be selected."
            }
        }
    }
}

/// Seats for one sector plus an optional warning to show alongside them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeatLayout {
    pub seats: Vec<SeatMarker>,
    pub warning: Option<SeatWarning>,
}

impl SeatLayout {
    fn warn(warning: SeatWarning) -> Self {
        SeatLayout {
            seats: Vec::new(),
            warning: Some(warning),
        }
    }

    pub fn find(&self, id: &str) -> Option<&SeatMarker> {
        self.seats.iter().find(|s| s.id == id)
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| s.available).count()
    }
}

/// A strategy producing seat markers for a sector.
pub trait SeatSource {
    fn seats(&self, sector: &Sector) -> SeatLayout;
}

/// Seats taken from the sector's structured row data.
pub struct StructuredSeats;

impl SeatSource for StructuredSeats {
    fn seats(&self, sector: &Sector) -> SeatLayout {
        let seats = sector
            .sector_rows
            .iter()
            .flat_map(|row| row.row_seats.iter().map(move |seat| (row, seat)))
            .filter_map(|(row, seat)| {
                let coords = seat.svg_coordinates?;
                Some(SeatMarker {
                    id: seat.id.clone(),
                    cx: coords.cx,
                    cy: coords.cy,
                    r: coords.r.filter(|r| *r > 0.0).unwrap_or(DEFAULT_SEAT_RADIUS),
                    fill: DEFAULT_SEAT_FILL.to_string(),
                    available: seat.is_available,
                    row_code: (!row.row_code.is_empty()).then(|| row.row_code.clone()),
                    seat_number: seat.number_label(),
                })
            })
            .collect();
        SeatLayout {
            seats,
            warning: None,
        }
    }
}

/// Seats found by scanning SVG markup for circles and ellipses named after
/// the sector.
pub struct MarkupSeats<'a> {
    pub markup: &'a str,
}

impl SeatSource for MarkupSeats<'_> {
    fn seats(&self, sector: &Sector) -> SeatLayout {
        match extract_markup_seats(&sector.id, self.markup) {
            Ok(seats) => SeatLayout {
                seats,
                warning: None,
            },
            Err(_) => SeatLayout::warn(SeatWarning::UnreadableMarkup),
        }
    }
}

/// Sector id with a trailing `-G` (group suffix, any case) removed.
pub fn base_sector_id(id: &str) -> &str {
    let bytes = id.as_bytes();
    if bytes.len() >= 2
        && bytes[bytes.len() - 2] == b'-'
        && bytes[bytes.len() - 1].eq_ignore_ascii_case(&b'g')
    {
        &id[..id.len() - 2]
    } else {
        id
    }
}

/// Truthy numeric attribute: missing, unparsable, zero or NaN count as absent.
fn positive_attr(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<f64> {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| *v != 0.0 && !v.is_nan())
}

fn numeric_attr(node: &roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Every `circle`/`ellipse` whose id starts with `<sector>-S-` (matched case
/// insensitively against both the full and the base sector id).
///
/// The dash after `S` is required: `R-VIP-S1` or `R-VIP-STAGE` are not seats.
pub fn extract_markup_seats(
    sector_id: &str,
    markup: &str,
) -> Result<Vec<SeatMarker>, roxmltree::Error> {
    if sector_id.is_empty() {
        return Ok(Vec::new());
    }
    let doc = parse_svg(markup)?;
    let prefixes = [
        format!("{}-s-", base_sector_id(sector_id).to_ascii_lowercase()),
        format!("{}-s-", sector_id.to_ascii_lowercase()),
    ];

    let seats = doc
        .descendants()
        .filter(|n| n.is_element() && matches!(n.tag_name().name(), "circle" | "ellipse"))
        .filter_map(|n| {
            let id = n.attribute("id")?;
            let lower = id.to_ascii_lowercase();
            if !prefixes.iter().any(|p| lower.starts_with(p.as_str())) {
                return None;
            }
            Some(SeatMarker {
                id: id.to_string(),
                cx: numeric_attr(&n, "cx"),
                cy: numeric_attr(&n, "cy"),
                r: positive_attr(&n, "r")
                    .or_else(|| positive_attr(&n, "rx"))
                    .unwrap_or(DEFAULT_SEAT_RADIUS),
                fill: n
                    .attribute("fill")
                    .filter(|f| !f.is_empty())
                    .unwrap_or(DEFAULT_SEAT_FILL)
                    .to_string(),
                available: true,
                row_code: None,
                seat_number: id.rsplit('-').next().map(str::to_string),
            })
        })
        .collect();
    Ok(seats)
}

fn has_structured_geometry(sector: &Sector) -> bool {
    sector
        .sector_rows
        .iter()
        .flat_map(|r| r.row_seats.iter())
        .any(|s| s.svg_coordinates.is_some())
}

/// Pick the seat source for `sector`: structured rows with coordinates win,
/// then markup attached to the sector, then `fallback_markup` from the caller.
pub fn select_source<'a>(
    sector: &'a Sector,
    fallback_markup: Option<&'a str>,
) -> Option<Box<dyn SeatSource + 'a>> {
    if has_structured_geometry(sector) {
        return Some(Box::new(StructuredSeats));
    }
    sector
        .svg_markup
        .as_deref()
        .or(fallback_markup)
        .map(|markup| Box::new(MarkupSeats { markup }) as Box<dyn SeatSource + 'a>)
}

/// Seat markers for `sector`. Without any geometry source the layout is empty
/// and carries [`SeatWarning::MissingGeometry`].
pub fn seats_for_sector(sector: &Sector, fallback_markup: Option<&str>) -> SeatLayout {
    match select_source(sector, fallback_markup) {
        Some(source) => source.seats(sector),
        None => SeatLayout::warn(SeatWarning::MissingGeometry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Seat, SectorRow, SvgCoordinates};

    fn sector(id: &str) -> Sector {
        Sector {
            id: id.to_string(),
            svg_path_data: "M0 0 L10 10".to_string(),
            ..Default::default()
        }
    }

    fn seat(id: &str, available: bool, coords: Option<(f64, f64)>) -> Seat {
        Seat {
            id: id.to_string(),
            seat_number: Some(serde_json::json!(id.trim_start_matches("seat-"))),
            is_available: available,
            svg_coordinates: coords.map(|(cx, cy)| SvgCoordinates { cx, cy, r: None }),
        }
    }

    #[test]
    fn test_base_sector_id() {
        assert_eq!(base_sector_id("R-VIP-G"), "R-VIP");
        assert_eq!(base_sector_id("R-VIP-g"), "R-VIP");
        assert_eq!(base_sector_id("R-VIP"), "R-VIP");
        assert_eq!(base_sector_id("G"), "G");
        assert_eq!(base_sector_id("-G"), "");
    }

    #[test]
    fn test_markup_scan_matches_base_id() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <circle id="R-VIP-S-1" cx="10" cy="20" r="4" fill="#00c820"/>
            <circle id="OTHER-S-1" cx="1" cy="2" r="3"/>
        </svg>"##;
        let seats = extract_markup_seats("R-VIP-G", svg).unwrap();
        assert_eq!(seats.len(), 1);
        let s = &seats[0];
        assert_eq!(s.id, "R-VIP-S-1");
        assert_eq!((s.cx, s.cy, s.r), (10.0, 20.0, 4.0));
        assert_eq!(s.fill, "#00c820");
        assert!(s.available);
    }

    #[test]
    fn test_markup_scan_ellipse_radius_and_defaults() {
        let svg = r#"<svg>
            <ellipse id="r-vip-s-2" cx="5" cy="6" rx="3" ry="5"/>
            <circle id="R-VIP-S-3" cx="7" cy="8"/>
        </svg>"#;
        let seats = extract_markup_seats("R-VIP", svg).unwrap();
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].r, 3.0);
        assert_eq!(seats[0].fill, DEFAULT_SEAT_FILL);
        assert_eq!(seats[1].r, DEFAULT_SEAT_RADIUS);
    }

    #[test]
    fn test_markup_scan_full_id_prefix() {
        // Seats renamed after a path id that keeps its -G suffix.
        let svg = r#"<svg><circle id="A-G-S-1" cx="1" cy="1" r="2"/></svg>"#;
        let seats = extract_markup_seats("A-G", svg).unwrap();
        assert_eq!(seats.len(), 1);
    }

    #[test]
    fn test_markup_scan_requires_seat_token() {
        let svg = r#"<svg><circle id="R-VIPX-S-1" r="1"/><circle id="R-VIP-1" r="1"/></svg>"#;
        assert!(extract_markup_seats("R-VIP-G", svg).unwrap().is_empty());
    }

    #[test]
    fn test_markup_scan_bad_xml_errors() {
        assert!(extract_markup_seats("A", "<svg><circle").is_err());
    }

    #[test]
    fn test_structured_source_uses_row_data() {
        let mut s = sector("s1");
        s.sector_rows = vec![SectorRow {
            row_code: "B".to_string(),
            row_seats: vec![
                seat("seat-1", true, Some((1.0, 2.0))),
                seat("seat-2", false, Some((3.0, 4.0))),
                seat("seat-3", true, None),
            ],
        }];
        let layout = seats_for_sector(&s, None);
        assert!(layout.warning.is_none());
        assert_eq!(layout.seats.len(), 2);
        assert_eq!(layout.seats[0].label(), "Row B, seat 1");
        assert_eq!(layout.seats[0].r, DEFAULT_SEAT_RADIUS);
        assert!(!layout.seats[1].available);
        assert_eq!(layout.available_count(), 1);
    }

    #[test]
    fn test_structured_wins_over_markup() {
        let mut s = sector("s1");
        s.sector_rows = vec![SectorRow {
            row_code: "A".to_string(),
            row_seats: vec![seat("seat-1", true, Some((1.0, 2.0)))],
        }];
        let markup = r#"<svg><circle id="s1-S-9" r="1"/></svg>"#;
        let layout = seats_for_sector(&s, Some(markup));
        assert_eq!(layout.seats.len(), 1);
        assert_eq!(layout.seats[0].id, "seat-1");
    }

    #[test]
    fn test_rows_without_coordinates_fall_through_to_markup() {
        let mut s = sector("s1");
        s.sector_rows = vec![SectorRow {
            row_code: "A".to_string(),
            row_seats: vec![seat("seat-1", true, None)],
        }];
        let markup = r#"<svg><circle id="s1-S-9" cx="1" cy="1" r="1"/></svg>"#;
        let layout = seats_for_sector(&s, Some(markup));
        assert_eq!(layout.seats.len(), 1);
        assert_eq!(layout.seats[0].id, "s1-S-9");
    }

    #[test]
    fn test_attached_markup_wins_over_fallback() {
        let mut s = sector("s1");
        s.svg_markup = Some(r#"<svg><circle id="s1-S-1" r="1"/></svg>"#.into());
        let fallback = r#"<svg><circle id="s1-S-1" r="1"/><circle id="s1-S-2" r="1"/></svg>"#;
        assert_eq!(seats_for_sector(&s, Some(fallback)).seats.len(), 1);
    }

    #[test]
    fn test_missing_geometry_warns_without_failing() {
        let layout = seats_for_sector(&sector("s1"), None);
        assert!(layout.seats.is_empty());
        assert_eq!(layout.warning, Some(SeatWarning::MissingGeometry));
    }

    #[test]
    fn test_unreadable_markup_warns() {
        let layout = seats_for_sector(&sector("s1"), Some("<svg"));
        assert!(layout.seats.is_empty());
        assert_eq!(layout.warning, Some(SeatWarning::UnreadableMarkup));
    }

    #[test]
    fn test_markup_scan_requires_dash_after_seat_token() {
        let markup = r#"<svg>
            <circle id="R-VIP-S-1" cx="1" cy="1" r="2"/>
            <circle id="R-VIP-S1" cx="2" cy="2" r="2"/>
            <circle id="R-VIP-STAGE" cx="3" cy="3" r="2"/>
        </svg>"#;
        let seats = extract_markup_seats("R-VIP-G", markup).unwrap();
        let ids: Vec<&str> = seats.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["R-VIP-S-1"]);
    }
}
