use serde::{Deserialize, Serialize};

/// A venue as returned by the venue endpoint: a flat list of sectors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

impl Venue {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn find_sector(&self, id: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub svg_path_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sector_rows: Vec<SectorRow>,
    /// Raw SVG text the sector was loaded from. Never part of the API payload.
    #[serde(skip)]
    pub svg_markup: Option<std::sync::Arc<str>>,
}

impl Sector {
    /// Human-readable label: the sector code when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.sector_code.as_deref().unwrap_or(&self.id)
    }

    pub fn seat_count(&self) -> usize {
        self.sector_rows.iter().map(|r| r.row_seats.len()).sum()
    }

    pub fn available_seat_count(&self) -> usize {
        self.sector_rows
            .iter()
            .flat_map(|r| r.row_seats.iter())
            .filter(|s| s.is_available)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRow {
    #[serde(default)]
    pub row_code: String,
    #[serde(default)]
    pub row_seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub seat_number: Option<serde_json::Value>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_coordinates: Option<SvgCoordinates>,
}

fn default_available() -> bool {
    true
}

impl Seat {
    /// Seat number as display text; the API sends either a number or a string.
    pub fn number_label(&self) -> Option<String> {
        match self.seat_number.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvgCoordinates {
    pub cx: f64,
    pub cy: f64,
    #[serde(default)]
    pub r: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_deserializes_rich_payload() {
        let json = r#"{"sectors":[{"_id":"s1","svgPathData":"M0 0 L10 10","sectorCode":"A","sectorRows":[{"rowCode":"1","rowSeats":[{"_id":"seat-1","seatNumber":1,"isAvailable":true,"svgCoordinates":{"cx":1.5,"cy":2.5,"r":3}},{"_id":"seat-2","seatNumber":"2","isAvailable":false}]}]}]}"#;
        let venue: Venue = serde_json::from_str(json).unwrap();
        assert_eq!(venue.sectors.len(), 1);
        let sector = &venue.sectors[0];
        assert_eq!(sector.id, "s1");
        assert_eq!(sector.label(), "A");
        assert_eq!(sector.seat_count(), 2);
        assert_eq!(sector.available_seat_count(), 1);
        let seat = &sector.sector_rows[0].row_seats[0];
        assert_eq!(seat.number_label().as_deref(), Some("1"));
        assert_eq!(seat.svg_coordinates.unwrap().r, Some(3.0));
        assert_eq!(
            sector.sector_rows[0].row_seats[1].number_label().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_venue_deserializes_minimal_payload() {
        let json = r#"{"sectors":[{"_id":"s1","svgPathData":"M0 0"}]}"#;
        let venue: Venue = serde_json::from_str(json).unwrap();
        let sector = &venue.sectors[0];
        assert!(sector.sector_code.is_none());
        assert!(sector.sector_rows.is_empty());
        assert_eq!(sector.label(), "s1");
    }

    #[test]
    fn test_venue_missing_sectors_is_empty() {
        let venue: Venue = serde_json::from_str("{}").unwrap();
        assert!(venue.is_empty());
    }

    #[test]
    fn test_markup_is_not_serialized() {
        let sector = Sector {
            id: "s1".to_string(),
            svg_path_data: "M0 0".to_string(),
            svg_markup: Some("<svg/>".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&sector).unwrap();
        assert!(json.get("svgMarkup").is_none());
        assert_eq!(json["_id"], "s1");
        assert!(json.get("sectorRows").is_none());
    }

    #[test]
    fn test_find_sector() {
        let venue = Venue {
            sectors: vec![Sector {
                id: "a".to_string(),
                ..Default::default()
            }],
        };
        assert!(venue.find_sector("a").is_some());
        assert!(venue.find_sector("b").is_none());
    }
}
