use seatmap_shared::asset::load_svg_venue;
use seatmap_shared::models::Venue;
use std::path::Path;

pub const VENUE_JSON: &str = "venue.json";
pub const VENUE_SVG: &str = "venue.svg";

/// The venue document served by `/api/venue`, loaded once at startup.
pub struct VenueAssets {
    pub venue: Venue,
}

impl VenueAssets {
    /// Load `venue.json` from `assets_dir`. Without it, the sectors of
    /// `venue.svg` are served instead.
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let json_path = assets_dir.join(VENUE_JSON);
        let svg_path = assets_dir.join(VENUE_SVG);

        let venue = if json_path.exists() {
            let data = std::fs::read_to_string(&json_path)
                .map_err(|e| format!("Failed to read {}: {}", json_path.display(), e))?;
            serde_json::from_str::<Venue>(&data)
                .map_err(|e| format!("Failed to parse {}: {}", VENUE_JSON, e))?
        } else if svg_path.exists() {
            let data = std::fs::read_to_string(&svg_path)
                .map_err(|e| format!("Failed to read {}: {}", svg_path.display(), e))?;
            load_svg_venue(&data)
                .map_err(|e| format!("Failed to load {}: {}", VENUE_SVG, e))?
                .venue
        } else {
            return Err(format!(
                "No {} or {} in {}",
                VENUE_JSON,
                VENUE_SVG,
                assets_dir.display()
            ));
        };

        let seats: usize = venue.sectors.iter().map(|s| s.seat_count()).sum();
        tracing::info!(sectors = venue.sectors.len(), seats, "Loaded venue");

        Ok(VenueAssets { venue })
    }

    /// Like [`VenueAssets::load`], but a missing or broken document yields the
    /// empty venue after logging the cause.
    pub fn load_or_empty(assets_dir: &Path) -> Self {
        Self::load(assets_dir).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Serving empty venue");
            VenueAssets {
                venue: Venue::default(),
            }
        })
    }
}
