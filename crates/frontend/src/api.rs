use seatmap_shared::asset::{load_svg_venue, SvgVenue};
use seatmap_shared::models::Venue;

/// Path of the venue endpoint on the serving origin.
pub const VENUE_PATH: &str = "/api/venue";

/// Path of the static venue drawing served alongside the app.
pub const STATIC_VENUE_SVG: &str = "/static/venue.svg";

/// Venue endpoint baked in at build time, if any.
const CONFIGURED_VENUE_URL: Option<&str> = option_env!("SEATMAP_VENUE_URL");

/// Resolve the venue URL: an explicit build-time URL wins, otherwise the
/// endpoint on `origin`.
pub fn resolve_venue_url(configured: Option<&str>, origin: &str) -> String {
    match configured.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => url.to_string(),
        None => format!("{}{}", origin.trim_end_matches('/'), VENUE_PATH),
    }
}

fn origin() -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;
    window
        .location()
        .origin()
        .map_err(|_| "no location origin".to_string())
}

fn venue_url() -> Result<String, String> {
    match CONFIGURED_VENUE_URL {
        Some(url) if !url.trim().is_empty() => Ok(resolve_venue_url(Some(url), "")),
        _ => Ok(resolve_venue_url(None, &origin()?)),
    }
}

/// Decode a venue payload from the endpoint.
pub fn parse_venue(body: &str) -> Result<Venue, String> {
    serde_json::from_str(body).map_err(|e| format!("invalid venue payload: {e}"))
}

async fn get_text(url: &str) -> Result<String, String> {
    reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?
        .text()
        .await
        .map_err(|e| e.to_string())
}

pub async fn fetch_venue() -> Result<Venue, String> {
    let body = get_text(&venue_url()?).await?;
    parse_venue(&body)
}

/// Load the static drawing. Every sector carries the drawing's markup for
/// the seat scan.
pub async fn fetch_venue_svg() -> Result<SvgVenue, String> {
    let url = format!("{}{}", origin()?, STATIC_VENUE_SVG);
    let text = get_text(&url).await?;
    load_svg_venue(&text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_venue_url_defaults_to_origin() {
        assert_eq!(
            resolve_venue_url(None, "http://localhost:3000"),
            "http://localhost:3000/api/venue"
        );
        assert_eq!(
            resolve_venue_url(None, "https://seats.example.com/"),
            "https://seats.example.com/api/venue"
        );
    }

    #[test]
    fn test_resolve_venue_url_prefers_configured() {
        assert_eq!(
            resolve_venue_url(Some("https://api.example.com/venue/42"), "http://localhost"),
            "https://api.example.com/venue/42"
        );
        assert_eq!(
            resolve_venue_url(Some("  "), "http://localhost"),
            "http://localhost/api/venue"
        );
    }

    #[test]
    fn test_parse_venue_payload() {
        let json = r#"{"sectors":[{"_id":"s1","svgPathData":"M0 0 L10 0 L10 10 Z","sectorCode":"A"}]}"#;
        let venue = parse_venue(json).unwrap();
        assert_eq!(venue.sectors.len(), 1);
        assert_eq!(venue.sectors[0].label(), "A");
        assert!(venue.sectors[0].sector_rows.is_empty());
    }

    #[test]
    fn test_parse_venue_rejects_garbage() {
        assert!(parse_venue("<html>").is_err());
        assert!(parse_venue(r#"{"sectors":[{"svgPathData":"M0 0"}]}"#).is_err());
    }
}
