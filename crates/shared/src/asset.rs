//! Loading a venue from a static SVG document.
//!
//! Sector groups follow the `Sector-<code>` naming convention: each holds one
//! `path` whose id is the sector id, plus seat circles named
//! `<sectorId>-S-<n>`.

use std::sync::Arc;

use crate::geometry::Rect;
use crate::models::{Sector, Venue};

const SECTOR_GROUP_PREFIX: &str = "Sector-";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("invalid SVG document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("SVG document contains no path element")]
    NoPath,
}

/// A venue recovered from an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgVenue {
    pub view_box: Option<Rect>,
    pub venue: Venue,
}

/// Parse SVG text, accepting a DOCTYPE (editor exports usually carry one).
pub fn parse_svg(text: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let mut opts = roxmltree::ParsingOptions::default();
    opts.allow_dtd = true;
    roxmltree::Document::parse_with_options(text, opts)
}

fn has_path(doc: &roxmltree::Document<'_>) -> bool {
    doc.descendants()
        .any(|n| n.is_element() && n.tag_name().name() == "path")
}

/// Check that `text` is well-formed XML with at least one drawable path.
pub fn validate_svg(text: &str) -> Result<(), AssetError> {
    let doc = parse_svg(text)?;
    if has_path(&doc) {
        Ok(())
    } else {
        Err(AssetError::NoPath)
    }
}

pub fn is_valid_svg(text: &str) -> bool {
    validate_svg(text).is_ok()
}

/// Extract the view box and every `Sector-*` group of an SVG document. Each
/// sector carries the full markup so seats can be recovered by markup scan.
pub fn load_svg_venue(text: &str) -> Result<SvgVenue, AssetError> {
    let doc = parse_svg(text)?;
    if !has_path(&doc) {
        return Err(AssetError::NoPath);
    }

    let root = doc.root_element();
    let view_box = root.attribute("viewBox").and_then(Rect::parse_view_box);
    let markup: Arc<str> = Arc::from(text);

    let sectors = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "g")
        .filter_map(|group| {
            let group_id = group.attribute("id")?;
            let code = group_id.strip_prefix(SECTOR_GROUP_PREFIX)?;
            let path = group
                .descendants()
                .find(|n| n.is_element() && n.tag_name().name() == "path")?;
            let id = path.attribute("id").unwrap_or(group_id);
            Some(Sector {
                id: id.to_string(),
                svg_path_data: path.attribute("d").unwrap_or_default().to_string(),
                sector_code: Some(code.to_string()),
                sector_rows: Vec::new(),
                svg_markup: Some(Arc::clone(&markup)),
            })
        })
        .collect();

    Ok(SvgVenue {
        view_box,
        venue: Venue { sectors },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENUE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 400">
  <g id="Sector-VIP">
    <path id="R-VIP-G" d="M10 10 L100 10 L100 60 Z"/>
    <circle id="R-VIP-S-1" cx="20" cy="20" r="4"/>
    <circle id="R-VIP-S-2" cx="30" cy="20" r="4"/>
  </g>
  <g id="Sector-B">
    <path d="M200 200 L300 200 L300 260 Z"/>
  </g>
  <g id="Decoration">
    <path id="stage" d="M0 0 L5 5"/>
  </g>
  <g id="Sector-Empty"/>
</svg>"##;

    #[test]
    fn test_is_valid_svg() {
        assert!(is_valid_svg(VENUE_SVG));
        assert!(!is_valid_svg("<svg><circle r='1'/></svg>"));
        assert!(!is_valid_svg("<svg><path d='M0 0'>"));
        assert!(!is_valid_svg("not xml at all"));
    }

    #[test]
    fn test_validate_svg_classifies_errors() {
        assert!(matches!(
            validate_svg("<svg></svg>"),
            Err(AssetError::NoPath)
        ));
        assert!(matches!(validate_svg("<svg"), Err(AssetError::Xml(_))));
    }

    #[test]
    fn test_load_svg_venue_extracts_sector_groups() {
        let loaded = load_svg_venue(VENUE_SVG).unwrap();
        assert_eq!(loaded.view_box, Some(Rect::new(0.0, 0.0, 500.0, 400.0)));
        let sectors = &loaded.venue.sectors;
        assert_eq!(sectors.len(), 2);

        assert_eq!(sectors[0].id, "R-VIP-G");
        assert_eq!(sectors[0].sector_code.as_deref(), Some("VIP"));
        assert_eq!(sectors[0].svg_path_data, "M10 10 L100 10 L100 60 Z");
        assert!(sectors[0].svg_markup.is_some());

        // A path without an id takes the group id.
        assert_eq!(sectors[1].id, "Sector-B");
        assert_eq!(sectors[1].sector_code.as_deref(), Some("B"));
    }

    #[test]
    fn test_load_svg_venue_rejects_pathless_document() {
        assert!(matches!(
            load_svg_venue(r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="Sector-A"/></svg>"#),
            Err(AssetError::NoPath)
        ));
    }
}
