use std::path::{Path, PathBuf};

use seatmap_shared::asset::load_svg_venue;
use seatmap_shared::bounds::venue_bounds;
use seatmap_shared::models::Venue;
use seatmap_shared::path;
use seatmap_shared::seats::seats_for_sector;

const USAGE: &str = concat!(
    "Usage: seatmap-inspect <venue.svg|venue.json> [--export out.json]\n",
    "       seatmap-inspect --url <venue-url> [--export out.json]"
);

/// Flags that take a value, so their values are never mistaken for a path.
const VALUE_FLAGS: [&str; 2] = ["--url", "--export"];

#[derive(Debug, PartialEq)]
enum Source {
    File(PathBuf),
    Url(String),
}

fn get_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().skip_while(|a| *a != flag).nth(1).cloned()
}

fn positional(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn parse_source(args: &[String]) -> Result<Source, String> {
    match (get_arg(args, "--url"), positional(args)) {
        (Some(_), Some(_)) => Err("Give either a file or --url, not both".to_string()),
        (Some(url), None) => Ok(Source::Url(url)),
        (None, Some(path)) => Ok(Source::File(PathBuf::from(path))),
        (None, None) => Err("A venue file or --url <venue-url> is required".to_string()),
    }
}

/// Parse a venue document: JSON payloads by extension, anything else as SVG.
fn parse_venue_text(path: &Path, text: &str) -> Result<Venue, String> {
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(text).map_err(|e| format!("Invalid venue JSON: {e}"))
    } else {
        load_svg_venue(text)
            .map(|loaded| loaded.venue)
            .map_err(|e| format!("Invalid SVG: {e}"))
    }
}

fn load_file(path: &Path) -> Result<Venue, String> {
    eprintln!("Reading {}...", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_venue_text(path, &text)
}

fn fetch_url(client: &reqwest::blocking::Client, url: &str) -> Result<Venue, String> {
    eprintln!("Fetching venue from {url}...");
    client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("Failed to fetch venue: {e}"))?
        .json::<Venue>()
        .map_err(|e| format!("Failed to parse venue response: {e}"))
}

fn format_summary(source: &str, venue: &Venue) -> String {
    let mut out = String::new();
    let layouts: Vec<_> = venue
        .sectors
        .iter()
        .map(|s| seats_for_sector(s, None))
        .collect();
    let seats: usize = layouts.iter().map(|l| l.seats.len()).sum();
    let available: usize = layouts.iter().map(|l| l.available_count()).sum();
    let b = venue_bounds(&venue.sectors);

    out.push_str("=== Venue ===\n");
    out.push_str(&format!("  Source:  {source}\n"));
    out.push_str(&format!("  Sectors: {}\n", venue.sectors.len()));
    out.push_str(&format!("  Seats:   {seats} ({available} available)\n"));
    out.push_str(&format!("  Bounds:  {}\n\n", b.view_box()));

    out.push_str("=== Sectors ===\n");
    for (sector, layout) in venue.sectors.iter().zip(&layouts) {
        let bbox = match path::bounding_box(&sector.svg_path_data) {
            Ok(r) => r.view_box(),
            Err(e) => format!("unmeasurable ({e})"),
        };
        out.push_str(&format!(
            "  {:<16} seats: {:>4}  available: {:>4}  box: {}\n",
            sector.label(),
            layout.seats.len(),
            layout.available_count(),
            bbox
        ));
        if let Some(w) = layout.warning {
            out.push_str(&format!("  {:<16} warning: {}\n", "", w.message()));
        }
    }
    out
}

fn export(path: &Path, venue: &Venue) -> Result<(), String> {
    let json = serde_json::to_string_pretty(venue)
        .map_err(|e| format!("Failed to serialize venue: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn run(args: &[String]) -> Result<String, String> {
    let source = parse_source(args)?;
    let (label, venue) = match &source {
        Source::File(path) => (path.display().to_string(), load_file(path)?),
        Source::Url(url) => {
            let client = reqwest::blocking::Client::new();
            (url.clone(), fetch_url(&client, url)?)
        }
    };

    if let Some(out) = get_arg(args, "--export") {
        let out = PathBuf::from(out);
        export(&out, &venue)?;
        eprintln!("Wrote {}", out.display());
    }

    Ok(format_summary(&label, &venue))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(summary) => print!("{summary}"),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }
}
