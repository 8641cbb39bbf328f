use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;
use seatmap_shared::geometry::Rect;
use seatmap_shared::models::{Sector, Venue};
use seatmap_shared::session::Session;

use crate::api;
use crate::components::map_view::MapView;
use crate::components::sector_modal::SectorModal;

/// Where the page gets its venue from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VenueSource {
    Api,
    StaticSvg,
}

/// A loaded venue plus the view box its drawing declares, when there is one.
#[derive(Debug, Clone, PartialEq, Default)]
struct LoadedVenue {
    venue: Venue,
    view_box: Option<Rect>,
}

async fn load(source: VenueSource) -> LoadedVenue {
    let result = match source {
        VenueSource::Api => api::fetch_venue().await.map(|venue| LoadedVenue {
            venue,
            view_box: None,
        }),
        VenueSource::StaticSvg => api::fetch_venue_svg().await.map(|svg| LoadedVenue {
            venue: svg.venue,
            view_box: svg.view_box,
        }),
    };
    match result {
        Ok(loaded) => {
            info!(sectors = loaded.venue.sectors.len(), "venue loaded");
            loaded
        }
        Err(e) => {
            warn!("venue unavailable, showing empty venue: {e}");
            LoadedVenue::default()
        }
    }
}

#[component]
pub fn VenuePage(source: VenueSource) -> Element {
    let venue_resource = use_resource(move || load(source));
    let mut session = use_signal(Session::default);

    let loaded = venue_resource.read().clone().unwrap_or_default();
    let sector_count = loaded.venue.sectors.len();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Venue seating" }
                if sector_count > 0 {
                    span { class: "sector-count", "{sector_count} sectors" }
                }
            }

            MapView {
                sectors: loaded.venue.sectors,
                view_box: loaded.view_box,
                session,
                on_select: move |sector: Sector| {
                    info!(sector = %sector.id, "sector selected");
                    session.write().select_sector(sector, None);
                },
            }

            SectorModal { session }
        }
    }
}
