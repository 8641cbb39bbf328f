mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;

use pages::venue::{VenuePage, VenueSource};

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/static-venue")]
    StaticVenue {},
}

#[component]
fn Home() -> Element {
    rsx! {
        VenuePage { source: VenueSource::Api }
    }
}

#[component]
fn StaticVenue() -> Element {
    rsx! {
        VenuePage { source: VenueSource::StaticSvg }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
