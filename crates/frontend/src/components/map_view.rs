use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use seatmap_shared::bounds;
use seatmap_shared::geometry::{Position, Rect};
use seatmap_shared::models::Sector;
use seatmap_shared::session::Session;
use seatmap_shared::style::sector_fill;
use seatmap_shared::viewport::{Drag, Viewport, BUTTON_STEP, MAP_ZOOM, WHEEL_STEP};

use crate::coords;

const MAP_CONTAINER_ID: &str = "venue-map-container";

/// Mouse movement in pixels below which a press still counts as a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold in pixels.
pub const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

const SECTOR_STROKE: &str = "#607d8b";

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Ctrl or Cmd with the wheel is the browser's page zoom, left alone.
pub fn is_browser_zoom(modifiers: Modifiers) -> bool {
    modifiers.intersects(Modifiers::CONTROL | Modifiers::META)
}

/// Rendered frame of the venue: the padded bounds moved to the origin, so
/// the view box is always `0 0 width height`.
fn map_frame(bounds: Rect) -> Rect {
    Rect::new(0.0, 0.0, bounds.width, bounds.height)
}

#[component]
fn SectorShape(
    sector: Sector,
    active: bool,
    hovered: bool,
    session: Signal<Session>,
    suppress_click: Signal<bool>,
    on_select: EventHandler<Sector>,
) -> Element {
    let mut session = session;
    let label = format!("Sector {}", sector.label());
    let fill = sector_fill(active, hovered);
    let d = sector.svg_path_data.clone();

    let enter_id = sector.id.clone();
    let leave_id = sector.id.clone();
    let click_sector = sector.clone();
    let key_sector = sector;

    rsx! {
        path {
            class: "sector",
            d: "{d}",
            fill: "{fill}",
            stroke: SECTOR_STROKE,
            stroke_width: "1",
            tabindex: "0",
            role: "button",
            "aria-label": "{label}",
            onmouseenter: move |_| session.write().hover(&enter_id),
            onmouseleave: move |_| session.write().unhover(&leave_id),
            onclick: move |_| {
                // A drag that ends over a sector is not a selection.
                if *suppress_click.read() {
                    return;
                }
                on_select.call(click_sector.clone());
            },
            onkeydown: move |evt: Event<KeyboardData>| {
                let activate = match evt.key() {
                    Key::Enter => true,
                    Key::Character(c) => c == " ",
                    _ => false,
                };
                if activate {
                    evt.prevent_default();
                    on_select.call(key_sector.clone());
                }
            },
        }
    }
}

/// The whole venue: every sector as a clickable shape inside a pan/zoom
/// group. A declared `view_box` frames the map, otherwise the sector paths
/// do.
#[component]
pub fn MapView(
    sectors: Vec<Sector>,
    view_box: Option<Rect>,
    session: Signal<Session>,
    on_select: EventHandler<Sector>,
) -> Element {
    let content_bounds = bounds::content_bounds(&sectors, view_box);
    let frame = map_frame(content_bounds);

    let mut viewport = use_signal(|| Viewport::new(frame, MAP_ZOOM));
    let mut drag = use_signal(|| None::<Drag>);
    let mut suppress_click = use_signal(|| false);

    // Pan/zoom of a previous venue never carries over to new content.
    let current = move || viewport.read().for_frame(frame);

    if sectors.is_empty() {
        return rsx! {
            div { class: "map-placeholder", "Loading venue data..." }
        };
    }

    let vp = current();
    let transform = vp.transform();
    let origin_shift = format!("translate({} {})", -content_bounds.x, -content_bounds.y);
    let frame_box = frame.view_box();
    let zoom_label = format!("{:.0}%", vp.zoom() * 100.0);
    let container_class = if drag.read().is_some_and(|d| d.moved()) {
        "map-container dragging"
    } else {
        "map-container"
    };

    let shapes: Vec<(Sector, bool, bool)> = {
        let s = session.read();
        sectors
            .iter()
            .map(|sector| (sector.clone(), s.is_active(&sector.id), s.is_hovered(&sector.id)))
            .collect()
    };

    rsx! {
        div { class: "map-view",
            div {
                id: MAP_CONTAINER_ID,
                class: "{container_class}",

                onwheel: move |evt: Event<WheelData>| {
                    if is_browser_zoom(evt.modifiers()) {
                        return;
                    }
                    evt.prevent_default();
                    let delta_y = wheel_delta_y(evt.data().delta());
                    if delta_y == 0.0 {
                        return;
                    }
                    let mut vp = current();
                    let step = if delta_y < 0.0 { WHEEL_STEP } else { -WHEEL_STEP };
                    let client = evt.data().client_coordinates();
                    let anchor =
                        coords::client_point_in_frame(MAP_CONTAINER_ID, client.x, client.y, frame);
                    let changed = match anchor {
                        Some(anchor) => vp.zoom_at(vp.zoom() + step, anchor),
                        None => vp.set_zoom(vp.zoom() + step),
                    };
                    if changed {
                        viewport.set(vp);
                    }
                },

                onmousedown: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let client = evt.client_coordinates();
                    suppress_click.set(false);
                    drag.set(Some(Drag::begin(Position::new(client.x, client.y), &current())));
                },

                onmousemove: move |evt: Event<MouseData>| {
                    let Some(mut d) = *drag.read() else { return };
                    let client = evt.client_coordinates();
                    let mut vp = current();
                    let upp = coords::units_per_px(MAP_CONTAINER_ID, frame);
                    d.update(Position::new(client.x, client.y), DRAG_THRESHOLD, upp, &mut vp);
                    drag.set(Some(d));
                    if d.moved() {
                        viewport.set(vp);
                    }
                },

                onmouseup: move |_| {
                    let moved = drag.read().is_some_and(|d| d.moved());
                    drag.set(None);
                    suppress_click.set(moved);
                },

                onmouseleave: move |_| {
                    let moved = drag.read().is_some_and(|d| d.moved());
                    drag.set(None);
                    suppress_click.set(moved);
                },

                ondoubleclick: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    let mut vp = current();
                    vp.reset();
                    viewport.set(vp);
                },

                ontouchstart: move |evt: Event<TouchData>| {
                    let touches = evt.data().touches();
                    if touches.len() == 1 {
                        let c = touches[0].client_coordinates();
                        suppress_click.set(false);
                        drag.set(Some(Drag::begin(Position::new(c.x, c.y), &current())));
                    } else {
                        drag.set(None);
                    }
                },

                ontouchmove: move |evt: Event<TouchData>| {
                    let touches = evt.data().touches();
                    if touches.len() != 1 {
                        return;
                    }
                    let Some(mut d) = *drag.read() else { return };
                    let c = touches[0].client_coordinates();
                    let mut vp = current();
                    let upp = coords::units_per_px(MAP_CONTAINER_ID, frame);
                    d.update(Position::new(c.x, c.y), TOUCH_DRAG_THRESHOLD, upp, &mut vp);
                    drag.set(Some(d));
                    if d.moved() {
                        viewport.set(vp);
                    }
                },

                ontouchend: move |_| {
                    let moved = drag.read().is_some_and(|d| d.moved());
                    drag.set(None);
                    suppress_click.set(moved);
                },

                ontouchcancel: move |_| {
                    drag.set(None);
                },

                svg {
                    class: "map-svg",
                    view_box: "{frame_box}",
                    preserve_aspect_ratio: "xMidYMid meet",
                    g { transform: "{transform}",
                        g { transform: "{origin_shift}",
                            for (sector, active, hovered) in shapes {
                                SectorShape {
                                    key: "{sector.id}",
                                    sector: sector.clone(),
                                    active,
                                    hovered,
                                    session,
                                    suppress_click,
                                    on_select,
                                }
                            }
                        }
                    }
                }
            }

            div { class: "zoom-controls",
                button {
                    title: "Zoom in",
                    onclick: move |_| {
                        let mut vp = current();
                        if vp.zoom_in(BUTTON_STEP) {
                            viewport.set(vp);
                        }
                    },
                    "+"
                }
                span { class: "zoom-level", "{zoom_label}" }
                button {
                    title: "Zoom out",
                    onclick: move |_| {
                        let mut vp = current();
                        if vp.zoom_out(BUTTON_STEP) {
                            viewport.set(vp);
                        }
                    },
                    "−"
                }
                button {
                    title: "Reset view",
                    disabled: vp.is_default(),
                    onclick: move |_| {
                        let mut vp = current();
                        vp.reset();
                        viewport.set(vp);
                    },
                    "Reset"
                }
            }
        }
    }
}
