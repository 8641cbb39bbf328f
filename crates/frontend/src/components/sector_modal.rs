use dioxus::html::input_data::MouseButton;
use dioxus::logger::tracing::info;
use dioxus::prelude::*;
use seatmap_shared::geometry::Position;
use seatmap_shared::seats::SeatMarker;
use seatmap_shared::session::{Confirmation, Session};
use seatmap_shared::style::seat_style;
use seatmap_shared::viewport::{Drag, Viewport, BUTTON_STEP, WHEEL_STEP};

use super::map_view::{is_browser_zoom, wheel_delta_y, DRAG_THRESHOLD, TOUCH_DRAG_THRESHOLD};
use crate::coords;

const MODAL_CONTAINER_ID: &str = "sector-modal-canvas";

const SECTOR_OUTLINE_FILL: &str = "#f5f5f5";
const SECTOR_OUTLINE_STROKE: &str = "#90a4ae";

fn announce(confirmation: &Confirmation) {
    info!(
        sector = %confirmation.sector_id,
        seats = ?confirmation.seat_ids,
        "seat selection finalized"
    );
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&confirmation.message());
    }
}

/// Apply `f` to the open sector's viewport, if any.
fn with_viewport(mut session: Signal<Session>, f: impl FnOnce(&mut Viewport)) {
    if let Some(open) = session.write().modal_mut() {
        f(&mut open.viewport);
    }
}

#[component]
fn SeatDot(
    seat: SeatMarker,
    selected: bool,
    session: Signal<Session>,
    suppress_click: Signal<bool>,
) -> Element {
    let mut session = session;
    let style = seat_style(seat.available, selected, &seat.fill);
    let class = if style.interactive { "seat" } else { "seat taken" };
    let stroke_width = style.stroke_width.to_string();
    let (fill, stroke) = (style.fill.to_string(), style.stroke.to_string());
    let label = seat.label();
    let id = seat.id.clone();
    let interactive = style.interactive;

    rsx! {
        circle {
            class: "{class}",
            cx: "{seat.cx}",
            cy: "{seat.cy}",
            r: "{seat.r}",
            fill: "{fill}",
            stroke: "{stroke}",
            stroke_width: "{stroke_width}",
            "aria-label": "{label}",
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                if !interactive || *suppress_click.read() {
                    return;
                }
                session.write().toggle_seat(&id);
            },
        }
    }
}

/// Detail view for the selected sector: its outline, its seats and the
/// selection controls. Renders nothing while no sector is open.
#[component]
pub fn SectorModal(session: Signal<Session>) -> Element {
    let mut session = session;
    let mut drag = use_signal(|| None::<Drag>);
    let mut suppress_click = use_signal(|| false);

    let Some(open) = session.read().modal().cloned() else {
        return rsx! {};
    };

    let sector = open.sector();
    let title = format!("Sector {}", sector.label());
    let d = sector.svg_path_data.clone();
    let frame = open.viewport.frame();
    let view_box = frame.view_box();
    let transform = open.viewport.transform();
    let zoom_label = format!("{:.0}%", open.viewport.zoom() * 100.0);
    let at_default = open.viewport.is_default();
    let layout = open.layout();
    let warning = layout.warning.map(|w| w.message());
    let available = layout.available_count();
    let selected_count = open.selected().len();
    let can_finalize = open.can_finalize();
    let seats: Vec<(SeatMarker, bool)> = layout
        .seats
        .iter()
        .map(|s| (s.clone(), open.is_selected(&s.id)))
        .collect();

    let mut begin_drag = move |x: f64, y: f64| {
        let vp = session.read().modal().map(|m| m.viewport);
        if let Some(vp) = vp {
            suppress_click.set(false);
            drag.set(Some(Drag::begin(Position::new(x, y), &vp)));
        }
    };
    let mut move_drag = move |x: f64, y: f64, threshold: f64| {
        let Some(mut d) = *drag.read() else { return };
        let upp = coords::units_per_px(MODAL_CONTAINER_ID, frame);
        with_viewport(session, |vp| d.update(Position::new(x, y), threshold, upp, vp));
        drag.set(Some(d));
    };
    let mut end_drag = move || {
        let moved = drag.read().is_some_and(|d| d.moved());
        drag.set(None);
        suppress_click.set(moved);
    };

    rsx! {
        div {
            class: "modal-overlay",
            onmousedown: move |_| suppress_click.set(false),
            onclick: move |_| {
                // Releasing a drag over the backdrop is not a dismissal.
                if !*suppress_click.read() {
                    session.write().close();
                }
            },

            div {
                class: "modal",
                role: "dialog",
                aria_modal: "true",
                aria_label: "{title}",
                tabindex: "-1",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmounted: move |evt: Event<MountedData>| async move {
                    let _ = evt.set_focus(true).await;
                },
                onkeydown: move |evt: Event<KeyboardData>| {
                    if evt.key() == Key::Escape {
                        session.write().close();
                    }
                },

                div { class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "modal-close",
                        aria_label: "Close",
                        onclick: move |_| session.write().close(),
                        "×"
                    }
                }

                if let Some(message) = warning {
                    p { class: "modal-warning", "{message}" }
                }

                div {
                    id: MODAL_CONTAINER_ID,
                    class: "modal-canvas",

                    onwheel: move |evt: Event<WheelData>| {
                        if is_browser_zoom(evt.modifiers()) {
                            return;
                        }
                        evt.prevent_default();
                        let delta_y = wheel_delta_y(evt.data().delta());
                        if delta_y == 0.0 {
                            return;
                        }
                        let step = if delta_y < 0.0 { WHEEL_STEP } else { -WHEEL_STEP };
                        let client = evt.data().client_coordinates();
                        let anchor = coords::client_point_in_frame(
                            MODAL_CONTAINER_ID,
                            client.x,
                            client.y,
                            frame,
                        );
                        with_viewport(session, |vp| {
                            let target = vp.zoom() + step;
                            match anchor {
                                Some(a) => vp.zoom_at(target, a),
                                None => vp.set_zoom(target),
                            };
                        });
                    },

                    onmousedown: move |evt: Event<MouseData>| {
                        if evt.trigger_button() != Some(MouseButton::Primary) {
                            return;
                        }
                        let c = evt.client_coordinates();
                        begin_drag(c.x, c.y);
                    },
                    onmousemove: move |evt: Event<MouseData>| {
                        let c = evt.client_coordinates();
                        move_drag(c.x, c.y, DRAG_THRESHOLD);
                    },
                    onmouseup: move |_| end_drag(),
                    onmouseleave: move |_| end_drag(),
                    ondoubleclick: move |evt: Event<MouseData>| {
                        evt.prevent_default();
                        with_viewport(session, Viewport::reset);
                    },

                    ontouchstart: move |evt: Event<TouchData>| {
                        let touches = evt.data().touches();
                        if touches.len() == 1 {
                            let c = touches[0].client_coordinates();
                            begin_drag(c.x, c.y);
                        } else {
                            drag.set(None);
                        }
                    },
                    ontouchmove: move |evt: Event<TouchData>| {
                        let touches = evt.data().touches();
                        if touches.len() == 1 {
                            let c = touches[0].client_coordinates();
                            move_drag(c.x, c.y, TOUCH_DRAG_THRESHOLD);
                        }
                    },
                    ontouchend: move |_| end_drag(),
                    ontouchcancel: move |_| drag.set(None),

                    svg {
                        class: "modal-svg",
                        view_box: "{view_box}",
                        preserve_aspect_ratio: "xMidYMid meet",
                        g { transform: "{transform}",
                            path {
                                d: "{d}",
                                fill: SECTOR_OUTLINE_FILL,
                                stroke: SECTOR_OUTLINE_STROKE,
                                stroke_width: "1",
                            }
                            for (seat, selected) in seats {
                                SeatDot {
                                    key: "{seat.id}",
                                    seat: seat.clone(),
                                    selected,
                                    session,
                                    suppress_click,
                                }
                            }
                        }
                    }
                }

                div { class: "zoom-controls",
                    button {
                        title: "Zoom in",
                        onclick: move |_| with_viewport(session, |vp| {
                            vp.zoom_in(BUTTON_STEP);
                        }),
                        "+"
                    }
                    span { class: "zoom-level", "{zoom_label}" }
                    button {
                        title: "Zoom out",
                        onclick: move |_| with_viewport(session, |vp| {
                            vp.zoom_out(BUTTON_STEP);
                        }),
                        "−"
                    }
                    button {
                        title: "Reset view",
                        disabled: at_default,
                        onclick: move |_| with_viewport(session, Viewport::reset),
                        "Reset"
                    }
                }

                div { class: "modal-footer",
                    span { class: "seat-summary",
                        "{selected_count} selected · {available} available"
                    }
                    button {
                        class: "finalize",
                        disabled: !can_finalize,
                        onclick: move |_| {
                            let confirmation = session.read().finalize();
                            if let Some(confirmation) = confirmation {
                                announce(&confirmation);
                            }
                        },
                        "Finalize selection"
                    }
                }
            }
        }
    }
}
