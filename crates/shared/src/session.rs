//! Interaction state for one venue page: which sector is hovered or active,
//! and the open sector detail view with its seat selection.
//!
//! Transitions are synchronous: `Closed -> select(A) -> Open(A)`,
//! `Open(A) -> select(B) -> Open(B)` with fresh state, `Open -> close -> Closed`.

use std::collections::BTreeSet;

use crate::bounds::sector_frame;
use crate::models::Sector;
use crate::seats::{seats_for_sector, SeatLayout};
use crate::viewport::{Viewport, MODAL_ZOOM};

/// Result of finalizing a non-empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub sector_id: String,
    /// Sorted.
    pub seat_ids: Vec<String>,
}

impl Confirmation {
    pub fn message(&self) -> String {
        format!(
            "Reserved {} seat(s) in sector {}: {}",
            self.seat_ids.len(),
            self.sector_id,
            self.seat_ids.join(", ")
        )
    }
}

/// State of the sector detail view while it is open.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSector {
    sector: Sector,
    layout: SeatLayout,
    selected: BTreeSet<String>,
    pub viewport: Viewport,
}

impl OpenSector {
    fn new(sector: Sector, fallback_markup: Option<&str>) -> Self {
        let layout = seats_for_sector(&sector, fallback_markup);
        let viewport = Viewport::new(sector_frame(&sector.svg_path_data), MODAL_ZOOM);
        OpenSector {
            sector,
            layout,
            selected: BTreeSet::new(),
            viewport,
        }
    }

    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.selected.contains(seat_id)
    }

    pub fn can_finalize(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Flip membership of an available seat. Unknown and unavailable seats are
    /// ignored. Returns whether the selection changed.
    pub fn toggle_seat(&mut self, seat_id: &str) -> bool {
        let available = self
            .layout
            .find(seat_id)
            .map(|s| s.available)
            .unwrap_or(false);
        if !available {
            return false;
        }
        if !self.selected.remove(seat_id) {
            self.selected.insert(seat_id.to_string());
        }
        true
    }

    pub fn finalize(&self) -> Option<Confirmation> {
        if self.selected.is_empty() {
            return None;
        }
        Some(Confirmation {
            sector_id: self.sector.id.clone(),
            seat_ids: self.selected.iter().cloned().collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    hovered: Option<String>,
    active: Option<String>,
    modal: Option<OpenSector>,
}

impl Session {
    pub fn is_hovered(&self, sector_id: &str) -> bool {
        self.hovered.as_deref() == Some(sector_id)
    }

    pub fn is_active(&self, sector_id: &str) -> bool {
        self.active.as_deref() == Some(sector_id)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn hover(&mut self, sector_id: &str) {
        self.hovered = Some(sector_id.to_string());
    }

    /// Clear hover, but only if `sector_id` still holds it.
    pub fn unhover(&mut self, sector_id: &str) {
        if self.is_hovered(sector_id) {
            self.hovered = None;
        }
    }

    /// Make `sector` the single active sector and open it with fresh state:
    /// zoom 1, no pan and an empty selection, even when it was already open.
    pub fn select_sector(&mut self, sector: Sector, fallback_markup: Option<&str>) -> &OpenSector {
        self.active = Some(sector.id.clone());
        self.modal.insert(OpenSector::new(sector, fallback_markup))
    }

    pub fn close(&mut self) {
        self.active = None;
        self.modal = None;
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn modal(&self) -> Option<&OpenSector> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut OpenSector> {
        self.modal.as_mut()
    }

    pub fn toggle_seat(&mut self, seat_id: &str) -> bool {
        self.modal
            .as_mut()
            .map(|m| m.toggle_seat(seat_id))
            .unwrap_or(false)
    }

    pub fn finalize(&self) -> Option<Confirmation> {
        self.modal.as_ref().and_then(OpenSector::finalize)
    }
}
