pub mod map_view;
pub mod sector_modal;
