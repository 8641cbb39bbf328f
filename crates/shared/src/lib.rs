pub mod asset;
pub mod bounds;
pub mod geometry;
pub mod models;
pub mod path;
pub mod seats;
pub mod session;
pub mod style;
pub mod viewport;
