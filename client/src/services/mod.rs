//! Client services

pub mod forecast;
pub mod status;

pub use forecast::ForecastService;
pub use status::{EventStatus, StatusService};
