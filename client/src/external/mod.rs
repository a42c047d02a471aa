//! External API integrations

pub mod aemet;
pub mod meteo_api;

pub use aemet::AemetClient;
pub use meteo_api::MeteoApiClient;
