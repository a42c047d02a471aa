//! Meteo Events client library
//!
//! Network side of Meteo Events: configuration, the AEMET and backend
//! clients, and the services that hand their payloads to the shared
//! evaluation crate.

pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
