//! Shared types and evaluation logic for Meteo Events
//!
//! This crate holds the weather alert evaluation used by the command line
//! client and the browser front end (via WASM): the threshold classifier,
//! the hourly forecast aggregator and the event status reducer.

pub mod error;
pub mod models;
pub mod report;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use report::*;
pub use types::*;
pub use validation::*;
