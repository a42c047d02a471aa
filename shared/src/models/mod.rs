//! Domain models for Meteo Events

mod alert;
mod event;
mod forecast;
mod status;
mod user;

pub use alert::*;
pub use event::*;
pub use forecast::*;
pub use status::*;
pub use user::*;
