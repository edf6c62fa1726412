//! Domain layer of the Fictions client: models, validation, the session store
//! and the display policies that sit on top of it.

pub mod auth;
pub mod config;
pub mod error;
pub mod fiction;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{FictionsError, Result};
