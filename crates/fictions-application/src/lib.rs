//! Application layer for Fictions.
//!
//! Services wrap single backend calls; [`FictionsUseCase`] combines them into
//! the commands a presentation layer runs, keeping the last loaded listing
//! and applying the configured reaction to rejected credentials.

pub mod auth_service;
pub mod fiction_service;
pub mod fictions_usecase;

pub use auth_service::AuthService;
pub use fiction_service::FictionService;
pub use fictions_usecase::FictionsUseCase;
