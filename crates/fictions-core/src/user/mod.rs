//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User profile as returned by the authentication endpoints

mod model;

pub use model::UserProfile;
