//! Authentication request/response schemas.
//!
//! # Module Structure
//!
//! - `model`: Login and registration payloads with boundary validation

mod model;

pub use model::{
    AuthResponse, LoginRequest, PASSWORD_MAX_CHARS, PASSWORD_MIN_CHARS, RegisterRequest,
    USERNAME_MAX_CHARS, USERNAME_MIN_CHARS,
};
