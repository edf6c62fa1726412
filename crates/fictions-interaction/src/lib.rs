//! Interaction layer: the HTTP client that talks to the fictions backend.

pub mod api_client;

pub use api_client::{AUTH_NAMESPACE, ApiClient, extract_error_message};
pub use reqwest::Method;
