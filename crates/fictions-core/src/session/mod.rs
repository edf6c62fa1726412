//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: The client-side session value
//! - `storage`: Key-value persistence seam (the analogue of browser local storage)
//! - `store`: Session store over a key-value backend
//! - `guard`: Access guard deciding entry to protected views

mod guard;
mod model;
mod storage;
mod store;

pub use guard::{AccessGuard, Admission, View};
pub use model::Session;
pub use storage::KeyValueStore;
pub use store::{SessionStore, TOKEN_KEY, USER_KEY};
