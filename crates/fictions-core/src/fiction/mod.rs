//! Fiction domain module.
//!
//! # Module Structure
//!
//! - `model`: Fiction records, genres and the editable field set
//! - `ownership`: Which records the current user may edit or delete

mod model;
mod ownership;

pub use model::{
    AUTHOR_MAX_CHARS, DESCRIPTION_MAX_CHARS, DeleteConfirmation, FictionDraft, FictionRecord,
    Genre, PREVIEW_CHARS, TITLE_MAX_CHARS,
};
pub use ownership::is_owner;
