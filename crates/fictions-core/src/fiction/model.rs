//! Fiction domain model.
//!
//! A fiction is a short story record owned by the user who created it.

use crate::error::{FictionsError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

pub const TITLE_MAX_CHARS: usize = 200;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Number of content characters shown in list previews.
pub const PREVIEW_CHARS: usize = 200;

/// The fixed set of genres accepted by the backend.
///
/// Parsing ignores ASCII case and always yields the lower-case wire form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    #[default]
    Fantasy,
    SciFi,
    Mystery,
    Romance,
    Thriller,
    Horror,
    Adventure,
    Drama,
    Comedy,
    Other,
}

impl Genre {
    /// Comma separated list of every accepted value, for error messages.
    pub fn allowed_values() -> String {
        Genre::iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parses a genre, reporting the accepted values on failure.
    pub fn parse(value: &str) -> Result<Self> {
        Genre::from_str(value.trim()).map_err(|_| {
            FictionsError::validation(format!(
                "Genre must be one of: {}",
                Self::allowed_values()
            ))
        })
    }
}

impl TryFrom<String> for Genre {
    type Error = FictionsError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.to_string()
    }
}

/// A fiction record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FictionRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub description: String,
    pub content: String,
    /// Identifier of the owning user
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FictionRecord {
    /// Content shortened to [`PREVIEW_CHARS`] characters, with an ellipsis when cut.
    pub fn preview(&self) -> String {
        if self.content.chars().count() > PREVIEW_CHARS {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            self.content.clone()
        }
    }
}

/// The editable fields of a fiction, sent as the body of create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FictionDraft {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub description: String,
    pub content: String,
}

impl FictionDraft {
    /// Checks the bounds the backend enforces, so obviously bad input never leaves the client.
    pub fn validate(&self) -> Result<()> {
        require_bounded("Title", &self.title, TITLE_MAX_CHARS)?;
        require_bounded("Author", &self.author, AUTHOR_MAX_CHARS)?;
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(FictionsError::validation(format!(
                "Description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
        }
        if self.content.trim().is_empty() {
            return Err(FictionsError::validation("Content is required"));
        }
        Ok(())
    }
}

impl From<&FictionRecord> for FictionDraft {
    fn from(record: &FictionRecord) -> Self {
        Self {
            title: record.title.clone(),
            author: record.author.clone(),
            genre: record.genre,
            description: record.description.clone(),
            content: record.content.clone(),
        }
    }
}

fn require_bounded(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FictionsError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(FictionsError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Body of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub message: String,
}
