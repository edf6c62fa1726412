//! Resource Service for the fictions collection.
//!
//! Every method is exactly one HTTP call. Nothing is cached and nothing is
//! retried; ownership of updates and deletes is enforced by the backend.

use fictions_core::fiction::{DeleteConfirmation, FictionDraft, FictionRecord};
use fictions_core::{FictionsError, Result};
use fictions_interaction::ApiClient;

pub const FICTIONS_PATH: &str = "/api/fictions/";

#[derive(Clone)]
pub struct FictionService {
    api: ApiClient,
}

impl FictionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All records, in backend order.
    pub async fn list(&self) -> Result<Vec<FictionRecord>> {
        let records: Vec<FictionRecord> = self.api.get(FICTIONS_PATH).await?;
        tracing::debug!("Loaded {} fictions", records.len());
        Ok(records)
    }

    /// One record. A missing id surfaces as a `Request` error with status 404.
    pub async fn get(&self, id: &str) -> Result<FictionRecord> {
        self.api.get(&fiction_path(id)?).await
    }

    /// Creates a record owned by the current user.
    pub async fn create(&self, draft: &FictionDraft) -> Result<FictionRecord> {
        draft.validate()?;
        let record: FictionRecord = self.api.post(FICTIONS_PATH, draft).await?;
        tracing::info!(fiction_id = %record.id, "Created fiction '{}'", record.title);
        Ok(record)
    }

    /// Replaces every editable field of a record.
    pub async fn update(&self, id: &str, draft: &FictionDraft) -> Result<FictionRecord> {
        let path = fiction_path(id)?;
        draft.validate()?;
        let record: FictionRecord = self.api.put(&path, draft).await?;
        tracing::info!(fiction_id = %record.id, "Updated fiction");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteConfirmation> {
        let confirmation: DeleteConfirmation = self.api.delete(&fiction_path(id)?).await?;
        tracing::info!(fiction_id = %id.trim(), "Deleted fiction");
        Ok(confirmation)
    }
}

/// Path of one record. The id must be a single unreserved URL segment, so it
/// can never change the query, fragment or path of the request.
fn fiction_path(id: &str) -> Result<String> {
    let id = id.trim();
    let is_unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
    if id.is_empty() || id == "." || id == ".." || !id.chars().all(is_unreserved) {
        return Err(FictionsError::validation(format!("Invalid fiction id '{}'", id)));
    }
    Ok(format!("{FICTIONS_PATH}{id}"))
}
