use super::{Reported, render, require_fictions_view};
use crate::{CreateArgs, EditArgs};
use anyhow::Result;
use fictions_application::FictionsUseCase;
use fictions_core::FictionsError;
use fictions_core::fiction::{FictionDraft, FictionRecord, Genre, is_owner};
use fictions_core::user::UserProfile;
use std::io::{self, BufRead, Write};

pub async fn list(app: &FictionsUseCase) -> Result<()> {
    require_fictions_view(app)?;
    let user = app.current_user();
    render::navbar(user.as_ref());

    match app.load_fictions().await {
        Ok(records) => {
            render::listing(&records, |record| is_owner(record, user.as_ref()));
            Ok(())
        }
        Err(e) => {
            render::page_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn show(app: &FictionsUseCase, id: &str) -> Result<()> {
    require_fictions_view(app)?;

    match app.show(id).await {
        Ok(record) => {
            render::detail(&record, app.is_owner(&record));
            Ok(())
        }
        Err(e) => {
            render::page_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn create(app: &FictionsUseCase, args: CreateArgs) -> Result<()> {
    require_fictions_view(app)?;

    match submit_create(app, args).await {
        Ok(record) => {
            render::success(&format!("Created \"{}\" ({})", record.title, record.id));
            Ok(())
        }
        Err(e) => {
            render::inline_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn edit(app: &FictionsUseCase, id: &str, fields: EditArgs) -> Result<()> {
    require_fictions_view(app)?;

    match submit_edit(app, id, fields).await {
        Ok(record) => {
            render::success(&format!("Updated \"{}\"", record.title));
            Ok(())
        }
        Err(e) => {
            render::inline_error(&e);
            Err(Reported.into())
        }
    }
}

pub async fn delete(app: &FictionsUseCase, id: &str, yes: bool) -> Result<()> {
    require_fictions_view(app)?;

    let record = match app.show(id).await {
        Ok(record) => record,
        Err(e) => {
            render::alert(&e);
            return Err(Reported.into());
        }
    };
    if let Err(e) = ensure_owner(&record, app.current_user().as_ref(), "delete") {
        render::alert(&e);
        return Err(Reported.into());
    }

    if !yes && !confirm(&format!("Are you sure you want to delete \"{}\"?", record.title))? {
        println!("Cancelled");
        return Ok(());
    }

    match app.delete(&record.id).await {
        Ok(confirmation) => {
            render::success(&confirmation.message);
            Ok(())
        }
        Err(e) => {
            render::alert(&e);
            Err(Reported.into())
        }
    }
}

async fn submit_create(
    app: &FictionsUseCase,
    args: CreateArgs,
) -> fictions_core::Result<FictionRecord> {
    let draft = FictionDraft {
        title: args.title,
        author: args.author,
        genre: Genre::parse(&args.genre)?,
        description: args.description,
        content: args.content,
    };
    app.create(&draft).await
}

async fn submit_edit(
    app: &FictionsUseCase,
    id: &str,
    fields: EditArgs,
) -> fictions_core::Result<FictionRecord> {
    let current = app.show(id).await?;
    ensure_owner(&current, app.current_user().as_ref(), "edit")?;
    let draft = merge_edit(&current, fields)?;
    app.update(&current.id, &draft).await
}

/// Edit and delete are only offered on the user's own records.
fn ensure_owner(
    record: &FictionRecord,
    user: Option<&UserProfile>,
    action: &str,
) -> fictions_core::Result<()> {
    if is_owner(record, user) {
        Ok(())
    } else {
        Err(FictionsError::validation(format!(
            "You can only {action} your own fictions"
        )))
    }
}

/// The given flags over the current record; omitted flags keep its values.
fn merge_edit(current: &FictionRecord, fields: EditArgs) -> fictions_core::Result<FictionDraft> {
    let mut draft = FictionDraft::from(current);
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(author) = fields.author {
        draft.author = author;
    }
    if let Some(genre) = fields.genre {
        draft.genre = Genre::parse(&genre)?;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(content) = fields.content {
        draft.content = content;
    }
    Ok(draft)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            username: "alice".into(),
            email: "a@b.com".into(),
            created_at: None,
        }
    }

    fn record() -> FictionRecord {
        FictionRecord {
            id: "f1".into(),
            title: "T".into(),
            author: "A".into(),
            genre: Genre::Fantasy,
            description: "D".into(),
            content: "C".into(),
            created_by: "u1".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_omitted_flags_keep_current_values() {
        let fields = EditArgs {
            title: Some("T2".into()),
            genre: Some("Sci-Fi".into()),
            ..Default::default()
        };

        let draft = merge_edit(&record(), fields).unwrap();

        assert_eq!(draft.title, "T2");
        assert_eq!(draft.genre, Genre::SciFi);
        assert_eq!(draft.author, "A");
        assert_eq!(draft.description, "D");
        assert_eq!(draft.content, "C");
    }

    #[test]
    fn test_no_flags_resubmits_the_record() {
        let draft = merge_edit(&record(), EditArgs::default()).unwrap();
        assert_eq!(draft, FictionDraft::from(&record()));
    }

    #[test]
    fn test_unknown_genre_is_rejected() {
        let fields = EditArgs {
            genre: Some("poetry".into()),
            ..Default::default()
        };
        assert!(merge_edit(&record(), fields).unwrap_err().is_validation());
    }

    #[test]
    fn test_only_owner_may_edit_or_delete() {
        assert!(ensure_owner(&record(), Some(&alice()), "edit").is_ok());

        let mut bob = alice();
        bob.id = "u2".into();
        let err = ensure_owner(&record(), Some(&bob), "edit").unwrap_err();
        assert_eq!(err.to_string(), "You can only edit your own fictions");

        let err = ensure_owner(&record(), None, "delete").unwrap_err();
        assert_eq!(err.to_string(), "You can only delete your own fictions");
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
