//! Terminal rendering for command output.

use chrono::NaiveDateTime;
use colored::Colorize;
use fictions_core::FictionsError;
use fictions_core::fiction::FictionRecord;
use fictions_core::session::View;
use fictions_core::user::UserProfile;

pub fn navbar(user: Option<&UserProfile>) {
    let title = "📚 Fictions App".bold();
    match user {
        Some(user) => println!("{}  Welcome, {}!", title, user.display_name().cyan()),
        None => println!("{}", title),
    }
}

pub fn redirect_hint(view: View) {
    match view {
        View::Login => {
            eprintln!("{} You are not logged in.", "→".yellow());
            eprintln!("  Run: fictions login --email <email> --password <password>");
        }
        View::Fictions => {
            println!("{} Already logged in.", "→".yellow());
            println!("  Run: fictions list");
        }
    }
}

/// Form submission failure, printed next to the form's input.
pub fn inline_error(error: &FictionsError) {
    eprintln!("{} {}", "✗".red().bold(), error.to_string().red());
}

/// Failure of a whole page (the listing).
pub fn page_error(error: &FictionsError) {
    eprintln!();
    eprintln!("  {}", error.to_string().red().bold());
    eprintln!();
}

/// Blocking alert, used for delete failures.
pub fn alert(error: &FictionsError) {
    let message = error.to_string();
    let border = "!".repeat(message.chars().count() + 6);
    eprintln!("{}", border.red());
    eprintln!("{} {} {}", "!!".red(), message.bold(), "!!".red());
    eprintln!("{}", border.red());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn listing(records: &[FictionRecord], is_owner: impl Fn(&FictionRecord) -> bool) {
    if records.is_empty() {
        println!();
        println!("  {}", "No Fictions Yet".bold());
        println!("  Create your first fiction with `fictions create`!");
        return;
    }

    println!();
    println!("{}", format!("All Fictions ({})", records.len()).bold());
    for record in records {
        println!();
        card(record, is_owner(record));
    }
}

/// One record as shown in the listing, with its content preview.
pub fn card(record: &FictionRecord, owned: bool) {
    let mut heading = format!("{}", record.title.bold());
    if owned {
        heading.push_str(&format!("  {}", " Your Story ".on_blue().white()));
    }
    println!("{}", heading);
    println!("  {} {}", "id:".dimmed(), record.id.dimmed());
    println!("  {} {}", "Author:".bold(), record.author);
    println!("  [{}]", record.genre.to_string().magenta());
    println!("  {} {}", "Description:".bold(), record.description);
    println!("  {}", "Story:".bold());
    println!("  {}", record.preview());
    if owned {
        println!(
            "  {}",
            format!("fictions edit {0}  |  fictions delete {0}", record.id).dimmed()
        );
    }
}

/// One record in full.
pub fn detail(record: &FictionRecord, owned: bool) {
    let mut heading = format!("{}", record.title.bold());
    if owned {
        heading.push_str(&format!("  {}", " Your Story ".on_blue().white()));
    }
    println!("{}", heading);
    println!("  {} {}", "Author:".bold(), record.author);
    println!("  {} {}", "Genre:".bold(), record.genre);
    if let Some(created_at) = &record.created_at {
        println!("  {} {}", "Created:".bold(), timestamp(created_at));
    }
    if let Some(updated_at) = &record.updated_at {
        println!("  {} {}", "Updated:".bold(), timestamp(updated_at));
    }
    println!("  {} {}", "Description:".bold(), record.description);
    println!();
    println!("{}", record.content);
}

/// Formats a backend timestamp, keeping the raw value when it does not parse.
fn timestamp(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(timestamp("2024-12-04T10:00:00"), "2024-12-04 10:00");
        assert_eq!(timestamp("2024-12-04T10:00:00.123456"), "2024-12-04 10:00");
        assert_eq!(timestamp("2024-12-04T10:00:00Z"), "2024-12-04 10:00");
        assert_eq!(timestamp("yesterday"), "yesterday");
    }
}
