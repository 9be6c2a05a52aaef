//! Record command handlers
//!
//! Each handler maps a CLI action onto a board [`Command`] by record id and
//! reports the outcome.

use anyhow::{bail, Context, Result};

use keeplist_core::{Board, Change, Command, Outcome, Query, RecordId, StatusFilter};

use crate::editor::{compose, edit_text, split_edited};
use crate::output::Output;

/// Create a new record
pub fn add(board: &mut Board, title: String, body: Option<String>, output: &Output) -> Result<()> {
    let outcome = board.dispatch(Command::Create {
        title,
        body: body.unwrap_or_default(),
    })?;

    let id = outcome.change().map(|c| c.id.clone());
    report(board, outcome, output)?;

    if let Some(record) = id.as_ref().and_then(|id| board.get(id)) {
        output.print_record(record);
    }
    Ok(())
}

/// Edit a record's title and body
///
/// Opens the editor when neither `--title` nor `--body` is given.
pub fn edit(
    board: &mut Board,
    id: String,
    title: Option<String>,
    body: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(board, &id)?;
    let record = board
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("{} not found: {}", board.variant().noun(), id))?;

    if record.is_deleted() {
        bail!(
            "{} {} is in the trash. Restore it before editing.",
            board.variant().noun(),
            id.short()
        );
    }

    let (title, body) = match (title, body) {
        (None, None) => {
            let initial = format!(
                "<!-- Editing {} {} -->\n{}",
                board.variant().noun().to_lowercase(),
                id.short(),
                compose(record.title(), record.body())
            );
            let edited = edit_text(&initial).context("Failed to edit record")?;
            split_edited(&edited)
        }
        (title, body) => (
            title.unwrap_or_else(|| record.title().to_string()),
            body.unwrap_or_else(|| record.body().to_string()),
        ),
    };

    let outcome = board.dispatch(Command::Update { id, title, body })?;
    report(board, outcome, output)
}

/// Move a record to the trash
pub fn delete(board: &mut Board, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(board, &id)?;
    let outcome = board.dispatch(Command::Delete(id))?;
    report(board, outcome, output)
}

/// Bring a record back from the trash
pub fn restore(board: &mut Board, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(board, &id)?;
    let outcome = board.dispatch(Command::Restore(id))?;
    report(board, outcome, output)
}

/// Archive an active note, or unarchive an archived one
pub fn archive(board: &mut Board, id: String, output: &Output) -> Result<()> {
    if !board.variant().supports_archive() {
        bail!("The {} board has no archive", board.variant());
    }
    let id = resolve_id(board, &id)?;
    let outcome = board.dispatch(Command::ToggleArchive(id))?;
    report(board, outcome, output)
}

/// Mark a task complete
pub fn complete(board: &mut Board, id: String, output: &Output) -> Result<()> {
    if !board.variant().supports_complete() {
        bail!("Records on the {} board cannot be completed", board.variant());
    }
    let id = resolve_id(board, &id)?;
    let outcome = board.dispatch(Command::Complete(id))?;
    report(board, outcome, output)
}

/// List records matching a status filter and search term
pub fn list(
    board: &Board,
    status: Option<StatusFilter>,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let filter = status.unwrap_or_else(|| StatusFilter::default_for(board.variant()));
    if let StatusFilter::Only(status) = filter {
        if !board.variant().allows(status) {
            bail!(
                "Status '{}' does not exist on the {} board (use one of: all, {})",
                status,
                board.variant(),
                board
                    .variant()
                    .statuses()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    let query = Query::new(filter).search(search.as_deref().unwrap_or(""));
    let records = board.query(&query);
    output.print_records(&records, board.variant(), &query);
    Ok(())
}

/// Show a single record
pub fn show(board: &Board, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(board, &id)?;
    let record = board
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("{} not found: {}", board.variant().noun(), id))?;

    output.print_record(record);
    Ok(())
}

/// Print the notice for an outcome; a failed save becomes an error
fn report(board: &Board, outcome: Outcome, output: &Output) -> Result<()> {
    let Some(notice) = outcome.notice(board.variant()) else {
        output.message("Nothing to change.");
        return Ok(());
    };
    output.notice(&notice);

    if let Outcome::Changed(Change {
        save_error: Some(e),
        ..
    }) = outcome
    {
        if e.is_recoverable() {
            if let Some(hint) = e.recovery_suggestion() {
                output.warning(hint);
            }
        }
        return Err(anyhow::Error::new(e).context("Changes were not saved"));
    }
    Ok(())
}

/// Resolve a record ID (full id or unique prefix)
fn resolve_id(board: &Board, id: &str) -> Result<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Please provide a {} ID", board.variant().noun().to_lowercase());
    }
    let exact = RecordId::from(id);
    if board.get(&exact).is_some() {
        return Ok(exact);
    }

    let matches: Vec<_> = board
        .records()
        .iter()
        .filter(|r| r.id().as_str().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!(
            "No {} found matching: {}",
            board.variant().noun().to_lowercase(),
            id
        ),
        1 => Ok(matches[0].id().clone()),
        _ => {
            eprintln!("Multiple records match '{}':", id);
            for record in &matches {
                eprintln!("  {} - {}", record.id(), record.title());
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
