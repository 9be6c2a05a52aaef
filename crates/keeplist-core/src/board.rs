//! Board: the record lifecycle
//!
//! A `Board` owns one [`RecordStore`] and is the only way to change it.
//! Every operation is a status transition over a record id:
//!
//! | From             | Operation     | To               |
//! |------------------|---------------|------------------|
//! | (none)           | create        | default status   |
//! | any but deleted  | update        | unchanged        |
//! | in-progress      | complete      | completed        |
//! | any but deleted  | delete        | deleted          |
//! | active/archived  | toggle_archive| archived/active  |
//! | deleted          | restore       | default status   |
//!
//! Anything else (unknown id, wrong status, capability the variant lacks)
//! is a silent [`Outcome::Unchanged`]. The only error is a blank title.
//! Successful transitions are saved immediately; a failed save is reported
//! on the [`Change`] but the in-memory change stands.

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Record, RecordId, Status, Variant};
use crate::query::{query_records, Query, StatusCounts};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::{LoadReport, RecordStore};

/// Input rejected before any state change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a title")]
    EmptyTitle,
}

/// What a successful operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Completed,
    Deleted,
    Restored,
    Archived,
    Unarchived,
}

/// A transition that was applied
#[derive(Debug)]
pub struct Change {
    pub id: RecordId,
    pub action: Action,
    /// Set when the follow-up save failed; the change is kept in memory
    pub save_error: Option<StorageError>,
}

/// Result of a lifecycle operation
#[derive(Debug)]
pub enum Outcome {
    Changed(Change),
    /// Unknown id or a transition not allowed from the record's status
    Unchanged,
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }

    pub fn change(&self) -> Option<&Change> {
        match self {
            Outcome::Changed(change) => Some(change),
            Outcome::Unchanged => None,
        }
    }

    pub fn action(&self) -> Option<Action> {
        self.change().map(|c| c.action)
    }

    /// Message for the user, if the operation did anything
    pub fn notice(&self, variant: Variant) -> Option<Notice> {
        let change = self.change()?;
        if change.save_error.is_some() {
            return Some(Notice::error("Storage write failed"));
        }
        let message = match change.action {
            Action::Created => format!("{} added", variant.noun()),
            Action::Updated => "Updated".to_string(),
            Action::Completed => "Marked complete".to_string(),
            Action::Deleted => "Moved to trash".to_string(),
            Action::Restored => "Restored".to_string(),
            Action::Archived => "Archived".to_string(),
            Action::Unarchived => "Unarchived".to_string(),
        };
        Some(Notice::success(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short, user-facing message about an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A user action, addressed by record id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { title: String, body: String },
    Update { id: RecordId, title: String, body: String },
    Complete(RecordId),
    Delete(RecordId),
    Restore(RecordId),
    ToggleArchive(RecordId),
}

/// Lifecycle controller for one board
pub struct Board {
    store: RecordStore,
}

impl Board {
    /// Wrap an already-loaded store
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Open a board over `backend`, loading what it holds
    pub fn open(backend: Box<dyn KeyValueStore>, variant: Variant) -> (Self, LoadReport) {
        let (store, report) = RecordStore::open(backend, variant);
        (Self::new(store), report)
    }

    pub fn variant(&self) -> Variant {
        self.store.variant()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        self.store.all()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    /// Records matching `query`, most recently created first
    pub fn query(&self, query: &Query) -> Vec<&Record> {
        query_records(self.store.all(), query)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(self.store.all())
    }

    /// Run a command
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, ValidationError> {
        match command {
            Command::Create { title, body } => self.create(&title, &body),
            Command::Update { id, title, body } => self.update(&id, &title, &body),
            Command::Complete(id) => Ok(self.complete(&id)),
            Command::Delete(id) => Ok(self.delete(&id)),
            Command::Restore(id) => Ok(self.restore(&id)),
            Command::ToggleArchive(id) => Ok(self.toggle_archive(&id)),
        }
    }

    /// Add a record at the front of the list
    pub fn create(&mut self, title: &str, body: &str) -> Result<Outcome, ValidationError> {
        let title = validate_title(title)?;

        let mut id = RecordId::generate();
        while self.store.contains(&id) {
            id = RecordId::generate();
        }

        let record = Record::new(id.clone(), title, body.trim(), self.variant().default_status());
        self.store.prepend(record);
        debug!(%id, "Created record");
        Ok(self.commit(id, Action::Created))
    }

    /// Replace a record's title and body
    pub fn update(
        &mut self,
        id: &RecordId,
        title: &str,
        body: &str,
    ) -> Result<Outcome, ValidationError> {
        match self.store.get(id) {
            Some(record) if !record.is_deleted() => {}
            _ => return Ok(self.skip(id, "update")),
        }
        let title = validate_title(title)?;

        if let Some(record) = self.store.get_mut(id) {
            record.title = title.to_string();
            record.body = body.trim().to_string();
        }
        debug!(%id, "Updated record");
        Ok(self.commit(id.clone(), Action::Updated))
    }

    /// Mark an in-progress task as completed
    pub fn complete(&mut self, id: &RecordId) -> Outcome {
        if !self.variant().supports_complete() {
            return self.skip(id, "complete");
        }
        self.transition(id, Action::Completed, |status| match status {
            Status::InProgress => Some(Status::Completed),
            _ => None,
        })
    }

    /// Soft-delete a record; deleting twice changes nothing
    pub fn delete(&mut self, id: &RecordId) -> Outcome {
        self.transition(id, Action::Deleted, |status| match status {
            Status::Deleted => None,
            _ => Some(Status::Deleted),
        })
    }

    /// Bring a deleted record back to the default status
    pub fn restore(&mut self, id: &RecordId) -> Outcome {
        let default_status = self.variant().default_status();
        self.transition(id, Action::Restored, |status| match status {
            Status::Deleted => Some(default_status),
            _ => None,
        })
    }

    /// Flip a note between active and archived
    pub fn toggle_archive(&mut self, id: &RecordId) -> Outcome {
        if !self.variant().supports_archive() {
            return self.skip(id, "toggle_archive");
        }
        let Some(current) = self.store.get(id).map(Record::status) else {
            return self.skip(id, "toggle_archive");
        };
        let (next, action) = match current {
            Status::Active => (Status::Archived, Action::Archived),
            Status::Archived => (Status::Active, Action::Unarchived),
            _ => return self.skip(id, "toggle_archive"),
        };
        self.transition(id, action, |_| Some(next))
    }

    fn transition<F>(&mut self, id: &RecordId, action: Action, next: F) -> Outcome
    where
        F: FnOnce(Status) -> Option<Status>,
    {
        let Some(record) = self.store.get_mut(id) else {
            return self.skip(id, "transition");
        };
        let Some(status) = next(record.status) else {
            let from = record.status;
            debug!(%id, ?action, %from, "Transition not allowed, ignoring");
            return Outcome::Unchanged;
        };

        debug!(%id, ?action, from = %record.status, to = %status, "Status changed");
        record.status = status;
        self.commit(id.clone(), action)
    }

    fn commit(&mut self, id: RecordId, action: Action) -> Outcome {
        let save_error = match self.store.save() {
            Ok(()) => None,
            Err(e) => {
                warn!(%id, ?action, "Failed to save records: {}", e);
                Some(e)
            }
        };
        Outcome::Changed(Change {
            id,
            action,
            save_error,
        })
    }

    fn skip(&self, id: &RecordId, operation: &str) -> Outcome {
        debug!(%id, operation, "No matching record for operation, ignoring");
        Outcome::Unchanged
    }
}

fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StatusFilter;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn notes() -> Board {
        Board::open(Box::new(MemoryStore::new()), Variant::Notes).0
    }

    fn tasks() -> Board {
        Board::open(Box::new(MemoryStore::new()), Variant::Tasks).0
    }

    fn created_id(outcome: Result<Outcome, ValidationError>) -> RecordId {
        outcome.unwrap().change().unwrap().id.clone()
    }

    fn titles(board: &Board, query: &Query) -> Vec<String> {
        board
            .query(query)
            .iter()
            .map(|r| r.title().to_string())
            .collect()
    }

    #[test]
    fn test_create_prepends_and_trims() {
        let mut board = notes();
        board.create("First", "").unwrap();
        let id = created_id(board.create("  Second  ", "  body  "));

        let all = board.query(&Query::all());
        assert_eq!(all[0].id(), &id);
        assert_eq!(all[0].title(), "Second");
        assert_eq!(all[0].body(), "body");
        assert_eq!(all[0].status(), Status::Active);
        assert_eq!(all[1].title(), "First");
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let mut board = notes();
        board.create("Keep", "").unwrap();

        for title in ["", "   ", "\t\n"] {
            let err = board.create(title, "body").unwrap_err();
            assert_eq!(err, ValidationError::EmptyTitle);
        }
        assert_eq!(board.records().len(), 1);
        assert_eq!(ValidationError::EmptyTitle.to_string(), "Please enter a title");
    }

    #[test]
    fn test_create_persists() {
        let mut board = notes();
        board.create("Saved", "").unwrap();

        let raw = board.store().backend().get("notes").unwrap().unwrap();
        assert!(raw.contains("Saved"));
    }

    #[test]
    fn test_update_replaces_title_and_body_only() {
        let mut board = tasks();
        let id = created_id(board.create("Old", "old body"));
        let before = board.get(&id).unwrap().clone();

        let outcome = board.update(&id, " New ", " new body ").unwrap();
        assert_eq!(outcome.action(), Some(Action::Updated));

        let after = board.get(&id).unwrap();
        assert_eq!(after.title(), "New");
        assert_eq!(after.body(), "new body");
        assert_eq!(after.status(), before.status());
        assert_eq!(after.created_at(), before.created_at());
    }

    #[test]
    fn test_update_validates_title() {
        let mut board = notes();
        let id = created_id(board.create("Title", "body"));

        assert_eq!(
            board.update(&id, "  ", "x").unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert_eq!(board.get(&id).unwrap().title(), "Title");
        assert_eq!(board.get(&id).unwrap().body(), "body");
    }

    #[test]
    fn test_update_unknown_or_deleted_is_noop() {
        let mut board = notes();
        let missing = RecordId::from("missing");
        // Unknown ids are skipped before the title is looked at
        assert!(!board.update(&missing, "", "").unwrap().is_changed());

        let id = created_id(board.create("Title", ""));
        board.delete(&id);
        assert!(!board.update(&id, "Other", "").unwrap().is_changed());
        assert_eq!(board.get(&id).unwrap().title(), "Title");
    }

    #[test]
    fn test_delete_then_restore_keeps_identity() {
        let mut board = tasks();
        let id = created_id(board.create("Write report", "quarterly"));
        let original = board.get(&id).unwrap().clone();

        assert_eq!(board.delete(&id).action(), Some(Action::Deleted));
        assert_eq!(board.get(&id).unwrap().status(), Status::Deleted);

        assert_eq!(board.restore(&id).action(), Some(Action::Restored));
        let restored = board.get(&id).unwrap();
        assert_eq!(restored, &original);
        assert_eq!(restored.status(), Status::InProgress);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut board = notes();
        let id = created_id(board.create("Title", ""));

        assert!(board.delete(&id).is_changed());
        let once = board.records().to_vec();

        assert!(!board.delete(&id).is_changed());
        assert_eq!(board.records(), once.as_slice());
    }

    #[test]
    fn test_restore_only_from_deleted() {
        let mut board = notes();
        let id = created_id(board.create("Title", ""));

        assert!(!board.restore(&id).is_changed());
        board.toggle_archive(&id);
        assert!(!board.restore(&id).is_changed());
        assert_eq!(board.get(&id).unwrap().status(), Status::Archived);
    }

    #[test]
    fn test_toggle_archive_twice_returns_to_start() {
        let mut board = notes();
        let id = created_id(board.create("Title", ""));

        assert_eq!(board.toggle_archive(&id).action(), Some(Action::Archived));
        assert_eq!(board.get(&id).unwrap().status(), Status::Archived);

        assert_eq!(board.toggle_archive(&id).action(), Some(Action::Unarchived));
        assert_eq!(board.get(&id).unwrap().status(), Status::Active);
    }

    #[test]
    fn test_toggle_archive_on_deleted_is_noop() {
        let mut board = notes();
        let id = created_id(board.create("Title", ""));
        board.delete(&id);

        assert!(!board.toggle_archive(&id).is_changed());
        assert_eq!(board.get(&id).unwrap().status(), Status::Deleted);
    }

    #[test]
    fn test_archived_note_can_be_deleted_and_restores_to_active() {
        let mut board = notes();
        let id = created_id(board.create("Title", ""));
        board.toggle_archive(&id);

        assert!(board.delete(&id).is_changed());
        board.restore(&id);
        assert_eq!(board.get(&id).unwrap().status(), Status::Active);
    }

    #[test]
    fn test_complete_only_for_in_progress_tasks() {
        let mut board = tasks();
        let id = created_id(board.create("Task", ""));

        assert_eq!(board.complete(&id).action(), Some(Action::Completed));
        assert_eq!(board.get(&id).unwrap().status(), Status::Completed);
        assert!(!board.complete(&id).is_changed());

        // Completed tasks can still be deleted
        assert!(board.delete(&id).is_changed());
        assert!(!board.complete(&id).is_changed());
    }

    #[test]
    fn test_capabilities_follow_variant() {
        let mut board = tasks();
        let id = created_id(board.create("Task", ""));
        assert!(!board.toggle_archive(&id).is_changed());

        let mut board = notes();
        let id = created_id(board.create("Note", ""));
        assert!(!board.complete(&id).is_changed());
        assert_eq!(board.get(&id).unwrap().status(), Status::Active);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut board = notes();
        board.create("Title", "").unwrap();
        let before = board.records().to_vec();

        let missing = RecordId::from("nope");
        assert!(!board.delete(&missing).is_changed());
        assert!(!board.restore(&missing).is_changed());
        assert!(!board.toggle_archive(&missing).is_changed());
        assert!(!board.complete(&missing).is_changed());
        assert_eq!(board.records(), before.as_slice());
    }

    #[test]
    fn test_failed_save_keeps_change_and_reports_it() {
        let (mut board, _) = Board::open(Box::new(MemoryStore::with_quota(32)), Variant::Notes);

        let outcome = board
            .create("A title that will not fit in the quota", "")
            .unwrap();
        let change = outcome.change().unwrap();
        assert!(matches!(
            change.save_error,
            Some(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(
            outcome.notice(Variant::Notes),
            Some(Notice::error("Storage write failed"))
        );

        // In-memory state is authoritative and later operations still work
        assert_eq!(board.records().len(), 1);
        let id = change.id.clone();
        assert!(board.delete(&id).is_changed());
        assert_eq!(board.get(&id).unwrap().status(), Status::Deleted);
    }

    #[test]
    fn test_notices() {
        let mut board = tasks();
        let outcome = board.create("Task", "").unwrap();
        assert_eq!(
            outcome.notice(Variant::Tasks),
            Some(Notice::success("Task added"))
        );
        assert_eq!(Outcome::Unchanged.notice(Variant::Tasks), None);

        let id = outcome.change().unwrap().id.clone();
        assert_eq!(
            board.delete(&id).notice(Variant::Tasks),
            Some(Notice::success("Moved to trash"))
        );
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let mut board = notes();
        let id = created_id(board.dispatch(Command::Create {
            title: "Via command".to_string(),
            body: String::new(),
        }));

        let outcome = board.dispatch(Command::ToggleArchive(id.clone())).unwrap();
        assert_eq!(outcome.action(), Some(Action::Archived));

        let outcome = board.dispatch(Command::Delete(id.clone())).unwrap();
        assert_eq!(outcome.action(), Some(Action::Deleted));

        let outcome = board.dispatch(Command::Restore(id.clone())).unwrap();
        assert_eq!(outcome.action(), Some(Action::Restored));

        let err = board
            .dispatch(Command::Update {
                id,
                title: " ".to_string(),
                body: String::new(),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut board = tasks();
        let id = created_id(board.create("Buy milk", "2%"));
        let default = Query::new(StatusFilter::default_for(Variant::Tasks));

        assert_eq!(titles(&board, &default), vec!["Buy milk"]);

        board.delete(&id);
        assert!(board.query(&default).is_empty());
        assert_eq!(titles(&board, &Query::new(Status::Deleted)), vec!["Buy milk"]);

        board.restore(&id);
        assert_eq!(titles(&board, &default), vec!["Buy milk"]);
    }

    #[test]
    fn test_search_scenario() {
        let mut board = notes();
        board.create("A", "x").unwrap();
        board.create("B", "y").unwrap();

        assert_eq!(titles(&board, &Query::all().search("b")), vec!["B"]);
        assert_eq!(titles(&board, &Query::all()), vec!["B", "A"]);
    }

    #[test]
    fn test_board_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        let expected = {
            let backend = FileStore::open(temp_dir.path()).unwrap();
            let (mut board, report) = Board::open(Box::new(backend), Variant::Notes);
            assert_eq!(report, LoadReport::Missing);

            let first = created_id(board.create("One", "1"));
            board.create("Two", "2").unwrap();
            board.toggle_archive(&first);
            board.records().to_vec()
        };

        let backend = FileStore::open(temp_dir.path()).unwrap();
        let (board, report) = Board::open(Box::new(backend), Variant::Notes);
        assert_eq!(
            report,
            LoadReport::Loaded {
                count: 2,
                skipped: 0,
                backup_key: None,
            }
        );
        assert_eq!(board.records(), expected.as_slice());
    }

    #[test]
    fn test_unreadable_board_keeps_stored_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.json");
        let original: &[u8] = b"[{\"id\":\"1\",\"title\":\"caf\xe9\",\"status\":\"active\"}]";
        std::fs::write(&path, original).unwrap();

        let backend = FileStore::open(temp_dir.path()).unwrap();
        let (mut board, report) = Board::open(Box::new(backend), Variant::Notes);
        assert!(matches!(report, LoadReport::Reset { .. }));

        let outcome = board.create("New", "").unwrap();
        assert_eq!(
            outcome.notice(Variant::Notes),
            Some(Notice::error("Storage write failed"))
        );
        assert!(matches!(
            outcome.change().and_then(|c| c.save_error.as_ref()),
            Some(StorageError::WriteBlocked { .. })
        ));

        // The change still applies for the session
        assert_eq!(board.records()[0].title(), "New");
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_counts() {
        let mut board = notes();
        let a = created_id(board.create("A", ""));
        board.create("B", "").unwrap();
        board.toggle_archive(&a);

        let counts = board.counts();
        assert_eq!(counts.get(Status::Active), 1);
        assert_eq!(counts.get(Status::Archived), 1);
        assert_eq!(counts.total(), 2);
    }
}
