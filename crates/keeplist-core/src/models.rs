//! Data models for keeplist
//!
//! Defines the core data structures: Record, RecordId, Status and Variant.
//! A board is either a task board or a note board; both share the same
//! record shape and differ only in which statuses are legal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque record identifier
///
/// New ids are random UUIDs. Ids read back from storage are kept verbatim,
/// so older timestamp-style ids keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used in listings (first 8 characters)
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Open task (task boards)
    InProgress,
    /// Live note (note boards)
    Active,
    /// Archived note
    Archived,
    /// Finished task
    Completed,
    /// Soft-deleted; restorable
    Deleted,
}

impl Status {
    /// Every status, in display order
    pub const ALL: [Status; 5] = [
        Status::InProgress,
        Status::Active,
        Status::Archived,
        Status::Completed,
        Status::Deleted,
    ];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InProgress => "in-progress",
            Status::Active => "active",
            Status::Archived => "archived",
            Status::Completed => "completed",
            Status::Deleted => "deleted",
        }
    }

    /// Human label ("in progress" rather than "in-progress")
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status or variant name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseNameError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

impl FromStr for Status {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted || status.label() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Status::ALL.iter().map(Status::as_str).collect();
                ParseNameError::new("status", s, &names)
            })
    }
}

/// Board flavour: which status vocabulary a collection uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Task tracker: in-progress → completed, soft delete
    Tasks,
    /// Note board: active ↔ archived, soft delete
    #[default]
    Notes,
}

impl Variant {
    /// Name used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Tasks => "tasks",
            Variant::Notes => "notes",
        }
    }

    /// Key under which the collection is persisted
    pub fn storage_key(&self) -> &'static str {
        self.as_str()
    }

    /// Status given to new and restored records
    pub fn default_status(&self) -> Status {
        match self {
            Variant::Tasks => Status::InProgress,
            Variant::Notes => Status::Active,
        }
    }

    /// Statuses legal for this variant
    pub fn statuses(&self) -> &'static [Status] {
        match self {
            Variant::Tasks => &[Status::InProgress, Status::Completed, Status::Deleted],
            Variant::Notes => &[Status::Active, Status::Archived, Status::Deleted],
        }
    }

    pub fn allows(&self, status: Status) -> bool {
        self.statuses().contains(&status)
    }

    pub fn supports_archive(&self) -> bool {
        self.allows(Status::Archived)
    }

    pub fn supports_complete(&self) -> bool {
        self.allows(Status::Completed)
    }

    /// Singular noun for messages ("Task", "Note")
    pub fn noun(&self) -> &'static str {
        match self {
            Variant::Tasks => "Task",
            Variant::Notes => "Note",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tasks" | "task" => Ok(Variant::Tasks),
            "notes" | "note" => Ok(Variant::Notes),
            _ => Err(ParseNameError::new("variant", s, &["tasks", "notes"])),
        }
    }
}

/// A single task or note
///
/// Fields are only writable inside the crate; every change goes through
/// [`Board`](crate::Board) so status transitions stay legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub(crate) id: RecordId,
    pub(crate) title: String,
    /// Older task boards stored this as `description`, note boards as `content`
    #[serde(
        default,
        alias = "description",
        alias = "content",
        deserialize_with = "null_as_empty"
    )]
    pub(crate) body: String,
    pub(crate) status: Status,
    pub(crate) created_at: DateTime<Utc>,
}

impl Record {
    pub(crate) fn new(
        id: RecordId,
        title: impl Into<String>,
        body: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            status,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Status::Deleted
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_generate_is_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn test_record_id_short_on_legacy_id() {
        let id = RecordId::from("1718000000000");
        assert_eq!(id.short(), "17180000");

        let tiny = RecordId::from("42");
        assert_eq!(tiny.short(), "42");
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(Status::InProgress.label(), "in progress");
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("ARCHIVED".parse::<Status>().unwrap(), Status::Archived);
        assert!("trashed".parse::<Status>().is_err());
    }

    #[test]
    fn test_variant_vocabularies() {
        assert_eq!(Variant::Tasks.default_status(), Status::InProgress);
        assert_eq!(Variant::Notes.default_status(), Status::Active);

        assert!(Variant::Tasks.supports_complete());
        assert!(!Variant::Tasks.supports_archive());
        assert!(Variant::Notes.supports_archive());
        assert!(!Variant::Notes.supports_complete());

        assert!(!Variant::Notes.allows(Status::InProgress));
        assert!(Variant::Notes.allows(Status::Deleted));
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("tasks".parse::<Variant>().unwrap(), Variant::Tasks);
        assert_eq!("Note".parse::<Variant>().unwrap(), Variant::Notes);
        let err = "todo".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("tasks, notes"));
    }

    #[test]
    fn test_record_reads_legacy_task_json() {
        let json = r#"{
            "id": "1718000000000",
            "title": "Buy milk",
            "description": "2%",
            "status": "in-progress",
            "createdAt": "2024-06-10T06:13:20.000Z"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id().as_str(), "1718000000000");
        assert_eq!(record.body(), "2%");
        assert_eq!(record.status(), Status::InProgress);
    }

    #[test]
    fn test_record_reads_legacy_note_json() {
        let json = r#"{
            "id": "1718000000001",
            "title": "Idea",
            "content": "write it down",
            "status": "archived",
            "createdAt": "2024-06-10T06:13:20.000Z"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.body(), "write it down");
        assert_eq!(record.status(), Status::Archived);
    }

    #[test]
    fn test_record_missing_or_null_body() {
        let json = r#"{"id":"1","title":"T","status":"active","createdAt":"2024-06-10T06:13:20Z"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.body(), "");

        let json = r#"{"id":"1","title":"T","body":null,"status":"active","createdAt":"2024-06-10T06:13:20Z"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.body(), "");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = Record::new(RecordId::from("abc"), "Title", "Body", Status::Active);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["body"], "Body");
        assert_eq!(value["status"], "active");
        assert!(value.get("createdAt").is_some());
    }
}
