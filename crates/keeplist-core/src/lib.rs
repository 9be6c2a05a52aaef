//! keeplist Core Library
//!
//! This crate provides the core of keeplist, a small local-first board for
//! tasks or notes. Records are soft-deleted rather than removed, notes can
//! be archived, tasks can be completed, and every change is persisted to a
//! local key-value store.
//!
//! # Architecture
//!
//! - **Board**: lifecycle operations; the only code that mutates records
//! - **RecordStore**: the ordered collection and its JSON round-trip
//! - **Query**: status filter + case-insensitive search over the collection
//!
//! # Quick Start
//!
//! ```text
//! let backend = FileStore::open(config.data_dir)?;
//! let (mut board, _report) = Board::open(Box::new(backend), Variant::Notes);
//!
//! // Add a note
//! board.create("Buy milk", "2%")?;
//!
//! // Query notes
//! let active = board.query(&Query::new(Status::Active).search("milk"));
//! ```
//!
//! # Modules
//!
//! - `board`: Lifecycle operations and command dispatch (main entry point)
//! - `models`: Records, ids, statuses and board variants
//! - `query`: Filtering, search and per-status counts
//! - `store`: In-memory collection and persistence round-trip
//! - `storage`: Key-value backends (file, memory)
//! - `config`: Application configuration

pub mod board;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

pub use board::{Action, Board, Change, Command, Notice, NoticeLevel, Outcome, ValidationError};
pub use config::Config;
pub use models::{ParseNameError, Record, RecordId, Status, Variant};
pub use query::{query_records, Query, StatusCounts, StatusFilter};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use store::{LoadReport, RecordStore};
