//! Filtering and search over a record collection
//!
//! Queries never mutate anything and are cheap enough (one linear scan)
//! to run after every change or keystroke.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{ParseNameError, Record, Status, Variant};

/// Which statuses a query includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every status
    #[default]
    All,
    /// Exactly one status
    Only(Status),
}

impl StatusFilter {
    /// Filter a board shows when first opened
    pub fn default_for(variant: Variant) -> Self {
        StatusFilter::Only(variant.default_status())
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>().map(StatusFilter::Only)
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

/// A status filter ANDed with a case-insensitive search term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filter: StatusFilter,
    needle: String,
}

impl Query {
    pub fn new(filter: impl Into<StatusFilter>) -> Self {
        Self {
            filter: filter.into(),
            needle: String::new(),
        }
    }

    /// Match every record
    pub fn all() -> Self {
        Self::new(StatusFilter::All)
    }

    /// Restrict to records whose title or body contains `term`
    ///
    /// The term is trimmed and compared case-insensitively; an empty term
    /// matches everything.
    pub fn search(mut self, term: &str) -> Self {
        self.needle = term.trim().to_lowercase();
        self
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// The normalized (trimmed, lowercased) search term
    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.filter.matches(record.status()) && self.matches_text(record)
    }

    fn matches_text(&self, record: &Record) -> bool {
        self.needle.is_empty()
            || record.title().to_lowercase().contains(&self.needle)
            || record.body().to_lowercase().contains(&self.needle)
    }
}

/// Run `query` over `records`, keeping their order
pub fn query_records<'a>(records: &'a [Record], query: &Query) -> Vec<&'a Record> {
    records.iter().filter(|r| query.matches(r)).collect()
}

/// Per-status totals for a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub in_progress: usize,
    pub active: usize,
    pub archived: usize,
    pub completed: usize,
    pub deleted: usize,
}

impl StatusCounts {
    pub fn tally(records: &[Record]) -> Self {
        let mut counts = Self::default();
        for record in records {
            *counts.slot(record.status()) += 1;
        }
        counts
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::InProgress => self.in_progress,
            Status::Active => self.active,
            Status::Archived => self.archived,
            Status::Completed => self.completed,
            Status::Deleted => self.deleted,
        }
    }

    pub fn total(&self) -> usize {
        Status::ALL.iter().map(|s| self.get(*s)).sum()
    }

    fn slot(&mut self, status: Status) -> &mut usize {
        match status {
            Status::InProgress => &mut self.in_progress,
            Status::Active => &mut self.active,
            Status::Archived => &mut self.archived,
            Status::Completed => &mut self.completed,
            Status::Deleted => &mut self.deleted,
        }
    }
}
