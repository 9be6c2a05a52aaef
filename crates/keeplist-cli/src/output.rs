//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use keeplist_core::{Notice, NoticeLevel, Query, Record, Status, StatusCounts, StatusFilter, Variant};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single record
    pub fn print_record(&self, record: &Record) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", record.id());
                println!("Title:   {}", record.title());
                println!("Status:  {}", record.status().label());
                println!("Created: {}", format_date(&record.created_at().with_timezone(&Local)));
                println!();
                if record.body().is_empty() {
                    println!("(no description)");
                } else {
                    println!("{}", record.body());
                }
            }
            OutputFormat::Json => print_json(record),
            OutputFormat::Quiet => println!("{}", record.id()),
        }
    }

    /// Print the result of a query
    pub fn print_records(&self, records: &[&Record], variant: Variant, query: &Query) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    let (title, hint) = empty_state(variant, query);
                    println!("{}", title);
                    println!("{}", hint);
                    return;
                }
                for record in records {
                    println!(
                        "{} | {:<11} | {} | {}",
                        record.id().short(),
                        record.status().label(),
                        truncate(record.title(), 35),
                        truncate_line(record.body(), 40)
                    );
                }
                println!("\n{} {}(s)", records.len(), variant.noun().to_lowercase());
            }
            OutputFormat::Json => print_json(&records),
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.id());
                }
            }
        }
    }

    /// Print per-status totals for a board
    pub fn print_counts(&self, variant: Variant, counts: &StatusCounts, location: &str) {
        match self.format {
            OutputFormat::Human => {
                println!("Board:   {}", variant);
                println!("Storage: {}", location);
                println!();
                for status in variant.statuses() {
                    println!("  {:<12} {}", status.label(), counts.get(*status));
                }
                println!("  {:<12} {}", "total", counts.total());
            }
            OutputFormat::Json => {
                let by_status: serde_json::Map<String, serde_json::Value> = variant
                    .statuses()
                    .iter()
                    .map(|s| (s.as_str().to_string(), counts.get(*s).into()))
                    .collect();
                print_json(&serde_json::json!({
                    "variant": variant.as_str(),
                    "storage": location,
                    "counts": by_status,
                    "total": counts.total(),
                }));
            }
            OutputFormat::Quiet => println!("{}", counts.total()),
        }
    }

    /// Print a notice from a lifecycle operation
    pub fn notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => self.success(&notice.message),
            NoticeLevel::Error => self.error(&notice.message),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an error message (always shown, on stderr)
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "error", "message": message})
                );
            }
            _ => eprintln!("✗ {}", message),
        }
    }

    /// Print a warning on stderr unless quiet
    pub fn warning(&self, message: &str) {
        if self.format != OutputFormat::Quiet {
            eprintln!("⚠ {}", message);
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("✗ Failed to encode output: {}", e),
    }
}

/// Headline and hint shown when a query returns nothing
fn empty_state(variant: Variant, query: &Query) -> (String, String) {
    let plural = format!("{}s", variant.noun().to_lowercase());

    if !query.term().is_empty() {
        return (
            format!("No {} match '{}'", plural, query.term()),
            "Try a different search".to_string(),
        );
    }

    match query.filter() {
        StatusFilter::Only(status) if status == variant.default_status() => (
            format!("No {} yet", plural),
            "Create one to get started".to_string(),
        ),
        StatusFilter::Only(Status::Archived) => (
            "Nothing archived".to_string(),
            format!("Archive {} to store them", plural),
        ),
        StatusFilter::Only(Status::Completed) => (
            "Nothing completed".to_string(),
            format!("Completed {} show up here", plural),
        ),
        StatusFilter::Only(Status::Deleted) => (
            "Trash is empty".to_string(),
            format!("Deleted {} go here", plural),
        ),
        _ => (
            format!("No {}", plural),
            "Try adding or changing filter".to_string(),
        ),
    }
}

/// Format a timestamp like "Mar 5, 2024, 10:30 AM"
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
