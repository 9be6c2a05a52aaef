//! Status command handler

use anyhow::Result;

use keeplist_core::{Board, Config};

use crate::output::Output;

/// Show per-status totals for the open board
pub fn show(board: &Board, config: &Config, in_memory: bool, output: &Output) -> Result<()> {
    let location = if in_memory {
        "memory (not persisted)".to_string()
    } else {
        config.board_path(board.variant()).display().to_string()
    };

    output.print_counts(board.variant(), &board.counts(), &location);
    Ok(())
}
