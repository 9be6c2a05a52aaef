//! Interactive editing support
//!
//! Opens $EDITOR for editing a record's title and body.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::process::Command;

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("keeplist_edit_{}.md", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Render a record for editing: title on the first line, body below
pub fn compose(title: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{}\n", title)
    } else {
        format!("{}\n\n{}\n", title, body)
    }
}

/// Split edited text back into (title, body)
///
/// The first non-blank line is the title; everything after it is the body.
/// Lines starting with `<!--` are dropped.
pub fn split_edited(text: &str) -> (String, String) {
    let mut lines = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("<!--"))
        .skip_while(|line| line.trim().is_empty());

    let title = lines.next().unwrap_or("").trim().to_string();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (title, body)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable, or pass --title/--body.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_and_split() {
        let text = compose("Buy milk", "2%\nfrom the corner shop");
        assert_eq!(
            split_edited(&text),
            ("Buy milk".to_string(), "2%\nfrom the corner shop".to_string())
        );

        let text = compose("Title only", "");
        assert_eq!(split_edited(&text), ("Title only".to_string(), String::new()));
    }

    #[test]
    fn test_split_skips_comments_and_leading_blanks() {
        let text = "<!-- editing abc -->\n\n  Title  \n\nbody line\n";
        assert_eq!(
            split_edited(text),
            ("Title".to_string(), "body line".to_string())
        );
    }

    #[test]
    fn test_split_empty_text() {
        assert_eq!(split_edited("   \n\n"), (String::new(), String::new()));
    }

    #[test]
    fn test_command_exists() {
        // Random nonsense should not exist
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
