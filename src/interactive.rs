//! Synchronous operator prompts
//!
//! The core components only return classifications and findings; this is
//! the one place that blocks on operator input. Commands call in here
//! between decisions, never the other way around.

use crate::folder::FolderSummary;
use console::style;
use dialoguer::{Confirm, Input};
use std::path::Path;

/// Disposition chosen for a classified folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderAction {
    /// Move the folder intact
    Accept,
    /// Move the folder intact under a new name
    Rename(String),
    /// Dissolve the folder, placing each file by its own date
    Ungroup,
    /// Leave the folder alone
    Skip,
}

/// Ask the operator what to do with one classified folder
pub fn prompt_folder_action(
    summary: &FolderSummary,
    year: i32,
    month: u32,
) -> anyhow::Result<FolderAction> {
    println!();
    println!("Folder: {}", style(&summary.name).cyan().bold());
    println!(
        "Target: {}/{:02}/  ({}-dominant)",
        year,
        month,
        summary.dominant.label()
    );
    println!("Files: {}", summary.media_count());

    let choice: String = Input::new()
        .with_prompt("[Enter]=accept | r=rename | u=ungroup | s=skip")
        .allow_empty(true)
        .interact_text()?;

    let action = match choice.trim().to_lowercase().as_str() {
        "r" => {
            let new_name: String = Input::new()
                .with_prompt("New folder name")
                .default(summary.name.clone())
                .interact_text()?;
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() || new_name == summary.name {
                FolderAction::Accept
            } else {
                FolderAction::Rename(new_name)
            }
        }
        "u" => FolderAction::Ungroup,
        "s" => FolderAction::Skip,
        _ => FolderAction::Accept,
    };

    Ok(action)
}

/// Ask the operator whether one flagged file should be deleted
pub fn confirm_delete(path: &Path, issue: &str) -> anyhow::Result<bool> {
    println!();
    println!("File: {}", style(path.display()).cyan());
    println!("Issue: {}", issue);

    let confirmed = Confirm::new()
        .with_prompt("Delete this file?")
        .default(false)
        .interact()?;

    Ok(confirmed)
}
