//! Folders command implementation

use colored::Colorize;
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;

#[derive(Serialize)]
struct FolderEntry {
    id: Option<String>,
    name: String,
    path: String,
}

/// List the registered workspace folders.
pub fn run_folders(ctx: &Context, json: bool) -> Result<()> {
    let state = ctx.manager.session().load()?;
    let entries: Vec<FolderEntry> = state
        .folders
        .iter()
        .map(|folder| FolderEntry {
            id: folder.resource_id(),
            name: folder.name.clone(),
            path: folder.path.display().to_string(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some(user) = &state.user {
        println!("Logged in as {}", user.username.bold());
    }
    if entries.is_empty() {
        println!("No workspace folder registered.");
    }
    for entry in entries {
        println!(
            "{} {} {}",
            entry.id.unwrap_or_default().cyan(),
            entry.name.bold(),
            entry.path.dimmed()
        );
    }
    Ok(())
}
