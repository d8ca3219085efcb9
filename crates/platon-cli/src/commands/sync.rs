//! Sync and preview command implementations

use std::path::Path;

use colored::Colorize;

use platon_core::SyncReport;
use platon_editor::{PanelState, PreviewPanels};

use crate::browser;
use crate::context::Context;
use crate::error::{CliError, Result};

fn print_report(report: &SyncReport) {
    println!("{} Syncing {}...", "=>".blue().bold(), report.resource_id);
    for warning in report.warnings() {
        println!("   {} {}", "warning:".yellow().bold(), warning);
    }
    if report.outcome.is_success() {
        println!("{} {}", "OK".green().bold(), report.outcome.message());
    } else {
        println!("{} {}", "FAILED".red().bold(), report.outcome.message());
    }
}

/// Sync the resource containing `path`, or every registered folder.
pub async fn run_sync(ctx: &Context, path: Option<&Path>, json: bool) -> Result<()> {
    let reports = match path {
        Some(path) => {
            let location = ctx.manager.locate(&std::path::absolute(path)?)?;
            vec![ctx.manager.sync(&location.id).await?]
        }
        None => ctx.manager.sync_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if reports.is_empty() {
        println!("No workspace folder registered. Run {} first.", "platon open <id>".cyan());
    } else {
        reports.iter().for_each(print_report);
    }

    let failed: Vec<_> = reports.iter().filter(|r| !r.outcome.is_success()).collect();
    match failed.as_slice() {
        [] => Ok(()),
        [single] => Err(CliError::user(single.outcome.message())),
        many => Err(CliError::user(format!(
            "{} of {} resources could not be synchronized",
            many.len(),
            reports.len()
        ))),
    }
}

/// Sync the resource containing `path`, then write its preview.
pub async fn run_preview(ctx: &Context, path: &Path, open: bool) -> Result<()> {
    let location = ctx.manager.locate(&std::path::absolute(path)?)?;

    let report = ctx.manager.sync(&location.id).await?;
    print_report(&report);

    let panels = PreviewPanels::new(ctx.storage().previews_dir(), ctx.settings.base_url.clone());
    let panel = panels.show(&location.id, &location.name)?;
    let verb = match panel.state {
        PanelState::Created => "Created",
        PanelState::Revealed => "Refreshed",
    };
    println!(
        "{} {} {}: {}",
        "OK".green().bold(),
        verb,
        panel.title,
        panel.path.display()
    );

    if open {
        browser::open(&panel.path.to_string_lossy())?;
    }
    Ok(())
}
