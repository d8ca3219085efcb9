//! Language feature commands for .ple files

use std::path::Path;

use colored::Colorize;

use platon_editor::{
    DocumentLink, LinkTarget, Position, completions, documentation_links, hover_at,
    reference_links,
};
use platon_fs::io;

use crate::context::Context;
use crate::error::Result;

/// Print the documentation links and, inside a working copy, the file links.
pub fn run_links(ctx: &Context, file: &Path, json: bool) -> Result<()> {
    let text = io::read_text(file)?;
    let mut links = documentation_links(&text, &ctx.settings.docs_url);

    match ctx.manager.locate(&std::path::absolute(file)?) {
        Ok(location) => links.extend(reference_links(&text, &location)),
        Err(e) => tracing::debug!(error = %e, "No file links outside a workspace folder"),
    }
    links.sort_by_key(|link| link.range.start);

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        links.iter().for_each(print_link);
    }
    Ok(())
}

fn print_link(link: &DocumentLink) {
    let target = match &link.target {
        LinkTarget::Url(url) => url.clone(),
        LinkTarget::File(path) => path.display().to_string(),
    };
    println!(
        "{}:{}-{}:{} {}",
        link.range.start.line,
        link.range.start.character,
        link.range.end.line,
        link.range.end.character,
        target.cyan()
    );
}

/// Print the documentation of the keyword at `line:column`.
pub fn run_hover(ctx: &Context, file: &Path, line: u32, column: u32, json: bool) -> Result<()> {
    let text = io::read_text(file)?;
    let hover = hover_at(&text, Position::new(line, column), &ctx.settings.docs_url);

    match (hover, json) {
        (hover, true) => println!("{}", serde_json::to_string_pretty(&hover)?),
        (Some(hover), false) => println!("{}", hover.contents),
        (None, false) => {}
    }
    Ok(())
}

pub fn run_complete(json: bool) -> Result<()> {
    let items = completions();
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in items {
            println!("{} {}", item.label.bold(), item.detail.dimmed());
        }
    }
    Ok(())
}
