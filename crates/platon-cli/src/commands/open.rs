//! Open command implementation

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Acquire the working copy of `id`.
pub async fn run_open(ctx: &Context, id: &str) -> Result<()> {
    let copy = ctx.manager.acquire(id).await?;

    let verb = if copy.reused { "Reusing" } else { "Cloned" };
    println!(
        "{} {} {} at {}",
        "OK".green().bold(),
        verb,
        copy.resource.name.bold(),
        copy.path.display()
    );
    Ok(())
}
