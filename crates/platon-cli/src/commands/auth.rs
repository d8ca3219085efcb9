//! Connect and callback command implementations

use colored::Colorize;

use platon_core::{AuthFlow, login_url, parse_callback};

use crate::browser;
use crate::context::Context;
use crate::error::Result;

/// Print the login URL and open it unless told not to.
pub fn run_connect(ctx: &Context, no_browser: bool) -> Result<()> {
    let url = login_url(&ctx.settings)?;

    println!("{} Authentication in progress...", "=>".blue().bold());
    println!("   Log in at: {}", url.cyan());
    println!(
        "   Then run {} with the URI you are redirected to.",
        "platon callback <uri>".cyan()
    );

    if !no_browser {
        if let Err(e) = browser::open(&url) {
            tracing::warn!(error = %e, "Could not open the browser");
        }
    }
    Ok(())
}

/// Finish the authentication from the redirect URI.
pub async fn run_callback(ctx: &Context, uri: &str) -> Result<()> {
    let params = parse_callback(uri).map_err(platon_core::Error::from)?;

    println!("{} Authentication in progress...", "=>".blue().bold());
    let outcome = AuthFlow::new(ctx.secrets.clone(), &ctx.manager)
        .complete(params)
        .await?;

    println!("{} {}", "OK".green().bold(), outcome.welcome);
    if let Some(copy) = outcome.acquired {
        println!(
            "   Opened {} at {}",
            copy.resource.name.bold(),
            copy.path.display()
        );
    }
    Ok(())
}
