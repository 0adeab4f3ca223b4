//! Interactive OAuth authorization.
//!
//! Prints the consent URL, reads the authorization code pasted back by the
//! user and saves the resulting token where `serve` expects it.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use drive_core::auth::{DRIVE_SCOPE, OAuthConfig};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::config::Config;

const STATE_TOKEN: &str = "state-token";

/// Run the `auth` subcommand
pub async fn run(config: &Config) -> Result<()> {
    let secret_path = &config.auth.client_secret_path;
    let oauth = OAuthConfig::from_file(secret_path, DRIVE_SCOPE)
        .with_context(|| format!("unable to read client secret file {:?}", secret_path))?;

    let url = oauth.auth_code_url(STATE_TOKEN)?;
    println!("{} Open this link in your browser and authorize access:", "→".cyan());
    println!("\n  {}\n", url);
    print!("Authorization code: ");
    io::stdout().flush()?;

    let code = read_code(io::stdin().lock())?;
    let token = oauth
        .exchange_code(&code)
        .await
        .context("unable to retrieve token from web")?;

    let token_path = &config.auth.token_path;
    token.write_to_file(token_path)?;
    info!("Saved token to {:?}", token_path);
    println!("{} Token saved to {}", "✓".green(), token_path.display());
    Ok(())
}

/// Read one line holding the authorization code
fn read_code(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("unable to read authorization code")?;
    let code = line.trim();
    if code.is_empty() {
        bail!("no authorization code entered");
    }
    Ok(code.to_string())
}
