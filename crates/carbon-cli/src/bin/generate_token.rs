//! Mint a bearer token for an existing carbon server account.

use anyhow::{Context, Result};
use carbon_cli::{generate_token, TokenConfig};
use clap::Parser;

/// Generate a JWT accepted by the carbon server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// User id (the server's `sub` claim)
    #[arg(long)]
    user_id: String,

    /// Account email
    #[arg(long)]
    email: String,

    /// Signing secret shared with the server
    #[arg(long, env = "CARBON_JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Token validity in minutes
    #[arg(long, default_value_t = 30)]
    expiry_minutes: i64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let token = generate_token(&TokenConfig {
        user_id: args.user_id,
        email: args.email,
        secret: args.secret,
        expiry_minutes: args.expiry_minutes,
    })
    .context("signing token")?;
    println!("{}", token);
    Ok(())
}
