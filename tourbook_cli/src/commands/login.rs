//! `login` / `logout`: manage the vendor session token in the local store.

use anyhow::Result;
use clap::Args;

use super::{prompt, Context};

#[derive(Args)]
pub struct LoginArgs {
    /// Session token; asked for when omitted
    pub token: Option<String>,
}

pub fn run(args: &LoginArgs, ctx: &Context) -> Result<()> {
    let token = match &args.token {
        Some(token) => token.trim().to_string(),
        None => prompt("Token:")?,
    };
    ctx.store.set_token(&token)?;
    eprintln!("Logged in. Vendor commands will use the stored token.");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    if ctx.store.clear_token()? {
        eprintln!("Logged out.");
    } else {
        eprintln!("Not logged in.");
    }
    Ok(())
}
