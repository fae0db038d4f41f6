//! molt authorize - PIN-based token setup
//!
//! Walks the out-of-band OAuth 1.0a dance and prints the environment lines
//! the scheduled runs need. No state files are touched.

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::app::AppContext;
use crate::error::{MoltError, Result};

pub fn run(ctx: &AppContext) -> Result<()> {
    let client = ctx.consumer_client()?;
    let request = client.fetch_request_token()?;

    println!("Authorize this application, then enter the PIN shown:");
    println!("  {}", client.authorize_url(&request.token));
    print!("PIN: ");
    io::stdout().flush()?;

    let mut pin = String::new();
    io::stdin().lock().read_line(&mut pin)?;
    let pin = pin.trim();
    if pin.is_empty() {
        return Err(MoltError::Config("empty PIN".to_string()));
    }

    let access = client.fetch_access_token(&request, pin)?;
    if let Some(screen_name) = &access.screen_name {
        info!(%screen_name, "authorized");
    }

    println!();
    println!("Add these to the environment of the scheduled runs:");
    println!("MOLT_ACCESS_TOKEN={}", access.token);
    println!("MOLT_ACCESS_TOKEN_SECRET={}", access.secret);
    Ok(())
}
