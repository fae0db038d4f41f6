//! molt init - one-time bootstrap

use clap::Args;
use tracing::info;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Bootstrap again even if a previous run is on record
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    if ctx.store.last_run()?.is_some() && !args.force {
        info!("already initialized; use --force to bootstrap again");
        return Ok(());
    }
    execute(ctx)
}

/// Verifies credentials, materializes the state files, and runs one
/// retrieval pass to seed the queue.
pub fn execute(ctx: &AppContext) -> Result<()> {
    let client = ctx.api_client()?;
    let identity = client.verify_credentials()?;
    info!(username = %identity.username, id = %identity.id, "credentials verified");

    let queue = ctx.store.load_queue()?;
    if !ctx.dry_run {
        ctx.store.save_queue(&queue)?;
    }

    super::retrieve::execute(ctx, None)
}
