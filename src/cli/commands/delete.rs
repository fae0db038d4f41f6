//! molt delete - drain the pending queue within the daily budget

use chrono::Utc;
use clap::Args;
use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::error::{MoltError, Result};
use crate::schedule;

/// External daily cap on delete calls.
pub const DAILY_DELETE_BUDGET: usize = 17;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Delete at most N posts this run (clamped to the daily budget)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    execute(ctx, args.limit)
}

pub fn execute(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    let mut queue = ctx.store.load_queue()?;
    if queue.is_empty() {
        info!("pending queue is empty; nothing to delete");
        if ctx.robot {
            println!(
                "{}",
                serde_json::json!({
                    "action": "delete",
                    "deleted": 0,
                    "failed": 0,
                    "remaining": 0,
                    "dry_run": ctx.dry_run,
                })
            );
        }
        return Ok(());
    }

    let today = Utc::now().date_naive();
    if !ctx.dry_run && schedule::daily_budget_spent(today, ctx.store.last_run_date()?) {
        return Err(MoltError::DailyBudgetSpent);
    }

    let budget = limit.unwrap_or(DAILY_DELETE_BUDGET).min(DAILY_DELETE_BUDGET);
    let client = ctx.api_client()?;

    let mut deleted = 0usize;
    let mut failed = 0usize;
    while deleted + failed < budget {
        let Some(id) = queue.front().map(str::to_string) else {
            break;
        };
        if ctx.dry_run {
            info!(%id, "would delete");
            queue.pop_front();
            deleted += 1;
            continue;
        }
        match client.delete_post(&id) {
            Ok(true) => {
                debug!(%id, "deleted");
                queue.pop_front();
                deleted += 1;
            }
            Ok(false) => {
                warn!(%id, "delete endpoint reported not deleted; dropping from queue");
                queue.pop_front();
                failed += 1;
            }
            Err(err) if err.aborts_batch() => {
                // The current ID stays queued; nothing after it was touched.
                ctx.store.save_queue(&queue)?;
                return Err(err);
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed; dropping from queue");
                queue.pop_front();
                failed += 1;
            }
        }
    }

    if !ctx.dry_run {
        ctx.store.save_queue(&queue)?;
        if deleted + failed > 0 {
            ctx.store.stamp_last_run(Utc::now())?;
        }
    }
    info!(deleted, failed, remaining = queue.len(), "delete pass complete");

    if ctx.robot {
        println!(
            "{}",
            serde_json::json!({
                "action": "delete",
                "deleted": deleted,
                "failed": failed,
                "remaining": queue.len(),
                "dry_run": ctx.dry_run,
            })
        );
    }
    Ok(())
}
