//! molt retrieve - page the timeline into the pending queue

use chrono::Utc;
use clap::Args;
use tracing::{debug, info};

use crate::api::PAGE_SIZE;
use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Stop after this many fetched posts (defaults to the configured cap)
    #[arg(long, value_name = "N")]
    pub max_posts: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &RetrieveArgs) -> Result<()> {
    execute(ctx, args.max_posts)
}

pub fn execute(ctx: &AppContext, max_posts: Option<usize>) -> Result<()> {
    let client = ctx.api_client()?;
    let user_id = match &ctx.config.user_id {
        Some(id) => id.clone(),
        None => client.verify_credentials()?.id,
    };
    let cap = max_posts.unwrap_or(ctx.config.fetch_cap);

    let mut queue = ctx.store.load_queue()?;
    let before = queue.len();
    let mut fetched = 0usize;
    let mut page_token: Option<String> = None;

    // The queue is persisted after every page so a failure mid-pagination
    // keeps the pages already fetched.
    while fetched < cap {
        let page = client.user_timeline(&user_id, page_token.as_deref(), PAGE_SIZE)?;
        if page.ids.is_empty() {
            break;
        }
        let mut ids = page.ids;
        if fetched + ids.len() > cap {
            ids.truncate(cap - fetched);
        }
        fetched += ids.len();
        let added = queue.append_unique(ids);
        debug!(added, fetched, "page merged");
        if !ctx.dry_run {
            ctx.store.save_queue(&queue)?;
        }
        match page.next_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    let added = queue.len() - before;
    if ctx.dry_run {
        info!(fetched, added, "dry-run: queue and marker left untouched");
    } else {
        ctx.store.stamp_last_run(Utc::now())?;
    }
    info!(fetched, added, queued = queue.len(), "retrieval complete");

    if ctx.robot {
        println!(
            "{}",
            serde_json::json!({
                "action": "retrieve",
                "fetched": fetched,
                "added": added,
                "queued": queue.len(),
                "dry_run": ctx.dry_run,
            })
        );
    }
    Ok(())
}
