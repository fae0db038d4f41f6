//! molt status - report queue depth and the last run

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext) -> Result<()> {
    let queue = ctx.store.load_queue()?;
    let last_run = ctx.store.last_run()?;

    if ctx.robot {
        println!(
            "{}",
            serde_json::json!({
                "queued": queue.len(),
                "last_run": last_run.map(|ts| ts.to_rfc3339()),
                "state_dir": ctx.config.state_dir.display().to_string(),
            })
        );
    } else {
        println!("pending: {}", queue.len());
        match last_run {
            Some(ts) => println!("last run: {}", ts.to_rfc3339()),
            None => println!("last run: never"),
        }
    }
    Ok(())
}
