//! molt run - one scheduled pass

use chrono::Utc;
use clap::Args;
use tracing::info;

use crate::app::AppContext;
use crate::error::Result;
use crate::schedule::{self, Action, Mode};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Operation mode; auto picks from the calendar
    #[arg(long, value_enum, env = "MOLT_MODE", default_value_t = Mode::Auto)]
    pub mode: Mode,
}

pub fn run(ctx: &AppContext, args: &RunArgs) -> Result<()> {
    let today = Utc::now().date_naive();
    let last_run = ctx.store.last_run_date()?;
    let action = schedule::select_action(args.mode, today, last_run);
    info!(mode = %args.mode, ?action, "selected action");

    match action {
        Action::Retrieve => super::retrieve::execute(ctx, None),
        Action::Delete => super::delete::execute(ctx, None),
        Action::Initialize => super::init::execute(ctx),
    }
}
