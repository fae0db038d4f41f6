pub mod authorize;
pub mod delete;
pub mod init;
pub mod retrieve;
pub mod run;
pub mod status;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::run(ctx, args),
        Commands::Retrieve(args) => retrieve::run(ctx, args),
        Commands::Delete(args) => delete::run(ctx, args),
        Commands::Init(args) => init::run(ctx, args),
        Commands::Status => status::run(ctx),
        Commands::Authorize => authorize::run(ctx),
    }
}
