//! molt - scheduled cleanup of old posts within platform rate limits

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use molt::app::AppContext;
use molt::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        if cli.robot {
            // Robot mode: JSON error output to stdout
            let error_json = serde_json::json!({
                "error": true,
                "code": e.exit_code(),
                "message": e.to_string(),
            });
            println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> molt::Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    molt::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,molt=info",
        1 => "info,molt=debug",
        2 => "debug,molt=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
