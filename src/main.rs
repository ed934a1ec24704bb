use anyhow::Result;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;
use wmxdgmenu::cli::Cli;
use wmxdgmenu::commands::render::{self, RenderOptions};
use wmxdgmenu::{LOG_ENV, MenuContext, output};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("{} {e:#}", output::error_prefix());
        process::exit(1);
    }
}

/// Log to stderr, filtered by `WMXDGMENU_LOG` (default `warn`)
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = MenuContext::new()?;
    render::execute(&ctx, &RenderOptions::from(cli))
}
