// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailshot - localized email campaigns from a contacts CSV.
//!
//! This is the binary entry point.

mod list;
mod report;
mod send;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

/// Mailshot - send a localized email campaign to every pending contact.
#[derive(Parser, Debug)]
#[command(name = "mailshot", version, about, long_about = None)]
struct Cli {
    /// List the campaigns available under the campaigns root.
    #[arg(short, long, conflicts_with_all = ["campaign", "dry_run"])]
    list: bool,

    /// Campaign to send. Defaults to `campaigns.default` from the config.
    #[arg(short, long, value_name = "ID")]
    campaign: Option<String>,

    /// Render every pending contact without sending or touching the CSV.
    #[arg(long)]
    dry_run: bool,

    /// Read configuration from this file instead of the usual locations.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mailshot_config::load_and_validate_path(path),
        None => mailshot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mailshot_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    let root = Path::new(&config.campaigns.root);
    let result = if cli.list {
        list::run_list(root, cli.plain)
    } else {
        let campaign = cli.campaign.as_deref().unwrap_or(&config.campaigns.default);
        send::run_send(&config, campaign, cli.dry_run, cli.plain)
            .await
            .map(|_| ())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mailshot: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mailshot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
