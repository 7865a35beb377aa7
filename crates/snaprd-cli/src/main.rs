//! snaprd - inspect snap metadata and derived paths

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snaprd_cli::cmd;
use snaprd_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Some(root) = &cli.root {
        tracing::debug!("re-rooting under {}", root.display());
        snaprd_dirs::set_root(root);
    }

    // Loads that sanitize get the same interface checks `inspect` applies.
    snaprd_snap::set_sanitize_plugs_slots(cmd::inspect::sanitize_interfaces);

    match cli.command {
        Commands::Inspect { dir, json } => cmd::inspect::inspect(&dir, json),
        Commands::Paths {
            name,
            revision,
            home,
            uid,
        } => cmd::paths::paths(&name, &revision, home.as_deref(), uid),
    }
}
