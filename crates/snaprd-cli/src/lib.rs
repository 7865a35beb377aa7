//! snaprd - snap metadata tools
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line frontend over the `snaprd-snap` crate: load an unpacked
//! snap and print what the daemon would know about it, or show every
//! filesystem location a snap identity maps to.

pub mod cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "snaprd")]
#[command(author, version, about = "snaprd - inspect snap metadata and derived paths")]
pub struct Cli {
    /// Derive all paths under this directory instead of /
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect an unpacked snap directory
    Inspect {
        /// Directory holding the unpacked snap, with meta/snap.yaml inside
        dir: PathBuf,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every path derived from a snap name and revision
    Paths {
        /// Snap name
        name: String,
        /// Revision: a store number like 42, or x1 for local builds
        revision: String,
        /// Include per-user paths under this home directory
        #[arg(long, value_name = "DIR")]
        home: Option<PathBuf>,
        /// Include the runtime directory for this user id
        #[arg(long, value_name = "N")]
        uid: Option<u32>,
    },
}
