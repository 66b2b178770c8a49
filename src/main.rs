//! # srcview CLI
//!
//! Serves a local source tree over HTTP: substring search across every text
//! file under the root, plus a browsable tree with syntax-highlighted file
//! views.
//!
//! ## Usage
//!
//! ```bash
//! srcview --root ./my-project
//! srcview --root ./my-project --bind 127.0.0.1:9000 --exclude 'target/**'
//! ```
//!
//! The root directory is required; the process exits with an error if it is
//! missing or not a directory. Log verbosity follows `RUST_LOG` and defaults
//! to `info`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use srcview::server::{self, ServeConfig};
use srcview::walk;

/// srcview — search and browse a local source tree over HTTP.
#[derive(Parser)]
#[command(
    name = "srcview",
    about = "Search and browse a local source tree over HTTP",
    version
)]
struct Cli {
    /// Root directory of the source tree to serve.
    #[arg(long)]
    root: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Root-relative glob to exclude from search, e.g. 'target/**'.
    /// Repeatable. `.git` directories are always excluded.
    #[arg(long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("root directory not accessible: {}", cli.root.display()))?;
    if !root.is_dir() {
        bail!("root is not a directory: {}", root.display());
    }

    let excludes = walk::build_excludes(&cli.excludes).context("invalid --exclude pattern")?;

    server::run_server(ServeConfig {
        root,
        bind: cli.bind,
        excludes,
    })
    .await
}
