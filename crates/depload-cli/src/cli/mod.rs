//! CLI for the depload runtime dependency loader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use depload_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_flatten, run_load, run_prune, LoadArgs};

/// Top-level CLI for depload.
#[derive(Debug, Parser)]
#[command(name = "depload")]
#[command(about = "depload: fetch, verify and load runtime dependencies", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/depload/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// How `load` hands cached artifacts to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoaderKind {
    /// Open each artifact as a shared library.
    Native,
    /// Collect artifact paths into a search path and print it.
    Classpath,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch, verify and register every dependency in a manifest.
    Load {
        /// Path to the JSON dependency manifest.
        manifest: PathBuf,
        /// Cache root (overrides config `cache_dir`).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
        /// Maximum artifact fetches in flight (overrides config; 0 = unbounded).
        #[arg(long, value_name = "N")]
        max_concurrent: Option<usize>,
        /// Loader the cached artifacts are registered with.
        #[arg(long, value_enum, default_value = "classpath")]
        loader: LoaderKind,
    },

    /// Print the flattened manifest, one group:name:version per line.
    Flatten {
        /// Path to the JSON dependency manifest.
        manifest: PathBuf,
        /// Print in load order (sorted by name) instead of manifest pre-order.
        #[arg(long)]
        sorted: bool,
    },

    /// Print the manifest with ignored coordinates and their subtrees removed.
    Prune {
        /// Path to the JSON dependency manifest.
        manifest: PathBuf,
        /// Coordinate to drop, as group:name. Repeatable.
        #[arg(long, value_name = "GROUP:NAME")]
        ignore: Vec<String>,
    },

    /// Print the digest of a file in sidecar format.
    Checksum {
        /// Path to the file.
        path: PathBuf,
        /// Digest algorithm: md5 or sha256.
        #[arg(long, default_value = "md5")]
        algorithm: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Load {
                manifest,
                cache_dir,
                max_concurrent,
                loader,
            } => {
                let cfg = match &cli.config {
                    Some(path) => config::load_from_path(path)?,
                    None => config::load_or_init()?,
                };
                tracing::debug!("loaded config: {:?}", cfg);
                let args = LoadArgs {
                    manifest,
                    cache_dir,
                    max_concurrent,
                    loader,
                };
                run_load(cfg, args).await?;
            }
            CliCommand::Flatten { manifest, sorted } => run_flatten(&manifest, sorted)?,
            CliCommand::Prune { manifest, ignore } => run_prune(&manifest, &ignore)?,
            CliCommand::Checksum { path, algorithm } => run_checksum(&path, &algorithm)?,
        }

        Ok(())
    }
}
