//! `depload load`: run one load cycle for a manifest.

use anyhow::{Context, Result};
use depload_core::config::DeploadConfig;
use depload_core::{ClasspathLoader, Coordinator, LoaderBridge, NativeLoader};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::LoaderKind;

#[derive(Debug)]
pub struct LoadArgs {
    pub manifest: PathBuf,
    pub cache_dir: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
    pub loader: LoaderKind,
}

pub async fn run_load(mut cfg: DeploadConfig, args: LoadArgs) -> Result<()> {
    if let Some(dir) = args.cache_dir {
        cfg.cache_dir = dir;
    }
    if let Some(n) = args.max_concurrent {
        cfg.max_concurrent_fetches = Some(n);
    }

    let forest = super::read_manifest(&args.manifest)?;
    let classpath = Arc::new(ClasspathLoader::new());
    // Native libraries stay loaded only while the loader is alive, i.e. for
    // the rest of this process.
    let loader: Arc<dyn LoaderBridge> = match args.loader {
        LoaderKind::Classpath => classpath.clone(),
        LoaderKind::Native => Arc::new(NativeLoader::new()),
    };

    let coordinator = Coordinator::from_config(&cfg, loader);
    let report = coordinator
        .load(&forest)
        .await
        .with_context(|| format!("load {}", args.manifest.display()))?;

    println!(
        "loaded {} of {} ({} downloaded, {} already loaded)",
        report.loaded.len(),
        report.requested,
        report.downloaded,
        report.skipped.len()
    );
    for name in &report.loaded {
        println!("  {}", name);
    }
    if args.loader == LoaderKind::Classpath {
        let joined = classpath.classpath().context("join classpath")?;
        println!("classpath: {}", joined.to_string_lossy());
    }
    Ok(())
}
