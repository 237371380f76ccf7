//! Load cycle: flatten, claim, fetch concurrently, register, report.
//!
//! manifest → flatten → sort by name → claim (sequential) → one fetch task per
//! claimed artifact → cache check / download on the blocking pool → serialized
//! loader registration → barrier → sorted loaded summary.

mod claim;
mod register;

pub use claim::{claim_in_order, ClaimPlan};

use std::io::Read;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cache::{ArtifactCache, CacheOutcome};
use crate::config::DeploadConfig;
use crate::error::LoadError;
use crate::loader::LoaderBridge;
use crate::manifest::{self, DependencyNode, FlatArtifact};
use crate::registry::ClaimRegistry;

use self::register::Registrar;

/// Summary of one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Names of artifacts fetched or verified and registered, sorted ascending.
    pub loaded: Vec<String>,
    /// `group:name` keys skipped because they were already claimed.
    pub skipped: Vec<String>,
    /// Length of the flattened manifest.
    pub requested: usize,
    /// Fetch tasks spawned (one per newly claimed artifact).
    pub scheduled: usize,
    /// Artifacts whose file was (re)downloaded rather than taken from the cache.
    pub downloaded: usize,
}

/// Runs load cycles against one cache, registry and loader.
pub struct Coordinator {
    cache: Arc<ArtifactCache>,
    registry: Arc<ClaimRegistry>,
    loader: Arc<dyn LoaderBridge>,
    max_concurrent: Option<usize>,
}

impl Coordinator {
    /// Coordinator using the process-wide claim registry and no concurrency cap.
    pub fn new(cache: ArtifactCache, loader: Arc<dyn LoaderBridge>) -> Self {
        Self {
            cache: Arc::new(cache),
            registry: ClaimRegistry::global(),
            loader,
            max_concurrent: None,
        }
    }

    pub fn from_config(cfg: &DeploadConfig, loader: Arc<dyn LoaderBridge>) -> Self {
        Self::new(ArtifactCache::from_config(cfg), loader)
            .with_max_concurrent(cfg.max_concurrent_fetches)
    }

    /// Use a private registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<ClaimRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Cap on fetch tasks in flight. `None` (or 0) means unbounded.
    pub fn with_max_concurrent(mut self, max: Option<usize>) -> Self {
        self.max_concurrent = max.filter(|n| *n > 0);
        self
    }

    pub fn registry(&self) -> &Arc<ClaimRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Parses a manifest stream and loads it. A malformed stream fails before
    /// anything is claimed or fetched.
    pub async fn load_reader<R: Read>(&self, reader: R) -> Result<LoadReport, LoadError> {
        let forest = manifest::parse_manifest(reader)?;
        self.load(&forest).await
    }

    /// Loads every artifact in `forest` that no earlier cycle has claimed.
    ///
    /// Waits for every fetch task before returning. If any artifact fails, its
    /// claim is released, the failure is logged, and the first failure is
    /// returned once all tasks are done; there is no partial-success result.
    pub async fn load(&self, forest: &[DependencyNode]) -> Result<LoadReport, LoadError> {
        tracing::info!("loading dependencies");
        let artifacts = manifest::flatten(forest);
        let requested = artifacts.len();
        let plan = claim_in_order(&self.registry, artifacts);
        let scheduled = plan.scheduled.len();

        let (registrar, registration) = register::spawn(Arc::clone(&self.loader));
        let permits = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let mut join_set = JoinSet::new();

        for artifact in plan.scheduled {
            let cache = Arc::clone(&self.cache);
            let registrar = registrar.clone();
            let permits = permits.clone();
            join_set.spawn(async move {
                let result = fetch_and_register(&cache, &artifact, &registrar, permits).await;
                (artifact, result)
            });
        }
        // Registration thread stops once the last worker's handle is gone.
        drop(registrar);

        let mut loaded = Vec::with_capacity(scheduled);
        let mut downloaded = 0usize;
        let mut first_error: Option<LoadError> = None;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((artifact, Ok(outcome))) => {
                    if outcome.downloaded() {
                        downloaded += 1;
                    }
                    loaded.push(artifact.coordinate.name.clone());
                }
                Ok((artifact, Err(e))) => {
                    self.registry.release(&artifact.key());
                    tracing::error!("error loading dependency {}: {}", artifact.coordinate, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    tracing::error!("fetch task failed: {}", e);
                    first_error.get_or_insert(LoadError::Task(e.to_string()));
                }
            }
        }

        let registered = registration
            .await
            .map_err(|e| LoadError::Task(format!("registration thread: {}", e)))?;
        if let Some(e) = first_error {
            return Err(e);
        }
        debug_assert_eq!(registered, loaded.len());

        loaded.sort();
        if !loaded.is_empty() {
            tracing::info!("loaded dependencies: {}", loaded.join(", "));
        }
        Ok(LoadReport {
            loaded,
            skipped: plan.skipped.iter().map(FlatArtifact::key).collect(),
            requested,
            scheduled,
            downloaded,
        })
    }
}

/// One fetch task: wait for a permit, make sure the file is cached and
/// current, then hand it to the registration thread.
async fn fetch_and_register(
    cache: &Arc<ArtifactCache>,
    artifact: &FlatArtifact,
    registrar: &Registrar,
    permits: Option<Arc<Semaphore>>,
) -> Result<CacheOutcome, LoadError> {
    let _permit = match permits {
        Some(sem) => Some(
            sem.acquire_owned()
                .await
                .map_err(|e| LoadError::Task(e.to_string()))?,
        ),
        None => None,
    };

    let outcome = tokio::task::spawn_blocking({
        let cache = Arc::clone(cache);
        let artifact = artifact.clone();
        move || cache.fetch(&artifact)
    })
    .await
    .map_err(|e| LoadError::Task(format!("{}: {}", artifact.coordinate, e)))??;

    registrar
        .register(artifact, outcome.path().to_path_buf())
        .await?;
    Ok(outcome)
}
