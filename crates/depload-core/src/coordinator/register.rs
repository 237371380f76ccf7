//! Serialized loader registration.
//!
//! Fetch workers never call the loader themselves: they send the cached path
//! to one blocking registration thread and wait for its answer, so the host's
//! loading facility sees one call at a time.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::LoadError;
use crate::loader::{LoaderBridge, LoaderError};
use crate::manifest::FlatArtifact;

const QUEUE_DEPTH: usize = 32;

struct Request {
    artifact: FlatArtifact,
    path: PathBuf,
    reply: oneshot::Sender<Result<(), LoaderError>>,
}

/// Cloneable handle fetch workers use to submit registrations.
#[derive(Clone)]
pub(super) struct Registrar {
    tx: mpsc::Sender<Request>,
}

impl Registrar {
    /// Queues `path` for registration and waits for the loader's verdict.
    pub(super) async fn register(
        &self,
        artifact: &FlatArtifact,
        path: PathBuf,
    ) -> Result<(), LoadError> {
        let (reply, answer) = oneshot::channel();
        let request = Request {
            artifact: artifact.clone(),
            path,
            reply,
        };
        if self.tx.send(request).await.is_err() {
            return Err(LoadError::Task("registration thread stopped".to_string()));
        }
        match answer.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(LoadError::LoaderRegistration {
                coordinate: artifact.coordinate.clone(),
                source,
            }),
            Err(_) => Err(LoadError::Task(
                "registration thread dropped a request".to_string(),
            )),
        }
    }
}

/// Starts the registration thread. It exits once every `Registrar` clone is
/// dropped; the handle yields the number of successful registrations.
pub(super) fn spawn(loader: Arc<dyn LoaderBridge>) -> (Registrar, JoinHandle<usize>) {
    let (tx, mut rx) = mpsc::channel::<Request>(QUEUE_DEPTH);
    let handle = tokio::task::spawn_blocking(move || {
        let mut registered = 0usize;
        while let Some(req) = rx.blocking_recv() {
            let result = loader.register(&req.artifact, &req.path);
            if result.is_ok() {
                registered += 1;
            }
            // Worker may have gone away; nothing to report to.
            let _ = req.reply.send(result);
        }
        registered
    });
    (Registrar { tx }, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Coordinate;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails if two registrations overlap.
    #[derive(Default)]
    struct OverlapDetector {
        active: AtomicUsize,
        max_seen: AtomicUsize,
    }

    impl LoaderBridge for OverlapDetector {
        fn register(&self, _: &FlatArtifact, path: &Path) -> Result<(), LoaderError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);
            if path.ends_with("bad.jar") {
                return Err(LoaderError::Unavailable("test".into()));
            }
            Ok(())
        }
    }

    fn artifact(name: &str) -> FlatArtifact {
        FlatArtifact {
            coordinate: Coordinate::new("g", name, "1"),
            repository: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn registrations_never_overlap() {
        let loader = Arc::new(OverlapDetector::default());
        let (registrar, handle) = spawn(loader.clone());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let registrar = registrar.clone();
            tasks.push(tokio::spawn(async move {
                let a = artifact(&format!("lib{}", i));
                registrar
                    .register(&a, PathBuf::from(format!("lib{}.jar", i)))
                    .await
            }));
        }
        drop(registrar);
        for t in tasks {
            t.await.unwrap().unwrap();
        }
        assert_eq!(handle.await.unwrap(), 8);
        assert_eq!(loader.max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loader_rejection_maps_to_registration_error() {
        let (registrar, handle) = spawn(Arc::new(OverlapDetector::default()));
        let err = registrar
            .register(&artifact("bad"), PathBuf::from("bad.jar"))
            .await
            .unwrap_err();
        match err {
            LoadError::LoaderRegistration { coordinate, .. } => assert_eq!(coordinate.name, "bad"),
            other => panic!("unexpected {:?}", other),
        }
        drop(registrar);
        assert_eq!(handle.await.unwrap(), 0);
    }
}
