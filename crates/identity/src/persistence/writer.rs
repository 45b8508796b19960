//! Fire-and-forget write-back of discovered avatars.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::task::JoinHandle;

use crate::models::{AvatarUrl, IdentityId};
use crate::resolver::AvatarWriter;

/// How a dispatched write ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PersistOutcome {
    Written,
    Failed(String),
    /// The task was cancelled or panicked before reporting.
    Aborted,
}

/// Handle to a dispatched write.
///
/// Dropping it detaches the write; awaiting [`wait`](Self::wait) is only
/// needed when completion must be deterministic (tests, short-lived CLIs).
#[derive(Debug)]
pub struct PersistHandle {
    identity: IdentityId,
    task: JoinHandle<PersistOutcome>,
}

impl PersistHandle {
    pub fn identity(&self) -> &IdentityId {
        &self.identity
    }

    pub async fn wait(self) -> PersistOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Avatar write for '{}' did not complete: {}", self.identity, e);
                PersistOutcome::Aborted
            }
        }
    }
}

/// Dispatches single, unretried avatar writes on detached tasks.
///
/// Must be used from within a Tokio runtime.
#[derive(Clone)]
pub struct PersistenceWriter {
    writer: Arc<dyn AvatarWriter>,
    dispatched: Arc<AtomicU64>,
    consecutive_failures: Arc<AtomicU32>,
}

impl PersistenceWriter {
    pub fn new(writer: Arc<dyn AvatarWriter>) -> Self {
        Self {
            writer,
            dispatched: Arc::new(AtomicU64::new(0)),
            consecutive_failures: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Issues one write without waiting for it.
    pub fn dispatch(&self, identity: IdentityId, avatar: AvatarUrl) -> PersistHandle {
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        let writer = Arc::clone(&self.writer);
        let failures = Arc::clone(&self.consecutive_failures);
        let task_identity = identity.clone();

        let task = tokio::spawn(async move {
            match writer.persist_avatar(&task_identity, &avatar).await {
                Ok(()) => {
                    failures.store(0, Ordering::Relaxed);
                    debug!("Persisted avatar for '{}'", task_identity);
                    PersistOutcome::Written
                }
                Err(e) => {
                    let streak = failures.fetch_add(1, Ordering::Relaxed) + 1;
                    error!(
                        "Failed to persist avatar for '{}': {} ({} consecutive failure(s))",
                        task_identity, e, streak
                    );
                    PersistOutcome::Failed(e.to_string())
                }
            }
        });

        PersistHandle { identity, task }
    }

    /// Total writes dispatched by this writer.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Failed writes since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }
}
