use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::task::AbortHandle;
use tracing::info;

use crate::error::PromptDeckError;

#[derive(Default)]
struct Runs {
    active: HashMap<u64, AbortHandle>,
    /// Ids cancelled before their run was registered.
    cancelled_early: HashSet<u64>,
}

/// In-flight variant runs, keyed by the ticket id the front-end assigned.
#[derive(Default)]
pub struct RunRegistry {
    runs: Mutex<Runs>,
}

impl RunRegistry {
    fn runs(&self) -> MutexGuard<'_, Runs> {
        self.runs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `work` as its own task under `run_id` until it finishes or is
    /// cancelled through [`cancel`](Self::cancel). A run whose id was
    /// cancelled before this call never starts.
    pub async fn track<F, T>(&self, run_id: u64, work: F) -> Result<T, PromptDeckError>
    where
        F: Future<Output = Result<T, PromptDeckError>> + Send + 'static,
        T: Send + 'static,
    {
        let task = {
            let mut runs = self.runs();
            if runs.cancelled_early.remove(&run_id) {
                info!("Run {} cancelled before it started", run_id);
                return Err(PromptDeckError::Cancelled);
            }
            let task = tokio::spawn(work);
            runs.active.insert(run_id, task.abort_handle());
            task
        };

        let joined = task.await;
        self.runs().active.remove(&run_id);

        match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                info!("Run {} cancelled", run_id);
                Err(PromptDeckError::Cancelled)
            }
            Err(e) => Err(PromptDeckError::Run(e.to_string())),
        }
    }

    /// Abort a run. Returns false when no run is registered under `run_id`
    /// yet; the id is then remembered so that a later [`track`](Self::track)
    /// with it is refused.
    pub fn cancel(&self, run_id: u64) -> bool {
        let mut runs = self.runs();
        match runs.active.remove(&run_id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => {
                runs.cancelled_early.insert(run_id);
                false
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.runs().active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_track_returns_result_and_unregisters() {
        let registry = RunRegistry::default();
        let value = registry.track(1, async { Ok::<_, PromptDeckError>(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_track_passes_errors_through() {
        let registry = RunRegistry::default();
        let result = registry
            .track(2, async { Err::<(), _>(PromptDeckError::Run("boom".into())) })
            .await;
        assert!(matches!(result, Err(PromptDeckError::Run(msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_run() {
        let registry = Arc::new(RunRegistry::default());
        let tracked = registry.clone();
        let handle = tokio::spawn(async move {
            tracked
                .track(7, async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, PromptDeckError>("late")
                })
                .await
        });

        while registry.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(registry.cancel(7));

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(PromptDeckError::Cancelled)));
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_track_refuses_run() {
        let registry = RunRegistry::default();
        assert!(!registry.cancel(99));

        let started = Arc::new(AtomicBool::new(false));
        let flag = started.clone();
        let result = registry
            .track(99, async move {
                flag.store(true, Ordering::SeqCst);
                Ok::<_, PromptDeckError>("sent")
            })
            .await;
        assert!(matches!(result, Err(PromptDeckError::Cancelled)));
        assert!(!started.load(Ordering::SeqCst));
        assert_eq!(registry.in_flight(), 0);

        // the early cancel is consumed once
        let retried = registry.track(99, async { Ok::<_, PromptDeckError>(1) }).await;
        assert_eq!(retried.unwrap(), 1);
    }
}
