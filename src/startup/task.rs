//! The in-flight startup task.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::{BoxError, Cancelled};

/// Terminal state of the startup initializer.
#[derive(Debug, Clone)]
pub enum InitOutcome {
    /// Initialization completed; requests may be served.
    Succeeded,

    /// The initializer returned an error or panicked. The error is shared
    /// so every gated request re-raises the same failure.
    Failed(Arc<BoxError>),

    /// The initializer bailed out under cancellation.
    Cancelled,
}

/// Handle to the single launched initializer.
///
/// Cheap to clone; all clones observe the same settlement. The outcome cell
/// is written exactly once.
#[derive(Debug, Clone)]
pub struct InitTask {
    outcome: watch::Receiver<Option<InitOutcome>>,
}

impl InitTask {
    /// Spawn `fut` as the startup task and return a handle to its outcome.
    ///
    /// A returned error that downcasts to [`Cancelled`] settles the task as
    /// cancelled; a panic settles it as failed.
    pub(crate) fn launch<F>(fut: F) -> Self
    where
        F: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let join = tokio::spawn(fut);
        tokio::spawn(async move {
            let outcome = match join.await {
                Ok(Ok(())) => {
                    info!("startup initialization complete");
                    InitOutcome::Succeeded
                }
                Ok(Err(e)) if e.is::<Cancelled>() => {
                    warn!("startup initialization cancelled");
                    InitOutcome::Cancelled
                }
                Ok(Err(e)) => {
                    error!(error = %e, "startup initialization failed");
                    InitOutcome::Failed(Arc::new(e))
                }
                Err(join_err) if join_err.is_cancelled() => {
                    warn!("startup task aborted");
                    InitOutcome::Cancelled
                }
                Err(join_err) => {
                    error!(error = %join_err, "startup task panicked");
                    InitOutcome::Failed(Arc::new(Box::new(join_err) as BoxError))
                }
            };
            let _ = tx.send(Some(outcome));
        });
        Self { outcome: rx }
    }

    /// Whether the initializer has settled.
    pub fn is_settled(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// The settled outcome, if any.
    pub fn outcome(&self) -> Option<InitOutcome> {
        self.outcome.borrow().clone()
    }

    /// Wait for the initializer to settle.
    pub async fn settled(&self) -> InitOutcome {
        let mut rx = self.outcome.clone();
        let result = match rx.wait_for(|o| o.is_some()).await {
            Ok(guard) => match guard.clone() {
                Some(outcome) => outcome,
                None => InitOutcome::Cancelled,
            },
            // Writer dropped without settling: the runtime tore the task
            // down mid-flight.
            Err(_) => InitOutcome::Cancelled,
        };
        result
    }
}
