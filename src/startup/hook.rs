//! Startup registration.
//!
//! Wires an asynchronous initializer to the started event and publishes its
//! in-flight handle for the gating middleware.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{BoxError, RegisterError};
use crate::lifecycle::{AppLifetime, Event};
use crate::services::Services;
use crate::startup::task::InitTask;

/// Shared view of the readiness gate.
///
/// Closed until the started handler publishes the launched [`InitTask`].
/// Publication and gate opening are a single atomic transition: a reader
/// that observes the gate open also observes the task handle.
#[derive(Debug, Clone)]
pub struct StartupGate {
    task: watch::Receiver<Option<InitTask>>,
    stopping: Event,
}

impl StartupGate {
    /// The published init task, if startup has begun.
    pub fn task(&self) -> Option<InitTask> {
        self.task.borrow().clone()
    }

    /// Whether the gate has opened (the initializer was launched).
    pub fn is_open(&self) -> bool {
        self.task.borrow().is_some()
    }

    /// The stopping event observed by the gate.
    pub fn stopping(&self) -> &Event {
        &self.stopping
    }

    /// Wait for the gate to open and return the published task.
    ///
    /// Intended for readiness probes and tests; the middleware never parks
    /// here (a pre-start request is answered 503 right away). Returns `None`
    /// if the startup hook was torn down before publishing.
    pub async fn opened(&self) -> Option<InitTask> {
        let mut rx = self.task.clone();
        let result = match rx.wait_for(|t| t.is_some()).await {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        result
    }
}

/// Register `init` to run once the application has started.
///
/// Spawns a handler that waits for the started event, launches `init` as a
/// single task with the stopping event as its cancellation signal, and opens
/// the returned gate. The handler runs exactly once no matter how often the
/// started event is poked.
pub fn register<F, Fut>(lifetime: &AppLifetime, init: F) -> StartupGate
where
    F: FnOnce(Event) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    spawn_hook(lifetime, None, init)
}

/// Register `init` with a dependency resolved from the host container.
///
/// `D` is resolved at registration time, not when the started event fires,
/// so a missing registration surfaces here as [`RegisterError::Resolution`].
/// A service scope is opened around the initializer invocation and dropped
/// once it settles.
pub fn register_with<D, F, Fut>(
    lifetime: &AppLifetime,
    services: Arc<dyn Services>,
    init: F,
) -> Result<StartupGate, RegisterError>
where
    D: Send + Sync + 'static,
    F: FnOnce(Arc<D>, Event) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    let dep = services
        .resolve::<D>()
        .ok_or(RegisterError::Resolution {
            type_name: std::any::type_name::<D>(),
        })?;
    debug!(dependency = std::any::type_name::<D>(), "startup dependency resolved");
    Ok(spawn_hook(lifetime, Some(services), move |stopping| {
        init(dep, stopping)
    }))
}

fn spawn_hook<F, Fut>(
    lifetime: &AppLifetime,
    services: Option<Arc<dyn Services>>,
    init: F,
) -> StartupGate
where
    F: FnOnce(Event) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    let (tx, rx) = watch::channel(None);
    let started = lifetime.started().clone();
    let stopping = lifetime.stopping().clone();
    let gate = StartupGate {
        task: rx,
        stopping: stopping.clone(),
    };

    tokio::spawn(async move {
        started.wait().await;
        let scope = services.as_ref().map(|s| s.begin_scope());
        let task = InitTask::launch(async move {
            // Held for the whole invocation so scoped resources outlive it.
            let _scope = scope;
            init(stopping).await
        });
        info!("startup initializer launched");
        let _ = tx.send(Some(task));
    });

    gate
}
