//! Request gating middleware.
//!
//! Sits at the front of the pipeline. Answers 503 while the startup
//! initializer has not completed or shutdown is in progress; forwards to the
//! inner service once initialization succeeded; surfaces a failed or
//! cancelled initializer as a service error so the host's own error handling
//! deals with it.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

use crate::error::{BoxError, GateError};
use crate::startup::{InitOutcome, StartupGate};

/// Layer that wraps a service with startup gating.
#[derive(Debug, Clone)]
pub struct GateLayer {
    gate: StartupGate,
}

impl GateLayer {
    /// Build the layer from the gate returned at registration.
    pub fn new(gate: StartupGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            gate: self.gate.clone(),
            inner,
        }
    }
}

/// Middleware service enforcing the startup gate.
///
/// Each request makes exactly one pass: short-circuit 503, forward, or
/// propagate the initializer's terminal error. Nothing is retried.
#[derive(Debug, Clone)]
pub struct GateService<S> {
    gate: StartupGate,
    inner: S,
}

impl<S> Service<Request<Body>> for GateService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = BoxError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        // Take the service that was driven to readiness; leave a fresh
        // clone behind for the next call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            // Single acquire load; a request in the pre-start window is
            // answered immediately rather than parked on the gate.
            let Some(task) = gate.task() else {
                debug!("request before startup launch, answering 503");
                return Ok(service_unavailable());
            };

            match task.outcome() {
                None => {
                    debug!("initialization still running, answering 503");
                    Ok(service_unavailable())
                }
                Some(InitOutcome::Failed(e)) => Err(GateError::Init(e).into()),
                Some(InitOutcome::Cancelled) => Err(GateError::Cancelled.into()),
                Some(InitOutcome::Succeeded) => {
                    if gate.stopping().is_fired() {
                        debug!("shutdown in progress, answering 503");
                        return Ok(service_unavailable());
                    }
                    inner.call(req).await.map_err(Into::into)
                }
            }
        })
    }
}

fn service_unavailable() -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    res
}
