//! Shared helpers for integration tests.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tower::Service;

use startup_gate::services::{ServiceScope, Services};

/// In-memory service container with scope accounting.
#[derive(Default)]
pub struct MemoryServices {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    scopes_opened: Arc<AtomicUsize>,
    scopes_closed: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MemoryServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<D: Send + Sync + 'static>(&mut self, value: D) {
        self.entries.insert(TypeId::of::<D>(), Arc::new(value));
    }

    /// Handles to the scope counters, usable after the container has been
    /// converted to `Arc<dyn Services>`.
    pub fn scope_counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (self.scopes_opened.clone(), self.scopes_closed.clone())
    }
}

impl Services for MemoryServices {
    fn resolve_raw(&self, ty: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        self.entries.get(&ty).cloned()
    }

    fn begin_scope(&self) -> Box<dyn ServiceScope> {
        self.scopes_opened.fetch_add(1, Ordering::SeqCst);
        Box::new(CountingScope {
            closed: self.scopes_closed.clone(),
        })
    }
}

struct CountingScope {
    closed: Arc<AtomicUsize>,
}

impl ServiceScope for CountingScope {}

impl Drop for CountingScope {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Inner service that counts invocations and answers 200.
#[derive(Clone, Default)]
pub struct CountingService {
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Service<Request<Body>> for CountingService {
    type Response = Response<Body>;
    type Error = std::convert::Infallible;
    type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: Request<Body>) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut res = Response::new(Body::from("downstream"));
        *res.status_mut() = StatusCode::OK;
        std::future::ready(Ok(res))
    }
}

/// Build an empty GET request for driving the gate directly.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
