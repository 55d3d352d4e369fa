//! Error types for startup gating.

use std::sync::Arc;
use thiserror::Error;

/// Boxed error type used at the initializer boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Marker error an initializer returns to signal cooperative cancellation.
///
/// The startup task downcasts the initializer's error against this type to
/// classify the outcome as cancelled rather than failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("initialization cancelled")]
pub struct Cancelled;

/// Registration failure, surfaced synchronously at the registration call.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The requested dependency type has no registration in the container.
    #[error("no service registered for type {type_name}")]
    Resolution {
        /// Fully qualified name of the missing type.
        type_name: &'static str,
    },
}

/// Error surfaced by the gating middleware when the startup task settled
/// badly. Flows through the host's error path instead of being folded into
/// a 503.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The initializer returned an error or panicked.
    #[error("startup initialization failed: {0}")]
    Init(Arc<BoxError>),

    /// The initializer was cancelled before completing.
    #[error("startup initialization cancelled")]
    Cancelled,
}
