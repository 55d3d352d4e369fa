//! HTTP pipeline integration.
//!
//! # Data Flow
//! ```text
//! Request → GateService (front of pipeline)
//!     gate closed or init running → 503, downstream never invoked
//!     init succeeded, not stopping → inner service
//!     init failed or cancelled     → service error (host error path)
//! ```

pub mod gate;

pub use gate::{GateLayer, GateService};
