//! Startup orchestration.
//!
//! # Data Flow
//! ```text
//! register() / register_with()
//!     → handler task parks on the started event
//!     → started fires → scope opened → initializer launched (one task)
//!     → InitTask published, gate opens (single atomic transition)
//!     → initializer settles: Succeeded | Failed | Cancelled
//! ```

pub mod hook;
pub mod task;

pub use hook::{register, register_with, StartupGate};
pub use task::{InitOutcome, InitTask};
