//! Application lifecycle plumbing.
//!
//! # Data Flow
//! ```text
//! Host: bind listener → notify_started()
//!     → startup hook wakes → initializer launched → gate opens
//!
//! Host: shutdown begins → notify_stopping()
//!     → initializer observes cancellation; gate answers 503
//! ```

pub mod signals;

pub use signals::{AppLifetime, Event};
