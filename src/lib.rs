//! Request gating around asynchronous application startup.
//!
//! Delays serving of incoming requests until a caller-supplied asynchronous
//! initializer has completed, answering requests that arrive before startup
//! finishes (or after shutdown begins) with `503 Service Unavailable`.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────┐
//!                 │                 STARTUP GATE                    │
//!                 │                                                 │
//!  register() ────┼─▶ startup hook ──waits──▶ started event         │
//!                 │        │                                        │
//!                 │        ▼ (fires once)                           │
//!                 │   initializer task ──publishes──▶ gate opens    │
//!                 │                                                 │
//!  Request ───────┼─▶ GateService ─── gate closed / init running ──▶│ 503
//!                 │        │                                        │
//!                 │        ├── init succeeded ─────▶ inner service  │
//!                 │        └── init failed/cancelled ▶ service error│
//!                 └────────────────────────────────────────────────┘
//! ```
//!
//! The host owns the server, routing, and dependency container; this crate
//! consumes lifecycle events ([`AppLifetime`]) and an optional container
//! seam ([`services::Services`]), and exposes one pipeline stage
//! ([`GateLayer`]).

// Core subsystems
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod startup;

// Host seams
pub mod services;

pub use error::{BoxError, Cancelled, GateError, RegisterError};
pub use http::{GateLayer, GateService};
pub use lifecycle::{AppLifetime, Event};
pub use startup::{register, register_with, InitOutcome, InitTask, StartupGate};
