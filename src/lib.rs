//! Slidegate - Sliding-Window Rate Limiting
//!
//! This crate implements a sliding-window admission counter: per identifier
//! it tracks recent events inside a trailing time window and decides whether
//! a new event may be admitted without exceeding capacity. All cross-caller
//! coordination is delegated to an [`ExecutionEngine`] that runs the window
//! evaluation atomically against a shared store, so any number of processes
//! can throttle against the same limits. An in-process [`MemoryEngine`] is
//! included for single-process use and for tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use slidegate::{LimiterConfig, MemoryEngine, RateLimiter};
//!
//! let engine = Arc::new(MemoryEngine::new());
//! let limiter = RateLimiter::new(
//!     LimiterConfig::new("api", 60_000, 100),
//!     engine.clone(),
//!     engine,
//! )
//! .unwrap();
//!
//! tokio_test::block_on(async {
//!     let decision = limiter.limit("client-1").await.unwrap();
//!     assert!(!decision.is_limited);
//!     assert_eq!(decision.remaining_requests, 99);
//! });
//! ```

pub mod clock;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod limiter;
pub mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LimiterConfig;
pub use decision::Decision;
pub use engine::{EvalMode, ExecutionEngine, WindowDelete};
pub use error::{Result, SlidegateError};
pub use limiter::RateLimiter;
pub use memory::MemoryEngine;
