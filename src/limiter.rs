//! Core rate limiter facade.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::decision::Decision;
use crate::engine::{EvalMode, ExecutionEngine, WindowDelete};
use crate::error::Result;

/// Sliding-window rate limiter over an atomically scripted shared store.
///
/// The limiter itself holds no per-identifier state and no locks; every
/// call derives the store key, hands the evaluation to the execution
/// engine as one atomic step, and decodes the result. Many callers, across
/// any number of processes sharing one store, may use it concurrently.
pub struct RateLimiter {
    config: LimiterConfig,
    engine: Arc<dyn ExecutionEngine>,
    delete: Arc<dyn WindowDelete>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a rate limiter using the wall clock.
    ///
    /// Fails with a configuration error if the config is invalid; nothing
    /// is deferred to the first call.
    pub fn new(
        config: LimiterConfig,
        engine: Arc<dyn ExecutionEngine>,
        delete: Arc<dyn WindowDelete>,
    ) -> Result<Self> {
        Self::with_clock(config, engine, delete, Arc::new(SystemClock))
    }

    /// Create a rate limiter with an explicit time source.
    pub fn with_clock(
        config: LimiterConfig,
        engine: Arc<dyn ExecutionEngine>,
        delete: Arc<dyn WindowDelete>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine,
            delete,
            clock,
        })
    }

    /// The configuration this limiter was built with.
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Try to admit one event for `identifier`.
    ///
    /// Records an entry and consumes one unit of capacity when the window
    /// has room; otherwise reports the limit without recording anything.
    pub async fn limit(&self, identifier: &str) -> Result<Decision> {
        self.run(EvalMode::Admit, identifier).await
    }

    /// Report the window state for `identifier` without admitting.
    ///
    /// Never records an entry, but does perform the same lazy pruning of
    /// stale entries as `limit`. That cleanup is idempotent and is the only
    /// store mutation a `check` can cause: repeated checks with no
    /// intervening admissions and no entry expiry return identical results.
    pub async fn check(&self, identifier: &str) -> Result<Decision> {
        self.run(EvalMode::Observe, identifier).await
    }

    /// Forget `identifier` entirely.
    ///
    /// Deletes all stored entries regardless of count; the next `limit`
    /// call sees full capacity, as if the identifier had never been seen.
    pub async fn reset(&self, identifier: &str) -> Result<()> {
        let key = self.store_key(identifier);
        debug!(key = %key, "Resetting window state");
        self.delete.delete(&key).await
    }

    fn store_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.config.prefix, identifier)
    }

    async fn run(&self, mode: EvalMode, identifier: &str) -> Result<Decision> {
        let now_ms = self.clock.now_ms();
        let key = self.store_key(identifier);
        let args = [
            now_ms.to_string(),
            self.config.window_ms.to_string(),
            self.config.max_requests.to_string(),
        ];

        trace!(
            key = %key,
            now = now_ms,
            mode = ?mode,
            "Evaluating window"
        );

        let raw = self.engine.execute_atomic(mode, &key, &args).await?;
        let decision = Decision::from_wire(&raw)?;

        if decision.is_limited {
            debug!(
                key = %key,
                next_available = decision.next_available_at,
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }
}
