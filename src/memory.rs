//! In-process execution engine.
//!
//! `MemoryEngine` keeps every window log inside the current process and runs
//! the evaluator while holding that key's map guard, which gives the same
//! atomicity the facade expects from a remote scripted store. Useful as the
//! single-process deployment mode and as the store the test suite runs
//! against.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::engine::{EvalMode, ExecutionEngine, WindowDelete};
use crate::error::Result;
use crate::evaluator::WindowLog;

/// Process-local shared window store.
///
/// Calls on the same key are serialized by the map's entry guard, which is
/// held for the whole evaluate-and-reclaim sequence: a concurrent delete or
/// slot reclamation can never interleave with an evaluation in progress, so
/// an admitted entry always lands in the log the next caller reads. Calls
/// on different keys proceed independently. No lock is held across an await
/// point.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    windows: DashMap<String, WindowLog>,
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding state. Primarily useful for tests.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

fn parse_arg(args: &[String], index: usize, name: &str) -> Result<u64> {
    let raw = args
        .get(index)
        .ok_or_else(|| anyhow!("missing {} argument", name))?;
    let value = raw
        .parse::<u64>()
        .with_context(|| format!("{} is not a decimal integer: {:?}", name, raw))?;
    Ok(value)
}

#[async_trait]
impl ExecutionEngine for MemoryEngine {
    async fn execute_atomic(&self, mode: EvalMode, key: &str, args: &[String]) -> Result<String> {
        if args.len() != 3 {
            return Err(anyhow!("expected 3 arguments, got {}", args.len()).into());
        }
        let now_ms = parse_arg(args, 0, "now")?;
        let window_ms = parse_arg(args, 1, "window_ms")?;
        let max_requests = parse_arg(args, 2, "max_requests")?;
        let admit = mode == EvalMode::Admit;

        // Evaluate and reclaim under one guard. Empty slots are dropped so
        // idle identifiers do not accumulate.
        let decision = match self.windows.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let decision =
                    occupied
                        .get_mut()
                        .evaluate(now_ms, window_ms, max_requests, admit);
                if occupied.get().is_empty() {
                    occupied.remove();
                }
                decision
            }
            Entry::Vacant(vacant) => {
                let mut log = WindowLog::default();
                let decision = log.evaluate(now_ms, window_ms, max_requests, admit);
                if !log.is_empty() {
                    vacant.insert(log);
                }
                decision
            }
        };

        Ok(decision.to_wire())
    }
}

#[async_trait]
impl WindowDelete for MemoryEngine {
    async fn delete(&self, key: &str) -> Result<()> {
        if self.windows.remove(key).is_some() {
            debug!(key = %key, "Deleted window state");
        }
        Ok(())
    }
}
