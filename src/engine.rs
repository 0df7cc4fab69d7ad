//! Execution engine traits for abstracting over shared window stores.

use async_trait::async_trait;

use crate::error::Result;

/// Which evaluator procedure the engine should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Evaluate the window and, if capacity remains, record a new entry.
    Admit,
    /// Evaluate the window without recording anything. Stale entries are
    /// still pruned.
    Observe,
}

/// Trait for executing the window evaluator atomically against one key.
///
/// This trait abstracts over backing stores: an in-process store, a Redis
/// script runner, or anything else able to run a keyed procedure as an
/// indivisible unit. The engine must guarantee that concurrent invocations
/// on the same key observe each other as happening entirely before or
/// entirely after; nothing may see the store mid-procedure. That guarantee
/// is the single correctness-critical property of the whole system.
///
/// `args` is `[now, window_ms, max_requests]`, all decimal integers as
/// text. The returned string must be the encoded decision triple
/// `"<remaining>,<next_available>,<is_limited>"`; any other shape is
/// treated as a protocol violation by the caller.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run the evaluator in the given mode against `key`.
    async fn execute_atomic(&self, mode: EvalMode, key: &str, args: &[String]) -> Result<String>;
}

/// Trait for destroying one key's window state.
///
/// Deleting a key that does not exist is not an error.
#[async_trait]
pub trait WindowDelete: Send + Sync {
    /// Unconditionally remove all stored entries for `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}
