//! Hooks for observing dispatch events (logging, metrics, UI).

use crate::advice::Timing;
use crate::error::WeftError;
use crate::operation::OperationId;
use std::sync::Arc;

/// Trait for observing the dispatch protocol from the outside.
///
/// Every callback receives the correlation `id` of the intercepted call, so
/// an observer can stitch the events of one call back together when several
/// proxies dispatch concurrently. Observers are read-only: they can never
/// alter which advice runs or what the call returns.
pub trait DispatchObserver: Send + Sync {
    /// Called when a call enters the dispatch protocol.
    fn on_intercept(&self, _id: &str, _operation: &OperationId) {}

    /// Called just before an advice action runs.
    fn on_advice(&self, _id: &str, _operation: &OperationId, _timing: Timing) {}

    /// Called when the original target operation is about to be invoked
    /// (i.e. no around-advice substituted for it).
    fn on_proceed(&self, _id: &str, _operation: &OperationId) {}

    /// Called when the dispatch completes and the result is returned.
    fn on_complete(&self, _id: &str, _operation: &OperationId) {}

    /// Called when advice or the original operation fails; the error then
    /// propagates to the caller.
    fn on_error(&self, _id: &str, _operation: &OperationId, _error: &WeftError) {}

    /// Called to report arbitrary metadata for an event.
    fn on_metadata(&self, _id: &str, _key: &str, _value: serde_json::Value) {}
}

pub type ObserverPtr = Arc<dyn DispatchObserver>;
