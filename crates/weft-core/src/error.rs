//! Error types for Weft Core.

use crate::advice::Timing;
use crate::operation::OperationId;
use thiserror::Error;

/// Result type alias for Weft operations.
pub type Result<T> = std::result::Result<T, WeftError>;

/// Main error type for the Weft framework.
#[derive(Debug, Error)]
pub enum WeftError {
    /// The aspect declares no target interfaces; weaving it can only
    /// produce a proxy exposing no operations.
    #[error("aspect declares no target interfaces")]
    NoTargets,

    /// The interface being woven is not in the aspect's declared target set.
    #[error("interface '{0}' is not declared as a target of this aspect")]
    UndeclaredInterface(String),

    /// Advice was registered for an operation the woven interface does not
    /// implement.
    #[error("operation '{operation}' has {timing} advice but is not implemented by interface '{interface}'")]
    UnresolvedOperation {
        /// The operation the advice was registered for.
        operation: OperationId,
        /// The timing category the orphaned advice was registered under.
        timing: Timing,
        /// The interface that was being woven.
        interface: String,
    },

    /// An advice action failed. Raised from inside a before/around/after
    /// thunk and propagated to the caller of the intercepted operation.
    #[error("advice error: {0}")]
    Advice(String),

    /// The intercepted operation itself failed with a message not covered
    /// by a more specific variant.
    #[error("operation error: {0}")]
    Operation(String),
}
