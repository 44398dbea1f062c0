//! Advice actions and timing categories.
//!
//! An advice action is a zero-argument, zero-return thunk: it receives
//! nothing from the intercepted call and contributes nothing to its result.
//! Any context it needs must be closed over at registration time.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// When an advice action runs relative to the intercepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    /// Runs strictly before the original operation (or around-advice).
    Before,

    /// Replaces the original operation's execution entirely.
    Around,

    /// Runs after the original operation (or around-advice) completes
    /// successfully.
    After,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Before => write!(f, "before"),
            Timing::Around => write!(f, "around"),
            Timing::After => write!(f, "after"),
        }
    }
}

/// A shareable advice thunk.
///
/// Cloning an `Advice` is cheap (it clones an `Arc`), which is what lets a
/// builder hand the same action to several operations and lets every built
/// aspect keep its own frozen copy of the registration maps.
///
/// # Example
///
/// ```
/// use weft_core::Advice;
///
/// let advice = Advice::new(|| println!("This is a greeting...."));
/// advice.run().unwrap();
/// ```
#[derive(Clone)]
pub struct Advice {
    action: Arc<dyn Fn() -> Result<()> + Send + Sync>,
}

impl Advice {
    /// Wrap an infallible side-effecting closure.
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            action: Arc::new(move || {
                action();
                Ok(())
            }),
        }
    }

    /// Wrap a closure that may fail. An `Err` aborts the intercepted call
    /// and propagates unmodified to its caller.
    pub fn fallible(action: impl Fn() -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            action: Arc::new(action),
        }
    }

    /// Execute the thunk.
    pub fn run(&self) -> Result<()> {
        (self.action)()
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advice").finish_non_exhaustive()
    }
}
