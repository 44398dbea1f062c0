//! Operation identifiers.
//!
//! An [`OperationId`] is the stable key that names one callable operation on
//! a declared interface. It is the map key for advice registration and the
//! lookup key at dispatch time, so the same identifier must be derivable in
//! both places; the `#[weavable]` macro guarantees this by generating a
//! single `*_ops` function per operation and baking calls to it into both
//! the registration surface and the proxy method bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one operation (method) on one interface (trait).
///
/// Two identifiers are equal iff they name the same operation on the same
/// interface. The signature carries the method name and its parameter types
/// (e.g. `"greet(&str)"`) so overloaded-by-type renames stay distinct.
///
/// # Example
///
/// ```
/// use weft_core::OperationId;
///
/// let op = OperationId::new("Greeting", "greet(&str)");
/// assert_eq!(op.interface(), "Greeting");
/// assert_eq!(op.to_string(), "Greeting::greet(&str)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId {
    interface: String,
    signature: String,
}

impl OperationId {
    /// Create an identifier from an interface name and a method signature.
    pub fn new(interface: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            signature: signature.into(),
        }
    }

    /// The interface (trait) name this operation belongs to.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The method signature, `name(argtypes)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.interface, self.signature)
    }
}
