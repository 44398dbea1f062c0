//! # Weft Core
//!
//! Core library for aspect-oriented interception.
//!
//! Weft lets a caller attach behavior ("advice") to named operations of an
//! object without touching the object's implementation, then invoke the
//! augmented object transparently through its original trait.
//!
//! ## Components
//!
//! - [`AspectBuilder`]: fluent accumulation of target interfaces and
//!   before/around/after advice, frozen into an [`Aspect`]
//! - [`Weaver`]: validates an aspect against a proxy type and assembles
//!   the proxy around a target object
//! - [`Dispatcher`]: runs the per-call dispatch protocol inside a proxy
//!
//! Proxy types are generated by the `#[weavable]` attribute from the
//! `weft-macros` crate, or hand-written against the [`Weavable`] contract.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weft_core::{Advice, AspectBuilder, Weaver};
//! use weft_macros::weavable;
//!
//! #[weavable]
//! trait Greeting {
//!     fn greet(&self, name: &str) -> weft_core::Result<String>;
//! }
//!
//! let aspect = AspectBuilder::new()
//!     .with_targets(["Greeting"])
//!     .with_before_advice_for(Advice::new(|| println!("This is a greeting....")), [greeting_ops::greet()])
//!     .build();
//!
//! let proxy: GreetingProxy<SimpleGreeting> = Weaver::new(aspect).weave(SimpleGreeting)?;
//! proxy.greet("Jo")?;
//! ```

pub mod advice;
pub mod aspect;
pub mod error;
pub mod observer;
pub mod operation;
pub mod registry;
pub mod weaver;

pub use advice::{Advice, Timing};
pub use aspect::{Aspect, AspectBuilder};
pub use error::{Result, WeftError};
pub use observer::{DispatchObserver, ObserverPtr};
pub use operation::OperationId;
pub use registry::AdviceRegistry;
pub use weaver::{Dispatcher, Weavable, Weaver};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Advice, Aspect, AspectBuilder, Dispatcher, OperationId, Result, Timing, Weavable, Weaver,
        WeftError,
    };
}
