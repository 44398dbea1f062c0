//! The weaver: turns an aspect plus a target object into an intercepting
//! proxy.
//!
//! Runtimes with reflection fabricate proxy objects dynamically; here the
//! proxy is a compile-time type that implements the target's trait by
//! delegation. [`Weavable`] is the contract such a proxy
//! type satisfies, usually generated by the `#[weavable]` attribute from
//! `weft-macros`, occasionally hand-written. The [`Weaver`] validates an
//! aspect against the proxy's operation table and assembles the proxy; the
//! [`Dispatcher`] inside each proxy runs the per-call protocol:
//!
//! 1. run `before` advice if registered; an error aborts the call;
//! 2. run `around` advice if registered, *instead of* the original
//!    operation (the call then yields `R::default()`), otherwise invoke the
//!    original operation;
//! 3. run `after` advice if registered, only if step 2 succeeded;
//! 4. return the step-2 result.
//!
//! Everything runs synchronously on the calling thread with stack-local
//! state only; the registry behind the dispatcher is frozen, so concurrent
//! calls never contend.

use crate::advice::Timing;
use crate::aspect::Aspect;
use crate::error::{Result, WeftError};
use crate::observer::ObserverPtr;
use crate::operation::OperationId;
use crate::registry::AdviceRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

/// Contract between the weaver and a proxy type.
///
/// Implementations are normally generated by `#[weavable]` on the target
/// trait; the generated proxy delegates every trait method through
/// [`Dispatcher::dispatch`]. A hand-written implementation only needs to
/// report its interface name and operation table and store the dispatcher
/// it is assembled with.
pub trait Weavable: Sized {
    /// The concrete target type the proxy wraps.
    type Target;

    /// Name of the interface (trait) this proxy implements.
    fn interface() -> &'static str;

    /// Every operation the interface exposes, as registration-time
    /// identifiers. The weaver checks registered advice against this table.
    fn operations() -> Vec<OperationId>;

    /// Construct the proxy around `target`. Called by the weaver after
    /// validation has passed.
    fn assemble(target: Self::Target, dispatcher: Dispatcher) -> Self;
}

/// Stateless factory that produces proxies from one aspect.
///
/// Weaving the same aspect onto two targets yields two independent proxies
/// sharing the same frozen advice registry.
///
/// # Example
///
/// ```rust,ignore
/// use weft_core::{AspectBuilder, Weaver};
///
/// let aspect = AspectBuilder::new().with_targets(["Greeting"]).build();
/// let weaver = Weaver::new(aspect);
/// let proxy: GreetingProxy<SimpleGreeting> = weaver.weave(SimpleGreeting)?;
/// ```
#[derive(Clone)]
pub struct Weaver {
    aspect: Aspect,
    observer: Option<ObserverPtr>,
}

impl fmt::Debug for Weaver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weaver")
            .field("aspect", &self.aspect)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Weaver {
    /// Create a weaver for `aspect`.
    pub fn new(aspect: Aspect) -> Self {
        Self {
            aspect,
            observer: None,
        }
    }

    /// Install an observer notified of every dispatch event on every proxy
    /// this weaver produces.
    pub fn with_observer(mut self, observer: ObserverPtr) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Weave the aspect onto `target`, producing a proxy of type `P`.
    ///
    /// Fails fast instead of producing a proxy that cannot satisfy its own
    /// advertised operation set:
    ///
    /// - [`WeftError::NoTargets`] when the aspect declares no interfaces;
    /// - [`WeftError::UndeclaredInterface`] when `P`'s interface is not in
    ///   the declared set;
    /// - [`WeftError::UnresolvedOperation`] when advice is registered for
    ///   an operation of `P`'s interface that `P` does not implement.
    pub fn weave<P: Weavable>(&self, target: P::Target) -> Result<P> {
        if self.aspect.targets().is_empty() {
            return Err(WeftError::NoTargets);
        }

        let interface = P::interface();
        if !self.aspect.targets().contains(interface) {
            return Err(WeftError::UndeclaredInterface(interface.to_string()));
        }

        let implemented = P::operations();
        for (timing, operation) in self.aspect.registry().registrations() {
            if operation.interface() == interface && !implemented.contains(operation) {
                return Err(WeftError::UnresolvedOperation {
                    operation: operation.clone(),
                    timing,
                    interface: interface.to_string(),
                });
            }
        }

        debug!(interface, operations = implemented.len(), "weaving proxy");
        Ok(P::assemble(
            target,
            Dispatcher {
                registry: Arc::clone(self.aspect.registry()),
                observer: self.observer.clone(),
            },
        ))
    }
}

/// Per-proxy dispatch engine. Holds a shared read-only view of the advice
/// registry; all per-call state lives on the stack of `dispatch`.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<AdviceRegistry>,
    observer: Option<ObserverPtr>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registrations", &self.registry.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Dispatcher {
    /// Run the dispatch protocol for one intercepted call.
    ///
    /// `invoke` performs the original operation on the target; it is only
    /// called when no around-advice is registered for `operation`. When
    /// around-advice substitutes for the original, the call yields
    /// `R::default()`, the typed stand-in for "no meaningful value", since
    /// advice thunks cannot produce a result.
    #[instrument(level = "debug", skip_all, fields(operation = %operation))]
    pub fn dispatch<R, F>(&self, operation: &OperationId, invoke: F) -> Result<R>
    where
        R: Default,
        F: FnOnce() -> Result<R>,
    {
        let call_id = Uuid::new_v4().to_string();
        trace!(call_id = %call_id, "intercepted");
        if let Some(obs) = &self.observer {
            obs.on_intercept(&call_id, operation);
        }

        if let Some(advice) = self.registry.lookup(Timing::Before, operation) {
            self.observe_advice(&call_id, operation, Timing::Before);
            if let Err(err) = advice.run() {
                return Err(self.fail(&call_id, operation, err));
            }
        }

        let result = match self.registry.lookup(Timing::Around, operation) {
            Some(advice) => {
                // Around-advice replaces the original operation entirely.
                self.observe_advice(&call_id, operation, Timing::Around);
                match advice.run() {
                    Ok(()) => R::default(),
                    Err(err) => return Err(self.fail(&call_id, operation, err)),
                }
            }
            None => {
                trace!(call_id = %call_id, "invoking original operation");
                if let Some(obs) = &self.observer {
                    obs.on_proceed(&call_id, operation);
                }
                match invoke() {
                    Ok(value) => value,
                    Err(err) => return Err(self.fail(&call_id, operation, err)),
                }
            }
        };

        if let Some(advice) = self.registry.lookup(Timing::After, operation) {
            self.observe_advice(&call_id, operation, Timing::After);
            if let Err(err) = advice.run() {
                return Err(self.fail(&call_id, operation, err));
            }
        }

        if let Some(obs) = &self.observer {
            obs.on_complete(&call_id, operation);
        }
        Ok(result)
    }

    fn observe_advice(&self, call_id: &str, operation: &OperationId, timing: Timing) {
        trace!(call_id = %call_id, %timing, "running advice");
        if let Some(obs) = &self.observer {
            obs.on_advice(call_id, operation, timing);
        }
    }

    fn fail(&self, call_id: &str, operation: &OperationId, err: WeftError) -> WeftError {
        debug!(call_id = %call_id, %operation, error = %err, "dispatch aborted");
        if let Some(obs) = &self.observer {
            obs.on_error(call_id, operation, &err);
        }
        err
    }
}
