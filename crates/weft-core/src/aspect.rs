//! Aspects and the fluent builder that produces them.
//!
//! An [`AspectBuilder`] is the only mutable stage of configuration. Calling
//! [`build`](AspectBuilder::build) freezes the accumulated registrations
//! into an immutable [`Aspect`]; the builder and the built aspect are
//! distinct types, so post-build immutability is structural, not a runtime
//! flag.

use crate::advice::Advice;
use crate::operation::OperationId;
use crate::registry::AdviceRegistry;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A frozen pairing of a declared target-interface set with an advice
/// registry.
///
/// Aspects are cheap to clone: the registry is behind an `Arc`, so every
/// proxy woven from the same aspect reads the same frozen advice maps.
#[derive(Debug, Clone)]
pub struct Aspect {
    targets: BTreeSet<String>,
    registry: Arc<AdviceRegistry>,
}

impl Aspect {
    /// The interface names this aspect applies to.
    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// Shared handle to the frozen advice registry.
    pub fn registry(&self) -> &Arc<AdviceRegistry> {
        &self.registry
    }
}

/// Fluent accumulator for aspect configuration.
///
/// # Example
///
/// ```
/// use weft_core::{Advice, AspectBuilder, OperationId};
///
/// let greet = OperationId::new("Greeting", "greet(&str)");
///
/// let aspect = AspectBuilder::new()
///     .with_targets(["Greeting"])
///     .with_before_advice_for(Advice::new(|| println!("This is a greeting....")), [greet.clone()])
///     .with_after_advice_for(Advice::new(|| println!("The greeting has been done.")), [greet])
///     .build();
///
/// assert!(aspect.targets().contains("Greeting"));
/// ```
#[derive(Debug, Default)]
pub struct AspectBuilder {
    targets: BTreeSet<String>,
    before: HashMap<OperationId, Advice>,
    around: HashMap<OperationId, Advice>,
    after: HashMap<OperationId, Advice>,
}

impl AspectBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the interfaces the eventual aspect applies to.
    ///
    /// Overwrites any previously declared set; last write wins.
    pub fn with_targets<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = interfaces.into_iter().map(Into::into).collect();
        self
    }

    /// Register `advice` as before-advice for every given operation.
    ///
    /// Re-registering for an operation replaces the earlier action; passing
    /// no operations is a no-op.
    pub fn with_before_advice_for(
        mut self,
        advice: Advice,
        operations: impl IntoIterator<Item = OperationId>,
    ) -> Self {
        for op in operations {
            self.before.insert(op, advice.clone());
        }
        self
    }

    /// Register `advice` as after-advice for every given operation.
    pub fn with_after_advice_for(
        mut self,
        advice: Advice,
        operations: impl IntoIterator<Item = OperationId>,
    ) -> Self {
        for op in operations {
            self.after.insert(op, advice.clone());
        }
        self
    }

    /// Register `advice` as around-advice for every given operation. When an
    /// operation carries around-advice, the woven proxy never invokes the
    /// target's own implementation of it.
    pub fn with_around_advice_for(
        mut self,
        advice: Advice,
        operations: impl IntoIterator<Item = OperationId>,
    ) -> Self {
        for op in operations {
            self.around.insert(op, advice.clone());
        }
        self
    }

    /// Freeze the current registrations into an immutable [`Aspect`].
    ///
    /// Non-consuming: the builder stays usable, and building twice yields
    /// two independent aspects. Registrations made after a `build` never
    /// affect aspects built earlier.
    ///
    /// A builder with no declared targets still builds; the resulting
    /// aspect is rejected at weave time, the first point where the missing
    /// configuration is observable.
    pub fn build(&self) -> Aspect {
        Aspect {
            targets: self.targets.clone(),
            registry: Arc::new(AdviceRegistry::new(
                self.before.clone(),
                self.around.clone(),
                self.after.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::Timing;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn greet() -> OperationId {
        OperationId::new("Greeting", "greet(&str)")
    }

    fn deliver() -> OperationId {
        OperationId::new("Messaging", "deliver_message(&str)")
    }

    #[test]
    fn test_targets_last_write_wins() {
        let aspect = AspectBuilder::new()
            .with_targets(["Greeting", "Messaging"])
            .with_targets(["Messaging"])
            .build();

        assert_eq!(aspect.targets().len(), 1);
        assert!(aspect.targets().contains("Messaging"));
    }

    #[test]
    fn test_registration_covers_every_listed_operation() {
        let aspect = AspectBuilder::new()
            .with_targets(["Greeting", "Messaging"])
            .with_before_advice_for(Advice::new(|| {}), [greet(), deliver()])
            .build();

        assert!(aspect.registry().lookup(Timing::Before, &greet()).is_some());
        assert!(aspect.registry().lookup(Timing::Before, &deliver()).is_some());
        assert!(aspect.registry().lookup(Timing::After, &greet()).is_none());
    }

    #[test]
    fn test_reregistration_replaces_action() {
        let hits = Arc::new(AtomicUsize::new(0));

        let first = Advice::new(|| panic!("replaced action must never fire"));
        let h = Arc::clone(&hits);
        let second = Advice::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let aspect = AspectBuilder::new()
            .with_targets(["Greeting"])
            .with_before_advice_for(first, [greet()])
            .with_before_advice_for(second, [greet()])
            .build();

        aspect
            .registry()
            .lookup(Timing::Before, &greet())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_operation_list_is_noop() {
        let aspect = AspectBuilder::new()
            .with_targets(["Greeting"])
            .with_around_advice_for(Advice::new(|| {}), [])
            .build();

        assert!(aspect.registry().is_empty());
    }

    #[test]
    fn test_build_snapshots_are_independent() {
        let builder = AspectBuilder::new()
            .with_targets(["Greeting"])
            .with_before_advice_for(Advice::new(|| {}), [greet()]);

        let first = builder.build();
        let second = builder.build();

        // Same frozen data, independent registries.
        assert!(!Arc::ptr_eq(first.registry(), second.registry()));
        assert_eq!(first.registry().len(), second.registry().len());
        assert_eq!(first.targets(), second.targets());
    }

    #[test]
    fn test_mutation_after_build_does_not_leak_back() {
        let builder = AspectBuilder::new().with_targets(["Greeting"]);
        let frozen = builder.build();

        let builder = builder.with_after_advice_for(Advice::new(|| {}), [greet()]);
        let rebuilt = builder.build();

        assert!(frozen.registry().lookup(Timing::After, &greet()).is_none());
        assert!(rebuilt.registry().lookup(Timing::After, &greet()).is_some());
    }

    #[test]
    fn test_build_without_targets_is_allowed() {
        let aspect = AspectBuilder::new().build();
        assert!(aspect.targets().is_empty());
    }
}
