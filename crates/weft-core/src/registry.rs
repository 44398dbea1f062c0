//! The advice registry: a frozen mapping from operation to advice.
//!
//! A registry is built once by [`AspectBuilder::build`](crate::AspectBuilder)
//! and never mutated afterwards. Concurrent lookups from any number of
//! proxies need no locking.

use crate::advice::{Advice, Timing};
use crate::operation::OperationId;
use std::collections::HashMap;

/// Read-only mapping from operation identifier to at most one advice action
/// per timing category.
#[derive(Debug, Default)]
pub struct AdviceRegistry {
    before: HashMap<OperationId, Advice>,
    around: HashMap<OperationId, Advice>,
    after: HashMap<OperationId, Advice>,
}

impl AdviceRegistry {
    pub(crate) fn new(
        before: HashMap<OperationId, Advice>,
        around: HashMap<OperationId, Advice>,
        after: HashMap<OperationId, Advice>,
    ) -> Self {
        Self {
            before,
            around,
            after,
        }
    }

    /// Look up the advice registered for `operation` under `timing`.
    ///
    /// Absence is a normal outcome, not a failure: most operations of a
    /// woven interface typically carry no advice at all.
    pub fn lookup(&self, timing: Timing, operation: &OperationId) -> Option<&Advice> {
        self.map_for(timing).get(operation)
    }

    /// Iterate every (timing, operation) pair that has advice registered.
    /// Used by the weaver to validate an aspect against an interface's
    /// operation table.
    pub fn registrations(&self) -> impl Iterator<Item = (Timing, &OperationId)> {
        self.before
            .keys()
            .map(|op| (Timing::Before, op))
            .chain(self.around.keys().map(|op| (Timing::Around, op)))
            .chain(self.after.keys().map(|op| (Timing::After, op)))
    }

    /// Total number of registered actions across all timing categories.
    pub fn len(&self) -> usize {
        self.before.len() + self.around.len() + self.after.len()
    }

    /// True when no advice is registered at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map_for(&self, timing: Timing) -> &HashMap<OperationId, Advice> {
        match timing {
            Timing::Before => &self.before,
            Timing::Around => &self.around,
            Timing::After => &self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn greet() -> OperationId {
        OperationId::new("Greeting", "greet(&str)")
    }

    #[test]
    fn test_lookup_hits_only_registered_timing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let mut before = HashMap::new();
        before.insert(
            greet(),
            Advice::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let registry = AdviceRegistry::new(before, HashMap::new(), HashMap::new());

        assert!(registry.lookup(Timing::Before, &greet()).is_some());
        assert!(registry.lookup(Timing::Around, &greet()).is_none());
        assert!(registry.lookup(Timing::After, &greet()).is_none());

        registry.lookup(Timing::Before, &greet()).unwrap().run().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lookup_misses_other_operations() {
        let mut around = HashMap::new();
        around.insert(greet(), Advice::new(|| {}));
        let registry = AdviceRegistry::new(HashMap::new(), around, HashMap::new());

        let other = OperationId::new("Greeting", "wave()");
        assert!(registry.lookup(Timing::Around, &other).is_none());
    }

    #[test]
    fn test_registrations_cover_all_timings() {
        let mut before = HashMap::new();
        before.insert(greet(), Advice::new(|| {}));
        let mut after = HashMap::new();
        after.insert(greet(), Advice::new(|| {}));
        let registry = AdviceRegistry::new(before, HashMap::new(), after);

        let mut pairs: Vec<_> = registry
            .registrations()
            .map(|(t, op)| (t, op.clone()))
            .collect();
        pairs.sort_by_key(|(t, _)| format!("{t}"));

        assert_eq!(registry.len(), 2);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(Timing::Before, greet())));
        assert!(pairs.contains(&(Timing::After, greet())));
    }

    #[test]
    fn test_empty_registry() {
        let registry = AdviceRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.lookup(Timing::Before, &greet()).is_none());
    }
}
