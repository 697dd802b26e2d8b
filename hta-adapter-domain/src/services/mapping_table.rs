// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Bidirectional input-name -> canonical-metric-name registry.
//!
//! Modeled directly on `original_source/src/async_hta_service.hpp`'s
//! `register_input_mapping_`/`get_mapped_name_`: one lock guards both the
//! `input -> name` map and the set of claimed names, so `register` and the
//! auto-registration path inside `resolve` can never race each other into
//! violating injectivity (spec.md §3, invariant 2).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::HtaError;
use crate::value_objects::metric_name::{InputName, MetricName};

#[derive(Default)]
struct Inner {
    input_to_name: HashMap<InputName, MetricName>,
    claimed_names: HashSet<MetricName>,
}

/// Injective input-name -> metric-name registry (spec.md §4.2).
pub struct MappingTable {
    inner: Mutex<Inner>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Registers `input -> name`. Fails with `AmbiguousMapping` if `name`
    /// is already claimed by any mapping, or `DuplicateInput` if `input` is
    /// already registered — including re-registering an identical pair.
    pub fn register(&self, input: InputName, name: MetricName) -> Result<(), HtaError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Self::register_locked(&mut inner, input, name)
    }

    fn register_locked(inner: &mut Inner, input: InputName, name: MetricName) -> Result<(), HtaError> {
        if inner.claimed_names.contains(&name) {
            return Err(HtaError::AmbiguousMapping {
                name: name.into_string(),
            });
        }
        if inner.input_to_name.contains_key(&input) {
            return Err(HtaError::DuplicateInput {
                input: input.into_string(),
            });
        }
        inner.claimed_names.insert(name.clone());
        inner.input_to_name.insert(input, name);
        Ok(())
    }

    /// Returns the registered target for `input`, or, if none exists,
    /// atomically registers `(input, input)` (identity mapping) and
    /// returns that name. The auto-registration runs under the same lock
    /// as `register`, so a concurrent `register` racing against an unknown
    /// input can never produce a duplicate claim.
    pub fn resolve(&self, input: &InputName) -> MetricName {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(name) = inner.input_to_name.get(input) {
            return name.clone();
        }
        let name = input.to_metric_name();
        // Identity registration cannot fail: `input` is (by construction of
        // this branch) not yet a key, and the only way `name` could already
        // be claimed is if some other input mapped to the same string,
        // which would itself have been rejected by `register` as
        // ambiguous. Treat the impossible case as a no-op rather than
        // panicking on an internal invariant.
        let _ = Self::register_locked(&mut inner, input.clone(), name.clone());
        name
    }

    /// Current set of registered `(input, name)` pairs, in the order
    /// returned by `async_configure`'s subscription list.
    pub fn subscriptions(&self) -> Vec<(InputName, MetricName)> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.input_to_name.iter().map(|(i, n)| (i.clone(), n.clone())).collect()
    }

    pub fn contains_input(&self, input: &InputName) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.input_to_name.contains_key(input)
    }

    /// Whether `name` has already been claimed by some mapping. Used by
    /// callers that want to validate a batch of candidate registrations
    /// before committing any of them (e.g. `HtaService::configure`'s
    /// all-or-nothing semantics).
    pub fn contains_name(&self, name: &MetricName) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.claimed_names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(s: &str) -> InputName {
        InputName::new(s).unwrap()
    }

    fn name(s: &str) -> MetricName {
        MetricName::new(s).unwrap()
    }

    #[test]
    fn register_then_resolve_returns_mapped_name() {
        let table = MappingTable::new();
        table.register(input("b.raw"), name("b")).unwrap();
        assert_eq!(table.resolve(&input("b.raw")), name("b"));
    }

    #[test]
    fn resolve_unknown_input_auto_registers_identity() {
        let table = MappingTable::new();
        let resolved = table.resolve(&input("a"));
        assert_eq!(resolved, name("a"));
        assert!(table.contains_input(&input("a")));
    }

    #[test]
    fn ambiguous_mapping_is_rejected() {
        let table = MappingTable::new();
        table.register(input("x"), name("shared")).unwrap();
        let err = table.register(input("y"), name("shared")).unwrap_err();
        assert!(matches!(err, HtaError::AmbiguousMapping { .. }));
    }

    #[test]
    fn duplicate_input_is_rejected() {
        let table = MappingTable::new();
        table.register(input("x"), name("a")).unwrap();
        let err = table.register(input("x"), name("b")).unwrap_err();
        assert!(matches!(err, HtaError::DuplicateInput { .. }));
    }

    #[test]
    fn reregistering_identical_pair_is_a_duplicate_error() {
        let table = MappingTable::new();
        table.register(input("x"), name("a")).unwrap();
        let err = table.register(input("x"), name("a")).unwrap_err();
        assert!(matches!(err, HtaError::DuplicateInput { .. }));
    }

    #[test]
    fn subscriptions_reflects_all_registered_pairs() {
        let table = MappingTable::new();
        table.register(input("a"), name("a")).unwrap();
        table.register(input("b.raw"), name("b")).unwrap();
        let mut subs = table.subscriptions();
        subs.sort();
        assert_eq!(
            subs,
            vec![(input("a"), name("a")), (input("b.raw"), name("b"))]
        );
    }
}
