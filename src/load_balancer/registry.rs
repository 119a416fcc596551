//! Endpoint registry.
//!
//! # Responsibilities
//! - Own the active sequence, the removed set and the round-robin cursor
//! - Serialize every read-modify-write of that state behind one mutex
//! - Move endpoints between active and removed idempotently
//!
//! # Invariants
//! - `active` and `removed` are disjoint
//! - `active` holds no duplicates
//! - The cursor is never reset; indices wrap at read time
//!
//! The lock is only ever held for in-memory transitions. Callers perform
//! network I/O on the values handed back, never under the lock.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::load_balancer::endpoint::Endpoint;
use crate::load_balancer::round_robin::RoundRobin;
use crate::observability::metrics;

#[derive(Debug, Default)]
struct RegistryState {
    active: Vec<Endpoint>,
    removed: HashSet<Endpoint>,
    selector: RoundRobin,
}

/// The shared registry of backend endpoints.
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

/// A consistent, detached copy of the registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    /// Active endpoints in selection order.
    pub active: Vec<String>,
    /// Removed endpoints, sorted.
    pub removed: Vec<String>,
    /// Current cursor value.
    pub cursor: u64,
}

impl Registry {
    /// Build a registry from configured specifications.
    ///
    /// Invalid specifications are logged and skipped. Repeated specifications
    /// are kept once, at their first position.
    pub fn new<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut active: Vec<Endpoint> = Vec::new();

        for spec in specs {
            let spec = spec.as_ref();
            match Endpoint::parse(spec) {
                Ok(endpoint) => {
                    if active.contains(&endpoint) {
                        tracing::warn!(endpoint = %endpoint, "Duplicate backend URL ignored");
                        continue;
                    }
                    active.push(endpoint);
                }
                Err(e) => {
                    tracing::warn!(spec = %spec, error = %e, "Invalid URL");
                }
            }
        }

        Self::from_endpoints(active)
    }

    /// Build a registry from already parsed endpoints (duplicates dropped).
    pub fn from_endpoints(endpoints: Vec<Endpoint>) -> Self {
        let mut active: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            if !active.contains(&endpoint) {
                active.push(endpoint);
            }
        }

        metrics::record_registry_sizes(active.len(), 0);

        Self {
            state: Mutex::new(RegistryState {
                active,
                removed: HashSet::new(),
                selector: RoundRobin::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().expect("endpoint registry mutex poisoned")
    }

    /// Select the next active endpoint in round-robin order.
    ///
    /// Returns `None` when no endpoint is active.
    pub fn next_endpoint(&self) -> Option<Endpoint> {
        let mut state = self.lock();
        let RegistryState { active, selector, .. } = &mut *state;
        selector.next(active.as_slice()).cloned()
    }

    /// Move `endpoint` from active to removed.
    ///
    /// Returns false (and changes nothing) if it was not active.
    pub fn remove(&self, endpoint: &Endpoint) -> bool {
        let mut state = self.lock();
        let Some(index) = state.active.iter().position(|e| e == endpoint) else {
            return false;
        };

        let endpoint = state.active.remove(index);
        state.removed.insert(endpoint);
        metrics::record_registry_sizes(state.active.len(), state.removed.len());
        true
    }

    /// Move `endpoint` from removed back to the end of the active sequence.
    ///
    /// Returns false (and changes nothing) if it was not removed.
    pub fn reinstate(&self, endpoint: &Endpoint) -> bool {
        let mut state = self.lock();
        let Some(endpoint) = state.removed.take(endpoint) else {
            return false;
        };

        state.active.push(endpoint);
        metrics::record_registry_sizes(state.active.len(), state.removed.len());
        true
    }

    /// Copy of the removed set, for probing outside the lock.
    pub fn snapshot_removed(&self) -> HashSet<Endpoint> {
        self.lock().removed.clone()
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.lock();
        let mut removed: Vec<String> = state.removed.iter().map(|e| e.to_string()).collect();
        removed.sort();

        RegistrySnapshot {
            active: state.active.iter().map(|e| e.to_string()).collect(),
            removed,
            cursor: state.selector.cursor(),
        }
    }

    pub fn active_len(&self) -> usize {
        self.lock().active.len()
    }

    pub fn removed_len(&self) -> usize {
        self.lock().removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const BACKENDS: [&str; 3] = [
        "http://localhost:81",
        "http://localhost:82",
        "http://localhost:83",
    ];

    fn ep(spec: &str) -> Endpoint {
        Endpoint::parse(spec).unwrap()
    }

    fn assert_invariants(registry: &Registry) {
        let snap = registry.snapshot();
        let active: HashSet<&String> = snap.active.iter().collect();
        assert_eq!(active.len(), snap.active.len(), "duplicate in active: {:?}", snap.active);
        for r in &snap.removed {
            assert!(!active.contains(r), "{} is both active and removed", r);
        }
    }

    #[test]
    fn test_round_robin_order_and_fairness() {
        let registry = Registry::new(BACKENDS);
        let picked: Vec<Endpoint> = (0..6).map(|_| registry.next_endpoint().unwrap()).collect();

        let expected: Vec<Endpoint> =
            BACKENDS.iter().chain(BACKENDS.iter()).map(|s| ep(s)).collect();
        assert_eq!(picked, expected);
    }

    #[test]
    fn test_remove_excludes_endpoint() {
        let registry = Registry::new(BACKENDS);
        assert!(registry.remove(&ep("http://localhost:82")));

        let mut counts = std::collections::HashMap::new();
        for _ in 0..4 {
            let e = registry.next_endpoint().unwrap();
            assert_ne!(e, ep("http://localhost:82"));
            *counts.entry(e.to_string()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 2);
        assert!(counts.values().all(|&c| c == 2));
        assert_invariants(&registry);
    }

    #[test]
    fn test_remove_matches_independently_parsed_value() {
        let registry = Registry::new(["http://localhost:82"]);
        let reparsed = Endpoint::parse("http://localhost:82/").unwrap();
        assert!(registry.remove(&reparsed));
        assert_eq!(registry.active_len(), 0);
        assert_eq!(registry.removed_len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = Registry::new(BACKENDS);
        assert!(registry.remove(&ep("http://localhost:82")));
        let before = registry.snapshot();

        assert!(!registry.remove(&ep("http://localhost:82")));
        assert!(!registry.remove(&ep("http://localhost:99")));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_reinstate_of_active_is_noop() {
        let registry = Registry::new(BACKENDS);
        let before = registry.snapshot();
        assert!(!registry.reinstate(&ep("http://localhost:81")));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_reinstate_appends_to_end() {
        let registry = Registry::new(BACKENDS);
        registry.remove(&ep("http://localhost:81"));
        assert!(registry.reinstate(&ep("http://localhost:81")));

        let snap = registry.snapshot();
        assert_eq!(
            snap.active,
            vec!["http://localhost:82/", "http://localhost:83/", "http://localhost:81/"]
        );
        assert!(snap.removed.is_empty());
    }

    #[test]
    fn test_empty_registry_stays_empty_until_reinstate() {
        let registry = Registry::new(["http://localhost:81"]);
        let e = registry.next_endpoint().unwrap();
        registry.remove(&e);

        for _ in 0..5 {
            assert!(registry.next_endpoint().is_none());
        }

        registry.reinstate(&e);
        assert_eq!(registry.next_endpoint(), Some(e));
    }

    #[test]
    fn test_invalid_and_duplicate_specs_are_skipped() {
        let registry = Registry::new([
            "http://localhost:81",
            "::not-a-url",
            "https://secure:443",
            "http://localhost:81/",
            "http://localhost:82",
        ]);
        let snap = registry.snapshot();
        assert_eq!(snap.active, vec!["http://localhost:81/", "http://localhost:82/"]);
        assert!(snap.removed.is_empty());
    }

    #[test]
    fn test_cursor_survives_shrink_and_grow() {
        let registry = Registry::new(BACKENDS);
        for _ in 0..5 {
            registry.next_endpoint();
        }
        registry.remove(&ep("http://localhost:83"));
        registry.reinstate(&ep("http://localhost:83"));
        assert_eq!(registry.snapshot().cursor, 5);
    }

    #[test]
    fn test_snapshot_removed_is_detached() {
        let registry = Registry::new(BACKENDS);
        registry.remove(&ep("http://localhost:82"));
        let removed = registry.snapshot_removed();
        registry.reinstate(&ep("http://localhost:82"));

        assert!(removed.contains(&ep("http://localhost:82")));
        assert_eq!(registry.removed_len(), 0);
    }

    #[test]
    fn test_invariants_under_interleaving() {
        let registry = Registry::new(BACKENDS);
        let ops: [(bool, &str); 10] = [
            (true, "http://localhost:81"),
            (true, "http://localhost:81"),
            (false, "http://localhost:82"),
            (true, "http://localhost:83"),
            (false, "http://localhost:81"),
            (false, "http://localhost:81"),
            (true, "http://localhost:82"),
            (false, "http://localhost:83"),
            (true, "http://localhost:82"),
            (false, "http://localhost:82"),
        ];
        for (remove, spec) in ops {
            if remove {
                registry.remove(&ep(spec));
            } else {
                registry.reinstate(&ep(spec));
            }
            assert_invariants(&registry);
            let snap = registry.snapshot();
            assert_eq!(snap.active.len() + snap.removed.len(), 3);
        }
    }

    #[test]
    fn test_concurrent_remove_and_reinstate() {
        let registry = Arc::new(Registry::new(BACKENDS));
        let mut handles = Vec::new();

        for t in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..500 {
                    let target = ep(BACKENDS[(t + i) % 3]);
                    match i % 3 {
                        0 => {
                            registry.remove(&target);
                        }
                        1 => {
                            registry.reinstate(&target);
                        }
                        _ => {
                            registry.next_endpoint();
                        }
                    }
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_invariants(&registry);
        let snap = registry.snapshot();
        assert_eq!(snap.active.len() + snap.removed.len(), 3);
    }
}
