//! Leaf resolver.
//!
//! Given the extension modules located across the walked packages, keeps only
//! the concrete candidates that no other discovered concrete candidate
//! supersedes. Supersession follows `replaces` links transitively, through
//! abstract candidates as well, so `B <- X <- Y` resolves to `{Y}` while two
//! unrelated overrides of `B` both survive.
//!
//! Output order is module order (the walker's topological order) and then
//! declaration order inside each module.

use std::collections::{HashMap, HashSet};

use crate::extension::{Candidate, ExtensionModule};
use crate::types::CandidateId;

/// Resolve the leaf candidates among `modules`, which must be in walk order.
pub fn resolve_leaves<'p, T: ?Sized>(modules: &[&'p ExtensionModule<T>]) -> Vec<&'p Candidate<T>> {
    let mut by_id: HashMap<&'p CandidateId, &'p Candidate<T>> = HashMap::new();
    let mut ordered: Vec<&'p Candidate<T>> = Vec::new();
    for module in modules.iter().copied() {
        for candidate in module.candidates() {
            if by_id.contains_key(&candidate.id) {
                tracing::warn!(
                    candidate = %candidate.id,
                    module = %module.path,
                    "duplicate candidate registration ignored"
                );
                continue;
            }
            by_id.insert(&candidate.id, candidate);
            ordered.push(candidate);
        }
    }

    let mut superseded: HashSet<&'p CandidateId> = HashSet::new();
    for candidate in ordered.iter().copied().filter(|c| !c.is_abstract()) {
        let mut seen: HashSet<&CandidateId> = HashSet::from([&candidate.id]);
        let mut next = candidate.replaces.as_ref();
        while let Some(id) = next {
            if !seen.insert(id) {
                tracing::warn!(candidate = %candidate.id, "cyclic replaces chain");
                break;
            }
            superseded.insert(id);
            next = by_id.get(id).and_then(|c| c.replaces.as_ref());
        }
    }

    let leaves: Vec<&'p Candidate<T>> = ordered
        .into_iter()
        .filter(|c| !c.is_abstract() && !superseded.contains(&c.id))
        .collect();
    tracing::debug!(
        leaves = ?leaves.iter().map(|c| c.id.0.as_str()).collect::<Vec<_>>(),
        "resolved leaf candidates"
    );
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Unit {}
    struct Any;
    impl Unit for Any {}

    fn make() -> Box<dyn Unit> {
        Box::new(Any)
    }

    fn ids<T: ?Sized>(leaves: &[&Candidate<T>]) -> Vec<String> {
        leaves.iter().map(|c| c.id.0.clone()).collect()
    }

    #[test]
    fn empty_module_set_yields_no_leaves() {
        let leaves = resolve_leaves::<dyn Unit>(&[]);
        assert!(leaves.is_empty());
    }

    #[test]
    fn abstract_candidates_never_survive() {
        let mut m = ExtensionModule::<dyn Unit>::new("rigger::dev::units");
        m.register(Candidate::abstract_type("rigger::dev::units::Base"));
        assert!(resolve_leaves(&[&m]).is_empty());
    }

    #[test]
    fn abstract_descendant_does_not_hide_concrete_ancestor() {
        let mut m = ExtensionModule::<dyn Unit>::new("rigger::dev::units");
        m.register(Candidate::concrete("rigger::dev::units::X", make))
            .register(Candidate::abstract_type("rigger::dev::units::Y").replaces("rigger::dev::units::X"));
        assert_eq!(ids(&resolve_leaves(&[&m])), vec!["rigger::dev::units::X"]);
    }

    #[test]
    fn duplicate_ids_keep_first_registration() {
        let mut m = ExtensionModule::<dyn Unit>::new("rigger::dev::units");
        m.register(Candidate::concrete("rigger::dev::units::X", make))
            .register(Candidate::concrete("rigger::dev::units::X", make));
        assert_eq!(resolve_leaves(&[&m]).len(), 1);
    }

    #[test]
    fn cyclic_replaces_terminates() {
        let mut m = ExtensionModule::<dyn Unit>::new("rigger::dev::units");
        m.register(Candidate::concrete("a", make).replaces("b"))
            .register(Candidate::concrete("b", make).replaces("a"));
        assert!(resolve_leaves(&[&m]).is_empty());
    }
}
