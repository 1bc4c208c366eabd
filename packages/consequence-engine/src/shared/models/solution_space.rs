//! Solution spaces: the enumerated satisfying assignments of one instance
//!
//! A `SolutionSpace` is validated at construction and immutable afterwards.
//! Fields are private so referential integrity (every true id is a key of
//! the predicate table) cannot be broken after the fact.

use super::instance::InstanceName;
use super::predicate::{Predicate, PredicateId};
use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One satisfying assignment; predicates not listed are false
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Zero-based position in the artifact's solution list
    pub id: usize,
    pub true_predicate_ids: BTreeSet<PredicateId>,
}

impl Solution {
    pub fn holds(&self, id: PredicateId) -> bool {
        self.true_predicate_ids.contains(&id)
    }

    /// True if any of `ids` holds
    pub fn holds_any(&self, ids: &[PredicateId]) -> bool {
        ids.iter().any(|id| self.holds(*id))
    }
}

#[derive(Debug, Clone)]
pub struct SolutionSpace {
    instance_name: InstanceName,
    predicates: BTreeMap<PredicateId, Predicate>,
    solutions: Vec<Solution>,
    satisfiable: bool,
    /// name -> bound ids, ascending
    name_index: BTreeMap<String, Vec<PredicateId>>,
    fingerprint: blake3::Hash,
}

impl SolutionSpace {
    /// Validate and build a space
    ///
    /// Fails with `MalformedArtifact` on duplicate predicate ids, a solution
    /// referencing an unknown id, an empty predicate name, or a
    /// satisfiability flag that disagrees with the solution list.
    pub fn new<S, I>(
        instance_name: InstanceName,
        predicates: Vec<Predicate>,
        solutions: S,
        satisfiable: bool,
    ) -> Result<Self>
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = PredicateId>,
    {
        let artifact = instance_name.as_str().to_string();

        let mut table = BTreeMap::new();
        for predicate in predicates {
            if predicate.name.trim().is_empty() {
                return Err(EngineError::malformed(
                    &artifact,
                    format!("predicate {} has an empty name", predicate.id),
                ));
            }
            let id = predicate.id;
            if table.insert(id, predicate).is_some() {
                return Err(EngineError::malformed(
                    &artifact,
                    format!("duplicate predicate id {}", id),
                ));
            }
        }

        let mut solution_list = Vec::new();
        for (position, ids) in solutions.into_iter().enumerate() {
            let true_predicate_ids: BTreeSet<PredicateId> = ids.into_iter().collect();
            if let Some(unknown) = true_predicate_ids.iter().find(|id| !table.contains_key(*id)) {
                return Err(EngineError::malformed(
                    &artifact,
                    format!("solution {} references unknown predicate id {}", position, unknown),
                ));
            }
            solution_list.push(Solution {
                id: position,
                true_predicate_ids,
            });
        }

        if satisfiable && solution_list.is_empty() {
            return Err(EngineError::malformed(
                &artifact,
                "marked satisfiable but lists no solutions",
            ));
        }
        if !satisfiable && !solution_list.is_empty() {
            return Err(EngineError::malformed(
                &artifact,
                format!(
                    "marked unsatisfiable but lists {} solutions",
                    solution_list.len()
                ),
            ));
        }

        let mut name_index: BTreeMap<String, Vec<PredicateId>> = BTreeMap::new();
        for (id, predicate) in &table {
            name_index.entry(predicate.name.clone()).or_default().push(*id);
        }

        let fingerprint = fingerprint_of(&instance_name, &table, &solution_list, satisfiable);

        Ok(Self {
            instance_name,
            predicates: table,
            solutions: solution_list,
            satisfiable,
            name_index,
            fingerprint,
        })
    }

    pub fn instance_name(&self) -> &InstanceName {
        &self.instance_name
    }

    pub fn predicates(&self) -> &BTreeMap<PredicateId, Predicate> {
        &self.predicates
    }

    pub fn predicate(&self, id: PredicateId) -> Option<&Predicate> {
        self.predicates.get(&id)
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn total_solutions(&self) -> usize {
        self.solutions.len()
    }

    pub fn satisfiable(&self) -> bool {
        self.satisfiable
    }

    /// Ids bound to `name`, ascending; None if the name is not in the table
    pub fn ids_for(&self, name: &str) -> Option<&[PredicateId]> {
        self.name_index.get(name).map(|ids| ids.as_slice())
    }

    /// Distinct predicate names in lexical order
    pub fn predicate_names(&self) -> impl Iterator<Item = &str> {
        self.name_index.keys().map(|name| name.as_str())
    }

    /// (name, bound ids) pairs in lexical name order
    pub fn name_bindings(&self) -> impl Iterator<Item = (&str, &[PredicateId])> {
        self.name_index
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn distinct_names(&self) -> usize {
        self.name_index.len()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn fingerprint(&self) -> &blake3::Hash {
        &self.fingerprint
    }

    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint.to_hex().to_string()
    }
}

fn fingerprint_of(
    instance_name: &InstanceName,
    predicates: &BTreeMap<PredicateId, Predicate>,
    solutions: &[Solution],
    satisfiable: bool,
) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(instance_name.as_str().as_bytes());
    hasher.update(&[0]);
    for (id, predicate) in predicates {
        hasher.update(&id.0.to_le_bytes());
        hasher.update(predicate.name.as_bytes());
        hasher.update(&[0]);
        hasher.update(predicate.kind.as_str().as_bytes());
        hasher.update(&[0]);
        for arg in &predicate.arguments {
            hasher.update(arg.as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(predicate.full_expression.as_bytes());
        hasher.update(&[1]);
    }
    for solution in solutions {
        hasher.update(&(solution.true_predicate_ids.len() as u64).to_le_bytes());
        for id in &solution.true_predicate_ids {
            hasher.update(&id.0.to_le_bytes());
        }
    }
    hasher.update(&[satisfiable as u8]);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::PredicateKind;

    fn ids(raw: &[u32]) -> Vec<PredicateId> {
        raw.iter().copied().map(PredicateId).collect()
    }

    fn table() -> Vec<Predicate> {
        vec![
            Predicate::new(1, "pay_rent", PredicateKind::Obligation, vec!["tenant".into()]),
            Predicate::new(2, "pay_rent", PredicateKind::Obligation, vec!["guarantor".into()]),
            Predicate::new(3, "grant_use", PredicateKind::Obligation, vec![]),
        ]
    }

    fn name(raw: &str) -> InstanceName {
        InstanceName::new(raw).unwrap()
    }

    #[test]
    fn test_name_index_groups_bindings() {
        let space = SolutionSpace::new(name("lease"), table(), vec![ids(&[1, 3])], true).unwrap();
        assert_eq!(space.ids_for("pay_rent"), Some(&[PredicateId(1), PredicateId(2)][..]));
        assert_eq!(space.distinct_names(), 2);
        assert_eq!(space.predicate_names().collect::<Vec<_>>(), vec!["grant_use", "pay_rent"]);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let err = SolutionSpace::new(name("lease"), table(), vec![ids(&[1, 9])], true).unwrap_err();
        assert!(err.to_string().contains("unknown predicate id 9"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut predicates = table();
        predicates.push(Predicate::new(3, "return_system", PredicateKind::Act, vec![]));
        let err = SolutionSpace::new(name("lease"), predicates, vec![ids(&[1])], true).unwrap_err();
        assert!(err.to_string().contains("duplicate predicate id 3"));
    }

    #[test]
    fn test_satisfiability_flag_must_agree() {
        let empty: Vec<Vec<PredicateId>> = vec![];
        assert!(SolutionSpace::new(name("lease"), table(), empty.clone(), true).is_err());
        assert!(SolutionSpace::new(name("lease"), table(), vec![ids(&[1])], false).is_err());
        let unsat = SolutionSpace::new(name("lease"), table(), empty, false).unwrap();
        assert_eq!(unsat.total_solutions(), 0);
    }

    #[test]
    fn test_solution_is_a_set() {
        let space = SolutionSpace::new(name("lease"), table(), vec![ids(&[3, 1, 3])], true).unwrap();
        assert_eq!(space.solutions()[0].true_predicate_ids.len(), 2);
        assert!(space.solutions()[0].holds_any(&[PredicateId(2), PredicateId(3)]));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = SolutionSpace::new(name("lease"), table(), vec![ids(&[1])], true).unwrap();
        let b = SolutionSpace::new(name("lease"), table(), vec![ids(&[1])], true).unwrap();
        let c = SolutionSpace::new(name("lease"), table(), vec![ids(&[3])], true).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
