//! Set reconciliation between current and desired membership lists

use std::collections::HashSet;
use std::hash::Hash;

/// Venn split of a current and a target list, both treated as sets.
/// Element order inside each field is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<T> {
    /// In current, not in target
    pub remove_only: Vec<T>,
    /// In target, not in current
    pub add_only: Vec<T>,
    pub intersection: Vec<T>,
    pub union: Vec<T>,
}

pub fn reconcile<T>(current: &[T], target: &[T]) -> Reconciliation<T>
where
    T: Eq + Hash + Clone,
{
    let current: HashSet<&T> = current.iter().collect();
    let target: HashSet<&T> = target.iter().collect();

    Reconciliation {
        remove_only: current.difference(&target).map(|t| (*t).clone()).collect(),
        add_only: target.difference(&current).map(|t| (*t).clone()).collect(),
        intersection: current.intersection(&target).map(|t| (*t).clone()).collect(),
        union: current.union(&target).map(|t| (*t).clone()).collect(),
    }
}
