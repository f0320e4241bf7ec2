//! Integer-position reconciliation for lists and items.
//!
//! A reorder names some or all of the entities in a scope (a list's items,
//! or an actor's visible lists) in their desired order. Named entities take
//! their 0-based position in that sequence as their new `sort_order`;
//! unnamed entities keep their prior value untouched, even when that leaves
//! duplicates or gaps; positions are never renormalized. The scope is then
//! re-sorted by the resulting values, with ties broken by prior relative
//! order (stable sort).

pub mod errors;

use std::collections::HashMap;

pub use errors::OrderError;

use crate::list::{Item, List};

/// An entity carrying an integer position within some scope.
pub trait Sortable {
    /// The identifier a reorder request refers to this entity by.
    fn sort_key(&self) -> &str;

    /// The current position value.
    fn sort_order(&self) -> i64;

    /// Replace the position value.
    fn set_sort_order(&mut self, sort_order: i64);
}

impl Sortable for Item {
    fn sort_key(&self) -> &str {
        self.item_id.as_str()
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

impl Sortable for List {
    fn sort_key(&self) -> &str {
        self.list_id.as_str()
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

/// Reconcile `entries` against a desired order.
///
/// `desired` may be a strict subset of the scope; it must not name ids
/// outside it. On success the slice is re-sorted in place by the resulting
/// positions.
///
/// # Errors
/// * `OrderError::UnknownIdentifiers` if `desired` names ids not present in
///   `entries`; the scope is left untouched
pub fn apply_reorder<T, S>(entries: &mut [T], desired: &[S]) -> Result<(), OrderError>
where
    T: Sortable,
    S: AsRef<str>,
{
    let unknown: Vec<String> = desired
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| !entries.iter().any(|e| e.sort_key() == *id))
        .map(str::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(OrderError::UnknownIdentifiers { ids: unknown });
    }

    // Later occurrences win if an id is named twice.
    let positions: HashMap<&str, i64> = desired
        .iter()
        .enumerate()
        .map(|(position, id)| (id.as_ref(), position as i64))
        .collect();

    for entry in entries.iter_mut() {
        if let Some(&position) = positions.get(entry.sort_key()) {
            entry.set_sort_order(position);
        }
    }

    // Stable: equal positions keep their prior relative order.
    entries.sort_by_key(Sortable::sort_order);
    Ok(())
}
