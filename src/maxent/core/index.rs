//! Append-only bijective index from opaque items to dense ids.
//!
//! Purpose
//! -------
//! Map feature and label identifiers to the contiguous integers `0..N-1`
//! used by data views and weight vectors, and back again when a trained
//! model reports a class.
//!
//! Key behaviors
//! -------------
//! - [`Index::add`] returns the existing id of a known item or appends a new
//!   one while the index is growable.
//! - [`Index::lock`] freezes the mapping. Adding an unseen item afterwards
//!   fails with [`MaxentError::IndexLocked`]; lookups always succeed.
//!
//! Invariants & assumptions
//! ------------------------
//! - `items[positions[x]] == x` for every stored item.
//! - Ids are never reassigned or removed.
use crate::maxent::errors::{MaxentError, MaxentResult};
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::Debug,
    hash::Hash,
};

/// Bijective, append-only mapping from items to dense ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Index<T: Eq + Hash> {
    items: Vec<T>,
    positions: HashMap<T, usize>,
    locked: bool,
}

/// Index over feature identifiers.
pub type FeatureIndex<F> = Index<F>;

/// Index over label identifiers.
pub type LabelIndex<L> = Index<L>;

impl<T: Eq + Hash + Clone + Debug> Index<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), positions: HashMap::new(), locked: false }
    }

    /// Return the id of `item`, appending it if it is new.
    ///
    /// # Errors
    /// - [`MaxentError::IndexLocked`] if `item` is new and the index is
    ///   locked.
    pub fn add(&mut self, item: T) -> MaxentResult<usize> {
        if let Some(&id) = self.positions.get(&item) {
            return Ok(id);
        }
        if self.locked {
            return Err(MaxentError::IndexLocked { item: format!("{item:?}") });
        }
        let id = self.items.len();
        self.positions.insert(item.clone(), id);
        self.items.push(item);
        Ok(id)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.positions.get(item).copied()
    }

    pub fn get(&self, id: usize) -> Option<&T> {
        self.items.get(id)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.positions.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Freeze the mapping; the index stays locked for its lifetime.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Eq + Hash + Clone + Debug> Default for Index<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone + Debug> FromIterator<T> for Index<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut index = Index::new();
        for item in iter {
            let id = index.items.len();
            if let Entry::Vacant(slot) = index.positions.entry(item.clone()) {
                slot.insert(id);
                index.items.push(item);
            }
        }
        index
    }
}
