// src/form/arena.rs - Ordered, id-keyed storage for variants and images

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Stable identity of a variant for the lifetime of the form
    VariantId
);
define_id!(
    /// Stable identity of an uploaded image within its variant
    ImageId
);

/// Records keyed by id, with a separate id list for display order.
///
/// Records sit behind `Arc`, so cloning the arena shares every record and
/// an update replaces only the touched one. Consumers can compare records
/// with `Arc::ptr_eq` to skip work for unchanged entries.
#[derive(Debug, Clone)]
pub struct Arena<K, T> {
    order: Vec<K>,
    records: HashMap<K, Arc<T>>,
}

impl<K, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
        }
    }
}

impl<K, T> Arena<K, T>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: K) -> bool {
        self.records.contains_key(&id)
    }

    /// Appends a record at the end of the display order. An id that is
    /// already present keeps its position and gets the new record.
    pub fn push(&mut self, id: K, value: T) {
        if self.records.insert(id, Arc::new(value)).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: K) -> Option<&Arc<T>> {
        self.records.get(&id)
    }

    pub fn id_at(&self, index: usize) -> Option<K> {
        self.order.get(index).copied()
    }

    pub fn get_at(&self, index: usize) -> Option<&Arc<T>> {
        self.id_at(index).and_then(|id| self.records.get(&id))
    }

    pub fn position(&self, id: K) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// Removes a record; later records move up one position
    pub fn remove(&mut self, id: K) -> Option<Arc<T>> {
        let removed = self.records.remove(&id)?;
        self.order.retain(|candidate| *candidate != id);
        Some(removed)
    }

    /// Replaces one record with `f(old)`; every other record keeps its `Arc`
    pub fn update(&mut self, id: K, f: impl FnOnce(&T) -> T) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                let next = f(record.as_ref());
                *record = Arc::new(next);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Records in display order
    pub fn iter(&self) -> impl Iterator<Item = (K, &Arc<T>)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.records.get(id).map(|record| (*id, record)))
    }

    pub fn values(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.iter().map(|(_, record)| record)
    }
}

impl<K, T> PartialEq for Arena<K, T>
where
    K: Eq + Hash,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.records == other.records
    }
}
