//! Insertion-ordered term vector store.
//!
//! Maps term (or document) keys to vectors of one ground type and
//! dimension, fixed at construction so a run can never mix incompatible
//! vectors. Iteration follows insertion order, which keeps downstream
//! serialization and test output deterministic.
//!
//! Callers distinguish "set" ([`VectorStore::put`]) from "add-into"
//! ([`VectorStore::add`]); the latter creates a zero vector on first
//! contribution. Accumulating into the same key from multiple writers
//! needs external synchronization; the parallel accumulator merges
//! per-worker partial stores instead of sharing one.

use crate::vector::{Vector, VectorError, VectorKind};
use rayon::prelude::*;
use std::collections::HashMap;

/// Insertion-ordered mapping from key to vector.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    kind: VectorKind,
    dimension: usize,
    entries: Vec<(String, Vector)>,
    by_key: HashMap<String, usize>,
}

impl VectorStore {
    /// Creates an empty store for vectors of the given kind and dimension.
    #[must_use]
    pub fn new(kind: VectorKind, dimension: usize) -> Self {
        Self {
            kind,
            dimension,
            entries: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// The ground type of every vector in this store.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    /// The dimension of every vector in this store.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Looks up a vector by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Vector> {
        self.by_key.get(key).map(|&index| &self.entries[index].1)
    }

    /// Sets the vector for a key, inserting or replacing.
    ///
    /// Replacement keeps the key's original position in iteration order.
    pub fn put(&mut self, key: &str, vector: Vector) -> Result<(), VectorError> {
        self.check(&vector)?;
        match self.by_key.get(key) {
            Some(&index) => self.entries[index].1 = vector,
            None => {
                self.by_key.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), vector));
            }
        }
        Ok(())
    }

    /// Superposes `weight` copies of `contribution` into the key's vector,
    /// creating a zero vector on first contribution.
    pub fn add(
        &mut self,
        key: &str,
        contribution: &Vector,
        weight: f32,
    ) -> Result<(), VectorError> {
        self.check(contribution)?;
        let target = self.entry_mut(key);
        target.superpose(contribution, weight);
        Ok(())
    }

    /// Merges a partial accumulation into the key's vector, creating a
    /// zero vector first if the key is new. See [`Vector::merge`].
    pub fn merge(&mut self, key: &str, partial: &Vector) -> Result<(), VectorError> {
        self.check(partial)?;
        let target = self.entry_mut(key);
        target.merge(partial);
        Ok(())
    }

    fn entry_mut(&mut self, key: &str) -> &mut Vector {
        let index = match self.by_key.get(key) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.by_key.insert(key.to_string(), index);
                self.entries
                    .push((key.to_string(), Vector::zero(self.kind, self.dimension)));
                index
            }
        };
        &mut self.entries[index].1
    }

    fn check(&self, vector: &Vector) -> Result<(), VectorError> {
        if vector.kind() != self.kind {
            return Err(VectorError::KindMismatch {
                expected: self.kind,
                actual: vector.kind(),
            });
        }
        if vector.dimension() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            });
        }
        Ok(())
    }

    /// Iterates (key, vector) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.entries
            .iter()
            .map(|(key, vector)| (key.as_str(), vector))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Rescales every vector to unit length in place.
    ///
    /// Zero vectors are left unchanged, not treated as an error. Binary
    /// vectors resolve their pending voting tallies here.
    pub fn normalize_all(&mut self) {
        self.entries
            .par_iter_mut()
            .for_each(|(_, vector)| vector.normalize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::RealVector;

    fn real(components: Vec<f32>) -> Vector {
        Vector::Real(RealVector::from_components(components))
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut store = VectorStore::new(VectorKind::Real, 2);
        store.put("zebra", real(vec![1.0, 0.0])).unwrap();
        store.put("apple", real(vec![0.0, 1.0])).unwrap();
        store.put("mango", real(vec![1.0, 1.0])).unwrap();

        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut store = VectorStore::new(VectorKind::Real, 2);
        store.put("a", real(vec![1.0, 0.0])).unwrap();
        store.put("b", real(vec![0.0, 1.0])).unwrap();
        store.put("a", real(vec![5.0, 5.0])).unwrap();

        assert_eq!(store.len(), 2);
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.get("a"), Some(&real(vec![5.0, 5.0])));
    }

    #[test]
    fn test_add_creates_on_first_contribution() {
        let mut store = VectorStore::new(VectorKind::Real, 2);
        assert!(store.get("term").is_none());

        store.add("term", &real(vec![1.0, -1.0]), 2.0).unwrap();
        store.add("term", &real(vec![1.0, 0.0]), 1.0).unwrap();
        assert_eq!(store.get("term"), Some(&real(vec![3.0, -2.0])));
    }

    #[test]
    fn test_kind_and_dimension_enforced() {
        let mut store = VectorStore::new(VectorKind::Real, 2);
        assert!(matches!(
            store.put("a", Vector::zero(VectorKind::Binary, 2)),
            Err(VectorError::KindMismatch { .. })
        ));
        assert!(matches!(
            store.put("a", real(vec![1.0, 2.0, 3.0])),
            Err(VectorError::DimensionMismatch { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_normalize_all_skips_zero_vectors() {
        let mut store = VectorStore::new(VectorKind::Real, 2);
        store.put("unit", real(vec![3.0, 4.0])).unwrap();
        store.put("zero", real(vec![0.0, 0.0])).unwrap();
        store.normalize_all();

        let Vector::Real(unit) = store.get("unit").unwrap() else {
            panic!("expected real vector");
        };
        let norm: f32 = unit.components().iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!(store.get("zero").unwrap().is_zero());
    }
}
