//! Deterministic elemental (seed) vector generation.
//!
//! Every term owns a sparse pseudorandom vector derived from its text plus
//! the run configuration: hashing term, dimension, seed length, and ground
//! type into an rng seed makes generation reproducible across processes
//! and freely parallelizable. The cache is owned by the factory, and the
//! factory by one run, so concurrent runs with different configurations
//! cannot observe each other's vectors.
//!
//! A factory can be bootstrapped from a previously trained store (or the
//! previous training cycle's output): vectors found there are returned
//! verbatim, generation is only the fallback.

use crate::config::Settings;
use crate::error::{BuildError, BuildResult};
use crate::store::VectorStore;
use crate::vector::{
    BinaryVector, ComplexVector, RealVector, SeedLength, Vector, VectorDimension, VectorKind,
};
use dashmap::DashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Run-owned source of elemental vectors.
///
/// `elemental_for` is read-only in spirit: generation is idempotent and the
/// cache hands out shared handles, so the factory can be used from parallel
/// accumulation workers without synchronization beyond the cache's own.
#[derive(Debug)]
pub struct ElementalVectorFactory {
    kind: VectorKind,
    dimension: VectorDimension,
    seed_length: SeedLength,
    provided: Option<VectorStore>,
    cache: DashMap<String, Arc<Vector>>,
}

impl ElementalVectorFactory {
    /// Creates a factory that generates every vector from scratch.
    ///
    /// A seed length exceeding the dimension is a configuration error,
    /// reported here even when [`Settings::validate`] was skipped.
    pub fn new(settings: &Settings) -> BuildResult<Self> {
        let dimension = VectorDimension::new(settings.vector.dimension)
            .map_err(|e| BuildError::config(e.to_string()))?;
        let seed_length = SeedLength::new(settings.vector.seed_length, dimension)
            .map_err(|e| BuildError::config(e.to_string()))?;
        Ok(Self {
            kind: settings.vector.vector_type,
            dimension,
            seed_length,
            provided: None,
            cache: DashMap::new(),
        })
    }

    /// Creates a factory that prefers vectors from `initial`, generating
    /// only for terms the store does not contain.
    ///
    /// The supplied store must have been built with the run's dimension and
    /// vector type; anything else is a configuration error.
    pub fn with_initial_vectors(settings: &Settings, initial: VectorStore) -> BuildResult<Self> {
        let mut factory = Self::new(settings)?;
        for (term, vector) in initial.iter() {
            if vector.kind() != factory.kind || vector.dimension() != factory.dimension.get() {
                return Err(BuildError::config(format!(
                    "initial vector for term '{}' is {} d={}, run is configured for {} d={}",
                    term,
                    vector.kind(),
                    vector.dimension(),
                    factory.kind,
                    factory.dimension.get()
                )));
            }
        }
        factory.provided = Some(initial);
        Ok(factory)
    }

    /// The ground type this factory produces.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    /// The dimension this factory produces.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension.get()
    }

    /// Returns the term's elemental vector, generating and caching it on
    /// first use. Never mutates a previously returned vector.
    #[must_use]
    pub fn elemental_for(&self, term: &str) -> Arc<Vector> {
        if let Some(hit) = self.cache.get(term) {
            return Arc::clone(hit.value());
        }
        let vector = match self.provided.as_ref().and_then(|store| store.get(term)) {
            Some(supplied) => supplied.clone(),
            None => self.generate(term),
        };
        // entry() keeps concurrent first-use idempotent: one vector wins
        Arc::clone(
            self.cache
                .entry(term.to_string())
                .or_insert_with(|| Arc::new(vector))
                .value(),
        )
    }

    fn generate(&self, term: &str) -> Vector {
        let mut rng = StdRng::from_seed(self.seed_for(term));
        let dimension = self.dimension.get();
        let seed_length = self.seed_length.get();
        match self.kind {
            VectorKind::Real => {
                Vector::Real(RealVector::elemental(dimension, seed_length, &mut rng))
            }
            VectorKind::Complex => {
                Vector::Complex(ComplexVector::elemental(dimension, seed_length, &mut rng))
            }
            VectorKind::Binary => {
                Vector::Binary(BinaryVector::elemental(dimension, seed_length, &mut rng))
            }
        }
    }

    /// Seed = SHA-256(term, dimension, seed length, ground type), so the
    /// same term under the same configuration always expands to the same
    /// sparse pattern.
    fn seed_for(&self, term: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(term.as_bytes());
        hasher.update([0u8]);
        hasher.update((self.dimension.get() as u64).to_le_bytes());
        hasher.update((self.seed_length.get() as u64).to_le_bytes());
        hasher.update([self.kind as u8]);
        hasher.finalize().into()
    }
}
