//! Training cycle control and the finished-vector boundary.
//!
//! A run is N >= 1 strictly sequential accumulation cycles. Cycle 1 seeds
//! from generated elemental vectors (or an externally supplied store);
//! every later cycle reseeds its factory with the previous cycle's
//! unnormalized output and re-runs the accumulator from scratch. Each
//! cycle's store is a fresh generation; nothing is mutated across the
//! barrier, so cycle i's output can be diffed against cycle i+1's input.
//!
//! After the final cycle the vectors are normalized (unless disabled) and
//! wrapped with the run summary that downstream consumers (document
//! vector builders, store writers) need to interpret them.

use crate::accumulator::CooccurrenceAccumulator;
use crate::config::Settings;
use crate::elemental::ElementalVectorFactory;
use crate::error::{BuildError, BuildResult};
use crate::index::TextIndex;
use crate::store::VectorStore;
use crate::vector::{Vector, VectorKind};
use crate::window::EncodingMethod;
use tracing::info;

/// The configuration facts a consumer needs to interpret a finished store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dimension: usize,
    pub vector_type: VectorKind,
    pub encoding: EncodingMethod,
    pub cycles: usize,
    pub normalized: bool,
}

/// Finished term vectors plus their run summary.
#[derive(Debug)]
pub struct TrainedTermVectors {
    pub vectors: VectorStore,
    pub run: RunSummary,
}

/// Serialization seam: the engine walks, the collaborator persists.
pub trait VectorWriter {
    fn write_vector(&mut self, term: &str, vector: &Vector) -> BuildResult<()>;
}

impl TrainedTermVectors {
    /// Hands every (term, vector) pair to the writer in insertion order.
    pub fn export_to(&self, writer: &mut dyn VectorWriter) -> BuildResult<()> {
        for (term, vector) in self.vectors.iter() {
            writer.write_vector(term, vector)?;
        }
        Ok(())
    }
}

/// Drives the retraining loop over a text index.
pub struct TrainingCycleController<'a, I: TextIndex> {
    settings: &'a Settings,
    index: &'a I,
    initial_vectors: Option<VectorStore>,
}

impl<'a, I: TextIndex> TrainingCycleController<'a, I> {
    /// Creates a controller that seeds cycle 1 from generated elemental
    /// vectors.
    pub fn new(settings: &'a Settings, index: &'a I) -> Self {
        Self {
            settings,
            index,
            initial_vectors: None,
        }
    }

    /// Seeds cycle 1 from a previously trained store instead; terms absent
    /// from it still fall back to generated elemental vectors.
    #[must_use]
    pub fn with_initial_vectors(mut self, vectors: VectorStore) -> Self {
        self.initial_vectors = Some(vectors);
        self
    }

    /// Runs all cycles and returns the finished vectors.
    ///
    /// Configuration problems are reported before the index is touched. A
    /// failure inside any cycle aborts the whole run; partial vectors from
    /// an aborted cycle are never exposed.
    pub fn run(mut self) -> BuildResult<TrainedTermVectors> {
        self.settings.validate()?;
        if self.settings.window.encoding == EncodingMethod::Embeddings {
            return Err(BuildError::config(
                "the embeddings encoding manages its own training loop and is not built by this engine",
            ));
        }

        let cycles = self.settings.training.cycles;
        let seeds = self.initial_vectors.take();
        let mut vectors = self.run_cycle(seeds, 1)?;
        for cycle in 2..=cycles {
            info!(cycle, "retraining with learned term vectors");
            vectors = self.run_cycle(Some(vectors), cycle)?;
        }

        let normalized = self.settings.training.normalize;
        if normalized {
            vectors.normalize_all();
        }
        Ok(TrainedTermVectors {
            vectors,
            run: RunSummary {
                dimension: self.settings.vector.dimension,
                vector_type: self.settings.vector.vector_type,
                encoding: self.settings.window.encoding,
                cycles,
                normalized,
            },
        })
    }

    fn run_cycle(&self, seeds: Option<VectorStore>, cycle: usize) -> BuildResult<VectorStore> {
        let factory = match seeds {
            Some(seeds) => ElementalVectorFactory::with_initial_vectors(self.settings, seeds)?,
            None => ElementalVectorFactory::new(self.settings)?,
        };
        let accumulator = CooccurrenceAccumulator::new(self.settings, self.index, &factory)?;
        let vectors = accumulator.accumulate()?;
        info!(cycle, terms = vectors.len(), "completed training cycle");
        Ok(vectors)
    }
}
