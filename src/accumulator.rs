//! Windowed term co-occurrence accumulation.
//!
//! One pass over the text index per training cycle: for every configured
//! field, the vocabulary is filtered, the term-major postings are inverted
//! into per-document occurrence lists, and every in-window (focus,
//! neighbor) pair superposes the neighbor's encoded elemental vector into
//! the focus term's semantic vector.
//!
//! Documents are processed in parallel. Each worker accumulates into its
//! own partial map and the partials are merged with the vector model's
//! associative, commutative merge, so the result is independent of
//! interleaving (modulo floating-point summation order for real and
//! complex runs; binary tallies are exact).
//!
//! Filtered terms are skipped entirely: they receive no vector and vote
//! in no window, but their token slots still occupy positions, so the
//! distance between two surviving terms counts the dropped slots between
//! them, exactly as position-aware analyzers record gaps.

use crate::config::{FilterConfig, Settings};
use crate::elemental::ElementalVectorFactory;
use crate::error::{BuildError, BuildResult};
use crate::index::{TermStats, TextIndex};
use crate::store::VectorStore;
use crate::vector::Vector;
use crate::window::WindowEncoder;
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, warn};

/// One qualifying term occurrence inside a document field.
struct Occurrence {
    position: u32,
    term: u32,
    local_weight: f32,
}

/// Accumulates semantic term vectors from windowed co-occurrence.
pub struct CooccurrenceAccumulator<'a, I: TextIndex> {
    settings: &'a Settings,
    index: &'a I,
    factory: &'a ElementalVectorFactory,
    encoder: WindowEncoder,
}

impl<'a, I: TextIndex> CooccurrenceAccumulator<'a, I> {
    /// Builds the accumulator for one cycle.
    pub fn new(
        settings: &'a Settings,
        index: &'a I,
        factory: &'a ElementalVectorFactory,
    ) -> BuildResult<Self> {
        let encoder = WindowEncoder::new(&settings.window)?;
        Ok(Self {
            settings,
            index,
            factory,
            encoder,
        })
    }

    /// Runs the full pass and returns the (unnormalized) semantic vectors.
    ///
    /// Index access failures abort the whole pass; no partial store is
    /// returned. Individual malformed postings are logged and skipped.
    pub fn accumulate(&self) -> BuildResult<VectorStore> {
        let mut store = VectorStore::new(self.factory.kind(), self.factory.dimension());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.indexing.parallel_threads)
            .build()
            .map_err(|e| BuildError::General(format!("failed to build worker pool: {e}")))?;
        for field in &self.settings.fields {
            self.accumulate_field(&pool, field, &mut store)?;
        }
        debug!(
            terms = store.len(),
            documents = self.index.document_count(),
            "accumulation pass complete"
        );
        Ok(store)
    }

    fn accumulate_field(
        &self,
        pool: &rayon::ThreadPool,
        field: &str,
        store: &mut VectorStore,
    ) -> BuildResult<()> {
        let stats = self.index.field_terms(field)?;
        let vocabulary = stats.len();
        let filter = TermFilter::new(&self.settings.filter);
        let terms: Vec<String> = stats
            .into_iter()
            .filter(|s| filter.accepts(s))
            .map(|s| s.text)
            .collect();
        debug!(
            field,
            accepted = terms.len(),
            skipped = vocabulary - terms.len(),
            "filtered field vocabulary"
        );

        let weights: Vec<f32> = terms
            .iter()
            .map(|term| self.index.global_weight(field, term))
            .collect();
        // elemental generation is idempotent, so warm the cache in parallel
        let elementals: Vec<Arc<Vector>> = pool.install(|| {
            terms
                .par_iter()
                .map(|term| self.factory.elemental_for(term))
                .collect()
        });

        let documents = self.collect_documents(field, &terms)?;

        let partials = pool.install(|| {
            documents
                .par_iter()
                .fold(HashMap::<u32, Vector>::new, |mut acc, occurrences| {
                    self.accumulate_document(occurrences, &elementals, &weights, &mut acc);
                    acc
                })
                .reduce(HashMap::new, merge_partials)
        });

        // store entries land in term-dictionary order, independent of
        // which worker produced them
        let mut partials = partials;
        for (term_id, term) in terms.iter().enumerate() {
            if let Some(partial) = partials.remove(&(term_id as u32)) {
                store.merge(term, &partial)?;
            }
        }
        Ok(())
    }

    /// Inverts term-major postings into per-document occurrence lists,
    /// sorted by position.
    fn collect_documents(
        &self,
        field: &str,
        terms: &[String],
    ) -> BuildResult<Vec<Vec<Occurrence>>> {
        let mut by_document: HashMap<u64, Vec<Occurrence>> = HashMap::new();
        for (term_id, term) in terms.iter().enumerate() {
            for posting in self.index.postings(field, term)? {
                if posting.positions.is_empty() {
                    warn!(
                        term = %term,
                        document = posting.document,
                        "skipping posting without positions"
                    );
                    continue;
                }
                let occurrences = by_document.entry(posting.document).or_default();
                for &position in &posting.positions {
                    occurrences.push(Occurrence {
                        position,
                        term: term_id as u32,
                        local_weight: posting.local_weight,
                    });
                }
            }
        }
        let mut documents: Vec<Vec<Occurrence>> = by_document.into_values().collect();
        for occurrences in &mut documents {
            occurrences.sort_by_key(|o| o.position);
        }
        Ok(documents)
    }

    /// Slides the window over one document's occurrences.
    ///
    /// Each unordered pair is visited once; the encoder is applied in both
    /// directions, subject to window membership (which is asymmetric when
    /// a truncated left radius is configured).
    fn accumulate_document(
        &self,
        occurrences: &[Occurrence],
        elementals: &[Arc<Vector>],
        weights: &[f32],
        acc: &mut HashMap<u32, Vector>,
    ) {
        let kind = self.factory.kind();
        let dimension = self.factory.dimension();
        let radius = self.encoder.radius();
        for i in 0..occurrences.len() {
            for j in (i + 1)..occurrences.len() {
                let offset =
                    i64::from(occurrences[j].position) - i64::from(occurrences[i].position);
                if offset > radius {
                    break;
                }
                // occurrence j is to the right of focus i
                if self.encoder.in_window(offset) {
                    let focus = &occurrences[i];
                    let neighbor = &occurrences[j];
                    let target = acc
                        .entry(focus.term)
                        .or_insert_with(|| Vector::zero(kind, dimension));
                    self.encoder.accumulate(
                        target,
                        offset,
                        &elementals[neighbor.term as usize],
                        weights[neighbor.term as usize] * neighbor.local_weight,
                    );
                }
                // and i is to the left of focus j
                if self.encoder.in_window(-offset) {
                    let focus = &occurrences[j];
                    let neighbor = &occurrences[i];
                    let target = acc
                        .entry(focus.term)
                        .or_insert_with(|| Vector::zero(kind, dimension));
                    self.encoder.accumulate(
                        target,
                        -offset,
                        &elementals[neighbor.term as usize],
                        weights[neighbor.term as usize] * neighbor.local_weight,
                    );
                }
            }
        }
    }
}

fn merge_partials(
    mut left: HashMap<u32, Vector>,
    right: HashMap<u32, Vector>,
) -> HashMap<u32, Vector> {
    for (term, partial) in right {
        match left.entry(term) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(&partial),
            Entry::Vacant(entry) => {
                entry.insert(partial);
            }
        }
    }
    left
}

/// Vocabulary filter applied before any vector is created.
struct TermFilter<'a> {
    config: &'a FilterConfig,
}

impl<'a> TermFilter<'a> {
    fn new(config: &'a FilterConfig) -> Self {
        Self { config }
    }

    fn accepts(&self, stats: &TermStats) -> bool {
        if stats.collection_frequency < self.config.min_term_frequency {
            return false;
        }
        if let Some(max) = self.config.max_term_frequency {
            if stats.collection_frequency > max {
                return false;
            }
        }
        if let Some(limit) = self.config.max_non_alphabet_chars {
            let non_alphabetic = stats.text.chars().filter(|c| !c.is_alphabetic()).count();
            if non_alphabetic as u32 > limit {
                return false;
            }
        }
        if self.config.filter_numeric_terms && stats.text.parse::<f64>().is_ok() {
            return false;
        }
        true
    }
}
