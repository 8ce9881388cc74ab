//! In-memory positional text index.
//!
//! A small, deterministic [`TextIndex`] implementation: documents are
//! tokenized by lowercasing and whitespace splitting (leading and trailing
//! punctuation stripped), and postings are kept in sorted maps so term
//! enumeration is lexicographic. Used as the collaborator in unit and
//! scenario tests, and good enough for small corpora.

use crate::index::{IndexAccessError, Posting, TermStats, TextIndex};
use std::collections::BTreeMap;

/// Weighting scheme applied by [`MemoryTextIndex::global_weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermWeighting {
    /// Every term weighs 1.0.
    #[default]
    Uniform,
    /// Log-scaled inverse document frequency: `1 + ln(N / df)`.
    Idf,
}

#[derive(Debug, Default)]
struct FieldPostings {
    /// term -> (document -> positions)
    terms: BTreeMap<String, BTreeMap<u64, Vec<u32>>>,
}

/// An in-memory positional index over tokenized documents.
#[derive(Debug, Default)]
pub struct MemoryTextIndex {
    fields: BTreeMap<String, FieldPostings>,
    documents: u64,
    weighting: TermWeighting,
}

impl MemoryTextIndex {
    /// Creates an empty index with uniform term weighting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with the given weighting scheme.
    #[must_use]
    pub fn with_weighting(weighting: TermWeighting) -> Self {
        Self {
            weighting,
            ..Self::default()
        }
    }

    /// Adds a document with one or more fields and returns its id.
    pub fn add_document<'a>(
        &mut self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> u64 {
        let document = self.documents;
        self.documents += 1;
        for (field, text) in fields {
            let postings = self.fields.entry(field.to_string()).or_default();
            for (position, token) in tokenize(text) {
                postings
                    .terms
                    .entry(token)
                    .or_default()
                    .entry(document)
                    .or_default()
                    .push(position);
            }
        }
        document
    }

    /// Convenience for single-field documents in the default field
    /// `contents`.
    pub fn add_text(&mut self, text: &str) -> u64 {
        self.add_document([("contents", text)])
    }
}

impl TextIndex for MemoryTextIndex {
    fn document_count(&self) -> u64 {
        self.documents
    }

    fn field_terms(&self, field: &str) -> Result<Vec<TermStats>, IndexAccessError> {
        let postings = self
            .fields
            .get(field)
            .ok_or_else(|| IndexAccessError::UnknownField {
                field: field.to_string(),
            })?;
        Ok(postings
            .terms
            .iter()
            .map(|(text, docs)| TermStats {
                text: text.clone(),
                doc_frequency: docs.len() as u64,
                collection_frequency: docs.values().map(|p| p.len() as u64).sum(),
            })
            .collect())
    }

    fn postings(&self, field: &str, term: &str) -> Result<Vec<Posting>, IndexAccessError> {
        let postings = self
            .fields
            .get(field)
            .ok_or_else(|| IndexAccessError::UnknownField {
                field: field.to_string(),
            })?;
        Ok(postings
            .terms
            .get(term)
            .map(|docs| {
                docs.iter()
                    .map(|(&document, positions)| Posting {
                        document,
                        positions: positions.clone(),
                        local_weight: 1.0,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn global_weight(&self, field: &str, term: &str) -> f32 {
        match self.weighting {
            TermWeighting::Uniform => 1.0,
            TermWeighting::Idf => {
                let df = self
                    .fields
                    .get(field)
                    .and_then(|f| f.terms.get(term))
                    .map(|docs| docs.len() as u64)
                    .unwrap_or(0);
                if df == 0 || self.documents == 0 {
                    0.0
                } else {
                    1.0 + (self.documents as f32 / df as f32).ln()
                }
            }
        }
    }
}

/// Lowercasing whitespace tokenizer; yields (position, token) pairs.
///
/// Tokens are trimmed of leading/trailing non-alphanumeric characters;
/// tokens that are empty after trimming still consume a position, matching
/// how analyzers keep position gaps for dropped tokens.
fn tokenize(text: &str) -> impl Iterator<Item = (u32, String)> + '_ {
    text.split_whitespace()
        .enumerate()
        .filter_map(|(position, raw)| {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty() {
                None
            } else {
                Some((position as u32, token))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_lowercases_and_strips_punctuation() {
        let tokens: Vec<(u32, String)> = tokenize("Hello, world! (again)").collect();
        assert_eq!(
            tokens,
            vec![
                (0, "hello".to_string()),
                (1, "world".to_string()),
                (2, "again".to_string())
            ]
        );
    }

    #[test]
    fn test_dropped_tokens_keep_position_gaps() {
        let tokens: Vec<(u32, String)> = tokenize("alpha -- beta").collect();
        assert_eq!(
            tokens,
            vec![(0, "alpha".to_string()), (2, "beta".to_string())]
        );
    }

    #[test]
    fn test_postings_and_frequencies() {
        let mut index = MemoryTextIndex::new();
        index.add_text("the cat sat");
        index.add_text("the cat the hat");

        assert_eq!(index.document_count(), 2);

        let stats = index.field_terms("contents").unwrap();
        let the = stats.iter().find(|t| t.text == "the").unwrap();
        assert_eq!(the.doc_frequency, 2);
        assert_eq!(the.collection_frequency, 3);

        let postings = index.postings("contents", "the").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[1].positions, vec![0, 2]);

        assert!(index.postings("contents", "dog").unwrap().is_empty());
    }

    #[test]
    fn test_term_enumeration_is_lexicographic() {
        let mut index = MemoryTextIndex::new();
        index.add_text("zebra apple mango");
        let terms: Vec<String> = index
            .field_terms("contents")
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(terms, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let index = MemoryTextIndex::new();
        assert!(matches!(
            index.field_terms("body"),
            Err(IndexAccessError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_idf_weighting() {
        let mut index = MemoryTextIndex::with_weighting(TermWeighting::Idf);
        index.add_text("common rare");
        index.add_text("common");

        let common = index.global_weight("contents", "common");
        let rare = index.global_weight("contents", "rare");
        assert!((common - 1.0).abs() < 1e-6); // df == N
        assert!(rare > common);
        assert_eq!(index.global_weight("contents", "missing"), 0.0);
    }
}
