//! Tantivy-backed text index adapter.
//!
//! Walks segment term dictionaries and position postings directly rather
//! than going through the query layer: the accumulator needs every term of
//! a field with exact token positions, not scored search results.
//!
//! The adapted fields must be indexed with positions
//! ([`IndexRecordOption::WithFreqsAndPositions`]); an index built without
//! them cannot drive a sliding-window pass and is reported as a fatal
//! access error, never silently treated as empty.

use crate::index::{IndexAccessError, Posting, TermStats, TextIndex};
use std::collections::BTreeMap;
use std::path::Path;
use tantivy::schema::{Field, FieldType, IndexRecordOption, Schema};
use tantivy::postings::Postings as _;
use tantivy::{DocSet, Index, IndexReader, TERMINATED};
use tracing::warn;

/// Read-only adapter over a Tantivy index with positional postings.
pub struct TantivyTextIndex {
    reader: IndexReader,
    schema: Schema,
}

impl std::fmt::Debug for TantivyTextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyTextIndex")
            .field("documents", &self.document_count())
            .finish()
    }
}

impl TantivyTextIndex {
    /// Opens an existing index directory.
    pub fn open(path: &Path) -> Result<Self, IndexAccessError> {
        let index = Index::open_in_dir(path).map_err(|e| IndexAccessError::Open {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Self::from_index(&index)
    }

    /// Wraps an already open index (used by tests and embedders).
    pub fn from_index(index: &Index) -> Result<Self, IndexAccessError> {
        let reader = index.reader().map_err(|e| IndexAccessError::Open {
            path: Path::new("<in-memory>").to_path_buf(),
            cause: e.to_string(),
        })?;
        Ok(Self {
            reader,
            schema: index.schema(),
        })
    }

    /// Resolves a field name and checks it carries positional postings.
    fn positional_field(&self, field: &str) -> Result<Field, IndexAccessError> {
        let resolved =
            self.schema
                .get_field(field)
                .map_err(|_| IndexAccessError::UnknownField {
                    field: field.to_string(),
                })?;
        let entry = self.schema.get_field_entry(resolved);
        let has_positions = match entry.field_type() {
            FieldType::Str(options) => options
                .get_indexing_options()
                .map(|indexing| {
                    indexing.index_option() == IndexRecordOption::WithFreqsAndPositions
                })
                .unwrap_or(false),
            _ => false,
        };
        if !has_positions {
            return Err(IndexAccessError::MissingPositions {
                field: field.to_string(),
            });
        }
        Ok(resolved)
    }
}

impl TextIndex for TantivyTextIndex {
    fn document_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn field_terms(&self, field: &str) -> Result<Vec<TermStats>, IndexAccessError> {
        let resolved = self.positional_field(field)?;
        let searcher = self.reader.searcher();
        let mut merged: BTreeMap<String, (u64, u64)> = BTreeMap::new();

        for segment in searcher.segment_readers() {
            let inverted = segment.inverted_index(resolved).map_err(|e| {
                IndexAccessError::TermDictionary {
                    field: field.to_string(),
                    cause: e.to_string(),
                }
            })?;
            let mut stream =
                inverted
                    .terms()
                    .stream()
                    .map_err(|e| IndexAccessError::TermDictionary {
                        field: field.to_string(),
                        cause: e.to_string(),
                    })?;
            while stream.advance() {
                let Ok(text) = std::str::from_utf8(stream.key()) else {
                    warn!(field, "skipping non-UTF-8 term in term dictionary");
                    continue;
                };
                let info = stream.value();
                let mut postings = inverted
                    .read_postings_from_terminfo(info, IndexRecordOption::WithFreqs)
                    .map_err(|e| IndexAccessError::Postings {
                        term: text.to_string(),
                        cause: e.to_string(),
                    })?;
                let mut collection_frequency = 0u64;
                let mut doc = postings.doc();
                while doc != TERMINATED {
                    collection_frequency += u64::from(postings.term_freq());
                    doc = postings.advance();
                }
                let entry = merged.entry(text.to_string()).or_insert((0, 0));
                entry.0 += u64::from(info.doc_freq);
                entry.1 += collection_frequency;
            }
        }

        Ok(merged
            .into_iter()
            .map(|(text, (doc_frequency, collection_frequency))| TermStats {
                text,
                doc_frequency,
                collection_frequency,
            })
            .collect())
    }

    fn postings(&self, field: &str, term: &str) -> Result<Vec<Posting>, IndexAccessError> {
        let resolved = self.positional_field(field)?;
        let searcher = self.reader.searcher();
        let mut result = Vec::new();
        let mut positions: Vec<u32> = Vec::new();

        for (segment_ord, segment) in searcher.segment_readers().iter().enumerate() {
            let inverted = segment.inverted_index(resolved).map_err(|e| {
                IndexAccessError::TermDictionary {
                    field: field.to_string(),
                    cause: e.to_string(),
                }
            })?;
            let Some(info) = inverted.terms().get(term.as_bytes()).map_err(|e| {
                IndexAccessError::Postings {
                    term: term.to_string(),
                    cause: e.to_string(),
                }
            })?
            else {
                continue;
            };
            let mut postings = inverted
                .read_postings_from_terminfo(&info, IndexRecordOption::WithFreqsAndPositions)
                .map_err(|e| IndexAccessError::Postings {
                    term: term.to_string(),
                    cause: e.to_string(),
                })?;
            let mut doc = postings.doc();
            while doc != TERMINATED {
                postings.positions(&mut positions);
                result.push(Posting {
                    // segment-local ids widened into one index-global space
                    document: ((segment_ord as u64) << 32) | u64::from(doc),
                    positions: positions.clone(),
                    local_weight: 1.0,
                });
                doc = postings.advance();
            }
        }
        Ok(result)
    }

    fn global_weight(&self, field: &str, term: &str) -> f32 {
        let Ok(resolved) = self.positional_field(field) else {
            return 0.0;
        };
        let searcher = self.reader.searcher();
        let mut doc_frequency = 0u64;
        for segment in searcher.segment_readers() {
            let Ok(inverted) = segment.inverted_index(resolved) else {
                continue;
            };
            if let Ok(Some(info)) = inverted.terms().get(term.as_bytes()) {
                doc_frequency += u64::from(info.doc_freq);
            }
        }
        let total = searcher.num_docs();
        if doc_frequency == 0 || total == 0 {
            return 0.0;
        }
        // log-scaled inverse document frequency
        1.0 + (total as f32 / doc_frequency as f32).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tantivy::doc;
    use tantivy::schema::{STORED, SchemaBuilder, TEXT, TextFieldIndexing, TextOptions};

    fn sample_index() -> (Index, Field) {
        let mut builder = SchemaBuilder::default();
        // TEXT indexes with positions by default
        let contents = builder.add_text_field("contents", TEXT | STORED);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer(50_000_000).unwrap();
        writer
            .add_document(doc!(contents => "the quick brown fox"))
            .unwrap();
        writer
            .add_document(doc!(contents => "the lazy dog and the fox"))
            .unwrap();
        writer.commit().unwrap();
        (index, contents)
    }

    #[test]
    fn test_document_count() {
        let (index, _) = sample_index();
        let adapter = TantivyTextIndex::from_index(&index).unwrap();
        assert_eq!(adapter.document_count(), 2);
    }

    #[test]
    fn test_field_terms_lexicographic_with_frequencies() {
        let (index, _) = sample_index();
        let adapter = TantivyTextIndex::from_index(&index).unwrap();

        let stats = adapter.field_terms("contents").unwrap();
        let texts: Vec<&str> = stats.iter().map(|t| t.text.as_str()).collect();
        let mut sorted = texts.clone();
        sorted.sort_unstable();
        assert_eq!(texts, sorted);

        let the = stats.iter().find(|t| t.text == "the").unwrap();
        assert_eq!(the.doc_frequency, 2);
        assert_eq!(the.collection_frequency, 3);
        let fox = stats.iter().find(|t| t.text == "fox").unwrap();
        assert_eq!(fox.doc_frequency, 2);
        assert_eq!(fox.collection_frequency, 2);
    }

    #[test]
    fn test_postings_carry_positions() {
        let (index, _) = sample_index();
        let adapter = TantivyTextIndex::from_index(&index).unwrap();

        let postings = adapter.postings("contents", "fox").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].positions, vec![3]);
        assert_eq!(postings[1].positions, vec![5]);

        assert!(adapter.postings("contents", "unicorn").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let (index, _) = sample_index();
        let adapter = TantivyTextIndex::from_index(&index).unwrap();
        assert!(matches!(
            adapter.field_terms("body"),
            Err(IndexAccessError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_field_without_positions_is_fatal() {
        let mut builder = SchemaBuilder::default();
        let indexing = TextFieldIndexing::default()
            .set_index_option(IndexRecordOption::WithFreqs);
        let options = TextOptions::default().set_indexing_options(indexing);
        let contents = builder.add_text_field("contents", options);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer(50_000_000).unwrap();
        writer.add_document(doc!(contents => "a b c")).unwrap();
        writer.commit().unwrap();

        let adapter = TantivyTextIndex::from_index(&index).unwrap();
        assert!(matches!(
            adapter.field_terms("contents"),
            Err(IndexAccessError::MissingPositions { .. })
        ));
    }

    #[test]
    fn test_open_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut builder = SchemaBuilder::default();
        let contents = builder.add_text_field("contents", TEXT);
        let index = Index::create_in_dir(dir.path(), builder.build()).unwrap();
        let mut writer = index.writer(50_000_000).unwrap();
        writer
            .add_document(doc!(contents => "persisted words here"))
            .unwrap();
        writer.commit().unwrap();
        drop(writer);
        drop(index);

        let adapter = TantivyTextIndex::open(dir.path()).unwrap();
        assert_eq!(adapter.document_count(), 1);
        let postings = adapter.postings("contents", "words").unwrap();
        assert_eq!(postings[0].positions, vec![1]);

        let missing = TantivyTextIndex::open(&dir.path().join("nope"));
        assert!(matches!(missing, Err(IndexAccessError::Open { .. })));
    }

    #[test]
    fn test_global_weight_scales_with_rarity() {
        let (index, _) = sample_index();
        let adapter = TantivyTextIndex::from_index(&index).unwrap();

        let the = adapter.global_weight("contents", "the"); // df == N
        let quick = adapter.global_weight("contents", "quick");
        assert!((the - 1.0).abs() < 1e-6);
        assert!(quick > the);
        assert_eq!(adapter.global_weight("contents", "unicorn"), 0.0);
    }
}
