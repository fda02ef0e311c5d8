use crate::config::SearchConfig;
use crate::document::{compute_average_rating, DocId, Document, DocumentData, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::parse_query;
use crate::ranking::{select_top, ExecutionPolicy, Ranker};
use crate::tokenizer::{is_valid_text, StopWords};
use rayon::prelude::*;
use std::collections::{btree_map, BTreeMap};
use std::iter::Copied;

/// In-memory TF-IDF search over a mutable set of documents.
///
/// Searches take `&self` and may run from many threads at once; `add_document`
/// and `remove_document` take `&mut self`, so the borrow checker (or an outer
/// `RwLock`) keeps mutation from overlapping a search.
#[derive(Debug, Default)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    documents: BTreeMap<DocId, DocumentData>,
    config: SearchConfig,
}

impl SearchServer {
    /// Server with default settings and the given stop words.
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words, ..Self::default() }
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { stop_words, config, ..Self::default() })
    }

    /// Shorthand for a space-separated stop word string.
    pub fn with_stop_words(stop_words: &str) -> Result<Self> {
        Ok(Self::new(StopWords::parse(stop_words)?))
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn get_document_count(&self) -> usize { self.documents.len() }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> Copied<btree_map::Keys<'_, DocId, DocumentData>> {
        self.documents.keys().copied()
    }

    /// Id at position `index` of the ascending id sequence.
    pub fn document_id_at(&self, index: usize) -> Result<DocId> {
        self.document_ids()
            .nth(index)
            .ok_or(SearchError::IndexOutOfRange { index, len: self.documents.len() })
    }

    pub fn add_document(&mut self, doc_id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if !is_valid_text(text) {
            return Err(SearchError::InvalidDocumentText);
        }
        if doc_id < 0 {
            return Err(SearchError::NegativeDocumentId(doc_id));
        }
        if self.documents.contains_key(&doc_id) {
            return Err(SearchError::DuplicateDocumentId(doc_id));
        }
        self.index.insert(doc_id, self.stop_words.filter(text));
        let rating = compute_average_rating(ratings);
        self.documents.insert(doc_id, DocumentData { rating, status });
        tracing::debug!(doc_id, ?status, rating, "document added");
        Ok(())
    }

    /// Top hits among ACTUAL documents.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, move |_, doc_status, _| doc_status == status)
    }

    /// Top hits among documents for which `predicate(id, status, rating)` holds.
    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_policy<P>(&self, policy: ExecutionPolicy, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let matched = self.ranker().find_all(&query, &predicate, policy);
        Ok(select_top(matched, self.config.max_result_document_count, self.config.relevance_epsilon))
    }

    /// Plus words of `raw_query` found in the document, sorted; empty when the
    /// document holds any minus word. Also returns the document's status.
    pub fn match_document<'q>(&self, raw_query: &'q str, doc_id: DocId) -> Result<(Vec<&'q str>, DocumentStatus)> {
        self.match_document_policy(ExecutionPolicy::Sequential, raw_query, doc_id)
    }

    pub fn match_document_policy<'q>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &'q str,
        doc_id: DocId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let query = parse_query(raw_query, &self.stop_words)?;
        let status = self
            .documents
            .get(&doc_id)
            .map(|data| data.status)
            .ok_or(SearchError::DocumentNotFound(doc_id))?;
        let has = |word: &&str| self.index.document_has_term(doc_id, word);

        let matched = match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(has) {
                    Vec::new()
                } else {
                    query.plus_words.iter().copied().filter(has).collect()
                }
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(has) {
                    Vec::new()
                } else {
                    let plus_words: Vec<&str> = query.plus_words.iter().copied().collect();
                    // filter on an indexed iterator keeps the sorted order
                    plus_words.into_par_iter().filter(has).collect()
                }
            }
        };
        Ok((matched, status))
    }

    /// Removing an unknown id does nothing.
    pub fn remove_document(&mut self, doc_id: DocId) {
        self.remove_document_policy(ExecutionPolicy::Sequential, doc_id)
    }

    pub fn remove_document_policy(&mut self, policy: ExecutionPolicy, doc_id: DocId) {
        if self.documents.remove(&doc_id).is_none() {
            tracing::debug!(doc_id, "remove skipped: unknown document");
            return;
        }
        let removed = match policy {
            ExecutionPolicy::Sequential => self.index.remove(doc_id),
            ExecutionPolicy::Parallel => self.index.remove_parallel(doc_id),
        };
        tracing::debug!(doc_id, terms = removed.map_or(0, |freqs| freqs.len()), ?policy, "document removed");
    }

    /// Term frequencies of the document; empty for an unknown id.
    pub fn get_word_frequencies(&self, doc_id: DocId) -> BTreeMap<&str, f64> {
        self.index.word_frequencies(doc_id)
    }

    fn ranker(&self) -> Ranker<'_> {
        Ranker { index: &self.index, documents: &self.documents, shard_count: self.config.shard_count }
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = Copied<btree_map::Keys<'a, DocId, DocumentData>>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}
