use crate::concurrent::ConcurrentMap;
use crate::document::{DocId, Document, DocumentData, DocumentStatus};
use crate::index::InvertedIndex;
use crate::query::Query;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// How a ranking, match or removal call spreads its work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    /// Per-term work on the rayon pool, joined before each next phase.
    Parallel,
}

/// natural log of (documents / documents containing the term)
pub fn inverse_document_freq(document_count: usize, docs_with_term: usize) -> f64 {
    (document_count as f64 / docs_with_term as f64).ln()
}

/// Descending relevance; relevances within `epsilon` of each other fall back to
/// descending rating.
pub fn compare_documents(lhs: &Document, rhs: &Document, epsilon: f64) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < epsilon {
        rhs.rating.cmp(&lhs.rating)
    } else {
        rhs.relevance.partial_cmp(&lhs.relevance).unwrap_or(Ordering::Equal)
    }
}

/// Keep the best `limit` documents in comparator order. Insertion is stable, so
/// documents that compare equal keep their input order; the comparator need
/// not be transitive.
pub fn select_top(documents: Vec<Document>, limit: usize, epsilon: f64) -> Vec<Document> {
    let mut top: Vec<Document> = Vec::with_capacity(limit.min(documents.len()) + 1);
    for doc in documents {
        let pos = top
            .iter()
            .position(|kept| compare_documents(&doc, kept, epsilon) == Ordering::Less)
            .unwrap_or(top.len());
        if pos < limit {
            top.insert(pos, doc);
            top.truncate(limit);
        }
    }
    top
}

/// Read-only view the ranking passes work against.
pub(crate) struct Ranker<'a> {
    pub index: &'a InvertedIndex,
    pub documents: &'a BTreeMap<DocId, DocumentData>,
    pub shard_count: usize,
}

/// Partial relevance of one document, one entry per plus word keyed by the
/// word's position in the ordered plus set.
#[derive(Debug, Default)]
struct PartialScores(Vec<(usize, f64)>);

impl PartialScores {
    /// Sum in plus-word order, the same order the sequential pass adds in.
    fn total(mut self) -> f64 {
        self.0.sort_unstable_by_key(|&(ordinal, _)| ordinal);
        self.0.into_iter().fold(0.0, |acc, (_, score)| acc + score)
    }
}

impl Ranker<'_> {
    fn admits<P>(&self, doc_id: DocId, predicate: &P) -> bool
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        self.documents
            .get(&doc_id)
            .is_some_and(|data| predicate(doc_id, data.status, data.rating))
    }

    fn materialize(&self, relevances: BTreeMap<DocId, f64>) -> Vec<Document> {
        relevances
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents.get(&id).map(|data| Document::new(id, relevance, data.rating))
            })
            .collect()
    }

    /// Every admitted document matching a plus word and no minus word, in id order.
    pub fn find_all<P>(&self, query: &Query<'_>, predicate: &P, policy: ExecutionPolicy) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevances = match policy {
            ExecutionPolicy::Sequential => self.accumulate_sequential(query, predicate),
            ExecutionPolicy::Parallel => self.accumulate_parallel(query, predicate),
        };
        tracing::trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            hits = relevances.len(),
            ?policy,
            "accumulated relevance"
        );
        self.materialize(relevances)
    }

    fn accumulate_sequential<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let document_count = self.documents.len();
        let mut relevances: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            let idf = inverse_document_freq(document_count, postings.len());
            for (&doc_id, &tf) in postings {
                if self.admits(doc_id, predicate) {
                    *relevances.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }
        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else { continue };
            for doc_id in postings.keys() {
                relevances.remove(doc_id);
            }
        }
        relevances
    }

    fn accumulate_parallel<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_count = self.documents.len();
        let accumulator: ConcurrentMap<DocId, PartialScores> = ConcurrentMap::new(self.shard_count);
        let plus_words: Vec<&str> = query.plus_words.iter().copied().collect();

        plus_words.par_iter().enumerate().for_each(|(ordinal, word)| {
            let Some(postings) = self.index.postings(word) else { return };
            let idf = inverse_document_freq(document_count, postings.len());
            for (&doc_id, &tf) in postings {
                if self.admits(doc_id, predicate) {
                    accumulator.access(doc_id).0.push((ordinal, tf * idf));
                }
            }
        });

        // plus phase is joined; exclusion starts only now
        query.minus_words.par_iter().for_each(|word| {
            let Some(postings) = self.index.postings(word) else { return };
            for doc_id in postings.keys() {
                accumulator.erase(doc_id);
            }
        });

        accumulator
            .into_ordinary_map()
            .into_iter()
            .map(|(doc_id, scores)| (doc_id, scores.total()))
            .collect()
    }
}
