use crate::document::DocId;
use crate::terms::{TermId, TermPool};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Term frequencies of one document, keyed by term id.
pub type TermFreqs = BTreeMap<TermId, f64>;
/// Postings of one term: document id -> term frequency.
pub type Postings = BTreeMap<DocId, f64>;

/// Forward and inverted views of the same (term, document, tf) triples.
/// Every mutation updates both so that neither holds an entry the other lacks.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    terms: TermPool,
    /// indexed by `TermId`; a bucket may be empty once its last document is removed
    postings: Vec<Postings>,
    forward: BTreeMap<DocId, TermFreqs>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index `words` (stop words already removed) for `doc_id`. Each occurrence
    /// adds `1 / words.len()` to the word's term frequency.
    pub fn insert<'w, I>(&mut self, doc_id: DocId, words: I)
    where
        I: IntoIterator<Item = &'w str>,
    {
        let words: Vec<&str> = words.into_iter().collect();
        let mut freqs = TermFreqs::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in words {
                let term_id = self.terms.intern(word);
                *freqs.entry(term_id).or_insert(0.0) += inv_word_count;
            }
        }
        for (&term_id, &tf) in &freqs {
            let idx = term_id as usize;
            if self.postings.len() <= idx {
                self.postings.resize_with(idx + 1, Postings::new);
            }
            self.postings[idx].insert(doc_id, tf);
        }
        self.forward.insert(doc_id, freqs);
    }

    /// Drop `doc_id` from both views, visiting only the buckets of its own terms.
    pub fn remove(&mut self, doc_id: DocId) -> Option<TermFreqs> {
        let freqs = self.forward.remove(&doc_id)?;
        for term_id in freqs.keys() {
            if let Some(bucket) = self.postings.get_mut(*term_id as usize) {
                bucket.remove(&doc_id);
            }
        }
        Some(freqs)
    }

    /// Same as [`remove`](Self::remove), with the per-term bucket updates spread
    /// over the rayon pool.
    pub fn remove_parallel(&mut self, doc_id: DocId) -> Option<TermFreqs> {
        let freqs = self.forward.remove(&doc_id)?;
        let term_ids: Vec<usize> = freqs.keys().map(|&t| t as usize).collect();
        disjoint_buckets(&mut self.postings, &term_ids)
            .into_par_iter()
            .for_each(|bucket| {
                bucket.remove(&doc_id);
            });
        Some(freqs)
    }

    /// Postings of `term`, or `None` when no live document contains it.
    pub fn postings(&self, term: &str) -> Option<&Postings> {
        let term_id = self.terms.get(term)?;
        self.postings
            .get(term_id as usize)
            .filter(|bucket| !bucket.is_empty())
    }

    pub fn term_freqs(&self, doc_id: DocId) -> Option<&TermFreqs> {
        self.forward.get(&doc_id)
    }

    /// True when `doc_id` contains `term`, answered from the forward view.
    pub fn document_has_term(&self, doc_id: DocId, term: &str) -> bool {
        match (self.terms.get(term), self.forward.get(&doc_id)) {
            (Some(term_id), Some(freqs)) => freqs.contains_key(&term_id),
            _ => false,
        }
    }

    /// Term frequencies of `doc_id` keyed by the term text; empty if the
    /// document is unknown.
    pub fn word_frequencies(&self, doc_id: DocId) -> BTreeMap<&str, f64> {
        let Some(freqs) = self.forward.get(&doc_id) else {
            return BTreeMap::new();
        };
        freqs
            .iter()
            .filter_map(|(&term_id, &tf)| self.terms.resolve(term_id).map(|term| (term, tf)))
            .collect()
    }
}

/// Mutable references to `slice[i]` for every `i` in `sorted_ids`, which must be
/// strictly increasing. Ids past the end are skipped.
fn disjoint_buckets<'a, T>(slice: &'a mut [T], sorted_ids: &[usize]) -> Vec<&'a mut T> {
    let mut out = Vec::with_capacity(sorted_ids.len());
    let mut rest = slice;
    let mut offset = 0;
    for &id in sorted_ids {
        let Some(skip) = id.checked_sub(offset) else { continue };
        if skip >= rest.len() {
            break;
        }
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut(skip);
        if let Some((bucket, tail)) = tail.split_first_mut() {
            out.push(bucket);
            rest = tail;
        }
        offset = id + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(docs: &[(DocId, &str)]) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for (id, text) in docs {
            index.insert(*id, text.split(' '));
        }
        index
    }

    #[test]
    fn term_frequencies_are_normalized_by_length() {
        let index = index_with(&[(1, "curly cat curly tail")]);
        let freqs = index.word_frequencies(1);
        assert_eq!(freqs.get("curly"), Some(&0.5));
        assert_eq!(freqs.get("cat"), Some(&0.25));
        let total: f64 = freqs.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn both_views_agree() {
        let index = index_with(&[(1, "cat city"), (2, "dog city")]);
        let city = index.postings("city").unwrap();
        assert_eq!(city.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(index.document_has_term(2, "dog"));
        assert!(!index.document_has_term(1, "dog"));
    }

    #[test]
    fn removal_clears_postings_of_that_document_only() {
        let mut index = index_with(&[(1, "cat city"), (2, "dog city")]);
        let removed = index.remove(1).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(index.postings("cat").is_none());
        assert_eq!(index.postings("city").unwrap().len(), 1);
        assert!(index.word_frequencies(1).is_empty());
        assert!(index.remove(1).is_none());
    }

    #[test]
    fn parallel_removal_matches_sequential() {
        let docs = [(1, "a b c d e"), (2, "b c x"), (3, "e e a")];
        let mut seq = index_with(&docs);
        let mut par = index_with(&docs);
        seq.remove(1);
        par.remove_parallel(1);
        for term in ["a", "b", "c", "d", "e", "x"] {
            assert_eq!(seq.postings(term), par.postings(term), "term {term}");
        }
    }

    #[test]
    fn document_without_words_has_empty_frequencies() {
        let index = index_with(&[]);
        assert!(index.word_frequencies(7).is_empty());
        let mut index = InvertedIndex::new();
        index.insert(7, std::iter::empty());
        assert!(index.term_freqs(7).unwrap().is_empty());
    }

    #[test]
    fn disjoint_buckets_picks_requested_slots() {
        let mut values = vec![0, 1, 2, 3, 4, 5];
        for v in disjoint_buckets(&mut values, &[1, 3, 4, 9]) {
            *v *= 10;
        }
        assert_eq!(values, vec![0, 10, 2, 30, 40, 5]);
    }
}
