use std::collections::HashMap;
use std::sync::Arc;

pub type TermId = u32;

/// Append-only pool of unique terms. Both index directions refer to terms by
/// `TermId`, so each distinct word is stored once for the life of the pool.
#[derive(Debug, Default)]
pub struct TermPool {
    dictionary: HashMap<Arc<str>, TermId>,
    terms: Vec<Arc<str>>,
}

impl TermPool {
    pub fn new() -> Self { Self::default() }

    /// Id of `term`, interning it on first sight.
    pub fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.dictionary.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        let shared: Arc<str> = Arc::from(term);
        self.terms.push(Arc::clone(&shared));
        self.dictionary.insert(shared, id);
        id
    }

    pub fn get(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    pub fn resolve(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}
