use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Split text into words on single spaces. Runs of spaces and leading/trailing
/// spaces never yield empty words. The iterator borrows from `text` and can be
/// cloned to restart it.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> + Clone + '_ {
    text.split(' ').filter(|word| !word.is_empty())
}

/// True when `text` carries no control characters (code points below U+0020).
pub fn is_valid_text(text: &str) -> bool {
    !text.chars().any(|c| c < ' ')
}

/// Words dropped from both documents and queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    pub fn new() -> Self { Self::default() }

    /// Build from any collection of words. Empty words are skipped; a word with
    /// control characters is rejected.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if !is_valid_text(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(Self { words: set })
    }

    /// Build from one space-separated string, e.g. `"and in at"`.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    /// Words of `text` that are not stop words, in order, duplicates kept.
    pub fn filter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        split_into_words(text).filter(move |word| !self.contains(word))
    }
}
