use crate::error::{QueryError, Result};
use crate::tokenizer::{is_valid_text, split_into_words, StopWords};
use std::collections::BTreeSet;

/// Parsed query. Words borrow from the raw query string; both sets are
/// ordered so that every pass over them visits words in the same order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn validate(raw_query: &str) -> Result<(), QueryError> {
    if !is_valid_text(raw_query) {
        return Err(QueryError::ControlCharacters);
    }
    if raw_query.contains("--") {
        return Err(QueryError::DoubleMinus);
    }
    if raw_query.contains("- ") {
        return Err(QueryError::MissingMinusWord);
    }
    if raw_query.ends_with('-') {
        return Err(QueryError::TrailingMinus);
    }
    Ok(())
}

/// Parse `raw_query` into plus and minus words, dropping stop words.
/// A leading `-` marks a minus word.
pub fn parse_query<'q>(raw_query: &'q str, stop_words: &StopWords) -> Result<Query<'q>> {
    validate(raw_query)?;
    let mut query = Query::default();
    for word in split_into_words(raw_query) {
        let (word, is_minus) = match word.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (word, false),
        };
        if stop_words.contains(word) {
            continue;
        }
        if is_minus {
            query.minus_words.insert(word);
        } else {
            query.plus_words.insert(word);
        }
    }
    Ok(query)
}
