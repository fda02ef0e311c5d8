use crate::document::DocId;

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// Broad class of a failure: bad input from the caller, or a lookup that found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
}

/// Malformed query syntax. Every variant is raised before the index is read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query contains control characters")]
    ControlCharacters,
    #[error("query contains a double minus")]
    DoubleMinus,
    #[error("no word after '-' symbol")]
    MissingMinusWord,
    #[error("query ends with a bare '-'")]
    TrailingMinus,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("document text contains control characters")]
    InvalidDocumentText,
    #[error("document id {0} is negative")]
    NegativeDocumentId(DocId),
    #[error("document id {0} already exists")]
    DuplicateDocumentId(DocId),
    #[error("stop word {0:?} contains control characters")]
    InvalidStopWord(String),
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("document {0} not found")]
    DocumentNotFound(DocId),
    #[error("index {index} is out of range for {len} documents")]
    IndexOutOfRange { index: usize, len: usize },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::DocumentNotFound(_) | SearchError::IndexOutOfRange { .. } => ErrorKind::NotFound,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(SearchError::NegativeDocumentId(-1).kind(), ErrorKind::InvalidArgument);
        assert_eq!(SearchError::from(QueryError::DoubleMinus).kind(), ErrorKind::InvalidArgument);
        assert_eq!(SearchError::DocumentNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(SearchError::IndexOutOfRange { index: 2, len: 1 }.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn messages_name_the_violation() {
        let err = SearchError::from(QueryError::MissingMinusWord);
        assert_eq!(err.to_string(), "invalid query: no word after '-' symbol");
    }
}
