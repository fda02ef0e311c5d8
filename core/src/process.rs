use crate::document::Document;
use crate::error::Result;
use crate::log_duration::LogDuration;
use crate::server::SearchServer;
use rayon::prelude::*;

/// Run every query against `server` in parallel with the default ACTUAL filter.
/// Results line up with `queries`; the first invalid query fails the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    let _timer = LogDuration::new("process_queries");
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect()
}

/// Like [`process_queries`], flattened into one list in query order.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;

    fn server() -> SearchServer {
        let mut server = SearchServer::with_stop_words("and with").unwrap();
        let texts = [
            "funny pet and nasty rat",
            "funny pet with curly hair",
            "funny pet and not very nasty rat",
            "pet with rat and rat and rat",
            "nasty rat with curly hair",
        ];
        for (id, text) in texts.iter().enumerate() {
            server.add_document(id as i32 + 1, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        server
    }

    #[test]
    fn results_follow_query_order() {
        let s = server();
        let queries = ["nasty rat -not", "not very funny nasty pet", "curly hair"];
        let results = process_queries(&s, &queries).unwrap();
        assert_eq!(results.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 5, 2]);
        for (query, found) in queries.iter().zip(&results) {
            assert_eq!(found, &s.find_top_documents(query).unwrap());
        }
    }

    #[test]
    fn joined_results_are_flattened_in_order() {
        let s = server();
        let queries = vec!["nasty rat -not".to_string(), "curly hair".to_string()];
        let joined = process_queries_joined(&s, &queries).unwrap();
        let nested = process_queries(&s, &queries).unwrap();
        assert_eq!(joined, nested.concat());
    }

    #[test]
    fn one_bad_query_fails_the_batch() {
        let s = server();
        assert!(process_queries(&s, &["rat", "--rat"]).is_err());
    }
}
