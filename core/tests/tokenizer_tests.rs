use tfidf::tokenizer::{split_into_words, StopWords};

#[test]
fn it_splits_on_single_spaces_only() {
    let words: Vec<&str> = split_into_words("  Curly  cat,   curly-tail ").collect();
    // no lowercasing, no punctuation stripping
    assert_eq!(words, vec!["Curly", "cat,", "curly-tail"]);
}

#[test]
fn it_filters_stopwords() {
    let stop = StopWords::parse("the and").unwrap();
    let words: Vec<&str> = stop.filter("The quick brown fox and the lazy dog").collect();
    assert!(!words.contains(&"the"));
    assert!(!words.contains(&"and"));
    // stop words are case sensitive
    assert!(words.contains(&"The"));
}
