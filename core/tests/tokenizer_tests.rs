use search_core::tokenizer::tokenize;

#[test]
fn it_normalizes_and_stems() {
    let words = tokenize("Running Runners RUN! The CAT's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"menu".to_string()));
    assert!(words.iter().all(|w| w.chars().all(|c| !c.is_ascii_punctuation())));
}

#[test]
fn it_keeps_common_words() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert_eq!(words.iter().filter(|w| *w == "the").count(), 2);
    assert!(words.contains(&"and".to_string()));
}

#[test]
fn query_and_document_text_normalize_alike() {
    assert_eq!(tokenize("CATS"), tokenize("cats."));
    assert_eq!(tokenize("  \t\n"), Vec::<String>::new());
}
