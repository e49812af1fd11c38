use std::io::Write;

use logdiff::dictionary::DictLookup;
use logdiff::error::Error;

#[test]
fn lookup_is_case_insensitive() {
    let dict = DictLookup::from_words(["Hello", "world"]);
    assert!(dict.contains("hello"));
    assert!(dict.contains("HELLO"));
    assert!(dict.contains("World"));
    assert!(!dict.contains("andrzej"));
}

#[test]
fn words_are_deduplicated_after_folding() {
    let dict = DictLookup::from_words(["Server", "server", " SERVER ", "", "down"]);
    assert_eq!(dict.len(), 2);
}

#[test]
fn reader_skips_blank_lines() {
    let dict = DictLookup::from_reader("alpha\n\n  beta  \n".as_bytes()).unwrap();
    assert_eq!(dict.len(), 2);
    assert!(dict.contains("beta"));
}

#[test]
fn bundled_english_list_knows_common_log_words() {
    let dict = DictLookup::english();
    assert!(!dict.is_empty());
    for word in ["hello", "my", "old", "is", "response", "server", "shutting", "down"] {
        assert!(dict.contains(word), "missing {word}");
    }
    assert!(!dict.contains("d0g"));
}

#[test]
fn bundled_english_list_covers_everyday_vocabulary() {
    let dict = DictLookup::english();
    assert!(dict.len() > 5_000);
    for word in [
        "committed", "aborted", "transaction", "refused", "established", "timeout", "retried",
    ] {
        assert!(dict.contains(word), "missing {word}");
    }
}

#[test]
fn loads_word_list_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Connection").unwrap();
    writeln!(file, "refused").unwrap();
    let dict = DictLookup::from_path(file.path()).unwrap();
    assert!(dict.contains("connection"));
    assert!(dict.contains("REFUSED"));
}

#[test]
fn missing_word_list_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    match DictLookup::from_path(&missing) {
        Err(Error::Resource { path, .. }) => assert!(path.ends_with("nope.txt")),
        other => panic!("expected a resource error, got {other:?}"),
    }
}
