use logdiff::error::Error;
use logdiff::tokenizer::Tokenizer;

#[test]
fn splits_on_single_separator() {
    let tokenizer = Tokenizer::new().with_separators([" "]);
    assert_eq!(tokenizer.tokenize("Sample log message").unwrap(), vec!["Sample", "log", "message"]);
}

#[test]
fn tokenizing_without_separators_fails() {
    let tokenizer = Tokenizer::new();
    match tokenizer.tokenize("Sample log message") {
        Err(Error::Configuration(_)) => {}
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn empty_separators_are_ignored() {
    let tokenizer = Tokenizer::new().with_separators(["", " "]);
    assert_eq!(tokenizer.separators(), &[" ".to_string()]);
}

#[test]
fn splits_on_any_separator_and_drops_empty_pieces() {
    let tokenizer = Tokenizer::new().with_separators([" ", ",", "="]);
    let tokens = tokenizer.tokenize("key=value,  other=1,,x").unwrap();
    assert_eq!(tokens, vec!["key", "value", "other", "1", "x"]);
}

#[test]
fn trims_discardable_characters_at_both_ends() {
    let tokenizer = Tokenizer::new()
        .with_separators([" "])
        .with_discardable(",.[]<>?:;");
    let tokens = tokenizer.tokenize("[main] done. host:8080: ...").unwrap();
    assert_eq!(tokens, vec!["main", "done", "host:8080"]);
}

#[test]
fn multi_character_separators_are_honoured() {
    let tokenizer = Tokenizer::new().with_separators([" | "]);
    assert_eq!(tokenizer.tokenize("a | b|c | d").unwrap(), vec!["a", "b|c", "d"]);
}

#[test]
fn non_ascii_input_is_split_on_char_boundaries() {
    let tokenizer = Tokenizer::new().with_separators([" "]);
    let tokens = tokenizer.tokenize("zażółć gęślą jaźń").unwrap();
    assert_eq!(tokens, vec!["zażółć", "gęślą", "jaźń"]);
}
