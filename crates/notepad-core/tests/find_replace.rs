use notepad_core::search::{find_next, replace_all};
use notepad_core::{
    Document, DocumentError, FindSession, ReplaceOutcome, SearchMatch, SearchOptions,
};

fn range(start: usize, end: usize) -> SearchMatch {
    SearchMatch { start, end }
}

#[test]
fn test_find_next_wraps_to_start() {
    let hit = find_next("abcXdef", "abc", 4, SearchOptions::default()).unwrap();
    assert_eq!(hit, range(0, 3));
}

#[test]
fn test_replace_all_pure_examples() {
    assert_eq!(
        replace_all("aAaA", "a", "Z", SearchOptions::ignore_case()),
        "ZZZZ"
    );
    assert_eq!(
        replace_all("aAaA", "a", "Z", SearchOptions::default()),
        "ZAZA"
    );
    assert_eq!(
        replace_all("aAaA", "", "Z", SearchOptions::default()),
        "aAaA"
    );
}

#[test]
fn test_document_find_next_walks_matches() {
    let doc = Document::from_text("Hello hello HELLO");
    let mut session = FindSession::new("hello", "", SearchOptions::ignore_case());

    let first = doc.find_next(&mut session, 0..0).unwrap().unwrap();
    assert_eq!(first, range(0, 5));
    let second = doc.find_next(&mut session, first.range()).unwrap().unwrap();
    assert_eq!(second, range(6, 11));
    let third = doc.find_next(&mut session, second.range()).unwrap().unwrap();
    assert_eq!(third, range(12, 17));
    let wrapped = doc.find_next(&mut session, third.range()).unwrap().unwrap();
    assert_eq!(wrapped, range(0, 5));
}

#[test]
fn test_document_find_next_not_found() {
    let doc = Document::from_text("abc");
    let mut session = FindSession::new("zzz", "", SearchOptions::default());
    assert_eq!(doc.find_next(&mut session, 0..0).unwrap(), None);
}

#[test]
fn test_replace_one_is_two_step() {
    let mut doc = Document::from_text("one two one");
    let mut session = FindSession::new("one", "1", SearchOptions::default());

    // Nothing selected: the first call only finds.
    let outcome = doc.replace_one(&mut session, 0..0).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Found(range(0, 3)));
    assert_eq!(doc.text(), "one two one");
    assert!(!doc.is_modified());

    // Second call with the found match selected replaces it.
    let outcome = doc.replace_one(&mut session, 0..3).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(range(0, 1)));
    assert_eq!(doc.text(), "1 two one");
    assert_eq!(doc.history().undo_depth(), 1);

    // Continue: the next find lands on the remaining occurrence.
    let outcome = doc.replace_one(&mut session, 0..1).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Found(range(6, 9)));
    let outcome = doc.replace_one(&mut session, 6..9).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(range(6, 7)));
    assert_eq!(doc.text(), "1 two 1");

    let outcome = doc.replace_one(&mut session, 6..7).unwrap();
    assert_eq!(outcome, ReplaceOutcome::NotFound);

    doc.undo().unwrap();
    assert_eq!(doc.text(), "1 two one");
}

#[test]
fn test_replace_one_respects_case_mode() {
    let mut doc = Document::from_text("Foo foo");

    let mut strict = FindSession::new("foo", "bar", SearchOptions::default());
    let outcome = doc.replace_one(&mut strict, 0..3).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Found(range(4, 7)));
    assert_eq!(doc.text(), "Foo foo");

    let mut loose = FindSession::new("foo", "bar", SearchOptions::ignore_case());
    let outcome = doc.replace_one(&mut loose, 0..3).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(range(0, 3)));
    assert_eq!(doc.text(), "bar foo");
}

#[test]
fn test_ignore_case_find_and_replace_agree() {
    let mut doc = Document::from_text("ſ s S");
    let mut session = FindSession::new("s", "x", SearchOptions::ignore_case());

    // U+017F is not the lowercase of "s": it is neither found nor replaced.
    let outcome = doc.replace_one(&mut session, 0..1).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Found(range(2, 3)));
    let outcome = doc.replace_one(&mut session, 2..3).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(range(2, 3)));
    assert_eq!(doc.text(), "ſ x S");

    assert_eq!(doc.replace_all(&session).unwrap(), 1);
    assert_eq!(doc.text(), "ſ x x");

    let mut lone = Document::from_text("ſ");
    let mut session = FindSession::new("s", "x", SearchOptions::ignore_case());
    assert_eq!(
        lone.replace_one(&mut session, 0..1).unwrap(),
        ReplaceOutcome::NotFound
    );
    assert_eq!(lone.replace_all(&session).unwrap(), 0);
}

#[test]
fn test_every_found_match_is_replaceable() {
    let mut doc = Document::from_text("İstanbul");
    let mut session = FindSession::new("i\u{307}", "I", SearchOptions::ignore_case());

    let outcome = doc.replace_one(&mut session, 0..0).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Found(range(0, 1)));
    let outcome = doc.replace_one(&mut session, 0..1).unwrap();
    assert_eq!(outcome, ReplaceOutcome::Replaced(range(0, 1)));
    assert_eq!(doc.text(), "Istanbul");
}

#[test]
fn test_replace_one_rejects_bad_selection() {
    let mut doc = Document::from_text("abc");
    let mut session = FindSession::new("a", "b", SearchOptions::default());
    assert!(matches!(
        doc.replace_one(&mut session, 2..10),
        Err(DocumentError::OutOfRange { .. })
    ));
}

#[test]
fn test_document_replace_all_is_one_undo_step() {
    let mut doc = Document::from_text("aAaA");
    let session = FindSession::new("a", "Z", SearchOptions::ignore_case());

    assert_eq!(doc.replace_all(&session).unwrap(), 4);
    assert_eq!(doc.text(), "ZZZZ");
    assert!(doc.is_modified());
    assert_eq!(doc.history().undo_depth(), 1);

    doc.undo().unwrap();
    assert_eq!(doc.text(), "aAaA");
}

#[test]
fn test_document_replace_all_without_matches_is_noop() {
    let mut doc = Document::from_text("abc");
    let session = FindSession::new("x", "y", SearchOptions::default());
    assert_eq!(doc.replace_all(&session).unwrap(), 0);
    assert!(!doc.is_modified());
    assert!(!doc.can_undo());
    assert_eq!(doc.version(), 0);
}

#[test]
fn test_empty_query_is_reported_not_applied() {
    let mut doc = Document::from_text("abc");
    let session = FindSession::new("", "y", SearchOptions::default());
    assert_eq!(doc.replace_all(&session), Err(DocumentError::EmptyPattern));
    assert_eq!(doc.text(), "abc");
    assert!(!doc.is_modified());
}
