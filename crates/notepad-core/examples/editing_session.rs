//! Editing session example
//!
//! Drives a `Document` the way a notepad window would: load a file, type, tag, find and
//! replace, undo, and report status after each step.

use notepad_core::{
    ChangeEvent, Document, FindSession, LexicalTagger, ReplaceOutcome, SearchOptions, TagCategory,
    TextBuffer,
};
use notepad_core_lang::LanguageProfile;
use std::cell::RefCell;
use std::rc::Rc;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Editing session ===\n");

    let mut doc = Document::new();
    doc.load("int main() {\n    return 0;\n}\n");
    println!("Loaded: {:?}", doc.text());
    println!("Status: {}\n", doc.status_line());

    // Status bar observer.
    doc.subscribe(|event: &ChangeEvent, buffer: &TextBuffer| {
        println!(
            "  [change v{}] {:?} {:?}, buffer now {} chars",
            event.version,
            event.origin,
            event.affected_region(),
            buffer.len_chars()
        );
    });

    // Syntax tagging observer.
    let keywords = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&keywords);
    doc.enable_tagging(LexicalTagger::new(LanguageProfile::c()), move |spans| {
        *sink.borrow_mut() = spans
            .iter()
            .filter(|s| s.category == TagCategory::Keyword)
            .count();
    });
    println!("Keyword spans: {}\n", keywords.borrow());

    println!("1. Typing a comment:");
    let end = doc.len_chars();
    doc.insert(end, "// entry point\n").unwrap();
    println!("  Status: {}", doc.status_line());
    println!("  Keyword spans: {}\n", keywords.borrow());

    println!("2. Find and replace:");
    let mut session = FindSession::new("RETURN", "return", SearchOptions::ignore_case());
    let mut selection = 0..0;
    loop {
        match doc.replace_one(&mut session, selection.clone()).unwrap() {
            ReplaceOutcome::Found(hit) => {
                println!("  found at {:?}", hit.range());
                selection = hit.range();
            }
            ReplaceOutcome::Replaced(hit) => {
                println!("  replaced, now {:?}", hit.range());
                break;
            }
            ReplaceOutcome::NotFound => {
                println!("  not found");
                break;
            }
        }
    }

    let all = FindSession::new("0", "1", SearchOptions::default());
    let count = doc.replace_all(&all).unwrap();
    println!("  replace all: {count} occurrence(s)\n");

    println!("3. Undo:");
    while doc.undo().unwrap() {
        println!("  undo depth now {}", doc.history().undo_depth());
    }
    println!("  Text: {:?}", doc.text());

    println!("\n4. Save:");
    let saved = doc.text();
    doc.mark_saved();
    println!(
        "  wrote {} bytes, status: {}",
        saved.len(),
        doc.status_line()
    );
}
