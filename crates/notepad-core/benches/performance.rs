use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use notepad_core::search::{find_next, replace_all_counted};
use notepad_core::{Document, LexicalTagger, SearchOptions};
use notepad_core_lang::LanguageProfile;

fn c_source(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        out.push_str(&format!(
            "int value_{i} = {i}; // counter \"{i}\"\nif (x) return \"done\";\n"
        ));
    }
    out.pop();
    out
}

fn bench_tag_large_file(c: &mut Criterion) {
    let text = c_source(2_000);
    let tagger = LexicalTagger::new(LanguageProfile::c());
    c.bench_function("tagging/4k_lines", |b| {
        b.iter(|| black_box(tagger.tag(black_box(&text))).len())
    });
}

fn bench_find_next_wraparound(c: &mut Criterion) {
    let mut text = c_source(10_000);
    text.insert_str(0, "needle ");
    let from = text.chars().count() / 2;
    c.bench_function("find_next/wraparound_20k_lines", |b| {
        b.iter(|| {
            black_box(find_next(
                black_box(&text),
                "needle",
                from,
                SearchOptions::default(),
            ))
        })
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = c_source(10_000);
    c.bench_function("replace_all/return_ignore_case", |b| {
        b.iter(|| {
            black_box(replace_all_counted(
                black_box(&text),
                "RETURN",
                "yield",
                SearchOptions::ignore_case(),
            ))
        })
    });
}

fn bench_typing_with_tagging(c: &mut Criterion) {
    let text = c_source(500);
    c.bench_function("typing_tagged/50_inserts", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::from_text(&text);
                doc.enable_tagging(LexicalTagger::new(LanguageProfile::c()), |spans| {
                    black_box(spans.len());
                });
                doc
            },
            |mut doc| {
                let mut offset = doc.len_chars() / 2;
                for _ in 0..50 {
                    doc.insert(offset, "x").unwrap();
                    offset += 1;
                }
                black_box(doc.version());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_tag_large_file,
    bench_find_next_wraparound,
    bench_replace_all,
    bench_typing_with_tagging
);
criterion_main!(benches);
