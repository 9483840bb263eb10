//! Benchmarks for token recognition and matching
//!
//! Run with: cargo bench --bench matcher

use spintax::matcher::find_first;
use spintax::pattern::is_token;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn prose(words: usize, token_every: usize) -> String {
    (0..words)
        .map(|i| {
            if token_every > 0 && i % token_every == token_every - 1 {
                "{{left|right}}".to_string()
            } else {
                format!("word{}", i)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[divan::bench]
fn is_token_accept() -> bool {
    is_token(divan::black_box("{{alpha|beta}}"))
}

#[divan::bench]
fn is_token_reject_short() -> bool {
    is_token(divan::black_box("word"))
}

#[divan::bench(args = [10, 100, 1000])]
fn find_first_no_token(bencher: divan::Bencher, words: usize) {
    let text = prose(words, 0);
    bencher.bench(|| find_first(divan::black_box(&text)));
}

#[divan::bench(args = [10, 100, 1000])]
fn find_first_token_at_end(bencher: divan::Bencher, words: usize) {
    let text = prose(words, words);
    bencher.bench(|| find_first(divan::black_box(&text)));
}
