//! Benchmarks for full updates: edit, settle, commit
//!
//! Run with: cargo bench --bench settle

use spintax::{Editor, EngineConfig, TokenPlugin};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn text_with_tokens(tokens: usize) -> String {
    (0..tokens)
        .map(|i| format!("word{} {{{{a{}|b{}}}}}", i, i, i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[divan::bench(args = [1, 10, 50])]
fn set_text_extracts_all(bencher: divan::Bencher, tokens: usize) {
    let text = text_with_tokens(tokens);
    bencher
        .with_inputs(|| {
            let mut editor = Editor::new(EngineConfig::default());
            let plugin = TokenPlugin::install(&mut editor).unwrap();
            (editor, plugin)
        })
        .bench_local_values(|(mut editor, _plugin)| {
            editor.set_text(divan::black_box(&text)).unwrap();
            editor
        });
}

#[divan::bench(args = [100, 1000])]
fn typing_plain_text(bencher: divan::Bencher, chars: usize) {
    let text: String = "lorem ipsum ".chars().cycle().take(chars).collect();
    bencher
        .with_inputs(|| {
            let mut editor = Editor::default();
            let plugin = TokenPlugin::install(&mut editor).unwrap();
            (editor, plugin)
        })
        .bench_local_values(|(mut editor, _plugin)| {
            for ch in text.chars() {
                let mut buf = [0u8; 4];
                editor.insert_text(ch.encode_utf8(&mut buf)).unwrap();
            }
            editor
        });
}
