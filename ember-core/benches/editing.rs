//! Editing benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ember_core::{Editor, Position};

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor");

    let source = "for (int i = 0; i < n; i++) { sum += v[i]; }\n".repeat(20);
    group.throughput(Throughput::Bytes(source.len() as u64));

    // Each keystroke records a whole-buffer snapshot, so this tracks snapshot cost
    group.bench_function("type_chars", |b| {
        b.iter(|| {
            let mut editor = Editor::new();
            for ch in source.chars() {
                editor.insert_char(ch);
            }
            black_box(editor)
        })
    });

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor");

    let mut base = Editor::new();
    for i in 0..200 {
        base.insert_text(&format!("line {}: some text content here\n", i));
    }

    group.bench_function("undo_redo_all", |b| {
        b.iter(|| {
            let mut editor = base.clone();
            while editor.undo() {}
            while editor.redo() {}
            black_box(editor)
        })
    });

    group.finish();
}

fn bench_paste_large(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor");

    let text = "int x = 0;\n".repeat(2000);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("paste_large", |b| {
        b.iter(|| {
            let mut editor = Editor::from_text("int main() {\n}");
            editor.set_cursor(Position::new(1, 0));
            editor.insert_text(&text);
            black_box(editor)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_typing, bench_undo_redo, bench_paste_large);
criterion_main!(benches);
