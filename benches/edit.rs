use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use piece_buffer::Editor;

fn sequential_insert(n: usize) {
    let mut ed = Editor::empty();
    for i in 0..n {
        ed.insert(i, b"x").unwrap();
    }
}

fn random_insert_delete(n: usize) {
    let mut ed = Editor::empty();
    ed.insert(0, &vec![b'a'; n]).unwrap();
    let mut pos = 0usize;
    for i in 0..n {
        let size = ed.size();
        pos = (pos * 7 + i * 13) % size.max(1);
        ed.insert(pos, b"yz").unwrap();
        if pos + 1 < ed.size() {
            ed.delete(pos, 1).unwrap();
        }
    }
}

fn bench_sequential_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_insert");
    for size in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| sequential_insert(size));
        });
    }
    group.finish();
}

fn bench_random_insert_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_insert_delete");
    for size in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| random_insert_delete(size));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sequential_insert, bench_random_insert_delete);
criterion_main!(benches);
