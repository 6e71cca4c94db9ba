use camp_core::natural_compare;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn location_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match i % 3 {
            0 => format!("Court {}", (i * 7919) % n),
            1 => format!("court {}b", (i * 104_729) % n),
            _ => format!("Clubhouse Room {:03}", i % 250),
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let names = location_names(2_000);
    c.bench_function("natural_sort_2000_names", |b| {
        b.iter(|| {
            let mut v = names.clone();
            v.sort_by(|x, y| natural_compare(x, y));
            black_box(v)
        })
    });
    c.bench_function("natural_compare_pair", |b| {
        b.iter(|| natural_compare(black_box("Court 2"), black_box("Court 10")))
    });
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
