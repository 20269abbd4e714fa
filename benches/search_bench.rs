use criterion::{criterion_group, criterion_main, Criterion, black_box};
use springer::board::Loc;
use springer::search::engine::{SearchParams, Searcher};

fn bench_open_tours(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_tour");
    for (name, cols, rows) in [("6x6", 6usize, 6usize), ("8x8", 8, 8), ("12x12", 12, 12)] {
        group.bench_function(name, |ben| {
            ben.iter(|| {
                let mut searcher = Searcher::new(SearchParams {
                    cols,
                    rows,
                    start: black_box(Loc::new(0, 0)),
                    budget: None,
                    ..SearchParams::default()
                })
                .unwrap();
                let path = searcher.next_path().unwrap();
                black_box(path.map(|path| path.len()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_open_tours);
criterion_main!(benches);
