use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use grid_2048::engine::{self as GameEngine, Move};
use grid_2048::grid::Grid;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = Vec::new();
    // Empty and two-tile starts
    grids.push(Grid::new(4, 4));
    let mut g = Grid::new(4, 4);
    g.spawn_random_value(&mut rng);
    g.spawn_random_value(&mut rng);
    grids.push(g.clone());
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..40 {
        g.reset_merge_flags();
        if !GameEngine::collapse(&mut g, seq[i % seq.len()]).is_empty() {
            g.spawn_random_value(&mut rng);
        }
        grids.push(g.clone());
    }
    grids
}

fn bench_collapse(c: &mut Criterion) {
    let grids = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("collapse/{:?}", dir).to_lowercase(), |bch| {
            bch.iter_batched(
                || grids.clone(),
                |mut batch| {
                    let mut n = 0usize;
                    for g in batch.iter_mut() {
                        n += GameEngine::collapse(g, dir).len();
                    }
                    black_box(n)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_terminal(c: &mut Criterion) {
    let grids = corpus();
    c.bench_function("is_terminal", |bch| {
        bch.iter(|| {
            let mut acc = 0u32;
            for g in &grids {
                acc += GameEngine::is_terminal(g) as u32;
            }
            black_box(acc)
        })
    });
}

criterion_group!(collapse, bench_collapse, bench_terminal);
criterion_main!(collapse);
