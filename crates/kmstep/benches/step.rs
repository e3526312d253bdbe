use criterion::{
    AxisScale, BenchmarkId, Criterion, PlotConfiguration, criterion_group, criterion_main,
};
use kmstep::kmeans::init::{InitMode, find_initial};
use kmstep::{Engine, EngineConfig, PointSet, rng};
use rand::RngExt;
use std::collections::HashMap;

const DIMENSION: usize = 3;

fn generate_random_points(n: usize) -> PointSet {
    let mut rng = rng::new();
    PointSet::generate(&mut rng, DIMENSION, n, 3.0).unwrap()
}

fn generate_clustered_points(n: usize, k: usize) -> PointSet {
    let mut rng = rng::new();

    let centers: [[f32; DIMENSION]; 4] = [
        [-2.0, -2.0, 0.0],
        [2.0, -2.0, 1.0],
        [0.0, 2.0, -1.0],
        [0.0, 0.0, 2.5],
    ];
    let noise = 0.2;

    let mut coords = Vec::with_capacity(n * DIMENSION);
    for i in 0..n {
        for &c in &centers[i % k] {
            coords.push(c + (rng.random::<f32>() - 0.5) * noise);
        }
    }

    PointSet::from_flat(DIMENSION, coords).unwrap()
}

struct Input<'a> {
    pub label: String,
    pub k: usize,
    pub samples: &'a HashMap<usize, PointSet>,
}

fn bench(c: &mut Criterion) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);

    let sizes = [("1k", 1_000usize), ("10k", 10_000usize), ("100k", 100_000usize)];

    let random_samples: HashMap<usize, PointSet> = sizes
        .iter()
        .map(|&(_, n)| (n, generate_random_points(n)))
        .collect();
    let clustered_samples: HashMap<usize, PointSet> = sizes
        .iter()
        .map(|&(_, n)| (n, generate_clustered_points(n, 4)))
        .collect();

    let ks = [2usize, 4usize];

    let group_inputs = ks
        .iter()
        .flat_map(|&k| {
            [
                ("random", &random_samples),
                ("clustered", &clustered_samples),
            ]
            .into_iter()
            .map(move |(sample_label, samples)| Input {
                label: format!("{sample_label}-k{k}"),
                k,
                samples,
            })
        })
        .collect::<Vec<_>>();

    for group_input in group_inputs {
        let mut group = c.benchmark_group(format!("farthest_point_init/{}", group_input.label));
        group.plot_config(plot_config.clone());

        for &(size_name, size) in sizes.iter() {
            group.bench_with_input(BenchmarkId::from_parameter(size_name), &size, |b, size| {
                let points = group_input.samples.get(size).unwrap();
                b.iter_with_large_drop(|| {
                    let rng = &mut rng::new();
                    find_initial(rng, points, group_input.k, InitMode::FarthestPoint, 3.0)
                })
            });
        }
        group.finish();

        let mut group = c.benchmark_group(format!("step/{}", group_input.label));
        group.plot_config(plot_config.clone());

        for &(size_name, size) in sizes.iter() {
            group.bench_with_input(BenchmarkId::from_parameter(size_name), &size, |b, size| {
                let points = group_input.samples.get(size).unwrap();
                let mut engine = Engine::with_rng(rng::new(), EngineConfig::default());
                engine.set_points(points.clone());
                engine
                    .initialize(group_input.k, InitMode::RandomSample)
                    .unwrap();
                b.iter(|| engine.step().unwrap().iteration())
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
