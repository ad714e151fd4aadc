//! Performance benchmarks for RELICT

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use relict::checkpoint::Checkpoint;
use relict::config::RelictConfig;
use relict::{HillClimber, Network, Population, Relict, SampleSet, Samples};

fn samples() -> Samples {
    SampleSet::new()
        .add(vec![0.0, 0.0, 0.0], vec![0.0])
        .add(vec![1.0, 0.0, 0.0], vec![1.0])
        .add(vec![0.0, 1.0, 0.0], vec![0.0])
        .add(vec![0.0, 0.0, 1.0], vec![1.0])
        .build()
}

fn benchmark_network_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_predict");

    for width in [10, 30, 100].iter() {
        let mut net = Network::new(2, *width, samples()).unwrap();
        let inputs = [1.0, 0.0, 1.0];

        group.bench_with_input(BenchmarkId::new("width", width), width, |b, _| {
            b.iter(|| net.predict(black_box(&inputs)));
        });
    }

    group.finish();
}

fn benchmark_train_pass(c: &mut Criterion) {
    let mut net = Network::new(2, 30, samples()).unwrap();

    c.bench_function("network_train_pass", |b| {
        b.iter(|| net.train_pass());
    });
}

fn benchmark_mutation(c: &mut Criterion) {
    let mut net = Network::new(2, 30, samples()).unwrap();

    c.bench_function("network_mutate", |b| {
        b.iter(|| net.mutate());
    });
}

fn benchmark_hill_climb_step(c: &mut Criterion) {
    let net = Network::new(2, 30, samples()).unwrap();
    let mut climber = HillClimber::new(net);

    c.bench_function("hill_climb_generation", |b| {
        b.iter(|| climber.step());
    });
}

fn benchmark_relict(c: &mut Criterion) {
    let shape = RelictConfig {
        depth: 3,
        width: 5,
        net_layers: 1,
        net_neurons: 5,
    };
    let mut relict = Relict::build(&shape, samples()).unwrap();
    let inputs = [0.0, 1.0, 0.0];

    c.bench_function("relict_predict", |b| {
        b.iter(|| relict.predict(black_box(&inputs)));
    });

    let scorer = |r: &mut Relict| {
        r.result.score = r.predict(&[1.0, 0.0, 0.0])[0];
    };

    c.bench_function("population_generation", |b| {
        let mut population = Population::seed(&relict, 16, 2);
        b.iter(|| {
            population.evaluate(&scorer);
            population.rank();
            population.advance(4, 16);
        });
    });
}

fn benchmark_checkpoint(c: &mut Criterion) {
    let relict = Relict::build(&RelictConfig::default(), samples()).unwrap();
    let checkpoint = Checkpoint::from_relict(relict, 0);

    c.bench_function("checkpoint_serialize", |b| {
        b.iter(|| bincode::serialize(black_box(&checkpoint)).unwrap());
    });

    let serialized = bincode::serialize(&checkpoint).unwrap();

    c.bench_function("checkpoint_deserialize", |b| {
        b.iter(|| {
            let _: Checkpoint = bincode::deserialize(black_box(&serialized)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    benchmark_network_predict,
    benchmark_train_pass,
    benchmark_mutation,
    benchmark_hill_climb_step,
    benchmark_relict,
    benchmark_checkpoint,
);

criterion_main!(benches);
