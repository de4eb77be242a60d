// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for growing, shrinking and copying simulations

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use kinematics::{Simulation, SimulationConfig, Strategy};
use std::hint::black_box;

/// Benchmark: grow from empty to N bodies in one call
fn bench_grow(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow");

    for body_count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(body_count as u64));
        let config = SimulationConfig::new(800.0, 600.0, 0).with_seed(3);

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), body_count),
                &body_count,
                |b, &count| {
                    b.iter_batched(
                        || strategy.create(&config).unwrap(),
                        |mut simulation| {
                            simulation.set_body_count(count);
                            black_box(simulation)
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

/// Benchmark: shrink to a tenth and regrow
fn bench_shrink_regrow(c: &mut Criterion) {
    let mut group = c.benchmark_group("shrink_regrow");
    let body_count = 10_000;
    let config = SimulationConfig::new(800.0, 600.0, body_count).with_seed(4);

    for strategy in Strategy::ALL {
        let mut simulation = strategy.create(&config).unwrap();
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                simulation.set_body_count(body_count / 10);
                simulation.set_body_count(body_count);
            });
        });
    }

    group.finish();
}

/// Benchmark: copy-construct every strategy from an array of structures
fn bench_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy");
    let config = SimulationConfig::new(800.0, 600.0, 10_000).with_seed(5);
    let source = Strategy::VecOfStruct.create(&config).unwrap();
    group.throughput(Throughput::Elements(source.body_count() as u64));

    for strategy in Strategy::ALL {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                black_box(
                    strategy
                        .create_from_copy(config.bounds(), &source, config.generator())
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grow, bench_shrink_regrow, bench_copy);
criterion_main!(benches);
