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
//! Benchmarks comparing update throughput across layouts
//!
//! These benchmarks measure:
//! - One frame of the bounce update for every strategy
//! - How throughput scales with body count

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kinematics::{Simulation, SimulationConfig, Strategy};
use std::hint::black_box;

const DT: f32 = 1.0 / 60.0;

/// Benchmark: one update of N bodies per strategy
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for body_count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(body_count as u64));
        let config = SimulationConfig::new(1920.0, 1080.0, body_count).with_seed(1);

        for strategy in Strategy::ALL {
            let mut simulation = strategy.create(&config).unwrap();
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), body_count),
                &body_count,
                |b, _| {
                    b.iter(|| {
                        simulation.update(black_box(DT));
                    });
                },
            );
            black_box(simulation.body_count());
        }
    }

    group.finish();
}

/// Benchmark: a full frame (update and body read-back) for the two extremes
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let body_count = 10_000;
    group.throughput(Throughput::Elements(body_count as u64));
    let config = SimulationConfig::new(1920.0, 1080.0, body_count).with_seed(2);

    for strategy in [Strategy::VecOfStruct, Strategy::Oversized] {
        let mut simulation = strategy.create(&config).unwrap();
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                simulation.update(DT);
                black_box(simulation.bodies());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_frame);
criterion_main!(benches);
