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
//! Layout comparison demo
//!
//! Builds every strategy by copying from one canonical simulation, runs
//! them side by side for a number of frames, and reports the time each
//! spends in `update` along with whether they still agree.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example layout_demo --release -- [bodies] [frames] [strategy...]
//! RUST_LOG=debug cargo run --example layout_demo --release
//! ```

use kinematics::render::RecordingRenderer;
use kinematics::{AnySimulation, Simulation, SimulationConfig, SimulationError, Strategy};
use std::time::{Duration, Instant};

const DT: f32 = 1.0 / 60.0;

struct Args {
    bodies: usize,
    frames: usize,
    strategies: Vec<Strategy>,
}

fn parse_args() -> Result<Args, SimulationError> {
    let mut args = std::env::args().skip(1);
    let bodies = args.next().and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);
    let strategies = args
        .map(|name| name.parse())
        .collect::<Result<Vec<Strategy>, _>>()?;

    Ok(Args {
        bodies,
        frames,
        strategies: if strategies.is_empty() {
            Strategy::ALL.to_vec()
        } else {
            strategies
        },
    })
}

fn build(config: &SimulationConfig, strategies: &[Strategy]) -> Result<Vec<AnySimulation>, SimulationError> {
    let source = Strategy::VecOfStruct.create(config)?;
    let mut simulations: Vec<AnySimulation> = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let previous: &dyn Simulation = simulations.last().unwrap_or(&source);
        let copy = strategy.create_from_copy(config.bounds(), previous, config.generator())?;
        simulations.push(copy);
    }
    Ok(simulations)
}

fn main() -> Result<(), SimulationError> {
    env_logger::init();
    let args = parse_args()?;

    let config = SimulationConfig::new(1920.0, 1080.0, args.bodies).with_seed(42);
    config.validate()?;

    println!("=== Layout Comparison ===\n");
    println!(
        "{} bodies, {} frames at {:.4}s per frame\n",
        args.bodies, args.frames, DT
    );

    let mut simulations = build(&config, &args.strategies)?;
    let mut timings = vec![Duration::ZERO; simulations.len()];

    for _ in 0..args.frames {
        for (simulation, elapsed) in simulations.iter_mut().zip(&mut timings) {
            let start = Instant::now();
            simulation.update(DT);
            *elapsed += start.elapsed();
        }
    }

    let reference = simulations.first().map(|s| s.bodies()).unwrap_or_default();
    println!("{:<16} {:>12} {:>14} {:>10}", "strategy", "capacity", "per frame", "agrees");
    for (simulation, elapsed) in simulations.iter().zip(&timings) {
        let per_frame = *elapsed / args.frames.max(1) as u32;
        println!(
            "{:<16} {:>12} {:>14} {:>10}",
            simulation.name(),
            simulation.capacity(),
            format!("{per_frame:.2?}"),
            simulation.bodies() == reference
        );
    }

    let mut renderer = RecordingRenderer::new();
    if let Some(simulation) = simulations.first() {
        simulation.draw(&mut renderer);
        println!("\nDrew {} bodies from {}", renderer.drawn.len(), simulation.name());
    }

    Ok(())
}
