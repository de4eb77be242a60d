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
//! Struct-of-arrays strategy over growable vectors
//!
//! The same storage backs three strategies that differ only in the
//! [`UpdateKernel`] walking the columns.

use super::{FromBodies, Simulation};
use crate::body::{Body, Bounds, Color};
use crate::error::SimulationError;
use crate::kernel::{MotionSlices, ParallelKernel, ScalarKernel, SimdKernel, UpdateKernel};
use crate::random::BodyGenerator;
use crate::render::{draw_all, Renderer};
use std::collections::TryReserveError;

/// Struct-of-arrays over vectors with a vector-lane update
pub type SimdSim = StructOfVecSim<SimdKernel>;

/// Struct-of-arrays over vectors with a multi-threaded update
pub type ParallelSim = StructOfVecSim<ParallelKernel>;

/// Five parallel growable columns, one per field
///
/// Columns always have equal length. Shrinking truncates all five together.
#[derive(Debug)]
pub struct StructOfVecSim<K = ScalarKernel> {
    x: Vec<f32>,
    y: Vec<f32>,
    horizontal_speed: Vec<f32>,
    vertical_speed: Vec<f32>,
    color: Vec<Color>,
    bounds: Bounds,
    generator: BodyGenerator,
    kernel: K,
}

impl<K: UpdateKernel> StructOfVecSim<K> {
    /// Build a simulation holding `bodies`, updated by `kernel`
    pub fn try_from_bodies_with(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
        kernel: K,
    ) -> Result<Self, SimulationError> {
        let mut simulation = StructOfVecSim {
            x: Vec::new(),
            y: Vec::new(),
            horizontal_speed: Vec::new(),
            vertical_speed: Vec::new(),
            color: Vec::new(),
            bounds,
            generator,
            kernel,
        };
        let name = simulation.name();
        simulation
            .reserve_exact(bodies.len())
            .map_err(|source| SimulationError::Reserve {
                strategy: name,
                requested: bodies.len(),
                source,
            })?;
        for body in bodies {
            simulation.push(*body);
        }
        Ok(simulation)
    }

    /// Build a simulation with `count` generated bodies, updated by `kernel`
    pub fn try_new_with(
        bounds: Bounds,
        count: usize,
        generator: BodyGenerator,
        kernel: K,
    ) -> Result<Self, SimulationError> {
        let mut simulation = Self::try_from_bodies_with(bounds, &[], generator, kernel)?;
        simulation.try_set_body_count(count)?;
        Ok(simulation)
    }

    /// Kernel applying the update
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Reserve room for `additional` more bodies in every column
    ///
    /// A failure part way through leaves the active bodies untouched; only
    /// spare capacity of earlier columns may have grown.
    fn reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.x.try_reserve_exact(additional)?;
        self.y.try_reserve_exact(additional)?;
        self.horizontal_speed.try_reserve_exact(additional)?;
        self.vertical_speed.try_reserve_exact(additional)?;
        self.color.try_reserve_exact(additional)?;
        Ok(())
    }

    fn push(&mut self, body: Body) {
        self.x.push(body.x);
        self.y.push(body.y);
        self.horizontal_speed.push(body.horizontal_speed);
        self.vertical_speed.push(body.vertical_speed);
        self.color.push(body.color);
    }

    fn truncate(&mut self, count: usize) {
        self.x.truncate(count);
        self.y.truncate(count);
        self.horizontal_speed.truncate(count);
        self.vertical_speed.truncate(count);
        self.color.truncate(count);
    }
}

impl<K: UpdateKernel + Default> FromBodies for StructOfVecSim<K> {
    fn try_from_bodies(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError> {
        Self::try_from_bodies_with(bounds, bodies, generator, K::default())
    }
}

impl<K: UpdateKernel> Simulation for StructOfVecSim<K> {
    fn name(&self) -> &'static str {
        K::STRATEGY
    }

    fn update(&mut self, dt: f32) {
        let motion = MotionSlices::new(
            &mut self.x,
            &mut self.y,
            &mut self.horizontal_speed,
            &mut self.vertical_speed,
        );
        self.kernel.update(motion, self.bounds, dt);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let positions = self.x.iter().zip(&self.y);
        draw_all(
            renderer,
            positions
                .zip(&self.color)
                .map(|((&x, &y), &color)| (x, y, color)),
        );
    }

    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
        let current = self.x.len();
        if count <= current {
            self.truncate(count);
            log::trace!("{}: truncated {current} -> {count} bodies", self.name());
            return Ok(());
        }

        let old_capacity = self.capacity();
        let name = self.name();
        self.reserve_exact(count - current)
            .map_err(|source| SimulationError::Reserve {
                strategy: name,
                requested: count,
                source,
            })?;
        if self.capacity() != old_capacity {
            log::debug!("{name}: capacity {old_capacity} -> {}", self.capacity());
        }

        for _ in current..count {
            let body = self.generator.generate(self.bounds);
            self.push(body);
        }
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.x.len()
    }

    fn capacity(&self) -> usize {
        self.x
            .capacity()
            .min(self.y.capacity())
            .min(self.horizontal_speed.capacity())
            .min(self.vertical_speed.capacity())
            .min(self.color.capacity())
    }

    fn bodies(&self) -> Vec<Body> {
        (0..self.x.len())
            .map(|i| {
                Body::new(
                    self.x[i],
                    self.y[i],
                    self.horizontal_speed[i],
                    self.vertical_speed[i],
                    self.color[i],
                )
            })
            .collect()
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::VecOfStructSim;

    fn area() -> Bounds {
        Bounds::new(640.0, 480.0)
    }

    #[test]
    fn test_names_follow_kernel() {
        let scalar: StructOfVecSim = StructOfVecSim::new(area(), 1, BodyGenerator::default());
        let simd = SimdSim::new(area(), 1, BodyGenerator::default());
        let parallel = ParallelSim::new(area(), 1, BodyGenerator::default());
        assert_eq!(scalar.name(), "struct-of-vec");
        assert_eq!(simd.name(), "simd");
        assert_eq!(parallel.name(), "parallel");
    }

    #[test]
    fn test_names_match_strategy_tags() {
        use crate::kernel::{ParallelKernel, ScalarKernel, SimdKernel};
        use crate::simulation::Strategy;

        assert_eq!(ScalarKernel::STRATEGY, Strategy::StructOfVec.name());
        assert_eq!(SimdKernel::STRATEGY, Strategy::Simd.name());
        assert_eq!(ParallelKernel::STRATEGY, Strategy::Parallel.name());

        // A kernel's own name does not decide the strategy name.
        let sim = StructOfVecSim::try_new_with(area(), 2, BodyGenerator::default(), ScalarKernel).unwrap();
        assert_eq!(sim.kernel().name(), "scalar");
        assert_eq!(sim.name(), "struct-of-vec");
    }

    #[test]
    fn test_columns_stay_in_lockstep() {
        let mut sim: StructOfVecSim = StructOfVecSim::new(area(), 30, BodyGenerator::seeded(2));
        for count in [12, 0, 45, 45, 3] {
            sim.set_body_count(count);
            assert_eq!(sim.x.len(), count);
            assert_eq!(sim.y.len(), count);
            assert_eq!(sim.horizontal_speed.len(), count);
            assert_eq!(sim.vertical_speed.len(), count);
            assert_eq!(sim.color.len(), count);
            assert!(sim.body_count() <= sim.capacity());
        }
    }

    #[test]
    fn test_same_bodies_as_array_of_structures() {
        let aos = VecOfStructSim::new(area(), 25, BodyGenerator::seeded(11));
        let soa: StructOfVecSim = StructOfVecSim::new(area(), 25, BodyGenerator::seeded(11));
        assert_eq!(aos.bodies(), soa.bodies());
    }

    #[test]
    fn test_explicit_kernel() {
        let sim = StructOfVecSim::try_new_with(
            area(),
            40,
            BodyGenerator::seeded(4),
            ParallelKernel::new().with_chunk_size(8),
        )
        .unwrap();
        assert_eq!(sim.body_count(), 40);
        assert_eq!(sim.kernel().name(), "parallel");
    }
}
