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
//! Struct-of-arrays strategy over fixed-capacity arrays

use super::{FromBodies, Simulation};
use crate::body::{Body, Bounds, Color};
use crate::error::SimulationError;
use crate::kernel::{update_slices, MotionSlices};
use crate::random::BodyGenerator;
use crate::render::{draw_all, Renderer};

const NAME: &str = "fixed-array";

/// Capacity used when the strategy is selected by tag
pub const DEFAULT_FIXED_CAPACITY: usize = 1_000_000;

/// Five parallel arrays whose capacity `N` is fixed at compile time
///
/// Storage for all `N` bodies is allocated up front. Shrinking only lowers
/// the active count; asking for more than `N` bodies is an error.
pub struct StructOfArraySim<const N: usize = DEFAULT_FIXED_CAPACITY> {
    x: Box<[f32; N]>,
    y: Box<[f32; N]>,
    horizontal_speed: Box<[f32; N]>,
    vertical_speed: Box<[f32; N]>,
    color: Box<[Color; N]>,
    count: usize,
    bounds: Bounds,
    generator: BodyGenerator,
}

/// Allocate a default-filled array directly on the heap
fn boxed_array<T: Clone + Default, const N: usize>() -> Box<[T; N]> {
    vec![T::default(); N]
        .into_boxed_slice()
        .try_into()
        .unwrap_or_else(|_| unreachable!("boxed slice has exactly {} elements", N))
}

impl<const N: usize> StructOfArraySim<N> {
    /// Compile-time capacity
    pub const CAPACITY: usize = N;

    fn check_capacity(requested: usize) -> Result<(), SimulationError> {
        if requested > N {
            return Err(SimulationError::CapacityExceeded {
                strategy: NAME,
                requested,
                capacity: N,
            });
        }
        Ok(())
    }

    fn write(&mut self, index: usize, body: Body) {
        self.x[index] = body.x;
        self.y[index] = body.y;
        self.horizontal_speed[index] = body.horizontal_speed;
        self.vertical_speed[index] = body.vertical_speed;
        self.color[index] = body.color;
    }
}

impl<const N: usize> FromBodies for StructOfArraySim<N> {
    fn try_from_bodies(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError> {
        Self::check_capacity(bodies.len())?;

        let mut simulation = StructOfArraySim {
            x: boxed_array(),
            y: boxed_array(),
            horizontal_speed: boxed_array(),
            vertical_speed: boxed_array(),
            color: boxed_array(),
            count: bodies.len(),
            bounds,
            generator,
        };
        for (index, body) in bodies.iter().enumerate() {
            simulation.write(index, *body);
        }
        Ok(simulation)
    }
}

impl<const N: usize> Simulation for StructOfArraySim<N> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, dt: f32) {
        let count = self.count;
        let motion = MotionSlices::new(
            &mut self.x[..count],
            &mut self.y[..count],
            &mut self.horizontal_speed[..count],
            &mut self.vertical_speed[..count],
        );
        update_slices(motion, self.bounds, dt);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        draw_all(
            renderer,
            (0..self.count).map(|i| (self.x[i], self.y[i], self.color[i])),
        );
    }

    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
        Self::check_capacity(count)?;

        if count <= self.count {
            log::trace!("{NAME}: active count {} -> {count}", self.count);
        } else {
            for index in self.count..count {
                let body = self.generator.generate(self.bounds);
                self.write(index, body);
            }
        }
        self.count = count;
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        N
    }

    fn bodies(&self) -> Vec<Body> {
        (0..self.count)
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

impl<const N: usize> std::fmt::Debug for StructOfArraySim<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructOfArraySim")
            .field("capacity", &N)
            .field("count", &self.count)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Small = StructOfArraySim<16>;

    fn area() -> Bounds {
        Bounds::new(400.0, 300.0)
    }

    #[test]
    fn test_capacity_is_fixed() {
        let sim = Small::new(area(), 3, BodyGenerator::seeded(1));
        assert_eq!(sim.capacity(), 16);
        assert_eq!(Small::CAPACITY, 16);
        assert_eq!(sim.body_count(), 3);
    }

    #[test]
    fn test_grow_to_exact_capacity() {
        let mut sim = Small::new(area(), 0, BodyGenerator::seeded(1));
        sim.set_body_count(16);
        assert_eq!(sim.body_count(), 16);
        assert!(sim.bodies().iter().all(|body| body.is_within(area())));
    }

    #[test]
    fn test_grow_past_capacity_is_rejected() {
        let mut sim = Small::new(area(), 5, BodyGenerator::seeded(1));
        let before = sim.bodies();

        let error = sim.try_set_body_count(17).unwrap_err();
        assert!(matches!(
            error,
            SimulationError::CapacityExceeded {
                requested: 17,
                capacity: 16,
                ..
            }
        ));
        assert_eq!(sim.bodies(), before);
    }

    #[test]
    #[should_panic(expected = "fixed-array: requested 17 bodies but fixed capacity is 16")]
    fn test_set_body_count_past_capacity_panics() {
        let mut sim = Small::new(area(), 5, BodyGenerator::seeded(1));
        sim.set_body_count(17);
    }

    #[test]
    fn test_shrink_keeps_prefix() {
        let mut sim = Small::new(area(), 10, BodyGenerator::seeded(8));
        let before = sim.bodies();
        sim.set_body_count(4);
        assert_eq!(sim.bodies(), before[..4].to_vec());
        assert_eq!(sim.capacity(), 16);
    }

    #[test]
    fn test_copy_larger_than_capacity_fails() {
        let source = Small::new(area(), 16, BodyGenerator::seeded(2));
        let result = StructOfArraySim::<8>::try_from_copy(area(), &source, BodyGenerator::default());
        assert!(matches!(result, Err(SimulationError::CapacityExceeded { capacity: 8, .. })));
    }
}
