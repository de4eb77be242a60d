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
//! Simulation strategies
//!
//! Every strategy stores the same bodies and applies the same update rule;
//! they differ only in memory layout and in how the update loop walks that
//! layout. All of them implement [`Simulation`], and a strategy can be
//! copy-constructed from any other through [`FromBodies::from_copy`].
//!
//! | Strategy | Layout | Shrink |
//! |---|---|---|
//! | [`VecOfStructSim`] | `Vec<Body>` | truncates |
//! | [`StructOfVecSim`] | five `Vec` columns | truncates all columns |
//! | [`StructOfArraySim`] | five fixed-size boxed arrays | count only |
//! | [`StructOfPointerSim`] | five raw buffers, exact capacity | count only |
//! | [`StructOfAlignedSim`] | five raw buffers on cache-line boundaries | count only |
//! | [`StructOfOversizedSim`] | aligned buffers padded to whole blocks | count only |
//! | [`SimdSim`] | as `StructOfVecSim`, vector-lane update | truncates |
//! | [`ParallelSim`] | as `StructOfVecSim`, multi-threaded update | truncates |
//! | [`BlockedSim`] | cache-line-aligned blocks of 16 lanes per field | count only |
//!
//! Growing always appends freshly generated bodies, so every strategy built
//! from generators seeded alike holds identical bodies after any sequence of
//! resizes.

mod aos;
mod blocked;
mod columns;
mod soa_array;
mod soa_ptr;
mod soa_vec;
mod strategy;

pub use aos::VecOfStructSim;
pub use blocked::{BlockedSim, BodyBlock, BLOCK_LANES};
pub use soa_array::{StructOfArraySim, DEFAULT_FIXED_CAPACITY};
pub use soa_ptr::{StructOfAlignedSim, StructOfOversizedSim, StructOfPointerSim, OVERSIZE_BLOCK};
pub use soa_vec::{ParallelSim, SimdSim, StructOfVecSim};
pub use strategy::{AnySimulation, Strategy};

use crate::body::{Body, Bounds};
use crate::error::{fatal, SimulationError};
use crate::random::BodyGenerator;
use crate::render::Renderer;

/// Common contract of every layout strategy
pub trait Simulation: Send {
    /// Kebab-case name of the strategy
    fn name(&self) -> &'static str;

    /// Advance every active body by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Hand every active body to `renderer`, in index order
    ///
    /// # Panics
    ///
    /// Panics if the renderer is not ready.
    fn draw(&self, renderer: &mut dyn Renderer);

    /// Resize to exactly `count` active bodies
    ///
    /// Growing keeps existing bodies and appends freshly generated ones.
    /// On error the simulation is left exactly as it was.
    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError>;

    /// Resize to exactly `count` active bodies
    ///
    /// # Panics
    ///
    /// Panics with the strategy, requested count and capacity if the
    /// resize cannot be honoured.
    fn set_body_count(&mut self, count: usize) {
        if let Err(error) = self.try_set_body_count(count) {
            fatal("set_body_count", error);
        }
    }

    /// Number of active bodies
    fn body_count(&self) -> usize;

    /// Number of bodies storage is currently sized for
    fn capacity(&self) -> usize;

    /// Copy of every active body, in index order
    fn bodies(&self) -> Vec<Body>;

    /// Area bodies bounce inside
    fn bounds(&self) -> Bounds;

    /// Change the area; affects the next update and bodies generated after
    fn set_bounds(&mut self, width: f32, height: f32);
}

/// Constructors shared by every strategy
///
/// Implementors only provide [`try_from_bodies`](FromBodies::try_from_bodies);
/// creation with random bodies and copy-construction are derived from it.
pub trait FromBodies: Simulation + Sized {
    /// Build a simulation holding exactly `bodies`, in order
    fn try_from_bodies(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError>;

    /// Build a simulation with `count` generated bodies
    fn try_new(bounds: Bounds, count: usize, generator: BodyGenerator) -> Result<Self, SimulationError> {
        let mut simulation = Self::try_from_bodies(bounds, &[], generator)?;
        simulation.try_set_body_count(count)?;
        Ok(simulation)
    }

    /// Build a simulation with `count` generated bodies
    ///
    /// # Panics
    ///
    /// Panics if storage for `count` bodies cannot be provided.
    fn new(bounds: Bounds, count: usize, generator: BodyGenerator) -> Self {
        Self::try_new(bounds, count, generator).unwrap_or_else(|error| fatal("new", error))
    }

    /// Copy every body of `other`, in order, into new storage
    ///
    /// `other` is only read. `generator` supplies bodies for later growth.
    fn try_from_copy(
        bounds: Bounds,
        other: &dyn Simulation,
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError> {
        Self::try_from_bodies(bounds, &other.bodies(), generator)
    }

    /// Copy every body of `other`, in order, into new storage
    ///
    /// # Panics
    ///
    /// Panics if this strategy cannot hold `other`'s bodies.
    fn from_copy(bounds: Bounds, other: &dyn Simulation, generator: BodyGenerator) -> Self {
        Self::try_from_copy(bounds, other, generator).unwrap_or_else(|error| fatal("from_copy", error))
    }
}
