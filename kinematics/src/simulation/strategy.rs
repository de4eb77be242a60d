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
//! Strategy selection and enum dispatch

use super::{
    BlockedSim, FromBodies, ParallelSim, SimdSim, Simulation, StructOfAlignedSim, StructOfArraySim,
    StructOfOversizedSim, StructOfPointerSim, StructOfVecSim, VecOfStructSim,
};
use crate::body::{Body, Bounds};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::kernel::ParallelKernel;
use crate::random::BodyGenerator;
use crate::render::Renderer;
use std::fmt;
use std::str::FromStr;

/// Closed set of layout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// [`VecOfStructSim`]
    VecOfStruct,
    /// [`StructOfVecSim`] with the scalar kernel
    StructOfVec,
    /// [`StructOfArraySim`] at the default capacity
    FixedArray,
    /// [`StructOfPointerSim`]
    Pointer,
    /// [`StructOfAlignedSim`]
    Aligned,
    /// [`StructOfOversizedSim`]
    Oversized,
    /// [`SimdSim`]
    Simd,
    /// [`ParallelSim`]
    Parallel,
    /// [`BlockedSim`]
    Blocked,
}

impl Strategy {
    /// Every strategy, in declaration order
    pub const ALL: [Strategy; 9] = [
        Strategy::VecOfStruct,
        Strategy::StructOfVec,
        Strategy::FixedArray,
        Strategy::Pointer,
        Strategy::Aligned,
        Strategy::Oversized,
        Strategy::Simd,
        Strategy::Parallel,
        Strategy::Blocked,
    ];

    /// Kebab-case name, as reported by [`Simulation::name`]
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::VecOfStruct => "vec-of-struct",
            Strategy::StructOfVec => "struct-of-vec",
            Strategy::FixedArray => "fixed-array",
            Strategy::Pointer => "pointer",
            Strategy::Aligned => "aligned",
            Strategy::Oversized => "oversized",
            Strategy::Simd => "simd",
            Strategy::Parallel => "parallel",
            Strategy::Blocked => "blocked",
        }
    }

    /// Whether shrinking discards bodies past the new count
    pub const fn truncates_on_shrink(self) -> bool {
        matches!(
            self,
            Strategy::VecOfStruct | Strategy::StructOfVec | Strategy::Simd | Strategy::Parallel
        )
    }

    /// Build this strategy with `config.initial_count` generated bodies
    pub fn create(self, config: &SimulationConfig) -> Result<AnySimulation, SimulationError> {
        config.validate()?;
        let (bounds, count, generator) = (config.bounds(), config.initial_count, config.generator());

        let simulation = match self {
            Strategy::VecOfStruct => AnySimulation::VecOfStruct(VecOfStructSim::try_new(bounds, count, generator)?),
            Strategy::StructOfVec => AnySimulation::StructOfVec(StructOfVecSim::try_new(bounds, count, generator)?),
            Strategy::FixedArray => AnySimulation::FixedArray(StructOfArraySim::try_new(bounds, count, generator)?),
            Strategy::Pointer => AnySimulation::Pointer(StructOfPointerSim::try_new(bounds, count, generator)?),
            Strategy::Aligned => AnySimulation::Aligned(StructOfAlignedSim::try_new(bounds, count, generator)?),
            Strategy::Oversized => AnySimulation::Oversized(StructOfOversizedSim::try_new(bounds, count, generator)?),
            Strategy::Simd => AnySimulation::Simd(SimdSim::try_new(bounds, count, generator)?),
            Strategy::Parallel => AnySimulation::Parallel(StructOfVecSim::try_new_with(
                bounds,
                count,
                generator,
                parallel_kernel(config)?,
            )?),
            Strategy::Blocked => AnySimulation::Blocked(BlockedSim::try_new(bounds, count, generator)?),
        };

        log::debug!("created {} with {count} bodies", self.name());
        Ok(simulation)
    }

    /// Build this strategy as a copy of `other`'s bodies
    pub fn create_from_copy(
        self,
        bounds: Bounds,
        other: &dyn Simulation,
        generator: BodyGenerator,
    ) -> Result<AnySimulation, SimulationError> {
        let simulation = match self {
            Strategy::VecOfStruct => AnySimulation::VecOfStruct(VecOfStructSim::try_from_copy(bounds, other, generator)?),
            Strategy::StructOfVec => AnySimulation::StructOfVec(StructOfVecSim::try_from_copy(bounds, other, generator)?),
            Strategy::FixedArray => AnySimulation::FixedArray(StructOfArraySim::try_from_copy(bounds, other, generator)?),
            Strategy::Pointer => AnySimulation::Pointer(StructOfPointerSim::try_from_copy(bounds, other, generator)?),
            Strategy::Aligned => AnySimulation::Aligned(StructOfAlignedSim::try_from_copy(bounds, other, generator)?),
            Strategy::Oversized => AnySimulation::Oversized(StructOfOversizedSim::try_from_copy(bounds, other, generator)?),
            Strategy::Simd => AnySimulation::Simd(SimdSim::try_from_copy(bounds, other, generator)?),
            Strategy::Parallel => AnySimulation::Parallel(ParallelSim::try_from_copy(bounds, other, generator)?),
            Strategy::Blocked => AnySimulation::Blocked(BlockedSim::try_from_copy(bounds, other, generator)?),
        };

        log::debug!("copied {} bodies from {} into {}", other.body_count(), other.name(), self.name());
        Ok(simulation)
    }
}

fn parallel_kernel(config: &SimulationConfig) -> Result<ParallelKernel, SimulationError> {
    #[cfg(feature = "parallel")]
    if let Some(threads) = config.threads {
        return ParallelKernel::with_threads(threads);
    }
    #[cfg(not(feature = "parallel"))]
    let _ = config;
    Ok(ParallelKernel::new())
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimulationError::UnknownStrategy(s.to_string()))
    }
}

/// Any strategy, chosen at run time
#[derive(Debug)]
pub enum AnySimulation {
    /// Array of structures
    VecOfStruct(VecOfStructSim),
    /// Struct of vectors, scalar update
    StructOfVec(StructOfVecSim),
    /// Struct of fixed-capacity arrays
    FixedArray(StructOfArraySim),
    /// Struct of raw buffers
    Pointer(StructOfPointerSim),
    /// Struct of cache-line-aligned raw buffers
    Aligned(StructOfAlignedSim),
    /// Struct of block-padded aligned raw buffers
    Oversized(StructOfOversizedSim),
    /// Struct of vectors, vector-lane update
    Simd(SimdSim),
    /// Struct of vectors, multi-threaded update
    Parallel(ParallelSim),
    /// Blocks of sixteen lanes per field
    Blocked(BlockedSim),
}

macro_rules! dispatch {
    ($self:expr, $sim:ident => $body:expr) => {
        match $self {
            AnySimulation::VecOfStruct($sim) => $body,
            AnySimulation::StructOfVec($sim) => $body,
            AnySimulation::FixedArray($sim) => $body,
            AnySimulation::Pointer($sim) => $body,
            AnySimulation::Aligned($sim) => $body,
            AnySimulation::Oversized($sim) => $body,
            AnySimulation::Simd($sim) => $body,
            AnySimulation::Parallel($sim) => $body,
            AnySimulation::Blocked($sim) => $body,
        }
    };
}

impl AnySimulation {
    /// Tag of the wrapped strategy
    pub fn strategy(&self) -> Strategy {
        match self {
            AnySimulation::VecOfStruct(_) => Strategy::VecOfStruct,
            AnySimulation::StructOfVec(_) => Strategy::StructOfVec,
            AnySimulation::FixedArray(_) => Strategy::FixedArray,
            AnySimulation::Pointer(_) => Strategy::Pointer,
            AnySimulation::Aligned(_) => Strategy::Aligned,
            AnySimulation::Oversized(_) => Strategy::Oversized,
            AnySimulation::Simd(_) => Strategy::Simd,
            AnySimulation::Parallel(_) => Strategy::Parallel,
            AnySimulation::Blocked(_) => Strategy::Blocked,
        }
    }
}

impl Simulation for AnySimulation {
    fn name(&self) -> &'static str {
        dispatch!(self, sim => sim.name())
    }

    fn update(&mut self, dt: f32) {
        dispatch!(self, sim => sim.update(dt))
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        dispatch!(self, sim => sim.draw(renderer))
    }

    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
        dispatch!(self, sim => sim.try_set_body_count(count))
    }

    fn set_body_count(&mut self, count: usize) {
        dispatch!(self, sim => sim.set_body_count(count))
    }

    fn body_count(&self) -> usize {
        dispatch!(self, sim => sim.body_count())
    }

    fn capacity(&self) -> usize {
        dispatch!(self, sim => sim.capacity())
    }

    fn bodies(&self) -> Vec<Body> {
        dispatch!(self, sim => sim.bodies())
    }

    fn bounds(&self) -> Bounds {
        dispatch!(self, sim => sim.bounds())
    }

    fn set_bounds(&mut self, width: f32, height: f32) {
        dispatch!(self, sim => sim.set_bounds(width, height))
    }
}
