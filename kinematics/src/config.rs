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
//! Simulation configuration

use crate::body::{Bounds, BODY_RADIUS};
use crate::error::SimulationError;
use crate::random::BodyGenerator;

/// Settings used to build a strategy through [`Strategy::create`]
///
/// [`Strategy::create`]: crate::simulation::Strategy::create
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Area bodies bounce inside
    pub bounds: Bounds,
    /// Number of bodies generated at construction
    pub initial_count: usize,
    /// Seed for the body generator
    pub seed: u64,
    /// Worker thread count for the parallel strategy (`None` = rayon default)
    pub threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            bounds: Bounds::default(),
            initial_count: 1000,
            seed: 0,
            threads: None,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration for `initial_count` bodies in a `width` x `height` area
    pub fn new(width: f32, height: f32, initial_count: usize) -> Self {
        SimulationConfig {
            bounds: Bounds::new(width, height),
            initial_count,
            ..Self::default()
        }
    }

    /// Set the body generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the parallel strategy on a dedicated pool of `threads` workers
    pub fn with_threads(mut self, threads: usize) -> Self {
        assert!(threads > 0, "Thread count must be > 0");
        self.threads = Some(threads);
        self
    }

    /// Area bodies bounce inside
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// A fresh generator seeded from this configuration
    ///
    /// Each call starts the same sequence, so strategies built from one
    /// configuration hold identical bodies.
    pub fn generator(&self) -> BodyGenerator {
        BodyGenerator::seeded(self.seed)
    }

    /// Check that the bounds can hold at least one body
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.bounds.is_valid() {
            Ok(())
        } else {
            Err(SimulationError::InvalidBounds {
                width: self.bounds.width,
                height: self.bounds.height,
            })
        }
    }

    /// Smallest area side that passes [`validate`](Self::validate)
    pub fn min_extent() -> f32 {
        2.0 * BODY_RADIUS
    }
}
