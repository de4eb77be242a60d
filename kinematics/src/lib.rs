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
//! # Kinematics
//!
//! A bouncing-bodies simulation implemented over several memory layouts,
//! for comparing how layout affects update throughput.
//!
//! Every layout stores the same bodies (a position, a per-axis speed and a
//! colour) inside a rectangular area and advances them with the same rule:
//! a body moves by `speed * dt`, then has that speed negated if it now
//! overlaps an edge while moving toward it. Layouts are interchangeable behind
//! the [`Simulation`] trait and produce identical bodies frame for frame.
//!
//! ## Features
//!
//! - **Layouts**: array of structures, struct of vectors, fixed arrays, raw
//!   buffers (natural, cache-line aligned, block padded) and a blocked hybrid
//! - **Vectorization**: Runtime-dispatched AVX2 kernel with scalar fallback
//!   (`simd` feature)
//! - **Parallelization**: Optional Rayon kernel over disjoint chunks
//!   (`parallel` feature)
//!
//! ## Example
//!
//! ```rust
//! use kinematics::{Simulation, SimulationConfig, Strategy};
//!
//! let config = SimulationConfig::new(800.0, 600.0, 1000).with_seed(7);
//! let mut aos = Strategy::VecOfStruct.create(&config).unwrap();
//! let mut soa = Strategy::Aligned
//!     .create_from_copy(config.bounds(), &aos, config.generator())
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     aos.update(1.0 / 60.0);
//!     soa.update(1.0 / 60.0);
//! }
//! assert_eq!(aos.bodies(), soa.bodies());
//! ```

#![warn(missing_docs)]

/// Body record, colour and bounds
pub mod body;

/// Memory buffers for the pointer-based layouts
pub mod buffer;

/// Simulation configuration
pub mod config;

/// Error types
pub mod error;

/// Update rule and kernels
pub mod kernel;

/// Randomness source and body generation
pub mod random;

/// Rendering collaborator
pub mod render;

/// SIMD vectorization support
#[cfg(feature = "simd")]
pub mod simd;

/// Layout strategies
pub mod simulation;

pub use body::{Body, Bounds, Color, BODY_RADIUS};
pub use config::SimulationConfig;
pub use error::SimulationError;
pub use random::{BodyGenerator, UniformSource};
pub use render::Renderer;
pub use simulation::{AnySimulation, FromBodies, Simulation, Strategy};
