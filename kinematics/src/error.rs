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
//! Error types
//!
//! Nothing in the core is recoverable in the sense of being retried: a
//! capacity violation is a driver bug and an allocation failure is fatal.
//! The fallible entry points (`try_*`) still surface these as values so the
//! caller decides how to die, and so the instance is provably untouched when
//! an error is returned.

use crate::buffer::BufferError;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised by simulation strategies
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A fixed-capacity strategy was asked to hold more bodies than it can
    #[error("{strategy}: requested {requested} bodies but fixed capacity is {capacity}")]
    CapacityExceeded {
        /// Strategy that rejected the request
        strategy: &'static str,
        /// Requested body count
        requested: usize,
        /// Compile-time capacity of the strategy
        capacity: usize,
    },

    /// A raw buffer could not be laid out or allocated
    #[error("{strategy}: buffer allocation failed")]
    Buffer {
        /// Strategy that attempted the allocation
        strategy: &'static str,
        /// Underlying buffer failure
        #[source]
        source: BufferError,
    },

    /// A growable sequence could not reserve room for the requested count
    #[error("{strategy}: could not reserve storage for {requested} bodies")]
    Reserve {
        /// Strategy that attempted the reservation
        strategy: &'static str,
        /// Requested body count
        requested: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },

    /// A dedicated worker pool could not be created
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A strategy name did not match any known strategy
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// Bounds were non-finite or too small to hold a body
    #[error("invalid bounds {width}x{height}")]
    InvalidBounds {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
}

impl SimulationError {
    /// Name of the strategy that raised the error, if any
    pub fn strategy(&self) -> Option<&'static str> {
        match self {
            SimulationError::CapacityExceeded { strategy, .. }
            | SimulationError::Buffer { strategy, .. }
            | SimulationError::Reserve { strategy, .. } => Some(strategy),
            _ => None,
        }
    }
}

/// Abort on a fatal strategy error with full diagnostic context
///
/// `operation` names the public operation that failed (for example
/// `"set_body_count"`).
pub(crate) fn fatal(operation: &str, error: SimulationError) -> ! {
    log::error!("{operation}: {error}");
    match std::error::Error::source(&error) {
        Some(source) => panic!("{operation}: {error}: {source}"),
        None => panic!("{operation}: {error}"),
    }
}
