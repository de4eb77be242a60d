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
//! Vector-lane kernel
//!
//! Full chunks go through the selected [`SimdBackend`]; the remainder that
//! does not fill a vector is processed with scalar code.

use super::{MotionSlices, UpdateKernel};
use crate::body::Bounds;

#[cfg(feature = "simd")]
use super::step_axis;
#[cfg(not(feature = "simd"))]
use super::update_slices;

#[cfg(feature = "simd")]
use crate::simd::{select_backend, SimdBackend};

/// Kernel that processes several bodies per instruction where the CPU allows
pub struct SimdKernel {
    #[cfg(feature = "simd")]
    backend: Box<dyn SimdBackend>,
}

impl SimdKernel {
    /// Create a kernel using the best backend for the current CPU
    pub fn new() -> Self {
        SimdKernel {
            #[cfg(feature = "simd")]
            backend: select_backend(),
        }
    }

    /// Create a kernel on an explicit backend
    ///
    /// # Panics
    ///
    /// Panics if the backend is not supported on this CPU.
    #[cfg(feature = "simd")]
    pub fn with_backend(backend: Box<dyn SimdBackend>) -> Self {
        assert!(
            backend.is_supported(),
            "SIMD backend {} is not supported on this CPU",
            backend.name()
        );
        SimdKernel { backend }
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        #[cfg(feature = "simd")]
        {
            self.backend.name()
        }
        #[cfg(not(feature = "simd"))]
        {
            "Portable"
        }
    }

    /// Number of bodies processed per vector step
    pub fn width(&self) -> usize {
        #[cfg(feature = "simd")]
        {
            self.backend.width()
        }
        #[cfg(not(feature = "simd"))]
        {
            1
        }
    }
}

impl Default for SimdKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimdKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimdKernel")
            .field("backend", &self.backend_name())
            .field("width", &self.width())
            .finish()
    }
}

impl UpdateKernel for SimdKernel {
    const STRATEGY: &'static str = "simd";

    fn name(&self) -> &'static str {
        "simd"
    }

    #[cfg(feature = "simd")]
    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
        let width = self.width();
        let count = motion.len();
        let simd_count = (count / width) * width;

        let MotionSlices {
            x,
            y,
            horizontal_speed,
            vertical_speed,
        } = motion;

        if simd_count > 0 {
            // SAFETY: the backend was checked as supported at construction
            // and columns have equal length by MotionSlices construction.
            unsafe {
                self.backend.step_axis_vectorized(
                    &mut x[..simd_count],
                    &mut horizontal_speed[..simd_count],
                    bounds.width,
                    dt,
                );
                self.backend.step_axis_vectorized(
                    &mut y[..simd_count],
                    &mut vertical_speed[..simd_count],
                    bounds.height,
                    dt,
                );
            }
        }

        for i in simd_count..count {
            step_axis(&mut x[i], &mut horizontal_speed[i], bounds.width, dt);
            step_axis(&mut y[i], &mut vertical_speed[i], bounds.height, dt);
        }
    }

    #[cfg(not(feature = "simd"))]
    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
        update_slices(motion, bounds, dt);
    }
}
