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
//! Scalar fallback implementation for SIMD operations
//!
//! This module provides a pure scalar implementation that serves as:
//! - Fallback for CPUs without SIMD support
//! - Reference implementation for testing SIMD correctness

use super::SimdBackend;
use crate::kernel::step_axis;

/// Scalar backend that processes one element at a time
///
/// Always available on all platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarBackend;

impl SimdBackend for ScalarBackend {
    fn name(&self) -> &str {
        "Scalar"
    }

    fn width(&self) -> usize {
        1
    }

    fn is_supported(&self) -> bool {
        true
    }

    unsafe fn step_axis_vectorized(
        &self,
        positions: &mut [f32],
        speeds: &mut [f32],
        limit: f32,
        dt: f32,
    ) {
        for (position, speed) in positions.iter_mut().zip(speeds.iter_mut()) {
            step_axis(position, speed, limit, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_backend_always_supported() {
        let backend = ScalarBackend;
        assert!(backend.is_supported());
        assert_eq!(backend.width(), 1);
    }

    #[test]
    fn test_scalar_step_axis() {
        let backend = ScalarBackend;
        let mut positions = vec![5.0, 100.0, 795.0];
        let mut speeds = vec![-10.0, 10.0, 10.0];

        unsafe {
            backend.step_axis_vectorized(&mut positions, &mut speeds, 800.0, 0.5);
        }

        assert_eq!(positions, vec![0.0, 105.0, 800.0]);
        assert_eq!(speeds, vec![10.0, 10.0, -10.0]);
    }
}
