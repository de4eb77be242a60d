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
//! AVX2 vectorized implementation for x86_64 CPUs
//!
//! Processes 8 × f32 values per instruction (256-bit vectors).
//!
//! # Requirements
//!
//! - x86_64 CPU with AVX2 support
//! - Detected automatically at runtime

use super::{SimdBackend, AVX2_WIDTH};
use crate::body::BODY_RADIUS;

use std::arch::x86_64::*;

/// AVX2 backend for x86_64 CPUs
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx2Backend;

impl SimdBackend for Avx2Backend {
    fn name(&self) -> &str {
        "AVX2"
    }

    fn width(&self) -> usize {
        AVX2_WIDTH
    }

    fn is_supported(&self) -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[target_feature(enable = "avx2")]
    unsafe fn step_axis_vectorized(
        &self,
        positions: &mut [f32],
        speeds: &mut [f32],
        limit: f32,
        dt: f32,
    ) {
        let radius = _mm256_set1_ps(BODY_RADIUS);
        let zero = _mm256_setzero_ps();
        let limit = _mm256_set1_ps(limit);
        let dt = _mm256_set1_ps(dt);
        let sign_bit = _mm256_set1_ps(-0.0);

        for (p_chunk, s_chunk) in positions
            .chunks_exact_mut(AVX2_WIDTH)
            .zip(speeds.chunks_exact_mut(AVX2_WIDTH))
        {
            let p = _mm256_loadu_ps(p_chunk.as_ptr());
            let s = _mm256_loadu_ps(s_chunk.as_ptr());
            let p = _mm256_add_ps(p, _mm256_mul_ps(s, dt));

            // pos - R < 0 && speed < 0
            let leaving_low = _mm256_and_ps(
                _mm256_cmp_ps::<_CMP_LT_OQ>(_mm256_sub_ps(p, radius), zero),
                _mm256_cmp_ps::<_CMP_LT_OQ>(s, zero),
            );
            // pos + R > limit && speed > 0
            let leaving_high = _mm256_and_ps(
                _mm256_cmp_ps::<_CMP_GT_OQ>(_mm256_add_ps(p, radius), limit),
                _mm256_cmp_ps::<_CMP_GT_OQ>(s, zero),
            );

            // Negate by toggling the sign bit in bouncing lanes only.
            let flip = _mm256_and_ps(_mm256_or_ps(leaving_low, leaving_high), sign_bit);
            let s = _mm256_xor_ps(s, flip);

            _mm256_storeu_ps(p_chunk.as_mut_ptr(), p);
            _mm256_storeu_ps(s_chunk.as_mut_ptr(), s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avx2_detection() {
        let _supported = Avx2Backend.is_supported();
    }

    #[test]
    fn test_avx2_step_axis() {
        let backend = Avx2Backend;
        if !backend.is_supported() {
            eprintln!("Skipping AVX2 test - not supported on this CPU");
            return;
        }
        let mut positions = vec![5.0, 100.0, 795.0, 400.0, 5.0, 795.0, 10.0, 790.0, 42.0];
        let mut speeds = vec![-10.0, 10.0, 10.0, -10.0, 10.0, -10.0, -10.0, 10.0, -10.0];

        unsafe {
            backend.step_axis_vectorized(&mut positions, &mut speeds, 800.0, 0.5);
        }

        assert_eq!(&positions[..8], &[0.0, 105.0, 800.0, 395.0, 10.0, 790.0, 5.0, 795.0]);
        assert_eq!(&speeds[..8], &[10.0, 10.0, -10.0, -10.0, 10.0, -10.0, 10.0, -10.0]);
        // Lane past the last full vector is left for the caller.
        assert_eq!(positions[8], 42.0);
        assert_eq!(speeds[8], -10.0);
    }
}
