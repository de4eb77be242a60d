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
//! SIMD vectorization of the bounce update
//!
//! The update touches each axis independently: positions advance by
//! `speed * dt`, then speeds on that axis are flipped when the moved body is
//! leaving the area. Backends vectorize that single-axis step over
//! contiguous `f32` columns.
//!
//! # Architecture
//!
//! - **Runtime Detection**: CPU features are detected once and cached
//! - **Dispatch**: Selects the best available implementation (AVX2 > scalar)
//! - **Deterministic**: Every backend multiplies and adds separately (no FMA),
//!   so vector and scalar paths produce bit-identical results
//! - **Stable Rust**: Uses `std::arch` intrinsics, no nightly features required
//!
//! # Safety
//!
//! Intrinsic code is only reached through a backend whose `is_supported`
//! returned true. Backends process full chunks of `width()` lanes only; the
//! caller handles the remainder.

mod dispatch;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

pub use dispatch::{detect_cpu_features, has_avx2, CpuFeatures};
pub use scalar::ScalarBackend;

#[cfg(target_arch = "x86_64")]
pub use avx2::Avx2Backend;

/// Number of `f32` lanes in a 256-bit AVX2 register
pub const AVX2_WIDTH: usize = 8;

/// Backend for the vectorized single-axis bounce step
pub trait SimdBackend: Send + Sync {
    /// Get the name of this SIMD backend
    fn name(&self) -> &str;

    /// Get the vector width (number of f32 lanes per operation)
    fn width(&self) -> usize;

    /// Check if this backend is supported on the current CPU
    fn is_supported(&self) -> bool;

    /// Advance one axis for every full chunk of `width()` bodies
    ///
    /// For each lane, `position += speed * dt`; then the speed is negated
    /// when the moved body overlaps the low edge or the `limit` edge while
    /// moving toward it.
    ///
    /// # Safety
    ///
    /// - `positions` and `speeds` must have the same length
    /// - Caller must ensure CPU supports required instructions
    /// - Elements past the last full chunk are left untouched
    unsafe fn step_axis_vectorized(
        &self,
        positions: &mut [f32],
        speeds: &mut [f32],
        limit: f32,
        dt: f32,
    );
}

/// Select the best available SIMD backend for the current CPU
///
/// - **AVX2**: If available (Intel Haswell 2013+, AMD Excavator 2015+)
/// - **Scalar**: Always available as fallback
pub fn select_backend() -> Box<dyn SimdBackend> {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx2() {
            log::debug!("selected AVX2 backend ({AVX2_WIDTH} lanes)");
            return Box::new(Avx2Backend);
        }
    }

    log::debug!("selected scalar backend");
    Box::new(ScalarBackend)
}
