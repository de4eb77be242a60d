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
//! CPU feature detection and runtime dispatch
//!
//! This module provides runtime detection of CPU SIMD capabilities to
//! automatically select the best available implementation.

use std::fmt;
use std::sync::OnceLock;

/// CPU feature flags detected at runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    /// CPU supports SSE2
    pub has_sse2: bool,
    /// CPU supports SSE4.1
    pub has_sse4_1: bool,
    /// CPU supports AVX (Advanced Vector Extensions)
    pub has_avx: bool,
    /// CPU supports AVX2
    pub has_avx2: bool,
    /// CPU supports FMA (Fused Multiply-Add)
    ///
    /// Reported for diagnostics only. Backends never fuse, so results stay
    /// identical to the scalar path.
    pub has_fma: bool,
}

impl CpuFeatures {
    /// Create a new CpuFeatures with all features disabled
    pub fn none() -> Self {
        Self::default()
    }

    /// Widest `f32` lane count any backend can use on this CPU
    pub fn best_width(&self) -> usize {
        if self.has_avx2 {
            super::AVX2_WIDTH
        } else {
            1
        }
    }
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            ("sse2", self.has_sse2),
            ("sse4.1", self.has_sse4_1),
            ("avx", self.has_avx),
            ("avx2", self.has_avx2),
            ("fma", self.has_fma),
        ];
        let enabled: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        if enabled.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&enabled.join(" "))
        }
    }
}

/// Global cache of detected CPU features
static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Detect CPU features at runtime
///
/// Uses CPUID instruction to query CPU capabilities. Results are cached
/// globally to avoid repeated detection overhead.
///
/// # Platform Support
///
/// - **x86_64**: Full feature detection via CPUID
/// - **Other**: Returns default features (scalar only)
pub fn detect_cpu_features() -> CpuFeatures {
    *CPU_FEATURES.get_or_init(|| {
        let features = detect_cpu_features_impl();
        log::debug!("detected CPU features: {features}");
        features
    })
}

#[cfg(target_arch = "x86_64")]
fn detect_cpu_features_impl() -> CpuFeatures {
    use raw_cpuid::CpuId;

    let cpuid = CpuId::new();
    let mut features = CpuFeatures::default();

    if let Some(feature_info) = cpuid.get_feature_info() {
        features.has_sse2 = feature_info.has_sse2();
        features.has_sse4_1 = feature_info.has_sse41();
        features.has_avx = feature_info.has_avx();
        features.has_fma = feature_info.has_fma();
    }

    if let Some(extended_features) = cpuid.get_extended_feature_info() {
        features.has_avx2 = extended_features.has_avx2();
    }

    // CPUID reports hardware support; the OS must also save YMM state.
    features.has_avx2 = features.has_avx2 && is_x86_feature_detected!("avx2");

    features
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_cpu_features_impl() -> CpuFeatures {
    CpuFeatures::default()
}

/// Check if the current CPU supports AVX2
pub fn has_avx2() -> bool {
    detect_cpu_features().has_avx2
}
