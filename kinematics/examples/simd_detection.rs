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
//! SIMD detection example
//!
//! Demonstrates how to detect the active SIMD backend at runtime and which
//! kernel the `simd` strategy will use.
//!
//! # Usage
//!
//! ```bash
//! # Build without SIMD (the simd strategy uses portable scalar code)
//! cargo run --no-default-features --example simd_detection
//!
//! # Build with SIMD support (will use AVX2 if available)
//! cargo run --example simd_detection
//! ```

use kinematics::kernel::SimdKernel;
#[cfg(feature = "simd")]
use kinematics::simd::{detect_cpu_features, select_backend};

fn main() {
    env_logger::init();

    println!("=== SIMD Detection Example ===\n");

    #[cfg(feature = "simd")]
    {
        let features = detect_cpu_features();
        println!("CPU Features Detected: {features}");
        println!("  SSE2:   {}", features.has_sse2);
        println!("  AVX:    {}", features.has_avx);
        println!("  AVX2:   {}", features.has_avx2);
        println!("  FMA:    {} (never used; results must match scalar)", features.has_fma);
        println!();

        let backend = select_backend();
        println!("Active SIMD Backend: {} ({} lanes)", backend.name(), backend.width());
        match backend.name() {
            "AVX2" => println!("   - Updating 8 bodies per instruction on each axis"),
            "Scalar" => println!("   - No vectorization available on this CPU"),
            other => println!("Unknown backend: {other}"),
        }
    }

    #[cfg(not(feature = "simd"))]
    {
        println!("SIMD feature not enabled at compile time");
        println!("Build with the default features to enable runtime dispatch.");
    }

    let kernel = SimdKernel::new();
    println!();
    println!("simd strategy kernel: {kernel:?}");
}
