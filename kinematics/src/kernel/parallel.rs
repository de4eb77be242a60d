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
//! Multi-threaded kernel
//!
//! The body range is split into disjoint contiguous chunks, one task per
//! chunk. Each task owns its chunk of all four columns exclusively, so no
//! synchronisation is needed beyond the join at the end of `update`.

use super::{update_slices, MotionSlices, UpdateKernel};
use crate::body::Bounds;

#[cfg(feature = "parallel")]
use crate::error::SimulationError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use rayon::ThreadPool;
#[cfg(feature = "parallel")]
use std::sync::Arc;

/// Smallest chunk handed to a worker when sizing automatically
pub const MIN_PARALLEL_CHUNK: usize = 1024;

/// Kernel that spreads the update across worker threads
///
/// Uses rayon's global pool unless built with [`ParallelKernel::with_threads`].
/// Without the `parallel` feature it runs sequentially with identical results.
#[derive(Clone, Default)]
pub struct ParallelKernel {
    #[cfg(feature = "parallel")]
    pool: Option<Arc<ThreadPool>>,
    chunk_size: usize,
}

impl ParallelKernel {
    /// Create a kernel on the global pool with automatic chunk sizing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a kernel on a dedicated pool of `threads` workers
    #[cfg(feature = "parallel")]
    pub fn with_threads(threads: usize) -> Result<Self, SimulationError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("kinematics-worker-{index}"))
            .build()?;
        log::debug!("built worker pool with {} threads", pool.current_num_threads());
        Ok(ParallelKernel {
            pool: Some(Arc::new(pool)),
            chunk_size: 0,
        })
    }

    /// Use a fixed chunk size instead of sizing from the thread count
    ///
    /// A size of zero restores automatic sizing.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Number of worker threads updates run on
    ///
    /// Returns 1 if the parallel feature is disabled.
    pub fn thread_count(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool
                .as_ref()
                .map(|pool| pool.current_num_threads())
                .unwrap_or_else(rayon::current_num_threads)
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn chunk_size_for(&self, count: usize) -> usize {
        if self.chunk_size > 0 {
            self.chunk_size
        } else {
            count
                .div_ceil(self.thread_count().max(1))
                .max(MIN_PARALLEL_CHUNK)
        }
    }

    #[cfg(feature = "parallel")]
    fn update_chunks(motion: MotionSlices<'_>, bounds: Bounds, dt: f32, chunk_size: usize) {
        let MotionSlices {
            x,
            y,
            horizontal_speed,
            vertical_speed,
        } = motion;

        x.par_chunks_mut(chunk_size)
            .zip(y.par_chunks_mut(chunk_size))
            .zip(horizontal_speed.par_chunks_mut(chunk_size))
            .zip(vertical_speed.par_chunks_mut(chunk_size))
            .for_each(|(((x, y), horizontal_speed), vertical_speed)| {
                update_slices(
                    MotionSlices {
                        x,
                        y,
                        horizontal_speed,
                        vertical_speed,
                    },
                    bounds,
                    dt,
                );
            });
    }
}

impl std::fmt::Debug for ParallelKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelKernel")
            .field("threads", &self.thread_count())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl UpdateKernel for ParallelKernel {
    const STRATEGY: &'static str = "parallel";

    fn name(&self) -> &'static str {
        "parallel"
    }

    #[cfg(feature = "parallel")]
    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
        let chunk_size = self.chunk_size_for(motion.len());
        if motion.len() <= chunk_size {
            update_slices(motion, bounds, dt);
            return;
        }

        match &self.pool {
            Some(pool) => pool.install(|| Self::update_chunks(motion, bounds, dt, chunk_size)),
            None => Self::update_chunks(motion, bounds, dt, chunk_size),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
        update_slices(motion, bounds, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ScalarKernel;

    fn columns(count: usize) -> [Vec<f32>; 4] {
        let x = (0..count).map(|i| (i % 790) as f32 + 5.0).collect();
        let y = (0..count).map(|i| (i % 590) as f32 + 5.0).collect();
        let hs = (0..count).map(|i| if i % 2 == 0 { 120.0 } else { -120.0 }).collect();
        let vs = (0..count).map(|i| if i % 3 == 0 { -60.0 } else { 60.0 }).collect();
        [x, y, hs, vs]
    }

    fn run<K: UpdateKernel>(kernel: &K, cols: &mut [Vec<f32>; 4], frames: usize) {
        let bounds = Bounds::new(800.0, 600.0);
        for _ in 0..frames {
            let [x, y, hs, vs] = &mut *cols;
            kernel.update(MotionSlices::new(x, y, hs, vs), bounds, 0.016);
        }
    }

    #[test]
    fn test_matches_scalar() {
        let mut parallel = columns(10_000);
        let mut scalar = parallel.clone();

        run(&ParallelKernel::new().with_chunk_size(333), &mut parallel, 50);
        run(&ScalarKernel, &mut scalar, 50);

        assert_eq!(parallel, scalar);
    }

    #[test]
    fn test_small_input_runs_inline() {
        let mut parallel = columns(3);
        let mut scalar = parallel.clone();

        run(&ParallelKernel::new(), &mut parallel, 10);
        run(&ScalarKernel, &mut scalar, 10);

        assert_eq!(parallel, scalar);
    }

    #[test]
    fn test_automatic_chunk_size() {
        let kernel = ParallelKernel::new();
        assert_eq!(kernel.chunk_size_for(0), MIN_PARALLEL_CHUNK);
        assert!(kernel.chunk_size_for(1_000_000) >= MIN_PARALLEL_CHUNK);
        assert_eq!(kernel.clone().with_chunk_size(7).chunk_size_for(1_000_000), 7);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn test_dedicated_pool() {
        let kernel = ParallelKernel::with_threads(2).unwrap().with_chunk_size(100);
        assert_eq!(kernel.thread_count(), 2);

        let mut parallel = columns(1_000);
        let mut scalar = parallel.clone();
        run(&kernel, &mut parallel, 20);
        run(&ScalarKernel, &mut scalar, 20);
        assert_eq!(parallel, scalar);
    }
}
