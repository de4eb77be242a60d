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
//! Struct-of-arrays strategies over individually owned raw buffers
//!
//! All three strategies keep five [`RawBuffer`](crate::buffer::RawBuffer)
//! columns with capacity tracked apart from the active count. They differ
//! in the alignment requested for each column and in how far the update
//! loop runs:
//!
//! - [`StructOfPointerSim`]: natural alignment, capacity grows to exactly
//!   the requested count
//! - [`StructOfAlignedSim`]: every column starts on a cache line, and the
//!   update loop is told so
//! - [`StructOfOversizedSim`]: as aligned, with lengths padded to whole
//!   blocks of [`OVERSIZE_BLOCK`] so the loop never needs a remainder

use super::columns::RawColumns;
use super::{FromBodies, Simulation};
use crate::body::{Body, Bounds};
use crate::buffer::{round_up_to_block, CACHE_LINE};
use crate::error::SimulationError;
use crate::kernel::{update_slices, MotionSlices};
use crate::random::BodyGenerator;
use crate::render::{draw_all, Renderer};

/// Block size the oversized strategy pads its columns to
pub const OVERSIZE_BLOCK: usize = 16;

/// Tell the optimizer that every motion column starts on a cache line
///
/// # Safety
///
/// Every column in `motion` must start at a multiple of [`CACHE_LINE`].
#[inline(always)]
unsafe fn assume_cache_aligned(motion: &MotionSlices<'_>) {
    for column in [
        motion.x.as_ptr(),
        motion.y.as_ptr(),
        motion.horizontal_speed.as_ptr(),
        motion.vertical_speed.as_ptr(),
    ] {
        debug_assert!(column as usize % CACHE_LINE == 0, "column not cache-line aligned");
        std::hint::assert_unchecked(column as usize % CACHE_LINE == 0);
    }
}

macro_rules! raw_column_strategy {
    ($ty:ident, $name:literal, $align:expr, $block:expr) => {
        impl FromBodies for $ty {
            fn try_from_bodies(
                bounds: Bounds,
                bodies: &[Body],
                generator: BodyGenerator,
            ) -> Result<Self, SimulationError> {
                let columns = RawColumns::with_bodies($name, $align, $block, bodies)?;
                let mut simulation = $ty::from_parts(columns, bounds, generator);
                simulation.after_resize();
                Ok(simulation)
            }
        }

        impl Simulation for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn update(&mut self, dt: f32) {
                self.advance(dt);
            }

            fn draw(&self, renderer: &mut dyn Renderer) {
                draw_all(renderer, self.columns.draw_items());
            }

            fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
                self.columns
                    .set_count(count, &mut self.generator, self.bounds)?;
                self.after_resize();
                Ok(())
            }

            fn body_count(&self) -> usize {
                self.columns.count()
            }

            fn capacity(&self) -> usize {
                self.columns.capacity()
            }

            fn bodies(&self) -> Vec<Body> {
                self.columns.bodies()
            }

            fn bounds(&self) -> Bounds {
                self.bounds
            }

            fn set_bounds(&mut self, width: f32, height: f32) {
                self.bounds = Bounds::new(width, height);
            }
        }
    };
}

/// Five raw buffers at natural alignment
#[derive(Debug)]
pub struct StructOfPointerSim {
    columns: RawColumns,
    bounds: Bounds,
    generator: BodyGenerator,
}

impl StructOfPointerSim {
    fn from_parts(columns: RawColumns, bounds: Bounds, generator: BodyGenerator) -> Self {
        StructOfPointerSim {
            columns,
            bounds,
            generator,
        }
    }

    fn after_resize(&mut self) {}

    fn advance(&mut self, dt: f32) {
        let count = self.columns.count();
        update_slices(self.columns.motion(count), self.bounds, dt);
    }
}

raw_column_strategy!(StructOfPointerSim, "pointer", 1, 1);

/// Five raw buffers, each starting on a cache line
#[derive(Debug)]
pub struct StructOfAlignedSim {
    columns: RawColumns,
    bounds: Bounds,
    generator: BodyGenerator,
}

impl StructOfAlignedSim {
    /// Alignment of every column, in bytes
    pub fn alignment(&self) -> usize {
        self.columns.align()
    }

    fn from_parts(columns: RawColumns, bounds: Bounds, generator: BodyGenerator) -> Self {
        StructOfAlignedSim {
            columns,
            bounds,
            generator,
        }
    }

    fn after_resize(&mut self) {}

    fn advance(&mut self, dt: f32) {
        let count = self.columns.count();
        let bounds = self.bounds;
        let motion = self.columns.motion(count);
        // SAFETY: columns are RawBuffers allocated at CACHE_LINE alignment,
        // and empty columns use an aligned dangling pointer.
        unsafe { assume_cache_aligned(&motion) };
        update_slices(motion, bounds, dt);
    }
}

raw_column_strategy!(StructOfAlignedSim, "aligned", CACHE_LINE, 1);

/// Cache-line-aligned raw buffers padded to whole blocks
///
/// The update loop runs over [`update_boundary`](Self::update_boundary)
/// lanes: the active count rounded up to a multiple of [`OVERSIZE_BLOCK`].
/// Lanes between the active count and the boundary are updated too and
/// never read back.
#[derive(Debug)]
pub struct StructOfOversizedSim {
    columns: RawColumns,
    bounds: Bounds,
    generator: BodyGenerator,
    update_boundary: usize,
}

impl StructOfOversizedSim {
    /// Number of lanes each update covers, always a multiple of [`OVERSIZE_BLOCK`]
    pub fn update_boundary(&self) -> usize {
        self.update_boundary
    }

    fn from_parts(columns: RawColumns, bounds: Bounds, generator: BodyGenerator) -> Self {
        StructOfOversizedSim {
            columns,
            bounds,
            generator,
            update_boundary: 0,
        }
    }

    fn after_resize(&mut self) {
        // Capacity is itself a multiple of the block, so this cannot overflow
        // or pass the end of the columns.
        self.update_boundary = round_up_to_block(self.columns.count(), OVERSIZE_BLOCK)
            .unwrap_or_else(|| self.columns.capacity());
        debug_assert!(self.update_boundary <= self.columns.capacity());
    }

    fn advance(&mut self, dt: f32) {
        let len = self.update_boundary;
        let bounds = self.bounds;
        // SAFETY: update_boundary is only ever set by after_resize, which
        // rounds to a multiple of OVERSIZE_BLOCK.
        unsafe { std::hint::assert_unchecked(len % OVERSIZE_BLOCK == 0) };
        let motion = self.columns.motion(len);
        // SAFETY: as for StructOfAlignedSim.
        unsafe { assume_cache_aligned(&motion) };
        update_slices(motion, bounds, dt);
    }
}

raw_column_strategy!(StructOfOversizedSim, "oversized", CACHE_LINE, OVERSIZE_BLOCK);
