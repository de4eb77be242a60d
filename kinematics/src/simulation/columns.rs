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
//! Raw-buffer column storage shared by the pointer-based strategies

use crate::body::{Body, Bounds, Color};
use crate::buffer::{round_up_to_block, BufferError, RawBuffer};
use crate::error::SimulationError;
use crate::kernel::MotionSlices;
use crate::random::BodyGenerator;
use bytemuck::Zeroable;

fn empty<T: Zeroable + Copy>(strategy: &'static str, align: usize) -> Result<RawBuffer<T>, SimulationError> {
    RawBuffer::zeroed(0, align).map_err(|source| SimulationError::Buffer { strategy, source })
}

/// Five independently owned buffers, one per field
///
/// Capacity is tracked separately from the active count. Capacity is always
/// a multiple of `block`; a grow past it reallocates all five buffers to
/// the smallest such multiple that fits.
#[derive(Debug)]
pub(crate) struct RawColumns {
    x: RawBuffer<f32>,
    y: RawBuffer<f32>,
    horizontal_speed: RawBuffer<f32>,
    vertical_speed: RawBuffer<f32>,
    color: RawBuffer<Color>,
    count: usize,
    align: usize,
    block: usize,
    strategy: &'static str,
}

impl RawColumns {
    /// Allocate columns holding exactly `bodies`
    pub fn with_bodies(
        strategy: &'static str,
        align: usize,
        block: usize,
        bodies: &[Body],
    ) -> Result<Self, SimulationError> {
        let mut columns = RawColumns {
            x: empty(strategy, align)?,
            y: empty(strategy, align)?,
            horizontal_speed: empty(strategy, align)?,
            vertical_speed: empty(strategy, align)?,
            color: empty(strategy, align)?,
            count: 0,
            align,
            block,
            strategy,
        };
        columns.reallocate(columns.rounded(bodies.len())?)?;
        for (index, body) in bodies.iter().enumerate() {
            columns.write(index, *body);
        }
        columns.count = bodies.len();
        Ok(columns)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    pub fn align(&self) -> usize {
        self.x.align()
    }

    /// Resize to `count` active bodies, generating any new ones
    ///
    /// Shrinking only lowers the count; values past it stay in place.
    pub fn set_count(
        &mut self,
        count: usize,
        generator: &mut BodyGenerator,
        bounds: Bounds,
    ) -> Result<(), SimulationError> {
        if count <= self.count {
            log::trace!("{}: active count {} -> {count}", self.strategy, self.count);
            self.count = count;
            return Ok(());
        }

        if count > self.capacity() {
            self.reallocate(self.rounded(count)?)?;
        }
        for index in self.count..count {
            self.write(index, generator.generate(bounds));
        }
        self.count = count;
        Ok(())
    }

    /// Mutable views of the first `len` lanes of each motion column
    ///
    /// `len` may exceed the active count up to capacity.
    pub fn motion(&mut self, len: usize) -> MotionSlices<'_> {
        MotionSlices::new(
            &mut self.x[..len],
            &mut self.y[..len],
            &mut self.horizontal_speed[..len],
            &mut self.vertical_speed[..len],
        )
    }

    pub fn body(&self, index: usize) -> Body {
        Body::new(
            self.x[index],
            self.y[index],
            self.horizontal_speed[index],
            self.vertical_speed[index],
            self.color[index],
        )
    }

    pub fn bodies(&self) -> Vec<Body> {
        (0..self.count).map(|index| self.body(index)).collect()
    }

    pub fn draw_items(&self) -> impl Iterator<Item = (f32, f32, Color)> + '_ {
        (0..self.count).map(|index| (self.x[index], self.y[index], self.color[index]))
    }

    fn write(&mut self, index: usize, body: Body) {
        self.x[index] = body.x;
        self.y[index] = body.y;
        self.horizontal_speed[index] = body.horizontal_speed;
        self.vertical_speed[index] = body.vertical_speed;
        self.color[index] = body.color;
    }

    fn rounded(&self, count: usize) -> Result<usize, SimulationError> {
        round_up_to_block(count, self.block).ok_or(SimulationError::Buffer {
            strategy: self.strategy,
            source: BufferError::LayoutOverflow {
                len: count,
                align: self.align,
            },
        })
    }

    /// Move the active prefix into five new buffers of `capacity` lanes
    ///
    /// All five are allocated before any is replaced, so on error the
    /// columns are untouched.
    fn reallocate(&mut self, capacity: usize) -> Result<(), SimulationError> {
        let strategy = self.strategy;
        let wrap = move |source: BufferError| SimulationError::Buffer { strategy, source };
        let (count, align) = (self.count, self.align);

        let x = RawBuffer::with_prefix(capacity, align, &self.x[..count]).map_err(wrap)?;
        let y = RawBuffer::with_prefix(capacity, align, &self.y[..count]).map_err(wrap)?;
        let horizontal_speed =
            RawBuffer::with_prefix(capacity, align, &self.horizontal_speed[..count]).map_err(wrap)?;
        let vertical_speed =
            RawBuffer::with_prefix(capacity, align, &self.vertical_speed[..count]).map_err(wrap)?;
        let color = RawBuffer::with_prefix(capacity, align, &self.color[..count]).map_err(wrap)?;

        log::debug!("{strategy}: reallocated {} -> {capacity} bodies", self.capacity());

        // Old buffers are released as they are replaced.
        self.x = x;
        self.y = y;
        self.horizontal_speed = horizontal_speed;
        self.vertical_speed = vertical_speed;
        self.color = color;
        Ok(())
    }
}
