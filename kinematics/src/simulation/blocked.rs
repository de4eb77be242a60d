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
//! Hybrid blocked strategy (array of structures of arrays)
//!
//! Bodies are grouped into blocks of [`BLOCK_LANES`]. Each block holds one
//! short array per field and is itself cache-line aligned, so a block's
//! positions and speeds sit in a few adjacent cache lines while the update
//! of a block is a fixed-length loop the compiler can vectorize.

use super::{FromBodies, Simulation};
use crate::body::{Body, Bounds, Color};
use crate::error::SimulationError;
use crate::kernel::step_axis;
use crate::random::BodyGenerator;
use crate::render::{draw_all, Renderer};
use bytemuck::Zeroable;

const NAME: &str = "blocked";

/// Bodies per block
pub const BLOCK_LANES: usize = 16;

/// Sixteen bodies laid out field by field
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq, Zeroable)]
pub struct BodyBlock {
    /// Horizontal positions
    pub x: [f32; BLOCK_LANES],
    /// Vertical positions
    pub y: [f32; BLOCK_LANES],
    /// Horizontal speeds
    pub horizontal_speed: [f32; BLOCK_LANES],
    /// Vertical speeds
    pub vertical_speed: [f32; BLOCK_LANES],
    /// Colours
    pub color: [Color; BLOCK_LANES],
}

impl BodyBlock {
    /// Read lane `lane`
    pub fn get(&self, lane: usize) -> Body {
        Body::new(
            self.x[lane],
            self.y[lane],
            self.horizontal_speed[lane],
            self.vertical_speed[lane],
            self.color[lane],
        )
    }

    /// Overwrite lane `lane`
    pub fn set(&mut self, lane: usize, body: Body) {
        self.x[lane] = body.x;
        self.y[lane] = body.y;
        self.horizontal_speed[lane] = body.horizontal_speed;
        self.vertical_speed[lane] = body.vertical_speed;
        self.color[lane] = body.color;
    }

    /// Advance all lanes by `dt`
    #[inline]
    pub fn update(&mut self, bounds: Bounds, dt: f32) {
        for lane in 0..BLOCK_LANES {
            step_axis(&mut self.x[lane], &mut self.horizontal_speed[lane], bounds.width, dt);
        }
        for lane in 0..BLOCK_LANES {
            step_axis(&mut self.y[lane], &mut self.vertical_speed[lane], bounds.height, dt);
        }
    }
}

/// Growable sequence of [`BodyBlock`]s
///
/// Shrinking only lowers the active count; blocks are kept. The update
/// covers every lane of every block holding at least one active body.
#[derive(Debug)]
pub struct BlockedSim {
    blocks: Vec<BodyBlock>,
    count: usize,
    bounds: Bounds,
    generator: BodyGenerator,
}

impl BlockedSim {
    /// Number of blocks holding at least one active body
    pub fn active_blocks(&self) -> usize {
        self.count.div_ceil(BLOCK_LANES)
    }

    fn get(&self, index: usize) -> Body {
        self.blocks[index / BLOCK_LANES].get(index % BLOCK_LANES)
    }

    fn set(&mut self, index: usize, body: Body) {
        self.blocks[index / BLOCK_LANES].set(index % BLOCK_LANES, body);
    }

    /// Make sure blocks exist for `count` bodies
    fn ensure_blocks(&mut self, count: usize) -> Result<(), SimulationError> {
        let needed = count.div_ceil(BLOCK_LANES);
        if needed <= self.blocks.len() {
            return Ok(());
        }

        let old_capacity = self.capacity();
        self.blocks
            .try_reserve_exact(needed - self.blocks.len())
            .map_err(|source| SimulationError::Reserve {
                strategy: NAME,
                requested: count,
                source,
            })?;
        self.blocks.resize(needed, BodyBlock::zeroed());
        log::debug!("{NAME}: capacity {old_capacity} -> {}", self.capacity());
        Ok(())
    }
}

impl FromBodies for BlockedSim {
    fn try_from_bodies(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError> {
        let mut simulation = BlockedSim {
            blocks: Vec::new(),
            count: 0,
            bounds,
            generator,
        };
        simulation.ensure_blocks(bodies.len())?;
        for (index, body) in bodies.iter().enumerate() {
            simulation.set(index, *body);
        }
        simulation.count = bodies.len();
        Ok(simulation)
    }
}

impl Simulation for BlockedSim {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, dt: f32) {
        let active = self.active_blocks();
        let bounds = self.bounds;
        for block in &mut self.blocks[..active] {
            block.update(bounds, dt);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        draw_all(
            renderer,
            (0..self.count).map(|index| {
                let body = self.get(index);
                (body.x, body.y, body.color)
            }),
        );
    }

    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
        if count <= self.count {
            log::trace!("{NAME}: active count {} -> {count}", self.count);
            self.count = count;
            return Ok(());
        }

        self.ensure_blocks(count)?;
        for index in self.count..count {
            let body = self.generator.generate(self.bounds);
            self.set(index, body);
        }
        self.count = count;
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        self.blocks.len() * BLOCK_LANES
    }

    fn bodies(&self) -> Vec<Body> {
        (0..self.count).map(|index| self.get(index)).collect()
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::VecOfStructSim;

    fn area() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_block_layout() {
        assert_eq!(std::mem::align_of::<BodyBlock>(), 64);
        assert_eq!(std::mem::size_of::<BodyBlock>() % 64, 0);
    }

    #[test]
    fn test_capacity_in_whole_blocks() {
        let mut sim = BlockedSim::new(area(), 17, BodyGenerator::seeded(1));
        assert_eq!(sim.capacity(), 32);
        assert_eq!(sim.active_blocks(), 2);

        sim.set_body_count(3);
        assert_eq!(sim.capacity(), 32);
        assert_eq!(sim.active_blocks(), 1);
    }

    #[test]
    fn test_matches_array_of_structures() {
        let mut reference = VecOfStructSim::new(area(), 45, BodyGenerator::seeded(6));
        let mut blocked = BlockedSim::new(area(), 45, BodyGenerator::seeded(6));

        for frame in 0..300 {
            if frame == 100 {
                reference.set_body_count(20);
                blocked.set_body_count(20);
            }
            if frame == 200 {
                reference.set_body_count(50);
                blocked.set_body_count(50);
            }
            reference.update(0.016);
            blocked.update(0.016);
        }

        assert_eq!(blocked.bodies(), reference.bodies());
    }

    #[test]
    fn test_blocks_are_aligned_in_memory() {
        let sim = BlockedSim::new(area(), 100, BodyGenerator::seeded(1));
        assert_eq!(sim.blocks.as_ptr() as usize % 64, 0);
    }
}
