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
//! Array-of-structures strategy

use super::{FromBodies, Simulation};
use crate::body::{Body, Bounds};
use crate::error::SimulationError;
use crate::kernel::update_body;
use crate::random::BodyGenerator;
use crate::render::{draw_all, Renderer};

const NAME: &str = "vec-of-struct";

/// One growable sequence of whole [`Body`] records
///
/// Shrinking truncates the sequence, so bodies past the new count are gone.
#[derive(Debug)]
pub struct VecOfStructSim {
    bodies: Vec<Body>,
    bounds: Bounds,
    generator: BodyGenerator,
}

impl VecOfStructSim {
    /// Active bodies, in index order
    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }
}

impl FromBodies for VecOfStructSim {
    fn try_from_bodies(
        bounds: Bounds,
        bodies: &[Body],
        generator: BodyGenerator,
    ) -> Result<Self, SimulationError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(bodies.len())
            .map_err(|source| SimulationError::Reserve {
                strategy: NAME,
                requested: bodies.len(),
                source,
            })?;
        storage.extend_from_slice(bodies);
        Ok(VecOfStructSim {
            bodies: storage,
            bounds,
            generator,
        })
    }
}

impl Simulation for VecOfStructSim {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, dt: f32) {
        let bounds = self.bounds;
        for body in &mut self.bodies {
            update_body(body, bounds, dt);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        draw_all(renderer, self.bodies.iter().map(|body| (body.x, body.y, body.color)));
    }

    fn try_set_body_count(&mut self, count: usize) -> Result<(), SimulationError> {
        let current = self.bodies.len();
        if count <= current {
            self.bodies.truncate(count);
            log::trace!("{NAME}: truncated {current} -> {count} bodies");
            return Ok(());
        }

        let old_capacity = self.bodies.capacity();
        self.bodies
            .try_reserve_exact(count - current)
            .map_err(|source| SimulationError::Reserve {
                strategy: NAME,
                requested: count,
                source,
            })?;
        if self.bodies.capacity() != old_capacity {
            log::debug!("{NAME}: capacity {old_capacity} -> {}", self.bodies.capacity());
        }

        let bounds = self.bounds;
        let generator = &mut self.generator;
        self.bodies
            .extend((current..count).map(|_| generator.generate(bounds)));
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn capacity(&self) -> usize {
        self.bodies.capacity()
    }

    fn bodies(&self) -> Vec<Body> {
        self.bodies.clone()
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
    use crate::body::Color;
    use crate::render::RecordingRenderer;

    fn area() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_new_generates_bodies_in_bounds() {
        let sim = VecOfStructSim::new(area(), 50, BodyGenerator::seeded(1));
        assert_eq!(sim.body_count(), 50);
        assert!(sim.capacity() >= 50);
        assert!(sim.bodies().iter().all(|body| body.is_within(area())));
    }

    #[test]
    fn test_from_bodies_keeps_order() {
        let fixture = vec![
            Body::new(20.0, 30.0, 1.0, 2.0, Color::opaque(1, 1, 1)),
            Body::new(40.0, 50.0, 3.0, 4.0, Color::opaque(2, 2, 2)),
        ];
        let sim = VecOfStructSim::try_from_bodies(area(), &fixture, BodyGenerator::default()).unwrap();
        assert_eq!(sim.as_slice(), fixture.as_slice());
    }

    #[test]
    fn test_shrink_truncates_then_regrow_generates() {
        let mut sim = VecOfStructSim::new(area(), 10, BodyGenerator::seeded(3));
        let before = sim.bodies();

        sim.set_body_count(4);
        assert_eq!(sim.bodies(), before[..4].to_vec());

        sim.set_body_count(10);
        assert_eq!(sim.bodies()[..4], before[..4]);
        // Fresh draws continue the generator stream, so the regrown tail differs.
        assert_ne!(sim.bodies()[4..], before[4..]);
    }

    #[test]
    fn test_update_moves_bodies() {
        let body = Body::new(100.0, 100.0, 10.0, -10.0, Color::default());
        let mut sim = VecOfStructSim::try_from_bodies(area(), &[body], BodyGenerator::default()).unwrap();
        sim.update(1.0);
        assert_eq!(sim.bodies()[0].x, 110.0);
        assert_eq!(sim.bodies()[0].y, 90.0);
    }

    #[test]
    fn test_draw_visits_every_body() {
        let sim = VecOfStructSim::new(area(), 7, BodyGenerator::seeded(5));
        let mut renderer = RecordingRenderer::new();
        sim.draw(&mut renderer);
        assert_eq!(renderer.drawn.len(), 7);
        for (drawn, body) in renderer.drawn.iter().zip(sim.bodies()) {
            assert_eq!((drawn.x, drawn.y, drawn.color), (body.x, body.y, body.color));
        }
    }
}
