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
//! Randomness source and body generation
//!
//! The simulation never reads global random state. Every strategy owns a
//! [`BodyGenerator`], which in turn owns an injected [`UniformSource`]. The
//! only contract with the source is "uniform over an inclusive integer
//! range", so tests can substitute a deterministic source.

use crate::body::{Body, Bounds, Color, BODY_RADIUS, MAX_SPEED_DRAW, MIN_SPEED_DRAW, SPEED_MODIFIER};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::fmt;

/// Uniform integer draws over an inclusive range
pub trait UniformSource: Send {
    /// Draw an integer uniformly from `low..=high`
    ///
    /// Callers guarantee `low <= high`.
    fn uniform(&mut self, low: i32, high: i32) -> i32;
}

/// Adapter that turns any [`rand::Rng`] into a [`UniformSource`]
#[derive(Debug, Clone)]
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng + Send> RandSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        RandSource { rng }
    }
}

impl<R: Rng + Send> UniformSource for RandSource<R> {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        self.rng.random_range(low..=high)
    }
}

/// Produces randomized bodies inside the current bounds
///
/// Each body consumes exactly seven draws in a fixed order: x, y, horizontal
/// speed, vertical speed, red, green, blue. Two generators seeded alike
/// therefore yield identical bodies regardless of which strategy stores them.
pub struct BodyGenerator {
    source: Box<dyn UniformSource>,
}

impl BodyGenerator {
    /// Create a generator drawing from `source`
    pub fn new(source: impl UniformSource + 'static) -> Self {
        BodyGenerator {
            source: Box::new(source),
        }
    }

    /// Create a generator backed by a PCG32 stream seeded with `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandSource::new(Pcg32::seed_from_u64(seed)))
    }

    /// Generate one body inside `bounds`
    pub fn generate(&mut self, bounds: Bounds) -> Body {
        let x = self.position(bounds.width);
        let y = self.position(bounds.height);

        let horizontal_speed = self.speed();
        let vertical_speed = self.speed();

        // Alpha is never randomized; a transparent body is not a useful state
        let color = Color::opaque(self.channel(), self.channel(), self.channel());

        Body::new(x, y, horizontal_speed, vertical_speed, color)
    }

    fn position(&mut self, extent: f32) -> f32 {
        let low = BODY_RADIUS as i32;
        // Degenerate extents collapse onto the radius instead of an empty range
        let high = ((extent - BODY_RADIUS) as i32).max(low);
        self.source.uniform(low, high) as f32
    }

    fn speed(&mut self) -> f32 {
        self.source.uniform(MIN_SPEED_DRAW, MAX_SPEED_DRAW) as f32 * SPEED_MODIFIER
    }

    fn channel(&mut self) -> u8 {
        self.source.uniform(0, 255) as u8
    }
}

impl Default for BodyGenerator {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl fmt::Debug for BodyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::MAX_SPEED;

    /// Always answers with one end of the requested range
    struct EdgeSource {
        high: bool,
    }

    impl UniformSource for EdgeSource {
        fn uniform(&mut self, low: i32, high: i32) -> i32 {
            if self.high {
                high
            } else {
                low
            }
        }
    }

    #[test]
    fn test_generated_bodies_in_range() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut generator = BodyGenerator::seeded(7);

        for _ in 0..1000 {
            let body = generator.generate(bounds);
            assert!(body.is_within(bounds), "{:?} escaped {:?}", body, bounds);
            assert!(body.horizontal_speed.abs() <= MAX_SPEED);
            assert!(body.vertical_speed.abs() <= MAX_SPEED);
            assert!(body.color.is_opaque());
        }
    }

    #[test]
    fn test_range_edges() {
        let bounds = Bounds::new(800.0, 600.0);

        let low = BodyGenerator::new(EdgeSource { high: false }).generate(bounds);
        assert_eq!(low.x, BODY_RADIUS);
        assert_eq!(low.y, BODY_RADIUS);
        assert_eq!(low.horizontal_speed, -100.0 * SPEED_MODIFIER);
        assert_eq!(low.color, Color::opaque(0, 0, 0));

        let high = BodyGenerator::new(EdgeSource { high: true }).generate(bounds);
        assert_eq!(high.x, 790.0);
        assert_eq!(high.y, 590.0);
        assert_eq!(high.vertical_speed, 100.0 * SPEED_MODIFIER);
        assert_eq!(high.color, Color::opaque(255, 255, 255));
    }

    #[test]
    fn test_same_seed_same_bodies() {
        let bounds = Bounds::default();
        let mut a = BodyGenerator::seeded(42);
        let mut b = BodyGenerator::seeded(42);

        for _ in 0..100 {
            assert_eq!(a.generate(bounds), b.generate(bounds));
        }
    }

    #[test]
    fn test_degenerate_bounds_do_not_panic() {
        let mut generator = BodyGenerator::seeded(1);
        let body = generator.generate(Bounds::new(5.0, 5.0));
        assert_eq!(body.x, BODY_RADIUS);
        assert_eq!(body.y, BODY_RADIUS);
    }
}
