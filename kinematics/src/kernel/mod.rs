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
//! The bounce update rule and the kernels that apply it
//!
//! Every strategy advances bodies with the same rule. On each axis, the
//! position advances by `speed * dt`; then, if the body overlaps an edge
//! while moving toward it, its speed on that axis is negated. Bodies never
//! interact, so the rule can be applied per axis, per body, in any order.
//!
//! Kernels differ only in how they walk the columns of a struct-of-arrays
//! layout: sequentially ([`ScalarKernel`]), in vector lanes
//! ([`SimdKernel`]) or across worker threads ([`ParallelKernel`]).

mod parallel;
mod simd;

pub use parallel::ParallelKernel;
pub use simd::SimdKernel;

use crate::body::{Body, Bounds, BODY_RADIUS};

/// Check whether a body should bounce on one axis
///
/// True when the body overlaps the low edge while moving toward it, or
/// overlaps the `limit` edge while moving toward it. A body overlapping an
/// edge while already moving away is left alone, so a bounce never flips
/// twice.
#[inline]
pub fn bounce_check(position: f32, speed: f32, limit: f32) -> bool {
    (position - BODY_RADIUS < 0.0 && speed < 0.0)
        || (position + BODY_RADIUS > limit && speed > 0.0)
}

/// Advance one axis of one body by `dt`
#[inline]
pub fn step_axis(position: &mut f32, speed: &mut f32, limit: f32, dt: f32) {
    *position += *speed * dt;
    if bounce_check(*position, *speed, limit) {
        *speed = -*speed;
    }
}

/// Advance one body by `dt`
#[inline]
pub fn update_body(body: &mut Body, bounds: Bounds, dt: f32) {
    step_axis(&mut body.x, &mut body.horizontal_speed, bounds.width, dt);
    step_axis(&mut body.y, &mut body.vertical_speed, bounds.height, dt);
}

/// Mutable views of the four motion columns of a struct-of-arrays layout
///
/// All four slices have the same length. Colours are not part of the
/// update and are never borrowed here.
#[derive(Debug)]
pub struct MotionSlices<'a> {
    /// Horizontal positions
    pub x: &'a mut [f32],
    /// Vertical positions
    pub y: &'a mut [f32],
    /// Horizontal speeds
    pub horizontal_speed: &'a mut [f32],
    /// Vertical speeds
    pub vertical_speed: &'a mut [f32],
}

impl<'a> MotionSlices<'a> {
    /// Bundle four columns
    ///
    /// # Panics
    ///
    /// Panics if the columns differ in length.
    pub fn new(
        x: &'a mut [f32],
        y: &'a mut [f32],
        horizontal_speed: &'a mut [f32],
        vertical_speed: &'a mut [f32],
    ) -> Self {
        let len = x.len();
        assert!(
            y.len() == len && horizontal_speed.len() == len && vertical_speed.len() == len,
            "motion columns differ in length: x={}, y={}, hs={}, vs={}",
            len,
            y.len(),
            horizontal_speed.len(),
            vertical_speed.len()
        );
        MotionSlices {
            x,
            y,
            horizontal_speed,
            vertical_speed,
        }
    }

    /// Number of bodies covered
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check whether no bodies are covered
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Apply the update rule to every body in `motion`, sequentially
pub fn update_slices(motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
    let MotionSlices {
        x,
        y,
        horizontal_speed,
        vertical_speed,
    } = motion;

    for (x, speed) in x.iter_mut().zip(horizontal_speed.iter_mut()) {
        step_axis(x, speed, bounds.width, dt);
    }
    for (y, speed) in y.iter_mut().zip(vertical_speed.iter_mut()) {
        step_axis(y, speed, bounds.height, dt);
    }
}

/// A way of applying the update rule to struct-of-arrays columns
///
/// Implementations must produce exactly the same values as
/// [`update_slices`] and must not return until every body is updated.
pub trait UpdateKernel: Send + Sync {
    /// Name of the struct-of-vectors strategy driven by this kernel
    const STRATEGY: &'static str;

    /// Short name of the kernel
    fn name(&self) -> &'static str;

    /// Advance every body in `motion` by `dt`
    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32);
}

/// Plain sequential loop
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel;

impl UpdateKernel for ScalarKernel {
    const STRATEGY: &'static str = "struct-of-vec";

    fn name(&self) -> &'static str {
        "scalar"
    }

    fn update(&self, motion: MotionSlices<'_>, bounds: Bounds, dt: f32) {
        update_slices(motion, bounds, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Color;

    const AREA: Bounds = Bounds::new(800.0, 600.0);

    #[test]
    fn test_bounce_check_edges() {
        // Overlapping low edge, moving toward it
        assert!(bounce_check(5.0, -1.0, 800.0));
        // Overlapping low edge, moving away
        assert!(!bounce_check(5.0, 1.0, 800.0));
        // Exactly touching is not overlapping
        assert!(!bounce_check(BODY_RADIUS, -1.0, 800.0));
        assert!(!bounce_check(800.0 - BODY_RADIUS, 1.0, 800.0));
        // Overlapping high edge
        assert!(bounce_check(795.0, 1.0, 800.0));
        assert!(!bounce_check(795.0, -1.0, 800.0));
        // Stationary bodies never bounce
        assert!(!bounce_check(5.0, 0.0, 800.0));
        assert!(!bounce_check(795.0, 0.0, 800.0));
    }

    #[test]
    fn test_update_body_moves_then_reflects() {
        let mut body = Body::new(5.0, 300.0, -100.0, 0.0, Color::opaque(1, 2, 3));
        update_body(&mut body, AREA, 0.01);
        assert_eq!(body.x, 4.0);
        assert_eq!(body.horizontal_speed, 100.0);
        assert_eq!(body.vertical_speed, 0.0);
        assert_eq!(body.y, 300.0);
    }

    #[test]
    fn test_bounce_uses_moved_position() {
        // Inside the area before the step, overlapping the low edge after it.
        let mut body = Body::new(15.0, 300.0, -600.0, 0.0, Color::default());
        update_body(&mut body, AREA, 1.0 / 60.0);
        assert_eq!(body.x, 15.0 + -600.0 * (1.0f32 / 60.0));
        assert_eq!(body.horizontal_speed, 600.0);

        let mut body = Body::new(785.0, 300.0, 600.0, 0.0, Color::default());
        update_body(&mut body, AREA, 1.0 / 60.0);
        assert_eq!(body.x, 785.0 + 600.0 * (1.0f32 / 60.0));
        assert_eq!(body.horizontal_speed, -600.0);
    }

    #[test]
    fn test_bounce_is_not_repeated_while_overlapping() {
        let mut body = Body::new(2.0, 300.0, -10.0, 0.0, Color::default());
        update_body(&mut body, AREA, 0.1);
        assert_eq!(body.horizontal_speed, 10.0);
        // Still overlapping but moving away, so the speed keeps its sign.
        update_body(&mut body, AREA, 0.1);
        assert_eq!(body.horizontal_speed, 10.0);
    }

    #[test]
    fn test_update_slices_matches_update_body() {
        let bodies = [
            Body::new(5.0, 595.0, -50.0, 50.0, Color::default()),
            Body::new(400.0, 300.0, 120.0, -30.0, Color::default()),
            Body::new(795.0, 5.0, 80.0, -80.0, Color::default()),
        ];
        let mut x: Vec<f32> = bodies.iter().map(|b| b.x).collect();
        let mut y: Vec<f32> = bodies.iter().map(|b| b.y).collect();
        let mut hs: Vec<f32> = bodies.iter().map(|b| b.horizontal_speed).collect();
        let mut vs: Vec<f32> = bodies.iter().map(|b| b.vertical_speed).collect();

        ScalarKernel.update(MotionSlices::new(&mut x, &mut y, &mut hs, &mut vs), AREA, 0.016);

        for (i, mut body) in bodies.into_iter().enumerate() {
            update_body(&mut body, AREA, 0.016);
            assert_eq!((x[i], y[i], hs[i], vs[i]), (body.x, body.y, body.horizontal_speed, body.vertical_speed));
        }
    }

    #[test]
    #[should_panic(expected = "motion columns differ in length")]
    fn test_mismatched_columns() {
        let (mut x, mut y, mut hs, mut vs) = (vec![0.0; 2], vec![0.0; 2], vec![0.0; 2], vec![0.0; 1]);
        let _ = MotionSlices::new(&mut x, &mut y, &mut hs, &mut vs);
    }
}
