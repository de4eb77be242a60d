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
//! Rendering collaborator
//!
//! Strategies do not draw anything themselves. `draw` walks the active
//! bodies and hands each one to a [`Renderer`] supplied by the host.

use crate::body::{Body, Color};

/// Host-side drawing surface
pub trait Renderer {
    /// Whether the surface is ready to accept draw calls
    fn is_ready(&self) -> bool {
        true
    }

    /// Draw one body as a filled circle
    fn draw_body(&mut self, x: f32, y: f32, radius: f32, color: Color);
}

/// Renderer that records every call, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Bodies drawn so far, in call order (radius is not stored)
    pub drawn: Vec<Body>,
    /// Radius passed on the most recent call
    pub last_radius: Option<f32>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything drawn so far
    pub fn clear(&mut self) {
        self.drawn.clear();
        self.last_radius = None;
    }
}

impl Renderer for RecordingRenderer {
    fn draw_body(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.drawn.push(Body::new(x, y, 0.0, 0.0, color));
        self.last_radius = Some(radius);
    }
}

/// Hand every body to `renderer`
///
/// # Panics
///
/// Panics if the renderer is not ready.
pub(crate) fn draw_all(renderer: &mut dyn Renderer, bodies: impl IntoIterator<Item = (f32, f32, Color)>) {
    assert!(renderer.is_ready(), "draw called before the renderer is ready");
    for (x, y, color) in bodies {
        renderer.draw_body(x, y, crate::body::BODY_RADIUS, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Closed;

    impl Renderer for Closed {
        fn is_ready(&self) -> bool {
            false
        }

        fn draw_body(&mut self, _x: f32, _y: f32, _radius: f32, _color: Color) {}
    }

    #[test]
    fn test_recording_renderer() {
        let mut renderer = RecordingRenderer::new();
        draw_all(&mut renderer, [(1.0, 2.0, Color::opaque(3, 4, 5))]);
        assert_eq!(renderer.drawn.len(), 1);
        assert_eq!(renderer.drawn[0].x, 1.0);
        assert_eq!(renderer.drawn[0].color, Color::opaque(3, 4, 5));
        assert_eq!(renderer.last_radius, Some(crate::body::BODY_RADIUS));

        renderer.clear();
        assert!(renderer.drawn.is_empty());
    }

    #[test]
    #[should_panic(expected = "renderer is not ready")]
    fn test_not_ready() {
        draw_all(&mut Closed, std::iter::empty());
    }
}
