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
//! Body record and world bounds
//!
//! A [`Body`] is one simulated particle: a center position, a per-axis speed
//! in simulation units per second, and an RGBA color. Bodies carry no
//! identity beyond their index in whichever container holds them.

use bytemuck::{Pod, Zeroable};

/// Radius of every body, in simulation units
pub const BODY_RADIUS: f32 = 10.0;

/// Scale applied to the integer speed draw to get units per second
pub const SPEED_MODIFIER: f32 = 2.4;

/// Lowest integer speed drawn per axis before scaling
pub const MIN_SPEED_DRAW: i32 = -100;

/// Highest integer speed drawn per axis before scaling
pub const MAX_SPEED_DRAW: i32 = 100;

/// Largest absolute speed a generated body can have on one axis
pub const MAX_SPEED: f32 = MAX_SPEED_DRAW as f32 * SPEED_MODIFIER;

/// RGBA color with 8 bits per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 is fully opaque)
    pub a: u8,
}

impl Color {
    /// Create a color from all four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Create a fully opaque color
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Check whether the color is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

/// One simulated particle
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Body {
    /// Center position on the horizontal axis
    pub x: f32,
    /// Center position on the vertical axis
    pub y: f32,
    /// Horizontal speed in units per second
    pub horizontal_speed: f32,
    /// Vertical speed in units per second
    pub vertical_speed: f32,
    /// Fill color
    pub color: Color,
}

impl Body {
    /// Create a body from its position, speeds and color
    pub const fn new(x: f32, y: f32, horizontal_speed: f32, vertical_speed: f32, color: Color) -> Self {
        Body {
            x,
            y,
            horizontal_speed,
            vertical_speed,
            color,
        }
    }

    /// Check if every motion field is finite
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.horizontal_speed.is_finite()
            && self.vertical_speed.is_finite()
    }

    /// Check whether the body's edge lies inside `bounds` on both axes
    pub fn is_within(&self, bounds: Bounds) -> bool {
        self.x >= BODY_RADIUS
            && self.x <= bounds.width - BODY_RADIUS
            && self.y >= BODY_RADIUS
            && self.y <= bounds.height - BODY_RADIUS
    }
}

/// Reflection boundary of a simulation: `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Bounds {
    /// Create new bounds
    pub const fn new(width: f32, height: f32) -> Self {
        Bounds { width, height }
    }

    /// Check that both extents are finite and large enough to hold a body
    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 2.0 * BODY_RADIUS
            && self.height > 2.0 * BODY_RADIUS
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::new(800.0, 600.0)
    }
}
