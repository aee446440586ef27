//! Landmark points and anatomical index tables
//!
//! The perception layer hands over one flat, ordered landmark array per
//! detected entity each frame. Indices follow the usual 21-point hand,
//! 33-point pose, and dense face topologies; a set may be shorter when
//! the entity is partially occluded, so every index access goes through
//! [`point`] and degrades to `None` instead of panicking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single normalized landmark (x, y in [0,1], z relative depth)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) view, still in normalized units
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Landmark at `idx`, or `None` when the set is too short
#[inline]
pub fn point(set: &[Landmark], idx: usize) -> Option<Landmark> {
    set.get(idx).copied()
}

/// Normalized planar distance between two landmark indices
///
/// Missing endpoints yield `None`; callers pick their own neutral value.
#[inline]
pub fn span(set: &[Landmark], a: usize, b: usize) -> Option<f32> {
    Some(point(set, a)?.xy().distance(point(set, b)?.xy()))
}

/// Hand landmark indices (21-point topology)
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Palm anchor for strike tests; falls back to the wrist upstream
    pub const PALM: usize = MIDDLE_MCP;

    pub const LANDMARK_COUNT: usize = 21;
}

/// Body pose landmark indices (subset the core consumes)
pub mod pose {
    pub const NOSE: usize = 0;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
}

/// Face mesh landmark indices (subset the core consumes)
pub mod face {
    pub const NOSE_TIP: usize = 1;

    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const LEFT_EYE_LEFT: usize = 33;
    pub const LEFT_EYE_RIGHT: usize = 133;

    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
    pub const RIGHT_EYE_LEFT: usize = 362;
    pub const RIGHT_EYE_RIGHT: usize = 263;

    pub const MOUTH_TOP: usize = 13;
    pub const MOUTH_BOTTOM: usize = 14;
    pub const MOUTH_LEFT: usize = 78;
    pub const MOUTH_RIGHT: usize = 308;
}

/// Canvas-space view of the playfield
///
/// Projects normalized landmarks into the coordinate space shared by the
/// game entities and collision tests. Mirroring flips x so a mirrored
/// camera feed still aims the way the player expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub mirror: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            mirror: false,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, mirror: bool) -> Self {
        Self {
            width,
            height,
            mirror,
        }
    }

    /// Project a normalized landmark to canvas coordinates
    #[inline]
    pub fn project(&self, lm: Landmark) -> Vec2 {
        let x = if self.mirror { 1.0 - lm.x } else { lm.x };
        Vec2::new(x * self.width, lm.y * self.height)
    }

    /// Project the landmark at `idx`, if present
    #[inline]
    pub fn project_point(&self, set: &[Landmark], idx: usize) -> Option<Vec2> {
        point(set, idx).map(|lm| self.project(lm))
    }

    /// Playfield size as a vector
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
