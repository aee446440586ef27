//! Live runtime configuration
//!
//! One mutable object read by both simulations and the collision engine
//! every frame; the control surface may rewrite any field between frames
//! and the change applies on the next step without a mode restart.

use serde::{Deserialize, Serialize};

use crate::consts::BEAM_HIT_TOLERANCE;

/// Enemy flavor for the shooter
///
/// Kind picks the radius-to-hit-point divisor and the rendering shape;
/// movement is identical across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Ball,
    Square,
    Drone,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Ball => "ball",
            EnemyKind::Square => "square",
            EnemyKind::Drone => "drone",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ball" => Some(EnemyKind::Ball),
            "square" => Some(EnemyKind::Square),
            "drone" => Some(EnemyKind::Drone),
            _ => None,
        }
    }

    /// Radius divisor feeding the initial hit points
    ///
    /// Smaller divisor means more hit points at the same radius, so
    /// squares and drones take extra beam contacts.
    pub fn hp_divisor(&self) -> f32 {
        match self {
            EnemyKind::Ball => 18.0,
            EnemyKind::Square => 6.0,
            EnemyKind::Drone => 9.0,
        }
    }
}

/// Cosmetic and gameplay parameters shared across the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Kind applied to future spawns (already-spawned enemies keep theirs)
    pub enemy_kind: EnemyKind,
    /// Beam color, CSS-style, consumed by the rendering collaborator
    pub beam_color: String,
    /// Beam thickness in px; widens the effective hit tolerance
    pub beam_width: f32,
    /// Skeleton overlay color
    pub skeleton_color: String,
    /// Torso fill color
    pub torso_color: String,
    /// Skeleton bone stroke width in px
    pub bone_width: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enemy_kind: EnemyKind::Ball,
            beam_color: "#ff5028".to_string(),
            beam_width: 4.0,
            skeleton_color: "#00e5a8".to_string(),
            torso_color: "#4f9aff".to_string(),
            bone_width: 3.0,
        }
    }
}

impl GameConfig {
    /// Collision tolerance added around target radii, derived live from
    /// the configured beam width
    #[inline]
    pub fn beam_half_width(&self) -> f32 {
        self.beam_width * BEAM_HIT_TOLERANCE
    }

    /// Pretty JSON snapshot for the control surface
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
