//! Gesture Arcade - landmark-driven gestures and mini-games
//!
//! Core modules:
//! - `landmark`: landmark points, anatomical indices, canvas projection
//! - `gesture`: per-frame hand gesture and face expression classification
//! - `tracker`: bounded per-hand motion history and temporal detectors
//! - `sim`: aim ray, collision primitives, and the two game simulations
//! - `config`: live runtime configuration
//! - `runtime`: frame step orchestration and shared state
//!
//! The crate is a pure frame-driven core: an external perception layer
//! feeds it landmark arrays once per frame, and an external presentation
//! layer reads back gestures, rays, entities, and scores. Nothing here
//! blocks or touches a platform API.

pub mod config;
pub mod gesture;
pub mod landmark;
pub mod runtime;
pub mod sim;
pub mod tracker;

pub use config::{EnemyKind, GameConfig};
pub use gesture::{classify_expression, classify_hand, Expression, HandGesture};
pub use landmark::{Landmark, Viewport};
pub use runtime::{Alert, Arcade, FrameInput, FrameReport, GameMode, HandInput, HandSide};
pub use sim::beam::AimRay;

use glam::Vec2;

/// Tuning constants
pub mod consts {
    /// Samples kept per tracked hand (oldest evicted first)
    pub const HISTORY_CAPACITY: usize = 18;
    /// Minimum direction reversals for a wave
    pub const WAVE_MIN_SIGN_CHANGES: usize = 2;
    /// Minimum horizontal span for a wave (canvas px)
    pub const WAVE_MIN_AMPLITUDE: f32 = 30.0;
    /// Instantaneous speed that qualifies as a strike (px/s)
    pub const STRIKE_SPEED_THRESHOLD: f32 = 1200.0;
    /// Swift-move fires above threshold times this multiplier
    pub const SWIFT_MOVE_MULTIPLIER: f32 = 1.8;

    /// Finger counts as extended below this bend angle (degrees)
    pub const FINGER_BEND_MAX_DEG: f32 = 35.0;
    /// Thumb bend limit - wider to match its shorter arc
    pub const THUMB_BEND_MAX_DEG: f32 = 55.0;
    /// Minimum tip reach for a finger (normalized units)
    pub const FINGER_MIN_REACH: f32 = 0.007;
    /// Minimum tip reach for the thumb
    pub const THUMB_MIN_REACH: f32 = 0.015;
    /// Thumb tip to index tip distance that reads as a pinch
    pub const PINCH_MAX_DIST: f32 = 0.06;
    /// Thumb tip must clear the wrist by this much for thumbs-up
    pub const THUMB_RAISE_MARGIN: f32 = 0.05;

    /// Eye aspect ratio below this is a closed eye
    pub const BLINK_EAR: f32 = 0.018;
    /// Mouth aspect ratio above this is an open mouth
    pub const MOUTH_OPEN_MAR: f32 = 0.045;
    /// Mouth aspect ratio above this suggests laughing
    pub const LAUGH_MAR: f32 = 0.08;
    /// Mouth width/height ratio above this is a smile
    pub const SMILE_MIN_RATIO: f32 = 3.2;

    /// Beam reach for game collision (canvas px)
    pub const BEAM_RANGE: f32 = 1400.0;
    /// Beam reach for dwell-selection targets
    pub const UI_BEAM_RANGE: f32 = 2000.0;
    /// Origin nudge along the aim direction (px)
    pub const AIM_FORWARD_OFFSET: f32 = 8.0;
    /// Damage applied per beam contact with an enemy
    pub const BEAM_DAMAGE: i32 = 2;
    /// Fraction of the configured beam width used as hit tolerance
    pub const BEAM_HIT_TOLERANCE: f32 = 0.8;
    /// Sustained intersection time that commits a dwell selection (ms)
    pub const DWELL_MS: f64 = 600.0;

    /// Shooter spawn interval (ms)
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 2200.0;
    /// Enemy fall speed floor (px/s)
    pub const ENEMY_SPEED_MIN: f32 = 60.0;
    /// Enemy fall speed ceiling (px/s)
    pub const ENEMY_SPEED_MAX: f32 = 660.0;
    /// Smallest enemy radius (px)
    pub const ENEMY_RADIUS_MIN: f32 = 18.0;
    /// Radius spread above the floor (px)
    pub const ENEMY_RADIUS_SPREAD: f32 = 28.0;
    /// Horizontal inset from the playfield edges at spawn (px)
    pub const ENEMY_SPAWN_INSET: f32 = 30.0;
    /// Margin past the bottom edge before an enemy counts as through (px)
    pub const ENEMY_EXIT_MARGIN: f32 = 100.0;
    /// Vitality cost when an enemy gets through
    pub const ENEMY_BREACH_DAMAGE: u32 = 6;

    /// Volley spawn interval (ms)
    pub const PROJECTILE_SPAWN_INTERVAL_MS: f64 = 900.0;
    /// Smallest projectile radius (px)
    pub const PROJECTILE_RADIUS_MIN: f32 = 20.0;
    /// Radius spread above the floor (px)
    pub const PROJECTILE_RADIUS_SPREAD: f32 = 26.0;
    /// Downward acceleration (px/s^2)
    pub const GRAVITY: f32 = 600.0;
    /// Gravity scale keeping projectiles airborne longer
    pub const GRAVITY_AIRBORNE_SCALE: f32 = 0.2;
    /// Margin past any playfield edge before a projectile is culled (px)
    pub const PROJECTILE_EXIT_MARGIN: f32 = 200.0;
    /// Extra reach around a projectile for an open-palm strike (px)
    pub const PALM_REACH: f32 = 60.0;
    /// Points per destroyed projectile
    pub const VOLLEY_HIT_SCORE: u64 = 1;

    /// Player vitality ceiling
    pub const PLAYER_MAX_VITALITY: u32 = 100;

    /// Default sensitivity for threat alerts
    pub const ALERT_SENSITIVITY: f32 = 0.7;
    /// Thumb-index proximity scale for the gun-like alert
    pub const GUN_TIP_PROXIMITY: f32 = 0.25;
    /// Mean fingertip depth that reads as aiming at the camera
    pub const GUN_FORWARD_Z: f32 = -0.05;

    /// Assumed frame duration when no previous timestamp exists (ms)
    pub const DEFAULT_FRAME_MS: f64 = 16.0;
}

/// Angle in degrees between the segments a->b and b->c
///
/// 0 means the three points continue in the same direction (a straight
/// digit); 180 means fully doubled back.
#[inline]
pub fn bend_angle_deg(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    let v1 = b - a;
    let v2 = c - b;
    let denom = v1.length() * v2.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    let cos = (v1.dot(v2) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
