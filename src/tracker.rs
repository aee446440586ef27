//! Per-identity motion history and temporal pattern detectors
//!
//! One owned table maps a stable identity label ("left hand") to its
//! bounded ring of recent canvas-space samples. Identities that miss a
//! frame are evicted explicitly, so transient detections never leak
//! history across gaps.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;

use crate::consts::*;
use crate::landmark::{point, pose, Landmark};

/// One recorded anchor position with its frame timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub pos: Vec2,
    pub t_ms: f64,
}

/// Velocity estimate for the sample just observed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    pub velocity: Vec2,
    pub speed: f32,
    /// Speed measured on the previous frame (0 for a fresh track)
    pub prior_speed: f32,
}

#[derive(Debug, Default)]
struct Track {
    history: VecDeque<TrackSample>,
    prev_speed: f32,
    seen_this_frame: bool,
}

/// Owned table of motion histories keyed by identity label
#[derive(Debug, Default)]
pub struct MotionTracker {
    tracks: HashMap<String, Track>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's anchor point for `key` and estimate velocity
    pub fn observe(&mut self, key: &str, pos: Vec2, t_ms: f64) -> MotionSample {
        let track = self.tracks.entry(key.to_string()).or_default();
        track.seen_this_frame = true;

        let sample = match track.history.back() {
            Some(prev) => {
                let dt_s = ((t_ms - prev.t_ms).max(1.0) / 1000.0) as f32;
                let velocity = (pos - prev.pos) / dt_s;
                MotionSample {
                    velocity,
                    speed: velocity.length(),
                    prior_speed: track.prev_speed,
                }
            }
            None => MotionSample::default(),
        };
        track.prev_speed = sample.speed;

        track.history.push_back(TrackSample { pos, t_ms });
        if track.history.len() > HISTORY_CAPACITY {
            track.history.pop_front();
        }
        sample
    }

    /// Drop every identity that was not observed since the last sweep
    ///
    /// Call once per frame after all `observe` calls; a single absent
    /// frame discards the identity's history entirely.
    pub fn evict_absent(&mut self) {
        self.tracks.retain(|_, t| t.seen_this_frame);
        for track in self.tracks.values_mut() {
            track.seen_this_frame = false;
        }
    }

    /// Number of identities currently tracked
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// History ring for `key`, newest last
    pub fn history(&self, key: &str) -> Option<&VecDeque<TrackSample>> {
        self.tracks.get(key).map(|t| &t.history)
    }

    /// Whether `key`'s recent horizontal motion reads as a wave
    pub fn wave(&self, key: &str) -> bool {
        self.history(key).is_some_and(|h| detect_wave(h))
    }
}

/// Side-to-side wave over a history ring
///
/// Counts sign reversals of consecutive horizontal deltas; needs at least
/// 6 samples, the configured reversal count, and enough amplitude.
pub fn detect_wave(history: &VecDeque<TrackSample>) -> bool {
    if history.len() < 6 {
        return false;
    }
    let xs: Vec<f32> = history.iter().map(|s| s.pos.x).collect();
    let mut sign_changes = 0usize;
    for i in 2..xs.len() {
        let d1 = xs[i - 1] - xs[i - 2];
        let d2 = xs[i] - xs[i - 1];
        if (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0) {
            sign_changes += 1;
        }
    }
    let max = xs.iter().copied().fold(f32::MIN, f32::max);
    let min = xs.iter().copied().fold(f32::MAX, f32::min);
    sign_changes >= WAVE_MIN_SIGN_CHANGES && max - min > WAVE_MIN_AMPLITUDE
}

/// Rising-edge strike detector
///
/// Fires only when the speed crosses the threshold from well below it,
/// so a hand that stays fast does not retrigger every frame.
pub fn detect_strike(vx: f32, vy: f32, prior_speed: f32, threshold: f32) -> bool {
    let speed = Vec2::new(vx, vy).length();
    speed > threshold && prior_speed < threshold * 0.6
}

/// Sustained fast motion without the rising-edge requirement
pub fn detect_swift_move(speed: f32, threshold: f32) -> bool {
    speed > threshold * SWIFT_MOVE_MULTIPLIER
}

/// Hands-raised-near-face stance from pose plus tracked hand wrists
///
/// True when at least one pose wrist sits above the shoulder line by a
/// sensitivity-scaled margin AND at least one hand wrist lies within a
/// sensitivity-scaled vertical distance of the nose. All coordinates are
/// normalized landmark space.
pub fn detect_stance(
    pose_set: &[Landmark],
    hand_wrists: &[Landmark],
    sensitivity: f32,
) -> bool {
    let (Some(left_shoulder), Some(right_shoulder)) = (
        point(pose_set, pose::LEFT_SHOULDER),
        point(pose_set, pose::RIGHT_SHOULDER),
    ) else {
        return false;
    };
    let left_wrist = point(pose_set, pose::LEFT_WRIST);
    let right_wrist = point(pose_set, pose::RIGHT_WRIST);
    if left_wrist.is_none() && right_wrist.is_none() {
        return false;
    }

    let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
    let wrists_above = [left_wrist, right_wrist]
        .into_iter()
        .flatten()
        .filter(|w| w.y < shoulder_y - 0.06 * sensitivity)
        .count();

    let near_face = match point(pose_set, pose::NOSE) {
        Some(nose) => hand_wrists
            .iter()
            .filter(|w| (w.y - nose.y).abs() < 0.20 * sensitivity)
            .count(),
        None => 0,
    };

    wrists_above >= 1 && near_face >= 1
}
