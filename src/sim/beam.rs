//! Aim rays, the shared collision primitives, and dwell selection
//!
//! The beam is modeled as a range-capped, finite-width segment: a target
//! is hit when its center projects onto the ray within range and the
//! perpendicular distance fits inside radius + half-width. Glancing hits
//! just past the projected range are missed by design.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::landmark::{hand, Landmark, Viewport};

/// A directed aiming ray in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimRay {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
}

/// Derive the aim ray from a hand's index finger
///
/// Origin is the fingertip nudged forward along the direction; direction
/// runs from the second index joint to the tip, falling back to
/// wrist-to-tip. Returns `None` when the tip is missing or the direction
/// degenerates, never a garbage ray.
pub fn compute_aim_ray(set: &[Landmark], view: &Viewport) -> Option<AimRay> {
    let tip = view.project_point(set, hand::INDEX_TIP)?;
    let anchor = view
        .project_point(set, hand::INDEX_PIP)
        .or_else(|| view.project_point(set, hand::WRIST))?;
    let dir = (tip - anchor).try_normalize()?;
    Some(AimRay {
        origin: tip + dir * AIM_FORWARD_OFFSET,
        dir,
    })
}

/// Range-capped beam vs circle test
///
/// The exact boundary (closest approach == radius + half_width) is a
/// miss; the policy is exclusive and tested.
#[inline]
pub fn ray_hits_circle(
    ray: &AimRay,
    center: Vec2,
    radius: f32,
    half_width: f32,
    max_range: f32,
) -> bool {
    let to_center = center - ray.origin;
    let along = to_center.dot(ray.dir);
    if along < 0.0 || along > max_range {
        return false;
    }
    let closest = ray.origin + ray.dir * along;
    closest.distance(center) < radius + half_width
}

/// Axis-aligned UI region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.w, self.y),
            Vec2::new(self.x + self.w, self.y + self.h),
            Vec2::new(self.x, self.y + self.h),
        ]
    }
}

/// Finite beam segment vs rectangle edges
pub fn ray_hits_rect(ray: &AimRay, rect: &Rect, max_len: f32) -> bool {
    let end = ray.origin + ray.dir * max_len;
    let [a, b, c, d] = rect.corners();
    segments_intersect(ray.origin, end, a, b)
        || segments_intersect(ray.origin, end, b, c)
        || segments_intersect(ray.origin, end, c, d)
        || segments_intersect(ray.origin, end, d, a)
}

/// Segment-segment intersection, cross-product ratio test
fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return false;
    }
    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// A selectable UI region keyed by a caller-chosen id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiTarget {
    pub id: u32,
    pub rect: Rect,
}

/// Point-and-dwell selector
///
/// Sustained beam intersection with a target for the dwell duration
/// commits a selection (equivalent to a click) and resets that target's
/// timer; losing the beam before the duration cancels with no effect.
#[derive(Debug, Default)]
pub struct DwellSelector {
    hover_since: HashMap<u32, f64>,
}

impl DwellSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance hover timers against this frame's ray; returns committed ids
    pub fn update(&mut self, ray: Option<&AimRay>, targets: &[UiTarget], now_ms: f64) -> Vec<u32> {
        let mut committed = Vec::new();
        for target in targets {
            let hit = ray.is_some_and(|r| ray_hits_rect(r, &target.rect, UI_BEAM_RANGE));
            if hit {
                let since = *self.hover_since.entry(target.id).or_insert(now_ms);
                if now_ms - since >= DWELL_MS {
                    committed.push(target.id);
                    self.hover_since.remove(&target.id);
                }
            } else {
                self.hover_since.remove(&target.id);
            }
        }
        // Targets that vanished take their timers with them
        self.hover_since
            .retain(|id, _| targets.iter().any(|t| t.id == *id));
        committed
    }

    /// Hover progress for a target in [0,1], for rendering feedback
    pub fn progress(&self, id: u32, now_ms: f64) -> f32 {
        self.hover_since
            .get(&id)
            .map(|since| (((now_ms - since) / DWELL_MS) as f32).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::hand;
    use proptest::prelude::*;

    fn ray(origin: (f32, f32), dir: (f32, f32)) -> AimRay {
        AimRay {
            origin: Vec2::new(origin.0, origin.1),
            dir: Vec2::new(dir.0, dir.1).normalize(),
        }
    }

    #[test]
    fn test_circle_hit_straight_ahead() {
        let r = ray((0.0, 0.0), (1.0, 0.0));
        assert!(ray_hits_circle(&r, Vec2::new(100.0, 0.0), 10.0, 3.2, BEAM_RANGE));
    }

    #[test]
    fn test_circle_behind_origin_misses() {
        let r = ray((0.0, 0.0), (1.0, 0.0));
        assert!(!ray_hits_circle(&r, Vec2::new(-50.0, 0.0), 10.0, 3.2, BEAM_RANGE));
    }

    #[test]
    fn test_circle_past_range_misses() {
        let r = ray((0.0, 0.0), (1.0, 0.0));
        assert!(!ray_hits_circle(
            &r,
            Vec2::new(BEAM_RANGE + 50.0, 0.0),
            10.0,
            3.2,
            BEAM_RANGE
        ));
    }

    #[test]
    fn test_circle_boundary_is_exclusive() {
        // Closest approach exactly radius + half_width: a miss.
        let r = ray((0.0, 0.0), (1.0, 0.0));
        let center = Vec2::new(100.0, 13.0);
        assert!(!ray_hits_circle(&r, center, 10.0, 3.0, BEAM_RANGE));
        // A hair inside: a hit.
        let center = Vec2::new(100.0, 12.9);
        assert!(ray_hits_circle(&r, center, 10.0, 3.0, BEAM_RANGE));
    }

    #[test]
    fn test_wider_beam_converts_miss_to_hit() {
        let r = ray((0.0, 0.0), (1.0, 0.0));
        let center = Vec2::new(100.0, 15.0);
        assert!(!ray_hits_circle(&r, center, 10.0, 4.0 * 0.8, BEAM_RANGE));
        assert!(ray_hits_circle(&r, center, 10.0, 10.0 * 0.8, BEAM_RANGE));
    }

    #[test]
    fn test_rect_hit_and_miss() {
        let r = ray((0.0, 50.0), (1.0, 0.0));
        let rect = Rect::new(100.0, 0.0, 40.0, 100.0);
        assert!(ray_hits_rect(&r, &rect, 2000.0));
        // Pointing away
        let r = ray((0.0, 50.0), (-1.0, 0.0));
        assert!(!ray_hits_rect(&r, &rect, 2000.0));
        // Too short to reach
        let r = ray((0.0, 50.0), (1.0, 0.0));
        assert!(!ray_hits_rect(&r, &rect, 50.0));
    }

    #[test]
    fn test_aim_ray_from_index_finger() {
        let mut set = vec![Landmark::new(0.5, 0.9, 0.0); hand::LANDMARK_COUNT];
        set[hand::INDEX_PIP] = Landmark::new(0.5, 0.6, 0.0);
        set[hand::INDEX_TIP] = Landmark::new(0.5, 0.5, 0.0);
        let view = Viewport::new(1000.0, 1000.0, false);

        let ray = compute_aim_ray(&set, &view).unwrap();
        // Pointing straight up in canvas space
        assert!((ray.dir - Vec2::new(0.0, -1.0)).length() < 1e-5);
        // Origin nudged forward from the projected tip
        assert!((ray.origin - Vec2::new(500.0, 500.0 - AIM_FORWARD_OFFSET)).length() < 1e-3);
    }

    #[test]
    fn test_aim_ray_missing_tip() {
        let set = vec![Landmark::new(0.5, 0.9, 0.0); 5];
        let view = Viewport::default();
        assert!(compute_aim_ray(&set, &view).is_none());
    }

    #[test]
    fn test_aim_ray_degenerate_direction() {
        // Tip sits exactly on the PIP joint - no usable direction.
        let set = vec![Landmark::new(0.5, 0.5, 0.0); hand::LANDMARK_COUNT];
        let view = Viewport::default();
        assert!(compute_aim_ray(&set, &view).is_none());
    }

    #[test]
    fn test_dwell_commits_after_duration() {
        let mut dwell = DwellSelector::new();
        let targets = [UiTarget {
            id: 7,
            rect: Rect::new(100.0, 0.0, 40.0, 100.0),
        }];
        let r = ray((0.0, 50.0), (1.0, 0.0));

        assert!(dwell.update(Some(&r), &targets, 0.0).is_empty());
        assert!(dwell.update(Some(&r), &targets, 300.0).is_empty());
        assert_eq!(dwell.update(Some(&r), &targets, DWELL_MS), vec![7]);
        // Timer reset after commit; the next sustained pass commits again
        assert!(dwell.update(Some(&r), &targets, DWELL_MS + 100.0).is_empty());
        assert_eq!(
            dwell.update(Some(&r), &targets, DWELL_MS * 2.0 + 100.0),
            vec![7]
        );
    }

    #[test]
    fn test_dwell_cancelled_by_leaving() {
        let mut dwell = DwellSelector::new();
        let targets = [UiTarget {
            id: 1,
            rect: Rect::new(100.0, 0.0, 40.0, 100.0),
        }];
        let hit = ray((0.0, 50.0), (1.0, 0.0));
        let away = ray((0.0, 50.0), (-1.0, 0.0));

        assert!(dwell.update(Some(&hit), &targets, 0.0).is_empty());
        assert!(dwell.update(Some(&away), &targets, 300.0).is_empty());
        // Re-acquired: the timer starts over
        assert!(dwell.update(Some(&hit), &targets, 400.0).is_empty());
        assert!(dwell.update(Some(&hit), &targets, 400.0 + DWELL_MS - 1.0).is_empty());
        assert_eq!(
            dwell.update(Some(&hit), &targets, 400.0 + DWELL_MS),
            vec![1]
        );
    }

    proptest! {
        #[test]
        fn prop_hit_is_rotation_invariant(
            angle in 0.0f32..std::f32::consts::TAU,
            along in 1.0f32..1000.0,
            offset in -60.0f32..60.0,
            radius in 5.0f32..40.0,
        ) {
            // A target placed `along` down the ray with `offset` off-axis
            // hits iff |offset| < radius + half_width, at any ray angle.
            let dir = Vec2::new(angle.cos(), angle.sin());
            let perp = Vec2::new(-dir.y, dir.x);
            let r = AimRay { origin: Vec2::new(640.0, 360.0), dir };
            let center = r.origin + dir * along + perp * offset;
            let hit = ray_hits_circle(&r, center, radius, 3.2, BEAM_RANGE);
            let expected = offset.abs() < radius + 3.2;
            // Skip the exact boundary where rounding decides
            if (offset.abs() - (radius + 3.2)).abs() > 0.01 {
                prop_assert_eq!(hit, expected);
            }
        }
    }

    #[test]
    fn test_dwell_no_ray_clears_timers() {
        let mut dwell = DwellSelector::new();
        let targets = [UiTarget {
            id: 1,
            rect: Rect::new(100.0, 0.0, 40.0, 100.0),
        }];
        let hit = ray((0.0, 50.0), (1.0, 0.0));
        dwell.update(Some(&hit), &targets, 0.0);
        dwell.update(None, &targets, 300.0);
        assert_eq!(dwell.progress(1, 300.0), 0.0);
    }
}
