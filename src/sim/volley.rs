//! Gravity-driven volley simulation
//!
//! Projectiles enter from a weighted-random edge aimed roughly inward,
//! arc under scaled gravity, and leave silently once well out of bounds.
//! They die to either collision channel: a beam contact or an open-palm
//! strike close enough to the projectile.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;
use crate::sim::beam::{ray_hits_circle, AimRay};

/// An airborne target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub age_ms: f64,
}

/// The volley's entity list, score, and spawn state
#[derive(Debug)]
pub struct VolleyGame {
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    active: bool,
    spawn_clock_ms: f64,
    rng: Pcg32,
    next_id: u32,
}

impl Default for VolleyGame {
    fn default() -> Self {
        Self {
            projectiles: Vec::new(),
            score: 0,
            active: false,
            spawn_clock_ms: 0.0,
            rng: Pcg32::seed_from_u64(0),
            next_id: 1,
        }
    }
}

impl VolleyGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the spawner and reset the round
    pub fn start(&mut self, seed: u64) {
        self.projectiles.clear();
        self.score = 0;
        self.spawn_clock_ms = 0.0;
        self.rng = Pcg32::seed_from_u64(seed);
        self.active = true;
        log::info!("volley started (seed {seed})");
    }

    /// Disarm the spawner; the entity list is left as-is
    pub fn stop(&mut self) {
        self.active = false;
        log::info!("volley stopped at score {}", self.score);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Weighted edge pick: 40% top, 30% left, 30% right, velocity aimed
    /// inward with randomized spread
    fn spawn_projectile(&mut self, bounds: Vec2) {
        let radius = PROJECTILE_RADIUS_MIN + self.rng.random_range(0.0..PROJECTILE_RADIUS_SPREAD);
        let (w, h) = (bounds.x, bounds.y);
        let roll: f32 = self.rng.random_range(0.0..1.0);
        let (pos, vel) = if roll < 0.4 {
            // Top edge, falling in
            let x = self.rng.random_range(radius..(w - radius).max(radius + 1.0));
            let vx = self.rng.random_range(-100.0..100.0);
            let vy = self.rng.random_range(150.0..310.0);
            (Vec2::new(x, -radius), Vec2::new(vx, vy))
        } else if roll < 0.7 {
            // Left edge, flying right
            let y = self.rng.random_range(radius..(h - radius).max(radius + 1.0));
            let vx = self.rng.random_range(200.0..400.0);
            let vy = self.rng.random_range(-40.0..40.0);
            (Vec2::new(-radius, y), Vec2::new(vx, vy))
        } else {
            // Right edge, flying left
            let y = self.rng.random_range(radius..(h - radius).max(radius + 1.0));
            let vx = -self.rng.random_range(200.0..400.0);
            let vy = self.rng.random_range(-40.0..40.0);
            (Vec2::new(w + radius, y), Vec2::new(vx, vy))
        };
        let id = self.next_entity_id();
        log::debug!("projectile {id} spawned: r={radius:.1}");
        self.projectiles.push(Projectile {
            id,
            pos,
            radius,
            vel,
            age_ms: 0.0,
        });
    }

    /// Advance one frame: spawn, apply scaled gravity, integrate, and
    /// cull projectiles well past any edge (no penalty)
    pub fn tick(&mut self, dt_ms: f64, bounds: Vec2) {
        if !self.active {
            return;
        }

        self.spawn_clock_ms += dt_ms;
        while self.spawn_clock_ms >= PROJECTILE_SPAWN_INTERVAL_MS {
            self.spawn_clock_ms -= PROJECTILE_SPAWN_INTERVAL_MS;
            self.spawn_projectile(bounds);
        }

        let dt_s = (dt_ms / 1000.0) as f32;
        let (w, h) = (bounds.x, bounds.y);
        self.projectiles.retain_mut(|p| {
            p.vel.y += GRAVITY * GRAVITY_AIRBORNE_SCALE * dt_s;
            p.pos += p.vel * dt_s;
            p.age_ms += dt_ms;
            p.pos.x >= -PROJECTILE_EXIT_MARGIN
                && p.pos.x <= w + PROJECTILE_EXIT_MARGIN
                && p.pos.y >= -PROJECTILE_EXIT_MARGIN
                && p.pos.y <= h + PROJECTILE_EXIT_MARGIN
        });
    }

    /// A beam contact one-shots a projectile regardless of configured
    /// damage. Returns the removal count.
    pub fn apply_beam(&mut self, ray: &AimRay, config: &GameConfig) -> u32 {
        let half_width = config.beam_half_width();
        let mut hits = 0u32;
        self.projectiles.retain(|p| {
            if ray_hits_circle(ray, p.pos, p.radius, half_width, BEAM_RANGE) {
                hits += 1;
                false
            } else {
                true
            }
        });
        self.score += hits as u64 * VOLLEY_HIT_SCORE;
        hits
    }

    /// Open-palm strike channel: removes every projectile within the
    /// palm's reach margin. Returns the removal count.
    pub fn apply_palm_strike(&mut self, palm: Vec2) -> u32 {
        let mut hits = 0u32;
        self.projectiles.retain(|p| {
            if palm.distance(p.pos) < p.radius + PALM_REACH {
                hits += 1;
                false
            } else {
                true
            }
        });
        self.score += hits as u64 * VOLLEY_HIT_SCORE;
        hits
    }
}
