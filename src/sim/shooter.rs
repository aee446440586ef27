//! Falling-enemy shooter simulation
//!
//! Enemies spawn above the playfield on a fixed interval, fall at their
//! rolled speed, and are burned down by the beam. An enemy that makes it
//! past the bottom costs the player vitality. Spawn cadence and speed
//! range are fixed per session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{EnemyKind, GameConfig};
use crate::consts::*;
use crate::runtime::Player;
use crate::sim::beam::{ray_hits_circle, AimRay};

/// A falling target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Fall speed, px/s
    pub speed: f32,
    pub hp: i32,
    pub kind: EnemyKind,
}

impl Enemy {
    /// Initial hit points scale coarsely with radius through the kind's
    /// divisor, never below 1
    pub fn hp_for(radius: f32, kind: EnemyKind) -> i32 {
        ((radius / kind.hp_divisor()).round() as i32).max(1)
    }
}

/// The shooter's entity list, score, and spawn state
#[derive(Debug)]
pub struct ShooterGame {
    pub enemies: Vec<Enemy>,
    pub score: u64,
    active: bool,
    spawn_clock_ms: f64,
    rng: Pcg32,
    next_id: u32,
}

impl Default for ShooterGame {
    fn default() -> Self {
        Self {
            enemies: Vec::new(),
            score: 0,
            active: false,
            spawn_clock_ms: 0.0,
            rng: Pcg32::seed_from_u64(0),
            next_id: 1,
        }
    }
}

impl ShooterGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the spawner and reset the round
    ///
    /// Always re-initializes the list and score; never relies on a prior
    /// stop having cleaned up.
    pub fn start(&mut self, seed: u64) {
        self.enemies.clear();
        self.score = 0;
        self.spawn_clock_ms = 0.0;
        self.rng = Pcg32::seed_from_u64(seed);
        self.active = true;
        log::info!("shooter started (seed {seed})");
    }

    /// Disarm the spawner; the entity list is left as-is
    pub fn stop(&mut self) {
        self.active = false;
        log::info!("shooter stopped at score {}", self.score);
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

    fn spawn_enemy(&mut self, bounds: Vec2, kind: EnemyKind) {
        let radius = ENEMY_RADIUS_MIN + self.rng.random_range(0.0..ENEMY_RADIUS_SPREAD);
        let spawn_span = (bounds.x - 2.0 * ENEMY_SPAWN_INSET).max(1.0);
        let x = ENEMY_SPAWN_INSET + self.rng.random_range(0.0..spawn_span);
        let speed = self
            .rng
            .random_range(ENEMY_SPEED_MIN..ENEMY_SPEED_MAX);
        let id = self.next_entity_id();
        log::debug!("enemy {id} spawned: r={radius:.1} v={speed:.0}");
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, -radius),
            radius,
            speed,
            hp: Enemy::hp_for(radius, kind),
            kind,
        });
    }

    /// Advance one frame: run the spawn accumulator, integrate falls, and
    /// charge the player for enemies that slip through the bottom
    pub fn tick(&mut self, dt_ms: f64, bounds: Vec2, config: &GameConfig, player: &mut Player) {
        if !self.active {
            return;
        }

        self.spawn_clock_ms += dt_ms;
        while self.spawn_clock_ms >= ENEMY_SPAWN_INTERVAL_MS {
            self.spawn_clock_ms -= ENEMY_SPAWN_INTERVAL_MS;
            self.spawn_enemy(bounds, config.enemy_kind);
        }

        let dt_s = (dt_ms / 1000.0) as f32;
        let floor = bounds.y + ENEMY_EXIT_MARGIN;
        let mut breaches = 0u32;
        self.enemies.retain_mut(|e| {
            e.pos.y += e.speed * dt_s;
            if e.pos.y - e.radius > floor {
                breaches += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..breaches {
            player.damage(ENEMY_BREACH_DAMAGE);
        }
    }

    /// Resolve a beam contact against every enemy in range
    ///
    /// Each contact costs a fixed damage amount; a depleted enemy is
    /// removed and scores exactly one point. Returns the kill count.
    pub fn apply_beam(&mut self, ray: &AimRay, config: &GameConfig) -> u32 {
        let half_width = config.beam_half_width();
        let mut kills = 0u32;
        self.enemies.retain_mut(|e| {
            if ray_hits_circle(ray, e.pos, e.radius, half_width, BEAM_RANGE) {
                e.hp -= BEAM_DAMAGE;
                if e.hp <= 0 {
                    kills += 1;
                    return false;
                }
            }
            true
        });
        self.score += kills as u64;
        kills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_MAX_VITALITY;

    fn beam_at(x: f32) -> AimRay {
        AimRay {
            origin: Vec2::new(x, 800.0),
            dir: Vec2::new(0.0, -1.0),
        }
    }

    fn push_enemy(game: &mut ShooterGame, x: f32, y: f32, radius: f32) {
        game.enemies.push(Enemy {
            id: 999,
            pos: Vec2::new(x, y),
            radius,
            speed: 100.0,
            hp: Enemy::hp_for(radius, EnemyKind::Ball),
            kind: EnemyKind::Ball,
        });
    }

    #[test]
    fn test_hp_from_radius() {
        // Radius 20 ball rounds to a single hit point
        assert_eq!(Enemy::hp_for(20.0, EnemyKind::Ball), 1);
        assert_eq!(Enemy::hp_for(40.0, EnemyKind::Ball), 2);
        // Tiny radius still clamps to 1
        assert_eq!(Enemy::hp_for(5.0, EnemyKind::Ball), 1);
        // Tougher kinds get more hp at the same radius
        assert!(Enemy::hp_for(30.0, EnemyKind::Square) > Enemy::hp_for(30.0, EnemyKind::Ball));
    }

    #[test]
    fn test_start_resets_round() {
        let mut game = ShooterGame::new();
        push_enemy(&mut game, 100.0, 100.0, 20.0);
        game.score = 5;
        game.start(1);
        assert!(game.enemies.is_empty());
        assert_eq!(game.score, 0);
        assert!(game.is_active());
    }

    #[test]
    fn test_stop_keeps_entities() {
        let mut game = ShooterGame::new();
        game.start(1);
        push_enemy(&mut game, 100.0, 100.0, 20.0);
        game.stop();
        assert!(!game.is_active());
        assert_eq!(game.enemies.len(), 1);
    }

    #[test]
    fn test_spawn_on_interval() {
        let mut game = ShooterGame::new();
        game.start(42);
        let bounds = Vec2::new(800.0, 600.0);
        let config = GameConfig::default();
        let mut player = Player::new();

        game.tick(ENEMY_SPAWN_INTERVAL_MS - 1.0, bounds, &config, &mut player);
        assert_eq!(game.enemies.len(), 0);
        game.tick(1.0, bounds, &config, &mut player);
        assert_eq!(game.enemies.len(), 1);

        let e = &game.enemies[0];
        assert!(e.radius >= ENEMY_RADIUS_MIN);
        assert!(e.radius <= ENEMY_RADIUS_MIN + ENEMY_RADIUS_SPREAD);
        assert!(e.speed >= ENEMY_SPEED_MIN && e.speed < ENEMY_SPEED_MAX);
        assert!(e.pos.x >= ENEMY_SPAWN_INSET && e.pos.x <= bounds.x - ENEMY_SPAWN_INSET);
        assert!(e.hp >= 1);
    }

    #[test]
    fn test_inactive_game_does_not_tick() {
        let mut game = ShooterGame::new();
        push_enemy(&mut game, 100.0, 100.0, 20.0);
        let mut player = Player::new();
        game.tick(
            ENEMY_SPAWN_INTERVAL_MS * 3.0,
            Vec2::new(800.0, 600.0),
            &GameConfig::default(),
            &mut player,
        );
        assert_eq!(game.enemies.len(), 1);
        assert_eq!(game.enemies[0].pos.y, 100.0);
    }

    #[test]
    fn test_breach_damages_player() {
        let mut game = ShooterGame::new();
        game.start(1);
        push_enemy(&mut game, 100.0, 590.0, 20.0);
        let mut player = Player::new();

        // 2 seconds at 100 px/s carries it past bottom + margin
        for _ in 0..10 {
            game.tick(200.0, Vec2::new(800.0, 600.0), &GameConfig::default(), &mut player);
        }
        assert!(game.enemies.iter().all(|e| e.id != 999));
        assert_eq!(player.vitality(), PLAYER_MAX_VITALITY - ENEMY_BREACH_DAMAGE);
    }

    #[test]
    fn test_single_hit_kill_scores_once() {
        let mut game = ShooterGame::new();
        game.start(1);
        push_enemy(&mut game, 400.0, 300.0, 20.0); // 1 hp
        let kills = game.apply_beam(&beam_at(400.0), &GameConfig::default());
        assert_eq!(kills, 1);
        assert_eq!(game.score, 1);
        assert!(game.enemies.is_empty());
    }

    #[test]
    fn test_hp_depletion_across_hits() {
        let mut game = ShooterGame::new();
        game.start(1);
        // 3 hp with damage 2 per hit: ceil(3/2) = 2 beam contacts
        game.enemies.push(Enemy {
            id: 1,
            pos: Vec2::new(400.0, 300.0),
            radius: 25.0,
            speed: 0.0,
            hp: 3,
            kind: EnemyKind::Square,
        });
        let config = GameConfig::default();
        assert_eq!(game.apply_beam(&beam_at(400.0), &config), 0);
        assert_eq!(game.enemies[0].hp, 1);
        assert_eq!(game.apply_beam(&beam_at(400.0), &config), 1);
        assert!(game.enemies.is_empty());
        assert_eq!(game.score, 1);
    }

    #[test]
    fn test_beam_miss_leaves_enemy() {
        let mut game = ShooterGame::new();
        game.start(1);
        push_enemy(&mut game, 400.0, 300.0, 20.0);
        let config = GameConfig::default();
        // Beam a long way off to the side
        assert_eq!(game.apply_beam(&beam_at(600.0), &config), 0);
        assert_eq!(game.enemies.len(), 1);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_wider_beam_reaches_farther() {
        let mut game = ShooterGame::new();
        game.start(1);
        // 27 px off-axis: outside radius + 3.2 but inside radius + 8.0
        push_enemy(&mut game, 427.0, 300.0, 20.0);
        let mut config = GameConfig::default();
        assert_eq!(game.apply_beam(&beam_at(400.0), &config), 0);
        config.beam_width = 10.0;
        assert_eq!(game.apply_beam(&beam_at(400.0), &config), 1);
    }
}
