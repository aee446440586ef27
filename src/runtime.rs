//! Shared runtime state and the per-frame step
//!
//! `Arcade` owns everything the frame loop touches: configuration, the
//! two game state machines, the motion tracker, the dwell selector, and
//! player vitality. One `step` call per display frame performs, in
//! order: ingestion, classification, history update, aiming/collision,
//! simulation, and report assembly. Nothing in the step blocks; missing
//! perception data degrades to empty detections.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;
use crate::gesture::{classify_expression, Expression, HandGesture, HandShape};
use crate::landmark::{hand, point, span, Landmark, Viewport};
use crate::sim::beam::{compute_aim_ray, AimRay, DwellSelector, UiTarget};
use crate::sim::{ShooterGame, VolleyGame};
use crate::tracker::{detect_stance, detect_strike, detect_swift_move, MotionTracker};

/// Which hand an entry belongs to, stable across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }

    /// Identity key used by the motion tracker
    pub fn key(&self) -> &'static str {
        match self {
            HandSide::Left => "left hand",
            HandSide::Right => "right hand",
        }
    }
}

/// Active game, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    None,
    Shooter,
    Volley,
}

/// Temporal motion pattern detected for a hand this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAction {
    Wave,
    Strike,
    SwiftMove,
}

/// Situation flagged for the control surface, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    FightStance,
    GunLike,
    MultipleFaces(usize),
}

/// Player vitality with an idempotent down transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    vitality: u32,
    alive: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            vitality: PLAYER_MAX_VITALITY,
            alive: true,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vitality(&self) -> u32 {
        self.vitality
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Apply damage, floored at zero; returns true only on the frame the
    /// player goes down
    pub fn damage(&mut self, amount: u32) -> bool {
        self.vitality = self.vitality.saturating_sub(amount);
        if self.vitality == 0 && self.alive {
            self.alive = false;
            log::warn!("player down");
            return true;
        }
        false
    }
}

/// One hand's landmark set for this frame
#[derive(Debug, Clone)]
pub struct HandInput {
    pub side: HandSide,
    pub landmarks: Vec<Landmark>,
}

/// Everything the perception layer hands over for one frame
///
/// Empty lists mean "nothing detected"; a lost perception stream looks
/// identical and is handled identically.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub timestamp_ms: f64,
    pub hands: Vec<HandInput>,
    pub pose: Option<Vec<Landmark>>,
    pub faces: Vec<Vec<Landmark>>,
    /// Dwell-selectable UI regions active this frame
    pub ui_targets: Vec<UiTarget>,
}

/// Per-hand classification results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandReport {
    pub side: HandSide,
    pub gesture: HandGesture,
    pub action: Option<MotionAction>,
    pub aim: Option<AimRay>,
    /// Wrist anchor in canvas space, when the wrist landmark was present
    pub anchor: Option<Vec2>,
    pub velocity: Vec2,
    pub speed: f32,
}

/// Everything the presentation layer reads back from one step
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub hands: Vec<HandReport>,
    pub expression: Expression,
    pub expression_summary: String,
    /// Dwell selections committed this frame
    pub selections: Vec<u32>,
    /// Enemies destroyed by the beam this frame
    pub shooter_kills: u32,
    /// Projectiles destroyed (beam or palm) this frame
    pub volley_hits: u32,
    /// True only on the frame the player goes down
    pub player_down: bool,
    pub alert: Option<Alert>,
}

/// The frame-driven core
pub struct Arcade {
    pub config: GameConfig,
    pub viewport: Viewport,
    pub shooter: ShooterGame,
    pub volley: VolleyGame,
    pub player: Player,
    mode: GameMode,
    tracker: MotionTracker,
    dwell: DwellSelector,
    last_frame_ms: Option<f64>,
}

impl Default for Arcade {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Arcade {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            config: GameConfig::default(),
            viewport,
            shooter: ShooterGame::new(),
            volley: VolleyGame::new(),
            player: Player::new(),
            mode: GameMode::None,
            tracker: MotionTracker::new(),
            dwell: DwellSelector::new(),
            last_frame_ms: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Start the shooter round; clears both entity lists so no stale
    /// entities linger from the other mode
    pub fn start_shooter(&mut self, seed: u64) {
        if self.volley.is_active() {
            self.volley.stop();
        }
        self.volley.projectiles.clear();
        self.shooter.start(seed);
        self.mode = GameMode::Shooter;
    }

    pub fn stop_shooter(&mut self) {
        self.shooter.stop();
        if self.mode == GameMode::Shooter {
            self.mode = GameMode::None;
        }
    }

    /// Start the volley round; clears both entity lists
    pub fn start_volley(&mut self, seed: u64) {
        if self.shooter.is_active() {
            self.shooter.stop();
        }
        self.shooter.enemies.clear();
        self.volley.start(seed);
        self.mode = GameMode::Volley;
    }

    pub fn stop_volley(&mut self) {
        self.volley.stop();
        if self.mode == GameMode::Volley {
            self.mode = GameMode::None;
        }
    }

    pub fn reset_shooter_score(&mut self) {
        self.shooter.reset_score();
    }

    pub fn reset_volley_score(&mut self) {
        self.volley.reset_score();
    }

    /// Process one frame of perception results
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        let dt_ms = match self.last_frame_ms {
            Some(prev) => (input.timestamp_ms - prev).max(1.0),
            None => DEFAULT_FRAME_MS,
        };
        self.last_frame_ms = Some(input.timestamp_ms);
        let bounds = self.viewport.bounds();

        let mut report = FrameReport::default();
        let mut first_ray: Option<AimRay> = None;

        for hand_input in &input.hands {
            let set = &hand_input.landmarks;
            let shape = HandShape::from_landmarks(set);
            let gesture = shape.map(|s| s.label()).unwrap_or(HandGesture::None);

            let anchor = self.viewport.project_point(set, hand::WRIST);
            let (velocity, speed, action) = match anchor {
                Some(anchor) => {
                    let key = hand_input.side.key();
                    let sample = self.tracker.observe(key, anchor, input.timestamp_ms);
                    let mut action = None;
                    if self.tracker.wave(key) {
                        action = Some(MotionAction::Wave);
                    }
                    if detect_strike(
                        sample.velocity.x,
                        sample.velocity.y,
                        sample.prior_speed,
                        STRIKE_SPEED_THRESHOLD,
                    ) {
                        action = Some(MotionAction::Strike);
                    }
                    if action.is_none() && detect_swift_move(sample.speed, STRIKE_SPEED_THRESHOLD)
                    {
                        action = Some(MotionAction::SwiftMove);
                    }
                    (sample.velocity, sample.speed, action)
                }
                None => (Vec2::ZERO, 0.0, None),
            };

            // Aim rays only exist while something consumes them
            let wants_ray = self.mode != GameMode::None || !input.ui_targets.is_empty();
            let aim = if wants_ray {
                compute_aim_ray(set, &self.viewport)
            } else {
                None
            };

            let pointing = shape.map(|s| s.is_pointing()).unwrap_or(false);
            if let Some(ray) = aim.as_ref().filter(|_| pointing) {
                match self.mode {
                    GameMode::Shooter => {
                        report.shooter_kills += self.shooter.apply_beam(ray, &self.config);
                    }
                    GameMode::Volley => {
                        report.volley_hits += self.volley.apply_beam(ray, &self.config);
                    }
                    GameMode::None => {}
                }
            }

            // Second collision channel: open palm swats projectiles
            if self.mode == GameMode::Volley && gesture == HandGesture::Open {
                let palm = self.viewport.project_point(set, hand::PALM).or(anchor);
                if let Some(palm) = palm {
                    report.volley_hits += self.volley.apply_palm_strike(palm);
                }
            }

            if first_ray.is_none() {
                first_ray = aim;
            }
            report.hands.push(HandReport {
                side: hand_input.side,
                gesture,
                action,
                aim,
                anchor,
                velocity,
                speed,
            });
        }
        self.tracker.evict_absent();

        report.expression = input
            .faces
            .first()
            .map(|f| classify_expression(f))
            .unwrap_or_default();
        report.expression_summary = report.expression.summary();

        report.selections = self
            .dwell
            .update(first_ray.as_ref(), &input.ui_targets, input.timestamp_ms);

        let was_alive = self.player.is_alive();
        match self.mode {
            GameMode::Shooter => {
                self.shooter
                    .tick(dt_ms, bounds, &self.config, &mut self.player);
            }
            GameMode::Volley => self.volley.tick(dt_ms, bounds),
            GameMode::None => {}
        }
        report.player_down = was_alive && !self.player.is_alive();

        report.alert = self.evaluate_alert(input);
        report
    }

    fn evaluate_alert(&self, input: &FrameInput) -> Option<Alert> {
        if let Some(pose) = &input.pose {
            let wrists: Vec<Landmark> = input
                .hands
                .iter()
                .filter_map(|h| point(&h.landmarks, hand::WRIST))
                .collect();
            if detect_stance(pose, &wrists, ALERT_SENSITIVITY) {
                return Some(Alert::FightStance);
            }
        }
        if input.hands.iter().any(|h| gun_like_threat(&h.landmarks)) {
            return Some(Alert::GunLike);
        }
        if input.faces.len() > 1 {
            return Some(Alert::MultipleFaces(input.faces.len()));
        }
        None
    }
}

/// A gun-like or pointing hand held close-tipped or aimed at the camera
fn gun_like_threat(set: &[Landmark]) -> bool {
    let gesture = crate::gesture::classify_hand(set);
    if gesture != HandGesture::GunLike && gesture != HandGesture::Point {
        return false;
    }
    let tips_close = span(set, hand::THUMB_TIP, hand::INDEX_TIP)
        .is_some_and(|d| d < GUN_TIP_PROXIMITY / ALERT_SENSITIVITY);
    let z_forward = match (point(set, hand::THUMB_TIP), point(set, hand::INDEX_TIP)) {
        (Some(t), Some(i)) => (t.z + i.z) / 2.0 < GUN_FORWARD_Z,
        _ => false,
    };
    tips_close || z_forward
}
