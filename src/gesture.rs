//! Per-frame gesture and expression classification
//!
//! Everything in this module is a pure function of a single frame's
//! landmark set. Temporal patterns (waves, strikes) live in [`crate::tracker`].
//!
//! Gesture precedence is an ordered predicate/label list evaluated first
//! match wins; the ordering is load-bearing and covered by tests.

use serde::{Deserialize, Serialize};

use crate::bend_angle_deg;
use crate::consts::*;
use crate::landmark::{face, hand, point, span, Landmark};

/// Discrete hand pose, recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandGesture {
    Open,
    Fist,
    GunLike,
    Peace,
    Point,
    Thumb,
    ThumbsUp,
    Pinch,
    Partial,
    #[default]
    None,
}

impl HandGesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandGesture::Open => "open",
            HandGesture::Fist => "fist",
            HandGesture::GunLike => "gun-like",
            HandGesture::Peace => "peace",
            HandGesture::Point => "point",
            HandGesture::Thumb => "thumb",
            HandGesture::ThumbsUp => "thumbs-up",
            HandGesture::Pinch => "pinch",
            HandGesture::Partial => "partial",
            HandGesture::None => "none",
        }
    }
}

/// Per-digit extension flags plus the derived pinch/raise features
///
/// A missing landmark degrades the digit to "not extended" and the pinch
/// distance to "far apart"; a shape can always be built from any
/// non-empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandShape {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
    pub pinched: bool,
    pub thumb_raised: bool,
}

impl HandShape {
    /// Extract the shape from a hand landmark set; `None` for an empty set
    pub fn from_landmarks(set: &[Landmark]) -> Option<Self> {
        if set.is_empty() {
            return None;
        }
        let thumb = thumb_extended(set);
        let thumb_raised = thumb
            && match (point(set, hand::THUMB_TIP), point(set, hand::WRIST)) {
                (Some(tip), Some(wrist)) => tip.y < wrist.y - THUMB_RAISE_MARGIN,
                _ => false,
            };
        Some(Self {
            thumb,
            index: finger_extended(set, hand::INDEX_TIP, hand::INDEX_PIP, hand::INDEX_MCP),
            middle: finger_extended(set, hand::MIDDLE_TIP, hand::MIDDLE_PIP, hand::MIDDLE_MCP),
            ring: finger_extended(set, hand::RING_TIP, hand::RING_PIP, hand::RING_MCP),
            pinky: finger_extended(set, hand::PINKY_TIP, hand::PINKY_PIP, hand::PINKY_MCP),
            pinched: pinch_distance(set) < PINCH_MAX_DIST,
            thumb_raised,
        })
    }

    pub fn extended_count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&d| d)
            .count()
    }

    /// Index out, other fingers folded - the pose that fires the beam
    pub fn is_pointing(&self) -> bool {
        self.index && !self.middle && !self.ring && !self.pinky
    }

    fn thumb_only(&self) -> bool {
        self.thumb && !self.index && !self.middle && !self.ring && !self.pinky
    }

    /// Resolve the gesture label; first matching rule wins
    pub fn label(&self) -> HandGesture {
        let rules = [
            (self.extended_count() >= 4, HandGesture::Open),
            (self.extended_count() == 0, HandGesture::Fist),
            (
                self.thumb && self.is_pointing() && !self.pinched,
                HandGesture::GunLike,
            ),
            (
                self.index && self.middle && !self.thumb && !self.ring && !self.pinky,
                HandGesture::Peace,
            ),
            (self.is_pointing(), HandGesture::Point),
            (self.thumb_only() && self.thumb_raised, HandGesture::ThumbsUp),
            (self.thumb_only(), HandGesture::Thumb),
            (self.pinched, HandGesture::Pinch),
        ];
        rules
            .iter()
            .find(|(hit, _)| *hit)
            .map(|&(_, label)| label)
            .unwrap_or(HandGesture::Partial)
    }
}

/// Classify a hand landmark set into a gesture label
///
/// Total over all inputs: an empty set is `None`, anything else resolves
/// through the rule list.
pub fn classify_hand(set: &[Landmark]) -> HandGesture {
    match HandShape::from_landmarks(set) {
        Some(shape) => shape.label(),
        None => HandGesture::None,
    }
}

fn finger_extended(set: &[Landmark], tip: usize, pip: usize, mcp: usize) -> bool {
    let (Some(t), Some(p), Some(m)) = (point(set, tip), point(set, pip), point(set, mcp)) else {
        return false;
    };
    let bend = bend_angle_deg(m.xy(), p.xy(), t.xy());
    bend < FINGER_BEND_MAX_DEG && t.xy().distance(p.xy()) > FINGER_MIN_REACH
}

fn thumb_extended(set: &[Landmark]) -> bool {
    let (Some(tip), Some(mcp), Some(cmc)) = (
        point(set, hand::THUMB_TIP),
        point(set, hand::THUMB_MCP),
        point(set, hand::THUMB_CMC),
    ) else {
        return false;
    };
    let bend = bend_angle_deg(cmc.xy(), mcp.xy(), tip.xy());
    bend < THUMB_BEND_MAX_DEG && tip.xy().distance(mcp.xy()) > THUMB_MIN_REACH
}

/// Thumb tip to index tip distance; missing tips read as far apart
fn pinch_distance(set: &[Landmark]) -> f32 {
    span(set, hand::THUMB_TIP, hand::INDEX_TIP).unwrap_or(1.0)
}

/// Concurrent face expression flags for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Expression {
    pub blink: bool,
    pub left_wink: bool,
    pub right_wink: bool,
    pub mouth_open: bool,
    pub possible_laugh: bool,
    pub smile: bool,
}

impl Expression {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Live summary string for the control surface ("blink, smile" / "none")
    pub fn summary(&self) -> String {
        let mut flags = Vec::new();
        if self.blink {
            flags.push("blink");
        }
        if self.left_wink {
            flags.push("left wink");
        }
        if self.right_wink {
            flags.push("right wink");
        }
        if self.mouth_open {
            flags.push("mouth open");
        }
        if self.possible_laugh {
            flags.push("possible laugh");
        }
        if self.smile {
            flags.push("smile");
        }
        if flags.is_empty() {
            "none".to_string()
        } else {
            flags.join(", ")
        }
    }
}

/// Vertical eyelid distance over horizontal corner distance
///
/// 1.0 (wide open) when any landmark is missing, so an occluded eye never
/// reads as a blink.
pub fn eye_aspect_ratio(
    set: &[Landmark],
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
) -> f32 {
    let (Some(v), Some(h)) = (span(set, top, bottom), span(set, left, right)) else {
        return 1.0;
    };
    if h == 0.0 {
        return 1.0;
    }
    v / h
}

/// Vertical lip distance over horizontal mouth-corner distance
///
/// 0.0 (closed) when any landmark is missing.
pub fn mouth_aspect_ratio(set: &[Landmark]) -> f32 {
    let (Some(v), Some(h)) = (
        span(set, face::MOUTH_TOP, face::MOUTH_BOTTOM),
        span(set, face::MOUTH_LEFT, face::MOUTH_RIGHT),
    ) else {
        return 0.0;
    };
    if h == 0.0 {
        return 0.0;
    }
    v / h
}

fn detect_smile(set: &[Landmark]) -> bool {
    let (Some(w), Some(h)) = (
        span(set, face::MOUTH_LEFT, face::MOUTH_RIGHT),
        span(set, face::MOUTH_TOP, face::MOUTH_BOTTOM),
    ) else {
        return false;
    };
    if h == 0.0 {
        return false;
    }
    w / h > SMILE_MIN_RATIO
}

/// Classify a face landmark set into its expression flags
pub fn classify_expression(set: &[Landmark]) -> Expression {
    let ear_left = eye_aspect_ratio(
        set,
        face::LEFT_EYE_TOP,
        face::LEFT_EYE_BOTTOM,
        face::LEFT_EYE_LEFT,
        face::LEFT_EYE_RIGHT,
    );
    let ear_right = eye_aspect_ratio(
        set,
        face::RIGHT_EYE_TOP,
        face::RIGHT_EYE_BOTTOM,
        face::RIGHT_EYE_LEFT,
        face::RIGHT_EYE_RIGHT,
    );
    let mar = mouth_aspect_ratio(set);

    let both_closed = ear_left < BLINK_EAR && ear_right < BLINK_EAR;
    Expression {
        blink: both_closed,
        left_wink: !both_closed && ear_left < BLINK_EAR,
        right_wink: !both_closed && ear_right < BLINK_EAR,
        mouth_open: mar > MOUTH_OPEN_MAR,
        possible_laugh: mar > LAUGH_MAR,
        smile: detect_smile(set),
    }
}
