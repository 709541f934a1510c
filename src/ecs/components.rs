use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::pose::KeypointName;

/// Stable creature name, used as the key for logs and the render registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureId(pub String);

/// Top-left anchor in viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Travel direction in radians.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// Per-tick step lengths in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Speed {
    /// Step applied this tick.
    pub current: f32,
    /// Cruising speed restored when an escape ends.
    pub base: f32,
    /// Step while fleeing a hand.
    pub escape: f32,
}

/// Rendered edge length in pixels. Derived from position every tick.
#[derive(Debug, Clone, Copy)]
pub struct Size(pub f32);

impl Size {
    /// Center of an element of this size anchored at `anchor`.
    pub fn center_of(self, anchor: Vec2) -> Vec2 {
        anchor + Vec2::splat(self.0 * 0.5)
    }
}

/// Free-roaming drift parameters and bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct Wander {
    /// Amplitude of random heading drift per tick.
    pub randomness: f32,
    /// How strongly device tilt steers the heading.
    pub reaction_speed: f32,
    /// Scales how much the size swings between edge and center.
    pub size_change: f32,
    /// Flipped on every wall bounce.
    pub growing: bool,
    pub direction_changes: u32,
    /// Visual rotation is refreshed only every Nth direction change.
    pub rotate_every: u32,
    /// Last applied visual rotation (radians).
    pub rotation: f32,
}

/// Secondary motion layered on top of straight travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Sinusoidal sway along both axes.
    Oscillation { amplitude: f32, frequency: f32 },
    /// Small random shake.
    Jitter { intensity: f32 },
    /// Circular looping displacement.
    Loop { speed: f32, radius: f32 },
    /// Discrete hop in a random direction every `interval_secs`.
    Jump { interval_secs: f32, distance: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub kind: MovementPattern,
    /// Wall-clock seconds of the last jump, for `MovementPattern::Jump`.
    pub last_jump_secs: Option<f64>,
}

/// Hand proximity thresholds in viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct Avoidance {
    /// Hands closer than this make the creature flee.
    pub avoidance_radius: f32,
    /// Hands closer than this start the catch timer.
    pub catch_radius: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    /// Fleeing a hand this tick. Suppresses the movement pattern.
    pub escaping: bool,
    /// Driven by an alternate tracking mode; default kinematics and collisions skip it.
    pub tracking: bool,
    /// In play. False between a catch and the respawn.
    pub visible: bool,
    /// Hidden mid-teleport. Still simulated, just not drawn.
    pub concealed: bool,
}

impl Status {
    pub fn in_play() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    pub fn drawn(&self) -> bool {
        self.visible && !self.concealed
    }
}

/// Lookup into the current pose snapshot. Never outlives the tick it was built in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandRef {
    pub pose_index: usize,
    pub keypoint: KeypointName,
    /// Hand position in viewport space.
    pub position: Vec2,
}

/// The hand currently inside the catch radius, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Touching(pub Option<HandRef>);
