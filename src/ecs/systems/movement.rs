use glam::Vec2;

use crate::ecs::components::{
    CreatureId, Heading, MovementPattern, Pattern, Position, Size, Speed, Status, Wander,
};
use crate::error::GameError;
use crate::viewport::Viewport;

/// Size at the very edge of the frame, in pixels.
const BASE_SIZE: f32 = 50.0;
/// Extra size at the center of the frame, before `size_change` scaling.
const SIZE_RANGE: f32 = 80.0;
/// Tilt (degrees) that maps to a full `reaction_speed` turn per tick.
const TILT_FULL_SCALE: f32 = 90.0;

/// Size for a creature whose center sits at `center`.
/// Largest in the middle of the frame, shrinking linearly toward the corners.
pub fn size_at(center: Vec2, viewport: &Viewport, size_change: f32) -> f32 {
    let max_dist = viewport.half_diagonal();
    let factor = if max_dist > 0.0 {
        1.0 - (center - viewport.center()).length() / max_dist
    } else {
        1.0
    };
    BASE_SIZE + factor * SIZE_RANGE * size_change
}

/// Random heading drift plus device-tilt steering.
pub fn steer(world: &mut hecs::World, tilt_x: f32, rng: &mut fastrand::Rng) {
    for (_, (heading, wander, status)) in
        world.query_mut::<(&mut Heading, &Wander, &Status)>()
    {
        if status.tracking {
            continue;
        }
        heading.0 += (rng.f32() - 0.5) * wander.randomness;
        heading.0 += wander.reaction_speed * (tilt_x / TILT_FULL_SCALE);
    }
}

/// Straight-line travel, wall bounces, pattern overlay, NaN repair and clamping.
pub fn integrate(
    world: &mut hecs::World,
    viewport: &Viewport,
    now_ms: f64,
    rng: &mut fastrand::Rng,
) {
    let t = now_ms / 1000.0;

    for (_, (id, pos, heading, speed, size, wander, pattern, status)) in world.query_mut::<(
        &CreatureId,
        &mut Position,
        &mut Heading,
        &Speed,
        &Size,
        &mut Wander,
        &mut Pattern,
        &Status,
    )>() {
        if status.tracking {
            continue;
        }

        pos.0 += Vec2::from_angle(heading.0) * speed.current;

        // Bounce: any edge at or past the border picks a fresh direction
        if viewport.touches_edge(pos.0, size.0) {
            heading.0 = rng.f32() * std::f32::consts::TAU;
            wander.growing = !wander.growing;
            wander.direction_changes = wander.direction_changes.wrapping_add(1);
        }

        if !status.escaping {
            pos.0 += pattern_offset(pattern, t, rng);
        }

        if !pos.0.is_finite() {
            log::warn!(
                "{}",
                GameError::NumericCorruption {
                    creature: id.0.clone(),
                    x: pos.0.x,
                    y: pos.0.y,
                }
            );
            pos.0 = viewport.random_anchor(rng, size.0);
            if !heading.0.is_finite() {
                heading.0 = rng.f32() * std::f32::consts::TAU;
            }
        }

        pos.0 = viewport.clamp_anchor(pos.0, size.0);
    }
}

/// Offset contributed by the movement pattern at wall-clock `t` seconds.
fn pattern_offset(pattern: &mut Pattern, t: f64, rng: &mut fastrand::Rng) -> Vec2 {
    match pattern.kind {
        MovementPattern::Oscillation {
            amplitude,
            frequency,
        } => {
            let phase = t * frequency as f64;
            Vec2::new(phase.sin() as f32, phase.cos() as f32) * amplitude
        }
        MovementPattern::Jitter { intensity } => {
            Vec2::new(rng.f32() - 0.5, rng.f32() - 0.5) * intensity
        }
        MovementPattern::Loop { speed, radius } => {
            let phase = t * speed as f64;
            Vec2::new(phase.cos() as f32, phase.sin() as f32) * radius
        }
        MovementPattern::Jump {
            interval_secs,
            distance,
        } => {
            let due = pattern
                .last_jump_secs
                .is_none_or(|last| t - last > interval_secs as f64);
            if due {
                pattern.last_jump_secs = Some(t);
                Vec2::from_angle(rng.f32() * std::f32::consts::TAU) * distance
            } else {
                Vec2::ZERO
            }
        }
    }
}

/// Recompute size from position. Never accumulated.
pub fn resize(world: &mut hecs::World, viewport: &Viewport) {
    for (_, (pos, size, wander)) in world.query_mut::<(&mut Position, &mut Size, &Wander)>() {
        let center = size.center_of(pos.0);
        size.0 = size_at(center, viewport, wander.size_change);
        // A slightly bigger element must still fit.
        pos.0 = viewport.clamp_anchor(pos.0, size.0);
    }
}

/// Refresh visual rotation, but only every `rotate_every`-th direction change.
pub fn rotate(world: &mut hecs::World) {
    for (_, (heading, wander)) in world.query_mut::<(&Heading, &mut Wander)>() {
        if wander.direction_changes % wander.rotate_every.max(1) == 0 {
            wander.rotation = heading.0;
        }
    }
}
