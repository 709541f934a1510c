use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ESCAPE_SPEED_RATIO;
use crate::ecs::components::*;
use crate::ecs::systems::catch::CatchState;
use crate::ecs::systems::movement::size_at;
use crate::viewport::Viewport;

/// Per-creature tunables. Defaults are the single beetle of the shipped game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureParams {
    pub id: String,
    pub base_speed: f32,
    pub escape_speed: f32,
    pub randomness: f32,
    pub reaction_speed: f32,
    pub size_change: f32,
    pub rotate_every: u32,
    pub pattern: MovementPattern,
    pub avoidance_radius: f32,
    pub catch_radius: f32,
}

impl Default for CreatureParams {
    fn default() -> Self {
        Self {
            id: "big_brouk".into(),
            base_speed: 3.0,
            escape_speed: 6.5,
            randomness: 0.5,
            reaction_speed: 0.15,
            size_change: 0.8,
            rotate_every: 3,
            pattern: MovementPattern::Oscillation {
                amplitude: 2.0,
                frequency: 0.08,
            },
            avoidance_radius: 200.0,
            catch_radius: 60.0,
        }
    }
}

/// Spawn one creature centered in the viewport, heading somewhere random.
pub fn spawn_creature(
    world: &mut hecs::World,
    params: &CreatureParams,
    viewport: &Viewport,
    rng: &mut fastrand::Rng,
) -> hecs::Entity {
    let size = size_at(viewport.center(), viewport, params.size_change);
    let anchor = viewport.clamp_anchor(viewport.center() - Vec2::splat(size * 0.5), size);
    let heading = rng.f32() * std::f32::consts::TAU;

    let entity = world.spawn((
        CreatureId(params.id.clone()),
        Position(anchor),
        Heading(heading),
        Speed {
            current: params.base_speed,
            base: params.base_speed,
            escape: params.escape_speed,
        },
        Size(size),
        Wander {
            randomness: params.randomness,
            reaction_speed: params.reaction_speed,
            size_change: params.size_change,
            growing: true,
            direction_changes: 0,
            rotate_every: params.rotate_every.max(1),
            rotation: heading,
        },
        Pattern {
            kind: params.pattern,
            last_jump_secs: None,
        },
        Avoidance {
            avoidance_radius: params.avoidance_radius,
            catch_radius: params.catch_radius,
        },
        Status::in_play(),
        Touching::default(),
        CatchState::Idle,
    ));
    log::info!("Spawned {} at ({:.0}, {:.0})", params.id, anchor.x, anchor.y);
    entity
}

/// Live speed slider: every creature cruises at `speed`, flees at 2.2x.
pub fn set_base_speed(world: &mut hecs::World, speed: f32) {
    for (_, s) in world.query_mut::<&mut Speed>() {
        s.current = speed;
        s.base = speed;
        s.escape = speed * ESCAPE_SPEED_RATIO;
    }
}
