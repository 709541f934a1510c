pub mod catch;
pub mod collision;
pub mod movement;
pub mod teleport;
pub mod threat;

use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::pose::PoseSet;
use crate::scheduler::Scheduler;
use crate::session::GameSession;
use crate::viewport::{VideoScale, Viewport};
use catch::CatchEvent;
use collision::CollisionBuffers;

/// Run all creature systems for one frame.
///
/// `kinematics` is false on the tick a shake reset was applied; the threat
/// resolver and collision still run so a hand already on a creature counts.
#[allow(clippy::too_many_arguments)]
pub fn tick(
    world: &mut hecs::World,
    viewport: &Viewport,
    poses: &PoseSet,
    scale: Option<&VideoScale>,
    tilt_x: f32,
    session: &mut GameSession,
    scheduler: &mut Scheduler,
    now_ms: f64,
    rng: &mut fastrand::Rng,
    kinematics: bool,
    collision_bufs: &mut CollisionBuffers,
    events: &mut Vec<CatchEvent>,
    timers: &mut SystemTimers,
) {
    // 1. Random drift + tilt steering
    if kinematics {
        timers.begin();
        movement::steer(world, tilt_x, rng);
        timers.end(SystemPhase::Steer);
    }

    // 2. Flee hands, advance catch machine
    timers.begin();
    threat::update(world, viewport, poses, scale, session, scheduler, now_ms, events);
    timers.end(SystemPhase::Threat);

    if kinematics {
        // 3. Translate, bounce, pattern overlay, resize, rotation
        timers.begin();
        movement::integrate(world, viewport, now_ms, rng);
        movement::resize(world, viewport);
        movement::rotate(world);
        timers.end(SystemPhase::Kinematics);

        // 4. Edge wrap, sometimes hiding
        timers.begin();
        teleport::update(world, viewport, scheduler, now_ms, rng);
        timers.end(SystemPhase::Teleport);
    }

    // 5. Pairwise separation after everyone has moved
    timers.begin();
    collision::resolve(world, viewport, collision_bufs);
    timers.end(SystemPhase::Collision);
}
