use glam::Vec2;

use crate::ecs::components::{
    Avoidance, CreatureId, HandRef, Heading, Position, Size, Speed, Status, Touching,
};
use crate::ecs::systems::catch::{self, CatchEvent, CatchState, Contact};
use crate::pose::{KeypointName, PoseSet, MIN_SCORE};
use crate::scheduler::Scheduler;
use crate::session::GameSession;
use crate::viewport::{VideoScale, Viewport};

/// Closest confident wrist to `center`, in viewport space, with its distance.
///
/// Every confident pose is considered; there is no identity across snapshots,
/// so the pick is made from scratch each call.
pub fn nearest_hand(poses: &PoseSet, scale: &VideoScale, center: Vec2) -> Option<(HandRef, f32)> {
    let mut best: Option<(HandRef, f32)> = None;

    for (pose_index, pose) in poses.iter().enumerate() {
        if pose.score < MIN_SCORE {
            continue;
        }
        for name in KeypointName::WRISTS {
            let Some(wrist) = pose.keypoint(name) else {
                continue;
            };
            if wrist.score < MIN_SCORE {
                continue;
            }
            let hand = scale.to_viewport(wrist.position);
            let dist = hand.distance(center);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((
                    HandRef {
                        pose_index,
                        keypoint: name,
                        position: hand,
                    },
                    dist,
                ));
            }
        }
    }
    best
}

/// Flee the nearest hand and feed the catch machine.
///
/// While escaping, this applies its own step along the escape heading on top
/// of the regular kinematic step later in the tick. Both are intended.
#[allow(clippy::too_many_arguments)]
pub fn update(
    world: &mut hecs::World,
    viewport: &Viewport,
    poses: &PoseSet,
    scale: Option<&VideoScale>,
    session: &mut GameSession,
    scheduler: &mut Scheduler,
    now_ms: f64,
    events: &mut Vec<CatchEvent>,
) {
    for (entity, (id, pos, heading, speed, size, avoidance, status, touching, catch_state)) in
        world.query_mut::<(
            &CreatureId,
            &mut Position,
            &mut Heading,
            &mut Speed,
            &Size,
            &Avoidance,
            &mut Status,
            &mut Touching,
            &mut CatchState,
        )>()
    {
        if !status.visible || status.tracking {
            continue;
        }

        let center = size.center_of(pos.0);
        let threat = scale
            .and_then(|s| nearest_hand(poses, s, center))
            .filter(|(_, dist)| *dist < avoidance.avoidance_radius);

        let Some((hand, dist)) = threat else {
            // Nothing close: calm down
            if status.escaping {
                speed.current = speed.base;
                status.escaping = false;
            }
            catch::release(catch_state);
            touching.0 = None;
            continue;
        };

        let inside = dist < avoidance.catch_radius;
        if inside {
            if catch::observe_contact(catch_state, session, now_ms) == Contact::Captured {
                events.push(catch::capture(
                    entity,
                    id,
                    catch_state,
                    status,
                    touching,
                    session,
                    scheduler,
                    now_ms,
                ));
                continue;
            }
        } else {
            catch::release(catch_state);
        }

        let away = center - hand.position;
        heading.0 = away.y.atan2(away.x);
        speed.current = speed.escape;
        touching.0 = inside.then_some(hand);
        pos.0 += Vec2::from_angle(heading.0) * speed.current;
        // Kinematics may not run after this (shake tick), so clamp here too.
        pos.0 = viewport.clamp_anchor(pos.0, size.0);
        status.escaping = true;
    }
}
