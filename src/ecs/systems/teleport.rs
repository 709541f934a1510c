use glam::Vec2;

use crate::ecs::components::{CreatureId, Position, Size, Status};
use crate::scheduler::{Scheduler, TaskKind};
use crate::viewport::Viewport;

/// Chance an edge teleport also hides the creature for a while.
const HIDE_CHANCE: f32 = 0.2;
/// How long a hidden creature stays hidden (ms).
pub const REVEAL_DELAY_MS: f64 = 10_000.0;

/// Wrap creatures touching an edge over to the opposite edge.
///
/// One in five also disappears and comes back after `REVEAL_DELAY_MS`.
pub fn update(
    world: &mut hecs::World,
    viewport: &Viewport,
    scheduler: &mut Scheduler,
    now_ms: f64,
    rng: &mut fastrand::Rng,
) {
    for (entity, (id, pos, size, status)) in
        world.query_mut::<(&CreatureId, &mut Position, &Size, &mut Status)>()
    {
        if status.tracking || !viewport.touches_edge(pos.0, size.0) {
            continue;
        }

        let hide = rng.f32() < HIDE_CHANCE;
        pos.0 = opposite_edge(viewport, pos.0, size.0);

        if hide {
            status.concealed = true;
            scheduler.schedule(entity, TaskKind::Reveal, now_ms + REVEAL_DELAY_MS);
            log::debug!("{} vanished, reappearing at ({:.0}, {:.0})", id.0, pos.0.x, pos.0.y);
        } else {
            log::debug!("{} wrapped to ({:.0}, {:.0})", id.0, pos.0.x, pos.0.y);
        }
    }
}

/// Mirror each touching axis onto the far side of the frame.
pub fn opposite_edge(viewport: &Viewport, pos: Vec2, size: f32) -> Vec2 {
    let max = viewport.max_anchor(size);
    let mut out = pos;

    if pos.x <= viewport.left {
        out.x = max.x;
    } else if pos.x >= max.x {
        out.x = viewport.left;
    }

    if pos.y <= viewport.top {
        out.y = max.y;
    } else if pos.y >= max.y {
        out.y = viewport.top;
    }
    out
}

/// Reveal task fired: show the creature again.
pub fn reveal(world: &mut hecs::World, entity: hecs::Entity) {
    if let Ok(status) = world.query_one_mut::<&mut Status>(entity) {
        status.concealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{spawn_creature, CreatureParams};

    #[test]
    fn mirrors_each_axis() {
        let vp = Viewport::new(10.0, 20.0, 800.0, 600.0);
        assert_eq!(opposite_edge(&vp, Vec2::new(10.0, 300.0), 50.0), Vec2::new(760.0, 300.0));
        assert_eq!(opposite_edge(&vp, Vec2::new(760.0, 300.0), 50.0), Vec2::new(10.0, 300.0));
        assert_eq!(opposite_edge(&vp, Vec2::new(10.0, 20.0), 50.0), Vec2::new(760.0, 570.0));
        assert_eq!(opposite_edge(&vp, Vec2::new(400.0, 570.0), 50.0), Vec2::new(400.0, 20.0));
    }

    #[test]
    fn edge_creatures_wrap_and_sometimes_hide() {
        let vp = Viewport::default();
        let mut rng = fastrand::Rng::with_seed(17);
        let mut hidden = 0;
        let trials = 500;

        for _ in 0..trials {
            let mut world = hecs::World::new();
            let mut scheduler = Scheduler::new();
            let e = spawn_creature(&mut world, &CreatureParams::default(), &vp, &mut rng);
            world.get::<&mut Position>(e).unwrap().0 = Vec2::new(0.0, 200.0);
            let size = world.get::<&Size>(e).unwrap().0;

            update(&mut world, &vp, &mut scheduler, 1000.0, &mut rng);

            assert_eq!(world.get::<&Position>(e).unwrap().0, Vec2::new(800.0 - size, 200.0));
            let status = *world.get::<&Status>(e).unwrap();
            if status.concealed {
                hidden += 1;
                assert!(scheduler.is_pending(e, TaskKind::Reveal));
                reveal(&mut world, e);
                assert!(!world.get::<&Status>(e).unwrap().concealed);
            } else {
                assert!(scheduler.is_empty());
            }
        }
        // 20% nominal
        assert!(hidden > 50 && hidden < 160, "hidden {hidden} of {trials}");
    }

    #[test]
    fn interior_creatures_stay_put() {
        let vp = Viewport::default();
        let mut rng = fastrand::Rng::with_seed(2);
        let mut world = hecs::World::new();
        let mut scheduler = Scheduler::new();
        let e = spawn_creature(&mut world, &CreatureParams::default(), &vp, &mut rng);
        let start = world.get::<&Position>(e).unwrap().0;
        update(&mut world, &vp, &mut scheduler, 0.0, &mut rng);
        assert_eq!(world.get::<&Position>(e).unwrap().0, start);
    }
}
