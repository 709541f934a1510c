use glam::Vec2;

use crate::ecs::components::{Heading, Position, Size, Status};
use crate::viewport::Viewport;

/// Pairs closer than this fraction of their average size overlap.
const OVERLAP_FACTOR: f32 = 0.8;
/// Fraction of the overlap pushed out per tick.
const PUSH_FRACTION: f32 = 0.3;
/// Max separation per creature per pair per tick (px).
const MAX_PUSH: f32 = 3.0;
/// Deflection from the separation axis instead of a random new heading (rad).
const DEFLECTION: f32 = 0.5;

struct Body {
    entity: hecs::Entity,
    center: Vec2,
    size: f32,
    heading: Option<f32>,
}

/// Scratch space reused across ticks.
#[derive(Default)]
pub struct CollisionBuffers {
    bodies: Vec<Body>,
}

impl CollisionBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(capacity),
        }
    }
}

/// Push overlapping creatures apart and deflect their headings.
///
/// Runs after every creature has moved. Pairs are handled in order, each
/// seeing the separation applied by earlier pairs.
pub fn resolve(world: &mut hecs::World, viewport: &Viewport, bufs: &mut CollisionBuffers) {
    // Read
    bufs.bodies.clear();
    for (entity, (pos, size, status)) in world.query::<(&Position, &Size, &Status)>().iter() {
        if status.tracking {
            continue;
        }
        bufs.bodies.push(Body {
            entity,
            center: Size(size.0).center_of(pos.0),
            size: size.0,
            heading: None,
        });
    }

    let count = bufs.bodies.len();
    if count < 2 {
        return;
    }

    let mut touched = false;
    for i in 0..count {
        for j in (i + 1)..count {
            let delta = bufs.bodies[i].center - bufs.bodies[j].center;
            let dist = delta.length();
            let min_dist = (bufs.bodies[i].size + bufs.bodies[j].size) * 0.5 * OVERLAP_FACTOR;

            // Coincident centers have no axis to separate along.
            if dist <= 0.0 || dist >= min_dist {
                continue;
            }

            let push = ((min_dist - dist) * PUSH_FRACTION).min(MAX_PUSH);
            let angle = delta.y.atan2(delta.x);
            let axis = Vec2::from_angle(angle);

            bufs.bodies[i].center += axis * push;
            bufs.bodies[j].center -= axis * push;
            bufs.bodies[i].heading = Some(angle + DEFLECTION);
            bufs.bodies[j].heading = Some(angle + std::f32::consts::PI - DEFLECTION);
            touched = true;
        }
    }

    if !touched {
        return;
    }

    // Write
    for body in &bufs.bodies {
        if let Ok((pos, heading)) = world.query_one_mut::<(&mut Position, &mut Heading)>(body.entity) {
            let anchor = body.center - Vec2::splat(body.size * 0.5);
            pos.0 = viewport.clamp_anchor(anchor, body.size);
            if let Some(h) = body.heading {
                heading.0 = h;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{spawn_creature, CreatureParams};

    fn pair(gap: Vec2) -> (hecs::World, hecs::Entity, hecs::Entity, Viewport) {
        let mut world = hecs::World::new();
        let vp = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let mut rng = fastrand::Rng::with_seed(5);
        let a = spawn_creature(&mut world, &CreatureParams::default(), &vp, &mut rng);
        let b = spawn_creature(&mut world, &CreatureParams::default(), &vp, &mut rng);
        for e in [a, b] {
            world.get::<&mut Size>(e).unwrap().0 = 100.0;
        }
        world.get::<&mut Position>(a).unwrap().0 = Vec2::new(300.0, 250.0);
        world.get::<&mut Position>(b).unwrap().0 = Vec2::new(300.0, 250.0) + gap;
        (world, a, b, vp)
    }

    fn center(world: &hecs::World, e: hecs::Entity) -> Vec2 {
        let pos = world.get::<&Position>(e).unwrap().0;
        world.get::<&Size>(e).unwrap().center_of(pos)
    }

    #[test]
    fn overlapping_pair_separates_symmetrically() {
        let (mut world, a, b, vp) = pair(Vec2::new(30.0, 40.0));
        let before_a = center(&world, a);
        let before_b = center(&world, b);
        let d = before_a.distance(before_b);
        assert!(d < 80.0);

        resolve(&mut world, &vp, &mut CollisionBuffers::default());

        let after_a = center(&world, a);
        let after_b = center(&world, b);
        assert!(after_a.distance(after_b) >= d);
        let push_a = (after_a - before_a).length();
        let push_b = (after_b - before_b).length();
        assert!(push_a <= MAX_PUSH + 1e-4 && push_b <= MAX_PUSH + 1e-4);
        assert!((push_a - push_b).abs() < 1e-4);
        // Overlap of 30px: 0.3 * 30 = 9, capped at 3
        assert!((push_a - 3.0).abs() < 1e-4);
    }

    #[test]
    fn headings_deflect_off_the_axis() {
        let (mut world, a, b, vp) = pair(Vec2::new(40.0, 0.0));
        resolve(&mut world, &vp, &mut CollisionBuffers::default());
        // b sits to the right of a, so the axis from b to a points left (pi).
        let ha = world.get::<&Heading>(a).unwrap().0;
        let hb = world.get::<&Heading>(b).unwrap().0;
        let pi = std::f32::consts::PI;
        assert!((ha - (pi + DEFLECTION)).abs() < 1e-5);
        assert!((hb - (2.0 * pi - DEFLECTION)).abs() < 1e-5);
    }

    #[test]
    fn small_overlap_uses_proportional_push() {
        // 78px apart, min distance 80: push 0.3 * 2 = 0.6
        let (mut world, a, b, vp) = pair(Vec2::new(78.0, 0.0));
        let before = center(&world, a);
        resolve(&mut world, &vp, &mut CollisionBuffers::default());
        assert!(((center(&world, a) - before).length() - 0.6).abs() < 1e-4);
        assert!(center(&world, a).distance(center(&world, b)) > 78.0);
    }

    #[test]
    fn far_apart_is_untouched() {
        let (mut world, a, _b, vp) = pair(Vec2::new(200.0, 0.0));
        let heading = world.get::<&Heading>(a).unwrap().0;
        resolve(&mut world, &vp, &mut CollisionBuffers::default());
        assert_eq!(world.get::<&Position>(a).unwrap().0, Vec2::new(300.0, 250.0));
        assert_eq!(world.get::<&Heading>(a).unwrap().0, heading);
    }

    #[test]
    fn coincident_pair_is_skipped() {
        let (mut world, a, b, vp) = pair(Vec2::ZERO);
        resolve(&mut world, &vp, &mut CollisionBuffers::default());
        let pa = world.get::<&Position>(a).unwrap().0;
        let pb = world.get::<&Position>(b).unwrap().0;
        assert!(pa.is_finite() && pb.is_finite());
        assert_eq!(pa, pb);
    }

    #[test]
    fn tracking_creatures_do_not_collide() {
        let (mut world, a, b, vp) = pair(Vec2::new(20.0, 0.0));
        world.get::<&mut Status>(a).unwrap().tracking = true;
        resolve(&mut world, &vp, &mut CollisionBuffers::default());
        assert_eq!(world.get::<&Position>(b).unwrap().0, Vec2::new(320.0, 250.0));
    }
}
