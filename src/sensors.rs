use glam::{Vec2, Vec3};

use crate::ecs::components::{Heading, Position, Size};
use crate::viewport::Viewport;

/// Acceleration magnitude (m/s², gravity included) that counts as a shake.
const SHAKE_THRESHOLD: f32 = 15.0;
/// Minimum time between two accepted shakes (ms).
const SHAKE_COOLDOWN_MS: f64 = 1000.0;
/// Corner slots sit this far in from the right/bottom edges.
const CORNER_INSET: f32 = 50.0;

/// Latest left/right device tilt in degrees. Zero until a sensor reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tilt {
    pub x: f32,
}

impl Tilt {
    pub fn set(&mut self, degrees: f32) {
        // A broken sensor reading must not poison every heading.
        self.x = if degrees.is_finite() { degrees } else { 0.0 };
    }
}

/// Debounced shake gesture from raw accelerometer samples.
#[derive(Debug, Clone, Default)]
pub struct ShakeDetector {
    last_shake_ms: Option<f64>,
}

impl ShakeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this sample is a new shake.
    pub fn observe(&mut self, accel: Vec3, now_ms: f64) -> bool {
        if let Some(last) = self.last_shake_ms {
            if now_ms - last <= SHAKE_COOLDOWN_MS {
                return false;
            }
        }
        if accel.length() > SHAKE_THRESHOLD {
            self.last_shake_ms = Some(now_ms);
            return true;
        }
        false
    }
}

/// Shake response: scatter creatures to the four corners, fresh random headings.
/// Corner slots are clamped so larger creatures still fit on screen.
pub fn reset_to_corners(world: &mut hecs::World, viewport: &Viewport, rng: &mut fastrand::Rng) {
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(viewport.width - CORNER_INSET, 0.0),
        Vec2::new(0.0, viewport.height - CORNER_INSET),
        Vec2::new(viewport.width - CORNER_INSET, viewport.height - CORNER_INSET),
    ];
    let origin = Vec2::new(viewport.left, viewport.top);

    for (index, (_, (pos, heading, size))) in world
        .query_mut::<(&mut Position, &mut Heading, &Size)>()
        .into_iter()
        .enumerate()
    {
        pos.0 = viewport.clamp_anchor(origin + corners[index % corners.len()], size.0);
        heading.0 = rng.f32() * std::f32::consts::TAU;
    }
    log::debug!("Shake: creatures reset to corners");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{spawn_creature, CreatureParams};

    #[test]
    fn shake_needs_magnitude_and_cooldown() {
        let mut shake = ShakeDetector::new();
        assert!(!shake.observe(Vec3::new(0.0, 9.8, 0.0), 0.0));
        assert!(shake.observe(Vec3::new(12.0, 9.8, 3.0), 100.0));
        assert!(!shake.observe(Vec3::new(20.0, 20.0, 0.0), 900.0));
        assert!(!shake.observe(Vec3::new(20.0, 20.0, 0.0), 1100.0));
        assert!(shake.observe(Vec3::new(20.0, 20.0, 0.0), 1101.0));
    }

    #[test]
    fn tilt_ignores_garbage() {
        let mut tilt = Tilt::default();
        tilt.set(30.0);
        assert_eq!(tilt.x, 30.0);
        tilt.set(f32::NAN);
        assert_eq!(tilt.x, 0.0);
    }

    #[test]
    fn corners_are_assigned_in_order() {
        let vp = Viewport::new(10.0, 20.0, 800.0, 600.0);
        let mut rng = fastrand::Rng::with_seed(8);
        let mut world = hecs::World::new();
        let ids: Vec<_> = (0..5)
            .map(|_| spawn_creature(&mut world, &CreatureParams::default(), &vp, &mut rng))
            .collect();

        // Spawned at the center, so every creature is 114px.
        reset_to_corners(&mut world, &vp, &mut rng);

        let mut seen: Vec<Vec2> = ids
            .iter()
            .map(|&e| world.get::<&Position>(e).unwrap().0)
            .collect();
        seen.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        assert_eq!(
            seen,
            vec![
                Vec2::new(10.0, 20.0),
                Vec2::new(10.0, 20.0),
                Vec2::new(10.0, 506.0),
                Vec2::new(696.0, 20.0),
                Vec2::new(696.0, 506.0),
            ]
        );
    }
}
