//! Whole-game scenarios driven frame by frame through `FrameDriver`.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use broukhunt::demo::{ScriptedHand, SyntheticCamera};
use broukhunt::creature::CreatureParams;
use broukhunt::ecs::components::{CreatureId, MovementPattern, Position, Size, Speed, Status};
use broukhunt::ecs::systems::catch::{RESPAWN_DELAY_MS, RESPAWN_SPEED};
use broukhunt::pose::sampler::PoseSampler;
use broukhunt::render::{NullSink, RenderFrame, RenderSink};
use broukhunt::session::Phase;
use broukhunt::{FrameDriver, GameConfig, GameError};

/// Default viewport is 800x600, default video 640x480.
const VIDEO_TO_VIEWPORT: f32 = 1.25;

fn seeded(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

/// Center of the only creature, in viewport pixels.
fn creature_center(driver: &FrameDriver) -> Vec2 {
    let mut query = driver.world().query::<(&Position, &Size)>();
    let (_, (pos, size)) = query.iter().next().expect("one creature");
    size.center_of(pos.0)
}

/// Keeps every submitted frame's popup.
#[derive(Default)]
struct PopupSink {
    popups: Vec<u32>,
}

impl RenderSink for PopupSink {
    fn submit(&mut self, frame: &RenderFrame) {
        if let Some(points) = frame.catch_popup {
            self.popups.push(points);
        }
    }
}

// ============================================================================
// Catch and respawn
// ============================================================================

#[test]
fn test_holding_a_hand_on_the_creature_catches_it_and_it_respawns() {
    let hand: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let script = hand.clone();
    let sampler = PoseSampler::new(ScriptedHand::new(move |_| script.get()));
    let mut driver = FrameDriver::new(&seeded(3), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);
    let mut sink = PopupSink::default();

    // 100 ms frames so every frame gets a fresh pose.
    let mut now = 0.0;
    let mut caught_at = None;
    for _ in 0..20 {
        now += 100.0;
        camera.set_clock(now);
        hand.set(Some(creature_center(&driver) / VIDEO_TO_VIEWPORT));
        let report = driver.frame(now, &camera, &mut sink);
        if let Some(event) = report.caught.first() {
            caught_at = Some(now);
            assert_eq!(event.creature, "big_brouk");
            assert_eq!(event.score, event.points);
            break;
        }
    }

    // Contact from t=100, 500 ms required
    let caught_at = caught_at.expect("creature should be caught");
    assert_eq!(caught_at, 600.0);
    assert_eq!(driver.session().phase, Phase::Caught);
    assert_eq!(driver.session().catches, 1);
    let points = driver.session().score;
    assert!((90..=100).contains(&points), "points {points}");
    assert_eq!(sink.popups, vec![points]);
    assert!(driver.last_frame().creatures.is_empty());

    // Hand gone; nothing happens until the respawn delay is over.
    hand.set(None);
    now += 100.0;
    camera.set_clock(now);
    driver.frame(now, &camera, &mut sink);
    assert_eq!(driver.session().phase, Phase::Caught);

    let respawn_at = caught_at + RESPAWN_DELAY_MS;
    driver.frame(respawn_at, &camera, &mut sink);
    assert_eq!(driver.session().phase, Phase::Playing);
    assert_eq!(driver.session().started_ms, respawn_at);
    assert_eq!(driver.session().score, points);

    let mut query = driver.world().query::<(&Status, &Speed)>();
    let (_, (status, speed)) = query.iter().next().unwrap();
    assert!(status.visible);
    assert_eq!(driver.last_frame().creatures.len(), 1);
    // Still flagged escaping from the chase, so the first calm tick drops
    // the respawn speed for base speed.
    assert_ne!(speed.current, RESPAWN_SPEED);
    assert_eq!(speed.current, speed.base);
}

#[test]
fn test_brief_touches_never_catch() {
    let hand: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let script = hand.clone();
    let sampler = PoseSampler::new(ScriptedHand::new(move |_| script.get()));
    let mut driver = FrameDriver::new(&seeded(5), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);

    // Touch for 300 ms, let go for 100 ms, repeat.
    let mut now = 0.0;
    for frame in 0..40 {
        now += 100.0;
        camera.set_clock(now);
        let touching = frame % 4 != 3;
        hand.set(touching.then(|| creature_center(&driver) / VIDEO_TO_VIEWPORT));
        let report = driver.frame(now, &camera, &mut NullSink);
        assert!(report.caught.is_empty(), "caught at frame {frame}");
    }
    assert_eq!(driver.session().score, 0);
}

#[test]
fn test_catch_time_slider_applies_mid_game() {
    let hand: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let script = hand.clone();
    let sampler = PoseSampler::new(ScriptedHand::new(move |_| script.get()));
    let mut driver = FrameDriver::new(&seeded(9), sampler, 0.0);
    driver.set_catch_time_secs(0.0);
    let camera = SyntheticCamera::new(640, 480);

    // Zero catch time: first tick starts contact, second tick captures.
    let mut caught = 0;
    for i in 1..=2 {
        let now = i as f64 * 100.0;
        camera.set_clock(now);
        hand.set(Some(creature_center(&driver) / VIDEO_TO_VIEWPORT));
        caught += driver.frame(now, &camera, &mut NullSink).caught.len();
    }
    assert_eq!(caught, 1);
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn test_a_nearby_hand_makes_the_creature_flee() {
    let hand: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let script = hand.clone();
    let sampler = PoseSampler::new(ScriptedHand::new(move |_| script.get()));
    let mut driver = FrameDriver::new(&seeded(11), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);

    // 150 px to the left of the creature: inside avoidance, outside catch.
    let start = creature_center(&driver);
    hand.set(Some((start - Vec2::new(150.0, 0.0)) / VIDEO_TO_VIEWPORT));
    camera.set_clock(100.0);
    driver.frame(100.0, &camera, &mut NullSink);

    let after = creature_center(&driver);
    assert!(after.x > start.x, "moved from {start} to {after}");

    let mut query = driver.world().query::<(&Status, &Speed)>();
    let (_, (status, speed)) = query.iter().next().unwrap();
    assert!(status.escaping);
    assert_eq!(speed.current, speed.escape);
}

// ============================================================================
// Robustness
// ============================================================================

#[test]
fn test_creatures_stay_in_bounds_over_a_long_run() {
    let config = GameConfig {
        seed: Some(21),
        creatures: vec![
            Default::default(),
            CreatureParams {
                id: "jumper".into(),
                pattern: MovementPattern::Jump {
                    interval_secs: 1.0,
                    distance: 80.0,
                },
                ..Default::default()
            },
            CreatureParams {
                id: "jitter".into(),
                pattern: MovementPattern::Jitter { intensity: 6.0 },
                base_speed: 9.0,
                ..Default::default()
            },
        ],
        ..GameConfig::default()
    };
    let sampler = PoseSampler::new(ScriptedHand::sweep(640, 480, 3000.0));
    let mut driver = FrameDriver::new(&config, sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);
    let viewport = config.viewport;

    for i in 1..=3000 {
        let now = i as f64 * 16.0;
        camera.set_clock(now);
        driver.set_tilt(if i % 600 < 300 { 45.0 } else { -45.0 });
        driver.frame(now, &camera, &mut NullSink);

        for (_, (id, pos, size)) in driver
            .world()
            .query::<(&CreatureId, &Position, &Size)>()
            .iter()
        {
            assert!(pos.0.is_finite(), "{} non-finite at frame {i}", id.0);
            assert_eq!(
                viewport.clamp_anchor(pos.0, size.0),
                pos.0,
                "{} out of bounds at frame {i}",
                id.0
            );
        }
    }
}

#[test]
fn test_detector_failure_disables_avoidance_but_game_runs() {
    let init: Result<ScriptedHand, GameError> =
        Err(GameError::EstimatorUnavailable("model download failed".into()));
    let sampler = PoseSampler::from_init(init);
    assert!(!sampler.is_enabled());

    let mut driver = FrameDriver::new(&seeded(1), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);
    for i in 1..=200 {
        let report = driver.frame(i as f64 * 16.0, &camera, &mut NullSink);
        assert_eq!(report.pose_count, 0);
    }
    assert_eq!(driver.last_frame().creatures.len(), 1);
}

#[test]
fn test_unplugged_camera_keeps_the_last_poses() {
    let sampler = PoseSampler::new(ScriptedHand::new(|_| Some(Vec2::new(20.0, 20.0))));
    let mut driver = FrameDriver::new(&seeded(2), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);

    let report = driver.frame(100.0, &camera, &mut NullSink);
    assert_eq!(report.pose_count, 1);
    assert!(!report.frame_source_error);

    camera.set_online(false);
    let report = driver.frame(250.0, &camera, &mut NullSink);
    assert!(report.frame_source_error);
    assert_eq!(report.pose_count, 1);

    camera.set_online(true);
    let report = driver.frame(400.0, &camera, &mut NullSink);
    assert!(!report.frame_source_error);
}

#[test]
fn test_overlay_follows_the_show_poses_toggle() {
    let sampler = PoseSampler::new(ScriptedHand::new(|_| Some(Vec2::new(20.0, 20.0))));
    let mut driver = FrameDriver::new(&seeded(4), sampler, 0.0);
    let camera = SyntheticCamera::new(640, 480);

    // Hidden until toggled on.
    driver.frame(84.0, &camera, &mut NullSink);
    assert!(driver.last_frame().keypoints.is_empty());

    driver.set_show_poses(true);
    driver.frame(100.0, &camera, &mut NullSink);
    assert_eq!(driver.last_frame().keypoints.len(), 3);
    assert_eq!(driver.last_frame().bones.len(), 2);

    driver.set_show_poses(false);
    driver.frame(116.0, &camera, &mut NullSink);
    assert!(driver.last_frame().keypoints.is_empty());
    assert!(driver.last_frame().bones.is_empty());
}
