use glam::Vec3;

use crate::config::{GameConfig, Tuning};
use crate::creature;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::HandRef;
use crate::ecs::systems::{self, catch, collision::CollisionBuffers, movement, teleport};
use crate::ecs::systems::catch::CatchEvent;
use crate::pose::sampler::{FrameSource, PoseSampler};
use crate::render::{self, RenderFrame, RenderSink};
use crate::scheduler::{Deferred, Scheduler, TaskKind};
use crate::sensors::{self, ShakeDetector, Tilt};
use crate::session::GameSession;
use crate::viewport::{VideoScale, Viewport};

/// Everything the frame tick mutates. Owned by exactly one driver.
pub struct SimulationState {
    pub world: hecs::World,
    pub session: GameSession,
    pub scheduler: Scheduler,
    pub rng: fastrand::Rng,
    pub tilt: Tilt,
    pub shake: ShakeDetector,
    /// Set by a shake, consumed by the next frame.
    pub pending_shake: bool,
    pub viewport: Viewport,
    pub tuning: Tuning,
}

impl SimulationState {
    /// Fresh game: every configured creature spawned at the center.
    pub fn new(config: &GameConfig, now_ms: f64) -> Self {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let tuning = Tuning::from_config(config);
        let mut world = hecs::World::new();
        for params in &config.creatures {
            creature::spawn_creature(&mut world, params, &config.viewport, &mut rng);
        }

        Self {
            world,
            session: GameSession::new(now_ms, tuning.catch_time_ms),
            scheduler: Scheduler::new(),
            rng,
            tilt: Tilt::default(),
            shake: ShakeDetector::new(),
            pending_shake: false,
            viewport: config.viewport,
            tuning,
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub caught: Vec<CatchEvent>,
    pub pose_count: usize,
    /// The camera had no frame when the sampler wanted one.
    pub frame_source_error: bool,
    pub shake_applied: bool,
}

/// Runs the whole game one display refresh at a time.
pub struct FrameDriver {
    state: SimulationState,
    sampler: PoseSampler,
    show_poses: bool,

    // Reused every frame
    collision_bufs: CollisionBuffers,
    render_frame: RenderFrame,
    touching_buf: Vec<HandRef>,
    due_buf: Vec<Deferred>,

    timers: SystemTimers,
    frame_count: u64,
}

impl FrameDriver {
    pub fn new(config: &GameConfig, sampler: PoseSampler, now_ms: f64) -> Self {
        let state = SimulationState::new(config, now_ms);
        let capacity = config.creatures.len().max(1);
        log::info!(
            "Game started: {} creature(s), viewport {}x{}, catch time {:.0}ms, detector {}",
            capacity,
            state.viewport.width,
            state.viewport.height,
            state.tuning.catch_time_ms,
            if sampler.is_enabled() { "on" } else { "off" },
        );

        Self {
            state,
            sampler,
            show_poses: false,
            collision_bufs: CollisionBuffers::new(capacity),
            render_frame: RenderFrame::new(),
            touching_buf: Vec::with_capacity(capacity),
            due_buf: Vec::with_capacity(4),
            timers: SystemTimers::new(),
            frame_count: 0,
        }
    }

    /// One tick: deferred tasks, poses, creature systems, then the render frame.
    pub fn frame(
        &mut self,
        now_ms: f64,
        source: &dyn FrameSource,
        sink: &mut dyn RenderSink,
    ) -> FrameReport {
        let st = &mut self.state;
        let mut report = FrameReport::default();

        // 1. Respawns and reveals that came due
        self.timers.begin();
        st.scheduler.drain_due(now_ms, &mut self.due_buf);
        for task in &self.due_buf {
            match task.kind {
                TaskKind::Respawn => catch::respawn(
                    &mut st.world,
                    task.entity,
                    &mut st.session,
                    &mut st.scheduler,
                    &st.viewport,
                    now_ms,
                    &mut st.rng,
                ),
                TaskKind::Reveal => teleport::reveal(&mut st.world, task.entity),
            }
        }
        self.timers.end(SystemPhase::Deferred);

        // 2. Latest pose snapshot, never waiting on the detector
        self.timers.begin();
        let poses = self.sampler.sample(source, now_ms);
        self.timers.end(SystemPhase::PoseSample);
        report.pose_count = poses.len();
        report.frame_source_error = self.sampler.last_frame_error().is_some();

        let scale = source
            .dimensions()
            .and_then(|(w, h)| VideoScale::new(&st.viewport, w, h));

        // 3. Shake replaces this tick's kinematics
        let shaken = std::mem::take(&mut st.pending_shake);
        if shaken {
            sensors::reset_to_corners(&mut st.world, &st.viewport, &mut st.rng);
            report.shake_applied = true;
        }

        // 4-5. Creature systems and collision
        systems::tick(
            &mut st.world,
            &st.viewport,
            &poses,
            scale.as_ref(),
            st.tilt.x,
            &mut st.session,
            &mut st.scheduler,
            now_ms,
            &mut st.rng,
            !shaken,
            &mut self.collision_bufs,
            &mut report.caught,
            &mut self.timers,
        );

        // 6. Hand the frame to the presentation layer
        self.timers.begin();
        render::build_frame(
            &st.world,
            &poses,
            self.show_poses,
            &mut self.render_frame,
            &mut self.touching_buf,
        );
        self.render_frame.score = st.session.score;
        self.render_frame.phase = st.session.phase;
        self.render_frame.catch_popup = report.caught.last().map(|e| e.points);
        sink.submit(&self.render_frame);
        self.timers.end(SystemPhase::BuildFrame);

        self.frame_count += 1;
        report
    }

    /// Speed slider. Escape speed follows at 2.2x.
    pub fn set_base_speed(&mut self, speed: f32) {
        let speed = speed.max(0.0);
        self.state.tuning.base_speed = speed;
        creature::set_base_speed(&mut self.state.world, speed);
        log::debug!(
            "Base speed {:.1}, escape speed {:.1}",
            speed,
            self.state.tuning.escape_speed()
        );
    }

    /// Catch-time slider. Applies to contact already in progress.
    pub fn set_catch_time_secs(&mut self, secs: f32) {
        self.state.tuning.set_catch_time_secs(secs);
        self.state.session.catch_time_required_ms = self.state.tuning.catch_time_ms;
        log::debug!("Catch time {:.0}ms", self.state.tuning.catch_time_ms);
    }

    /// Device tilt in degrees, left/right.
    pub fn set_tilt(&mut self, degrees: f32) {
        self.state.tilt.set(degrees);
    }

    /// Raw accelerometer sample. Returns true if it triggered a shake reset,
    /// which is applied on the next frame.
    pub fn on_acceleration(&mut self, accel: Vec3, now_ms: f64) -> bool {
        let shaken = self.state.shake.observe(accel, now_ms);
        if shaken {
            log::info!("Shake detected ({:.1} m/s2)", accel.length());
            self.state.pending_shake = true;
        }
        shaken
    }

    /// New display rectangle (window resize or camera switch).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        log::info!(
            "Viewport now {}x{} at ({}, {})",
            viewport.width,
            viewport.height,
            viewport.left,
            viewport.top
        );
        self.state.viewport = viewport;
        movement::resize(&mut self.state.world, &viewport);
    }

    pub fn set_show_poses(&mut self, show: bool) {
        self.show_poses = show;
    }

    /// Swap the detector, e.g. after a camera switch.
    pub fn set_sampler(&mut self, sampler: PoseSampler) {
        self.sampler = sampler;
    }

    pub fn session(&self) -> &GameSession {
        &self.state.session
    }

    pub fn world(&self) -> &hecs::World {
        &self.state.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.state.world
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn sampler(&self) -> &PoseSampler {
        &self.sampler
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    /// The frame most recently handed to the sink.
    pub fn last_frame(&self) -> &RenderFrame {
        &self.render_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
