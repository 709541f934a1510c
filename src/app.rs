use instant::Instant;

use broukhunt::demo::{sweep_path, ScriptedHand, SyntheticCamera};
use broukhunt::pose::sampler::PoseSampler;
use broukhunt::render::{RenderFrame, RenderSink};
use broukhunt::{FrameDriver, GameConfig};

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Demo length in simulation ticks (one minute at 60 Hz).
const DEMO_TICKS: u64 = 60 * 60;
/// How often to log FPS and system timings (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;
/// The scripted hand crosses the frame and back this often (ms).
const SWEEP_PERIOD_MS: f64 = 6000.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    /// Returns true when a log line was written.
    fn record_frame(&mut self, dt: f64) -> bool {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed < FPS_LOG_INTERVAL {
            return false;
        }
        let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
        let fps = self.frames_since_log as f64 / elapsed;
        log::info!(
            "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
            fps,
            avg_ms,
            self.frame_time_min * 1000.0,
            self.frame_time_max * 1000.0,
            self.frame_count,
        );
        self.last_log_time = Instant::now();
        self.frame_time_sum = 0.0;
        self.frame_time_min = f64::MAX;
        self.frame_time_max = 0.0;
        self.frames_since_log = 0;
        true
    }
}

// ---------------------------------------------------------------------------
// Headless presentation
// ---------------------------------------------------------------------------

/// Stands in for the DOM: logs catch popups, counts what would be drawn.
#[derive(Default)]
struct LogSink {
    frames: u64,
    popups: u32,
    creatures_drawn: u64,
}

impl RenderSink for LogSink {
    fn submit(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        self.creatures_drawn += frame.creatures.len() as u64;
        if let Some(points) = frame.catch_popup {
            self.popups += 1;
            log::info!("+{points}! (score {})", frame.score);
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Load config, wire up the synthetic camera and hand, then run the demo.
pub fn run() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            GameConfig::from_file(&path)?
        }
        None => GameConfig::default(),
    };

    let (video_w, video_h) = config.video_size;
    let camera = SyntheticCamera::new(video_w, video_h);
    let detector = pollster::block_on(ScriptedHand::load(sweep_path(
        video_w,
        video_h,
        SWEEP_PERIOD_MS,
    )));
    let sampler = PoseSampler::from_init(detector);

    let mut driver = FrameDriver::new(&config, sampler, 0.0);
    let mut sink = LogSink::default();
    let mut stats = FrameStats::new();

    let start = Instant::now();
    let mut last_frame_time = start;
    let mut accumulator = 0.0;
    let mut tick_count: u64 = 0;
    let mut sim_ms = 0.0;

    while tick_count < DEMO_TICKS {
        let now = Instant::now();
        let dt = now.duration_since(last_frame_time).as_secs_f64();
        last_frame_time = now;

        accumulator = (accumulator + dt).min(MAX_ACCUMULATOR);
        while accumulator >= TICK_RATE && tick_count < DEMO_TICKS {
            sim_ms += TICK_RATE * 1000.0;
            camera.set_clock(sim_ms);
            driver.frame(sim_ms, &camera, &mut sink);
            accumulator -= TICK_RATE;
            tick_count += 1;
        }

        if stats.record_frame(dt) {
            log::info!("{}", driver.timers().summary());
            log::info!(
                "Score {} after {} catches | estimator calls {} ({} failed)",
                driver.session().score,
                driver.session().catches,
                driver.sampler().calls,
                driver.sampler().failures,
            );
        }

        std::thread::sleep(std::time::Duration::from_secs_f64(TICK_RATE / 2.0));
    }

    log::info!(
        "Demo finished in {:.1}s: {} ticks, score {}, {} catches, {} popups, {:.2} creatures/frame",
        start.elapsed().as_secs_f64(),
        tick_count,
        driver.session().score,
        driver.session().catches,
        sink.popups,
        sink.creatures_drawn as f64 / sink.frames.max(1) as f64,
    );
    Ok(())
}
