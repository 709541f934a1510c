use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::error::GameError;
use crate::pose::{Pose, PoseSet};

/// Minimum time between two estimator calls (ms).
pub const POSE_INTERVAL_MS: f64 = 100.0;

/// Pending result of one estimation call.
pub type PoseFuture = Pin<Box<dyn Future<Output = Result<Vec<Pose>, GameError>>>>;

/// One camera frame, as handed to the estimator.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub timestamp_ms: f64,
    pub pixels: Arc<[u8]>,
}

/// Camera side of the pipeline. Swappable at runtime (device switch).
pub trait FrameSource {
    fn current_frame(&self) -> Option<VideoFrame>;
    /// Intrinsic video size, once known.
    fn dimensions(&self) -> Option<(u32, u32)>;
}

/// Pose detector. Calls are asynchronous and may fail.
pub trait PoseEstimator {
    fn estimate(&mut self, frame: &VideoFrame) -> PoseFuture;
}

/// Throttles estimator calls into a steady stream of cached snapshots.
///
/// At most one call is in flight. It is polled (never awaited) once per
/// `sample`, so the frame loop always gets the last good snapshot back
/// immediately. Failures are logged and swallowed.
pub struct PoseSampler {
    estimator: Option<Box<dyn PoseEstimator>>,
    in_flight: Option<PoseFuture>,
    cached: PoseSet,
    last_call_ms: Option<f64>,
    frame_error: Option<GameError>,
    pub calls: u64,
    pub failures: u64,
}

impl PoseSampler {
    pub fn new(estimator: impl PoseEstimator + 'static) -> Self {
        Self {
            estimator: Some(Box::new(estimator)),
            ..Self::disabled()
        }
    }

    /// No detector: always returns the empty snapshot ("no avoidance" mode).
    pub fn disabled() -> Self {
        Self {
            estimator: None,
            in_flight: None,
            cached: PoseSet::empty(),
            last_call_ms: None,
            frame_error: None,
            calls: 0,
            failures: 0,
        }
    }

    /// Build from the outcome of detector initialisation.
    pub fn from_init<E: PoseEstimator + 'static>(init: Result<E, GameError>) -> Self {
        match init {
            Ok(estimator) => {
                log::info!("Pose detector initialized");
                Self::new(estimator)
            }
            Err(e) => {
                log::error!("{e} - hand avoidance disabled for this session");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.estimator.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Frame source problem seen by the last call that needed a frame.
    pub fn last_frame_error(&self) -> Option<&GameError> {
        self.frame_error.as_ref()
    }

    pub fn cached(&self) -> &PoseSet {
        &self.cached
    }

    /// Current pose snapshot, kicking off a new estimation when due.
    pub fn sample(&mut self, source: &dyn FrameSource, now_ms: f64) -> PoseSet {
        if self.estimator.is_none() {
            return self.cached.clone();
        }

        // One call at a time: a pending call swallows this tick's slot.
        if self.in_flight.is_some() {
            self.poll_in_flight();
            return self.cached.clone();
        }

        if let Some(last) = self.last_call_ms {
            if now_ms - last < POSE_INTERVAL_MS {
                return self.cached.clone();
            }
        }

        let Some(frame) = source.current_frame() else {
            if self.frame_error.is_none() {
                log::warn!("{}", GameError::FrameSourceUnavailable);
            }
            self.frame_error = Some(GameError::FrameSourceUnavailable);
            return self.cached.clone();
        };
        if self.frame_error.take().is_some() {
            log::info!("Video frames available again");
        }

        let Some(estimator) = self.estimator.as_mut() else {
            return self.cached.clone();
        };
        self.last_call_ms = Some(now_ms);
        self.calls += 1;
        self.in_flight = Some(estimator.estimate(&frame));

        // Synchronous estimators resolve on the first poll.
        self.poll_in_flight();
        self.cached.clone()
    }

    fn poll_in_flight(&mut self) {
        let Some(fut) = self.in_flight.as_mut() else {
            return;
        };
        let mut cx = Context::from_waker(Waker::noop());
        let poll = fut.as_mut().poll(&mut cx);

        if let Poll::Ready(result) = poll {
            self.in_flight = None;
            match result {
                Ok(poses) => self.cached = poses.into(),
                Err(e) => {
                    self.failures += 1;
                    log::warn!("{e}");
                }
            }
        }
    }
}
