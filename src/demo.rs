//! Stand-ins for the camera and the pose detector, for headless runs.

use std::cell::Cell;
use std::sync::Arc;

use glam::Vec2;

use crate::error::GameError;
use crate::pose::sampler::{FrameSource, PoseEstimator, PoseFuture, VideoFrame};
use crate::pose::{Keypoint, KeypointName, Pose};

/// Blank camera of a fixed size. Can be unplugged to exercise the
/// frame-source error path.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
    clock_ms: Cell<f64>,
    online: Cell<bool>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            // One gray RGBA pixel; nothing downstream reads the contents.
            pixels: Arc::from(vec![128u8; 4]),
            clock_ms: Cell::new(0.0),
            online: Cell::new(true),
        }
    }

    /// Timestamp stamped on the next frames.
    pub fn set_clock(&self, now_ms: f64) {
        self.clock_ms.set(now_ms);
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }
}

impl FrameSource for SyntheticCamera {
    fn current_frame(&self) -> Option<VideoFrame> {
        if !self.online.get() {
            return None;
        }
        Some(VideoFrame {
            width: self.width,
            height: self.height,
            timestamp_ms: self.clock_ms.get(),
            pixels: self.pixels.clone(),
        })
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.online.get().then_some((self.width, self.height))
    }
}

/// Where the scripted hand is at a frame timestamp, in video pixels.
pub type HandPath = Box<dyn FnMut(f64) -> Option<Vec2>>;

/// Detector that "sees" one person whose right wrist follows a script.
pub struct ScriptedHand {
    path: HandPath,
}

impl ScriptedHand {
    pub fn new(path: impl FnMut(f64) -> Option<Vec2> + 'static) -> Self {
        Self {
            path: Box::new(path),
        }
    }

    /// Async constructor, shaped like loading a real detector model.
    pub async fn load(path: impl FnMut(f64) -> Option<Vec2> + 'static) -> Result<Self, GameError> {
        Ok(Self::new(path))
    }

    /// Hand following [`sweep_path`].
    pub fn sweep(width: u32, height: u32, period_ms: f64) -> Self {
        Self::new(sweep_path(width, height, period_ms))
    }
}

/// A hand sweeping left to right across the frame and back every `period_ms`,
/// at half height.
pub fn sweep_path(width: u32, height: u32, period_ms: f64) -> impl FnMut(f64) -> Option<Vec2> {
    let (w, h) = (width as f32, height as f32);
    move |t| {
        let phase = (t / period_ms).fract() as f32;
        let along = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
        Some(Vec2::new(along * w, h * 0.5))
    }
}

impl PoseEstimator for ScriptedHand {
    fn estimate(&mut self, frame: &VideoFrame) -> PoseFuture {
        let poses = (self.path)(frame.timestamp_ms)
            .map(|wrist| vec![arm_pose(wrist)])
            .unwrap_or_default();
        Box::pin(std::future::ready(Ok(poses)))
    }
}

/// Confident right arm ending at `wrist`.
pub fn arm_pose(wrist: Vec2) -> Pose {
    Pose::new(
        0.9,
        vec![
            Keypoint::new(KeypointName::RightShoulder, wrist.x, wrist.y - 120.0, 0.9),
            Keypoint::new(KeypointName::RightElbow, wrist.x, wrist.y - 60.0, 0.8),
            Keypoint::new(KeypointName::RightWrist, wrist.x, wrist.y, 0.9),
        ],
    )
}
