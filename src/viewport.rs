use glam::Vec2;
use serde::{Deserialize, Serialize};

/// On-screen video rectangle in viewport pixels. Creatures live in here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Distance from the center to a corner.
    pub fn half_diagonal(&self) -> f32 {
        Vec2::new(self.width * 0.5, self.height * 0.5).length()
    }

    /// Largest top-left anchor that keeps an element of `size` fully inside.
    /// Never smaller than the top-left corner, even for oversized elements.
    pub fn max_anchor(&self, size: f32) -> Vec2 {
        Vec2::new(
            (self.right() - size).max(self.left),
            (self.bottom() - size).max(self.top),
        )
    }

    /// Clamp a top-left anchor so the whole element stays on screen.
    pub fn clamp_anchor(&self, pos: Vec2, size: f32) -> Vec2 {
        let max = self.max_anchor(size);
        Vec2::new(pos.x.clamp(self.left, max.x), pos.y.clamp(self.top, max.y))
    }

    /// True when any edge of the element sits on (or past) the frame border.
    pub fn touches_edge(&self, pos: Vec2, size: f32) -> bool {
        let max = self.max_anchor(size);
        pos.x <= self.left || pos.x >= max.x || pos.y <= self.top || pos.y >= max.y
    }

    /// Uniformly random in-bounds anchor.
    pub fn random_anchor(&self, rng: &mut fastrand::Rng, size: f32) -> Vec2 {
        let max = self.max_anchor(size);
        Vec2::new(
            self.left + rng.f32() * (max.x - self.left),
            self.top + rng.f32() * (max.y - self.top),
        )
    }
}

/// Maps estimator frame coordinates (intrinsic video pixels) into viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoScale {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl VideoScale {
    /// Returns `None` for a degenerate (zero-sized) video.
    pub fn new(viewport: &Viewport, video_w: u32, video_h: u32) -> Option<Self> {
        if video_w == 0 || video_h == 0 {
            return None;
        }
        Some(Self {
            scale: Vec2::new(
                viewport.width / video_w as f32,
                viewport.height / video_h as f32,
            ),
            offset: Vec2::new(viewport.left, viewport.top),
        })
    }

    pub fn to_viewport(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}
