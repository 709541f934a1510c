use bytemuck::{Pod, Zeroable};

use crate::ecs::components::{Position, Size, Touching, Wander};

/// Normal tint (white, opaque).
const TINT_NORMAL: u32 = 0xFFFF_FFFF;
/// Red shift while a hand is touching.
const TINT_TOUCHED: u32 = 0xFF60_60FF;

/// Per-creature data handed to the renderer each frame.
/// Stride = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CreatureInstance {
    /// Top-left anchor in viewport pixels.
    pub position: [f32; 2],
    /// Edge length in pixels.
    pub size: f32,
    /// Rotation angle in radians.
    pub rotation: f32,
    /// RGBA color packed as u32.
    pub tint: u32,
    /// Registry key for the sprite, stable for the creature's lifetime.
    pub handle: u32,
}

impl CreatureInstance {
    pub fn from_components(
        handle: u32,
        pos: &Position,
        size: &Size,
        wander: &Wander,
        touching: &Touching,
    ) -> Self {
        Self {
            position: pos.0.into(),
            size: size.0,
            rotation: wander.rotation,
            tint: if touching.0.is_some() {
                TINT_TOUCHED
            } else {
                TINT_NORMAL
            },
            handle,
        }
    }

    pub fn is_touched(&self) -> bool {
        self.tint == TINT_TOUCHED
    }
}
