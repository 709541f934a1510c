pub mod instance;
pub mod overlay;

use crate::ecs::components::{HandRef, Position, Size, Status, Touching, Wander};
use crate::pose::PoseSet;
use crate::session::Phase;
use instance::CreatureInstance;
use overlay::{Bone, KeypointMarker};

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub creatures: Vec<CreatureInstance>,
    pub keypoints: Vec<KeypointMarker>,
    pub bones: Vec<Bone>,
    pub score: u32,
    pub phase: Phase,
    /// Points of the catch made this frame, for the "+N!" popup.
    pub catch_popup: Option<u32>,
}

impl RenderFrame {
    pub fn new() -> Self {
        Self {
            creatures: Vec::with_capacity(8),
            keypoints: Vec::with_capacity(34),
            bones: Vec::with_capacity(32),
            score: 0,
            phase: Phase::Playing,
            catch_popup: None,
        }
    }
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation boundary. The simulation never owns anything it draws.
pub trait RenderSink {
    fn submit(&mut self, frame: &RenderFrame);
}

/// Sink that drops every frame. For headless runs and tests.
pub struct NullSink;

impl RenderSink for NullSink {
    fn submit(&mut self, _frame: &RenderFrame) {}
}

/// Rebuild `frame` from the world. Buffers are reused.
///
/// `show_poses` toggles the skeleton overlay.
pub fn build_frame(
    world: &hecs::World,
    poses: &PoseSet,
    show_poses: bool,
    frame: &mut RenderFrame,
    touching_buf: &mut Vec<HandRef>,
) {
    frame.creatures.clear();
    touching_buf.clear();

    for (entity, (pos, size, wander, status, touching)) in world
        .query::<(&Position, &Size, &Wander, &Status, &Touching)>()
        .iter()
    {
        if let Some(hand) = touching.0 {
            touching_buf.push(hand);
        }
        if !status.drawn() {
            continue;
        }
        frame.creatures.push(CreatureInstance::from_components(
            entity.id(),
            pos,
            size,
            wander,
            touching,
        ));
    }

    if show_poses {
        overlay::build(poses, touching_buf, &mut frame.keypoints, &mut frame.bones);
    } else {
        frame.keypoints.clear();
        frame.bones.clear();
    }
}
