use glam::Vec2;

use crate::ecs::components::HandRef;
use crate::pose::{KeypointName, PoseSet, MIN_SCORE, SKELETON};

const RED: u32 = 0xFF00_00FF;
const GREEN: u32 = 0x00FF_00FF;
const YELLOW: u32 = 0xFFFF_00FF;

/// Marker radius for an ordinary keypoint.
const MARKER_RADIUS: f32 = 5.0;
/// Marker radius for a wrist currently touching a creature.
const TOUCHING_RADIUS: f32 = 8.0;
/// Dashed ring drawn around confident wrists; matches the catch radius.
pub const CATCH_RING_RADIUS: f32 = 60.0;
/// Keypoints above this are drawn green rather than yellow.
const HIGH_CONFIDENCE: f32 = 0.5;

/// One keypoint dot, in estimator frame space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointMarker {
    pub pose_index: usize,
    pub name: KeypointName,
    pub position: Vec2,
    pub radius: f32,
    pub color: u32,
    pub touching: bool,
    /// Catch ring radius for wrists, `None` for everything else.
    pub ring: Option<f32>,
}

/// Skeleton segment between two confident keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub from: Vec2,
    pub to: Vec2,
}

/// Skeleton and keypoint markers for every confident pose.
pub fn build(
    poses: &PoseSet,
    touching: &[HandRef],
    markers: &mut Vec<KeypointMarker>,
    bones: &mut Vec<Bone>,
) {
    markers.clear();
    bones.clear();

    for (pose_index, pose) in poses.iter().enumerate() {
        if pose.score < MIN_SCORE {
            continue;
        }

        for (a, b) in SKELETON {
            if let (Some(a), Some(b)) = (pose.keypoint(a), pose.keypoint(b)) {
                if a.score > MIN_SCORE && b.score > MIN_SCORE {
                    bones.push(Bone {
                        from: a.position,
                        to: b.position,
                    });
                }
            }
        }

        for kp in &pose.keypoints {
            if kp.score < MIN_SCORE {
                continue;
            }
            let is_touching = kp.name.is_wrist()
                && touching
                    .iter()
                    .any(|h| h.pose_index == pose_index && h.keypoint == kp.name);
            let color = if is_touching {
                RED
            } else if kp.score > HIGH_CONFIDENCE {
                GREEN
            } else {
                YELLOW
            };
            markers.push(KeypointMarker {
                pose_index,
                name: kp.name,
                position: kp.position,
                radius: if is_touching {
                    TOUCHING_RADIUS
                } else {
                    MARKER_RADIUS
                },
                color,
                touching: is_touching,
                ring: kp.name.is_wrist().then_some(CATCH_RING_RADIUS),
            });
        }
    }
}
