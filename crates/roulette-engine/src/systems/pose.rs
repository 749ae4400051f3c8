use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::core::angle::{normalize_angle, AngleModel};

/// What the renderer needs for one frame: wheel rotation and where the
/// marker sits on its track. Packed so it can be shared with JS as 4 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WheelPose {
    /// Wheel rotation in [0, 2π).
    pub wheel_rotation: f32,
    /// Marker angle in [0, 2π).
    pub marker_angle: f32,
    pub marker_x: f32,
    pub marker_y: f32,
}

impl WheelPose {
    pub const FLOATS: usize = 4;

    /// Angles are normalized in f64 before narrowing, so long sessions
    /// don't lose precision to large unwrapped values.
    pub fn from_angles(angles: &AngleModel, center: Vec2, track_radius: f32) -> Self {
        let wheel_rotation = normalize_angle(angles.wheel.angle) as f32;
        let marker_angle = normalize_angle(angles.marker.angle) as f32;
        let pos = center + Vec2::from_angle(marker_angle) * track_radius;
        Self {
            wheel_rotation,
            marker_angle,
            marker_x: pos.x,
            marker_y: pos.y,
        }
    }

    pub fn marker_pos(&self) -> Vec2 {
        Vec2::new(self.marker_x, self.marker_y)
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    #[test]
    fn marker_sits_on_track() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.marker.angle = FRAC_PI_2 + 3.0 * TAU;
        angles.wheel.angle = -1.0;
        let pose = WheelPose::from_angles(&angles, Vec2::splat(400.0), 264.0);
        assert!((pose.marker_pos() - Vec2::new(400.0, 664.0)).length() < 1e-3);
        assert!((pose.marker_angle - FRAC_PI_2 as f32).abs() < 1e-5);
        assert!((pose.wheel_rotation - (TAU - 1.0) as f32).abs() < 1e-5);
    }

    #[test]
    fn packs_as_floats() {
        let poses = [WheelPose::default()];
        let floats: &[f32] = bytemuck::cast_slice(&poses);
        assert_eq!(floats.len(), WheelPose::FLOATS);
    }
}
