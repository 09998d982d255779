//! Perspective camera for projecting the orbital scene onto a 2D canvas.

use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Fixed look-at camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            target,
            fov_y: fov_degrees.to_radians(),
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.position, config.target, config.fov_degrees)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, NEAR, FAR) * self.view_matrix()
    }

    /// Project a world point to pixel coordinates (origin top-left).
    ///
    /// Returns the pixel position and the clip-space `w` (view depth), or
    /// `None` when the point is behind the camera or the surface is empty.
    pub fn project(&self, world: Vec3, width: u32, height: u32) -> Option<(Vec2, f32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let aspect = width as f32 / height as f32;
        let clip = self.view_proj(aspect) * world.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let pixel = Vec2::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc.y) * 0.5 * height as f32,
        );
        Some((pixel, clip.w))
    }

    /// On-screen size in pixels of a world-space length seen at `depth`.
    pub fn pixel_scale(&self, world_size: f32, depth: f32, height: u32) -> f32 {
        if depth <= 0.0 {
            return 0.0;
        }
        world_size / (depth * (self.fov_y * 0.5).tan()) * height as f32 * 0.5
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
