use bytemuck::{Pod, Zeroable};

pub const PRESENT_SOURCE: &str = include_str!("present.wgsl");

/// Loading overlay parameters, mirrored by `Overlay` in the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OverlayUniforms {
    /// 0 hides the overlay entirely.
    pub opacity: f32,
    /// Progress bar fill in `[0, 1]`.
    pub progress: f32,
    pub resolution: [f32; 2],
}

impl OverlayUniforms {
    pub fn new(opacity: f32, progress: f32, width: u32, height: u32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            progress: progress.clamp(0.0, 1.0),
            resolution: [width as f32, height as f32],
        }
    }
}
