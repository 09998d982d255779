//! Error types for Stardrift.
//!
//! The simulations themselves never fail: they clamp instead. Errors only
//! come from the edges of the crate - GPU setup, configuration files, the
//! event loop and image export.

use std::path::PathBuf;

/// Errors that can occur during GPU initialization.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error(
        "no compatible GPU adapter found; a Vulkan/Metal/DX12/WebGPU capable device is required"
    )]
    NoAdapter,
    /// The surface reports no usable texture format.
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur while loading or saving a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("config io error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("config validation error: {0}")]
    Invalid(String),
}

/// Errors that can occur when running the viewer or a headless render.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Writing a rendered frame to disk failed.
    #[error("failed to export frame: {0}")]
    Export(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = ConfigError::Invalid("friction must be in (0, 1]".into());
        assert_eq!(
            err.to_string(),
            "config validation error: friction must be in (0, 1]"
        );
    }

    #[test]
    fn test_run_error_wraps_gpu() {
        let err: RunError = GpuError::NoAdapter.into();
        assert!(err.to_string().starts_with("GPU error: no compatible GPU adapter"));
    }
}
