//! Error types for morphgen.
//!
//! The generators themselves never fail: bad parameters are clamped and
//! degenerate inputs produce empty output. Errors only surface at the edges,
//! when presets are read from disk or when the optional GPU backend starts up.

use thiserror::Error;

/// Errors that can occur while loading or saving a parameter preset.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the preset file.
    #[error("failed to access preset file: {0}")]
    Io(#[from] std::io::Error),
    /// The preset was not valid JSON for a [`Snapshot`](crate::Snapshot).
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization or readback.
#[cfg(feature = "gpu")]
#[derive(Debug, Error)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    #[error(
        "no compatible GPU adapter found; ensure your system supports WebGPU/Vulkan/Metal/DX12"
    )]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    #[error("failed to map GPU buffer: {0}")]
    BufferMapping(String),
}
