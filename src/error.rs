//! Error types for boidlight.
//!
//! Kernels never fail; they resolve every edge case in-band. These errors
//! belong to the host side: validating buffers before a dispatch, bringing
//! up a GPU device, and loading configuration.

use std::fmt;

/// Errors raised when validating a dispatch before running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The read and write buffers of a ping-pong pair differ in length.
    LengthMismatch { now: usize, next: usize },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::LengthMismatch { now, next } => write!(
                f,
                "Boid buffers differ in length: now has {} elements, next has {}",
                now, next
            ),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Errors that can occur during GPU initialization and readback.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
    /// A flock needs at least one boid to bind its storage buffers.
    EmptyFlock,
    /// The flock has more boids than a dispatch can index.
    TooManyBoids(usize),
    /// Host-side validation rejected the dispatch.
    Dispatch(DispatchError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
            GpuError::EmptyFlock => write!(f, "Cannot upload an empty flock to the GPU"),
            GpuError::TooManyBoids(n) => {
                write!(f, "Flock of {} boids exceeds the u32 invocation range", n)
            }
            GpuError::Dispatch(e) => write!(f, "Invalid dispatch: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

impl From<DispatchError> for GpuError {
    fn from(e: DispatchError) -> Self {
        GpuError::Dispatch(e)
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid JSON for this configuration.
    Json(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
