//! Error types for neural-backdrop.
//!
//! The simulation and renderer themselves are infallible; these cover the
//! edges: GPU setup, the window host, configuration files, snapshots,
//! storage and the geolocation lookup.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan/Metal/DX12/GL capable GPU is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur while running the native window host.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Failed to create or run the event loop.
    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur while loading or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur while writing a headless snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Image(#[from] image::ImageError),
    #[error("snapshot size must be non-zero, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Errors from a key-value store backing the visit counter.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a geolocation provider. Never shown to the visitor; they only
/// select the next fallback.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("provider returned no usable location")]
    NoLocation,
}
