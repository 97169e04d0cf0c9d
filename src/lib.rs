//! # neural-backdrop
//!
//! An animated particle-network backdrop for a portfolio page, plus the
//! small page effects that run next to it.
//!
//! Particles drift across a canvas, bounce off its edges and get pushed away
//! by the pointer. Any two particles closer than a threshold are joined by a
//! line that fades with distance. Particle count and sizes follow a device
//! profile picked from the viewport: a lighter one for phones, a denser one
//! for desktops.
//!
//! ## Quick Start
//!
//! ```ignore
//! use neural_backdrop::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     Backdrop::new()
//!         .with_size(1280.0, 720.0)
//!         .with_seed(7)
//!         .run()
//! }
//! ```
//!
//! In the browser the `wasm32` build exports `start()`, which binds to
//! `<canvas id="neural-network">` and wires the page effects.
//!
//! ## Core Concepts
//!
//! ### Widget
//!
//! [`NeuralNetworkWidget`] owns the particles and draws them through any
//! [`Canvas2d`]. Each frame it simulates every particle first, then clears
//! and draws, so all connections are measured against the same positions.
//!
//! ### Rules
//!
//! Per-frame motion is a list of [`Rule`]s applied to each particle in order:
//!
//! ```ignore
//! Rule::Integrate                    // move by velocity
//! Rule::BounceEdges                  // reflect off the canvas edges
//! Rule::Damping(0.995)               // friction
//! Rule::SpeedFloor { min: 0.05 }     // never come to rest
//! Rule::PointerRepel { strength }    // push away from the pointer
//! ```
//!
//! ### Profiles
//!
//! [`DeviceProfile::resolve`] maps a [`Viewport`] to particle count, size
//! multiplier, glow radius and line width. Crossing the mobile/desktop
//! breakpoint on resize respawns the particle set.
//!
//! ### Page effects
//!
//! [`page`] holds the loading splash, the typing headline, scroll and
//! reveal effects, the mobile menu, contact copying, the visit counter and
//! the visitor location label. They are plain state machines; the hosts
//! drive them with timers and DOM events.
//!
//! ## Hosts
//!
//! | Host | Canvas | Frames |
//! |------|--------|--------|
//! | [`Backdrop`] (native) | [`gpu::GpuCanvas`] via wgpu | `RedrawRequested` |
//! | `web::start` (wasm32) | `CanvasRenderingContext2d` | `requestAnimationFrame` |
//! | tests, snapshots | [`Recorder`], [`RasterCanvas`] | [`CountingScheduler`] |

pub mod animation;
pub mod canvas;
pub mod config;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod gpu;
pub mod input;
pub mod page;
pub mod particle;
pub mod profile;
pub mod render;
pub mod rules;
#[cfg(not(target_arch = "wasm32"))]
mod simulation;
pub mod spawn;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod widget;

pub use animation::{AnimationLoop, CancelToken, CountingScheduler, FrameScheduler, LoopState};
pub use canvas::{Canvas2d, DrawCommand, Glow, RasterCanvas, Recorder};
pub use config::{
    BackdropConfig, ProfileConfig, Rgba, SimulationConfig, TierConfig, TypingConfig, VisualConfig,
};
#[cfg(not(target_arch = "wasm32"))]
pub use error::{BackdropError, GpuError};
pub use error::{ConfigError, GeoError, SnapshotError, StorageError};
pub use glam::Vec2;
pub use input::{
    MouseAdapter, MouseInput, PointerAdapter, PointerState, PointerTracker, PointerUpdate,
    TouchAdapter, TouchInput,
};
pub use particle::Particle;
pub use profile::{DeviceClass, DeviceProfile, Viewport};
pub use render::{connection_opacity, FrameStats, Renderer};
pub use rules::{Rule, StepContext};
#[cfg(not(target_arch = "wasm32"))]
pub use simulation::Backdrop;
pub use spawn::SpawnContext;
pub use time::FrameClock;
pub use widget::{NetworkState, NeuralNetworkWidget};

/// Convenient imports for common usage.
///
/// ```ignore
/// use neural_backdrop::prelude::*;
/// ```
///
/// This imports:
/// - [`NeuralNetworkWidget`] - the particle network bound to a canvas
/// - [`BackdropConfig`] - every tunable in one serializable struct
/// - [`Canvas2d`] - the drawing surface trait
/// - [`Rule`] - per-frame motion rules
/// - [`Viewport`], [`DeviceProfile`] - device tiering
/// - [`Backdrop`] - the native window host (not on wasm32)
pub mod prelude {
    pub use crate::animation::{CancelToken, CountingScheduler, FrameScheduler};
    pub use crate::canvas::{Canvas2d, Glow, RasterCanvas, Recorder};
    pub use crate::config::{BackdropConfig, Rgba};
    pub use crate::error::{ConfigError, SnapshotError};
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::error::BackdropError;
    pub use crate::input::{MouseAdapter, MouseInput, PointerUpdate, TouchAdapter, TouchInput};
    pub use crate::particle::Particle;
    pub use crate::profile::{DeviceClass, DeviceProfile, Viewport};
    pub use crate::rules::Rule;
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::simulation::Backdrop;
    pub use crate::spawn::SpawnContext;
    pub use crate::widget::NeuralNetworkWidget;
    pub use glam::Vec2;
}
