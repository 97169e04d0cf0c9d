//! Drawable 2D surfaces.
//!
//! The renderer only talks to [`Canvas2d`], a small subset of the HTML canvas
//! API: resize, clear, filled circle, stroked line and a shadow/glow setting.
//! Backends:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`Recorder`] | Captures draw calls; used by tests |
//! | [`RasterCanvas`] | CPU rasterizer into an `image::RgbaImage`; headless snapshots |
//! | [`crate::gpu::GpuCanvas`] | Batches calls into instance buffers for wgpu |
//! | `WebCanvas` (wasm32) | Forwards to `CanvasRenderingContext2d` |

mod raster;
mod recorder;

pub use raster::RasterCanvas;
pub use recorder::{DrawCommand, Recorder};

use glam::Vec2;

use crate::config::Rgba;

/// Shadow settings applied to subsequent fills, like the canvas
/// `shadowBlur`/`shadowColor` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgba,
}

impl Glow {
    pub const NONE: Glow = Glow {
        blur: 0.0,
        color: Rgba::TRANSPARENT,
    };

    pub fn is_visible(&self) -> bool {
        self.blur > 0.0 && self.color.a > 0.0
    }
}

/// A drawable surface with a fixed pixel size.
pub trait Canvas2d {
    /// Current size in pixels.
    fn size(&self) -> Vec2;

    /// Change the pixel size. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32);

    /// Clear a rectangle to the surface's background (transparent unless the
    /// backend was given one).
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);

    /// Fill a circle, honoring the current glow.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line segment.
    ///
    /// Backends may apply the current glow here too, as the HTML canvas does,
    /// so callers turn the glow off before stroking.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Set the glow used by later fills; [`Glow::NONE`] turns it off.
    fn set_glow(&mut self, glow: Glow);

    /// Clear the whole surface.
    fn clear(&mut self) {
        let size = self.size();
        self.clear_rect(Vec2::ZERO, size);
    }
}
