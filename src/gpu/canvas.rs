//! CPU-side batching of draw calls into GPU instance data.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::canvas::{Canvas2d, Glow};
use crate::config::Rgba;

/// One filled circle, matching the `CircleInstance` vertex layout in
/// `circle.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// Halo blur; zero for no halo.
    pub glow: f32,
    pub color: [f32; 4],
    pub glow_color: [f32; 4],
}

impl CircleInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32,
        2 => Float32,
        3 => Float32x4,
        4 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One stroked segment, matching `LineInstance` in `line.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

impl LineInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A [`Canvas2d`] that collects one frame of circles and lines for
/// [`super::GpuState::render`].
///
/// Lines are drawn before circles, so particles always sit on top of their
/// connections. Any clear empties both batches; the surface itself is
/// cleared to the background color by the render pass.
#[derive(Debug, Clone)]
pub struct GpuCanvas {
    size: Vec2,
    glow: Glow,
    circles: Vec<CircleInstance>,
    lines: Vec<LineInstance>,
}

impl GpuCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            glow: Glow::NONE,
            circles: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn circles(&self) -> &[CircleInstance] {
        &self.circles
    }

    pub fn lines(&self) -> &[LineInstance] {
        &self.lines
    }
}

impl Canvas2d for GpuCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
        self.circles.clear();
        self.lines.clear();
    }

    fn clear_rect(&mut self, _origin: Vec2, _size: Vec2) {
        self.circles.clear();
        self.lines.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (glow, glow_color) = if self.glow.is_visible() {
            (self.glow.blur, self.glow.color)
        } else {
            (0.0, Rgba::TRANSPARENT)
        };
        self.circles.push(CircleInstance {
            center: center.to_array(),
            radius,
            glow,
            color: color.to_array(),
            glow_color: glow_color.to_array(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.lines.push(LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            color: color.to_array(),
            width,
            _pad: [0.0; 3],
        });
    }

    fn set_glow(&mut self, glow: Glow) {
        self.glow = glow;
    }
}
