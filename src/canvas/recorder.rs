use glam::Vec2;

use super::{Canvas2d, Glow};
use crate::config::Rgba;

/// One captured draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Clear { origin: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32, color: Rgba, glow: Glow },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    SetGlow(Glow),
}

/// A surface that remembers what was drawn on it.
#[derive(Debug, Clone)]
pub struct Recorder {
    size: Vec2,
    glow: Glow,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            glow: Glow::NONE,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands since the most recent full clear, i.e. the last frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas2d for Recorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Clear { origin, size });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            glow: self.glow,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn set_glow(&mut self, glow: Glow) {
        self.glow = glow;
        self.commands.push(DrawCommand::SetGlow(glow));
    }
}
