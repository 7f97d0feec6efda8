//! Headless surface that records every command

use glam::Vec2;

use super::{Color, LineStyle, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Clear,
    LineStyle(LineStyle),
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
    Stroke,
    FillDisc {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: (u32, u32),
    viewport: (u32, u32),
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            size: (0, 0),
            viewport: (viewport_width, viewport_height),
            commands: Vec::new(),
        }
    }

    /// Simulate the host window changing size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Drop recorded commands (call between frames to bound memory)
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All filled discs, in draw order
    pub fn discs(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillDisc {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.commands.push(DrawCommand::LineStyle(*style));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: Vec2) {
        self.commands.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Vec2) {
        self.commands.push(DrawCommand::LineTo(p));
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: &Color) {
        self.commands.push(DrawCommand::FillDisc {
            center,
            radius,
            color: *color,
        });
    }
}
