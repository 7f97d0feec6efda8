//! `<canvas>` 2D context backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, LineStyle, Surface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the canvas by element id and grab its 2D context.
    ///
    /// None when either is missing; the caller treats that as "stop drawing".
    pub fn acquire(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn viewport_size(&self) -> (u32, u32) {
        (
            self.canvas.client_width().max(0) as u32,
            self.canvas.client_height().max(0) as u32,
        )
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.ctx.set_line_cap(style.cap.as_str());
        self.ctx.set_stroke_style_str(&style.color.to_css());
        self.ctx.set_line_width(style.width as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }

    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x as f64, p.y as f64);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        // Only fails for a negative radius
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            start as f64,
            end as f64,
        );
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: &Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }
}
