mod canvas;
mod font;
mod sprites;
mod window;

pub use canvas::PixelCanvas;
pub use sprites::{SpriteCache, SpriteKeyError};
pub use window::FrameRenderer;

use super::scene::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub(crate) fn to_rgba8(self) -> [u8; 4] {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub base_size: f32,
    pub color: Color,
}

impl Particle {
    fn life_fraction(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            0.0
        } else {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn alpha(&self) -> f32 {
        self.life_fraction()
    }

    pub fn size(&self) -> f32 {
        self.base_size * self.life_fraction()
    }
}

/// Drawing surface handed to scenes and components. Coordinates are window pixels with y down.
pub trait Renderer {
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn draw_gradient_circle(&mut self, center: Vec2, radius: f32, alpha: f32, color: Color);
    fn draw_image(&mut self, image_key: &str, x: f32, y: f32, width: f32, height: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
    #[allow(clippy::too_many_arguments)]
    fn draw_progress_bar(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        progress: f32,
        color: Color,
    );
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn draw_particles(&mut self, particles: &[Particle]);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    GradientCircle {
        center: Vec2,
        radius: f32,
        alpha: f32,
        color: Color,
    },
    Image {
        key: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Color,
    },
    ProgressBar {
        x: f32,
        y: f32,
        width: f32,
        progress: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
    },
    Particles {
        count: usize,
    },
}

/// Headless renderer that records every call, for tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_gradient_circle(&mut self, center: Vec2, radius: f32, alpha: f32, color: Color) {
        self.commands.push(DrawCommand::GradientCircle {
            center,
            radius,
            alpha,
            color,
        });
    }

    fn draw_image(&mut self, image_key: &str, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Image {
            key: image_key.to_string(),
            x,
            y,
            width,
            height,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }

    fn draw_progress_bar(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        _height: f32,
        progress: f32,
        _color: Color,
    ) {
        self.commands.push(DrawCommand::ProgressBar {
            x,
            y,
            width,
            progress,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, _color: Color) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn draw_particles(&mut self, particles: &[Particle]) {
        self.commands.push(DrawCommand::Particles {
            count: particles.len(),
        });
    }
}
