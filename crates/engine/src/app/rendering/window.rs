use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::{Color, PixelCanvas, SpriteCache};

const CLEAR_COLOR: Color = Color::rgb(0.08, 0.09, 0.11);

/// Owns the window surface and the sprite cache; hands a [`PixelCanvas`] to the scene each frame.
pub struct FrameRenderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    sprites: SpriteCache,
}

impl FrameRenderer {
    pub fn new(window: Arc<Window>, sprites_dir: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
            sprites: SpriteCache::new(sprites_dir),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn draw_frame(&mut self, draw: impl FnOnce(&mut PixelCanvas<'_>)) -> Result<(), Error> {
        let mut canvas = PixelCanvas::new(
            self.pixels.frame_mut(),
            self.width,
            self.height,
            &mut self.sprites,
        );
        canvas.clear(CLEAR_COLOR);
        draw(&mut canvas);
        self.pixels.render()
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}
