use super::font::{glyph_rows, GLYPH_ADVANCE, GLYPH_WIDTH, TEXT_SCALE};
use super::sprites::{LoadedSprite, SpriteCache};
use super::{Color, Particle, Renderer};
use crate::app::scene::Vec2;

const PLACEHOLDER_COLOR: [u8; 4] = [220, 60, 220, 255];
const PROGRESS_TRACK_COLOR: [u8; 4] = [40, 40, 48, 255];

/// Software [`Renderer`] over an RGBA8 frame. Every write is clipped to the frame.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    sprites: &'a mut SpriteCache,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, sprites: &'a mut SpriteCache) -> Self {
        Self {
            frame,
            width,
            height,
            sprites,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn fill_rect_px(&mut self, left: i32, top: i32, right: i32, bottom: i32, rgba: [u8; 4]) {
        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.width as i32);
        let bottom = bottom.min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                blend_pixel_clipped(self.frame, self.width as usize, x, y, rgba);
            }
        }
    }
}

impl Renderer for PixelCanvas<'_> {
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let left = x.round() as i32;
        let top = y.round() as i32;
        self.fill_rect_px(
            left,
            top,
            left + width.round() as i32,
            top + height.round() as i32,
            color.to_rgba8(),
        );
    }

    fn draw_gradient_circle(&mut self, center: Vec2, radius: f32, alpha: f32, color: Color) {
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }
        let cx = center.x.round() as i32;
        let cy = center.y.round() as i32;
        let r = radius.ceil() as i32;
        for y in (cy - r).max(0)..(cy + r + 1).min(self.height as i32) {
            for x in (cx - r).max(0)..(cx + r + 1).min(self.width as i32) {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance > radius {
                    continue;
                }
                // Solid at the center, transparent at the rim.
                let falloff = 1.0 - distance / radius;
                let rgba = color.with_alpha(color.a * alpha * falloff).to_rgba8();
                blend_pixel_clipped(self.frame, self.width as usize, x, y, rgba);
            }
        }
    }

    fn draw_image(&mut self, image_key: &str, x: f32, y: f32, width: f32, height: f32) {
        let left = x.round() as i32;
        let top = y.round() as i32;
        let w = width.round().max(1.0) as i32;
        let h = height.round().max(1.0) as i32;
        match self.sprites.resolve(image_key) {
            Some(sprite) => blit_scaled(
                self.frame,
                self.width,
                self.height,
                sprite,
                (left, top, w, h),
            ),
            None => self.fill_rect_px(left, top, left + w, top + h, PLACEHOLDER_COLOR),
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        let rgba = color.to_rgba8();
        let mut pen_x = x.round() as i32;
        let top = y.round() as i32;
        for ch in text.chars() {
            for (row, bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = pen_x + col * TEXT_SCALE;
                    let py = top + row as i32 * TEXT_SCALE;
                    self.fill_rect_px(px, py, px + TEXT_SCALE, py + TEXT_SCALE, rgba);
                }
            }
            pen_x += GLYPH_ADVANCE;
        }
    }

    fn draw_progress_bar(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        progress: f32,
        color: Color,
    ) {
        let left = x.round() as i32;
        let top = y.round() as i32;
        let bottom = top + height.round() as i32;
        let full = width.round() as i32;
        let filled = (width * progress.clamp(0.0, 1.0)).round() as i32;
        self.fill_rect_px(left, top, left + full, bottom, PROGRESS_TRACK_COLOR);
        self.fill_rect_px(left, top, left + filled, bottom, color.to_rgba8());
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let rgba = color.to_rgba8();
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            blend_pixel_clipped(self.frame, self.width as usize, x0, y0, rgba);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x0 += step_x;
            }
            if doubled <= dx {
                err += dx;
                y0 += step_y;
            }
        }
    }

    fn draw_particles(&mut self, particles: &[Particle]) {
        for particle in particles {
            let size = particle.size();
            if size <= 0.0 {
                continue;
            }
            let half = size * 0.5;
            let rgba = particle
                .color
                .with_alpha(particle.color.a * particle.alpha())
                .to_rgba8();
            self.fill_rect_px(
                (particle.position.x - half).round() as i32,
                (particle.position.y - half).round() as i32,
                (particle.position.x + half).round() as i32,
                (particle.position.y + half).round() as i32,
                rgba,
            );
        }
    }
}

fn blend_pixel_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, rgba: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let Some(offset) = (y as usize)
        .checked_mul(width)
        .and_then(|row| row.checked_add(x as usize))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    let Some(dst) = frame.get_mut(offset..offset + 4) else {
        return;
    };
    match rgba[3] {
        0 => {}
        255 => dst.copy_from_slice(&rgba),
        alpha => {
            let a = u32::from(alpha);
            for channel in 0..3 {
                let src = u32::from(rgba[channel]);
                let old = u32::from(dst[channel]);
                dst[channel] = ((src * a + old * (255 - a)) / 255) as u8;
            }
            dst[3] = 255;
        }
    }
}

fn blit_scaled(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    sprite: &LoadedSprite,
    (left, top, width, height): (i32, i32, i32, i32),
) {
    if sprite.width == 0 || sprite.height == 0 || width <= 0 || height <= 0 {
        return;
    }
    if sprite.rgba.len() < sprite.width as usize * sprite.height as usize * 4 {
        return;
    }
    let draw_top = top.max(0);
    let draw_bottom = (top + height).min(frame_height as i32);
    let draw_left = left.max(0);
    let draw_right = (left + width).min(frame_width as i32);
    for out_y in draw_top..draw_bottom {
        let src_y = ((out_y - top) as u64 * u64::from(sprite.height) / height as u64) as usize;
        for out_x in draw_left..draw_right {
            let src_x = ((out_x - left) as u64 * u64::from(sprite.width) / width as u64) as usize;
            let src = (src_y * sprite.width as usize + src_x) * 4;
            let mut rgba = [0u8; 4];
            rgba.copy_from_slice(&sprite.rgba[src..src + 4]);
            blend_pixel_clipped(frame, frame_width as usize, out_x, out_y, rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const W: u32 = 16;
    const H: u32 = 12;

    fn with_canvas(draw: impl FnOnce(&mut PixelCanvas<'_>)) -> Vec<u8> {
        let mut frame = vec![0u8; (W * H * 4) as usize];
        let mut sprites = SpriteCache::new(PathBuf::from("definitely_missing_sprites_dir"));
        let mut canvas = PixelCanvas::new(&mut frame, W, H, &mut sprites);
        canvas.clear(Color::BLACK);
        draw(&mut canvas);
        frame
    }

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * W + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn lit_pixels(frame: &[u8]) -> usize {
        frame
            .chunks_exact(4)
            .filter(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
            .count()
    }

    #[test]
    fn rect_fills_exact_area() {
        let frame = with_canvas(|canvas| canvas.draw_rect(2.0, 3.0, 4.0, 2.0, Color::WHITE));
        assert_eq!(lit_pixels(&frame), 8);
        assert_eq!(pixel(&frame, 2, 3), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 5, 4), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 6, 4), [0, 0, 0, 255]);
    }

    #[test]
    fn offscreen_draws_are_clipped() {
        let frame = with_canvas(|canvas| {
            canvas.draw_rect(-100.0, -100.0, 1000.0, 3.0, Color::WHITE);
            canvas.draw_rect(W as f32 - 1.0, H as f32 - 1.0, 50.0, 50.0, Color::WHITE);
            canvas.draw_line(Vec2::new(-20.0, -20.0), Vec2::new(40.0, 40.0), Color::WHITE);
            canvas.draw_gradient_circle(Vec2::new(0.0, 0.0), 30.0, 1.0, Color::WHITE);
            canvas.draw_text("OFFSCREEN", 10.0, 10.0, Color::WHITE);
            canvas.draw_image("boss", 12.0, -5.0, 60.0, 60.0);
        });
        assert_eq!(frame.len(), (W * H * 4) as usize);
        assert_eq!(pixel(&frame, W - 1, H - 1), PLACEHOLDER_COLOR);
    }

    #[test]
    fn half_alpha_blends_with_background() {
        let frame = with_canvas(|canvas| {
            canvas.draw_rect(0.0, 0.0, 1.0, 1.0, Color::rgba(1.0, 0.0, 0.0, 0.5))
        });
        let [r, g, b, _] = pixel(&frame, 0, 0);
        assert!((127..=129).contains(&r), "r={r}");
        assert_eq!((g, b), (0, 0));
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        let frame = with_canvas(|canvas| {
            canvas.draw_progress_bar(0.0, 0.0, 10.0, 1.0, 0.3, Color::rgb(0.0, 1.0, 0.0))
        });
        assert_eq!(pixel(&frame, 2, 0), [0, 255, 0, 255]);
        assert_eq!(pixel(&frame, 3, 0), PROGRESS_TRACK_COLOR);
    }

    #[test]
    fn line_touches_both_endpoints() {
        let frame =
            with_canvas(|canvas| canvas.draw_line(Vec2::new(1.0, 1.0), Vec2::new(9.0, 5.0), Color::WHITE));
        assert_eq!(pixel(&frame, 1, 1), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 9, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn text_uses_glyph_bits() {
        let frame = with_canvas(|canvas| canvas.draw_text("-", 0.0, 0.0, Color::WHITE));
        // '-' is the middle row only: 3 columns at scale 2.
        assert_eq!(lit_pixels(&frame), (3 * TEXT_SCALE * TEXT_SCALE) as usize);
        assert_eq!(pixel(&frame, 0, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn gradient_circle_fades_toward_rim() {
        let frame = with_canvas(|canvas| {
            canvas.draw_gradient_circle(Vec2::new(6.0, 6.0), 5.0, 1.0, Color::WHITE)
        });
        let center = pixel(&frame, 6, 6)[0];
        let near_rim = pixel(&frame, 10, 6)[0];
        assert!(center > near_rim, "center={center} rim={near_rim}");
        assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 255]);
    }
}
