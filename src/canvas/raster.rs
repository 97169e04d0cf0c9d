use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use super::{Canvas2d, Glow};
use crate::config::Rgba;
use crate::error::SnapshotError;

/// Software rasterizer drawing into an RGBA image.
///
/// Shapes are anti-aliased with a one-pixel coverage ramp and composited
/// with straight-alpha "source over". The glow is a Gaussian halo around the
/// shape whose standard deviation is half the blur, matching how browsers
/// interpret `shadowBlur`.
pub struct RasterCanvas {
    image: RgbaImage,
    glow: Glow,
    background: Rgba,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            glow: Glow::NONE,
            background: Rgba::TRANSPARENT,
        }
    }

    /// Clear to `background` instead of transparent.
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Straight-alpha color of one pixel, channels in 0.0-1.0.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Rgba::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyCanvas { width, height });
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let sa = (color.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.pixel(x, y);
        let out_a = sa + dst.a * (1.0 - sa);
        let mix = |s: f32, d: f32| (s * sa + d * dst.a * (1.0 - sa)) / out_a;
        let out = [
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            out_a,
        ];
        self.image
            .put_pixel(x, y, image::Rgba(out.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)));
    }

    /// Visit every pixel in the box spanned by `min` and `max`, clipped to
    /// the image.
    fn for_each_pixel(&mut self, min: Vec2, max: Vec2, mut f: impl FnMut(&mut Self, u32, u32, Vec2)) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        if max.x < 0.0 || max.y < 0.0 || min.x >= width as f32 || min.y >= height as f32 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(width - 1);
        let y1 = (max.y.ceil() as u32).min(height - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                f(self, x, y, center);
            }
        }
    }

    /// Paint the glow halo around a shape described by its signed distance.
    fn paint_halo(&mut self, min: Vec2, max: Vec2, distance: impl Fn(Vec2) -> f32) {
        if !self.glow.is_visible() {
            return;
        }
        let glow = self.glow;
        let sigma = (glow.blur * 0.5).max(0.5);
        let reach = Vec2::splat(glow.blur * 1.5);
        self.for_each_pixel(min - reach, max + reach, |canvas, x, y, center| {
            let d = distance(center).max(0.0);
            let falloff = (-(d * d) / (2.0 * sigma * sigma)).exp();
            canvas.blend(x, y, glow.color, falloff);
        });
    }
}

impl Canvas2d for RasterCanvas {
    fn size(&self) -> Vec2 {
        let (w, h) = self.image.dimensions();
        Vec2::new(w as f32, h as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        let fill = image::Rgba(self.background.to_array().map(|c| (c * 255.0).round() as u8));
        self.for_each_pixel(origin, origin + size - Vec2::ONE, |canvas, x, y, _| {
            canvas.image.put_pixel(x, y, fill);
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let extent = Vec2::splat(radius + 1.0);
        let min = center - extent;
        let max = center + extent;

        self.paint_halo(min, max, |p| p.distance(center) - radius);
        self.for_each_pixel(min, max, |canvas, x, y, p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            canvas.blend(x, y, color, coverage);
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = width * 0.5;
        let extent = Vec2::splat(half + 1.0);
        let min = from.min(to) - extent;
        let max = from.max(to) + extent;

        self.paint_halo(min, max, |p| distance_to_segment(p, from, to) - half);
        self.for_each_pixel(min, max, |canvas, x, y, p| {
            let coverage = (half + 0.5 - distance_to_segment(p, from, to)).clamp(0.0, 1.0);
            canvas.blend(x, y, color, coverage);
        });
    }

    fn set_glow(&mut self, glow: Glow) {
        self.glow = glow;
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYAN: Rgba = Rgba::new(0.0, 0.85, 1.0, 1.0);

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut canvas = RasterCanvas::new(32, 32);
        canvas.fill_circle(Vec2::new(16.0, 16.0), 4.0, CYAN);

        assert_eq!(canvas.pixel(16, 16).a, 1.0);
        assert_eq!(canvas.pixel(0, 0).a, 0.0);
    }

    #[test]
    fn test_glow_spreads_beyond_radius() {
        let mut plain = RasterCanvas::new(32, 32);
        plain.fill_circle(Vec2::new(16.0, 16.0), 3.0, CYAN);

        let mut glowing = RasterCanvas::new(32, 32);
        glowing.set_glow(Glow {
            blur: 8.0,
            color: CYAN.with_alpha(0.8),
        });
        glowing.fill_circle(Vec2::new(16.0, 16.0), 3.0, CYAN);

        assert_eq!(plain.pixel(16, 22).a, 0.0);
        assert!(glowing.pixel(16, 22).a > 0.0);
    }

    #[test]
    fn test_line_alpha_matches_stroke_color() {
        let mut canvas = RasterCanvas::new(40, 10);
        canvas.stroke_line(Vec2::new(0.0, 5.0), Vec2::new(40.0, 5.0), 3.0, CYAN.with_alpha(0.5));

        let mid = canvas.pixel(20, 4);
        assert!((mid.a - 0.5).abs() < 0.01);
        assert_eq!(canvas.pixel(20, 0).a, 0.0);
    }

    #[test]
    fn test_clear_uses_background() {
        let bg = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let mut canvas = RasterCanvas::new(8, 8).with_background(bg);
        canvas.fill_circle(Vec2::new(4.0, 4.0), 3.0, CYAN);
        canvas.clear();
        assert_eq!(canvas.pixel(4, 4), bg);
    }

    #[test]
    fn test_shapes_outside_are_clipped() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 3.0, CYAN);
        canvas.stroke_line(Vec2::new(100.0, 100.0), Vec2::new(200.0, 120.0), 2.0, CYAN);
        assert!(canvas.image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = RasterCanvas::new(16, 16);
        canvas.fill_circle(Vec2::new(8.0, 8.0), 4.0, CYAN);
        canvas.save_png(&path).unwrap();
        assert!(path.exists());

        let empty = RasterCanvas::new(0, 4);
        assert!(matches!(
            empty.save_png(dir.path().join("empty.png")),
            Err(SnapshotError::EmptyCanvas { .. })
        ));
    }
}
