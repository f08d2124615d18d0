//! Textures mapping (u, v, point) to color.

use crate::material::Color;
use crate::perlin::Perlin;
use ember_math::{Interval, Point3};
use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Trait for textures evaluated at a surface hit.
pub trait Texture: Send + Sync {
    /// Color at UV coordinates (u, v) and world-space point p.
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern alternating between two textures.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checker between two flat colors.
    pub fn with_colors(scale: f64, c1: Color, c2: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(c1)),
            Arc::new(SolidColor::new(c2)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let x_int = (self.inv_scale * p.x).floor() as i64;
        let y_int = (self.inv_scale * p.y).floor() as i64;
        let z_int = (self.inv_scale * p.z).floor() as i64;

        if (x_int + y_int + z_int) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like gray bands driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64) -> Self {
        Self {
            noise: Perlin::new(),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * self.noise.turbulence(p, 7)).sin())
    }
}

/// An image-backed texture sampled with nearest-pixel lookup.
pub struct ImageTexture {
    image: RgbImage,
}

impl ImageTexture {
    /// Decode an image file into an 8-bit RGB buffer.
    ///
    /// A path that cannot be opened or decoded is an error; asset problems
    /// must surface before rendering starts.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = image::open(path.as_ref())?.to_rgb8();
        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    /// Wrap an already-decoded image buffer.
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        // A degenerate image yields solid cyan as a debugging aid
        if self.image.height() == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v); // Flip V to image coordinates

        let i = ((u * self.image.width() as f64) as u32).min(self.image.width() - 1);
        let j = ((v * self.image.height() as f64) as u32).min(self.image.height() - 1);
        let pixel = self.image.get_pixel(i, j);

        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * pixel[0] as f64,
            color_scale * pixel[1] as f64,
            color_scale * pixel[2] as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(
            tex.value(0.3, 0.9, Vec3::new(5.0, -2.0, 1.0)),
            Color::new(1.0, 0.5, 0.0)
        );
    }

    #[test]
    fn test_checker_parity() {
        let tex = CheckerTexture::with_colors(1.0, Color::ONE, Color::ZERO);

        // (0,0,0) sums to 0 -> even
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.5)), Color::ONE);
        // Stepping one cell along x flips parity
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
        // Stepping along two axes flips back
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), Color::ONE);
    }

    #[test]
    fn test_noise_texture_gray_range() {
        let tex = NoiseTexture::new(4.0);
        for i in 0..50 {
            let p = Vec3::new(i as f64 * 0.37, i as f64 * -0.11, i as f64 * 0.53);
            let c = tex.value(0.0, 0.0, p);
            // Gray: all channels equal, in [0, 1]
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
            assert!((0.0..=1.0).contains(&c.x));
        }
    }

    #[test]
    fn test_image_texture_lookup() {
        // 2x2 image: top-left red, top-right green, bottom-left blue,
        // bottom-right white.
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        img.put_pixel(1, 1, image::Rgb([255, 255, 255]));
        let tex = ImageTexture::from_image(img);

        // v = 1 maps to image row 0 (v is flipped)
        let c = tex.value(0.0, 1.0, Vec3::ZERO);
        assert!((c.x - 1.0).abs() < 1e-9 && c.y == 0.0 && c.z == 0.0);

        let c = tex.value(0.0, 0.0, Vec3::ZERO);
        assert!(c.z > 0.99 && c.x == 0.0);

        // Out-of-range u clamps rather than wrapping
        let c = tex.value(7.0, 1.0, Vec3::ZERO);
        assert!((c.y - 1.0).abs() < 1e-9 && c.x == 0.0);
    }
}
