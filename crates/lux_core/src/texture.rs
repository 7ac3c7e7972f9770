//! Color maps for materials.
//!
//! Pixels are stored as linear RGB floats. Decoding files is the loader's
//! job; this module accepts already-decoded `image` buffers or raw pixels.

use lux_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur when building a texture.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    #[error("Texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel count {actual} does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// How UV coordinates outside `[0, 1]` are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Clamp to the border pixels
    #[default]
    Clamp,
    /// Tile the texture
    Repeat,
}

/// Texel reconstruction filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    #[default]
    Bilinear,
}

/// A color map with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Linear RGB, row-major, first row is the top of the image
    pixels: Vec<Vec3>,

    pub wrap: WrapMode,
    pub filter: FilterMode,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Vec3>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
        }
    }

    /// Convert a decoded 8-bit sRGB image into a linear texture.
    pub fn from_rgb_image(image: &image::RgbImage) -> TextureResult<Self> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| Vec3::new(srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])))
            .collect();

        Self::new(width, height, pixels)
    }

    /// Set the wrap mode.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Sample the texture at UV coordinates, with (0, 0) at bottom-left.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let (u, v) = match self.wrap {
            WrapMode::Clamp => (uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0)),
            WrapMode::Repeat => (uv.x.rem_euclid(1.0), uv.y.rem_euclid(1.0)),
        };

        // Convert to pixel coordinates, flipping V for image row order
        let x = u * (self.width - 1) as f32;
        let y = (1.0 - v) * (self.height - 1) as f32;

        match self.filter {
            FilterMode::Nearest => self.get_pixel(x.round() as u32, y.round() as u32),
            FilterMode::Bilinear => {
                let x0 = x.floor() as u32;
                let y0 = y.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let y1 = (y0 + 1).min(self.height - 1);

                let fx = x.fract();
                let fy = y.fract();

                let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
                let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
                top.lerp(bottom, fy)
            }
        }
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row black/white, bottom row white/black
        Texture::new(
            2,
            2,
            vec![Vec3::ZERO, Vec3::ONE, Vec3::ONE, Vec3::ZERO],
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.sample(Vec2::new(0.5, 0.5)), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.sample(Vec2::new(7.0, -3.0)), Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_size_mismatch() {
        let err = Texture::new(2, 2, vec![Vec3::ZERO; 3]).unwrap_err();
        assert_eq!(
            err,
            TextureError::SizeMismatch {
                width: 2,
                height: 2,
                actual: 3
            }
        );
        assert!(matches!(Texture::new(0, 4, vec![]), Err(TextureError::Empty { .. })));
    }

    #[test]
    fn test_nearest_sampling_flips_v() {
        let tex = checker().with_filter(FilterMode::Nearest);

        // v = 1 is the top row of the image
        assert_eq!(tex.sample(Vec2::new(0.0, 1.0)), Vec3::ZERO);
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), Vec3::ONE);
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Vec3::ONE);
    }

    #[test]
    fn test_bilinear_center_is_average() {
        let sample = checker().sample(Vec2::new(0.5, 0.5));
        assert!((sample - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_wrap_modes() {
        let clamp = checker().with_filter(FilterMode::Nearest);
        let repeat = checker()
            .with_filter(FilterMode::Nearest)
            .with_wrap(WrapMode::Repeat);

        // Clamp: u = 1.25 sticks to the right edge
        assert_eq!(clamp.sample(Vec2::new(1.25, 0.9)), Vec3::ONE);
        // Repeat: u = 1.25 wraps to 0.25, rounding to the left column
        assert_eq!(repeat.sample(Vec2::new(1.25, 0.9)), Vec3::ZERO);
    }

    #[test]
    fn test_repeat_wraps_top_edge_to_bottom_row() {
        let clamp = checker().with_filter(FilterMode::Nearest);
        let repeat = checker()
            .with_filter(FilterMode::Nearest)
            .with_wrap(WrapMode::Repeat);

        // v = 1 stays on the top row when clamped
        assert_eq!(clamp.sample(Vec2::new(0.25, 1.0)), Vec3::ZERO);
        // but wraps to v = 0, the bottom row, when repeating
        assert_eq!(repeat.sample(Vec2::new(0.25, 1.0)), Vec3::ONE);
        assert_eq!(repeat.sample(Vec2::new(0.25, 1.0)), repeat.sample(Vec2::new(0.25, 0.0)));
    }

    #[test]
    fn test_from_rgb_image() {
        let mut img = image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 0]));

        let tex = Texture::from_rgb_image(&img).unwrap().with_filter(FilterMode::Nearest);
        assert!((tex.sample(Vec2::new(0.0, 1.0)) - Vec3::ONE).length() < 1e-4);
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
