//! Accumulated pixel storage and conversion to 8-bit images.

use std::io::{self, Write};
use std::path::Path;

use lux_core::Color;
use lux_math::Interval;

/// Gamma 2 encoding. Non-positive (and NaN) input maps to 0.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Turn a sum of `samples` radiance samples into an 8-bit pixel.
///
/// Averages, applies gamma 2, clamps to [0, 1] and scales by 255.999 so
/// that 1.0 still lands on 255 after truncation.
pub fn color_to_rgb8(sum: Color, samples: u32) -> [u8; 3] {
    let scale = 1.0 / samples.max(1) as f32;
    let encode = |c: f32| (255.999 * Interval::UNIT.clamp(linear_to_gamma(c * scale))) as u8;

    [encode(sum.x), encode(sum.y), encode(sum.z)]
}

/// Per-pixel radiance sums plus the sample count they were built from.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Summed radiance at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, sum: Color) {
        let index = self.index(x, y);
        self.pixels[index] = sum;
    }

    /// Mean radiance at (x, y).
    pub fn average(&self, x: u32, y: u32) -> Color {
        self.get(x, y) / self.samples_per_pixel.max(1) as f32
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// Tone-mapped pixels in row-major order.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels
            .iter()
            .map(|sum| color_to_rgb8(*sum, self.samples_per_pixel))
            .collect()
    }

    /// Tone-mapped pixels as a flat byte array.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<[u8; 3], u8>(&self.to_rgb8()).to_vec()
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        let rgb = self.to_rgb8();
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(rgb[self.index(x, y)])
        })
    }

    /// Plain-text PPM (P3), top row first.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for [r, g, b] in self.to_rgb8() {
            writeln!(out, "{r} {g} {b}")?;
        }
        out.flush()
    }

    /// Encode to a file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgb_bytes(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
    }
}
