//! Render and camera settings.
//!
//! Plain values, fixed for the duration of a render. Every field has a
//! default, so a settings file only needs to name what it changes.

use lux_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Rejected settings. These are caller mistakes and are reported before any
/// work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Max depth must be at least 1")]
    ZeroDepth,

    #[error("Worker count must be at least 1")]
    ZeroWorkers,

    #[error("Bucket size must be at least 1")]
    ZeroBucketSize,

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("Aperture must be non-negative, got {0}")]
    NegativeAperture(f32),

    #[error("Focus distance must be positive, got {0}")]
    InvalidFocusDistance(f32),

    #[error("Camera look-from and look-at coincide, or up is parallel to the view direction")]
    DegenerateView,
}

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance to the plane of perfect focus; defaults to |look_at - look_from|
    pub focus_distance: Option<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            vfov: 20.0,
            aperture: 0.0,
            focus_distance: None,
        }
    }
}

impl CameraSettings {
    /// Effective focus distance.
    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
            .unwrap_or_else(|| self.look_from.distance(self.look_at))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFov(self.vfov));
        }
        if !(self.aperture >= 0.0) {
            return Err(ConfigError::NegativeAperture(self.aperture));
        }

        let view = self.look_at - self.look_from;
        if view.length_squared() == 0.0 || view.cross(self.up).length_squared() == 0.0 {
            return Err(ConfigError::DegenerateView);
        }

        let focus = self.focus_distance();
        if !(focus > 0.0 && focus.is_finite()) {
            return Err(ConfigError::InvalidFocusDistance(focus));
        }

        Ok(())
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth (hard cap)
    pub max_depth: u32,
    /// Number of sample batches each pixel's samples are split across
    pub workers: u32,
    /// Thread pool size; 0 lets rayon pick one thread per core
    pub threads: usize,
    /// Base seed; every sample batch derives its own generator from it
    pub seed: u64,
    /// Bounce count after which paths are terminated by Russian roulette
    pub russian_roulette_depth: Option<u32>,
    /// Edge length of the square tiles the image is split into
    pub bucket_size: u32,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 300,
            image_height: 187,
            samples_per_pixel: 100,
            max_depth: 50,
            workers: 8,
            threads: 0,
            seed: 0,
            russian_roulette_depth: None,
            bucket_size: 32,
            use_sky_gradient: true,
            background: Color::ZERO,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set resolution from a width and an aspect ratio (width / height).
    pub fn with_width_and_aspect(mut self, width: u32, aspect_ratio: f32) -> Result<Self, ConfigError> {
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            return Err(ConfigError::InvalidAspectRatio(aspect_ratio));
        }
        self.image_width = width;
        self.image_height = (width as f32 / aspect_ratio) as u32;
        Ok(self)
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set the camera.
    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    /// Check every setting; call once before rendering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        self.camera.validate()
    }
}
