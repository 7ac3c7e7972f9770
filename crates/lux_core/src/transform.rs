//! Rigid transform plus uniform scale, applied to geometry once at load time.

use lux_math::{Quat, Vec3};
use thiserror::Error;

/// Errors produced when building a transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Scale factor must be non-zero")]
    ZeroScale,

    #[error("Transform component is not finite: {0}")]
    NonFinite(&'static str),
}

/// Transform components that can be composed into a matrix.
///
/// Order: Scale -> Rotate (X, then Y, then Z) -> Translate.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Uniform scale
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Build a transform from a translation, per-axis rotation angles in
    /// degrees and a uniform scale factor.
    pub fn from_euler_degrees(
        translation: Vec3,
        rotation_degrees: Vec3,
        scale: f32,
    ) -> Result<Self, TransformError> {
        if !translation.is_finite() {
            return Err(TransformError::NonFinite("translation"));
        }
        if !rotation_degrees.is_finite() {
            return Err(TransformError::NonFinite("rotation"));
        }
        if !scale.is_finite() {
            return Err(TransformError::NonFinite("scale"));
        }
        if scale == 0.0 {
            return Err(TransformError::ZeroScale);
        }

        let r = rotation_degrees * std::f32::consts::PI / 180.0;
        let rotation = Quat::from_rotation_z(r.z) * Quat::from_rotation_y(r.y) * Quat::from_rotation_x(r.x);

        Ok(Self {
            translation,
            rotation,
            scale,
        })
    }

    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Transform a position.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.translation
    }

    /// Transform a surface normal. Translation and the scale magnitude do not
    /// apply; a negative scale mirrors the normal.
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        (self.rotation * n * self.scale.signum()).normalize_or_zero()
    }
}
