use crate::Vec3;

/// A ray in 3D space.
///
/// The reciprocal direction and the per-axis sign flags are computed once at
/// construction so that box tests along the ray stay branch-light. Rays are
/// immutable; a new one is created for every scattered bounce.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    dir_is_neg: [usize; 3],
}

impl Ray {
    /// Create a new ray.
    ///
    /// Zero direction components produce infinite reciprocals, which the
    /// slab test handles without special casing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
            // Sign bit, so that -0.0 selects the same corner as a negative value
            dir_is_neg: [
                direction.x.is_sign_negative() as usize,
                direction.y.is_sign_negative() as usize,
                direction.z.is_sign_negative() as usize,
            ],
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray (not necessarily normalized).
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Component-wise reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// 1 for each axis along which the ray points in the negative direction.
    #[inline]
    pub fn dir_is_neg(&self) -> [usize; 3] {
        self.dir_is_neg
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
