//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use lux_core::{Transform, TriangleData};
use lux_math::{Aabb, Interval, Vec2, Vec3};

/// Determinants below this mean the ray runs parallel to the triangle.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// A triangle primitive.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Edges from v0, kept for the intersection test
    e1: Vec3,
    e2: Vec3,
    /// Geometric face normal (unit length, zero if degenerate)
    normal: Vec3,
    vertex_normals: Option<[Vec3; 3]>,
    tex_coords: Option<[Vec2; 3]>,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let mut triangle = Self {
            v0,
            v1,
            v2,
            e1: Vec3::ZERO,
            e2: Vec3::ZERO,
            normal: Vec3::ZERO,
            vertex_normals: None,
            tex_coords: None,
            material,
            bbox: Aabb::EMPTY,
        };
        triangle.update_derived();
        triangle
    }

    /// Build from resolved mesh data.
    pub fn from_data(data: &TriangleData, material: Arc<dyn Material>) -> Self {
        let [v0, v1, v2] = data.positions;
        let mut triangle = Self::new(v0, v1, v2, material);
        if let Some(normals) = data.normals {
            triangle = triangle.with_normals(normals);
        }
        if let Some(tex_coords) = data.tex_coords {
            triangle = triangle.with_tex_coords(tex_coords);
        }
        triangle
    }

    /// Per-vertex normals for smooth shading.
    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.vertex_normals = Some(normals.map(Vec3::normalize_or_zero));
        self
    }

    /// Per-vertex texture coordinates.
    pub fn with_tex_coords(mut self, tex_coords: [Vec2; 3]) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Geometric face normal, following the v0 -> v1 -> v2 winding.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    /// Transform vertices and normals in place.
    pub fn apply_transform(&mut self, transform: &Transform) {
        self.v0 = transform.transform_point(self.v0);
        self.v1 = transform.transform_point(self.v1);
        self.v2 = transform.transform_point(self.v2);
        if let Some(normals) = self.vertex_normals.as_mut() {
            for n in normals.iter_mut() {
                *n = transform.transform_normal(*n);
            }
        }
        self.update_derived();
    }

    fn update_derived(&mut self) {
        self.e1 = self.v1 - self.v0;
        self.e2 = self.v2 - self.v0;
        self.normal = self.e1.cross(self.e2).normalize_or_zero();
        self.bbox = Aabb::from_point(self.v0).union_point(self.v1).union_point(self.v2);
    }

    /// Möller-Trumbore test without an interval.
    ///
    /// Returns `(t, u, v)` with barycentric weights `(1 - u - v, u, v)` for
    /// `(v0, v1, v2)`. Hits behind the origin are rejected.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        let s1 = ray.direction().cross(self.e2);
        let det = s1.dot(self.e1);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = inv_det * s.dot(s1);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s2 = s.cross(self.e1);
        let v = inv_det * ray.direction().dot(s2);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * self.e2.dot(s2);
        if t < 0.0 {
            return None;
        }

        Some((t, u, v))
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (t, u, v) = self.intersect(ray)?;
        if !ray_t.contains(t) {
            return None;
        }

        let w = 1.0 - u - v;
        let tex_coord = match self.tex_coords {
            Some([t0, t1, t2]) => t0 * w + t1 * u + t2 * v,
            None => Vec2::new(u, v),
        };

        let rec = HitRecord::new(ray, t, self.normal, tex_coord, self.material.as_ref());

        match self.vertex_normals {
            Some([n0, n1, n2]) => {
                let shading = (n0 * w + n1 * u + n2 * v).normalize_or_zero();
                if shading == Vec3::ZERO {
                    return Some(rec);
                }
                // Keep the shading normal on the geometric side
                let shading = if shading.dot(self.normal) < 0.0 { -shading } else { shading };
                Some(rec.with_shading_normal(shading))
            }
            None => Some(rec),
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
