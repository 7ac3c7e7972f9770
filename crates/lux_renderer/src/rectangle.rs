//! Axis-aligned rectangle in a plane of constant z.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use lux_math::{Aabb, Interval, Vec2, Vec3};

/// Half thickness of the bounding box, so the box is never flat.
const BOUNDS_PADDING: f32 = 1e-4;

/// Rectangle spanning `[x0, x1] x [y0, y1]` at depth `z`, facing +Z.
#[derive(Clone)]
pub struct Rectangle {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    z: f32,
    material: Arc<dyn Material>,
}

impl Rectangle {
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32, z: f32, material: Arc<dyn Material>) -> Self {
        Self {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
            z,
            material,
        }
    }
}

impl Hittable for Rectangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // NaN (ray in the plane) fails the interval check
        let t = (self.z - ray.origin().z) * ray.inv_direction().z;
        if !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        if p.x < self.x0 || p.x > self.x1 || p.y < self.y0 || p.y > self.y1 {
            return None;
        }

        let tex_coord = Vec2::new(
            (p.x - self.x0) / (self.x1 - self.x0),
            (p.y - self.y0) / (self.y1 - self.y0),
        );

        Some(HitRecord::new(ray, t, Vec3::Z, tex_coord, self.material.as_ref()))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(
            Vec3::new(self.x0, self.y0, self.z - BOUNDS_PADDING),
            Vec3::new(self.x1, self.y1, self.z + BOUNDS_PADDING),
        )
    }
}
