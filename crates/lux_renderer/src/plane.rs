//! Finite ground plane made of two triangles.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray, Triangle};
use lux_core::Transform;
use lux_math::{Aabb, Interval, Vec2, Vec3};

/// A `width` x `height` rectangle in the XZ plane, centred at the origin
/// with its normal along +Y. Position it with [`Plane::apply_transform`].
#[derive(Clone)]
pub struct Plane {
    triangles: [Triangle; 2],
}

impl Plane {
    pub fn new(width: f32, height: f32, material: Arc<dyn Material>) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;

        // v3 -------- v2
        //  |          |
        // v0 -------- v1
        let v0 = Vec3::new(-hw, 0.0, hh);
        let v1 = Vec3::new(hw, 0.0, hh);
        let v2 = Vec3::new(hw, 0.0, -hh);
        let v3 = Vec3::new(-hw, 0.0, -hh);

        let t0 = Vec2::new(0.0, 0.0);
        let t1 = Vec2::new(1.0, 0.0);
        let t2 = Vec2::new(1.0, 1.0);
        let t3 = Vec2::new(0.0, 1.0);

        let up = [Vec3::Y; 3];

        Self {
            triangles: [
                Triangle::new(v0, v1, v2, Arc::clone(&material))
                    .with_normals(up)
                    .with_tex_coords([t0, t1, t2]),
                Triangle::new(v0, v2, v3, material)
                    .with_normals(up)
                    .with_tex_coords([t0, t2, t3]),
            ],
        }
    }

    pub fn apply_transform(&mut self, transform: &Transform) {
        for triangle in &mut self.triangles {
            triangle.apply_transform(transform);
        }
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        crate::hittable::closest_hit(self.triangles.iter(), ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::surrounding(&self.triangles[0].bounding_box(), &self.triangles[1].bounding_box())
    }
}
