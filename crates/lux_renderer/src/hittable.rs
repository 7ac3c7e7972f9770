//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::{Material, Ray};
use lux_math::{Aabb, Interval, Vec2, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Shading normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Texture coordinates
    pub tex_coord: Vec2,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Create a record, orienting the normal against the ray.
    ///
    /// `outward_normal` must be the outward geometric normal (unit length);
    /// the front-face flag is decided by it alone.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        tex_coord: Vec2,
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;

        Self {
            p: ray.at(t),
            normal: if front_face { outward_normal } else { -outward_normal },
            material,
            tex_coord,
            t,
            front_face,
        }
    }

    /// Replace the shading normal with an interpolated one, keeping the side
    /// already chosen from the geometric normal.
    pub fn with_shading_normal(mut self, outward_shading_normal: Vec3) -> Self {
        self.normal = if self.front_face {
            outward_shading_normal
        } else {
            -outward_shading_normal
        };
        self
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Get the world-space axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Closest hit over a sequence of hittables, by linear scan.
pub(crate) fn closest_hit<'a, H, I>(objects: I, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>
where
    H: Hittable + ?Sized + 'a,
    I: IntoIterator<Item = &'a H>,
{
    let mut closest: Option<HitRecord<'a>> = None;

    for object in objects {
        let interval = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
        if let Some(rec) = object.hit(ray, interval) {
            closest = Some(rec);
        }
    }

    closest
}

/// A list of hittable objects, intersected by linear scan.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// The objects, in insertion order.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        closest_hit(self.objects.iter().map(|o| &**o), ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
