//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use lux_core::Transform;
use lux_math::{Aabb, Interval, Vec2, Vec3};

/// A sphere primitive.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, and a
    /// zero-radius sphere is never hit.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);

        Self {
            center,
            radius,
            material,
            bbox: Self::bounds(center, radius),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Move the sphere in place. Rotation does not change a sphere; the
    /// radius follows the scale magnitude.
    pub fn apply_transform(&mut self, transform: &Transform) {
        self.center = transform.transform_point(self.center);
        self.radius *= transform.scale.abs();
        self.bbox = Self::bounds(self.center, self.radius);
    }

    fn bounds(center: Vec3, radius: f32) -> Aabb {
        let rvec = Vec3::splat(radius);
        Aabb::from_points(center - rvec, center + rvec)
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // No surface, and no normal to divide out
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_unit_sphere_from_camera() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_hit_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.0)).is_none());
        let rec = sphere.hit(&ray, Interval::new(4.5, 10.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_radius_never_hits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        for radius in [0.0, -1.0] {
            let sphere = Sphere::new(Vec3::new(0.0, 0.0, -2.0), radius, grey());
            assert_eq!(sphere.radius(), 0.0);
            assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
        }
    }

    #[test]
    fn test_sphere_uv() {
        let uv = Sphere::get_sphere_uv(Vec3::Y);
        assert!((uv.y - 1.0).abs() < 1e-6);

        let uv = Sphere::get_sphere_uv(-Vec3::Y);
        assert!(uv.y.abs() < 1e-6);

        let uv = Sphere::get_sphere_uv(Vec3::X);
        assert!((uv - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_apply_transform() {
        let mut sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let transform = Transform::from_euler_degrees(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 45.0, 0.0), -2.0).unwrap();
        sphere.apply_transform(&transform);

        assert!((sphere.center() - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert_eq!(sphere.radius(), 2.0);
        assert_eq!(sphere.bounding_box().min, Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn test_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 0.5, grey());
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.min, Vec3::new(0.5, -0.5, -0.5));
        assert_eq!(bbox.max, Vec3::new(1.5, 0.5, 0.5));
    }
}
