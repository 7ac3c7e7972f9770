//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::Ray;
use lux_core::CameraSettings;
use lux_math::Vec3;
use rand::RngCore;

/// Thin-lens camera. Built once per render from [`CameraSettings`] and the
/// image resolution; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    center: Vec3,
    /// Upper left corner of the viewport on the focus plane
    viewport_upper_left: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Set up the viewport. Settings are expected to be validated.
    pub fn new(settings: &CameraSettings, image_width: u32, image_height: u32) -> Self {
        let focus_dist = settings.focus_distance();

        // Calculate viewport dimensions on the focus plane
        let theta = settings.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.up.cross(w).normalize();
        let v = w.cross(u);

        // Row index grows downwards
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let center = settings.look_from;

        Self {
            image_width,
            image_height,
            center,
            viewport_upper_left: center - focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0,
            pixel_delta_u: viewport_u / image_width as f32,
            pixel_delta_v: viewport_v / image_height as f32,
            u,
            v,
            lens_radius: settings.aperture / 2.0,
        }
    }

    /// Generate a jittered ray through pixel (i, j); row 0 is the top row.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let x = i as f32 + gen_f32(rng);
        let y = j as f32 + gen_f32(rng);
        self.get_ray_at(x, y, rng)
    }

    /// Ray through a continuous image position, in pixels from the upper
    /// left corner. The direction is normalized.
    pub fn get_ray_at(&self, x: f32, y: f32, rng: &mut dyn RngCore) -> Ray {
        let target = self.viewport_upper_left + x * self.pixel_delta_u + y * self.pixel_delta_v;

        let origin = if self.lens_radius <= 0.0 {
            self.center
        } else {
            let p = self.lens_radius * random_in_unit_disk(rng);
            self.center + p.x * self.u + p.y * self.v
        };

        Ray::new(origin, (target - origin).normalize())
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}
