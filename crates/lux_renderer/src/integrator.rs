//! Recursive Monte Carlo path tracing estimator.

use crate::sampling::gen_f32;
use crate::{Hittable, Ray};
use lux_core::{Color, RenderSettings};
use lux_math::Interval;
use rand::RngCore;

/// Hits closer than this are self-intersections of the surface just left.
pub const RAY_T_MIN: f32 = 0.001;

/// Russian roulette never kills a path with at least this survival chance.
const MIN_SURVIVAL: f32 = 0.05;

const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Compute the color seen by a ray.
///
/// `depth` is the number of bounces left. Misses return the background;
/// absorbed paths return only what the surface emits.
pub fn cast_ray(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(RAY_T_MIN, f32::INFINITY)) else {
        return background(ray, settings);
    };

    let emission = rec.material.emitted(rec.tex_coord, rec.p);

    let Some(result) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let mut attenuation = result.attenuation;

    if let Some(roulette_depth) = settings.russian_roulette_depth {
        let bounce = settings.max_depth.saturating_sub(depth);
        if bounce >= roulette_depth {
            let survival = attenuation.max_element().clamp(MIN_SURVIVAL, 1.0);
            if gen_f32(rng) >= survival {
                return emission;
            }
            attenuation /= survival;
        }
    }

    emission + attenuation * cast_ray(&result.scattered, world, depth - 1, settings, rng)
}

/// Color for rays that leave the scene.
pub fn background(ray: &Ray, settings: &RenderSettings) -> Color {
    if settings.use_sky_gradient {
        sky_gradient(ray)
    } else {
        settings.background
    }
}

/// White at the bottom, light blue at the top.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    Color::ONE.lerp(SKY_BLUE, a)
}
