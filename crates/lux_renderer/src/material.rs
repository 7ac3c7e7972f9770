//! Material trait for surface scattering.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, near_zero, random_in_hemisphere, random_in_unit_sphere, random_unit_vector};
use crate::Ray;
use lux_core::{Color, Texture};
use lux_math::{Vec2, Vec3};
use rand::RngCore;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Outgoing ray, leaving from the hit point
    pub scattered: Ray,
    /// Color the carried radiance is multiplied by
    pub attenuation: Color,
    /// Density of the sampled direction, `None` for delta (specular) lobes
    pub pdf: Option<f32>,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Light emitted at the given texture coordinate and point.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _tex_coord: Vec2, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// How [`Lambertian`] picks outgoing directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HemisphereSampling {
    /// Normal plus a random unit vector; density cos(theta) / pi.
    #[default]
    Cosine,
    /// Uniform over the hemisphere; density 1 / (2 pi).
    ///
    /// The integrator does not divide by the pdf, so this mode darkens
    /// grazing light relative to a true Lambertian surface.
    Uniform,
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Color,
    color_map: Option<Arc<Texture>>,
    sampling: HemisphereSampling,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            color_map: None,
            sampling: HemisphereSampling::Cosine,
        }
    }

    /// Diffuse material whose albedo comes from a texture.
    pub fn textured(color_map: Arc<Texture>) -> Self {
        Self {
            albedo: Color::ONE,
            color_map: Some(color_map),
            sampling: HemisphereSampling::Cosine,
        }
    }

    /// Set the hemisphere sampling strategy.
    pub fn with_sampling(mut self, sampling: HemisphereSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn sampling(&self) -> HemisphereSampling {
        self.sampling
    }

    fn albedo_at(&self, tex_coord: Vec2) -> Color {
        match &self.color_map {
            Some(texture) => texture.sample(tex_coord),
            None => self.albedo,
        }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let direction = match self.sampling {
            HemisphereSampling::Cosine => rec.normal + random_unit_vector(rng),
            HemisphereSampling::Uniform => random_in_hemisphere(rec.normal, rng),
        };

        // Degenerate or tangent samples fall back to the normal
        let direction = if near_zero(direction) || direction.dot(rec.normal) <= 0.0 {
            rec.normal
        } else {
            direction.normalize()
        };

        let pdf = match self.sampling {
            HemisphereSampling::Cosine => direction.dot(rec.normal).max(0.0) / PI,
            HemisphereSampling::Uniform => 1.0 / (2.0 * PI),
        };

        Some(ScatterResult {
            scattered: Ray::new(rec.p, direction),
            attenuation: self.albedo_at(rec.tex_coord),
            pdf: Some(pdf),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, clamped to at most 1.0
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = (reflected + self.fuzz * random_in_unit_sphere(rng)).normalize_or_zero();

        // Fuzz pushed the ray below the surface
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            scattered: Ray::new(rec.p, direction),
            attenuation: self.albedo,
            pdf: None,
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ratio: f32) -> f32 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            scattered: Ray::new(rec.p, direction.normalize_or_zero()),
            attenuation: Color::ONE,
            pdf: None,
        })
    }
}

/// Light-emitting material. Never scatters.
#[derive(Debug, Clone)]
pub struct Emissive {
    color: Color,
}

impl Emissive {
    /// `color` is radiance, so values above 1 are meaningful.
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Material for Emissive {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, _tex_coord: Vec2, _p: Vec3) -> Color {
        self.color
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with the given eta ratio.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, normal: Vec3, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, normal, Vec2::new(0.25, 0.75), material)
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Lambertian::new(Color::new(0.8, 0.3, 0.3));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.1));
        let rec = record(&ray, Vec3::Y, &material);

        for _ in 0..10_000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
        }
    }

    #[test]
    fn test_uniform_sampling_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Lambertian::new(Color::ONE).with_sampling(HemisphereSampling::Uniform);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &material);

        for _ in 0..10_000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert!((result.pdf.unwrap() - 1.0 / (2.0 * PI)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cosine_pdf_matches_direction() {
        let mut rng = StdRng::seed_from_u64(3);
        let material = Lambertian::new(Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &material);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            let cos_theta = result.scattered.direction().dot(Vec3::Y);
            assert!((result.pdf.unwrap() - cos_theta / PI).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lambertian_uses_color_map() {
        let mut rng = StdRng::seed_from_u64(42);
        let texture = Arc::new(Texture::solid_color(Color::new(0.1, 0.2, 0.3)));
        let material = Lambertian::textured(texture);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &material);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!((result.attenuation - Color::new(0.1, 0.2, 0.3)).length() < 1e-6);
    }

    #[test]
    fn test_perfect_mirror() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Metal::new(Color::splat(0.9), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&ray, Vec3::Y, &material);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-6);
        assert!(result.pdf.is_none());
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, 0.3).fuzz(), 0.3);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Metal::new(Color::ONE, 1.0);
        // Grazing incidence, fuzz will often push below the surface
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let rec = record(&ray, Vec3::Y, &material);

        for _ in 0..1000 {
            if let Some(result) = material.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(Vec3::Y) > 0.0);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Dielectric::new(1.5);
        // Leaving glass at a grazing angle: back face hit
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.2, 0.0));
        let rec = record(&ray, Vec3::Y, &material);
        assert!(!rec.front_face);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            // Reflected back into the glass (below the outward surface)
            assert!(result.scattered.direction().y < 0.0);
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_normal_incidence_mostly_refracts() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Dielectric::new(1.5);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &material);

        let refracted = (0..1000)
            .filter(|_| {
                let result = material.scatter(&ray, &rec, &mut rng).unwrap();
                result.scattered.direction().y < 0.0
            })
            .count();

        // Schlick gives ~4% reflectance at normal incidence
        assert!(refracted > 900, "refracted {refracted}");
    }

    #[test]
    fn test_emissive() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Emissive::new(Color::splat(4.0));
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &material);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(Vec2::ZERO, Vec3::ZERO), Color::splat(4.0));
        assert_eq!(Lambertian::new(Color::ONE).emitted(Vec2::ZERO, Vec3::ZERO), Color::ZERO);
    }
}
