//! Lux Renderer - CPU Monte Carlo path tracing.
//!
//! Scenes are assembled from shared [`Hittable`]s (spheres, triangles,
//! planes, rectangles, meshes), accelerated with a [`BvhAccel`] and rendered
//! by a recursive path tracer whose samples are spread over a rayon pool.
//!
//! # Example
//!
//! ```ignore
//! use lux_renderer::{render, Lambertian, RenderSettings, Scene, Sphere, Vec3};
//!
//! let mut scene = Scene::new();
//! scene.add(Arc::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Lambertian::new(Vec3::splat(0.5))))))?;
//! scene.build_bvh()?;
//! let image = render(&scene, &RenderSettings::default())?;
//! image.save("out.png")?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod integrator;
mod material;
mod mesh;
mod output;
mod plane;
mod rectangle;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::{BvhAccel, BvhStats};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{background, cast_ray, sky_gradient, RAY_T_MIN};
pub use material::{
    reflect, refract, Dielectric, Emissive, HemisphereSampling, Lambertian, Material, Metal, ScatterResult,
};
pub use mesh::MeshTriangle;
pub use output::{color_to_rgb8, linear_to_gamma, ImageBuffer};
pub use plane::Plane;
pub use rectangle::Rectangle;
pub use renderer::{render, render_pixel, sample_pixel, split_samples, RenderError};
pub use sampling::{gen_f32, random_in_hemisphere, random_in_unit_disk, random_in_unit_sphere, random_unit_vector};
pub use scene::{Scene, SceneError};
pub use sphere::Sphere;
pub use triangle::{Triangle, PARALLEL_EPSILON};

pub use lux_core::{CameraSettings, Color, RenderSettings, Transform};
/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Aabb, Interval, Ray, Vec2, Vec3};
