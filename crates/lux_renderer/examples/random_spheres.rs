//! Random spheres scene.
//!
//! Usage: `random_spheres [settings.json] [output.png]`
//!
//! The settings file holds a (partial) `RenderSettings` in JSON; missing
//! fields keep their defaults. A PPM copy is written next to the image.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use lux_core::{FaceVertex, MeshData, Texture, WrapMode};
use lux_renderer::{
    render, Color, Dielectric, Emissive, Lambertian, Material, MeshTriangle, Metal, Plane, Rectangle,
    RenderSettings, Scene, Sphere, Transform, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening settings {path}"))?;
            serde_json::from_reader::<_, RenderSettings>(file)
                .with_context(|| format!("parsing settings {path}"))?
        }
        None => RenderSettings::default(),
    };
    let output = PathBuf::from(args.next().unwrap_or_else(|| "random_spheres.png".to_string()));

    let scene = build_scene(settings.seed)?;

    let image = render(&scene, &settings)?;

    image
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    let ppm = output.with_extension("ppm");
    image.write_ppm(BufWriter::new(File::create(&ppm)?))?;

    log::info!("Saved {} and {}", output.display(), ppm.display());
    Ok(())
}

fn build_scene(seed: u64) -> Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    scene.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    )))?;

    for a in -3..3 {
        for b in -3..3 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(a as f32 + 0.9 * rng.gen::<f32>(), 0.2, b as f32 + 0.9 * rng.gen::<f32>());

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen()) * Color::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::splat(rng.gen_range(0.5..1.0));
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                Arc::new(Dielectric::new(1.5))
            };

            scene.add(Arc::new(Sphere::new(center, 0.2, material)))?;
        }
    }

    scene.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))))?;
    scene.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )))?;
    scene.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )))?;

    // Checkered board behind the spheres
    let checker = image::RgbImage::from_fn(8, 8, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgb([230, 230, 230])
        } else {
            image::Rgb([40, 40, 40])
        }
    });
    let board = Texture::from_rgb_image(&checker)?.with_wrap(WrapMode::Repeat);
    scene.add(Arc::new(Rectangle::new(
        -3.0,
        3.0,
        0.0,
        2.0,
        -4.0,
        Arc::new(Lambertian::textured(Arc::new(board))),
    )))?;

    // Small floor tile with a soft light above it
    let mut tile = Plane::new(1.5, 1.5, Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 0.1)));
    tile.apply_transform(&Transform::from_translation(Vec3::new(2.0, 0.001, 2.5)));
    scene.add(Arc::new(tile))?;
    scene.add(Arc::new(Sphere::new(
        Vec3::new(2.0, 2.5, 2.5),
        0.3,
        Arc::new(Emissive::new(Color::splat(6.0))),
    )))?;

    scene.add(Arc::new(pyramid()?))?;

    scene.build_bvh()?;
    Ok(scene)
}

/// Square pyramid, normalized to unit size and placed on the ground.
fn pyramid() -> Result<MeshTriangle> {
    let mut data = MeshData::new(
        "pyramid",
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.5, 0.0),
        ],
    );
    data.add_face([0, 1, 2, 3].into_iter().map(FaceVertex::new).collect());
    data.add_triangle([0, 1, 4]);
    data.add_triangle([1, 2, 4]);
    data.add_triangle([2, 3, 4]);
    data.add_triangle([3, 0, 4]);
    data.normalize_positions()?;

    let material = Arc::new(Lambertian::new(Color::new(0.2, 0.5, 0.3)));
    let mut mesh = MeshTriangle::from_mesh_data(&data, material)?;
    let transform = Transform::from_euler_degrees(Vec3::new(-2.0, 0.375, 2.5), Vec3::new(0.0, 30.0, 0.0), 0.5)?;
    mesh.apply_transform(&transform)?;
    mesh.build_bvh()?;
    Ok(mesh)
}
