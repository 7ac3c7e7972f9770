//! Parallel sample scheduler.
//!
//! The image is cut into buckets that run on a rayon pool. Within a pixel,
//! the samples are split into a fixed number of batches that also run in
//! parallel; each batch owns a generator seeded from the render seed, the
//! pixel index and the batch index, so the image does not depend on how
//! the work was scheduled.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::integrator::cast_ray;
use crate::output::ImageBuffer;
use crate::{Camera, Hittable};
use lux_core::{Color, ConfigError, RenderSettings};

/// Errors that stop a render (or the writing of its result).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render settings: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Split `samples` into at most `workers` batches whose sizes differ by at
/// most one and add up to `samples`. Empty batches are dropped.
pub fn split_samples(samples: u32, workers: u32) -> Vec<u32> {
    if workers == 0 {
        return Vec::new();
    }

    let base = samples / workers;
    let extra = samples % workers;

    (0..workers)
        .map(|i| base + u32::from(i < extra))
        .filter(|&n| n > 0)
        .collect()
}

/// Seed for one sample batch (splitmix64 finalizer over the inputs).
fn batch_seed(seed: u64, pixel_index: u64, batch: u64) -> u64 {
    let mut z = seed
        ^ pixel_index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ batch.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sum of `samples` path samples through pixel (x, y).
pub fn sample_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    samples: u32,
    settings: &RenderSettings,
    rng: &mut StdRng,
) -> Color {
    (0..samples).fold(Color::ZERO, |acc, _| {
        let ray = camera.get_ray(x, y, rng);
        acc + cast_ray(&ray, world, settings.max_depth, settings, rng)
    })
}

/// Radiance sum over all of a pixel's samples, computed in parallel batches.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
) -> Color {
    let pixel_index = y as u64 * settings.image_width as u64 + x as u64;
    let batches = split_samples(settings.samples_per_pixel, settings.workers);

    let sums: Vec<Color> = batches
        .par_iter()
        .enumerate()
        .map(|(batch, &samples)| {
            let mut rng = StdRng::seed_from_u64(batch_seed(settings.seed, pixel_index, batch as u64));
            sample_pixel(camera, world, x, y, samples, settings, &mut rng)
        })
        .collect();

    // Joined in batch order, so the float sum is reproducible
    sums.into_iter().sum()
}

/// Render the full image.
///
/// Settings are validated before any work starts. The world must not be
/// modified for the duration of the call.
pub fn render(world: &dyn Hittable, settings: &RenderSettings) -> Result<ImageBuffer, RenderError> {
    settings.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;

    let camera = Camera::new(&settings.camera, settings.image_width, settings.image_height);
    let buckets = generate_buckets(settings.image_width, settings.image_height, settings.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp (max depth {}, {} batches per pixel, {} buckets, {} threads)",
        settings.image_width,
        settings.image_height,
        settings.samples_per_pixel,
        settings.max_depth,
        settings.workers.min(settings.samples_per_pixel),
        buckets.len(),
        pool.current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, &camera, world, settings)))
            .collect()
    });

    let mut image = ImageBuffer::new(settings.image_width, settings.image_height, settings.samples_per_pixel);
    for result in results {
        let bucket = result.bucket;
        for (i, sum) in result.pixels.into_iter().enumerate() {
            let i = i as u32;
            image.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, sum);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
