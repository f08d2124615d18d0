//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emission-aware shading against a solid background
//! - Anti-aliasing via multi-sampling
//! - Fork-join parallelism over contiguous scanline bands

use crate::{Camera, Color, HitRecord, Hittable};
use ember_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through the
/// scene, bouncing off surfaces and accumulating emission and attenuation.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    // Rays that leave the scene take the background color
    if !world.hit(ray, Interval::new(0.001, f64::INFINITY), &mut rec, rng) {
        return background;
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color =
                ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Ray was absorbed - just return emission
        None => emission,
    }
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Render the scene across all available cores.
///
/// Spawns one worker per core, each owning a contiguous band of scanlines.
/// For a fixed seed and thread count the output is reproducible.
pub fn render(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    render_with_threads(camera, world, seed, threads)
}

/// Render the scene with an explicit worker count.
pub fn render_with_threads(
    camera: &Camera,
    world: &dyn Hittable,
    seed: u64,
    threads: usize,
) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    assert!(height > 0, "camera must be initialized before rendering");

    let mut image = ImageBuffer::new(width, height);
    let rows_per_band = (height as usize).div_ceil(threads.max(1));
    let remaining = AtomicU32::new(height);

    log::info!("Rendering {width}x{height} on {threads} thread(s)");

    std::thread::scope(|scope| {
        // Each band is a disjoint &mut slice of the framebuffer, so every
        // pixel has exactly one writer and no locking is needed.
        for (band_index, band) in image
            .pixels
            .chunks_mut(rows_per_band * width as usize)
            .enumerate()
        {
            let remaining = &remaining;
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(band_index as u64));
                let first_row = band_index * rows_per_band;

                for (local_y, row) in band.chunks_mut(width as usize).enumerate() {
                    let y = (first_row + local_y) as u32;
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = render_pixel(camera, world, x as u32, y, &mut rng);
                    }
                    let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
                    log::info!("Scanlines remaining: {left}");
                }
            });
        }
    });

    image
}
