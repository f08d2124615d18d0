//! Built-in test scenes.
//!
//! Usage: `ember <scene_number> > output.ppm`
//! The PPM stream goes to stdout; progress and diagnostics go to stderr.

use anyhow::{bail, Context, Result};
use ember_math::{Point3, Vec3};
use ember_render::{
    cube_map, load_mesh, make_box, render, write_ppm, BvhNode, Camera, CheckerTexture, Color,
    ConstantMedium, Dielectric, DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian,
    Metal, NoiseTexture, Quad, RotateY, Sphere, Texture, Translate, Triangle,
};
use std::io::{BufWriter, Write};
use std::sync::Arc;

/// Base seed for the per-worker generators; renders are reproducible for a
/// fixed seed and thread count.
const RENDER_SEED: u64 = 0;

fn moon_scene() -> Result<(Camera, HittableList)> {
    let moon_texture = open_texture("textures/moon_texture.jpeg")?;
    let moon_surface = Arc::new(Lambertian::textured(moon_texture));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::ZERO, 2.0, moon_surface)));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(Color::ZERO)
        .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Ok((camera, world))
}

fn perlin_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(pertext.clone())),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Lambertian::textured(pertext)),
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Ok((camera, world))
}

fn quads_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let left_red = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    world.add(Arc::new(Quad::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(100, 50)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);

    Ok((camera, world))
}

fn light_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let pertext: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(pertext.clone())),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Lambertian::textured(pertext)),
    )));

    let difflight = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.add(Arc::new(Quad::new(
        Point3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        difflight.clone(),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 7.0, 0.0),
        2.0,
        difflight,
    )));

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_background(Color::ZERO)
        .with_position(
            Point3::new(26.0, 3.0, 6.0),
            Point3::new(0.0, 2.0, 0.0),
            Vec3::Y,
        )
        .with_lens(20.0, 0.0, 10.0);

    Ok((camera, world))
}

fn cornell_smoke_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light = Arc::new(DiffuseLight::new(Color::splat(7.0)));

    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    let box1: Arc<dyn Hittable> = Arc::new(make_box(
        Point3::ZERO,
        Point3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let box1: Arc<dyn Hittable> = Arc::new(RotateY::new(box1, 15.0));
    let box1: Arc<dyn Hittable> = Arc::new(Translate::new(box1, Vec3::new(265.0, 0.0, 295.0)));

    let box2: Arc<dyn Hittable> = Arc::new(make_box(
        Point3::ZERO,
        Point3::new(165.0, 165.0, 165.0),
        white,
    ));
    let box2: Arc<dyn Hittable> = Arc::new(RotateY::new(box2, -18.0));
    let box2: Arc<dyn Hittable> = Arc::new(Translate::new(box2, Vec3::new(130.0, 0.0, 65.0)));

    world.add(Arc::new(ConstantMedium::new(box1, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::new(box2, 0.01, Color::ONE)));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(200, 50)
        .with_background(Color::ZERO)
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);

    Ok((camera, world))
}

fn diamond_block_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    // Floor
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        checker_floor(),
    )));

    // Diamond block
    let diamond_texture = open_texture("textures/diamond.jpg")?;
    world.extend(make_box(
        Point3::ZERO,
        Point3::splat(2.0),
        Arc::new(Lambertian::textured(diamond_texture)),
    ));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(400, 50)
        .with_background(Color::new(0.7, 0.8, 1.0))
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Ok((camera, world))
}

fn tri_test_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let diamond_texture = open_texture("textures/diamond.jpg")?;

    // Solid color triangle
    world.add(Arc::new(Triangle::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        red,
    )));

    // Textured triangle
    world.add(Arc::new(Triangle::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        Arc::new(Lambertian::textured(diamond_texture)),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(100, 50)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);

    Ok((camera, world))
}

fn obj_test_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    // Floor
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        checker_floor(),
    )));

    let red = Arc::new(Metal::new(Color::new(0.65, 0.05, 0.05), 0.5));
    world.extend(load_mesh("models/sword.obj", red).context("loading models/sword.obj")?);

    world.extend(skybox(100.0)?);

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(100, 50)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(Point3::new(0.0, 5.0, 10.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 3.0, 10.0);

    Ok((camera, world))
}

fn skybox_test_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();
    world.extend(skybox(100.0)?);

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(100, 500)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(
            Point3::new(0.0, 11.0, 10.0),
            Point3::new(200.0, 0.0, 0.0),
            Vec3::Y,
        )
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

fn ray_intersection_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Point3::new(-2.0, 0.0, 0.0),
        3.0,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    )));
    world.add(Arc::new(Triangle::new(
        Point3::new(5.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05))),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(100, 500)
        .with_background(Color::new(0.7, 0.5, 1.0))
        .with_position(Point3::new(0.0, 11.0, 10.0), Point3::ZERO, Vec3::Y)
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

fn volume_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::new(0.0, 3.0, 0.0),
        3.0,
        Arc::new(Lambertian::new(Color::ZERO)),
    ));
    world.add(Arc::new(ConstantMedium::new(boundary, 0.5, Color::ZERO)));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        checker_floor(),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(200, 500)
        .with_background(Color::ONE)
        .with_position(Point3::new(0.0, 8.0, 6.0), Point3::ZERO, Vec3::Y)
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

fn motion_blur_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new_moving(
        Point3::new(0.0, 3.0, 0.0),
        Point3::ZERO,
        3.0,
        Arc::new(Lambertian::new(Color::ZERO)),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(200, 500)
        .with_background(Color::ONE)
        .with_position(Point3::new(0.0, 8.0, 6.0), Point3::ZERO, Vec3::Y)
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

fn perlin_ball_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    let tex1: Arc<dyn Texture> = Arc::new(NoiseTexture::new(0.0));
    let tex2: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    world.add(Arc::new(Sphere::new(
        Point3::new(-3.5, 3.0, 0.0),
        3.0,
        Arc::new(Lambertian::textured(tex1)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(3.5, 3.0, 0.0),
        3.0,
        Arc::new(Lambertian::textured(tex2)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        checker_floor(),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(200, 500)
        .with_background(Color::ONE)
        .with_position(Point3::new(0.0, 9.0, 7.0), Point3::ZERO, Vec3::Y)
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

fn materials_scene() -> Result<(Camera, HittableList)> {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Point3::new(-3.0, 3.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.5, 1.0, 0.5))),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 3.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(1.0, 0.5, 0.5), 0.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(3.0, 3.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(0.5)),
    )));

    let glow = Arc::new(DiffuseLight::new(Color::splat(7.0)));
    for x in [-3.0, 0.0, 3.0] {
        world.add(Arc::new(Sphere::new(
            Point3::new(x, 6.0, -1.0),
            0.5,
            glow.clone(),
        )));
    }

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        checker_floor(),
    )));

    let camera = Camera::new()
        .with_image(1.0, 400)
        .with_quality(200, 500)
        .with_background(Color::splat(0.5))
        .with_position(
            Point3::new(0.0, 3.0, -5.0),
            Point3::new(0.0, 3.0, 10.0),
            Vec3::Y,
        )
        .with_lens(90.0, 0.0, 10.0);

    Ok((camera, world))
}

/// Checkered ground material shared by several scenes.
fn checker_floor() -> Arc<Lambertian> {
    let checker = Arc::new(CheckerTexture::with_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    Arc::new(Lambertian::textured(checker))
}

fn open_texture(path: &str) -> Result<Arc<dyn Texture>> {
    let texture = ImageTexture::open(path).with_context(|| format!("loading texture {path}"))?;
    Ok(Arc::new(texture))
}

/// Image-textured skybox with the given scene radius.
fn skybox(sr: f64) -> Result<HittableList> {
    Ok(cube_map(
        open_texture("skybox/left.jpg")?,
        open_texture("skybox/right.jpg")?,
        open_texture("skybox/front.jpg")?,
        open_texture("skybox/back.jpg")?,
        open_texture("skybox/top.jpg")?,
        open_texture("skybox/bottom.jpg")?,
        sr,
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene: u32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid scene number: {arg}"))?,
        None => bail!("Usage: ember <scene_number> > <output_file.ppm>"),
    };

    let (mut camera, world) = match scene {
        1 => moon_scene()?,
        2 => perlin_scene()?,
        3 => quads_scene()?,
        4 => light_scene()?,
        5 => cornell_smoke_scene()?,
        6 => diamond_block_scene()?,
        7 => tri_test_scene()?,
        8 => obj_test_scene()?,
        9 => skybox_test_scene()?,
        10 => ray_intersection_scene()?,
        11 => volume_scene()?,
        12 => motion_blur_scene()?,
        13 => perlin_ball_scene()?,
        14 => materials_scene()?,
        other => bail!("unknown scene number: {other} (expected 1-14)"),
    };

    camera.initialize();
    let bvh = BvhNode::from_list(world);

    let image = render(&camera, &bvh, RENDER_SEED);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_ppm(&mut out, &image)?;
    out.flush()?;

    Ok(())
}
