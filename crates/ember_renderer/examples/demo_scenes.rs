//! Demo scene gallery.
//!
//! Builds one of several test scenes, renders it, and writes a PPM file.
//!
//! Usage: `demo_scenes [scene] [output.ppm]` where scene is one of
//! `spheres`, `checkers`, `earth`, `perlin`, `quads`, `box-light`.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use ember_core::{CheckerTexture, ImageTexture, NoiseTexture, PixelStore, Texture};
use ember_renderer::{
    render, write_ppm, BvhNode, Camera, Color, Dielectric, DiffuseLight, Hittable, HittableList,
    Lambertian, Material, Metal, Quad, Sphere, Vec3,
};
use rand::Rng;

fn main() -> Result<()> {
    env_logger::init();

    let scene_name = std::env::args().nth(1).unwrap_or_else(|| "spheres".into());
    let output = std::env::args().nth(2).unwrap_or_else(|| "output.ppm".into());

    let (world, camera) = match scene_name.as_str() {
        "spheres" => random_spheres()?,
        "checkers" => checkered_spheres()?,
        "earth" => earth()?,
        "perlin" => perlin_spheres()?,
        "quads" => quads()?,
        "box-light" => box_with_light()?,
        other => bail!("unknown scene '{other}'"),
    };

    println!(
        "rendering '{}' at {}x{}...",
        scene_name,
        camera.image_width,
        camera.image_height()
    );

    let start = Instant::now();
    let image = render(&camera, world.as_ref());
    println!("rendered in {:?}", start.elapsed());

    let file = File::create(&output).with_context(|| format!("creating {output}"))?;
    write_ppm(&image, &mut BufWriter::new(file)).context("writing image")?;
    println!("saved to {output}");

    Ok(())
}

/// The classic random sphere field over a checkered ground.
fn random_spheres() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();

    let checker = CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    );
    let ground: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(checker)));
    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let mut rng = rand::thread_rng();
    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                // Small diffuse spheres bounce upward over the shutter.
                let center2 = center + Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                list.add(Arc::new(Sphere::new_moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                Arc::new(Metal::new(albedo, 0.5 * rng.gen::<f32>()))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            list.add(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    list.add(Arc::new(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, glass)));

    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        earth_or_brown()?,
    )));
    list.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// Two large spheres sharing one checker texture, nearly touching.
fn checkered_spheres() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::from_texture(checker));

    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -10.0, 0.0),
        10.0,
        material.clone(),
    )));
    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 10.0, 0.0),
        10.0,
        material,
    )));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// A single globe mapped with the earth image.
fn earth() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();
    list.add(Arc::new(Sphere::new(Vec3::ZERO, 2.0, earth_or_brown()?)));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// Two spheres shaded with marble Perlin noise.
fn perlin_spheres() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();

    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0));
    let marble: Arc<dyn Material> = Arc::new(Lambertian::from_texture(noise));

    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    list.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// Five colored quads facing the camera.
fn quads() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();

    let left_red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    list.add(Arc::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(400, 1.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// An open box of colored quads lit by a small emissive panel.
fn box_with_light() -> Result<(Arc<dyn Hittable>, Camera)> {
    let mut list = HittableList::new();

    let left_red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));
    let lamp: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 0.0, 2.0),
        1.0,
        earth_or_brown()?,
    )));

    list.add(Arc::new(Quad::new(
        Vec3::new(-1.0, 1.9, 1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
        lamp,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 4.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(2.0, -2.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, 2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 4.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&list)?);

    let mut camera = Camera::new()
        .with_image(200, 1.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.02, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));
    camera.initialize();

    Ok((world, camera))
}

/// Earth image texture if `earthmap.jpg` is present, otherwise plain brown.
fn earth_or_brown() -> Result<Arc<dyn Material>> {
    let mut store = PixelStore::new();
    let material: Arc<dyn Material> = match store.load("earthmap.jpg") {
        Ok(image) => Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::new(image)))),
        Err(err) => {
            log::warn!("earthmap.jpg unavailable ({err}), using solid color");
            Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)))
        }
    };
    Ok(material)
}
