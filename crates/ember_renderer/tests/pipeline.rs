//! Whole-pipeline rendering properties.

use std::sync::Arc;

use ember_renderer::{
    color_to_rgb8, render_seeded, write_ppm, BvhNode, Camera, Color, DiffuseLight, HittableList,
    Material, Quad, Sphere, Vec3,
};

fn small_camera(background: Color, samples: u32) -> Camera {
    let mut camera = Camera::new()
        .with_image(8, 1.0)
        .with_quality(samples, 4)
        .with_position(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y)
        .with_background(background);
    camera.initialize();
    camera
}

#[test]
fn empty_scene_averages_to_the_background() {
    // Every sample of an empty scene returns the background, so the stored
    // sum must be exactly N * background and the average the background
    // itself, for any sample count.
    let background = Color::new(0.5, 0.25, 0.75);
    let world = HittableList::new();

    for samples in [1, 4, 16] {
        let camera = small_camera(background, samples);
        let image = render_seeded(&camera, &world, 99);

        for pixel in &image.pixels {
            let average = *pixel / samples as f32;
            assert!((average - background).length() < 1e-5);
        }

        // The writer applies gamma to the average.
        let expected = [
            (256.0 * background.x.sqrt().min(0.999)) as u8,
            (256.0 * background.y.sqrt().min(0.999)) as u8,
            (256.0 * background.z.sqrt().min(0.999)) as u8,
        ];
        assert_eq!(color_to_rgb8(image.pixels[0], samples), expected);
    }
}

#[test]
fn output_is_identical_across_thread_counts() {
    // The same seed must produce byte-identical output whether the pool has
    // one thread or many; pixel tasks never share generators or cells.
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(2.0, 1.5, 1.0)));

    let mut list = HittableList::new();
    list.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        light,
    )));
    list.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 0.0, 3.0),
        0.5,
        Arc::new(DiffuseLight::new(Color::new(0.1, 0.9, 0.4))),
    )));
    let world = Arc::new(BvhNode::from_list(&list).unwrap());

    let camera = small_camera(Color::ZERO, 8);
    let seed = 1234;

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| render_seeded(&camera, world.as_ref(), seed));

    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(8)
        .build()
        .unwrap()
        .install(|| render_seeded(&camera, world.as_ref(), seed));

    assert_eq!(single.pixels.len(), many.pixels.len());
    for (a, b) in single.pixels.iter().zip(many.pixels.iter()) {
        assert_eq!(a, b);
    }

    // Serialized bytes match too.
    let mut bytes_single = Vec::new();
    let mut bytes_many = Vec::new();
    write_ppm(&single, &mut bytes_single).unwrap();
    write_ppm(&many, &mut bytes_many).unwrap();
    assert_eq!(bytes_single, bytes_many);
}

#[test]
fn every_pixel_is_written() {
    // A pure-emissive enclosure in front of the camera: no pixel may be
    // left at its zeroed initial state when samples land on geometry or a
    // non-black background.
    let camera = small_camera(Color::new(0.7, 0.8, 1.0), 2);
    let world = HittableList::new();
    let image = render_seeded(&camera, &world, 5);

    assert_eq!(image.pixels.len(), 8 * 8);
    for pixel in &image.pixels {
        assert!(pixel.length() > 0.0);
    }
}
