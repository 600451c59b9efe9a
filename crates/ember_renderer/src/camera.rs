//! Camera: viewport geometry and primary ray generation.

use ember_math::{Color, Point3, Ray, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f32, random_in_unit_disk};

/// Virtual camera.
///
/// Public fields are the configuration surface; callers set them (directly
/// or through the builder methods), then `initialize()` derives the viewport
/// geometry once. The derived state is constant for the whole render.
#[derive(Clone)]
pub struct Camera {
    /// Image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Stochastic samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Color returned for rays that miss all geometry
    pub background: Color,

    /// Vertical field of view in degrees
    pub vfov: f32,
    pub lookfrom: Point3,
    pub lookat: Point3,
    pub vup: Vec3,

    /// Variation angle of ray origins through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from lookfrom to the plane of perfect focus
    pub focus_dist: f32,

    // Derived state, set by initialize()
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            vfov: 90.0,
            lookfrom: Vec3::new(0.0, 0.0, -1.0),
            lookat: Vec3::ZERO,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            image_height: 0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image width and aspect ratio.
    pub fn with_image(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set sampling quality.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position and orientation.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens parameters.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Derive the viewport geometry. Must be called before `get_ray`.
    pub fn initialize(&mut self) {
        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        self.center = self.lookfrom;

        // Viewport dimensions from the vertical FOV at the focus distance.
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Orthonormal camera frame.
        self.w = (self.lookfrom - self.lookat).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges.
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Image height derived by `initialize()`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Center of pixel (0, 0), derived by `initialize()`.
    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    /// Offset from one pixel to the next along a row.
    pub fn pixel_delta_u(&self) -> Vec3 {
        self.pixel_delta_u
    }

    /// Offset from one row to the next.
    pub fn pixel_delta_v(&self) -> Vec3 {
        self.pixel_delta_v
    }

    /// A randomly jittered primary ray through pixel (i, j).
    ///
    /// The origin sits at the camera center, or on the defocus disk when
    /// depth of field is enabled; the time is sampled uniformly in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = gen_f32(rng) - 0.5;
        let offset_y = gen_f32(rng) - 0.5;

        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset_x) * self.pixel_delta_u
            + (j as f32 + offset_y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin, gen_f32(rng))
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_vec_close(a: Vec3, b: Vec3, tol: f32) {
        assert!(
            (a - b).length() < tol,
            "expected {:?} to be within {} of {:?}",
            a,
            tol,
            b
        );
    }

    #[test]
    fn test_viewport_geometry_is_reproducible() {
        // Pinned outputs for a fixed configuration; these values follow
        // directly from the viewport formulas and must never drift.
        let mut camera = Camera::new()
            .with_image(200, 1.0)
            .with_position(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y)
            .with_lens(80.0, 0.0, 10.0);
        camera.initialize();

        assert_eq!(camera.image_height(), 200);

        // viewport_height = 2 * tan(40 deg) * 10 = 16.78199
        let delta = 16.781992 / 200.0;
        assert_vec_close(camera.pixel_delta_u(), Vec3::new(delta, 0.0, 0.0), 1e-4);
        assert_vec_close(camera.pixel_delta_v(), Vec3::new(0.0, -delta, 0.0), 1e-4);
        assert_vec_close(
            camera.pixel00_loc(),
            Vec3::new(-8.349041, 8.349041, -4.0),
            1e-3,
        );
    }

    #[test]
    fn test_height_is_at_least_one() {
        let mut camera = Camera::new().with_image(10, 1000.0);
        camera.initialize();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.aspect_ratio, 1.0);
        assert_eq!(camera.image_width, 100);
        assert_eq!(camera.samples_per_pixel, 10);
        assert_eq!(camera.max_depth, 10);
        assert_eq!(camera.vfov, 90.0);
        assert_eq!(camera.defocus_angle, 0.0);
        assert_eq!(camera.focus_dist, 10.0);
    }

    #[test]
    fn test_rays_leave_from_center_without_defocus() {
        let mut camera = Camera::new()
            .with_image(100, 1.0)
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let ray = camera.get_ray(50, 50, &mut rng);
            assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
            assert!((0.0..1.0).contains(&ray.time));
        }
    }

    #[test]
    fn test_defocus_jitters_origin_on_the_lens_disk() {
        let mut camera = Camera::new()
            .with_image(100, 1.0)
            .with_position(Vec3::ZERO, -Vec3::Z, Vec3::Y)
            .with_lens(90.0, 2.0, 5.0);
        camera.initialize();

        let defocus_radius = 5.0 * (1.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(22);
        let mut saw_offset = false;
        for _ in 0..50 {
            let ray = camera.get_ray(0, 0, &mut rng);
            let offset = ray.origin.length();
            assert!(offset <= defocus_radius + 1e-5);
            if offset > 1e-6 {
                saw_offset = true;
            }
        }
        assert!(saw_offset);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::new()
            .with_image(101, 1.0)
            .with_position(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(23);
        let ray = camera.get_ray(50, 50, &mut rng);
        let dir = ray.direction.normalize();
        // Center pixel looks down -Z toward the origin, within jitter.
        assert!(dir.z < -0.99);
    }
}
