//! Perlin gradient noise for procedural textures.

use ember_math::{Point3, Vec3};
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Perlin noise generator.
///
/// Holds randomized gradient and permutation tables built once at
/// construction; evaluation is pure and thread-safe.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build noise tables from the given generator.
    pub fn from_rng(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| random_unit_gradient(rng))
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Build noise tables from the thread-local generator.
    pub fn new() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    /// Noise value at a point, in `[-1, 1]`.
    pub fn noise(&self, p: Point3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut cell = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in cell.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, value) in row.iter_mut().enumerate() {
                    let xi = ((i + di as i32) & 255) as usize;
                    let yi = ((j + dj as i32) & 255) as usize;
                    let zi = ((k + dk as i32) & 255) as usize;
                    *value = self.gradients[self.perm_x[xi] ^ self.perm_y[yi] ^ self.perm_z[zi]];
                }
            }
        }

        perlin_interp(&cell, u, v, w)
    }

    /// Summed octaves of absolute noise ("turbulence").
    pub fn turbulence(&self, p: Point3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

fn random_unit_gradient(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sample a direction inside the unit ball, then normalize.
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    // Fisher-Yates shuffle
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        perm.swap(i, target);
    }
    perm
}

/// Trilinear interpolation of gradient dot products with Hermite smoothing.
fn perlin_interp(cell: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in cell.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let fi = i as f32;
                let fj = j as f32;
                let fk = k as f32;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_is_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let perlin = Perlin::from_rng(&mut rng);

        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * 0.11, i as f32 * 1.3);
            let n = perlin.noise(p);
            assert!((-1.0..=1.0).contains(&n), "noise {} out of range", n);
        }
    }

    #[test]
    fn test_noise_is_deterministic_per_instance() {
        let mut rng = StdRng::seed_from_u64(7);
        let perlin = Perlin::from_rng(&mut rng);

        let p = Vec3::new(1.5, 2.5, 3.5);
        assert_eq!(perlin.noise(p), perlin.noise(p));
    }

    #[test]
    fn test_turbulence_is_non_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        let perlin = Perlin::from_rng(&mut rng);

        for i in 0..50 {
            let p = Vec3::splat(i as f32 * 0.73);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
    }
}
