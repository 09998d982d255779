//! Random helpers for populating scenes.
//!
//! Every scene owns one [`Spawner`]. Passing a seed makes a run reproducible,
//! which is what the tests rely on; without one the seed comes from the clock
//! so each launch looks different.
//!
//! ```ignore
//! let mut spawner = Spawner::new(Some(7));
//! let position = spawner.random_in_rect(800.0, 600.0);
//! let velocity = spawner.random_velocity(0.1);
//! ```

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded random source with helpers for common spawn patterns.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SmallRng,
}

impl Spawner {
    /// Create a spawner. `None` seeds from the system clock.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. An empty range yields `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    /// Symmetric jitter in `[-half_range, half_range)`.
    #[inline]
    pub fn jitter(&mut self, half_range: f32) -> f32 {
        (self.random() - 0.5) * 2.0 * half_range
    }

    // ========== Position helpers ==========

    /// Uniform point inside `[0, width) x [0, height)`.
    pub fn random_in_rect(&mut self, width: f32, height: f32) -> Vec2 {
        Vec2::new(
            self.random_range(0.0, width),
            self.random_range(0.0, height),
        )
    }

    /// Uniform point on the surface of a sphere of `radius` around the
    /// origin.
    pub fn random_on_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.random() * std::f32::consts::TAU;
        let phi = (2.0 * self.random() - 1.0).clamp(-1.0, 1.0).acos();
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        ) * radius
    }

    // ========== Velocity helpers ==========

    /// Velocity with each component in `[-half_range, half_range)`.
    pub fn random_velocity(&mut self, half_range: f32) -> Vec2 {
        Vec2::new(self.jitter(half_range), self.jitter(half_range))
    }

    /// Velocity tangent to `offset` in the XZ plane (counter-clockwise seen
    /// from +Y), for starting bodies on a circular path.
    pub fn tangent_velocity(offset: Vec3, speed: f32) -> Vec3 {
        let tangent = Vec3::new(-offset.z, 0.0, offset.x);
        if tangent.length_squared() > 0.0001 {
            tangent.normalize() * speed
        } else {
            Vec3::new(0.0, 0.0, speed)
        }
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(None)
    }
}
