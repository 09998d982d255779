//! Pointer-reactive star field.
//!
//! A fixed pool of 2D stars drifts across the surface. Stars near the pointer
//! are pulled toward it and brighten; everything is damped by friction and
//! wraps around the edges.
//!
//! # Frame rule
//!
//! For every star, independently, every frame:
//!
//! 1. `position += velocity`
//! 2. inside the pointer radius: `velocity += (pointer - position) * falloff *
//!    strength` and brightness rises toward 1; otherwise brightness decays
//!    toward the floor
//! 3. `velocity *= friction`
//! 4. toroidal wrap into `[0, width) x [0, height)`
//! 5. draw a filled circle with alpha = brightness
//!
//! ```ignore
//! let mut field = StarField::new(StarFieldConfig::default(), Some(1));
//! field.resize(1280, 720);
//! field.set_pointer(640.0, 360.0, true);
//! field.tick(&mut canvas);
//! ```

use crate::canvas::Canvas;
use crate::config::StarFieldConfig;
use crate::input::Pointer;
use crate::spawn::Spawner;
use crate::visuals::StarColor;
use glam::Vec2;

/// A single star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Current opacity in `[0, 1]`.
    pub brightness: f32,
    pub color: StarColor,
}

/// The star pool plus the surface it lives on.
#[derive(Debug, Clone)]
pub struct StarField {
    config: StarFieldConfig,
    stars: Vec<Star>,
    width: f32,
    height: f32,
    pointer: Pointer,
    spawner: Spawner,
}

impl StarField {
    /// Create an empty field. Call [`StarField::resize`] to populate it.
    pub fn new(config: StarFieldConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            stars: Vec::new(),
            width: 0.0,
            height: 0.0,
            pointer: Pointer::default(),
            spawner: Spawner::new(seed),
        }
    }

    pub fn config(&self) -> &StarFieldConfig {
        &self.config
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Direct access for scripted setups and tests.
    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Reinitialize the whole pool for a new surface size.
    ///
    /// Safe to call on every resize event. A zero dimension leaves the pool
    /// empty, which makes every frame a no-op.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
        self.stars.clear();
        if width == 0 || height == 0 {
            return;
        }

        let c = &self.config;
        let spawner = &mut self.spawner;
        self.stars.extend((0..c.star_count).map(|_| Star {
            position: spawner.random_in_rect(width as f32, height as f32),
            velocity: spawner.random_velocity(c.initial_speed),
            radius: spawner.random_range(c.radius_min, c.radius_max),
            brightness: spawner.random_range(c.brightness_min, c.brightness_max),
            color: if spawner.chance(c.indigo_fraction) {
                StarColor::Indigo
            } else {
                StarColor::White
            },
        }));
    }

    /// Record the latest pointer sample. `active = false` means the pointer
    /// left the surface.
    pub fn set_pointer(&mut self, x: f32, y: f32, active: bool) {
        self.pointer = Pointer {
            position: Vec2::new(x, y),
            active,
        };
    }

    /// Advance one frame with the stored pointer and draw.
    pub fn tick(&mut self, canvas: &mut dyn Canvas) {
        let pointer = self.pointer;
        self.step_with(&pointer);
        self.draw(canvas);
    }

    /// Advance one frame using an explicit pointer sample.
    pub fn step_with(&mut self, pointer: &Pointer) {
        let (width, height) = (self.width, self.height);
        for star in &mut self.stars {
            update_star(star, pointer, &self.config, width, height);
        }
    }

    /// Draw every star as a filled circle.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for star in &self.stars {
            canvas.fill_circle(star.position, star.radius, star.color.color(), star.brightness);
        }
    }
}

fn update_star(star: &mut Star, pointer: &Pointer, c: &StarFieldConfig, width: f32, height: f32) {
    // 1. Free drift
    star.position += star.velocity;

    // 2. Pointer attraction
    let offset = pointer.position - star.position;
    let dist = offset.length();
    if pointer.active && dist < c.gravity_radius {
        let falloff = (c.gravity_radius - dist) / c.gravity_radius;
        // Scaled by the raw offset, so zero distance is a zero pull.
        star.velocity += offset * falloff * c.gravity_strength;
        star.brightness = (star.brightness + c.brightness_rise).min(1.0);
    } else if star.brightness > c.brightness_floor {
        star.brightness = (star.brightness - c.brightness_decay).max(c.brightness_floor);
    }

    // 3. Friction
    star.velocity *= c.friction;

    // 4. Wrap
    star.position.x = wrap(star.position.x, width);
    star.position.y = wrap(star.position.y, height);
}

/// Wrap `v` into `[0, extent)`.
fn wrap(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !v.is_finite() {
        return 0.0;
    }
    if (0.0..extent).contains(&v) {
        return v;
    }
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
