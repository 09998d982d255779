//! Deep-space backdrop.
//!
//! Three layers seen through a [`SpaceCamera`] that dives into the scene as
//! the page scrolls and leans toward the pointer:
//!
//! - a shell of distant stars turning a few milliradians per second, with a
//!   slow shared twinkle;
//! - a box of tumbling asteroids that wrap at its faces;
//! - a planet shaded per pixel from value noise, with a cloud layer and an
//!   atmosphere rim.
//!
//! ```ignore
//! let mut backdrop = Backdrop::new(BackdropConfig::default(), Some(3));
//! let tilt = pointer_ndc(pointer.position, width, height);
//! backdrop.step(scroll_progress, tilt, dt);
//! backdrop.draw(&mut canvas);
//! ```
//!
//! The shell and the planet are timed by `dt`. Asteroids move a fixed amount
//! per frame, and the camera eases a fixed fraction per frame, so their feel
//! follows the display rate.

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::config::BackdropConfig;
use crate::spawn::Spawner;
use crate::visuals::Color;
use glam::{Mat3, Quat, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// World size of a shell star per unit of its `size`.
const STAR_POINT_SIZE: f32 = 0.4;
/// Share of the wrap box that asteroids spawn in.
const SPAWN_FILL: f32 = 0.8;
/// Largest asteroid displacement per frame on each axis.
const ASTEROID_DRIFT: f32 = 0.025;
/// Largest asteroid rotation per frame (radians).
const ASTEROID_SPIN: f32 = 0.02;
const ATMOSPHERE_SCALE: f32 = 7.6 / 7.0;
const ATMOSPHERE_ALPHA: f32 = 0.06;
const CLOUD_OPACITY: f32 = 0.15;
const LAND_THRESHOLD: f32 = 0.55;

/// Shared opacity of the star shell: `0.8 ± 0.2`, one cycle every 4π s.
pub fn twinkle(elapsed: f32) -> f32 {
    0.8 + (elapsed * 0.5).sin() * 0.2
}

/// Pointer position in normalized device coordinates, x right and y up,
/// both clamped to [-1, 1]. An empty surface yields the center.
pub fn pointer_ndc(position: Vec2, width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 || !position.is_finite() {
        return Vec2::ZERO;
    }
    Vec2::new(
        position.x / width as f32 * 2.0 - 1.0,
        1.0 - position.y / height as f32 * 2.0,
    )
    .clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Teleport a point that left `[min, max]` to the opposite face, per axis.
pub fn wrap_box(p: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    let axis = |v: f32, lo: f32, hi: f32| {
        if v > hi {
            lo
        } else if v < lo {
            hi
        } else {
            v
        }
    };
    Vec3::new(
        axis(p.x, min.x, max.x),
        axis(p.y, min.y, max.y),
        axis(p.z, min.z, max.z),
    )
}

fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Camera
// ============================================================================

/// Camera that trails its scroll and pointer targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceCamera {
    pub position: Vec3,
    /// Rotation about X; negative looks down.
    pub pitch: f32,
    fov_degrees: f32,
}

impl SpaceCamera {
    pub fn new(config: &BackdropConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.camera_start_z),
            pitch: 0.0,
            fov_degrees: config.fov_degrees,
        }
    }

    /// Resting depth for a scroll progress.
    pub fn target_z(config: &BackdropConfig, scroll: f32) -> f32 {
        config.camera_start_z - unit(scroll) * config.camera_travel
    }

    pub fn target_pitch(config: &BackdropConfig, scroll: f32) -> f32 {
        -unit(scroll) * config.camera_pitch
    }

    /// Close `camera_follow` of the gap to the targets. `pointer` is in
    /// normalized device coordinates.
    pub fn follow(&mut self, config: &BackdropConfig, scroll: f32, pointer: Vec2) {
        let k = config.camera_follow;
        let goal = Vec3::new(
            pointer.x * config.pointer_tilt,
            pointer.y * config.pointer_tilt,
            Self::target_z(config, scroll),
        );
        self.position += (goal - self.position) * k;
        self.pitch += (Self::target_pitch(config, scroll) - self.pitch) * k;
    }

    /// Look-at camera for projection.
    pub fn camera(&self) -> Camera {
        let forward = Vec3::new(0.0, self.pitch.sin(), -self.pitch.cos());
        Camera::new(self.position, self.position + forward, self.fov_degrees)
    }
}

// ============================================================================
// Layers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistantStar {
    pub position: Vec3,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub position: Vec3,
    /// Displacement per frame.
    pub velocity: Vec3,
    pub rotation: Vec3,
    /// Rotation per frame. Only X and Y are applied.
    pub spin: Vec3,
    pub scale: f32,
}

impl Asteroid {
    fn advance(&mut self, min: Vec3, max: Vec3) {
        self.position = wrap_box(self.position + self.velocity, min, max);
        self.rotation.x += self.spin.x;
        self.rotation.y += self.spin.y;
    }

    fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera, center: Vec2, depth: f32) {
        let (_, h) = canvas.size();
        let r = camera.pixel_scale(self.scale, depth, h);
        if r.is_nan() || r <= 0.25 {
            return;
        }
        canvas.fill_circle(center, r, Color::ROCK, 1.0);

        // Pentagon outline, squashed by the X tumble.
        let squash = self.rotation.x.cos();
        let corner = |k: usize| {
            let a = self.rotation.y + k as f32 * TAU / 5.0;
            center + Vec2::new(a.cos(), a.sin() * squash) * r
        };
        for k in 0..5 {
            canvas.stroke_line(corner(k), corner(k + 1), Color::ROCK_EDGE, 0.6);
        }
    }
}

/// Planet with a spinning surface and a faster cloud layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    pub center: Vec3,
    pub radius: f32,
    /// Axis tilt about X (radians).
    pub tilt: f32,
    /// Surface rotation about the tilted axis (radians).
    pub spin: f32,
    pub cloud_spin: f32,
}

impl Planet {
    /// Color of the surface point whose view-space normal is `normal`.
    ///
    /// Land and ocean come from noise in the body frame, so they turn with
    /// the planet. Lighting and the rim glow stay fixed to the view.
    pub fn shade(&self, normal: Vec3, view_to_world: Mat3, light: Vec3) -> Vec3 {
        let world = view_to_world * normal;
        let untilt = Quat::from_rotation_x(-self.tilt);

        let surface = Quat::from_rotation_y(-self.spin) * untilt * world;
        let base = if value_noise(surface * 4.0) > LAND_THRESHOLD {
            Vec3::from(Color::LAND.to_f32())
        } else {
            Vec3::from(Color::OCEAN.to_f32())
        };

        let diffuse = normal.dot(light).max(0.1);
        let rim = (1.0 - normal.z.max(0.0)).powf(2.5);
        let mut rgb = base * diffuse + base * 0.2 + Vec3::new(0.4, 0.7, 1.0) * rim * 0.8;

        let sky = Quat::from_rotation_y(-self.cloud_spin) * untilt * world;
        let cover = smoothstep(0.5, 0.8, value_noise(sky * 3.0 + Vec3::splat(17.0)));
        rgb += Vec3::splat(CLOUD_OPACITY * cover * diffuse);
        rgb
    }

    fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera, center: Vec2, depth: f32) {
        let (w, h) = canvas.size();
        let r = camera.pixel_scale(self.radius, depth, h);
        if !r.is_finite() || r < 0.5 {
            return;
        }
        canvas.fill_circle(center, r * ATMOSPHERE_SCALE, Color::ATMOSPHERE, ATMOSPHERE_ALPHA);

        let view_to_world = Mat3::from_mat4(camera.view_matrix()).transpose();
        let light = Vec3::ONE.normalize();
        let x0 = (center.x - r).floor().max(0.0) as i64;
        let x1 = (center.x + r).ceil().min(w as f32 - 1.0) as i64;
        let y0 = (center.y - r).floor().max(0.0) as i64;
        let y1 = (center.y + r).ceil().min(h as f32 - 1.0) as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                // Offset from the disk center in radii, y up.
                let d = Vec2::new(x as f32 + 0.5 - center.x, center.y - (y as f32 + 0.5)) / r;
                let d2 = d.length_squared();
                if d2 > 1.0 {
                    continue;
                }
                let normal = Vec3::new(d.x, d.y, (1.0 - d2).sqrt());
                let rgb = self.shade(normal, view_to_world, light);
                canvas.plot(x, y, Color::from_f32(rgb.to_array()), 1.0);
            }
        }
    }
}

fn hash(p: Vec3) -> f32 {
    let h = p.dot(Vec3::new(12.9898, 78.233, 45.164)).sin() * 43_758.547;
    h - h.floor()
}

/// Trilinear value noise in [0, 1].
pub fn value_noise(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (Vec3::splat(3.0) - 2.0 * f);
    let c = |x: f32, y: f32, z: f32| hash(i + Vec3::new(x, y, z));
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

    let near = lerp(
        lerp(c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), f.x),
        lerp(c(0.0, 1.0, 0.0), c(1.0, 1.0, 0.0), f.x),
        f.y,
    );
    let far = lerp(
        lerp(c(0.0, 0.0, 1.0), c(1.0, 0.0, 1.0), f.x),
        lerp(c(0.0, 1.0, 1.0), c(1.0, 1.0, 1.0), f.x),
        f.y,
    );
    lerp(near, far, f.z)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// ============================================================================
// Backdrop
// ============================================================================

#[derive(Debug, Clone)]
pub struct Backdrop {
    config: BackdropConfig,
    camera: SpaceCamera,
    stars: Vec<DistantStar>,
    /// Shell rotation about X and Y (radians).
    shell_rotation: Vec2,
    asteroids: Vec<Asteroid>,
    planet: Planet,
    elapsed: f32,
}

impl Backdrop {
    pub fn new(config: BackdropConfig, seed: Option<u64>) -> Self {
        let mut spawner = Spawner::new(seed);

        let stars = (0..config.star_count)
            .map(|_| {
                let r = spawner.random_range(config.shell_inner_radius, config.shell_outer_radius);
                DistantStar {
                    position: spawner.random_on_sphere(r),
                    size: spawner.random_range(0.5, 2.5),
                    opacity: spawner.random_range(0.3, 1.0),
                }
            })
            .collect();

        let center = (config.asteroid_min + config.asteroid_max) * 0.5;
        let half = (config.asteroid_max - config.asteroid_min) * 0.5 * SPAWN_FILL;
        let asteroids = (0..config.asteroid_count)
            .map(|_| Asteroid {
                position: center
                    + Vec3::new(
                        spawner.jitter(half.x),
                        spawner.jitter(half.y),
                        spawner.jitter(half.z),
                    ),
                velocity: Vec3::new(
                    spawner.jitter(ASTEROID_DRIFT),
                    spawner.jitter(ASTEROID_DRIFT),
                    spawner.jitter(ASTEROID_DRIFT),
                ),
                rotation: Vec3::new(spawner.random(), spawner.random(), spawner.random()) * PI,
                spin: Vec3::new(spawner.random(), spawner.random(), spawner.random())
                    * ASTEROID_SPIN,
                scale: spawner.random_range(0.4, 1.6),
            })
            .collect();

        let planet = Planet {
            center: config.planet_center,
            radius: config.planet_radius,
            tilt: config.planet_tilt,
            spin: 0.0,
            cloud_spin: 0.0,
        };

        tracing::debug!(
            stars = config.star_count,
            asteroids = config.asteroid_count,
            "backdrop built"
        );

        Self {
            camera: SpaceCamera::new(&config),
            stars,
            shell_rotation: Vec2::ZERO,
            asteroids,
            planet,
            elapsed: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn camera(&self) -> &SpaceCamera {
        &self.camera
    }

    pub fn stars(&self) -> &[DistantStar] {
        &self.stars
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// Shell rotation about X and Y in radians.
    pub fn shell_rotation(&self) -> Vec2 {
        self.shell_rotation
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance one frame.
    ///
    /// The camera always eases toward `scroll` and `pointer`, so scrolling
    /// still responds while paused. Everything else holds still when `dt`
    /// is not positive.
    pub fn step(&mut self, scroll: f32, pointer: Vec2, dt: f32) {
        self.camera.follow(&self.config, scroll, pointer);

        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        let [spin_x, spin_y] = self.config.shell_spin;
        self.shell_rotation += Vec2::new(spin_x, spin_y) * dt;

        let (min, max) = (self.config.asteroid_min, self.config.asteroid_max);
        for asteroid in &mut self.asteroids {
            asteroid.advance(min, max);
        }

        self.planet.spin += self.config.planet_spin * dt;
        self.planet.cloud_spin += self.config.cloud_spin * dt;
    }

    /// Draw the shell, then the planet and asteroids far to near.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let (w, h) = canvas.size();
        if w == 0 || h == 0 {
            return;
        }
        let camera = self.camera.camera();

        let shell = Quat::from_rotation_x(self.shell_rotation.x)
            * Quat::from_rotation_y(self.shell_rotation.y);
        let fade = twinkle(self.elapsed);
        for star in &self.stars {
            let Some((p, depth)) = camera.project(shell * star.position, w, h) else {
                continue;
            };
            let radius = camera
                .pixel_scale(star.size * STAR_POINT_SIZE, depth, h)
                .max(0.5);
            canvas.fill_circle(p, radius, Color::WHITE, star.opacity * fade);
        }

        let mut rocks: Vec<(Vec2, f32, &Asteroid)> = self
            .asteroids
            .iter()
            .filter_map(|a| camera.project(a.position, w, h).map(|(p, d)| (p, d, a)))
            .collect();
        rocks.sort_by(|a, b| b.1.total_cmp(&a.1));

        let planet = camera.project(self.planet.center, w, h);
        let mut planet_drawn = false;
        for (p, depth, asteroid) in rocks {
            if let Some((center, planet_depth)) = planet {
                if !planet_drawn && depth < planet_depth {
                    self.planet.draw(canvas, &camera, center, planet_depth);
                    planet_drawn = true;
                }
            }
            asteroid.draw(canvas, &camera, p, depth);
        }
        if let (false, Some((center, planet_depth))) = (planet_drawn, planet) {
            self.planet.draw(canvas, &camera, center, planet_depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;

    fn small_config() -> BackdropConfig {
        BackdropConfig {
            star_count: 500,
            ..BackdropConfig::default()
        }
    }

    #[test]
    fn test_shell_lies_between_radii() {
        let backdrop = Backdrop::new(small_config(), Some(1));
        assert_eq!(backdrop.stars().len(), 500);
        for star in backdrop.stars() {
            let r = star.position.length();
            assert!((299.9..=800.1).contains(&r), "radius {}", r);
            assert!((0.3..=1.0).contains(&star.opacity));
        }
    }

    #[test]
    fn test_shell_rotation_rate() {
        let mut backdrop = Backdrop::new(small_config(), Some(1));
        for _ in 0..10 {
            backdrop.step(0.0, Vec2::ZERO, 0.5);
        }
        let rot = backdrop.shell_rotation();
        assert!((rot.x - 0.005).abs() < 1e-6);
        assert!((rot.y - 0.02).abs() < 1e-6);
        assert!((backdrop.planet().spin - 0.2).abs() < 1e-5);
        assert!((backdrop.planet().cloud_spin - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_twinkle_swings_around_point_eight() {
        assert!((twinkle(0.0) - 0.8).abs() < 1e-6);
        assert!((twinkle(PI) - 1.0).abs() < 1e-6);
        assert!((twinkle(3.0 * PI) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_box_teleports_to_opposite_face() {
        let c = BackdropConfig::default();
        let (min, max) = (c.asteroid_min, c.asteroid_max);
        assert_eq!(wrap_box(Vec3::new(50.5, 0.0, 0.0), min, max).x, -50.0);
        assert_eq!(wrap_box(Vec3::new(-50.5, 0.0, 0.0), min, max).x, 50.0);
        assert_eq!(wrap_box(Vec3::new(0.0, 30.1, 0.0), min, max).y, -30.0);
        assert_eq!(wrap_box(Vec3::new(0.0, 0.0, 20.2), min, max).z, -60.0);
        assert_eq!(wrap_box(Vec3::new(0.0, 0.0, -60.2), min, max).z, 20.0);

        let inside = Vec3::new(1.0, 2.0, -3.0);
        assert_eq!(wrap_box(inside, min, max), inside);
    }

    #[test]
    fn test_asteroids_stay_in_box() {
        let mut backdrop = Backdrop::new(small_config(), Some(4));
        let (min, max) = (backdrop.config().asteroid_min, backdrop.config().asteroid_max);
        for _ in 0..3000 {
            backdrop.step(0.5, Vec2::ZERO, 1.0 / 60.0);
            for a in backdrop.asteroids() {
                assert!(a.position.cmpge(min).all() && a.position.cmple(max).all());
            }
        }
    }

    #[test]
    fn test_camera_depth_follows_scroll() {
        let config = BackdropConfig::default();
        assert_eq!(SpaceCamera::target_z(&config, 0.0), 30.0);
        assert_eq!(SpaceCamera::target_z(&config, 1.0), -80.0);
        assert_eq!(SpaceCamera::target_z(&config, 7.0), -80.0);

        let mut camera = SpaceCamera::new(&config);
        camera.follow(&config, 0.0, Vec2::ZERO);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 30.0));

        camera.follow(&config, 1.0, Vec2::ZERO);
        assert!((camera.position.z - (30.0 - 110.0 * 0.05)).abs() < 1e-4);

        for _ in 0..400 {
            camera.follow(&config, 1.0, Vec2::ZERO);
        }
        assert!((camera.position.z + 80.0).abs() < 1e-3);
        assert!((camera.pitch + 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_tilts_camera() {
        let config = BackdropConfig::default();
        let mut camera = SpaceCamera::new(&config);
        for _ in 0..400 {
            camera.follow(&config, 0.0, Vec2::new(1.0, -1.0));
        }
        assert!((camera.position.x - 2.0).abs() < 1e-3);
        assert!((camera.position.y + 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_ndc() {
        assert_eq!(pointer_ndc(Vec2::new(100.0, 50.0), 200, 100), Vec2::ZERO);
        assert_eq!(pointer_ndc(Vec2::ZERO, 200, 100), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_ndc(Vec2::new(900.0, 900.0), 200, 100), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_ndc(Vec2::new(5.0, 5.0), 0, 0), Vec2::ZERO);
    }

    #[test]
    fn test_zero_step_holds_layers() {
        let mut backdrop = Backdrop::new(small_config(), Some(2));
        let asteroids = backdrop.asteroids().to_vec();
        for dt in [0.0, -1.0, f32::NAN] {
            backdrop.step(0.0, Vec2::ZERO, dt);
        }
        assert_eq!(backdrop.asteroids(), &asteroids[..]);
        assert_eq!(backdrop.shell_rotation(), Vec2::ZERO);
        assert_eq!(backdrop.elapsed(), 0.0);
    }

    #[test]
    fn test_value_noise_stays_in_unit_range() {
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.37, -(i as f32) * 0.11, i as f32 * 0.05 - 3.0);
            let n = value_noise(p);
            assert!((0.0..=1.0).contains(&n), "noise {} at {:?}", n, p);
        }
    }

    #[test]
    fn test_lit_side_is_brighter() {
        let planet = Backdrop::new(small_config(), Some(1)).planet;
        let light = Vec3::ONE.normalize();
        let brightness = |n: Vec3| planet.shade(n.normalize(), Mat3::IDENTITY, light).element_sum();
        // Both normals face the viewer equally, so the rim term matches.
        let lit = brightness(Vec3::new(0.5, 0.5, 0.7));
        let dark = brightness(Vec3::new(-0.5, -0.5, 0.7));
        assert!(lit > dark);
    }

    #[test]
    fn test_draw_marks_canvas() {
        let backdrop = Backdrop::new(small_config(), Some(3));
        let mut canvas = PixelCanvas::new(160, 120);
        canvas.clear(Color::BLACK);
        backdrop.draw(&mut canvas);
        assert!(canvas
            .as_raw()
            .chunks(4)
            .any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0));
    }
}
