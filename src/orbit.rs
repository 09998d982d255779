//! Scroll-driven orbital satellite scene.
//!
//! Each satellite falls freely toward a fixed center under a softened
//! inverse-square pull. Scroll progress picks a target point on an arc of the
//! orbit circle; whenever a satellite strays further than the station-keeping
//! threshold from its target, a bounded thruster nudges it back.
//!
//! This is a toy force model tuned to look right, not an orbital mechanics
//! integrator: there is no energy budget and the constants are arbitrary.
//! Stability comes from two clamps - a radius floor before dividing by r² and
//! a cap on the time step.
//!
//! # Frame update
//!
//! ```text
//! target   = center + radius * (cos θ, 0, sin θ),  θ = arc(progress) + offset
//! gravity  = -mu / max(r, r_min)² * r̂
//! thrust   = |target - pos| > threshold ? unit(target - pos) * thruster * dt : 0
//! velocity += thrust + drift + gravity * dt
//! position += velocity * dt                      (dt clamped to [0, max_dt])
//! ```

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::config::OrbitConfig;
use crate::spawn::Spawner;
use crate::visuals::Color;
use glam::{Quat, Vec3};

/// A satellite of the fleet.
///
/// Position and velocity are only ever advanced by
/// [`OrbitalSimulator::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    position: Vec3,
    velocity: Vec3,
    thrusting: bool,
    orientation: Quat,
    angular_offset: f32,
    scale: f32,
}

impl Satellite {
    /// A satellite with an explicit state, facing +Z.
    pub fn new(position: Vec3, velocity: Vec3, angular_offset: f32, scale: f32) -> Self {
        Self {
            position,
            velocity,
            thrusting: false,
            orientation: Quat::IDENTITY,
            angular_offset,
            scale,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether station-keeping fired on the last step. Cosmetic only.
    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn angular_offset(&self) -> f32 {
        self.angular_offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// The fleet and the force model that moves it.
#[derive(Debug, Clone)]
pub struct OrbitalSimulator {
    config: OrbitConfig,
    satellites: Vec<Satellite>,
    spawner: Spawner,
}

impl OrbitalSimulator {
    /// Build the fleet described by `config`. Each satellite starts on the
    /// orbit circle at its start angle with circular-orbit speed.
    pub fn new(config: OrbitConfig, seed: Option<u64>) -> Self {
        let speed = (config.mu / config.radius).sqrt();
        let satellites = config
            .satellites
            .iter()
            .map(|s| {
                let offset = circle_point(config.radius, s.start_angle);
                Satellite::new(
                    config.center + offset,
                    Spawner::tangent_velocity(offset, speed),
                    s.angular_offset,
                    s.scale,
                )
            })
            .collect();
        Self::with_satellites(config, satellites, seed)
    }

    /// Use an explicit fleet instead of the configured one.
    pub fn with_satellites(
        config: OrbitConfig,
        satellites: Vec<Satellite>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            config,
            satellites,
            spawner: Spawner::new(seed),
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    /// Target angle for a scroll progress, before any per-satellite offset
    /// is added as `offset`.
    ///
    /// Progress 0 and 1 land exactly on the arc ends, 0.5 on its base angle.
    pub fn target_angle(&self, progress: f32, offset: f32) -> f32 {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.config.arc_base_angle + (p * 2.0 - 1.0) * self.config.arc_half_span + offset
    }

    /// Point on the orbit circle targeted at this progress.
    pub fn target_position(&self, progress: f32, offset: f32) -> Vec3 {
        self.config.center + circle_point(self.config.radius, self.target_angle(progress, offset))
    }

    /// Advance every satellite by one frame.
    pub fn step(&mut self, progress: f32, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };
        // A zero step leaves the fleet, and the drift RNG, untouched.
        if dt <= 0.0 {
            return;
        }

        for i in 0..self.satellites.len() {
            let target = self.target_position(progress, self.satellites[i].angular_offset);
            let drift = if self.config.drift_strength > 0.0 {
                let half = self.config.drift_strength * 0.5;
                Vec3::new(self.spawner.jitter(half), 0.0, self.spawner.jitter(half))
            } else {
                Vec3::ZERO
            };
            integrate(&mut self.satellites[i], &self.config, target, drift, dt);
        }
    }

    /// Project the fleet through `camera` and draw it.
    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera) {
        for sat in &self.satellites {
            draw_satellite(canvas, camera, sat);
        }
    }
}

fn circle_point(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

fn integrate(sat: &mut Satellite, c: &OrbitConfig, target: Vec3, drift: Vec3, dt: f32) {
    let r_vec = sat.position - c.center;
    let r = r_vec.length().max(c.min_radius);
    let gravity = -r_vec.normalize_or_zero() * (c.mu / (r * r));

    let to_target = target - sat.position;
    let distance = to_target.length();
    sat.thrusting = distance > c.station_keeping_threshold;
    if sat.thrusting {
        sat.velocity += to_target.normalize_or_zero() * c.thruster_strength * dt;
    }

    sat.velocity += drift;
    sat.velocity += gravity * dt;
    sat.position += sat.velocity * dt;

    let speed = sat.velocity.length();
    if speed > c.velocity_epsilon && speed.is_finite() {
        let facing = Quat::from_rotation_arc(Vec3::Z, sat.velocity / speed);
        sat.orientation = sat.orientation.slerp(facing, c.attitude_slerp).normalize();
    }
}

/// Model-space layout of the procedural satellite.
mod model {
    use glam::Vec3;

    pub const BODY_RADIUS: f32 = 0.6;
    pub const FOIL_RADIUS: f32 = 0.45;
    pub const WING_ROOT: f32 = 0.5;
    pub const WING_TIP: f32 = 3.5;
    pub const WING_HALF_HEIGHT: f32 = 0.4;
    pub const DISH: Vec3 = Vec3::new(0.0, 0.9, 0.0);
    pub const DISH_RADIUS: f32 = 0.3;
    pub const NOZZLES: [Vec3; 2] = [Vec3::new(-0.4, -0.6, 0.0), Vec3::new(0.4, -0.6, 0.0)];
    pub const FLAME_OFFSET: Vec3 = Vec3::new(0.0, -0.3, 0.0);
    pub const FLAME_RADIUS: f32 = 0.12;
}

fn draw_satellite(canvas: &mut dyn Canvas, camera: &Camera, sat: &Satellite) {
    let (w, h) = canvas.size();
    let to_world = |local: Vec3| sat.position + sat.orientation * (local * sat.scale);
    let Some((center, depth)) = camera.project(sat.position, w, h) else {
        return;
    };
    let px = |world_size: f32| camera.pixel_scale(world_size * sat.scale, depth, h);

    // Solar wings: a few spans per side read as a panel at this size.
    for side in [-1.0f32, 1.0] {
        let rows = 5;
        for row in 0..rows {
            let y = -model::WING_HALF_HEIGHT
                + 2.0 * model::WING_HALF_HEIGHT * row as f32 / (rows - 1) as f32;
            let root = to_world(Vec3::new(side * model::WING_ROOT, y, 0.0));
            let tip = to_world(Vec3::new(side * model::WING_TIP, y, 0.0));
            if let (Some((a, _)), Some((b, _))) =
                (camera.project(root, w, h), camera.project(tip, w, h))
            {
                canvas.stroke_line(a, b, Color::PANEL, 0.9);
            }
        }
    }

    canvas.fill_circle(center, px(model::BODY_RADIUS), Color::HULL, 1.0);
    canvas.fill_circle(center, px(model::FOIL_RADIUS), Color::FOIL, 0.9);

    if let Some((dish, dish_depth)) = camera.project(to_world(model::DISH), w, h) {
        let r = camera.pixel_scale(model::DISH_RADIUS * sat.scale, dish_depth, h);
        canvas.fill_circle(dish, r, Color::rgb(0xA1, 0xA1, 0xAA), 1.0);
    }

    if sat.thrusting {
        for nozzle in model::NOZZLES {
            if let Some((flame, flame_depth)) =
                camera.project(to_world(nozzle + model::FLAME_OFFSET), w, h)
            {
                let r = camera.pixel_scale(model::FLAME_RADIUS * sat.scale, flame_depth, h);
                canvas.fill_circle(flame, r, Color::FLAME, 0.8);
            }
        }
    }
}
