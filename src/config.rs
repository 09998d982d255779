//! Scene configuration.
//!
//! Every tunable constant of the star field, the orbital scene, the page
//! layout and the loading screen lives here. Configs serialize to JSON so a
//! scene can be tweaked without recompiling:
//!
//! ```ignore
//! let config = SceneConfig::load("scene.json")?;
//! config.save("scene.backup.json")?;
//! ```
//!
//! The orbital constants are hand-tuned for a stable, readable arc on
//! screen. They are not physical quantities.

use crate::error::ConfigError;
use crate::visuals::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    /// Seed for every random source. `None` picks a fresh seed per run.
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub star_field: StarFieldConfig,
    pub orbit: OrbitConfig,
    pub camera: CameraConfig,
    pub backdrop: BackdropConfig,
    pub page: PageConfig,
    pub loading: LoadingConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "Stardrift".into(),
            seed: None,
            window: WindowConfig::default(),
            star_field: StarFieldConfig::default(),
            orbit: OrbitConfig::default(),
            camera: CameraConfig::default(),
            backdrop: BackdropConfig::default(),
            page: PageConfig::default(),
            loading: LoadingConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("saved scene config to {}", path.display());
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!("loaded scene config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a scene diverge or draw garbage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.star_field.validate()?;
        self.orbit.validate()?;
        self.page.validate()?;
        self.backdrop.validate()?;
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees must be in (0, 180)"));
        }
        if self.loading.interval_ms == 0 {
            return Err(invalid("loading.interval_ms must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

fn check_finite(values: &[(&str, f32)]) -> Result<(), ConfigError> {
    for (name, v) in values {
        if !v.is_finite() {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }
    }
    Ok(())
}

/// Viewer window settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stardrift".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Pointer-reactive star field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarFieldConfig {
    pub star_count: usize,
    /// Pointer influence radius in pixels.
    pub gravity_radius: f32,
    pub gravity_strength: f32,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Initial velocity component range is `[-initial_speed, initial_speed)`.
    pub initial_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    /// Brightness gained per frame inside the pointer radius.
    pub brightness_rise: f32,
    /// Brightness lost per frame elsewhere, down to `brightness_floor`.
    pub brightness_decay: f32,
    pub brightness_floor: f32,
    /// Share of stars tagged indigo instead of white.
    pub indigo_fraction: f32,
    pub background: Color,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            star_count: 300,
            gravity_radius: 250.0,
            gravity_strength: 0.005,
            friction: 0.98,
            initial_speed: 0.1,
            radius_min: 0.5,
            radius_max: 2.0,
            brightness_min: 0.2,
            brightness_max: 0.7,
            brightness_rise: 0.05,
            brightness_decay: 0.01,
            brightness_floor: 0.3,
            indigo_fraction: 0.2,
            background: Color::SPACE,
        }
    }
}

impl StarFieldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_finite(&[
            ("star_field.gravity_radius", self.gravity_radius),
            ("star_field.gravity_strength", self.gravity_strength),
            ("star_field.friction", self.friction),
            ("star_field.initial_speed", self.initial_speed),
            ("star_field.radius_min", self.radius_min),
            ("star_field.radius_max", self.radius_max),
            ("star_field.brightness_rise", self.brightness_rise),
            ("star_field.brightness_decay", self.brightness_decay),
        ])?;
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(invalid("star_field.friction must be in (0, 1]"));
        }
        if self.gravity_radius <= 0.0 {
            return Err(invalid("star_field.gravity_radius must be positive"));
        }
        if self.radius_min < 0.0 || self.radius_max < self.radius_min {
            return Err(invalid("star_field radius range is invalid"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.brightness_min)
            || !unit.contains(&self.brightness_max)
            || !unit.contains(&self.brightness_floor)
            || self.brightness_max < self.brightness_min
        {
            return Err(invalid("star_field brightness values must lie in [0, 1]"));
        }
        if !unit.contains(&self.indigo_fraction) {
            return Err(invalid("star_field.indigo_fraction must lie in [0, 1]"));
        }
        if self.brightness_rise < 0.0 || self.brightness_decay < 0.0 {
            return Err(invalid("star_field brightness rates must not be negative"));
        }
        Ok(())
    }
}

/// One satellite of the orbital fleet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Angle on the orbit circle where the satellite starts (radians).
    pub start_angle: f32,
    /// Offset added to the scroll-mapped target angle (radians).
    pub angular_offset: f32,
    /// Visual scale of the model.
    pub scale: f32,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            angular_offset: 0.0,
            scale: 1.0,
        }
    }
}

/// Scroll-driven orbital scene.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    /// Gravitational parameter of the off-screen body.
    pub mu: f32,
    /// Orbit radius around `center`.
    pub radius: f32,
    pub center: Vec3,
    /// Distance to target beyond which station-keeping fires.
    pub station_keeping_threshold: f32,
    pub thruster_strength: f32,
    /// Random velocity perturbation per frame on X and Z. 0 disables it.
    pub drift_strength: f32,
    /// Largest integration step in seconds.
    pub max_dt: f32,
    /// Radius floor used before dividing by r².
    pub min_radius: f32,
    /// Center of the scroll arc (radians).
    pub arc_base_angle: f32,
    /// Half the arc span (radians); scroll 0 and 1 map to base ∓ half-span.
    pub arc_half_span: f32,
    /// Slerp factor per frame when aligning the model to its velocity.
    pub attitude_slerp: f32,
    /// Speeds at or below this leave the orientation untouched.
    pub velocity_epsilon: f32,
    pub satellites: Vec<SatelliteConfig>,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            mu: 100.0,
            radius: 15.0,
            center: Vec3::new(-10.0, 0.0, 0.0),
            station_keeping_threshold: 0.5,
            thruster_strength: 0.05,
            drift_strength: 0.001,
            max_dt: 0.1,
            min_radius: 0.01,
            arc_base_angle: 0.0,
            arc_half_span: FRAC_PI_2,
            attitude_slerp: 0.1,
            velocity_epsilon: 0.01,
            satellites: vec![SatelliteConfig::default()],
        }
    }
}

impl OrbitConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_finite(&[
            ("orbit.mu", self.mu),
            ("orbit.radius", self.radius),
            ("orbit.station_keeping_threshold", self.station_keeping_threshold),
            ("orbit.thruster_strength", self.thruster_strength),
            ("orbit.drift_strength", self.drift_strength),
            ("orbit.max_dt", self.max_dt),
            ("orbit.min_radius", self.min_radius),
            ("orbit.arc_base_angle", self.arc_base_angle),
            ("orbit.arc_half_span", self.arc_half_span),
            ("orbit.attitude_slerp", self.attitude_slerp),
            ("orbit.velocity_epsilon", self.velocity_epsilon),
        ])?;
        if !self.center.is_finite() {
            return Err(invalid("orbit.center must be finite"));
        }
        if self.radius <= 0.0 || self.min_radius <= 0.0 {
            return Err(invalid("orbit radii must be positive"));
        }
        if self.mu < 0.0 || self.thruster_strength < 0.0 || self.drift_strength < 0.0 {
            return Err(invalid("orbit strengths must not be negative"));
        }
        if self.max_dt <= 0.0 {
            return Err(invalid("orbit.max_dt must be positive"));
        }
        // A satellite exactly on target must coast, never thrust along a
        // zero-length direction.
        if self.station_keeping_threshold < 0.0 {
            return Err(invalid("orbit.station_keeping_threshold must not be negative"));
        }
        if self.velocity_epsilon < 0.0 {
            return Err(invalid("orbit.velocity_epsilon must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.attitude_slerp) {
            return Err(invalid("orbit.attitude_slerp must lie in [0, 1]"));
        }
        for sat in &self.satellites {
            if !sat.start_angle.is_finite()
                || !sat.angular_offset.is_finite()
                || !(sat.scale > 0.0)
            {
                return Err(invalid("satellite angles must be finite and scale positive"));
            }
        }
        Ok(())
    }
}

/// Fixed camera of the orbital scene.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 20.0),
            target: Vec3::ZERO,
            fov_degrees: 50.0,
        }
    }
}

/// Deep-space backdrop: a distant star shell, drifting asteroids and a
/// planet, seen through a camera that dives as the page scrolls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackdropConfig {
    pub enabled: bool,
    /// Points on the distant shell.
    pub star_count: usize,
    pub shell_inner_radius: f32,
    pub shell_outer_radius: f32,
    /// Shell rotation about X and Y in radians per second.
    pub shell_spin: [f32; 2],
    pub asteroid_count: usize,
    /// Asteroids leaving this box reappear on the opposite face.
    pub asteroid_min: Vec3,
    pub asteroid_max: Vec3,
    pub planet_center: Vec3,
    pub planet_radius: f32,
    /// Tilt of the planet's spin axis about X (radians).
    pub planet_tilt: f32,
    /// Surface and cloud spin in radians per second.
    pub planet_spin: f32,
    pub cloud_spin: f32,
    /// Camera z at the top of the page.
    pub camera_start_z: f32,
    /// Distance the camera dives over the whole page.
    pub camera_travel: f32,
    /// Downward pitch reached at the bottom of the page (radians).
    pub camera_pitch: f32,
    /// Fraction of the remaining distance covered each frame.
    pub camera_follow: f32,
    /// Sideways camera offset at the window edge.
    pub pointer_tilt: f32,
    pub fov_degrees: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            star_count: 12_000,
            shell_inner_radius: 300.0,
            shell_outer_radius: 800.0,
            shell_spin: [0.001, 0.004],
            asteroid_count: 60,
            asteroid_min: Vec3::new(-50.0, -30.0, -60.0),
            asteroid_max: Vec3::new(50.0, 30.0, 20.0),
            planet_center: Vec3::new(10.0, -5.0, -20.0),
            planet_radius: 7.0,
            planet_tilt: 0.4,
            planet_spin: 0.04,
            cloud_spin: 0.06,
            camera_start_z: 30.0,
            camera_travel: 110.0,
            camera_pitch: 0.4,
            camera_follow: 0.05,
            pointer_tilt: 2.0,
            fov_degrees: 75.0,
        }
    }
}

impl BackdropConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_finite(&[
            ("backdrop.shell_inner_radius", self.shell_inner_radius),
            ("backdrop.shell_outer_radius", self.shell_outer_radius),
            ("backdrop.shell_spin[0]", self.shell_spin[0]),
            ("backdrop.shell_spin[1]", self.shell_spin[1]),
            ("backdrop.planet_radius", self.planet_radius),
            ("backdrop.planet_tilt", self.planet_tilt),
            ("backdrop.planet_spin", self.planet_spin),
            ("backdrop.cloud_spin", self.cloud_spin),
            ("backdrop.camera_start_z", self.camera_start_z),
            ("backdrop.camera_travel", self.camera_travel),
            ("backdrop.camera_pitch", self.camera_pitch),
            ("backdrop.camera_follow", self.camera_follow),
            ("backdrop.pointer_tilt", self.pointer_tilt),
        ])?;
        if !self.asteroid_min.is_finite()
            || !self.asteroid_max.is_finite()
            || !self.planet_center.is_finite()
        {
            return Err(invalid("backdrop positions must be finite"));
        }
        if self.shell_inner_radius < 0.0 || self.shell_outer_radius < self.shell_inner_radius {
            return Err(invalid("backdrop shell radii are invalid"));
        }
        if self.asteroid_min.cmpge(self.asteroid_max).any() {
            return Err(invalid("backdrop.asteroid_min must lie below asteroid_max on every axis"));
        }
        if self.planet_radius <= 0.0 {
            return Err(invalid("backdrop.planet_radius must be positive"));
        }
        if !(self.camera_follow > 0.0 && self.camera_follow <= 1.0) {
            return Err(invalid("backdrop.camera_follow must be in (0, 1]"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid("backdrop.fov_degrees must be in (0, 180)"));
        }
        Ok(())
    }
}

/// A named section of the virtual page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SectionConfig {
    pub name: String,
    /// Height in viewport heights.
    pub height: f32,
}

impl SectionConfig {
    pub fn new(name: &str, height: f32) -> Self {
        Self {
            name: name.into(),
            height,
        }
    }
}

/// Virtual page the viewer scrolls through.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub sections: Vec<SectionConfig>,
    /// Section whose progress drives the orbit. `None` uses the whole page.
    pub orbit_section: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionConfig::new("hero", 1.0),
                SectionConfig::new("about", 1.2),
                SectionConfig::new("experience", 2.0),
                SectionConfig::new("skills", 1.2),
                SectionConfig::new("certifications", 1.0),
                SectionConfig::new("projects", 1.5),
                SectionConfig::new("contact", 1.2),
                SectionConfig::new("footer", 0.4),
            ],
            orbit_section: None,
        }
    }
}

impl PageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.iter().any(|s| !(s.height >= 0.0) || !s.height.is_finite()) {
            return Err(invalid("page section heights must be finite and non-negative"));
        }
        if let Some(name) = &self.orbit_section {
            if !self.sections.iter().any(|s| &s.name == name) {
                return Err(ConfigError::Invalid(format!(
                    "page.orbit_section '{}' is not a section",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Loading screen timing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadingConfig {
    pub duration_ms: u32,
    pub interval_ms: u32,
    /// Delay between reaching 100 % and hiding the screen.
    pub hide_delay_ms: u32,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2500,
            interval_ms: 30,
            hide_delay_ms: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let mut config = SceneConfig::default();
        config.seed = Some(7);
        config.orbit.satellites.push(SatelliteConfig {
            start_angle: 1.0,
            angular_offset: 0.4,
            scale: 0.6,
        });
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back = SceneConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json(r#"{ "star_field": { "star_count": 42 } }"#).unwrap();
        assert_eq!(config.star_field.star_count, 42);
        assert_eq!(config.star_field.friction, 0.98);
        assert_eq!(config.orbit.radius, 15.0);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = SceneConfig::from_json(r#"{ "star_field": { "friction": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_rates_and_thresholds() {
        for json in [
            r#"{ "orbit": { "station_keeping_threshold": -1.0 } }"#,
            r#"{ "orbit": { "velocity_epsilon": -0.01 } }"#,
            r#"{ "star_field": { "brightness_decay": -0.05 } }"#,
            r#"{ "star_field": { "brightness_rise": -0.05 } }"#,
        ] {
            let err = SceneConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{} was accepted", json);
        }
    }

    #[test]
    fn test_rejects_inverted_asteroid_box() {
        let mut config = SceneConfig::default();
        config.backdrop.asteroid_min.x = 60.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.backdrop.camera_follow = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_is_allowed() {
        let config =
            SceneConfig::from_json(r#"{ "orbit": { "station_keeping_threshold": 0.0 } }"#)
                .unwrap();
        assert_eq!(config.orbit.station_keeping_threshold, 0.0);
    }

    #[test]
    fn test_rejects_unknown_orbit_section() {
        let mut config = SceneConfig::default();
        config.page.orbit_section = Some("nowhere".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SceneConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("stardrift-config-{}.json", std::process::id()));
        let config = SceneConfig::default();
        config.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
