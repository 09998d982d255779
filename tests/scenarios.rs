//! End-to-end scenarios across the public API.
//!
//! These drive the simulations and the contact flow the way the viewer does,
//! frame by frame, and check the properties that must hold throughout.

use async_trait::async_trait;
use glam::{Vec2, Vec3};
use stardrift::config::{OrbitConfig, SceneConfig, StarFieldConfig};
use stardrift::contact::{
    ContactForm, ContactSubmission, ContactTransport, FormStatus, RelayReply, TransportError,
    GENERIC_FAILURE, SUCCESS_SUBTITLE, SUCCESS_TITLE,
};
use stardrift::input::Pointer;
use stardrift::orbit::{OrbitalSimulator, Satellite};
use stardrift::scene::Scene;
use stardrift::starfield::{Star, StarField};
use stardrift::visuals::StarColor;

// ============================================================================
// Star field
// ============================================================================

fn assert_in_bounds(field: &StarField, width: f32, height: f32) {
    for (i, s) in field.stars().iter().enumerate() {
        assert!(
            s.position.x >= 0.0
                && s.position.x < width
                && s.position.y >= 0.0
                && s.position.y < height,
            "star {} out of bounds at {:?}",
            i,
            s.position
        );
        assert!(s.velocity.is_finite());
    }
}

#[test]
fn test_damping_without_pointer() {
    let mut field = StarField::new(StarFieldConfig::default(), Some(42));
    field.resize(500, 500);
    field.set_pointer(250.0, 250.0, false);

    let initial: Vec<f32> = field.stars().iter().map(|s| s.velocity.length()).collect();
    let max_initial = initial.iter().cloned().fold(0.0f32, f32::max);
    let mut canvas = stardrift::canvas::PixelCanvas::new(500, 500);

    for _ in 0..1000 {
        field.tick(&mut canvas);
    }

    let decay = 0.98f32.powi(1000);
    for (star, v0) in field.stars().iter().zip(&initial) {
        let speed = star.velocity.length();
        assert!(speed <= v0 * decay * 1.001);
        assert!(speed <= max_initial * decay * 1.001);
    }
    assert_in_bounds(&field, 500.0, 500.0);
}

#[test]
fn test_zero_distance_attraction() {
    let mut field = StarField::new(StarFieldConfig::default(), Some(7));
    field.resize(500, 500);
    field.stars_mut()[0] = Star {
        position: Vec2::new(120.0, 80.0),
        velocity: Vec2::ZERO,
        radius: 1.0,
        brightness: 0.4,
        color: StarColor::White,
    };

    field.step_with(&Pointer::at(120.0, 80.0));

    let star = field.stars()[0];
    assert!(star.brightness > 0.4);
    assert_eq!(star.velocity, Vec2::ZERO);
    assert!(star.position.is_finite());
}

#[test]
fn test_bounds_hold_every_frame_with_pointer() {
    let mut field = StarField::new(StarFieldConfig::default(), Some(9));
    field.resize(320, 200);

    for frame in 0..600 {
        let t = frame as f32 * 0.05;
        let pointer = Pointer::at(160.0 + 150.0 * t.cos(), 100.0 + 90.0 * t.sin());
        field.step_with(&pointer);
        assert_in_bounds(&field, 320.0, 200.0);
        for s in field.stars() {
            assert!((0.0..=1.0).contains(&s.brightness));
        }
    }
}

#[test]
fn test_resize_is_idempotent_in_count() {
    let mut field = StarField::new(StarFieldConfig::default(), None);
    for (w, h) in [(800, 600), (800, 600), (1920, 1080), (40, 30)] {
        field.resize(w, h);
        assert_eq!(field.stars().len(), 300);
        assert_in_bounds(&field, w as f32, h as f32);
    }
}

// ============================================================================
// Orbit
// ============================================================================

#[test]
fn test_seed_at_center_stays_finite() {
    let config = OrbitConfig::default();
    let center = config.center;
    let fleet = vec![Satellite::new(center, Vec3::ZERO, 0.0, 1.0)];
    let mut sim = OrbitalSimulator::with_satellites(config, fleet, Some(3));
    for i in 0..500 {
        sim.step(i as f32 / 500.0, 1.0 / 60.0);
        let sat = &sim.satellites()[0];
        assert!(sat.position().is_finite() && sat.velocity().is_finite());
    }
}

#[test]
fn test_thrusting_iff_beyond_threshold() {
    let config = OrbitConfig {
        drift_strength: 0.0,
        ..OrbitConfig::default()
    };
    let reference = OrbitalSimulator::new(config.clone(), None);
    let target = reference.target_position(0.7, 0.0);

    for (offset, expected) in [(0.0, false), (0.4, false), (0.6, true), (3.0, true)] {
        let start = target + Vec3::new(0.0, offset, 0.0);
        let fleet = vec![Satellite::new(start, Vec3::ZERO, 0.0, 1.0)];
        let mut sim = OrbitalSimulator::with_satellites(config.clone(), fleet, None);
        sim.step(0.7, 1.0 / 60.0);
        assert_eq!(sim.satellites()[0].is_thrusting(), expected, "offset {}", offset);
    }
}

#[test]
fn test_default_fleet_survives_a_full_scroll() {
    let mut sim = OrbitalSimulator::new(OrbitConfig::default(), Some(1));
    for i in 0..=1200 {
        let progress = (i as f32 / 600.0).min(1.0);
        sim.step(progress, 1.0 / 60.0);
    }
    for sat in sim.satellites() {
        assert!(sat.position().is_finite());
        assert!(sat.orientation().is_normalized());
    }
}

// ============================================================================
// Contact
// ============================================================================

struct Relay(Result<RelayReply, TransportError>);

#[async_trait(?Send)]
impl ContactTransport for Relay {
    async fn send(&self, _: &ContactSubmission) -> Result<RelayReply, TransportError> {
        self.0.clone()
    }
}

fn submission() -> ContactSubmission {
    ContactSubmission::new("Grace", "grace@example.com", "Let's build something.")
}

#[test]
fn test_contact_success_flow() {
    let mut form = ContactForm::new();
    assert_eq!(form.status(), &FormStatus::Idle);

    assert!(form.begin());
    assert_eq!(form.status(), &FormStatus::Loading);
    form.finish(Ok(RelayReply::new(200, r#"{"success":true}"#)));

    assert_eq!(form.status(), &FormStatus::Success);
    assert_eq!(form.success_copy(), Some((SUCCESS_TITLE, SUCCESS_SUBTITLE)));
    assert!(!form.shows_form());

    // No way back to the form
    let relay = Relay(Ok(RelayReply::new(500, "")));
    pollster::block_on(form.submit(&relay, &submission()));
    assert_eq!(form.status(), &FormStatus::Success);
}

#[test]
fn test_contact_submit_reaches_success() {
    let relay = Relay(Ok(RelayReply::new(200, "{}")));
    let mut form = ContactForm::new();
    let status = pollster::block_on(form.submit(&relay, &submission())).clone();
    assert_eq!(status, FormStatus::Success);
}

#[test]
fn test_contact_failure_without_payload_uses_fallback() {
    let relay = Relay(Ok(RelayReply::new(500, "")));
    let mut form = ContactForm::new();
    pollster::block_on(form.submit(&relay, &submission()));

    assert_eq!(form.error_message(), Some(GENERIC_FAILURE));
    assert!(form.shows_form());
}

// ============================================================================
// Scene
// ============================================================================

#[test]
fn test_headless_scene_renders_stars() {
    let mut config = SceneConfig::default();
    config.seed = Some(5);
    config.window.width = 200;
    config.window.height = 150;

    let mut scene = Scene::new(config);
    for _ in 0..2 {
        scene.step(1.0 / 60.0);
    }

    let raw = scene.canvas().as_raw();
    assert_eq!(raw.len(), 200 * 150 * 4);
    // Background is the dark space color; stars add brighter pixels.
    assert!(raw.chunks(4).any(|px| px[0] > 80 && px[1] > 80 && px[2] > 80));
}
