//! Frame clock.
//!
//! One [`Time`] drives every scene. Its delta is what the orbital integrator
//! receives, so long gaps (a minimized window, a debugger break) are capped
//! with [`Time::set_max_delta`] before they reach the physics.
//!
//! ```ignore
//! let mut time = Time::new();
//! time.set_max_delta(Some(0.1));
//!
//! // In the redraw handler:
//! let dt = time.update();
//! orbit.step(input.scroll_progress, dt);
//! ```

use std::time::Instant;

/// Weight of the newest frame in the smoothed frame rate.
const FPS_SMOOTHING: f32 = 0.1;

#[derive(Debug)]
pub struct Time {
    last_sample: Instant,
    elapsed: f32,
    delta: f32,
    frames: u64,
    /// Exponentially smoothed frames per second, from raw wall deltas.
    fps: f32,
    paused: bool,
    /// Replaces the measured delta when set (headless renders, tests).
    fixed_delta: Option<f32>,
    max_delta: Option<f32>,
    scale: f32,
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_sample: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            fps: 0.0,
            paused: false,
            fixed_delta: None,
            max_delta: None,
            scale: 1.0,
        }
    }

    /// Sample the wall clock and advance one frame. Returns the frame delta.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_sample).as_secs_f32();
        self.last_sample = now;

        if raw > 0.0 {
            let instant_fps = 1.0 / raw;
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
            };
        }

        self.advance(raw)
    }

    /// Advance by an explicit raw delta in seconds, without touching the
    /// wall clock.
    ///
    /// Pause wins over everything. Otherwise the fixed delta (if any)
    /// replaces `raw`, negatives become 0, the time scale applies and the
    /// result is capped at the max delta.
    pub fn advance(&mut self, raw: f32) -> f32 {
        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }

        let base = self.fixed_delta.unwrap_or(raw);
        let scaled = if base.is_finite() { base.max(0.0) * self.scale } else { 0.0 };
        let delta = match self.max_delta {
            Some(max) => scaled.min(max),
            None => scaled,
        };

        self.delta = delta;
        self.elapsed += delta;
        self.frames += 1;
        delta
    }

    /// Scene seconds, excluding paused time.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Delta of the latest frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Frames advanced so far. Paused frames do not count.
    pub fn frame(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause. The paused interval is not replayed as one long
    /// frame.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_sample = Instant::now();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Cap every delta at `max` seconds. `None` removes the cap.
    pub fn set_max_delta(&mut self, max: Option<f32>) {
        self.max_delta = max.map(|m| m.max(0.0));
    }

    /// Playback speed; 1 is real time. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wall_clock_update() {
        let mut time = Time::new();
        assert_eq!(time.frame(), 0);
        thread::sleep(Duration::from_millis(5));

        let dt = time.update();
        assert!(dt > 0.0);
        assert_eq!(time.elapsed(), dt);
        assert!(time.fps() > 0.0);
    }

    #[test]
    fn test_long_gap_is_capped() {
        let mut time = Time::new();
        time.set_max_delta(Some(0.1));
        assert_eq!(time.advance(3.0), 0.1);
        assert_eq!(time.advance(0.016), 0.016);
        assert!((time.elapsed() - 0.116).abs() < 1e-6);
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_pause_stops_the_clock() {
        let mut time = Time::new();
        time.advance(0.5);
        time.toggle_pause();

        assert_eq!(time.advance(0.5), 0.0);
        assert_eq!(time.delta(), 0.0);
        assert_eq!((time.elapsed(), time.frame()), (0.5, 1));

        time.toggle_pause();
        time.advance(0.25);
        assert_eq!(time.elapsed(), 0.75);
    }

    #[test]
    fn test_fixed_delta_then_scale() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(0.02));
        time.set_time_scale(2.0);
        assert!((time.advance(5.0) - 0.04).abs() < 1e-6);

        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
        assert_eq!(time.advance(5.0), 0.0);
    }

    #[test]
    fn test_bad_raw_delta_is_zero() {
        let mut time = Time::new();
        assert_eq!(time.advance(-1.0), 0.0);
        assert_eq!(time.advance(f32::NAN), 0.0);
        assert_eq!(time.elapsed(), 0.0);
    }
}
