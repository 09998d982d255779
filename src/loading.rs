//! Loading screen progress.
//!
//! Progress ticks at a fixed interval and follows an ease-out cubic, so the
//! counter races early and settles into 100 %. The screen hides a short
//! delay after reaching 100 %.

use crate::config::LoadingConfig;
use crate::reveal::CubicBezier;

/// Fade-out length once the screen starts hiding.
pub const EXIT_FADE_MS: f32 = 800.0;

#[derive(Debug, Clone)]
pub struct LoadingProgress {
    config: LoadingConfig,
    ticks: u32,
    /// Milliseconds accumulated toward the next tick.
    carry_ms: f32,
    /// Milliseconds spent at 100 %.
    complete_ms: f32,
    percent: u32,
}

impl LoadingProgress {
    pub fn new(config: LoadingConfig) -> Self {
        Self {
            config,
            ticks: 0,
            carry_ms: 0.0,
            complete_ms: 0.0,
            percent: 0,
        }
    }

    /// Ticks needed to cover the configured duration.
    fn steps(&self) -> f32 {
        self.config.duration_ms as f32 / self.config.interval_ms.max(1) as f32
    }

    /// Advance by one interval.
    pub fn tick(&mut self) {
        if self.is_complete() {
            return;
        }
        self.ticks += 1;
        let t = self.ticks as f32 / self.steps();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.percent = ((eased * 100.0).round().max(0.0) as u32).min(100);
        if self.ticks as f32 >= self.steps() {
            self.percent = 100;
        }
    }

    /// Advance by wall time, running as many whole ticks as fit.
    pub fn advance(&mut self, elapsed_ms: f32) {
        if !(elapsed_ms > 0.0) {
            return;
        }
        if self.is_complete() {
            self.complete_ms += elapsed_ms;
            return;
        }
        let interval = self.config.interval_ms.max(1) as f32;
        self.carry_ms += elapsed_ms;
        while self.carry_ms >= interval && !self.is_complete() {
            self.carry_ms -= interval;
            self.tick();
        }
        if self.is_complete() {
            self.complete_ms += self.carry_ms;
            self.carry_ms = 0.0;
        }
    }

    /// Whole percent in `[0, 100]`.
    pub fn percent(&self) -> u32 {
        if self.is_complete() {
            100
        } else {
            self.percent
        }
    }

    /// Counter text, zero-padded to three digits: `"042%"`.
    pub fn label(&self) -> String {
        format!("{:03}%", self.percent())
    }

    /// All ticks have run. The counter usually shows 100 % a little earlier.
    pub fn is_complete(&self) -> bool {
        self.ticks as f32 >= self.steps()
    }

    pub fn tagline_visible(&self) -> bool {
        self.percent() > 50
    }

    /// Whether the loading screen is still up.
    pub fn is_visible(&self) -> bool {
        !self.is_complete() || self.complete_ms < self.config.hide_delay_ms as f32
    }

    /// Overlay opacity: 1 while visible, then an eased fade to 0 over
    /// [`EXIT_FADE_MS`] on the reveal curve.
    pub fn opacity(&self) -> f32 {
        if self.is_visible() {
            return 1.0;
        }
        let fading = self.complete_ms - self.config.hide_delay_ms as f32;
        (1.0 - CubicBezier::REVEAL.ease(fading / EXIT_FADE_MS)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> LoadingProgress {
        LoadingProgress::new(LoadingConfig::default())
    }

    #[test]
    fn test_starts_at_zero() {
        let p = progress();
        assert_eq!(p.percent(), 0);
        assert_eq!(p.label(), "000%");
        assert!(p.is_visible());
        assert!(!p.tagline_visible());
    }

    #[test]
    fn test_eases_out() {
        let mut p = progress();
        p.tick();
        // 1 - (1 - 30/2500)^3 ≈ 3.6 %
        assert_eq!(p.percent(), 4);
        assert_eq!(p.label(), "004%");

        let mut last = p.percent();
        for _ in 0..40 {
            p.tick();
            assert!(p.percent() >= last);
            last = p.percent();
        }
        // Halfway in time is well past halfway in progress
        assert!(p.percent() > 80);
        assert!(p.tagline_visible());
    }

    #[test]
    fn test_completes_and_hides_after_delay() {
        let mut p = progress();
        p.advance(2500.0);
        assert!(!p.is_complete());
        assert_eq!(p.percent(), 100);

        let mut p = progress();
        for _ in 0..84 {
            p.tick();
        }
        assert!(p.is_complete());
        assert_eq!(p.label(), "100%");
        assert!(p.is_visible());

        p.advance(399.0);
        assert!(p.is_visible());
        p.advance(1.0);
        assert!(!p.is_visible());
        assert_eq!(p.opacity(), 1.0);
        p.advance(400.0);
        let halfway = 1.0 - CubicBezier::REVEAL.ease(0.5);
        assert!((p.opacity() - halfway).abs() < 1e-6);
        // The curve front-loads the fade.
        assert!(p.opacity() < 0.5);
        p.advance(1000.0);
        assert_eq!(p.opacity(), 0.0);

        p.tick();
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn test_negative_or_nan_time_is_ignored() {
        let mut p = progress();
        p.advance(-100.0);
        p.advance(f32::NAN);
        assert_eq!(p.percent(), 0);
    }
}
