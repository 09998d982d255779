//! Reveal-on-scroll.
//!
//! Content starts hidden and offset downward. The first time it is reported
//! intersecting the viewport by at least [`REVEAL_THRESHOLD`], it is
//! scheduled to reveal after its delay and is no longer observed. Revealed
//! content eases in and never hides again.

use std::collections::HashMap;
use std::time::Duration;

/// Minimum visible fraction that triggers a reveal.
pub const REVEAL_THRESHOLD: f32 = 0.15;
/// Length of the fade/slide-in.
pub const REVEAL_DURATION: Duration = Duration::from_millis(700);
/// Initial downward offset in pixels.
pub const REVEAL_OFFSET: f32 = 32.0;

/// CSS-style cubic Bézier timing curve through (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// The "expo out" curve used for every reveal.
    pub const REVEAL: Self = Self::new(0.22, 1.0, 0.36, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased value for linear progress `x` in `[0, 1]`.
    pub fn ease(&self, x: f32) -> f32 {
        if !(x > 0.0) {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        bezier(t, self.y1, self.y2)
    }

    /// Find the curve parameter whose x equals `x`. x(t) is monotonic for
    /// control points in [0, 1], so bisection always converges.
    fn solve_t(&self, x: f32) -> f32 {
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        let mut t = x;
        for _ in 0..32 {
            let cx = bezier(t, self.x1, self.x2);
            if (cx - x).abs() < 1e-6 {
                break;
            }
            if cx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        t
    }
}

fn bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealState {
    Hidden,
    /// Will reveal at the given time.
    Scheduled(Duration),
    /// Revealed since the given time.
    Revealed(Duration),
}

/// Presentation of a piece of content at some instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Downward offset in pixels.
    pub translate_y: f32,
}

impl RevealStyle {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        translate_y: REVEAL_OFFSET,
    };
}

#[derive(Debug, Clone)]
struct RevealTarget {
    delay: Duration,
    state: RevealState,
}

/// Tracks reveal state for any number of content ids.
///
/// Times are offsets from an arbitrary epoch (usually app start).
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    targets: HashMap<String, RevealTarget>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `id`. Observing an id twice keeps the first entry.
    pub fn observe(&mut self, id: impl Into<String>, delay: Duration) {
        self.targets.entry(id.into()).or_insert(RevealTarget {
            delay,
            state: RevealState::Hidden,
        });
    }

    /// Forget `id` entirely.
    pub fn unobserve(&mut self, id: &str) {
        self.targets.remove(id);
    }

    /// Report that `id` is `ratio` visible at `now`.
    ///
    /// Returns true if this notification scheduled the reveal.
    pub fn notify_intersection(&mut self, id: &str, ratio: f32, now: Duration) -> bool {
        let Some(target) = self.targets.get_mut(id) else {
            return false;
        };
        if target.state != RevealState::Hidden || !(ratio >= REVEAL_THRESHOLD) {
            return false;
        }
        let at = now + target.delay;
        target.state = RevealState::Scheduled(at);
        tracing::trace!(id, ?at, "reveal scheduled");
        true
    }

    /// Flip every due item to revealed. Returns how many flipped.
    pub fn update(&mut self, now: Duration) -> usize {
        let mut flipped = 0;
        for target in self.targets.values_mut() {
            if let RevealState::Scheduled(at) = target.state {
                if now >= at {
                    target.state = RevealState::Revealed(at);
                    flipped += 1;
                }
            }
        }
        flipped
    }

    pub fn state(&self, id: &str) -> Option<RevealState> {
        self.targets.get(id).map(|t| t.state)
    }

    /// Ids still waiting for their first intersection.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.targets
            .iter()
            .filter(|(_, t)| t.state == RevealState::Hidden)
            .map(|(id, _)| id.as_str())
    }

    /// Style of `id` at `now`. Unknown ids are hidden.
    pub fn style(&self, id: &str, now: Duration) -> RevealStyle {
        match self.state(id) {
            Some(RevealState::Revealed(at)) => {
                let linear = now.saturating_sub(at).as_secs_f32() / REVEAL_DURATION.as_secs_f32();
                let eased = CubicBezier::REVEAL.ease(linear);
                RevealStyle {
                    opacity: eased,
                    translate_y: REVEAL_OFFSET * (1.0 - eased),
                }
            }
            _ => RevealStyle::HIDDEN,
        }
    }
}
