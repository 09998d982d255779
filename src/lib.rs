//! # Stardrift
//!
//! Decorative, per-frame simulations for a scroll-driven page: a 3D space
//! backdrop, a pointer-reactive star field and a fleet of satellites that keep
//! station on an orbit arc chosen by scroll position.
//!
//! Simulations draw through the [`Canvas`](canvas::Canvas) trait into a CPU
//! [`PixelCanvas`](canvas::PixelCanvas); the windowed viewer uploads that to
//! the GPU each frame, the headless path writes it to a PNG.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stardrift::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::default());
//! scene.input_mut().scroll(400.0);
//! for _ in 0..60 {
//!     scene.step(1.0 / 60.0);
//! }
//! scene.canvas().save_png("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Frame loop
//!
//! Every simulation mounts itself on a [`FrameLoop`](frame::FrameLoop) and
//! keeps the returned [`FrameHandle`](frame::FrameHandle). Dropping the handle
//! unmounts it:
//!
//! ```ignore
//! let frames = FrameLoop::new();
//! let handle = frames.register(|ctx| field.borrow_mut().tick(ctx.canvas));
//! ```
//!
//! ### Input
//!
//! Pointer position, pointer presence and scroll progress live in one
//! [`InputState`](input::InputState) that is passed by reference into every
//! frame callback. Nothing reads global state.
//!
//! ### Star field
//!
//! [`StarField`](starfield::StarField) drifts a fixed pool of stars, pulls
//! nearby ones toward the pointer, damps them with friction and wraps them at
//! the edges. See the module docs for the exact per-frame rule.
//!
//! ### Orbit
//!
//! [`OrbitalSimulator`](orbit::OrbitalSimulator) integrates a softened
//! inverse-square pull plus a bounded station-keeping thruster. Scroll
//! progress `p` maps to the target angle `base + (2p - 1) * half_span`.
//!
//! ### Backdrop
//!
//! [`Backdrop`](backdrop::Backdrop) draws a rotating shell of distant stars,
//! wrapping asteroids and a noise-shaded planet through a camera that dives
//! as the page scrolls.
//!
//! ## Feature Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`backdrop`] | Star shell, asteroids and planet behind everything |
//! | [`starfield`] | Pointer-reactive 2D star pool |
//! | [`orbit`] | Scroll-driven orbiting fleet |
//! | [`frame`] | Frame callback registry with RAII handles |
//! | [`scroll`] | Page layout and scroll progress |
//! | [`reveal`] | Reveal-on-scroll state and easing |
//! | [`contact`] | Contact form submission state machine |
//! | [`loading`] | Loading screen progress |
//! | [`scene`] | Everything above composed into one viewer |

pub mod backdrop;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod contact;
pub mod error;
pub mod frame;
mod gpu;
pub mod input;
pub mod loading;
pub mod orbit;
pub mod reveal;
pub mod scene;
pub mod scroll;
pub mod spawn;
pub mod starfield;
pub mod time;
pub mod visuals;
pub mod window;

pub use glam::{Quat, Vec2, Vec3};

/// Convenience re-exports for common usage.
///
/// ```ignore
/// use stardrift::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::camera::Camera;
    pub use crate::canvas::{Canvas, PixelCanvas};
    pub use crate::config::SceneConfig;
    pub use crate::contact::{
        ContactForm, ContactSubmission, ContactTransport, FormStatus, RelayReply, TransportError,
    };
    pub use crate::frame::{FrameContext, FrameHandle, FrameLoop};
    pub use crate::input::{InputState, InputTracker, KeyCode, Pointer};
    pub use crate::loading::LoadingProgress;
    pub use crate::orbit::{OrbitalSimulator, Satellite};
    pub use crate::reveal::{RevealState, RevealTracker};
    pub use crate::scene::Scene;
    pub use crate::scroll::Page;
    pub use crate::starfield::{Star, StarField};
    pub use crate::time::Time;
    pub use crate::visuals::{Color, StarColor};
    pub use crate::{Quat, Vec2, Vec3};
}
