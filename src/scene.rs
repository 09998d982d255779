//! The composed page scene.
//!
//! A [`Scene`] owns everything one viewer needs: the space backdrop, the
//! star field and the orbiting fleet (each mounted on the frame loop, in that
//! drawing order), the virtual page, the frame clock, input, the loading
//! screen and the canvas they all draw into. The window and the headless
//! renderer drive it the same way.

use crate::backdrop::{pointer_ndc, Backdrop};
use crate::camera::Camera;
use crate::canvas::{Canvas, PixelCanvas};
use crate::config::SceneConfig;
use crate::frame::{FrameContext, FrameHandle, FrameLoop};
use crate::input::{InputTracker, KeyCode};
use crate::loading::LoadingProgress;
use crate::orbit::OrbitalSimulator;
use crate::reveal::RevealTracker;
use crate::scroll::Page;
use crate::starfield::StarField;
use crate::time::Time;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Pixels per arrow-key press.
const ARROW_SCROLL: f32 = 80.0;

pub struct Scene {
    config: SceneConfig,
    frames: FrameLoop,
    backdrop: Rc<RefCell<Backdrop>>,
    star_field: Rc<RefCell<StarField>>,
    orbit: Rc<RefCell<OrbitalSimulator>>,
    page: Page,
    input: InputTracker,
    time: Time,
    loading: LoadingProgress,
    reveal: RevealTracker,
    canvas: PixelCanvas,
    mounts: Vec<FrameHandle>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let backdrop = Rc::new(RefCell::new(Backdrop::new(
            config.backdrop.clone(),
            config.seed.map(|s| s.wrapping_add(2)),
        )));
        let star_field = Rc::new(RefCell::new(StarField::new(
            config.star_field.clone(),
            config.seed,
        )));
        let orbit = Rc::new(RefCell::new(OrbitalSimulator::new(
            config.orbit.clone(),
            config.seed.map(|s| s.wrapping_add(1)),
        )));

        let mut time = Time::new();
        time.set_max_delta(Some(config.orbit.max_dt));

        let mut reveal = RevealTracker::new();
        for section in &config.page.sections {
            reveal.observe(section.name.clone(), Duration::ZERO);
        }

        let mut scene = Self {
            frames: FrameLoop::new(),
            backdrop,
            star_field,
            orbit,
            page: Page::new(&config.page, config.window.height as f32),
            input: InputTracker::new(),
            time,
            loading: LoadingProgress::new(config.loading.clone()),
            reveal,
            canvas: PixelCanvas::new(0, 0),
            mounts: Vec::new(),
            config,
        };
        scene.mount();
        scene.resize(scene.config.window.width, scene.config.window.height);
        scene
    }

    fn mount(&mut self) {
        if self.config.backdrop.enabled {
            let backdrop = self.backdrop.clone();
            self.mounts.push(self.frames.register(move |ctx| {
                let mut backdrop = backdrop.borrow_mut();
                let (width, height) = ctx.canvas.size();
                let tilt = pointer_ndc(ctx.input.pointer.position, width, height);
                backdrop.step(ctx.input.scroll_progress, tilt, ctx.dt);
                backdrop.draw(ctx.canvas);
            }));
        }

        let field = self.star_field.clone();
        self.mounts.push(self.frames.register(move |ctx| {
            let mut field = field.borrow_mut();
            let pointer = ctx.input.pointer;
            field.set_pointer(pointer.position.x, pointer.position.y, pointer.active);
            if ctx.dt > 0.0 {
                field.tick(ctx.canvas);
            } else {
                field.draw(ctx.canvas);
            }
        }));

        let orbit = self.orbit.clone();
        let camera = Camera::from_config(&self.config.camera);
        self.mounts.push(self.frames.register(move |ctx| {
            let mut orbit = orbit.borrow_mut();
            if ctx.dt > 0.0 {
                orbit.step(ctx.input.scroll_progress, ctx.dt);
            }
            orbit.draw(ctx.canvas, &camera);
        }));
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn loading(&self) -> &LoadingProgress {
        &self.loading
    }

    pub fn reveal(&self) -> &RevealTracker {
        &self.reveal
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Both scenes still hold their frame registrations.
    pub fn is_mounted(&self) -> bool {
        !self.mounts.is_empty() && self.mounts.iter().all(FrameHandle::is_active)
    }

    pub fn backdrop(&self) -> std::cell::Ref<'_, Backdrop> {
        self.backdrop.borrow()
    }

    pub fn star_field(&self) -> std::cell::Ref<'_, StarField> {
        self.star_field.borrow()
    }

    pub fn orbit(&self) -> std::cell::Ref<'_, OrbitalSimulator> {
        self.orbit.borrow()
    }

    /// Resize the canvas, the star pool and the page viewport together.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "scene resize");
        self.canvas.resize(width, height);
        self.star_field.borrow_mut().resize(width, height);
        self.page.set_viewport_height(height as f32);
    }

    /// Run one frame timed by the wall clock.
    pub fn update(&mut self) {
        self.apply_controls();
        let dt = self.time.update();
        self.run(dt);
    }

    /// Run one frame with an explicit raw delta in seconds.
    pub fn step(&mut self, raw_dt: f32) {
        self.apply_controls();
        let dt = self.time.advance(raw_dt);
        self.run(dt);
    }

    fn apply_controls(&mut self) {
        if self.input.key_pressed(KeyCode::Space) {
            self.time.toggle_pause();
            tracing::info!(paused = self.time.is_paused(), "pause toggled");
        }

        let viewport = self.page.viewport_height();
        let mut dy = self.input.scroll_pixels();
        for (key, amount) in [
            (KeyCode::Down, ARROW_SCROLL),
            (KeyCode::Up, -ARROW_SCROLL),
            (KeyCode::PageDown, viewport),
            (KeyCode::PageUp, -viewport),
        ] {
            if self.input.key_pressed(key) {
                dy += amount;
            }
        }
        self.page.scroll_by(dy);
        if self.input.key_pressed(KeyCode::Home) {
            self.page.scroll_to(0.0);
        }
        if self.input.key_pressed(KeyCode::End) {
            self.page.scroll_to(self.page.max_scroll());
        }

        let progress = self
            .page
            .progress_or_document(self.config.page.orbit_section.as_deref());
        self.input.state_mut().set_scroll_progress(progress);
    }

    fn run(&mut self, dt: f32) {
        self.loading.advance(dt * 1000.0);

        let now = Duration::from_secs_f32(self.time.elapsed());
        for section in self.page.sections() {
            let ratio = self.page.intersection_ratio(&section.name).unwrap_or(0.0);
            self.reveal.notify_intersection(&section.name, ratio, now);
        }
        if self.reveal.update(now) > 0 {
            tracing::debug!(pending = self.reveal.pending().count(), "sections revealed");
        }

        self.canvas.clear(self.config.star_field.background);
        let mut ctx = FrameContext {
            dt,
            elapsed: self.time.elapsed(),
            frame: self.time.frame(),
            input: self.input.state(),
            canvas: &mut self.canvas,
        };
        self.frames.run_frame(&mut ctx);
        self.input.begin_frame();
    }
}
