//! Per-frame callback registry.
//!
//! Scenes subscribe to the frame loop with [`FrameLoop::register`] and keep
//! the returned [`FrameHandle`] for as long as they are mounted. Dropping the
//! handle deregisters the callback on the spot, so there is no separate
//! teardown call to forget.
//!
//! ```ignore
//! let frames = FrameLoop::new();
//! let field = Rc::new(RefCell::new(StarField::new(config, None)));
//!
//! let f = field.clone();
//! let _handle = frames.register(move |ctx| f.borrow_mut().tick(ctx.canvas));
//!
//! frames.run_frame(&mut ctx); // ticks the field
//! drop(_handle);
//! frames.run_frame(&mut ctx); // no-op
//! ```
//!
//! Registering or cancelling from inside a callback is allowed. A callback
//! registered mid-frame first runs on the next frame; one cancelled mid-frame
//! is skipped for the rest of the current frame.

use crate::canvas::Canvas;
use crate::input::InputState;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Everything a frame callback may read or draw into.
pub struct FrameContext<'a> {
    /// Clamped frame delta in seconds.
    pub dt: f32,
    /// Scene time in seconds.
    pub elapsed: f32,
    pub frame: u64,
    pub input: &'a InputState,
    pub canvas: &'a mut dyn Canvas,
}

type Callback = Rc<RefCell<dyn FnMut(&mut FrameContext)>>;

struct Entry {
    alive: Rc<Cell<bool>>,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    entries: RefCell<Vec<Entry>>,
}

/// Shared list of frame callbacks. Cloning yields another reference to the
/// same registry.
#[derive(Clone, Default)]
pub struct FrameLoop {
    registry: Rc<Registry>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` to every future frame until the handle is
    /// dropped or cancelled.
    #[must_use = "dropping the handle immediately deregisters the callback"]
    pub fn register<F>(&self, callback: F) -> FrameHandle
    where
        F: FnMut(&mut FrameContext) + 'static,
    {
        let alive = Rc::new(Cell::new(true));
        self.registry.entries.borrow_mut().push(Entry {
            alive: alive.clone(),
            callback: Rc::new(RefCell::new(callback)),
        });
        FrameHandle { alive: Some(alive) }
    }

    /// Invoke every live callback once, in registration order.
    pub fn run_frame(&self, ctx: &mut FrameContext) {
        let snapshot: Vec<(Rc<Cell<bool>>, Callback)> = {
            let mut entries = self.registry.entries.borrow_mut();
            entries.retain(|e| e.alive.get());
            entries
                .iter()
                .map(|e| (e.alive.clone(), e.callback.clone()))
                .collect()
        };

        for (alive, callback) in snapshot {
            if !alive.get() {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => f(ctx),
                // A callback re-entering run_frame would land here.
                Err(_) => tracing::warn!("frame callback re-entered; skipped"),
            }
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registry
            .entries
            .borrow()
            .iter()
            .filter(|e| e.alive.get())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop").field("live", &self.len()).finish()
    }
}

/// Keeps a frame callback registered. Deregisters on drop.
#[derive(Debug)]
pub struct FrameHandle {
    alive: Option<Rc<Cell<bool>>>,
}

impl FrameHandle {
    /// Deregister now. Equivalent to dropping the handle.
    pub fn cancel(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.alive.as_ref().is_some_and(|a| a.get())
    }

    fn release(&mut self) {
        if let Some(alive) = self.alive.take() {
            alive.set(false);
        }
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;

    fn run(frames: &FrameLoop) {
        let input = InputState::default();
        let mut canvas = PixelCanvas::new(4, 4);
        let mut ctx = FrameContext {
            dt: 0.016,
            elapsed: 0.0,
            frame: 0,
            input: &input,
            canvas: &mut canvas,
        };
        frames.run_frame(&mut ctx);
    }

    fn counter(frames: &FrameLoop) -> (Rc<Cell<u32>>, FrameHandle) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = frames.register(move |_| c.set(c.get() + 1));
        (count, handle)
    }

    #[test]
    fn test_drop_deregisters() {
        let frames = FrameLoop::new();
        let (count, handle) = counter(&frames);
        assert_eq!(frames.len(), 1);

        run(&frames);
        drop(handle);
        run(&frames);

        assert_eq!(count.get(), 1);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_cancel_deregisters() {
        let frames = FrameLoop::new();
        let (count, handle) = counter(&frames);
        assert!(handle.is_active());
        handle.cancel();
        run(&frames);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_runs_in_registration_order() {
        let frames = FrameLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let handles: Vec<FrameHandle> = (0..3)
            .map(|i| {
                let log = log.clone();
                frames.register(move |_| log.borrow_mut().push(i))
            })
            .collect();
        run(&frames);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        drop(handles);
    }

    #[test]
    fn test_cancel_during_frame_skips_later_callback() {
        let frames = FrameLoop::new();
        let victim: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));

        let v = victim.clone();
        let _killer = frames.register(move |_| {
            v.borrow_mut().take();
        });
        let (count, handle) = counter(&frames);
        *victim.borrow_mut() = Some(handle);

        run(&frames);
        run(&frames);
        assert_eq!(count.get(), 0);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_register_during_frame_runs_next_frame() {
        let frames = FrameLoop::new();
        let count = Rc::new(Cell::new(0));
        let spawned: Rc<RefCell<Vec<FrameHandle>>> = Rc::new(RefCell::new(Vec::new()));

        let (f, c, s) = (frames.clone(), count.clone(), spawned.clone());
        let _spawner = frames.register(move |_| {
            if s.borrow().is_empty() {
                let c = c.clone();
                s.borrow_mut().push(f.register(move |_| c.set(c.get() + 1)));
            }
        });

        run(&frames);
        assert_eq!(count.get(), 0);
        run(&frames);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callback_sees_context() {
        let frames = FrameLoop::new();
        let seen = Rc::new(Cell::new(0.0));
        let s = seen.clone();
        let _h = frames.register(move |ctx| {
            s.set(ctx.dt);
            ctx.canvas
                .fill_circle(glam::Vec2::new(2.0, 2.0), 1.0, crate::visuals::Color::WHITE, 1.0);
        });
        run(&frames);
        assert_eq!(seen.get(), 0.016);
    }
}
