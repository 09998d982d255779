use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::RunError;
use crate::gpu::{OverlayUniforms, Presenter};
use crate::input::KeyCode;
use crate::scene::Scene;

/// Open a window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub struct App {
    scene: Scene,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    /// First fatal error, reported once the event loop returns.
    error: Option<RunError>,
}

impl App {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            scene: Scene::new(config),
            window: None,
            presenter: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        tracing::error!(error = %err, "viewer stopped");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.update();

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        let (width, height) = presenter.size();
        let loading = self.scene.loading();
        let overlay = OverlayUniforms::new(
            loading.opacity(),
            loading.percent() as f32 / 100.0,
            width,
            height,
        );

        match presenter.present(self.scene.canvas(), overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                presenter.resize(width, height)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => tracing::warn!("render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_config = &self.scene.config().window;
        let window_attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width,
                window_config.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        match pollster::block_on(Presenter::new(window.clone())) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(err) => return self.fail(event_loop, err.into()),
        }

        let size = window.inner_size();
        self.scene.resize(size.width, size.height);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.scene.input_mut().handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { .. }
                if self.scene.input().key_pressed(KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                self.scene.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
