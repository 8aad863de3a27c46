//! Window creation and event handling via winit.
//!
//! Provides [`OrreryApp`], which implements winit's [`ApplicationHandler`]
//! trait, and a [`run`] function to start the event loop. The window draws
//! nothing; telemetry is shown in its title while a session runs.

use std::time::Instant;

use glam::Vec2;
use orrery_config::Config;
use orrery_input::{GamepadManager, MouseState, PointerId, RawKeyEvent};
use orrery_telemetry::TelemetryDisplay;
use tracing::{debug, error, info, instrument};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, PhysicalPosition};
use winit::error::EventLoopError;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::game_loop::FrameClock;
use crate::session::SessionHost;

/// Title suffix shown while no session is running.
pub const IDLE_HINT: &str = "press Enter to launch";

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(idle_title(config))
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

fn idle_title(config: &Config) -> String {
    format!("{} | {IDLE_HINT}", config.window.title)
}

/// Top-level application state driven by the winit event loop.
pub struct OrreryApp {
    config: Config,
    window: Option<Window>,
    scale_factor: f64,
    host: SessionHost,
    clock: FrameClock,
    display: TelemetryDisplay,
    mouse: MouseState,
    gamepads: Option<GamepadManager>,
    started: Instant,
    title: String,
}

impl OrreryApp {
    pub fn new(config: Config) -> Self {
        let gamepads = GamepadManager::try_new(config.input.gamepad_deadzone);
        Self {
            host: SessionHost::from_config(&config),
            display: TelemetryDisplay::new(&config.telemetry),
            title: idle_title(&config),
            config,
            window: None,
            scale_factor: 1.0,
            clock: FrameClock::new(),
            mouse: MouseState::new(),
            gamepads,
            started: Instant::now(),
        }
    }

    /// Session host, for tests and embedding.
    pub fn host(&self) -> &SessionHost {
        &self.host
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical: LogicalPosition<f64> = position.to_logical(self.scale_factor);
        Vec2::new(logical.x as f32, logical.y as f32)
    }

    fn handle_touch(&mut self, touch: Touch) {
        let pointer = PointerId::Touch(touch.id);
        let position = self.logical(touch.location);
        match touch.phase {
            TouchPhase::Started => self.host.pointer_down(pointer, position),
            TouchPhase::Moved => self.host.pointer_moved(pointer, position),
            TouchPhase::Ended => self.host.pointer_up(pointer),
            TouchPhase::Cancelled => self.host.pointer_cancel(pointer),
        }
    }

    fn run_frame(&mut self) {
        if let Some(gamepads) = &mut self.gamepads {
            gamepads.update();
        }
        let pad = self.gamepads.as_ref().and_then(GamepadManager::primary);
        self.host.apply_gamepad(pad);

        let host = &mut self.host;
        self.clock.tick(|dt| {
            host.frame(dt);
        });
        self.mouse.clear_transients();
        self.refresh_title();
    }

    /// Poll the telemetry feed on the display's own interval and push any
    /// change into the window title.
    fn refresh_title(&mut self) {
        let title = if self.host.is_active() {
            self.display.poll(self.host.feed(), self.started.elapsed());
            format!("{} | {}", self.config.window.title, self.display.text())
        } else {
            idle_title(&self.config)
        };
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.scale_factor = window.scale_factor();
        let size = window.inner_size().to_logical::<f32>(self.scale_factor);
        self.host.resize(Vec2::new(size.width, size.height));
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width, size.height, self.scale_factor
        );
        self.clock.restart();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.host.end();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let size = new_size.to_logical::<f32>(self.scale_factor);
                self.host.resize(Vec2::new(size.width, size.height));
                debug!("Window resized to {}x{}", size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
            }
            WindowEvent::Focused(false) => self.host.focus_lost(),
            WindowEvent::Focused(true) => self.clock.restart(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(raw) = RawKeyEvent::from_winit(&event) {
                    self.host.handle_key(raw);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = self.logical(position);
                self.mouse
                    .on_cursor_moved(f64::from(position.x), f64::from(position.y));
                self.host.pointer_moved(PointerId::Mouse, position);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
                if button == MouseButton::Left {
                    match state {
                        ElementState::Pressed => {
                            self.host.pointer_down(PointerId::Mouse, self.mouse.position());
                        }
                        ElementState::Released => self.host.pointer_up(PointerId::Mouse),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = self.mouse.on_scroll(delta);
                self.host.wheel(lines);
            }
            WindowEvent::Touch(touch) => self.handle_touch(touch),
            WindowEvent::CursorEntered { .. } => self.mouse.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::RedrawRequested => {
                self.run_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the application with the given config.
///
/// This function blocks until the window is closed.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config);
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Test".to_string();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Test | press Enter to launch");
    }

    #[test]
    fn test_app_starts_idle() {
        let app = OrreryApp::new(Config::default());
        assert!(app.window.is_none());
        assert!(!app.host().is_active());
        assert_eq!(app.title, "Orrery | press Enter to launch");
    }
}
