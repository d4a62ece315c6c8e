//! Startup sequence and the frame loop that drives the animation.

use crate::animation;
use crate::config::Config;
use crate::error::InitError;
use crate::graphics::Framebuffer;
use crate::render::render;
use crate::state::AppState;
use log::{debug, error, info};
use std::io;
use std::time::{Duration, Instant};

/// Pause before the first size measurement, letting the terminal settle
pub const STARTUP_DELAY: Duration = Duration::from_millis(100);

/// Input translated from the host's native events
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Pointer over cell (`col`, `row`)
    Pointer { col: u16, row: u16 },
    /// Wheel notches, positive scrolls down the page
    Scroll(i32),
    /// The view now has `cols` x `rows` cells
    Resize { cols: u16, rows: u16 },
    ToggleDebug,
    /// The view is being torn down
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

/// A created rendering context: an output surface plus its event source.
///
/// The frame loop waits on [`Surface::next_event`] between frames, which makes
/// the surface the scheduler of the animation.
pub trait Surface {
    /// Cell grid dimensions as (cols, rows)
    fn grid(&self) -> (u16, u16);
    /// Pixel dimensions of the framebuffer this surface displays
    fn resolution(&self) -> (usize, usize);
    /// Waits up to `timeout` for the next relevant input event
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<HostEvent>>;
    fn present(&mut self, framebuffer: &Framebuffer, overlay: &[String]) -> io::Result<()>;
}

/// The environment hosting the view
pub trait Platform {
    type Surface: Surface;

    /// Whether the host can render at all, checked before any setup
    fn check_capability(&self) -> Result<(), InitError>;
    fn create_surface(&mut self) -> Result<Self::Surface, InitError>;
    /// Replaces the view with a static message explaining the failure
    fn show_fallback(&mut self);
}

/// Initialization state of the view
pub enum Lifecycle<S> {
    Uninitialized,
    Running(S),
    Failed,
}

impl<S> Lifecycle<S> {
    /// Makes the single initialization attempt.
    ///
    /// Only `Uninitialized` transitions; `Running` and `Failed` are returned
    /// unchanged so a failed start is never retried.
    pub fn start<P>(self, platform: &mut P, delay: Duration) -> Self
    where
        P: Platform<Surface = S>,
    {
        match self {
            Lifecycle::Uninitialized => {}
            other => return other,
        }

        if let Err(e) = platform.check_capability() {
            error!("{e}");
            platform.show_fallback();
            return Lifecycle::Failed;
        }

        std::thread::sleep(delay);

        match platform.create_surface() {
            Ok(surface) => {
                info!("Rendering context created");
                Lifecycle::Running(surface)
            }
            Err(e) => {
                error!("Initialization failed: {e}");
                platform.show_fallback();
                Lifecycle::Failed
            }
        }
    }
}

/// Drives ticks, rendering and input for a running surface
pub struct Runner<S: Surface> {
    surface: S,
    state: AppState,
    framebuffer: Framebuffer,
    config: Config,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl<S: Surface> Runner<S> {
    pub fn new(surface: S, mut state: AppState, config: Config) -> Self {
        let (width, height) = surface.resolution();
        if height > 0 {
            state.scene.camera.aspect = width as f64 / height as f64;
        }
        state.debug |= config.debug;
        let framebuffer = Framebuffer::new(width, height, state.scene.background);
        Runner {
            surface,
            state,
            framebuffer,
            config,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs frames until the view is torn down
    pub fn run(&mut self) -> io::Result<()> {
        while self.frame()? == Signal::Continue {}
        info!("View closed after {} frames", self.state.frame);
        Ok(())
    }

    /// Advances, draws and presents one frame, then handles input until the
    /// next frame is due.
    pub fn frame(&mut self) -> io::Result<Signal> {
        let deadline = Instant::now() + self.config.frame_interval;

        animation::tick(&mut self.state);
        render(&self.state.scene, &mut self.framebuffer);
        self.update_fps();
        let overlay = if self.state.debug {
            self.overlay()
        } else {
            Vec::new()
        };
        self.surface.present(&self.framebuffer, &overlay)?;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            match self.surface.next_event(timeout)? {
                Some(event) => {
                    if self.handle(event) == Signal::Quit {
                        return Ok(Signal::Quit);
                    }
                }
                None => return Ok(Signal::Continue),
            }
        }
    }

    /// Applies one input event to the state
    pub fn handle(&mut self, event: HostEvent) -> Signal {
        match event {
            HostEvent::Pointer { col, row } => {
                let (cols, rows) = self.surface.grid();
                self.state.input.pointer_moved(col, row, cols, rows);
            }
            HostEvent::Scroll(notches) => {
                self.state
                    .input
                    .scrolled(notches as f64 * self.config.scroll_step, self.config.max_scroll);
            }
            HostEvent::Resize { cols, rows } => {
                let (width, height) = self.surface.resolution();
                debug!("Resized to {cols}x{rows} cells, {width}x{height} pixels");
                self.framebuffer
                    .resize(width, height, self.state.scene.background);
                if height > 0 {
                    self.state.scene.camera.aspect = width as f64 / height as f64;
                }
            }
            HostEvent::ToggleDebug => self.state.debug = !self.state.debug,
            HostEvent::Quit => return Signal::Quit,
        }
        Signal::Continue
    }

    fn update_fps(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    fn overlay(&self) -> Vec<String> {
        let camera = &self.state.scene.camera;
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.fps),
            format!(
                "Camera: ({:.2}, {:.2}, {:.2})",
                camera.position[0], camera.position[1], camera.position[2]
            ),
            format!(
                "Pointer: ({:.2}, {:.2})  Scroll: {:.0}px",
                self.state.input.mouse_x, self.state.input.mouse_y, self.state.input.scroll_y
            ),
            format!("Frame: {}", self.state.frame),
        ]
    }
}
