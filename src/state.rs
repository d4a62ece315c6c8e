use crate::scene::Scene;

/// Latest pointer and scroll readings.
///
/// Input handlers overwrite the fields as events arrive and the animation
/// tick reads them once per frame; everything runs on the same thread.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Pointer x in [-1, 1], left to right
    pub mouse_x: f64,
    /// Pointer y in [-1, 1], bottom to top
    pub mouse_y: f64,
    /// Virtual page scroll offset in pixels
    pub scroll_y: f64,
}

impl InputState {
    /// Records the pointer at cell (`col`, `row`) of a `cols` x `rows` view
    pub fn pointer_moved(&mut self, col: u16, row: u16, cols: u16, rows: u16) {
        if cols == 0 || rows == 0 {
            return;
        }
        self.mouse_x = (col as f64 / cols as f64) * 2.0 - 1.0;
        self.mouse_y = -(row as f64 / rows as f64) * 2.0 + 1.0;
    }

    /// Moves the virtual page by `delta` pixels, staying within `[0, max]`.
    /// Non-finite deltas are ignored.
    pub fn scrolled(&mut self, delta: f64, max: f64) {
        if !delta.is_finite() {
            return;
        }
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, max.max(0.0));
    }
}

/// Everything the animation tick reads and writes
pub struct AppState {
    pub scene: Scene,
    pub input: InputState,
    /// Ticks run since the loop started
    pub frame: u64,
    /// Show the diagnostic overlay
    pub debug: bool,
}

impl AppState {
    pub fn new(scene: Scene) -> Self {
        AppState {
            scene,
            input: InputState::default(),
            frame: 0,
            debug: false,
        }
    }
}
