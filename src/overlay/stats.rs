//! Diagnostics panel: viewport size, aspect ratio and frame rate.
//!
//! The host reports every drawn frame via [`StatsOverlay::frame`]; the frame
//! rate is recomputed once per [`FPS_WINDOW`].

use std::time::{Duration, Instant};

use log::debug;

use super::KeyPress;

/// How often the frame rate is recomputed.
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }
}

#[derive(Debug)]
pub struct FpsCounter {
    fps: u32,
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0,
            frames: 0,
            window_start: now,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Counts one frame. Returns true when the window closed and `fps`
    /// was recomputed.
    pub fn frame(&mut self, now: Instant) -> bool {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return false;
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.fps = (f64::from(self.frames) * 1000.0 / elapsed_ms).round() as u32;
        self.frames = 0;
        self.window_start = now;
        true
    }
}

#[derive(Debug)]
pub struct StatsOverlay {
    visible: bool,
    counter: FpsCounter,
}

impl StatsOverlay {
    /// Starts tracking frames. The panel itself stays hidden until toggled.
    pub fn init() -> Self {
        debug!("Stats overlay init");
        Self {
            visible: false,
            counter: FpsCounter::new(Instant::now()),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// `s` (any case, any modifier) toggles the panel. Returns true if the
    /// key was consumed.
    pub fn handle_key(&mut self, key: &KeyPress) -> bool {
        if key.key.eq_ignore_ascii_case(&'s') {
            self.toggle();
            return true;
        }
        false
    }

    pub fn frame(&mut self, now: Instant) -> bool {
        self.counter.frame(now)
    }

    pub fn fps(&self) -> u32 {
        self.counter.fps()
    }

    /// Panel text, one entry per line.
    pub fn info_lines(&self, viewport: Viewport) -> Vec<String> {
        let aspect = match viewport.aspect_ratio() {
            Some(ratio) => format!("{ratio:.2}"),
            None => "n/a".to_string(),
        };
        vec![
            format!("W:{} x H:{}", viewport.width, viewport.height),
            format!("Aspect Ratio: {aspect}"),
            format!("FPS: {}", self.fps()),
        ]
    }
}
