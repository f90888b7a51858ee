//! Per-frame pipeline and frame timing
//!
//! Transform update, Mode 7 pass and upscale run strictly in order; the
//! platform loop in `main` only supplies the clock and presents the result.

use std::time::{Duration, Instant};

use crate::config::DemoConfig;
use crate::rasterizer::{
    blit_scaled, render_mode7_parallel, PixelBuffer, RenderOptions, Texture, Transform, TransformGenerator,
};

/// The rotating plane: owns the canvas and display buffers
pub struct Demo<'a> {
    generator: TransformGenerator,
    texture: &'a Texture,
    canvas: PixelBuffer,
    display: PixelBuffer,
    options: RenderOptions,
    transform: Transform,
}

impl<'a> Demo<'a> {
    /// Both buffers share the texture's pixel format, so every stage is a
    /// raw byte copy.
    pub fn new(config: &DemoConfig, texture: &'a Texture) -> Self {
        let render = &config.render;
        let format = texture.format();
        Self {
            generator: TransformGenerator::new(render.mode7, render.canvas_width, render.canvas_height),
            texture,
            canvas: PixelBuffer::new(render.canvas_width, render.canvas_height, format),
            display: PixelBuffer::new(config.window.width, config.window.height, format),
            options: RenderOptions { num_threads: render.threads },
            transform: Transform::identity(render.canvas_width, render.canvas_height),
        }
    }

    /// Render one frame for `tick_ms` milliseconds since start
    pub fn frame(&mut self, tick_ms: u64) -> &PixelBuffer {
        self.transform = self.generator.update(tick_ms);
        render_mode7_parallel(&mut self.canvas, &self.transform, self.texture, self.options);
        blit_scaled(&self.canvas, &mut self.display);
        &self.display
    }

    pub fn display(&self) -> &PixelBuffer {
        &self.display
    }

    pub fn frame_count(&self) -> u64 {
        self.generator.frame()
    }
}

#[cfg(test)]
impl Demo<'_> {
    fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// Transform used for the most recent frame
    fn transform(&self) -> &Transform {
        &self.transform
    }
}

/// Keys and window events sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub escape: bool,
    pub close_requested: bool,
    pub screenshot: bool,
}

impl FrameInput {
    /// Escape and the window close button both end the loop
    pub fn quit(&self) -> bool {
        self.escape || self.close_requested
    }
}

/// Monotonic milliseconds since construction
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Sleeps away whatever is left of a fixed per-frame budget.
///
/// The budget covers the whole loop iteration, presentation included, so the
/// window must not also wait on vsync.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Duration,
}

impl FramePacer {
    pub fn from_fps(fps: u32) -> Self {
        Self {
            budget: Duration::from_millis(1000 / u64::from(fps.max(1))),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left after a frame that took `elapsed`; `None` only when the
    /// frame ran past its budget
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed)
    }

    /// Returns false when the frame overran its budget
    pub fn sleep_remaining(&self, elapsed: Duration) -> bool {
        match self.remaining(elapsed) {
            Some(left) => {
                if !left.is_zero() {
                    std::thread::sleep(left);
                }
                true
            }
            None => false,
        }
    }

    /// End an iteration that began at `frame_start`
    pub fn pace(&self, frame_start: Instant) -> bool {
        self.sleep_remaining(frame_start.elapsed())
    }
}
