//! affinecat: Mode 7 style rotating cat
//!
//! A tiled 64x64 bitmap is rotated and zoomed through a per-pixel affine
//! transform with a row-based perspective divide:
//! - Rendered into a 256x244 canvas for the chunky SNES look
//! - Upscaled nearest-neighbor to the 640x480 display
//! - Paced to a fixed frame rate

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod asset;
mod config;
mod demo;
mod rasterizer;
mod screenshot;

use std::time::Instant;

use macroquad::prelude::*;

use config::{ConfigError, DemoConfig};
use demo::{Clock, Demo, FrameInput, FramePacer};
use rasterizer::TextureError;

/// Fatal startup failure; the loop is never entered
#[derive(Debug)]
enum StartupError {
    Config(ConfigError),
    Texture(TextureError),
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        StartupError::Config(e)
    }
}

impl From<TextureError> for StartupError {
    fn from(e: TextureError) -> Self {
        StartupError::Texture(e)
    }
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Config(e) => write!(f, "config: {}", e),
            StartupError::Texture(e) => write!(f, "embedded texture: {}", e),
        }
    }
}

fn window_conf() -> Conf {
    // Errors are reported from main once logging is up
    let config = DemoConfig::locate().map(|(c, _)| c).unwrap_or_default();
    conf_for(&config)
}

fn conf_for(config: &DemoConfig) -> Conf {
    Conf {
        window_title: format!("{} v{}", config.window.title, VERSION),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: false,
        // FramePacer owns the frame rate; a vsync wait on top would halve it
        platform: miniquad::conf::Platform {
            swap_interval: Some(0),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn startup() -> Result<(DemoConfig, &'static rasterizer::Texture), StartupError> {
    let (config, source) = DemoConfig::locate()?;
    match source {
        Some(path) => log::info!("Loaded config from {}", path.display()),
        None => log::info!("No config file, using defaults"),
    }
    config.validate()?;

    let texture = asset::cat_texture()?;
    log::info!(
        "Texture {}x{}, {} bytes per pixel",
        texture.width(),
        texture.height(),
        texture.format().bytes_per_pixel()
    );
    Ok((config, texture))
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, texture) = match startup() {
        Ok(v) => v,
        Err(e) => {
            log::error!("Unable to start: {}", e);
            eprintln!("Unable to start affinecat: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "=== affinecat v{} === canvas {}x{} -> display {}x{}, {} fps, {} render thread(s)",
        VERSION,
        config.render.canvas_width,
        config.render.canvas_height,
        config.window.width,
        config.window.height,
        config.target_fps,
        config.render.threads,
    );

    let mut demo = Demo::new(&config, texture);
    let pacer = FramePacer::from_fps(config.target_fps);
    let clock = Clock::start();

    // Closing the window ends the loop like Escape instead of exiting in place
    prevent_quit();

    loop {
        let frame_start = Instant::now();
        let input = FrameInput {
            escape: is_key_pressed(KeyCode::Escape),
            close_requested: is_quit_requested(),
            screenshot: is_key_pressed(KeyCode::F12),
        };
        if input.quit() {
            break;
        }

        let display = demo.frame(clock.now_ms());
        let rgba = display.to_rgba8();

        if input.screenshot {
            match screenshot::save_screenshot(demo.display(), &config.screenshot_dir, demo.frame_count()) {
                Ok(path) => log::info!("Saved screenshot {}", path.display()),
                Err(e) => log::warn!("Screenshot failed: {}", e),
            }
        }

        // Present the display buffer over the whole window
        clear_background(BLACK);
        let display = demo.display();
        let texture = Texture2D::from_rgba8(display.width as u16, display.height as u16, &rgba);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await;

        if !pacer.pace(frame_start) {
            log::debug!(
                "Frame {} took {:?}, budget {:?}",
                demo.frame_count(),
                frame_start.elapsed(),
                pacer.budget()
            );
        }
    }

    log::info!("Bye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conf_disables_vsync() {
        let conf = conf_for(&DemoConfig::default());
        assert_eq!(conf.platform.swap_interval, Some(0));
        assert_eq!((conf.window_width, conf.window_height), (640, 480));
        assert!(!conf.window_resizable);
    }
}
