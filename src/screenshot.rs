//! PNG screenshots of the display buffer

use std::fs;
use std::path::{Path, PathBuf};

use crate::rasterizer::PixelBuffer;

/// Error type for screenshot saving
#[derive(Debug)]
pub enum ScreenshotError {
    IoError(std::io::Error),
    ImageError(image::ImageError),
}

impl From<std::io::Error> for ScreenshotError {
    fn from(e: std::io::Error) -> Self {
        ScreenshotError::IoError(e)
    }
}

impl From<image::ImageError> for ScreenshotError {
    fn from(e: image::ImageError) -> Self {
        ScreenshotError::ImageError(e)
    }
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::IoError(e) => write!(f, "IO error: {}", e),
            ScreenshotError::ImageError(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for ScreenshotError {}

/// Write `buffer` as `<dir>/affinecat_<frame>.png`, creating `dir` if needed
pub fn save_screenshot<P: AsRef<Path>>(buffer: &PixelBuffer, dir: P, frame: u64) -> Result<PathBuf, ScreenshotError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("affinecat_{:06}.png", frame));
    image::save_buffer(
        &path,
        &buffer.to_rgba8(),
        buffer.width as u32,
        buffer.height as u32,
        image::ColorType::Rgba8,
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::PixelFormat;

    #[test]
    fn test_screenshot_round_trip() {
        let dir = std::env::temp_dir().join(format!("affinecat_shots_{}", std::process::id()));
        let mut buffer = PixelBuffer::new(8, 4, PixelFormat::Rgb565);
        // pure red
        buffer.set_pixel(3, 2, &[0x00, 0xf8]);

        let path = save_screenshot(&buffer, &dir, 42).unwrap();
        assert!(path.ends_with("affinecat_000042.png"));

        let img = image::open(&path).unwrap().to_rgba8();
        let _ = fs::remove_dir_all(&dir);
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(3, 2).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
