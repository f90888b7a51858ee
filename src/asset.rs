//! Embedded cat texture
//!
//! 64x64 RGB565 (little-endian) bitmap compiled into the binary.

use std::sync::OnceLock;

use crate::rasterizer::{Texture, TextureError};

pub const CAT_WIDTH: usize = 64;
pub const CAT_HEIGHT: usize = 64;
pub const CAT_BYTES_PER_PIXEL: u8 = 2;

static CAT_PIXELS: &[u8] = include_bytes!("../assets/cat.rgb565");
static CAT: OnceLock<Texture> = OnceLock::new();

/// Validate the embedded bytes and build a texture from them
pub fn load_cat_texture() -> Result<Texture, TextureError> {
    Texture::from_raw(CAT_WIDTH, CAT_HEIGHT, CAT_BYTES_PER_PIXEL, CAT_PIXELS)
}

/// Process-wide read-only cat texture, built on first use
pub fn cat_texture() -> Result<&'static Texture, TextureError> {
    if let Some(tex) = CAT.get() {
        return Ok(tex);
    }
    let tex = load_cat_texture()?;
    Ok(CAT.get_or_init(|| tex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::PixelFormat;

    #[test]
    fn test_cat_texture_dimensions() {
        let tex = cat_texture().unwrap();
        assert_eq!((tex.width(), tex.height()), (64, 64));
        assert_eq!(tex.format(), PixelFormat::Rgb565);
        assert_eq!(tex.data().len(), 64 * 64 * 2);
    }

    #[test]
    fn test_cat_texture_is_shared() {
        let a = cat_texture().unwrap();
        let b = cat_texture().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_cat_texture_not_blank() {
        let tex = load_cat_texture().unwrap();
        let first = tex.sample(0, 0);
        assert!((0..64).any(|y| (0..64).any(|x| tex.sample(x, y) != first)));
    }
}
