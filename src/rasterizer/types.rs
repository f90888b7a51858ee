//! Core types for the rasterizer

/// Pixel storage format, tagged by bytes per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565 = 2,   // 16-bit packed, little-endian
    Rgb888 = 3,
    Rgba8888 = 4,
}

impl PixelFormat {
    pub fn from_bytes_per_pixel(bpp: u8) -> Result<Self, TextureError> {
        match bpp {
            2 => Ok(PixelFormat::Rgb565),
            3 => Ok(PixelFormat::Rgb888),
            4 => Ok(PixelFormat::Rgba8888),
            other => Err(TextureError::BadDepth(other)),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self as usize
    }
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Decode one raw pixel. RGB565 channels are widened by bit replication
    /// so that full intensity maps to 255.
    pub fn decode(format: PixelFormat, raw: &[u8]) -> Self {
        match format {
            PixelFormat::Rgb565 => {
                let v = u16::from_le_bytes([raw[0], raw[1]]);
                let r5 = ((v >> 11) & 0x1f) as u8;
                let g6 = ((v >> 5) & 0x3f) as u8;
                let b5 = (v & 0x1f) as u8;
                Self::new((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
            }
            PixelFormat::Rgb888 => Self::new(raw[0], raw[1], raw[2]),
            PixelFormat::Rgba8888 => Self { r: raw[0], g: raw[1], b: raw[2], a: raw[3] },
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Owned pixel buffer of a fixed size and format.
///
/// Pixels are addressed row-major; every accessor goes through slice
/// indexing so out-of-range coordinates panic instead of corrupting memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width * height * format.bytes_per_pixel()],
        }
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride();
        &mut self.data[y * stride..(y + 1) * stride]
    }

    /// Convert to RGBA8 bytes (for macroquad textures and PNG output)
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for px in self.data.chunks_exact(self.format.bytes_per_pixel()) {
            out.extend_from_slice(&Color::decode(self.format, px).to_bytes());
        }
        out
    }
}

/// Error type for texture construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    ZeroSize,
    BadDepth(u8),
    LengthMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::ZeroSize => write!(f, "texture has zero width or height"),
            TextureError::BadDepth(bpp) => write!(f, "unsupported bytes per pixel: {}", bpp),
            TextureError::LengthMismatch { expected, actual } => {
                write!(f, "pixel data is {} bytes, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// Immutable tiling bitmap (no filtering - sampled by integer texel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Texture {
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize);
        }
        let expected = width * height * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(TextureError::LengthMismatch { expected, actual: data.len() });
        }
        Ok(Self { width, height, format, data })
    }

    /// Build from an exported asset: raw depth tag, and pixel data that may
    /// carry one trailing guard byte.
    pub fn from_raw(width: usize, height: usize, bytes_per_pixel: u8, data: &[u8]) -> Result<Self, TextureError> {
        let format = PixelFormat::from_bytes_per_pixel(bytes_per_pixel)?;
        let expected = width * height * format.bytes_per_pixel();
        let data = if data.len() == expected + 1 { &data[..expected] } else { data };
        Self::new(width, height, format, data.to_vec())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes of the texel at x,y
    pub fn sample(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let idx = (y * self.width + x) * bpp;
        &self.data[idx..idx + bpp]
    }

    /// Sample with toroidal wrap-around on both axes
    pub fn wrapped_sample(&self, x: i64, y: i64) -> &[u8] {
        let tx = super::math::wrap(x, self.width as i64) as usize;
        let ty = super::math::wrap(y, self.height as i64) as usize;
        self.sample(tx, ty)
    }
}

// Fixture builders and per-pixel accessors; the render path works on whole rows
#[cfg(test)]
impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    /// Encode into raw bytes; only the first `format.bytes_per_pixel()` are meaningful
    pub fn encode(self, format: PixelFormat) -> [u8; 4] {
        match format {
            PixelFormat::Rgb565 => {
                let v = (((self.r as u16) >> 3) << 11) | (((self.g as u16) >> 2) << 5) | ((self.b as u16) >> 3);
                let [lo, hi] = v.to_le_bytes();
                [lo, hi, 0, 0]
            }
            PixelFormat::Rgb888 => [self.r, self.g, self.b, 0],
            PixelFormat::Rgba8888 => self.to_bytes(),
        }
    }
}

#[cfg(test)]
impl PixelBuffer {
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y * self.width + x) * self.format.bytes_per_pixel()
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let idx = self.offset(x, y);
        &self.data[idx..idx + self.format.bytes_per_pixel()]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, raw: &[u8]) {
        let idx = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        self.data[idx..idx + bpp].copy_from_slice(&raw[..bpp]);
    }

    /// Fill every pixel with the same raw value
    pub fn fill(&mut self, raw: &[u8]) {
        let bpp = self.format.bytes_per_pixel();
        for px in self.data.chunks_exact_mut(bpp) {
            px.copy_from_slice(&raw[..bpp]);
        }
    }
}

#[cfg(test)]
impl Texture {
    /// Create a texture filled with one color
    pub fn solid(width: usize, height: usize, format: PixelFormat, color: Color) -> Result<Self, TextureError> {
        let bpp = format.bytes_per_pixel();
        let raw = color.encode(format);
        let mut data = Vec::with_capacity(width * height * bpp);
        for _ in 0..width * height {
            data.extend_from_slice(&raw[..bpp]);
        }
        Self::new(width, height, format, data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copy of this texture with one texel replaced
    pub fn with_texel(mut self, x: usize, y: usize, raw: &[u8]) -> Self {
        let bpp = self.format.bytes_per_pixel();
        let idx = (y * self.width + x) * bpp;
        self.data[idx..idx + bpp].copy_from_slice(&raw[..bpp]);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_bad_depth() {
        assert_eq!(Texture::from_raw(2, 2, 5, &[0; 20]), Err(TextureError::BadDepth(5)));
    }

    #[test]
    fn test_from_raw_strips_guard_byte() {
        let tex = Texture::from_raw(2, 2, 2, &[1; 9]).unwrap();
        assert_eq!(tex.data().len(), 8);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Texture::new(4, 4, PixelFormat::Rgb565, vec![0; 30]).unwrap_err();
        assert_eq!(err, TextureError::LengthMismatch { expected: 32, actual: 30 });
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(Texture::new(0, 4, PixelFormat::Rgb565, vec![]), Err(TextureError::ZeroSize));
    }

    #[test]
    fn test_rgb565_decode_extremes() {
        assert_eq!(Color::decode(PixelFormat::Rgb565, &[0xff, 0xff]), Color::WHITE);
        assert_eq!(Color::decode(PixelFormat::Rgb565, &[0x00, 0x00]), Color::BLACK);
        // pure red: 0xF800
        assert_eq!(Color::decode(PixelFormat::Rgb565, &[0x00, 0xf8]), Color::new(255, 0, 0));
    }

    #[test]
    fn test_rgb565_encode_matches_decode() {
        let c = Color::new(255, 0, 255);
        let raw = c.encode(PixelFormat::Rgb565);
        assert_eq!(Color::decode(PixelFormat::Rgb565, &raw[..2]), c);
    }

    #[test]
    fn test_wrapped_sample_negative() {
        let tex = Texture::solid(4, 4, PixelFormat::Rgba8888, Color::BLACK)
            .unwrap()
            .with_texel(3, 3, &[1, 2, 3, 4]);
        assert_eq!(tex.wrapped_sample(-1, -1), &[1, 2, 3, 4]);
        assert_eq!(tex.wrapped_sample(7, 11), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_pixel_buffer_set_get() {
        let mut buf = PixelBuffer::new(3, 2, PixelFormat::Rgb888);
        assert_eq!(buf.stride(), 9);
        buf.set_pixel(2, 1, &[7, 8, 9]);
        assert_eq!(buf.pixel(2, 1), &[7, 8, 9]);
        assert_eq!(&buf.row_mut(1)[6..9], &[7, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn test_pixel_buffer_out_of_bounds_panics() {
        let buf = PixelBuffer::new(2, 2, PixelFormat::Rgb565);
        let _ = buf.pixel(2, 0);
    }

    #[test]
    fn test_to_rgba8() {
        let mut buf = PixelBuffer::new(2, 1, PixelFormat::Rgb565);
        buf.fill(&[0xff, 0xff]);
        assert_eq!(buf.to_rgba8(), vec![255; 8]);
    }
}
