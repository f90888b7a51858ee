//! Core rendering functions
//! Mode 7 plane rasterization and nearest-neighbor upscaling

use super::math::Transform;
use super::types::{PixelBuffer, Texture};

/// Parallel rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Number of threads used for the Mode 7 pass
    pub num_threads: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { num_threads: 1 }
    }
}

/// Render a contiguous stripe of rows starting at `first_row`.
///
/// Each row only depends on its own perspective divisor, so stripes can be
/// rendered independently and in any order.
fn render_stripe(chunk: &mut [u8], width: usize, first_row: usize, transform: &Transform, texture: &Texture) {
    let bpp = texture.format().bytes_per_pixel();
    if width == 0 {
        return;
    }
    for (row, line) in chunk.chunks_exact_mut(width * bpp).enumerate() {
        let y = first_row + row;
        for (x, px) in line.chunks_exact_mut(bpp).enumerate() {
            let (xi, yi) = transform.map(x, y);
            px.copy_from_slice(texture.wrapped_sample(xi, yi));
        }
    }
}

/// Rasterize the tiled texture through `transform` into every pixel of `fb`
pub fn render_mode7(fb: &mut PixelBuffer, transform: &Transform, texture: &Texture) {
    debug_assert_eq!(fb.format, texture.format(), "canvas and texture formats differ");
    let width = fb.width;
    render_stripe(fb.data_mut(), width, 0, transform, texture);
}

/// Same output as `render_mode7`, split into row stripes on scoped threads
pub fn render_mode7_parallel(fb: &mut PixelBuffer, transform: &Transform, texture: &Texture, options: RenderOptions) {
    let threads = options.num_threads.min(fb.height);
    if threads <= 1 {
        render_mode7(fb, transform, texture);
        return;
    }
    debug_assert_eq!(fb.format, texture.format(), "canvas and texture formats differ");

    let width = fb.width;
    let stride = fb.stride();
    let rows_per_thread = fb.height / threads;
    let remainder = fb.height % threads;

    // Disjoint stripes
    let mut stripes = Vec::with_capacity(threads);
    let mut remaining = fb.data_mut();
    let mut start_y = 0;
    for i in 0..threads {
        let rows = rows_per_thread + usize::from(i < remainder);
        let (chunk, rest) = std::mem::take(&mut remaining).split_at_mut(rows * stride);
        stripes.push((chunk, start_y));
        remaining = rest;
        start_y += rows;
    }

    std::thread::scope(|s| {
        for (chunk, first_row) in stripes {
            s.spawn(move || render_stripe(chunk, width, first_row, transform, texture));
        }
    });
}

/// Nearest-neighbor resize of `src` into `dst`.
///
/// Destination pixel (dx, dy) takes source pixel (dx*sw/dw, dy*sh/dh).
/// Integer math keeps block edges exact; downscaling just subsamples.
pub fn blit_scaled(src: &PixelBuffer, dst: &mut PixelBuffer) {
    debug_assert_eq!(src.format, dst.format, "scaler needs matching formats");
    let (sw, sh) = (src.width, src.height);
    let (dw, dh) = (dst.width, dst.height);
    let bpp = src.format.bytes_per_pixel();

    // Source column byte offsets are the same for every row
    let columns: Vec<usize> = (0..dw).map(|dx| (dx * sw / dw) * bpp).collect();

    for dy in 0..dh {
        let sy = dy * sh / dh;
        let src_row = &src.data()[sy * src.stride()..(sy + 1) * src.stride()];
        let dst_row = dst.row_mut(dy);
        for (px, &sx) in dst_row.chunks_exact_mut(bpp).zip(&columns) {
            px.copy_from_slice(&src_row[sx..sx + bpp]);
        }
    }
}
