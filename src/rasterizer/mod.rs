//! Mode 7 software rasterizer
//!
//! Features:
//! - Per-pixel affine inverse mapping of a tiled texture (SNES Mode 7 look)
//! - Row-based pseudo-perspective divide
//! - Toroidal texture wrap with Euclidean modulo
//! - Nearest-neighbor upscale of the low-res canvas to the display

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;

/// Canvas dimensions (SNES-like low resolution)
pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 244;

/// Display dimensions
pub const WIDTH_HI: usize = 640;
pub const HEIGHT_HI: usize = 480;
