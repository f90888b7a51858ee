//! Affine transform math for the Mode 7 plane
//!
//! Inverse mapping: for each destination pixel the transform yields the
//! source texel, so every pixel is written exactly once.

use serde::{Deserialize, Serialize};

/// Euclidean modulo: always in [0, n) for n > 0, unlike `%` on negatives
#[inline]
pub fn wrap(v: i64, n: i64) -> i64 {
    v.rem_euclid(n)
}

/// Per-frame Mode 7 transform: 2x2 matrix, origin and horizon offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub x0: f32,
    pub y0: f32,
    /// Added to the row index to form the perspective divisor
    pub horizon: i32,
}

impl Transform {
    /// Identity matrix centered on a width x height canvas
    pub fn identity(width: usize, height: usize) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            x0: (width / 2) as f32,
            y0: (height / 2) as f32,
            horizon: 1,
        }
    }

    /// Unwrapped source coordinate for destination pixel (x, y).
    ///
    /// ```text
    /// pz = y + horizon
    /// xi = (a(x - x0) + b(y - y0) + x0) / pz
    /// yi = (c(x - x0) + d(y - y0) + y0) / pz
    /// ```
    ///
    /// Truncates toward zero. The result is kept in i64 so large magnitudes
    /// reach `wrap` intact; `as` saturates instead of wrapping on overflow.
    #[inline]
    pub fn map(&self, x: usize, y: usize) -> (i64, i64) {
        let row = (y as i32).saturating_add(self.horizon);
        let pz = if row == 0 { 1.0 } else { row as f32 };
        let dx = x as f32 - self.x0;
        let dy = y as f32 - self.y0;
        let xi = (self.a * dx + self.b * dy + self.x0) / pz;
        let yi = (self.c * dx + self.d * dy + self.y0) / pz;
        (xi as i64, yi as i64)
    }
}

/// How the horizon offset evolves over frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HorizonMode {
    /// Constant offset; 1 is a camera sitting just above the plane
    Fixed(i32),
    /// base + amplitude * sin(frame * frequency)
    Wave { base: f32, amplitude: f32, frequency: f32 },
}

impl HorizonMode {
    pub fn evaluate(self, frame: u64) -> i32 {
        match self {
            HorizonMode::Fixed(h) => h,
            HorizonMode::Wave { base, amplitude, frequency } => {
                (base + amplitude * (frame as f32 * frequency).sin()) as i32
            }
        }
    }
}

impl Default for HorizonMode {
    fn default() -> Self {
        HorizonMode::Fixed(1)
    }
}

/// Animation parameters for the transform generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mode7Settings {
    /// Radians per millisecond
    pub rotation_speed: f32,
    /// Uniform zoom; the matrix is divided by this
    pub scale: f32,
    pub horizon: HorizonMode,
}

impl Default for Mode7Settings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.0005,
            scale: 0.006,
            horizon: HorizonMode::Fixed(1),
        }
    }
}

/// Produces one `Transform` per frame from elapsed time
#[derive(Debug, Clone)]
pub struct TransformGenerator {
    pub settings: Mode7Settings,
    width: usize,
    height: usize,
    frame: u64,
}

impl TransformGenerator {
    pub fn new(settings: Mode7Settings, width: usize, height: usize) -> Self {
        Self { settings, width, height, frame: 0 }
    }

    /// Advance one frame and compute the transform for `tick_ms`
    /// milliseconds since start: rotation by `tick_ms * rotation_speed`,
    /// inverse-scaled by `scale`, origin pinned to the canvas center.
    pub fn update(&mut self, tick_ms: u64) -> Transform {
        self.frame += 1;

        let rot = (tick_ms as f64 * f64::from(self.settings.rotation_speed)) as f32;
        let s = self.settings.scale;
        let (sin, cos) = rot.sin_cos();

        Transform {
            a: cos / s,
            b: -sin / s,
            c: sin / s,
            d: cos / s,
            x0: (self.width / 2) as f32,
            y0: (self.height / 2) as f32,
            horizon: self.settings.horizon.evaluate(self.frame),
        }
    }

    /// Number of `update` calls so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative_one() {
        assert_eq!(wrap(-1, 64), 63);
    }

    #[test]
    fn test_wrap_range_and_periodicity() {
        for n in [1i64, 3, 64, 244] {
            for v in -1000i64..1000 {
                let w = wrap(v, n);
                assert!((0..n).contains(&w), "wrap({}, {}) = {}", v, n, w);
                for k in [-7i64, -1, 1, 12] {
                    assert_eq!(wrap(v + k * n, n), w);
                }
            }
        }
    }

    #[test]
    fn test_wrap_extremes() {
        assert_eq!(wrap(i64::MIN, 64), 0);
        assert_eq!(wrap(i64::MAX, 64), 63);
    }

    #[test]
    fn test_tick_zero_is_pure_scale() {
        let mut generator = TransformGenerator::new(Mode7Settings::default(), 256, 244);
        let t = generator.update(0);
        assert!((t.a - 1.0 / 0.006).abs() < 1e-3);
        assert!((t.d - 1.0 / 0.006).abs() < 1e-3);
        assert_eq!(t.b, 0.0);
        assert_eq!(t.c, 0.0);
        assert_eq!((t.x0, t.y0), (128.0, 122.0));
        assert_eq!(t.horizon, 1);
    }

    #[test]
    fn test_quarter_turn() {
        let mut generator = TransformGenerator::new(Mode7Settings::default(), 256, 244);
        let tick = (std::f64::consts::FRAC_PI_2 / 0.0005).round() as u64;
        let t = generator.update(tick);
        let inv = 1.0 / 0.006;
        assert!(t.a.abs() < 0.1);
        assert!((t.c - inv).abs() < 0.1);
        assert!((t.b + inv).abs() < 0.1);
    }

    #[test]
    fn test_origin_does_not_drift() {
        let mut generator = TransformGenerator::new(Mode7Settings::default(), 256, 244);
        for tick in [0, 17, 5000, 1_000_000] {
            let t = generator.update(tick);
            assert_eq!((t.x0, t.y0), (128.0, 122.0));
        }
    }

    #[test]
    fn test_frame_counter_increments() {
        let mut generator = TransformGenerator::new(Mode7Settings::default(), 256, 244);
        assert_eq!(generator.frame(), 0);
        generator.update(0);
        generator.update(0);
        generator.update(16);
        assert_eq!(generator.frame(), 3);
    }

    #[test]
    fn test_wave_horizon_follows_frame() {
        let settings = Mode7Settings {
            horizon: HorizonMode::Wave { base: 1.0, amplitude: 512.0, frequency: 0.01 },
            ..Default::default()
        };
        let mut generator = TransformGenerator::new(settings, 256, 244);
        let first = generator.update(0);
        assert_eq!(first.horizon, (1.0 + 512.0 * (0.01f32).sin()) as i32);
        let last = (0..156).map(|_| generator.update(0)).last().unwrap();
        // frame 157: sin(1.57) is close to 1
        assert!(last.horizon > 500);
    }

    #[test]
    fn test_map_zero_divisor_treated_as_one() {
        let t = Transform { horizon: -5, ..Transform::identity(16, 16) };
        // row 5: pz would be 0
        assert_eq!(t.map(3, 5), (3, 5));
    }
}
