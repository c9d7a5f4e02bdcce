use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Colour returned for points that never escape: opaque black.
pub const INTERIOR_COLOR: u32 = 0xFF00_0000;

/// Hue offset and cycle count of the smooth colour ramp.
const HUE_OFFSET: f64 = 0.95;
const HUE_CYCLES: f64 = 10.0;
const SATURATION: f32 = 0.75;
const BRIGHTNESS: f32 = 1.0;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Iteration cap and bailout radius for the divergence test.
///
/// The cached `escape_radius_sq` field is recomputed on deserialization so
/// config files never need to carry it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderParameters {
    /// Maximum number of iterations before declaring a point interior.
    pub max_iterations: u32,

    /// Bailout radius; the loop compares `|z|²` against its square.
    pub escape_radius: f64,

    #[serde(skip)]
    escape_radius_sq: f64,
}

impl<'de> Deserialize<'de> for RenderParameters {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            max_iterations: u32,
            escape_radius: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.max_iterations, raw.escape_radius).map_err(serde::de::Error::custom)
    }
}

impl RenderParameters {
    pub const MIN_ITERATIONS: u32 = 10;
    pub const MAX_ITERATIONS: u32 = 200_000;
    pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

    pub fn new(max_iterations: u32, escape_radius: f64) -> crate::Result<Self> {
        if !(Self::MIN_ITERATIONS..=Self::MAX_ITERATIONS).contains(&max_iterations) {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if escape_radius <= 0.0 || !escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(escape_radius));
        }
        Ok(Self {
            max_iterations,
            escape_radius,
            escape_radius_sq: escape_radius * escape_radius,
        })
    }

    #[inline]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }

    /// Copy with `max_iterations` clamped into the supported range.
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations: max_iterations.clamp(Self::MIN_ITERATIONS, Self::MAX_ITERATIONS),
            ..self
        }
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            escape_radius_sq: Self::DEFAULT_ESCAPE_RADIUS * Self::DEFAULT_ESCAPE_RADIUS,
        }
    }
}

// ---------------------------------------------------------------------------
// Kernel
// ---------------------------------------------------------------------------

/// Outcome of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Escape {
    /// The orbit left the bailout disc. `iterations` is the zero-based index
    /// of the escaping iterate and `norm_sq` is `|z|²` at that moment.
    Escaped { iterations: u32, norm_sq: f64 },

    /// The orbit stayed bounded for `max_iterations` steps.
    Interior,
}

/// Which quantity the pixel supplies to `z ← z² + c`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EscapeKernel {
    /// `z₀ = 0`, `c` is the pixel.
    #[default]
    Mandelbrot,
    /// `z₀` is the pixel, `c` is fixed.
    Julia { c: Complex },
}

impl EscapeKernel {
    /// A Julia constant with a well-connected, detailed set.
    pub const DEFAULT_JULIA_C: Complex = Complex {
        re: -0.122561,
        im: 0.744862,
    };

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia { .. } => "Julia",
        }
    }

    /// Run the divergence loop for one point.
    ///
    /// The loop touches only stack values so rows can be filled in
    /// parallel without coordination.
    #[inline]
    pub fn iterate(&self, point: Complex, params: &RenderParameters) -> Escape {
        let (mut z, c) = match *self {
            Self::Mandelbrot => {
                // Closed-form interior test; these orbits stay within |z| ≤ 2.
                if params.escape_radius >= 2.0 && in_main_bulbs(point) {
                    return Escape::Interior;
                }
                (Complex::ZERO, point)
            }
            Self::Julia { c } => (point, c),
        };

        let escape_radius_sq = params.escape_radius_sq();
        for n in 0..params.max_iterations {
            z = Complex::new(z.re * z.re - z.im * z.im + c.re, 2.0 * z.re * z.im + c.im);
            let norm_sq = z.norm_sq();
            if norm_sq > escape_radius_sq {
                return Escape::Escaped {
                    iterations: n,
                    norm_sq,
                };
            }
        }
        Escape::Interior
    }
}

/// Main cardioid or period-2 bulb of the Mandelbrot set.
#[inline]
fn in_main_bulbs(c: Complex) -> bool {
    let im2 = c.im * c.im;
    let q = (c.re - 0.25) * (c.re - 0.25) + im2;
    let cardioid = q * (q + (c.re - 0.25)) <= 0.25 * im2;
    let bulb = (c.re + 1.0) * (c.re + 1.0) + im2 <= 0.0625;
    cardioid || bulb
}

// ---------------------------------------------------------------------------
// Colouring
// ---------------------------------------------------------------------------

/// Iterate `point` and return its opaque ARGB colour.
#[inline]
pub fn escape_color(point: Complex, kernel: &EscapeKernel, params: &RenderParameters) -> u32 {
    smooth_color(kernel.iterate(point, params), params.max_iterations)
}

/// Map an escape result to a colour on the hue ramp.
///
/// Uses the renormalised count `ν = n + 1 − ln(ln|z|) / ln 2`.
pub fn smooth_color(result: Escape, max_iterations: u32) -> u32 {
    match result {
        Escape::Interior => INTERIOR_COLOR,
        Escape::Escaped {
            iterations,
            norm_sq,
        } => {
            let nu = smooth_iteration(iterations, norm_sq);
            let t = (nu / max_iterations as f64).clamp(0.0, 1.0);
            let hue = HUE_OFFSET + HUE_CYCLES * t;
            let hue = (hue - hue.floor()) as f32;
            0xFF00_0000 | (hsb_to_rgb(hue, SATURATION, BRIGHTNESS) & 0x00FF_FFFF)
        }
    }
}

/// Continuous iteration count for an escaped orbit.
pub fn smooth_iteration(iterations: u32, norm_sq: f64) -> f64 {
    let log_zn = norm_sq.ln() * 0.5; // ln|z|
    if log_zn <= 0.0 {
        // Bailout radius below 1; the log-log term is undefined.
        return iterations as f64;
    }
    iterations as f64 + 1.0 - log_zn.ln() / std::f64::consts::LN_2
}

/// Hue/saturation/brightness in `[0, 1]` to packed `0x00RRGGBB`.
///
/// Six-sector conversion with channels rounded as `⌊v·255 + 0.5⌋`.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> u32 {
    let channel = |v: f32| (v * 255.0 + 0.5) as u32;
    let (r, g, b) = if saturation == 0.0 {
        let v = channel(brightness);
        (v, v, v)
    } else {
        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match h as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };
        (channel(r), channel(g), channel(b))
    };
    (r << 16) | (g << 8) | b
}
