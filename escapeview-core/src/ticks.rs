//! Gridline and axis tick placement.
//!
//! Ticks are recomputed for every frame; they depend only on the viewport
//! and device size and are cheap to enumerate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::viewport::Viewport;

/// Slack, as a fraction of the step, applied to the span ends so a tick
/// exactly on a bound survives floating-point noise.
const BOUND_SLACK: f64 = 1e-9;
const MAX_LABEL_DECIMALS: i32 = 10;

/// How tick spacing is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TickStrategy {
    /// A constant world-space step regardless of zoom.
    Fixed { step: f64 },
    /// A 1/2/5 × 10^k step close to `target_spacing_px` on screen.
    Adaptive { target_spacing_px: f64 },
}

impl TickStrategy {
    pub const DEFAULT_FIXED_STEP: f64 = 0.2;
    pub const DEFAULT_TARGET_SPACING_PX: f64 = 90.0;

    /// World step for an axis of `span` units drawn over `pixels` pixels.
    pub fn step(&self, span: f64, pixels: u32) -> f64 {
        match *self {
            Self::Fixed { step } => step,
            Self::Adaptive { target_spacing_px } => nice_step(span, pixels, target_spacing_px),
        }
    }
}

impl Default for TickStrategy {
    fn default() -> Self {
        Self::Adaptive {
            target_spacing_px: Self::DEFAULT_TARGET_SPACING_PX,
        }
    }
}

/// One gridline position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Coordinate on the complex plane (real part for x, imaginary for y).
    pub world: f64,
    /// Pixel column (x axis) or row (y axis).
    pub pixel: i64,
    pub label: String,
}

/// Ordered ticks for one axis.
pub type TickSet = Vec<Tick>;

/// Ticks for both axes of a frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisTicks {
    pub x: TickSet,
    pub y: TickSet,
    pub x_step: f64,
    pub y_step: f64,
}

/// Computes tick positions and labels for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlanner {
    pub strategy: TickStrategy,
    /// Upper bound on ticks per axis.
    pub max_ticks: usize,
}

impl Default for TickPlanner {
    fn default() -> Self {
        Self::new(TickStrategy::default())
    }
}

impl TickPlanner {
    pub const DEFAULT_MAX_TICKS: usize = 5000;

    pub fn new(strategy: TickStrategy) -> Self {
        Self {
            strategy,
            max_ticks: Self::DEFAULT_MAX_TICKS,
        }
    }

    pub fn with_max_ticks(self, max_ticks: usize) -> Self {
        Self { max_ticks, ..self }
    }

    /// Ticks for both axes. Empty sets when the mapping is degenerate.
    pub fn plan(&self, viewport: &Viewport, width: u32, height: u32) -> AxisTicks {
        let Ok(mapper) = viewport.mapper(width, height) else {
            debug!(width, height, "No ticks for degenerate mapping");
            return AxisTicks::default();
        };
        let x_step = self.strategy.step(viewport.width(), width);
        let y_step = self.strategy.step(viewport.height(), height);
        AxisTicks {
            x: self.axis(viewport.x_min, viewport.x_max, x_step, |v| {
                mapper.world_to_pixel_x(v)
            }),
            y: self.axis(viewport.y_min, viewport.y_max, y_step, |v| {
                mapper.world_to_pixel_y(v)
            }),
            x_step,
            y_step,
        }
    }

    fn axis(&self, min: f64, max: f64, step: f64, to_pixel: impl Fn(f64) -> i64) -> TickSet {
        multiples_in_range(min, max, step, self.max_ticks)
            .map(|world| Tick {
                world,
                pixel: to_pixel(world),
                label: format_tick(world, step),
            })
            .collect()
    }
}

/// All `k · step` inside `[min, max]`, at most `cap` of them.
pub fn multiples_in_range(
    min: f64,
    max: f64,
    step: f64,
    cap: usize,
) -> impl Iterator<Item = f64> {
    let valid = step > 0.0 && step.is_finite() && min.is_finite() && max.is_finite();
    let slack = step * BOUND_SLACK;
    let (start, end) = if valid {
        (((min - slack) / step).ceil(), ((max + slack) / step).floor())
    } else {
        (1.0, 0.0)
    };
    let count = if end >= start {
        ((end - start) as usize).saturating_add(1).min(cap)
    } else {
        0
    };
    // At deep zoom `k · step` can round past a bound even when `k` is right.
    (0..count)
        .map(move |i| (start + i as f64) * step)
        .filter(move |v| (min - slack..=max + slack).contains(v))
}

/// Snap the ideal world spacing to the next 1, 2, 5 or 10 × 10^k.
///
/// The ideal spacing is `span · target_spacing_px / pixels`. Non-positive
/// inputs fall back to a step of 1.
pub fn nice_step(span: f64, pixels: u32, target_spacing_px: f64) -> f64 {
    if !(span > 0.0) || pixels == 0 || !(target_spacing_px > 0.0) {
        return 1.0;
    }
    let raw = span * target_spacing_px / pixels as f64;
    if !raw.is_finite() {
        return 1.0;
    }
    let pow10 = 10f64.powf(raw.max(1e-300).log10().floor());
    let mantissa = raw / pow10;
    let nice = if mantissa <= 1.0 {
        1.0
    } else if mantissa <= 2.0 {
        2.0
    } else if mantissa <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * pow10
}

/// Decimal places needed to tell adjacent ticks apart.
pub fn label_decimals(step: f64) -> usize {
    let d = (-step.max(1e-12).log10()).ceil() as i32;
    d.clamp(0, MAX_LABEL_DECIMALS) as usize
}

/// Fixed-point label for `value`; never renders as negative zero.
pub fn format_tick(value: f64, step: f64) -> String {
    let label = format!("{:.*}", label_decimals(step), value);
    match label.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => label,
    }
}
