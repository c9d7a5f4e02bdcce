use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Relative tolerance under which world and device aspect ratios are equal
/// for well-resolved viewports.
const ASPECT_TOLERANCE: f64 = 1e-12;

/// The rectangular region of the complex plane mapped onto the device.
///
/// Bounds are always finite with `x_min < x_max` and `y_min < y_max`.
/// Navigation replaces the whole value rather than editing a bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// The classic Mandelbrot framing `[-2.5, 1.0] × [-1.25, 1.25]`.
    pub const MANDELBROT: Self = Self {
        x_min: -2.5,
        x_max: 1.0,
        y_min: -1.25,
        y_max: 1.25,
    };

    /// Framing for Julia sets, `[-2, 2] × [-1.5, 1.5]`.
    pub const JULIA: Self = Self {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -1.5,
        y_max: 1.5,
    };

    /// Create a viewport from explicit bounds, rejecting degenerate input.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        let vp = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        vp.validate()?;
        Ok(vp)
    }

    /// Build a viewport of the given world extent centred on `center`.
    ///
    /// Not validated; callers check [`is_valid`](Self::is_valid) before use.
    pub fn centered(center: Complex, width: f64, height: f64) -> Self {
        Self {
            x_min: center.re - width / 2.0,
            x_max: center.re + width / 2.0,
            y_min: center.im - height / 2.0,
            y_max: center.im + height / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Complex {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Same extent, moved so that `center` is in the middle.
    pub fn recentered(&self, center: Complex) -> Self {
        Self::centered(center, self.width(), self.height())
    }

    /// Extent multiplied by `scale` around `center`.
    pub fn scaled_about(&self, center: Complex, scale: f64) -> Self {
        Self::centered(center, self.width() * scale, self.height() * scale)
    }

    pub fn contains(&self, point: Complex) -> bool {
        (self.x_min..=self.x_max).contains(&point.re)
            && (self.y_min..=self.y_max).contains(&point.im)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> crate::Result<()> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(CoreError::DegenerateViewport {
                reason: format!("non-finite bounds {self:?}"),
            });
        }
        // Written as `!(a > 0)` so NaN spans are rejected too.
        if !(self.width() > 0.0 && self.width().is_finite())
            || !(self.height() > 0.0 && self.height().is_finite())
        {
            return Err(CoreError::DegenerateViewport {
                reason: format!("span must be positive, got {}×{}", self.width(), self.height()),
            });
        }
        Ok(())
    }

    /// `true` when adjacent pixels still map to distinct `f64` coordinates.
    ///
    /// Navigation rejects viewports that fail this check so a deep zoom
    /// stops at the precision floor instead of collapsing the span.
    pub fn is_resolvable(&self, device_width: u32, device_height: u32) -> bool {
        if !self.is_valid() || device_width == 0 || device_height == 0 {
            return false;
        }
        let mag_x = self.x_min.abs().max(self.x_max.abs()).max(1.0);
        let mag_y = self.y_min.abs().max(self.y_max.abs()).max(1.0);
        let step_x = self.width() / device_width as f64;
        let step_y = self.height() / device_height as f64;
        step_x > 4.0 * f64::EPSILON * mag_x && step_y > 4.0 * f64::EPSILON * mag_y
    }

    /// Enlarge the shorter world dimension so the viewport matches the
    /// device aspect ratio, keeping the centre fixed.
    ///
    /// A zero device size leaves the viewport unchanged.
    pub fn adjust_aspect(&self, device_width: u32, device_height: u32) -> Self {
        if device_width == 0 || device_height == 0 {
            return *self;
        }
        let view_aspect = device_width as f64 / device_height as f64;
        let mut world_w = self.width();
        let mut world_h = self.height();
        let world_aspect = world_w / world_h;
        if ((view_aspect - world_aspect) / view_aspect).abs() <= self.aspect_tolerance() {
            return *self;
        }
        if view_aspect > world_aspect {
            world_w = view_aspect * world_h;
        } else {
            world_h = world_w / view_aspect;
        }
        Self::centered(self.center(), world_w, world_h)
    }

    /// Smallest relative aspect mismatch the bounds can express.
    ///
    /// Re-centring rounds each bound to within half an ulp, which perturbs
    /// the aspect by about `ε · |bound| / span` per axis. Mismatches below
    /// that are noise and must not trigger another adjustment.
    fn aspect_tolerance(&self) -> f64 {
        let mag_x = self.x_min.abs().max(self.x_max.abs());
        let mag_y = self.y_min.abs().max(self.y_max.abs());
        let representable =
            4.0 * f64::EPSILON * (mag_x / self.width() + mag_y / self.height() + 1.0);
        ASPECT_TOLERANCE.max(representable)
    }

    /// Validated pixel ↔ world mapper for a device of the given size.
    pub fn mapper(&self, device_width: u32, device_height: u32) -> crate::Result<CoordinateMapper> {
        CoordinateMapper::new(*self, device_width, device_height)
    }
}

/// Pixel ↔ complex-plane transforms for one viewport and device size.
///
/// Construction checks the preconditions once, so the per-pixel methods
/// cannot fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    viewport: Viewport,
    width: u32,
    height: u32,
    step_x: f64,
    step_y: f64,
}

impl CoordinateMapper {
    pub fn new(viewport: Viewport, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::DegenerateViewport {
                reason: format!("device size must be > 0, got {width}×{height}"),
            });
        }
        viewport.validate()?;
        Ok(Self {
            viewport,
            width,
            height,
            step_x: viewport.width() / width as f64,
            step_y: viewport.height() / height as f64,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn device_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map the centre of pixel `(px, py)` to the complex plane.
    ///
    /// `(0, 0)` is the top-left pixel; world y grows upward, so the y-axis
    /// is flipped.
    #[inline]
    pub fn pixel_to_complex(&self, px: f64, py: f64) -> Complex {
        Complex::new(
            self.viewport.x_min + (px + 0.5) * self.step_x,
            self.viewport.y_max - (py + 0.5) * self.step_y,
        )
    }

    /// Map a world point to the nearest pixel (may lie outside the device).
    pub fn complex_to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        (self.world_to_pixel_x(x), self.world_to_pixel_y(y))
    }

    #[inline]
    pub fn world_to_pixel_x(&self, x: f64) -> i64 {
        ((x - self.viewport.x_min) / self.viewport.width() * self.width as f64).round() as i64
    }

    #[inline]
    pub fn world_to_pixel_y(&self, y: f64) -> i64 {
        ((self.viewport.y_max - y) / self.viewport.height() * self.height as f64).round() as i64
    }

    /// World-space size of a single pixel.
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.step_x, self.step_y)
    }
}
