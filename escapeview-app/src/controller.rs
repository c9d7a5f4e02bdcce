//! Viewport navigation state machine.
//!
//! Every operation either replaces the viewport (or parameters) wholesale
//! and invalidates the render cache, or leaves all state untouched and
//! returns `false`.

use tracing::debug;

use escapeview_core::{Complex, CoordinateMapper, EscapeKernel, RenderParameters, Viewport};
use escapeview_render::{PixelBuffer, RenderCache, RenderStats};

/// Default number of prior viewports kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;
/// Multiplier applied per iteration step (divisor when decreasing).
pub const ITERATION_STEP: f64 = 1.25;
/// Wheel zoom scale per notch towards the pointer.
pub const WHEEL_ZOOM_IN: f64 = 0.8;
/// Wheel zoom scale per notch away from the pointer.
pub const WHEEL_ZOOM_OUT: f64 = 1.25;
/// Box selections narrower or shorter than this (pixels) are ignored.
pub const MIN_BOX_SIDE: f64 = 10.0;

#[derive(Debug)]
pub struct ViewportController {
    viewport: Viewport,
    params: RenderParameters,
    kernel: EscapeKernel,
    history: Vec<Viewport>,
    history_limit: usize,
    width: u32,
    height: u32,
    home: Viewport,
    default_max_iterations: u32,
    cache: RenderCache,
}

impl ViewportController {
    /// Start at `home` (aspect-corrected for the device) with `params`.
    ///
    /// `params.max_iterations` doubles as the value restored by
    /// [`reset`](Self::reset).
    pub fn new(
        home: Viewport,
        params: RenderParameters,
        kernel: EscapeKernel,
        width: u32,
        height: u32,
    ) -> escapeview_core::Result<Self> {
        // Re-validate; a deserialised viewport bypasses `Viewport::new`.
        let home = Viewport::new(home.x_min, home.x_max, home.y_min, home.y_max)?;
        Ok(Self {
            viewport: home.adjust_aspect(width, height),
            params,
            kernel,
            history: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            width,
            height,
            home,
            default_max_iterations: params.max_iterations,
            cache: RenderCache::new(),
        })
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn kernel(&self) -> &EscapeKernel {
        &self.kernel
    }

    pub fn device_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Mapper for the current state, or `None` while the device has no area.
    pub fn mapper(&self) -> Option<CoordinateMapper> {
        self.viewport.mapper(self.width, self.height).ok()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.cache.stats()
    }

    pub fn needs_render(&self) -> bool {
        self.cache.is_dirty()
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Zoom so the world point under `(px, py)` becomes the centre and the
    /// span is multiplied by `scale` (`< 1` zooms in). Not recorded in history.
    pub fn zoom_at(&mut self, px: f64, py: f64, scale: f64) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            debug!(scale, "Rejected zoom: invalid scale");
            return false;
        }
        let Some(center) = self.world_at(px, py) else {
            return false;
        };
        let candidate = self.viewport.scaled_about(center, scale);
        self.apply(candidate, false, "zoom")
    }

    /// Move the centre to the world point under `(px, py)`, keeping the span.
    pub fn recenter_at(&mut self, px: f64, py: f64) -> bool {
        let Some(center) = self.world_at(px, py) else {
            return false;
        };
        let candidate = self.viewport.recentered(center);
        self.apply(candidate, true, "recenter")
    }

    /// Zoom into the pixel box spanned by corners `a` and `b`.
    ///
    /// Corners are clamped to the device, the box is grown (never cropped)
    /// to the device aspect ratio around its centre, and the result is
    /// aspect-corrected once more after mapping.
    pub fn box_zoom(&mut self, a: (f64, f64), b: (f64, f64)) -> bool {
        let Some(mapper) = self.mapper() else {
            debug!("Rejected box zoom: no device area");
            return false;
        };
        if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
            debug!(?a, ?b, "Rejected box zoom: non-finite corner");
            return false;
        }
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let (ax, bx) = (a.0.clamp(0.0, max_x), b.0.clamp(0.0, max_x));
        let (ay, by) = (a.1.clamp(0.0, max_y), b.1.clamp(0.0, max_y));
        let (x1, x2) = (ax.min(bx), ax.max(bx));
        let (y1, y2) = (ay.min(by), ay.max(by));
        let (mut box_w, mut box_h) = (x2 - x1, y2 - y1);
        if box_w < MIN_BOX_SIDE || box_h < MIN_BOX_SIDE {
            debug!(box_w, box_h, "Rejected box zoom: selection too small");
            return false;
        }

        let device_aspect = self.width as f64 / self.height as f64;
        if box_w / box_h < device_aspect {
            box_w = box_h * device_aspect;
        } else {
            box_h = box_w / device_aspect;
        }
        let (cx, cy) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let lower_left = mapper.pixel_to_complex(cx - box_w / 2.0, cy + box_h / 2.0);
        let upper_right = mapper.pixel_to_complex(cx + box_w / 2.0, cy - box_h / 2.0);

        let mapped = Viewport::new(lower_left.re, upper_right.re, lower_left.im, upper_right.im);
        let candidate = match mapped {
            Ok(vp) => vp.adjust_aspect(self.width, self.height),
            Err(e) => {
                debug!("Rejected box zoom: {e}");
                return false;
            }
        };
        self.apply(candidate, true, "box zoom")
    }

    /// Restore the most recent prior viewport. `false` when history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.viewport = previous;
                self.cache.invalidate();
                debug!(remaining = self.history.len(), "Undo");
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    /// Home viewport, default iteration count, empty history.
    pub fn reset(&mut self) {
        self.viewport = self.home.adjust_aspect(self.width, self.height);
        self.params = self.params.with_max_iterations(self.default_max_iterations);
        self.history.clear();
        self.cache.invalidate();
        debug!("Reset view");
    }

    /// Scale `max_iterations` by `factor`, rounded and clamped to the
    /// supported range. `false` if the value would not change.
    pub fn adjust_iterations(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            debug!(factor, "Rejected iteration change: invalid factor");
            return false;
        }
        let scaled = (self.params.max_iterations as f64 * factor).round();
        let clamped = scaled.clamp(
            RenderParameters::MIN_ITERATIONS as f64,
            RenderParameters::MAX_ITERATIONS as f64,
        ) as u32;
        if clamped == self.params.max_iterations {
            debug!(max_iterations = clamped, "Iteration count already at limit");
            return false;
        }
        self.params = self.params.with_max_iterations(clamped);
        self.cache.invalidate();
        debug!(max_iterations = clamped, "Iterations changed");
        true
    }

    pub fn increase_iterations(&mut self) -> bool {
        self.adjust_iterations(ITERATION_STEP)
    }

    pub fn decrease_iterations(&mut self) -> bool {
        self.adjust_iterations(1.0 / ITERATION_STEP)
    }

    /// Adopt a new device size and re-fit the viewport to it.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignored resize to empty device");
            return false;
        }
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.viewport = self.viewport.adjust_aspect(width, height);
        self.cache.invalidate();
        debug!(width, height, "Resized");
        true
    }

    /// Current frame, re-rendered if anything changed since the last call.
    pub fn render(&mut self) -> escapeview_render::Result<&PixelBuffer> {
        self.cache.ensure_rendered(
            &self.viewport,
            &self.kernel,
            &self.params,
            self.width,
            self.height,
        )
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn world_at(&self, px: f64, py: f64) -> Option<Complex> {
        if !(px.is_finite() && py.is_finite()) {
            debug!(px, py, "Rejected gesture: non-finite position");
            return None;
        }
        let Some(mapper) = self.mapper() else {
            debug!("Rejected gesture: no device area");
            return None;
        };
        Some(mapper.pixel_to_complex(px, py))
    }

    fn apply(&mut self, candidate: Viewport, record: bool, action: &str) -> bool {
        if !candidate.is_resolvable(self.width, self.height) {
            debug!(?candidate, "Rejected {action}: span not resolvable");
            return false;
        }
        if record {
            self.push_history();
        }
        self.viewport = candidate;
        self.cache.invalidate();
        debug!(viewport = ?self.viewport, "Applied {action}");
        true
    }

    fn push_history(&mut self) {
        self.history.push(self.viewport);
        if self.history.len() > self.history_limit {
            self.history.remove(0);
        }
    }
}
