use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use escapeview_core::{
    EscapeKernel, InverseIteration, RenderParameters, TickPlanner, TickStrategy, Viewport,
};

use crate::controller::DEFAULT_HISTORY_LIMIT;

// ---------------------------------------------------------------------------
// Render mode
// ---------------------------------------------------------------------------

/// What the headless driver draws for the final frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    #[default]
    EscapeTime,
    /// Julia set points from backward iteration, plotted on white.
    InverseIteration,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::EscapeTime => "escape-time",
            Self::InverseIteration => "inverse-iteration",
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Home region. When absent the kernel's standard framing is used.
    #[serde(default)]
    pub region: Option<Viewport>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_escape_radius")]
    pub escape_radius: f64,
    #[serde(default)]
    pub kernel: EscapeKernel,
    #[serde(default)]
    pub ticks: TickStrategy,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    /// Oldest viewports are dropped once the undo history reaches this size.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub inverse: InverseIteration,
}

fn default_width() -> u32 {
    960
}
fn default_height() -> u32 {
    540
}
fn default_max_iterations() -> u32 {
    RenderParameters::DEFAULT_MAX_ITERATIONS
}
fn default_escape_radius() -> f64 {
    RenderParameters::DEFAULT_ESCAPE_RADIUS
}
fn default_max_ticks() -> usize {
    TickPlanner::DEFAULT_MAX_TICKS
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            region: None,
            max_iterations: default_max_iterations(),
            escape_radius: default_escape_radius(),
            kernel: EscapeKernel::default(),
            ticks: TickStrategy::default(),
            max_ticks: default_max_ticks(),
            history_limit: default_history_limit(),
            render_mode: RenderMode::default(),
            inverse: InverseIteration::default(),
        }
    }
}

impl Preferences {
    /// Load preferences from `path`, falling back to defaults.
    ///
    /// A missing file is normal; unreadable or malformed files are logged
    /// and ignored.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    prefs
                }
                Err(e) => {
                    error!("Failed to parse preferences: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read preferences file: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut prefs: Self = serde_json::from_str(json)?;
        prefs.sanitize();
        Ok(prefs)
    }

    /// Replace out-of-range values with their defaults.
    fn sanitize(&mut self) {
        if self.width == 0 || self.height == 0 {
            warn!(width = self.width, height = self.height, "Ignoring empty device size");
            self.width = default_width();
            self.height = default_height();
        }
        if let Some(region) = self.region {
            if !region.is_valid() {
                warn!(?region, "Ignoring degenerate region");
                self.region = None;
            }
        }
        if self.escape_radius <= 0.0 || !self.escape_radius.is_finite() {
            warn!(escape_radius = self.escape_radius, "Ignoring invalid escape radius");
            self.escape_radius = default_escape_radius();
        }
        self.max_iterations = self.max_iterations.clamp(
            RenderParameters::MIN_ITERATIONS,
            RenderParameters::MAX_ITERATIONS,
        );
        if self.history_limit == 0 {
            self.history_limit = default_history_limit();
        }
    }

    /// Home viewport before aspect correction.
    pub fn home_region(&self) -> Viewport {
        self.region.unwrap_or(match self.kernel {
            EscapeKernel::Mandelbrot => Viewport::MANDELBROT,
            EscapeKernel::Julia { .. } => Viewport::JULIA,
        })
    }

    pub fn render_parameters(&self) -> escapeview_core::Result<RenderParameters> {
        RenderParameters::new(self.max_iterations, self.escape_radius)
    }

    pub fn tick_planner(&self) -> TickPlanner {
        TickPlanner::new(self.ticks).with_max_ticks(self.max_ticks)
    }
}
