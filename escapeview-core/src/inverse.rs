//! Julia set points by inverse iteration.
//!
//! Starting from the repelling fixed point of `z² + c`, each point has two
//! preimages `±√(z − c)`. Walking that binary tree lands on the Julia set.
//! Branches are cut off once the accumulated derivative `∏|2z|` exceeds a
//! bound, which keeps the walk from over-sampling the densest regions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;

/// Root of `z² − z + c = 0` that repels under `z ← z² + c` (`|2z| > 1`).
///
/// `z = (1 ± √(1 − 4c)) / 2`. When both or neither root repels the `+`
/// root is returned.
pub fn repelling_fixed_point(c: Complex) -> Complex {
    let disc = Complex::new(1.0 - 4.0 * c.re, -4.0 * c.im).sqrt();
    let plus = Complex::new((1.0 + disc.re) / 2.0, disc.im / 2.0);
    let minus = Complex::new((1.0 - disc.re) / 2.0, -disc.im / 2.0);
    let plus_repels = 2.0 * plus.norm() > 1.0;
    let minus_repels = 2.0 * minus.norm() > 1.0;
    if minus_repels && !plus_repels {
        minus
    } else {
        plus
    }
}

/// Settings for the inverse-iteration walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseIteration {
    pub c: Complex,
    /// Tree depth; the walk emits at most `2^max_depth − 1` points.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Branches whose accumulated derivative exceeds this are pruned.
    #[serde(default = "default_derivative_cutoff")]
    pub derivative_cutoff: f64,
}

fn default_max_depth() -> u32 {
    InverseIteration::DEFAULT_MAX_DEPTH
}

fn default_derivative_cutoff() -> f64 {
    InverseIteration::DEFAULT_DERIVATIVE_CUTOFF
}

impl Default for InverseIteration {
    fn default() -> Self {
        Self::new(Complex::new(-0.39054087021840056, -0.5867879073469685))
    }
}

impl InverseIteration {
    pub const DEFAULT_MAX_DEPTH: u32 = 18;
    pub const DEFAULT_DERIVATIVE_CUTOFF: f64 = 1e10;
    /// Depth limit that keeps the output below ~16 M points.
    pub const DEPTH_LIMIT: u32 = 24;

    pub fn new(c: Complex) -> Self {
        Self {
            c,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            derivative_cutoff: Self::DEFAULT_DERIVATIVE_CUTOFF,
        }
    }

    /// Walk the preimage tree and collect the visited points.
    ///
    /// Uses an explicit stack; depth-first order matches a recursive walk
    /// that visits the `+` branch before the `−` branch.
    pub fn points(&self) -> Vec<Complex> {
        let max_depth = self.max_depth.min(Self::DEPTH_LIMIT);
        let mut out = Vec::new();
        let mut stack = vec![(repelling_fixed_point(self.c), 1.0_f64, 0_u32)];

        while let Some((z, derivative, depth)) = stack.pop() {
            if depth >= max_depth || derivative > self.derivative_cutoff {
                continue;
            }
            let derivative = derivative * 2.0 * z.norm();
            out.push(z);

            let root = (z - self.c).sqrt();
            // Pushed in reverse so `+root` is expanded first.
            stack.push((-root, derivative, depth + 1));
            stack.push((root, derivative, depth + 1));
        }
        debug!(points = out.len(), max_depth, "Inverse iteration walk finished");
        out
    }
}
