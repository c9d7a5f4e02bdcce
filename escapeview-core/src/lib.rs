pub mod complex;
pub mod error;
pub mod escape;
pub mod inverse;
pub mod ticks;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{escape_color, Escape, EscapeKernel, RenderParameters, INTERIOR_COLOR};
pub use inverse::{repelling_fixed_point, InverseIteration};
pub use ticks::{AxisTicks, Tick, TickPlanner, TickSet, TickStrategy};
pub use viewport::{CoordinateMapper, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
