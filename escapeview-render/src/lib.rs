pub mod buffer;
pub mod cache;
pub mod error;
pub mod export;
pub mod inverse;
pub mod overlay;

pub use buffer::PixelBuffer;
pub use cache::{RenderCache, RenderStats};
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use inverse::plot_points;
pub use overlay::{DrawCommand, OverlayStyle, PixelRect, RectStyle};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
