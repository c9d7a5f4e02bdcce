pub mod app_dir;
pub mod controller;
pub mod driver;
pub mod error;
pub mod events;
pub mod hud;
pub mod preferences;

pub use controller::ViewportController;
pub use error::AppError;
pub use events::{
    DragSelection, EventOutcome, Explorer, Frame, InputEvent, KeyCommand, WheelDirection,
};
pub use preferences::{Preferences, RenderMode};

/// Convenience result type for the app crate.
pub type Result<T> = std::result::Result<T, AppError>;
