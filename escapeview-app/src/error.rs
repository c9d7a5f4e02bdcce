use thiserror::Error;

/// Errors surfaced by the headless driver.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] escapeview_core::CoreError),

    #[error(transparent)]
    Render(#[from] escapeview_render::RenderError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed event script: {0}")]
    Json(#[from] serde_json::Error),
}
