use std::path::PathBuf;

use tracing::info;

use escapeview_app::{app_dir, driver, AppError, Preferences};

const DEFAULT_OUTPUT: &str = "escapeview.png";

/// `escapeview [events.json] [output.png]`
fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting EscapeView");

    let mut args = std::env::args_os().skip(1);
    let events_path = args.next().map(PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    let prefs = Preferences::load(&app_dir::preferences_path());
    let mut explorer = driver::build_explorer(&prefs)?;

    if let Some(path) = events_path {
        let events = driver::load_events(&path)?;
        driver::replay(&mut explorer, &events);
    }

    driver::write_frame(&mut explorer, &prefs, &output)
}
