//! Headless session: build an explorer from preferences, replay a script of
//! events and write the final frame to disk.

use std::fs;
use std::path::Path;

use tracing::info;

use escapeview_render::{export_png, plot_points, ExportMetadata};

use crate::controller::ViewportController;
use crate::error::AppError;
use crate::events::{EventOutcome, Explorer, InputEvent};
use crate::preferences::{Preferences, RenderMode};

pub fn build_explorer(prefs: &Preferences) -> crate::Result<Explorer> {
    let controller = ViewportController::new(
        prefs.home_region(),
        prefs.render_parameters()?,
        prefs.kernel,
        prefs.width,
        prefs.height,
    )?
    .with_history_limit(prefs.history_limit);
    Ok(Explorer::new(controller, prefs.tick_planner()))
}

/// Parse a JSON array of events.
pub fn load_events(path: &Path) -> crate::Result<Vec<InputEvent>> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// Feed every event to the explorer in order.
pub fn replay(explorer: &mut Explorer, events: &[InputEvent]) -> Vec<EventOutcome> {
    let outcomes: Vec<EventOutcome> = events.iter().map(|e| explorer.handle(*e)).collect();
    let applied = outcomes
        .iter()
        .filter(|o| !matches!(o, EventOutcome::Ignored | EventOutcome::NothingToUndo))
        .count();
    info!(events = events.len(), applied, "Replayed input events");
    outcomes
}

/// Render the explorer's current view in the configured mode and save it.
pub fn write_frame(
    explorer: &mut Explorer,
    prefs: &Preferences,
    output: &Path,
) -> crate::Result<()> {
    let controller = explorer.controller();
    let metadata = ExportMetadata {
        viewport: *controller.viewport(),
        kernel: *controller.kernel(),
        params: *controller.params(),
        mode: prefs.render_mode.label().to_string(),
    };

    match prefs.render_mode {
        RenderMode::EscapeTime => {
            let frame = explorer.frame()?;
            log_hud(&frame.hud);
            info!(
                x_ticks = frame.ticks.x.len(),
                y_ticks = frame.ticks.y.len(),
                x_step = frame.ticks.x_step,
                y_step = frame.ticks.y_step,
                overlay = frame.overlay.len(),
                "Frame assembled"
            );
            export_png(frame.pixels, output, &metadata)?;
        }
        RenderMode::InverseIteration => {
            log_hud(&explorer.hud_lines());
            let controller = explorer.controller();
            let (w, h) = controller.device_size();
            let points = prefs.inverse.points();
            let buffer = plot_points(&points, controller.viewport(), w, h)?;
            info!(points = points.len(), c = %prefs.inverse.c, "Inverse iteration complete");
            export_png(&buffer, output, &metadata)?;
        }
    }
    info!("Wrote {}", output.display());
    Ok(())
}

fn log_hud(lines: &[String]) {
    for line in lines {
        info!("{line}");
    }
}
