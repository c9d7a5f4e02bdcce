//! Logical input events and the explorer session that consumes them.
//!
//! Raw pointer and keyboard capture happens elsewhere; this module only
//! sees already-decoded gestures in device pixel coordinates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use escapeview_core::{AxisTicks, CoreError, TickPlanner};
use escapeview_render::{DrawCommand, OverlayStyle, PixelBuffer, PixelRect};

use crate::controller::{ViewportController, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::hud;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDirection {
    pub fn zoom_scale(self) -> f64 {
        match self {
            Self::In => WHEEL_ZOOM_IN,
            Self::Out => WHEEL_ZOOM_OUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    IncreaseIterations,
    DecreaseIterations,
    Reset,
    Undo,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    Wheel {
        x: f64,
        y: f64,
        direction: WheelDirection,
    },
    DragStart { x: f64, y: f64 },
    DragUpdate { x: f64, y: f64 },
    DragEnd { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Resize { width: u32, height: u32 },
    Key { command: KeyCommand },
}

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The viewport changed; the next frame re-renders.
    ViewChanged,
    /// Render parameters changed; the next frame re-renders.
    ParametersChanged,
    /// Only the overlay (cursor, selection) changed.
    OverlayChanged,
    NothingToUndo,
    Ignored,
}

/// Rubber-band rectangle of an in-progress drag, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSelection {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl DragSelection {
    pub fn rect(&self) -> PixelRect {
        let round = |(x, y): (f64, f64)| (x.round() as i64, y.round() as i64);
        PixelRect::from_corners(round(self.start), round(self.end))
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything needed to paint one frame.
#[derive(Debug)]
pub struct Frame<'a> {
    pub pixels: &'a PixelBuffer,
    pub ticks: AxisTicks,
    pub selection: Option<PixelRect>,
    pub hud: Vec<String>,
    /// Axes, then selection, then HUD; paint in order.
    pub overlay: Vec<DrawCommand>,
}

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// One interactive session: navigation state plus transient pointer state.
#[derive(Debug)]
pub struct Explorer {
    controller: ViewportController,
    planner: TickPlanner,
    style: OverlayStyle,
    drag: Option<DragSelection>,
    pointer: Option<(f64, f64)>,
}

impl Explorer {
    pub fn new(controller: ViewportController, planner: TickPlanner) -> Self {
        Self {
            controller,
            planner,
            style: OverlayStyle::default(),
            drag: None,
            pointer: None,
        }
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }

    pub fn selection(&self) -> Option<DragSelection> {
        self.drag
    }

    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        let outcome = match event {
            InputEvent::Wheel { x, y, direction } => {
                self.track_pointer(x, y);
                view_changed(self.controller.zoom_at(x, y, direction.zoom_scale()))
            }
            InputEvent::DragStart { x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    EventOutcome::Ignored
                } else {
                    self.drag = Some(DragSelection {
                        start: (x, y),
                        end: (x, y),
                    });
                    EventOutcome::OverlayChanged
                }
            }
            InputEvent::DragUpdate { x, y } => match self.drag.as_mut() {
                Some(drag) if x.is_finite() && y.is_finite() => {
                    drag.end = (x, y);
                    EventOutcome::OverlayChanged
                }
                _ => EventOutcome::Ignored,
            },
            InputEvent::DragEnd { x, y } => match self.drag.take() {
                Some(drag) => {
                    if self.controller.box_zoom(drag.start, (x, y)) {
                        EventOutcome::ViewChanged
                    } else {
                        EventOutcome::OverlayChanged
                    }
                }
                None => EventOutcome::Ignored,
            },
            InputEvent::DoubleClick { x, y } => view_changed(self.controller.recenter_at(x, y)),
            InputEvent::PointerMove { x, y } => {
                if self.track_pointer(x, y) {
                    EventOutcome::OverlayChanged
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::PointerLeave => {
                self.pointer = None;
                EventOutcome::OverlayChanged
            }
            InputEvent::Resize { width, height } => {
                view_changed(self.controller.resize(width, height))
            }
            InputEvent::Key { command } => self.handle_key(command),
        };
        debug!(?event, ?outcome, "Handled input event");
        outcome
    }

    fn handle_key(&mut self, command: KeyCommand) -> EventOutcome {
        match command {
            KeyCommand::IncreaseIterations => params_changed(self.controller.increase_iterations()),
            KeyCommand::DecreaseIterations => params_changed(self.controller.decrease_iterations()),
            KeyCommand::Reset => {
                self.controller.reset();
                EventOutcome::ViewChanged
            }
            KeyCommand::Undo => {
                if self.controller.undo() {
                    EventOutcome::ViewChanged
                } else {
                    EventOutcome::NothingToUndo
                }
            }
        }
    }

    fn track_pointer(&mut self, x: f64, y: f64) -> bool {
        if x.is_finite() && y.is_finite() {
            self.pointer = Some((x, y));
            true
        } else {
            false
        }
    }

    /// HUD lines for the current state.
    pub fn hud_lines(&self) -> Vec<String> {
        let cursor = self
            .pointer
            .zip(self.controller.mapper())
            .map(|((x, y), mapper)| mapper.pixel_to_complex(x, y));
        hud::readout(
            self.controller.viewport(),
            cursor,
            self.controller.params().max_iterations,
        )
    }

    /// Render (if needed) and assemble the next frame.
    ///
    /// Fails with an invalid-device-size error while the device has no
    /// area; callers skip the frame.
    pub fn frame(&mut self) -> escapeview_render::Result<Frame<'_>> {
        let (w, h) = self.controller.device_size();
        if w == 0 || h == 0 {
            return Err(CoreError::InvalidDeviceSize { width: w, height: h }.into());
        }
        let mapper = self.controller.viewport().mapper(w, h)?;
        let ticks = self.planner.plan(self.controller.viewport(), w, h);
        let selection = self.drag.map(|d| d.rect());
        let hud = self.hud_lines();

        let mut overlay = self.style.axes(&ticks, &mapper);
        if let Some(rect) = selection {
            overlay.extend(self.style.selection(rect));
        }
        overlay.extend(self.style.hud(&hud));

        let pixels = self.controller.render()?;
        Ok(Frame {
            pixels,
            ticks,
            selection,
            hud,
            overlay,
        })
    }
}

fn view_changed(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::ViewChanged
    } else {
        EventOutcome::Ignored
    }
}

fn params_changed(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::ParametersChanged
    } else {
        EventOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapeview_core::{EscapeKernel, RenderParameters, Viewport};

    fn explorer(w: u32, h: u32) -> Explorer {
        let controller = ViewportController::new(
            Viewport::MANDELBROT,
            RenderParameters::new(50, 2.0).unwrap(),
            EscapeKernel::Mandelbrot,
            w,
            h,
        )
        .unwrap();
        Explorer::new(controller, TickPlanner::default())
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                {"event": "wheel", "x": 10, "y": 20, "direction": "in"},
                {"event": "drag_start", "x": 1, "y": 2},
                {"event": "pointer_leave"},
                {"event": "resize", "width": 640, "height": 480},
                {"event": "key", "command": "increase_iterations"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            events[0],
            InputEvent::Wheel {
                x: 10.0,
                y: 20.0,
                direction: WheelDirection::In
            }
        );
        assert_eq!(events[2], InputEvent::PointerLeave);
        assert_eq!(
            events[4],
            InputEvent::Key {
                command: KeyCommand::IncreaseIterations
            }
        );
    }

    #[test]
    fn drag_lifecycle_zooms_and_clears_selection() {
        let mut ex = explorer(200, 100);
        assert_eq!(
            ex.handle(InputEvent::DragStart { x: 20.0, y: 20.0 }),
            EventOutcome::OverlayChanged
        );
        assert_eq!(
            ex.handle(InputEvent::DragUpdate { x: 80.0, y: 60.0 }),
            EventOutcome::OverlayChanged
        );
        assert_eq!(
            ex.selection().map(|d| d.rect()),
            Some(PixelRect { x: 20, y: 20, width: 60, height: 40 })
        );
        assert_eq!(ex.handle(InputEvent::DragEnd { x: 80.0, y: 60.0 }), EventOutcome::ViewChanged);
        assert!(ex.selection().is_none());
        assert_eq!(ex.controller().history_len(), 1);
    }

    #[test]
    fn tiny_drag_only_clears_overlay() {
        let mut ex = explorer(200, 100);
        ex.handle(InputEvent::DragStart { x: 20.0, y: 20.0 });
        assert_eq!(
            ex.handle(InputEvent::DragEnd { x: 25.0, y: 24.0 }),
            EventOutcome::OverlayChanged
        );
        assert_eq!(ex.controller().history_len(), 0);
        assert_eq!(ex.handle(InputEvent::DragEnd { x: 80.0, y: 60.0 }), EventOutcome::Ignored);
    }

    #[test]
    fn wheel_does_not_touch_history() {
        let mut ex = explorer(200, 100);
        let outcome = ex.handle(InputEvent::Wheel {
            x: 50.0,
            y: 50.0,
            direction: WheelDirection::In,
        });
        assert_eq!(outcome, EventOutcome::ViewChanged);
        assert_eq!(ex.controller().history_len(), 0);
        assert_eq!(
            ex.handle(InputEvent::Key { command: KeyCommand::Undo }),
            EventOutcome::NothingToUndo
        );
    }

    #[test]
    fn key_commands_map_to_outcomes() {
        let mut ex = explorer(200, 100);
        assert_eq!(
            ex.handle(InputEvent::Key { command: KeyCommand::IncreaseIterations }),
            EventOutcome::ParametersChanged
        );
        assert_eq!(ex.controller().params().max_iterations, 63);
        assert_eq!(
            ex.handle(InputEvent::Key { command: KeyCommand::Reset }),
            EventOutcome::ViewChanged
        );
        assert_eq!(ex.controller().params().max_iterations, 50);
    }

    #[test]
    fn non_finite_events_are_ignored() {
        let mut ex = explorer(200, 100);
        assert_eq!(
            ex.handle(InputEvent::DoubleClick { x: f64::NAN, y: 0.0 }),
            EventOutcome::Ignored
        );
        assert_eq!(
            ex.handle(InputEvent::PointerMove { x: 0.0, y: f64::INFINITY }),
            EventOutcome::Ignored
        );
        assert_eq!(ex.handle(InputEvent::DragStart { x: f64::NAN, y: 0.0 }), EventOutcome::Ignored);
        assert_eq!(ex.handle(InputEvent::Resize { width: 0, height: 0 }), EventOutcome::Ignored);
    }

    #[test]
    fn hud_tracks_pointer() {
        let mut ex = explorer(200, 100);
        assert_eq!(ex.hud_lines()[1], "Cursor: —");
        ex.handle(InputEvent::PointerMove { x: 100.0, y: 50.0 });
        assert!(ex.hud_lines()[1].starts_with("Cursor: ("));
        ex.handle(InputEvent::PointerLeave);
        assert_eq!(ex.hud_lines()[1], "Cursor: —");
    }

    #[test]
    fn frame_bundles_pixels_ticks_and_overlay() {
        let mut ex = explorer(120, 80);
        ex.handle(InputEvent::DragStart { x: 10.0, y: 10.0 });
        ex.handle(InputEvent::DragUpdate { x: 50.0, y: 40.0 });
        let frame = ex.frame().unwrap();
        assert_eq!(frame.pixels.pixels.len(), 120 * 80);
        assert!(!frame.ticks.x.is_empty());
        assert!(frame.selection.is_some());
        assert_eq!(frame.hud.len(), 3);
        let hud_texts = frame
            .overlay
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { text, .. } if text.starts_with("Region:")))
            .count();
        assert_eq!(hud_texts, 1);
    }
}
