//! Overlay draw primitives for an external 2D canvas.
//!
//! Nothing here touches pixels. The functions turn ticks, the drag
//! selection and HUD text into an ordered list of [`DrawCommand`]s that the
//! host executes on top of the fractal image.

use escapeview_core::{AxisTicks, CoordinateMapper};

/// Fill or outline for rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RectStyle {
    Fill,
    Stroke { width: f32 },
}

/// A single primitive. Coordinates are device pixels, colours are ARGB.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: (i64, i64),
        to: (i64, i64),
        color: u32,
        width: f32,
    },
    Rect {
        rect: PixelRect,
        color: u32,
        style: RectStyle,
    },
    Text {
        x: i64,
        y: i64,
        text: String,
        color: u32,
        size: f32,
    },
}

/// Axis-aligned pixel rectangle with non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    /// Normalise two arbitrary corners into a rectangle.
    pub fn from_corners(a: (i64, i64), b: (i64, i64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }
}

/// Colours and metrics of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub grid_color: u32,
    pub grid_width: f32,
    pub axis_color: u32,
    pub axis_width: f32,
    pub label_color: u32,
    pub label_size: f32,
    pub tick_length: i64,
    pub selection_stroke: u32,
    pub selection_fill: u32,
    pub hud_background: u32,
    pub hud_text: u32,
    pub hud_margin: i64,
    pub hud_width: i64,
    pub hud_line_height: i64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            grid_color: 0x23FF_FFFF,
            grid_width: 1.0,
            axis_color: 0xC8FF_FFFF,
            axis_width: 1.6,
            label_color: 0xDCFF_FFFF,
            label_size: 11.0,
            tick_length: 5,
            selection_stroke: 0xA0FF_FFFF,
            selection_fill: 0x28FF_FFFF,
            hud_background: 0xA000_0000,
            hud_text: 0xFFFF_FFFF,
            hud_margin: 10,
            hud_width: 420,
            hud_line_height: 18,
        }
    }
}

impl OverlayStyle {
    /// Grid lines, axes through the origin, tick marks and labels.
    ///
    /// Axes are drawn only when zero is inside the viewport; otherwise the
    /// tick marks sit on the bottom (x) or left (y) edge.
    pub fn axes(&self, ticks: &AxisTicks, mapper: &CoordinateMapper) -> Vec<DrawCommand> {
        let (w, h) = mapper.device_size();
        let (w, h) = (w as i64, h as i64);
        let vp = mapper.viewport();
        let mut out = Vec::with_capacity(3 * (ticks.x.len() + ticks.y.len()) + 2);

        for tick in &ticks.x {
            out.push(self.line((tick.pixel, 0), (tick.pixel, h), self.grid_color, self.grid_width));
        }
        for tick in &ticks.y {
            out.push(self.line((0, tick.pixel), (w, tick.pixel), self.grid_color, self.grid_width));
        }

        let x_axis_row = (vp.y_min <= 0.0 && 0.0 <= vp.y_max).then(|| mapper.world_to_pixel_y(0.0));
        let y_axis_col = (vp.x_min <= 0.0 && 0.0 <= vp.x_max).then(|| mapper.world_to_pixel_x(0.0));
        if let Some(row) = x_axis_row {
            out.push(self.line((0, row), (w, row), self.axis_color, self.axis_width));
        }
        if let Some(col) = y_axis_col {
            out.push(self.line((col, 0), (col, h), self.axis_color, self.axis_width));
        }

        let t = self.tick_length;
        let base_row = x_axis_row.unwrap_or(h - 1);
        for tick in &ticks.x {
            out.push(self.line(
                (tick.pixel, base_row - t),
                (tick.pixel, base_row + t),
                self.label_color,
                self.grid_width,
            ));
            out.push(self.text(tick.pixel + 3, (base_row + 16).min(h - 2), &tick.label));
        }
        let base_col = y_axis_col.unwrap_or(0);
        for tick in &ticks.y {
            out.push(self.line(
                (base_col - t, tick.pixel),
                (base_col + t, tick.pixel),
                self.label_color,
                self.grid_width,
            ));
            out.push(self.text((base_col + 8).min(w - 40), tick.pixel - 2, &tick.label));
        }
        out
    }

    /// Outlined, translucent rectangle between two drag corners.
    pub fn selection(&self, rect: PixelRect) -> Vec<DrawCommand> {
        vec![
            DrawCommand::Rect {
                rect,
                color: self.selection_stroke,
                style: RectStyle::Stroke { width: 2.0 },
            },
            DrawCommand::Rect {
                rect,
                color: self.selection_fill,
                style: RectStyle::Fill,
            },
        ]
    }

    /// Dark panel in the top-left corner with one text line per entry.
    pub fn hud(&self, lines: &[String]) -> Vec<DrawCommand> {
        let m = self.hud_margin;
        let lh = self.hud_line_height;
        let mut out = vec![DrawCommand::Rect {
            rect: PixelRect {
                x: m,
                y: m,
                width: self.hud_width,
                height: lh * (lines.len() as i64 + 1),
            },
            color: self.hud_background,
            style: RectStyle::Fill,
        }];
        out.extend(lines.iter().enumerate().map(|(i, line)| DrawCommand::Text {
            x: m + 10,
            y: m + lh * (i as i64 + 1),
            text: line.clone(),
            color: self.hud_text,
            size: self.label_size + 1.0,
        }));
        out
    }

    fn line(&self, from: (i64, i64), to: (i64, i64), color: u32, width: f32) -> DrawCommand {
        DrawCommand::Line {
            from,
            to,
            color,
            width,
        }
    }

    fn text(&self, x: i64, y: i64, label: &str) -> DrawCommand {
        DrawCommand::Text {
            x,
            y,
            text: label.to_owned(),
            color: self.label_color,
            size: self.label_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapeview_core::{TickPlanner, TickStrategy, Viewport};

    fn count_lines(cmds: &[DrawCommand], color: u32) -> usize {
        cmds.iter()
            .filter(|c| matches!(c, DrawCommand::Line { color: col, .. } if *col == color))
            .count()
    }

    #[test]
    fn corners_normalise() {
        let r = PixelRect::from_corners((50, 10), (20, 40));
        assert_eq!(r, PixelRect { x: 20, y: 10, width: 30, height: 30 });
    }

    #[test]
    fn axes_through_visible_origin() {
        let vp = Viewport::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        let mapper = vp.mapper(200, 200).unwrap();
        let ticks = TickPlanner::new(TickStrategy::Fixed { step: 0.5 }).plan(&vp, 200, 200);
        let style = OverlayStyle::default();
        let cmds = style.axes(&ticks, &mapper);

        assert_eq!(count_lines(&cmds, style.axis_color), 2);
        assert_eq!(count_lines(&cmds, style.grid_color), ticks.x.len() + ticks.y.len());
        let labels = cmds.iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count();
        assert_eq!(labels, ticks.x.len() + ticks.y.len());

        // The x-axis sits on the middle row.
        assert!(cmds.contains(&DrawCommand::Line {
            from: (0, 100),
            to: (200, 100),
            color: style.axis_color,
            width: style.axis_width,
        }));
    }

    #[test]
    fn ticks_move_to_edges_without_axes() {
        let vp = Viewport::new(1.0, 2.0, 1.0, 2.0).unwrap();
        let mapper = vp.mapper(100, 100).unwrap();
        let ticks = TickPlanner::default().plan(&vp, 100, 100);
        let style = OverlayStyle::default();
        let cmds = style.axes(&ticks, &mapper);

        assert_eq!(count_lines(&cmds, style.axis_color), 0);
        let first_x = &ticks.x[0];
        assert!(cmds.contains(&DrawCommand::Line {
            from: (first_x.pixel, 99 - style.tick_length),
            to: (first_x.pixel, 99 + style.tick_length),
            color: style.label_color,
            width: style.grid_width,
        }));
    }

    #[test]
    fn selection_is_stroke_then_fill() {
        let rect = PixelRect::from_corners((0, 0), (30, 20));
        let cmds = OverlayStyle::default().selection(rect);
        assert!(matches!(cmds[0], DrawCommand::Rect { style: RectStyle::Stroke { .. }, .. }));
        assert!(matches!(cmds[1], DrawCommand::Rect { style: RectStyle::Fill, .. }));
    }

    #[test]
    fn hud_panel_grows_with_lines() {
        let style = OverlayStyle::default();
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let cmds = style.hud(&lines);
        assert_eq!(cmds.len(), 4);
        match &cmds[0] {
            DrawCommand::Rect { rect, .. } => assert_eq!(rect.height, 72),
            other => panic!("expected background rect, got {other:?}"),
        }
        match &cmds[3] {
            DrawCommand::Text { text, y, .. } => {
                assert_eq!(text, "c");
                assert_eq!(*y, 10 + 54);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
