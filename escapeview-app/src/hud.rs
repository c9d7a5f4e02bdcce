//! Text readout drawn in the top-left HUD panel.

use escapeview_core::{Complex, Viewport};

pub fn region_line(vp: &Viewport) -> String {
    format!(
        "Region: [{:.6}, {:.6}] × [{:.6}, {:.6}]",
        vp.x_min, vp.x_max, vp.y_min, vp.y_max
    )
}

/// `Cursor: (x, y)`, or an em-dash placeholder when the pointer is outside.
pub fn cursor_line(cursor: Option<Complex>) -> String {
    match cursor {
        Some(c) => format!("Cursor: ({:.6}, {:.6})", c.re, c.im),
        None => "Cursor: —".to_string(),
    }
}

pub fn iterations_line(max_iterations: u32) -> String {
    format!("Iterations: {max_iterations}")
}

/// All HUD lines, top to bottom.
pub fn readout(vp: &Viewport, cursor: Option<Complex>, max_iterations: u32) -> Vec<String> {
    vec![
        region_line(vp),
        cursor_line(cursor),
        iterations_line(max_iterations),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_uses_six_decimals() {
        assert_eq!(
            region_line(&Viewport::MANDELBROT),
            "Region: [-2.500000, 1.000000] × [-1.250000, 1.250000]"
        );
    }

    #[test]
    fn cursor_placeholder_when_outside() {
        assert_eq!(cursor_line(None), "Cursor: —");
        assert_eq!(
            cursor_line(Some(Complex::new(-0.5, 0.25))),
            "Cursor: (-0.500000, 0.250000)"
        );
    }

    #[test]
    fn readout_order() {
        let lines = readout(&Viewport::JULIA, None, 1000);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Region:"));
        assert!(lines[1].starts_with("Cursor:"));
        assert_eq!(lines[2], "Iterations: 1000");
    }
}
