use tracing::debug;

use escapeview_core::{Complex, Viewport};

use crate::buffer::PixelBuffer;

const BACKGROUND: u32 = 0xFFFF_FFFF;
const POINT_COLOR: u32 = 0xFF00_0000;

/// Plot inverse-iteration points as black dots on a white frame.
///
/// Points outside the viewport are dropped.
pub fn plot_points(
    points: &[Complex],
    viewport: &Viewport,
    width: u32,
    height: u32,
) -> crate::Result<PixelBuffer> {
    let mapper = viewport.mapper(width, height)?;
    let mut buffer = PixelBuffer::filled(width, height, BACKGROUND);
    for p in points {
        let (px, py) = mapper.complex_to_pixel(p.re, p.im);
        buffer.set(px, py, POINT_COLOR);
    }
    debug!(points = points.len(), width, height, "Plotted inverse-iteration points");
    Ok(buffer)
}
