//! PNG export with embedded metadata (tEXt chunks).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use escapeview_core::{EscapeKernel, RenderParameters, Viewport};

use crate::buffer::PixelBuffer;

/// Describes how a frame was produced; written into the PNG as text.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub viewport: Viewport,
    pub kernel: EscapeKernel,
    pub params: RenderParameters,
    /// Rendering mode label, e.g. `"escape-time"`.
    pub mode: String,
}

/// Write a pixel buffer as an RGBA PNG with embedded view metadata.
///
/// Uses the `png` crate directly to inject custom tEXt chunks.
pub fn export_png(
    buffer: &PixelBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let writer = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "EscapeView".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.to_rgba())?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        "Exported PNG to {}",
        path.display()
    );
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    let vp = &meta.viewport;
    let mut desc = format!(
        "{} ({}) - Region: [{:.6}, {:.6}] x [{:.6}, {:.6}], Iterations: {}",
        meta.kernel.label(),
        meta.mode,
        vp.x_min,
        vp.x_max,
        vp.y_min,
        vp.y_max,
        meta.params.max_iterations,
    );
    if let EscapeKernel::Julia { c } = meta.kernel {
        desc.push_str(&format!(", Julia c: {:.6} {:+.6}i", c.re, c.im));
    }
    desc
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    let vp = &meta.viewport;
    let mut pairs = vec![
        ("EscapeView.Kernel".into(), meta.kernel.label().to_string()),
        ("EscapeView.Mode".into(), meta.mode.clone()),
        ("EscapeView.XMin".into(), vp.x_min.to_string()),
        ("EscapeView.XMax".into(), vp.x_max.to_string()),
        ("EscapeView.YMin".into(), vp.y_min.to_string()),
        ("EscapeView.YMax".into(), vp.y_max.to_string()),
        ("EscapeView.MaxIterations".into(), meta.params.max_iterations.to_string()),
        ("EscapeView.EscapeRadius".into(), meta.params.escape_radius.to_string()),
    ];
    if let EscapeKernel::Julia { c } = meta.kernel {
        pairs.push(("EscapeView.JuliaC_Re".into(), c.re.to_string()));
        pairs.push(("EscapeView.JuliaC_Im".into(), c.im.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use escapeview_core::Complex;
    use std::io::Read;

    fn metadata(kernel: EscapeKernel) -> ExportMetadata {
        ExportMetadata {
            viewport: Viewport::MANDELBROT,
            kernel,
            params: RenderParameters::default(),
            mode: "escape-time".into(),
        }
    }

    #[test]
    fn export_creates_valid_png() {
        let buffer = PixelBuffer::filled(4, 4, 0xFF80_8080);
        let dir = std::env::temp_dir().join("escapeview_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &metadata(EscapeKernel::Mandelbrot))
            .expect("export should succeed");

        let mut file = File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = PixelBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("escapeview_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        let kernel = EscapeKernel::Julia {
            c: Complex::new(-0.7, 0.27015),
        };
        export_png(&buffer, &path, &metadata(kernel)).expect("export should succeed");

        let decoder = png::Decoder::new(File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts = &reader.info().uncompressed_latin1_text;
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "EscapeView"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "EscapeView.Kernel" && t.text == "Julia"));
        assert!(texts.iter().any(|t| t.keyword == "EscapeView.JuliaC_Re"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let buffer = PixelBuffer::new(2, 2);
        let path = std::env::temp_dir()
            .join("escapeview_no_such_dir")
            .join("nested")
            .join("out.png");
        let err = export_png(&buffer, &path, &metadata(EscapeKernel::Mandelbrot)).unwrap_err();
        assert!(matches!(err, crate::RenderError::Io(_)));
    }
}
