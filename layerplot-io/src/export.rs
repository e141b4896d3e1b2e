use std::fmt;
use std::fs;
use std::path::Path;

use layerplot_renderer::{Axes, Figure, RenderFrame};

use crate::error::ExportError;
use crate::raster::PngWriter;
use crate::svg::SvgWriter;

/// File formats a surface can be exported to, chosen by path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed [`RenderFrame`].
    Json,
    Svg,
    /// The SVG rendering rasterised at the figure's pixel size.
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Svg, ExportFormat::Png];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }

    /// Pick the format from the path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        extension
            .as_deref()
            .and_then(|ext| Self::ALL.into_iter().find(|f| f.extension() == ext))
            .ok_or_else(|| ExportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
    }

    /// Encode a frame in this format.
    pub fn encode(&self, frame: &RenderFrame) -> Result<Vec<u8>, ExportError> {
        let mut buf = Vec::new();
        match self {
            ExportFormat::Json => serde_json::to_writer_pretty(&mut buf, frame)?,
            ExportFormat::Svg => SvgWriter::new(&mut buf).write(frame)?,
            ExportFormat::Png => PngWriter::new(&mut buf).write(frame)?,
        }
        Ok(buf)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Export the surface to `path` in the format its extension names.
///
/// The document is encoded in memory first, so an unsupported format never
/// creates or truncates the target file.
pub fn export(figure: &Figure, axes: &Axes, path: impl AsRef<Path>) -> Result<ExportFormat, ExportError> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    let bytes = format.encode(&RenderFrame::capture(figure, axes))?;

    fs::write(path, &bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "Exported figure {} as {} to {} ({} bytes)",
        figure.id,
        format,
        path.display(),
        bytes.len()
    );
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerplot_core::Style;
    use layerplot_renderer::{subplots, FigureConfig};
    use tempfile::TempDir;

    fn sample_surface() -> (Figure, Axes) {
        let (fig, mut axes) = subplots(&FigureConfig::default());
        axes.plot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &Style::new().with("color", "blue"))
            .unwrap();
        axes.bar(&[1.0, 2.0, 3.0], &[5.0, 6.0, 7.0], &Style::new()).unwrap();
        (fig, axes)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.svg")).unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_path(Path::new("a/b/OUT.JSON")).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("plot.PNG")).unwrap(), ExportFormat::Png);
    }

    #[test]
    fn test_unsupported_extension() {
        match ExportFormat::from_path(Path::new("plot.xyz")) {
            Err(ExportError::UnsupportedFormat { extension, .. }) => {
                assert_eq!(extension.as_deref(), Some("xyz"))
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            ExportFormat::from_path(Path::new("plot")),
            Err(ExportError::UnsupportedFormat { extension: None, .. })
        ));
    }

    #[test]
    fn test_export_json_roundtrips_frame() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.json");
        let (fig, axes) = sample_surface();

        assert_eq!(export(&fig, &axes, &path).unwrap(), ExportFormat::Json);

        let frame: RenderFrame = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(frame.figure_id, fig.id);
        assert_eq!(frame.axes_id, axes.id);
        assert_eq!(frame.commands, axes.commands());
    }

    #[test]
    fn test_export_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.svg");
        let (fig, axes) = sample_surface();

        export(&fig, &axes, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("#0000ff"));
    }

    #[test]
    fn test_export_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.png");
        let (fig, axes) = sample_surface();

        assert_eq!(export(&fig, &axes, &path).unwrap(), ExportFormat::Png);
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.bmp");
        let (fig, axes) = sample_surface();

        assert!(export(&fig, &axes, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/plot.svg");
        let (fig, axes) = sample_surface();

        match export(&fig, &axes, &path) {
            Err(ExportError::Write { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
