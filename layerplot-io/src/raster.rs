//! PNG export: the SVG document of a frame, rasterised with resvg.

use std::io;

use layerplot_renderer::RenderFrame;
use usvg::{TreeParsing, TreeTextToPath};

use crate::error::ExportError;
use crate::svg::SvgWriter;

pub struct PngWriter<W: io::Write> {
    writer: W,
}

impl<W: io::Write> PngWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Rasterise the frame at the figure's pixel size and write it as PNG.
    pub fn write(&mut self, frame: &RenderFrame) -> Result<(), ExportError> {
        let png = rasterise(frame)?;
        self.writer.write_all(&png)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn rasterise(frame: &RenderFrame) -> Result<Vec<u8>, ExportError> {
    let mut document = Vec::new();
    SvgWriter::new(&mut document).write(frame)?;

    let mut options = usvg::Options::default();
    options.dpi = frame.dpi as f32;
    let mut tree = usvg::Tree::from_data(&document, &options)
        .map_err(|e| ExportError::Raster(e.to_string()))?;

    // Without fonts the titles and legend text are left out of the image.
    let mut fonts = usvg::fontdb::Database::new();
    fonts.load_system_fonts();
    if fonts.len() == 0 {
        log::warn!("No system fonts found; text is omitted from the PNG");
    }
    tree.convert_text(&fonts);

    let width = frame.width_px.round().max(1.0) as u32;
    let height = frame.height_px.round().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Raster(format!("cannot allocate a {}x{} canvas", width, height)))?;
    resvg::Tree::from_usvg(&tree).render(tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Raster(e.to_string()))
}
