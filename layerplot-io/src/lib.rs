//! # layerplot I/O
//!
//! Writes a composed surface to disk. The format follows the file
//! extension: `.json` stores the render frame (figure, axes decorations and
//! the full display list), `.svg` paints it as a vector image and `.png`
//! rasterises that image.

pub mod error;
pub mod export;
pub mod raster;
pub mod svg;

pub use error::ExportError;
pub use export::{export, ExportFormat};
pub use raster::PngWriter;
pub use self::svg::SvgWriter;
