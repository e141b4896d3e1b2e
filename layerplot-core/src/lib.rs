//! # layerplot core
//!
//! Data model shared by every layerplot crate: layer descriptors with their
//! x/y series, open-ended style maps with override merging, colors and the
//! default color cycle, and the render order that decides stacking.

pub mod color;
pub mod geometry;
pub mod layer;
pub mod order;
pub mod style;

pub use color::{Color, ColorParseError};
pub use geometry::{BBox, Point};
pub use layer::{Layer, LayerError, LayerKind, LayerSpec, SeriesData};
pub use order::RenderOrder;
pub use style::{Style, StyleValue};
