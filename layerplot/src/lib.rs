//! # layerplot
//!
//! Overlays line, scatter and bar layers onto one shared surface in a chosen
//! stacking order, then optionally presents and exports the result.
//!
//! ```no_run
//! use layerplot::{compose, ComposeOptions, Layer};
//!
//! let layers = vec![
//!     Layer::line(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]).with_option("color", "blue"),
//!     Layer::scatter(vec![1.0, 2.0, 3.0], vec![6.0, 5.0, 4.0]).with_option("color", "red"),
//!     Layer::bar(vec![1.0, 2.0, 3.0], vec![5.0, 6.0, 7.0]).with_option("color", "green"),
//! ];
//! let options = ComposeOptions::new().with_order(vec![2, 0, 1]).with_show(false);
//! let (_figure, mut axes) = compose(&layers, None, &options)?;
//! axes.set_title("Layered Plot Example");
//! # Ok::<(), layerplot::ComposeError>(())
//! ```

pub mod compose;
pub mod error;

pub use compose::{
    compose, draw_layers, layers_from_json, layers_from_specs, ComposeOptions, Compositor, Surface,
};
pub use error::ComposeError;

pub use layerplot_core::{Color, Layer, LayerError, LayerKind, LayerSpec, RenderOrder, SeriesData, Style, StyleValue};
pub use layerplot_io::{export, ExportError, ExportFormat};
pub use layerplot_renderer::{
    subplots, Axes, DrawCommand, Figure, FigureConfig, HeadlessPresenter, JsonPresenter, PlotError, Presenter,
    Primitive, RenderFrame,
};
