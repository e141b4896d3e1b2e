//! # layerplot renderer
//!
//! The drawing surface layers are composed onto. A [`Figure`] is the canvas,
//! an [`Axes`] is the coordinate region inside it. The line, scatter and bar
//! primitives on [`Axes`] do not rasterise anything: each call validates its
//! input, resolves its style and records a serializable [`DrawCommand`] in
//! the axes' display list. Presenters and exporters consume the display list
//! as a [`RenderFrame`].

pub mod error;
pub mod present;
pub mod render_data;
pub mod surface;
pub mod viewport;

pub use error::PlotError;
pub use present::{HeadlessPresenter, JsonPresenter, Presenter};
pub use render_data::{Bar, DrawCommand, Edge, LegendEntry, LineStyle, Primitive, RenderFrame};
pub use surface::{subplots, Axes, Figure, FigureConfig};
pub use viewport::Viewport;
