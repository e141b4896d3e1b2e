use std::path::PathBuf;

use layerplot_core::{Layer, LayerKind, LayerSpec, RenderOrder, Style, StyleValue};
use layerplot_renderer::{subplots, Axes, Figure, FigureConfig, HeadlessPresenter, Presenter};
use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// A figure together with the axes layers are drawn into.
pub type Surface = (Figure, Axes);

/// Per-call settings of the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Draw order as indices into the layer list; `None` keeps list order.
    pub order: Option<Vec<usize>>,
    /// Present the surface once every layer is drawn.
    pub show: bool,
    /// Export target; the extension picks the format. Empty paths are ignored.
    pub save_path: Option<PathBuf>,
    /// Applied over every layer's own style. Overrides win on collision.
    pub style_overrides: Style,
    /// Used only when the compositor creates the surface.
    pub figure: FigureConfig,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            order: None,
            show: true,
            save_path: None,
            style_overrides: Style::new(),
            figure: FigureConfig::default(),
        }
    }
}

impl ComposeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: Vec<usize>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn save_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_override(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.style_overrides.set(key, value);
        self
    }

    pub fn with_overrides(mut self, overrides: Style) -> Self {
        self.style_overrides = overrides;
        self
    }

    pub fn with_figure(mut self, figure: FigureConfig) -> Self {
        self.figure = figure;
        self
    }
}

/// Overlays layers onto one surface and optionally shows and saves it.
pub struct Compositor {
    presenter: Box<dyn Presenter>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// A compositor that presents through [`HeadlessPresenter`].
    pub fn new() -> Self {
        Self {
            presenter: Box::new(HeadlessPresenter),
        }
    }

    pub fn with_presenter(presenter: impl Presenter + 'static) -> Self {
        Self {
            presenter: Box::new(presenter),
        }
    }

    /// Draw `layers` onto `surface` (or a new one) and hand the surface back.
    ///
    /// On error the surface is dropped; use [`Compositor::compose_onto`] to
    /// keep a partially drawn surface.
    pub fn compose(
        &mut self,
        layers: &[Layer],
        surface: Option<Surface>,
        options: &ComposeOptions,
    ) -> Result<Surface, ComposeError> {
        let mut surface = match surface {
            Some(surface) => surface,
            None => subplots(&options.figure),
        };
        self.compose_onto(&mut surface, layers, options)?;
        Ok(surface)
    }

    /// Draw `layers` onto a borrowed surface, then present and export it as
    /// requested. The surface stays with the caller whatever the outcome.
    pub fn compose_onto(
        &mut self,
        surface: &mut Surface,
        layers: &[Layer],
        options: &ComposeOptions,
    ) -> Result<(), ComposeError> {
        let (figure, axes) = surface;

        let drawn = draw_layers(axes, layers, options.order.as_deref(), &options.style_overrides)?;
        log::debug!("Figure {}: composed {} layer(s)", figure.id, drawn);

        if options.show {
            self.presenter
                .present(figure, axes)
                .map_err(ComposeError::Present)?;
        }

        if let Some(path) = options
            .save_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            layerplot_io::export(figure, axes, path)?;
        }

        Ok(())
    }

    /// Like [`Compositor::compose`], for loosely typed descriptors.
    /// Every descriptor is checked before anything is drawn.
    pub fn compose_specs(
        &mut self,
        specs: Vec<LayerSpec>,
        surface: Option<Surface>,
        options: &ComposeOptions,
    ) -> Result<Surface, ComposeError> {
        let layers = layers_from_specs(specs)?;
        self.compose(&layers, surface, options)
    }
}

/// Compose with the default compositor. See [`Compositor::compose`].
pub fn compose(
    layers: &[Layer],
    surface: Option<Surface>,
    options: &ComposeOptions,
) -> Result<Surface, ComposeError> {
    Compositor::new().compose(layers, surface, options)
}

/// Dispatch each layer named by `order` to its primitive on `axes`, in order.
///
/// Each layer is drawn with a merged copy of its style; `overrides` and the
/// layer itself are left untouched. Stops at the first failing index, leaving
/// earlier layers drawn. Returns the number of layers drawn.
pub fn draw_layers(
    axes: &mut Axes,
    layers: &[Layer],
    order: Option<&[usize]>,
    overrides: &Style,
) -> Result<usize, ComposeError> {
    let order = RenderOrder::resolve(order, layers.len());

    for index in order.iter() {
        let layer = layers.get(index).ok_or(ComposeError::OrderOutOfRange {
            index,
            len: layers.len(),
        })?;
        let style = layer.style.merged_with(overrides);
        let (x, y) = (layer.data.x.as_slice(), layer.data.y.as_slice());

        log::debug!("Drawing layer {} as {} ({} points)", index, layer.kind, layer.data.len());
        let drawn = match layer.kind {
            LayerKind::Line => axes.plot(x, y, &style),
            LayerKind::Scatter => axes.scatter(x, y, &style),
            LayerKind::Bar => axes.bar(x, y, &style),
        };
        drawn.map_err(|source| ComposeError::Plot { index, source })?;
    }

    Ok(order.len())
}

/// Convert loosely typed descriptors, failing on the first bad one.
pub fn layers_from_specs(specs: impl IntoIterator<Item = LayerSpec>) -> Result<Vec<Layer>, ComposeError> {
    specs
        .into_iter()
        .map(|spec| Layer::try_from(spec).map_err(ComposeError::from))
        .collect()
}

/// Parse a JSON array of `{"type", "data", "kwargs"}` descriptors.
pub fn layers_from_json(json: &str) -> Result<Vec<Layer>, ComposeError> {
    let specs: Vec<LayerSpec> = serde_json::from_str(json)?;
    layers_from_specs(specs)
}
