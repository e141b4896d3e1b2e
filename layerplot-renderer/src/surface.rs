use layerplot_core::{BBox, Color, LayerKind, Point, Style, StyleValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlotError;
use crate::render_data::{Bar, DrawCommand, Edge, LegendEntry, LineStyle, Primitive};
use crate::viewport::DATA_MARGIN;

pub const DEFAULT_LINE_WIDTH: f64 = 1.5;
pub const DEFAULT_MARKER_SIZE: f64 = 36.0;
pub const DEFAULT_BAR_WIDTH: f64 = 0.8;
/// Marker outline width in points. Bars have no outline unless `linewidth` is set.
pub const DEFAULT_MARKER_EDGE_WIDTH: f64 = 1.0;
/// Shared by every primitive, so only the composed order decides stacking
/// until a layer sets `zorder` itself.
pub const DEFAULT_ZORDER: f64 = 1.0;

const COMMON_KEYS: &[&str] = &["color", "label", "alpha", "zorder"];
const LINE_KEYS: &[&str] = &["linewidth", "linestyle"];
const SCATTER_KEYS: &[&str] = &["s", "markersize", "linewidth", "linestyle", "edgecolor"];
const BAR_KEYS: &[&str] = &["width", "bottom", "linewidth", "linestyle", "edgecolor"];

/// Size and resolution of a newly created figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 100.0,
        }
    }
}

/// The canvas of a surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct Figure {
    pub id: Uuid,
    pub config: FigureConfig,
    suptitle: Option<String>,
}

impl Figure {
    pub fn new(config: FigureConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            suptitle: None,
        }
    }

    pub fn width_px(&self) -> f64 {
        self.config.width_in * self.config.dpi
    }

    pub fn height_px(&self) -> f64 {
        self.config.height_in * self.config.dpi
    }

    pub fn suptitle(&self) -> Option<&str> {
        self.suptitle.as_deref()
    }

    pub fn set_suptitle(&mut self, title: &str) {
        self.suptitle = Some(title.to_string());
    }
}

/// The coordinate region layers are drawn into.
///
/// Every primitive call appends one [`DrawCommand`] to the display list;
/// later commands paint over earlier ones.
#[derive(Debug, Serialize, Deserialize)]
pub struct Axes {
    pub id: Uuid,
    /// Id of the [`Figure`] this axes was created on.
    pub figure_id: Uuid,
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    legend_visible: bool,
    commands: Vec<DrawCommand>,
    data_bounds: Option<BBox>,
    cycle_position: usize,
}

/// Create a figure with a single axes.
pub fn subplots(config: &FigureConfig) -> (Figure, Axes) {
    let figure = Figure::new(*config);
    let axes = Axes::new(&figure);
    log::debug!(
        "Created figure {} ({}x{} px)",
        figure.id,
        figure.width_px(),
        figure.height_px()
    );
    (figure, axes)
}

impl Axes {
    pub fn new(figure: &Figure) -> Self {
        Self {
            id: Uuid::new_v4(),
            figure_id: figure.id,
            title: None,
            xlabel: None,
            ylabel: None,
            legend_visible: false,
            commands: Vec::new(),
            data_bounds: None,
            cycle_position: 0,
        }
    }

    // ── Plot primitives ──────────────────────────────────────────────

    /// Draw `y` against `x` as connected points.
    pub fn plot(&mut self, x: &[f64], y: &[f64], style: &Style) -> Result<&DrawCommand, PlotError> {
        let kind = LayerKind::Line;
        check_lengths(kind, x, y)?;
        let opts = StyleReader::new(kind, style, LINE_KEYS)?;

        let width = opts.non_negative("linewidth")?.unwrap_or(DEFAULT_LINE_WIDTH);
        let dash = opts.line_style()?;

        let primitive = Primitive::Line {
            points: points(x, y),
            width,
            dash,
        };
        self.push(primitive, &opts)
    }

    /// Draw unconnected markers at each `(x, y)`.
    ///
    /// `linewidth`, `linestyle` and `edgecolor` style the marker outline.
    pub fn scatter(&mut self, x: &[f64], y: &[f64], style: &Style) -> Result<&DrawCommand, PlotError> {
        let kind = LayerKind::Scatter;
        check_lengths(kind, x, y)?;
        let opts = StyleReader::new(kind, style, SCATTER_KEYS)?;

        let size = match opts.non_negative("s")? {
            Some(s) => s,
            None => opts.non_negative("markersize")?.unwrap_or(DEFAULT_MARKER_SIZE),
        };

        let primitive = Primitive::Scatter {
            points: points(x, y),
            size,
            edge: opts.edge(DEFAULT_MARKER_EDGE_WIDTH)?,
        };
        self.push(primitive, &opts)
    }

    /// Draw one bar of height `y[i]` centred on each `x[i]`.
    ///
    /// `linewidth`, `linestyle` and `edgecolor` style the bar outline.
    pub fn bar(&mut self, x: &[f64], y: &[f64], style: &Style) -> Result<&DrawCommand, PlotError> {
        let kind = LayerKind::Bar;
        check_lengths(kind, x, y)?;
        let opts = StyleReader::new(kind, style, BAR_KEYS)?;

        let width = opts.non_negative("width")?.unwrap_or(DEFAULT_BAR_WIDTH);
        let bottom = opts.number("bottom")?.unwrap_or(0.0);
        let edge = opts.edge(0.0)?;

        let bars = x
            .iter()
            .zip(y)
            .map(|(&x, &height)| Bar {
                x,
                width,
                bottom,
                height,
            })
            .collect();
        self.push(Primitive::Bar { bars, edge }, &opts)
    }

    fn push(&mut self, primitive: Primitive, opts: &StyleReader<'_>) -> Result<&DrawCommand, PlotError> {
        let alpha = match opts.number("alpha")? {
            Some(a) if (0.0..=1.0).contains(&a) => a,
            Some(a) => return Err(opts.invalid("alpha", &a.to_string(), "must be within 0..=1")),
            None => 1.0,
        };
        let zorder = opts.number("zorder")?.unwrap_or(DEFAULT_ZORDER);
        // The cycle only advances once nothing else can fail.
        let color = match opts.color()? {
            Some(c) => c,
            None => self.next_cycle_color(),
        };

        match primitive.bounds() {
            Some(bb) => {
                self.data_bounds = Some(match self.data_bounds {
                    Some(current) => current.union(&bb),
                    None => bb,
                });
            }
            None => log::warn!("{} layer has no finite data; nothing to autoscale", primitive.kind()),
        }

        let command = DrawCommand {
            seq: self.commands.len(),
            zorder,
            color,
            alpha,
            label: opts.label(),
            primitive,
        };
        log::debug!("Axes {}: drew {}", self.id, command);
        self.commands.push(command);
        Ok(&self.commands[self.commands.len() - 1])
    }

    fn next_cycle_color(&mut self) -> Color {
        let color = Color::cycle(self.cycle_position);
        self.cycle_position += 1;
        color
    }

    // ── Display list ─────────────────────────────────────────────────

    /// Everything drawn so far, in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Union of the data extents of all drawn primitives.
    pub fn data_bounds(&self) -> Option<BBox> {
        self.data_bounds
    }

    /// Data range an exporter should show: the data bounds plus margins,
    /// or the unit square when nothing has been drawn.
    pub fn view_bounds(&self) -> BBox {
        match self.data_bounds {
            Some(bb) => bb.expanded(DATA_MARGIN),
            None => BBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
        }
    }

    // ── Decorations ──────────────────────────────────────────────────

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    pub fn set_xlabel(&mut self, label: &str) {
        self.xlabel = Some(label.to_string());
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    pub fn set_ylabel(&mut self, label: &str) {
        self.ylabel = Some(label.to_string());
    }

    /// Turn on the legend and return its entries (labelled commands in draw order).
    pub fn legend(&mut self) -> Vec<LegendEntry> {
        self.legend_visible = true;
        let entries = self.legend_entries();
        if entries.is_empty() {
            log::warn!("No layers with labels found to put in legend");
        }
        entries
    }

    pub fn legend_visible(&self) -> bool {
        self.legend_visible
    }

    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.commands
            .iter()
            .filter_map(|c| {
                c.legend_label().map(|label| LegendEntry {
                    label: label.to_string(),
                    kind: c.kind(),
                    color: c.color,
                })
            })
            .collect()
    }

    /// Remove everything drawn and reset the color cycle. Decorations stay.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.data_bounds = None;
        self.cycle_position = 0;
    }
}

fn check_lengths(kind: LayerKind, x: &[f64], y: &[f64]) -> Result<(), PlotError> {
    if x.len() != y.len() {
        return Err(PlotError::LengthMismatch {
            kind,
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}

fn points(x: &[f64], y: &[f64]) -> Vec<Point> {
    x.iter().zip(y).map(|(&x, &y)| Point::new(x, y)).collect()
}

/// Typed, validated access to the options a primitive accepts.
struct StyleReader<'a> {
    kind: LayerKind,
    style: &'a Style,
}

impl<'a> StyleReader<'a> {
    fn new(kind: LayerKind, style: &'a Style, accepted: &[&str]) -> Result<Self, PlotError> {
        if let Some(key) = style
            .keys()
            .find(|k| !COMMON_KEYS.contains(k) && !accepted.contains(k))
        {
            return Err(PlotError::UnsupportedStyle {
                kind,
                key: key.to_string(),
            });
        }
        Ok(Self { kind, style })
    }

    fn invalid(&self, key: &str, value: &str, reason: impl Into<String>) -> PlotError {
        PlotError::InvalidStyle {
            kind: self.kind,
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, PlotError> {
        match self.style.get(key) {
            None => Ok(None),
            Some(StyleValue::Number(n)) if n.is_finite() => Ok(Some(*n)),
            Some(v) => Err(self.invalid(key, &v.to_string(), "expected a finite number")),
        }
    }

    fn non_negative(&self, key: &str) -> Result<Option<f64>, PlotError> {
        match self.number(key)? {
            Some(n) if n < 0.0 => Err(self.invalid(key, &n.to_string(), "must not be negative")),
            other => Ok(other),
        }
    }

    fn text(&self, key: &str) -> Result<Option<&'a str>, PlotError> {
        match self.style.get(key) {
            None => Ok(None),
            Some(StyleValue::Text(s)) => Ok(Some(s.as_str())),
            Some(v) => Err(self.invalid(key, &v.to_string(), format!("expected text, got {}", v.type_name()))),
        }
    }

    fn color(&self) -> Result<Option<Color>, PlotError> {
        self.color_of("color")
    }

    fn color_of(&self, key: &str) -> Result<Option<Color>, PlotError> {
        match self.text(key)? {
            Some(s) => s
                .parse::<Color>()
                .map(Some)
                .map_err(|e| self.invalid(key, s, e.to_string())),
            None => Ok(None),
        }
    }

    fn line_style(&self) -> Result<LineStyle, PlotError> {
        match self.text("linestyle")? {
            Some(s) => s
                .parse::<LineStyle>()
                .map_err(|reason| self.invalid("linestyle", s, reason)),
            None => Ok(LineStyle::Solid),
        }
    }

    /// Outline options. `edgecolor: "face"` is the same as leaving it unset.
    fn edge(&self, default_width: f64) -> Result<Edge, PlotError> {
        let color = match self.text("edgecolor")? {
            Some("face") => None,
            _ => self.color_of("edgecolor")?,
        };
        Ok(Edge {
            color,
            width: self.non_negative("linewidth")?.unwrap_or(default_width),
            dash: self.line_style()?,
        })
    }

    /// Any value is accepted as a label and shown via its display form.
    fn label(&self) -> Option<String> {
        self.style.get("label").map(|v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_axes() -> Axes {
        let (_, axes) = subplots(&FigureConfig::default());
        axes
    }

    #[test]
    fn test_subplots_links_axes_to_figure() {
        let (fig, axes) = subplots(&FigureConfig::default());
        assert_eq!(axes.figure_id, fig.id);
        assert_eq!(fig.width_px(), 640.0);
        assert_eq!(fig.height_px(), 480.0);
        assert_eq!(axes.command_count(), 0);
    }

    #[test]
    fn test_primitives_append_in_call_order() {
        let mut axes = new_axes();
        axes.bar(&[1.0, 2.0, 3.0], &[5.0, 6.0, 7.0], &Style::new()).unwrap();
        axes.plot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &Style::new()).unwrap();
        axes.scatter(&[1.0, 2.0, 3.0], &[6.0, 5.0, 4.0], &Style::new()).unwrap();

        let kinds: Vec<LayerKind> = axes.commands().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![LayerKind::Bar, LayerKind::Line, LayerKind::Scatter]);
        let seqs: Vec<usize> = axes.commands().iter().map(|c| c.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut axes = new_axes();
        let err = axes.plot(&[1.0, 2.0], &[1.0], &Style::new()).unwrap_err();
        assert_eq!(
            err,
            PlotError::LengthMismatch {
                kind: LayerKind::Line,
                x_len: 2,
                y_len: 1
            }
        );
        assert_eq!(axes.command_count(), 0);
    }

    #[test]
    fn test_explicit_color_and_label() {
        let mut axes = new_axes();
        let style = Style::new().with("color", "red").with("label", "Scatter Plot");
        let cmd = axes.scatter(&[1.0], &[2.0], &style).unwrap();
        assert_eq!(cmd.color, Color::rgb(255, 0, 0));
        assert_eq!(cmd.label.as_deref(), Some("Scatter Plot"));
    }

    #[test]
    fn test_color_cycle_skips_explicit_colors() {
        let mut axes = new_axes();
        let c0 = axes.plot(&[0.0], &[0.0], &Style::new()).unwrap().color;
        axes.plot(&[0.0], &[0.0], &Style::new().with("color", "k")).unwrap();
        let c1 = axes.plot(&[0.0], &[0.0], &Style::new()).unwrap().color;
        assert_eq!(c0, Color::cycle(0));
        assert_eq!(c1, Color::cycle(1));
    }

    #[test]
    fn test_unsupported_style_key() {
        let mut axes = new_axes();
        let err = axes
            .bar(&[1.0], &[1.0], &Style::new().with("markersize", 10.0))
            .unwrap_err();
        assert_eq!(
            err,
            PlotError::UnsupportedStyle {
                kind: LayerKind::Bar,
                key: "markersize".into()
            }
        );
        let err = axes
            .plot(&[1.0], &[1.0], &Style::new().with("edgecolor", "k"))
            .unwrap_err();
        assert!(matches!(err, PlotError::UnsupportedStyle { kind: LayerKind::Line, .. }));
    }

    #[test]
    fn test_outline_options_on_every_primitive() {
        let mut axes = new_axes();
        let style = Style::new().with("linewidth", 3.0).with("linestyle", "--");
        axes.plot(&[1.0, 2.0], &[1.0, 2.0], &style).unwrap();

        let cmd = axes.scatter(&[1.0], &[1.0], &style).unwrap();
        match &cmd.primitive {
            Primitive::Scatter { edge, .. } => {
                assert_eq!(edge.width, 3.0);
                assert_eq!(edge.dash, LineStyle::Dashed);
                assert!(edge.color.is_none());
            }
            other => panic!("expected markers, got {:?}", other),
        }

        let cmd = axes
            .bar(&[1.0], &[1.0], &style.with("edgecolor", "black"))
            .unwrap();
        match &cmd.primitive {
            Primitive::Bar { edge, .. } => {
                assert_eq!(edge.width, 3.0);
                assert_eq!(edge.color, Some(Color::rgb(0, 0, 0)));
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_edge_defaults_to_face() {
        let mut axes = new_axes();
        let cmd = axes
            .scatter(&[1.0], &[1.0], &Style::new().with("edgecolor", "face"))
            .unwrap();
        match &cmd.primitive {
            Primitive::Scatter { edge, .. } => {
                assert!(edge.color.is_none());
                assert_eq!(edge.width, DEFAULT_MARKER_EDGE_WIDTH);
            }
            other => panic!("expected markers, got {:?}", other),
        }
        let bad = axes.scatter(&[1.0], &[1.0], &Style::new().with("edgecolor", "nope"));
        assert!(matches!(bad, Err(PlotError::InvalidStyle { ref key, .. }) if key == "edgecolor"));
    }

    #[test]
    fn test_zorder_recorded_without_reordering() {
        let mut axes = new_axes();
        axes.plot(&[1.0], &[1.0], &Style::new().with("zorder", 5.0)).unwrap();
        axes.bar(&[1.0], &[1.0], &Style::new()).unwrap();

        let cmds = axes.commands();
        assert_eq!(cmds[0].zorder, 5.0);
        assert_eq!(cmds[1].zorder, DEFAULT_ZORDER);
        assert_eq!(cmds[0].kind(), LayerKind::Line);

        let bad = axes.plot(&[1.0], &[1.0], &Style::new().with("zorder", "top"));
        assert!(matches!(bad, Err(PlotError::InvalidStyle { ref key, .. }) if key == "zorder"));
    }

    #[test]
    fn test_invalid_style_values() {
        let mut axes = new_axes();
        let bad_color = axes.plot(&[1.0], &[1.0], &Style::new().with("color", "not-a-color"));
        assert!(matches!(bad_color, Err(PlotError::InvalidStyle { ref key, .. }) if key == "color"));

        let bad_width = axes.plot(&[1.0], &[1.0], &Style::new().with("linewidth", "thick"));
        assert!(matches!(bad_width, Err(PlotError::InvalidStyle { ref key, .. }) if key == "linewidth"));

        let bad_alpha = axes.scatter(&[1.0], &[1.0], &Style::new().with("alpha", 2.0));
        assert!(matches!(bad_alpha, Err(PlotError::InvalidStyle { ref key, .. }) if key == "alpha"));
        assert_eq!(axes.command_count(), 0);
    }

    #[test]
    fn test_bar_options() {
        let mut axes = new_axes();
        let style = Style::new().with("width", 0.5).with("bottom", 1.0);
        let cmd = axes.bar(&[2.0], &[3.0], &style).unwrap();
        match &cmd.primitive {
            Primitive::Bar { bars, edge } => {
                assert_eq!(bars[0], Bar { x: 2.0, width: 0.5, bottom: 1.0, height: 3.0 });
                assert_eq!(bars[0].top(), 4.0);
                assert!(!edge.is_visible());
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_data_bounds_accumulate() {
        let mut axes = new_axes();
        assert!(axes.data_bounds().is_none());
        axes.plot(&[1.0, 3.0], &[4.0, 6.0], &Style::new()).unwrap();
        axes.bar(&[2.0], &[2.0], &Style::new()).unwrap();
        let bb = axes.data_bounds().unwrap();
        assert_eq!(bb.min.y, 0.0);
        assert_eq!(bb.max.y, 6.0);
        assert_eq!(bb.max.x, 3.0);
    }

    #[test]
    fn test_legend_entries() {
        let mut axes = new_axes();
        axes.plot(&[1.0], &[1.0], &Style::new().with("label", "Line Plot")).unwrap();
        axes.scatter(&[1.0], &[1.0], &Style::new()).unwrap();
        assert!(!axes.legend_visible());
        let entries = axes.legend();
        assert!(axes.legend_visible());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Line Plot");
        assert_eq!(entries[0].kind, LayerKind::Line);
    }

    #[test]
    fn test_clear_resets_display_list() {
        let mut axes = new_axes();
        axes.set_title("kept");
        axes.plot(&[1.0], &[1.0], &Style::new()).unwrap();
        axes.clear();
        assert_eq!(axes.command_count(), 0);
        assert!(axes.data_bounds().is_none());
        assert_eq!(axes.title(), Some("kept"));
    }
}
