use std::fmt;
use std::str::FromStr;

use layerplot_core::{BBox, Color, LayerKind, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::surface::{Axes, Figure};

/// Dash pattern of a line primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Dash pattern in multiples of the line width, `None` for solid lines.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(&[3.7, 1.6]),
            LineStyle::Dotted => Some(&[1.0, 1.65]),
            LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            "-." | "dashdot" => Ok(LineStyle::DashDot),
            _ => Err("expected one of '-', '--', ':', '-.'".to_string()),
        }
    }
}

/// Outline of a marker or bar. `color: None` strokes in the fill color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub color: Option<Color>,
    /// Stroke width in points; zero draws no outline.
    pub width: f64,
    pub dash: LineStyle,
}

impl Edge {
    pub fn new(width: f64) -> Self {
        Self {
            color: None,
            width,
            dash: LineStyle::Solid,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

/// One bar, centred on `x`, spanning `bottom..bottom + height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
    pub bottom: f64,
    pub height: f64,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

/// Geometry of a drawn layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Line {
        points: Vec<Point>,
        width: f64,
        dash: LineStyle,
    },
    Scatter {
        points: Vec<Point>,
        /// Marker area in points squared.
        size: f64,
        edge: Edge,
    },
    Bar {
        bars: Vec<Bar>,
        edge: Edge,
    },
}

impl Primitive {
    pub fn kind(&self) -> LayerKind {
        match self {
            Primitive::Line { .. } => LayerKind::Line,
            Primitive::Scatter { .. } => LayerKind::Scatter,
            Primitive::Bar { .. } => LayerKind::Bar,
        }
    }

    /// Data-space extent. Bars include their baseline.
    pub fn bounds(&self) -> Option<BBox> {
        match self {
            Primitive::Line { points, .. } | Primitive::Scatter { points, .. } => {
                BBox::from_points(points)
            }
            Primitive::Bar { bars, .. } => {
                let corners: Vec<Point> = bars
                    .iter()
                    .flat_map(|b| [Point::new(b.left(), b.bottom), Point::new(b.right(), b.top())])
                    .collect();
                BBox::from_points(&corners)
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Primitive::Line { points, .. } | Primitive::Scatter { points, .. } => points.len(),
            Primitive::Bar { bars, .. } => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An entry of an axes' display list. `seq` is the position in draw order.
///
/// Painters stack commands by `(zorder, seq)`: a higher `zorder` paints on
/// top regardless of when it was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub seq: usize,
    pub zorder: f64,
    pub color: Color,
    pub alpha: f64,
    pub label: Option<String>,
    pub primitive: Primitive,
}

impl DrawCommand {
    pub fn kind(&self) -> LayerKind {
        self.primitive.kind()
    }

    /// Labels starting with an underscore are hidden from the legend.
    pub fn legend_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.starts_with('_'))
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({} items, {})",
            self.seq,
            self.kind(),
            self.primitive.len(),
            self.color
        )?;
        if let Some(label) = &self.label {
            write!(f, " '{}'", label)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub kind: LayerKind,
    pub color: Color,
}

/// Snapshot of a whole surface, the unit exporters and presenters consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub figure_id: Uuid,
    pub axes_id: Uuid,
    pub width_px: f64,
    pub height_px: f64,
    pub dpi: f64,
    pub suptitle: Option<String>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Data range shown on screen.
    pub view: BBox,
    pub legend: Option<Vec<LegendEntry>>,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    /// Snapshot the surface; commands stay in draw order.
    pub fn capture(figure: &Figure, axes: &Axes) -> Self {
        Self {
            figure_id: figure.id,
            axes_id: axes.id,
            width_px: figure.width_px(),
            height_px: figure.height_px(),
            dpi: figure.config.dpi,
            suptitle: figure.suptitle().map(str::to_string),
            title: axes.title().map(str::to_string),
            xlabel: axes.xlabel().map(str::to_string),
            ylabel: axes.ylabel().map(str::to_string),
            view: axes.view_bounds(),
            legend: axes.legend_visible().then(|| axes.legend_entries()),
            commands: axes.commands().to_vec(),
        }
    }

    /// Commands in paint order: ascending `zorder`, draw order among equals.
    pub fn paint_order(&self) -> Vec<&DrawCommand> {
        let mut ordered: Vec<&DrawCommand> = self.commands.iter().collect();
        ordered.sort_by(|a, b| a.zorder.total_cmp(&b.zorder).then(a.seq.cmp(&b.seq)));
        ordered
    }
}
