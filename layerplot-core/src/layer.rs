use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::Style;

/// The plot primitive a layer is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Connected points.
    Line,
    /// Unconnected markers.
    Scatter,
    /// Bars centred on each x value.
    Bar,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Line, LayerKind::Scatter, LayerKind::Bar];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Line => "line",
            LayerKind::Scatter => "scatter",
            LayerKind::Bar => "bar",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LayerError::UnknownKind(s.to_string()))
    }
}

/// Errors raised while turning a loosely typed descriptor into a [`Layer`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    #[error("unrecognized layer kind '{0}' (expected one of: line, scatter, bar)")]
    UnknownKind(String),

    #[error("layer data is missing the '{0}' series")]
    MissingSeries(&'static str),
}

/// Paired x/y samples of one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SeriesData {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

/// One drawable layer: which primitive, what data, how it looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub data: SeriesData,
    #[serde(default)]
    pub style: Style,
}

impl Layer {
    pub fn new(kind: LayerKind, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            kind,
            data: SeriesData::new(x, y),
            style: Style::new(),
        }
    }

    pub fn line(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self::new(LayerKind::Line, x, y)
    }

    pub fn scatter(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self::new(LayerKind::Scatter, x, y)
    }

    pub fn bar(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self::new(LayerKind::Bar, x, y)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_option(mut self, key: &str, value: impl Into<crate::StyleValue>) -> Self {
        self.style.set(key, value);
        self
    }
}

/// Loosely typed layer descriptor, e.g. as read from JSON:
/// `{"type": "line", "data": {"x": [..], "y": [..]}, "kwargs": {"color": "blue"}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub kwargs: Style,
}

impl TryFrom<LayerSpec> for Layer {
    type Error = LayerError;

    fn try_from(mut spec: LayerSpec) -> Result<Self, Self::Error> {
        let kind: LayerKind = spec.kind.parse()?;
        let x = spec.data.remove("x").ok_or(LayerError::MissingSeries("x"))?;
        let y = spec.data.remove("y").ok_or(LayerError::MissingSeries("y"))?;
        if !spec.data.is_empty() {
            log::debug!(
                "Ignoring extra series {:?} on {} layer",
                spec.data.keys().collect::<Vec<_>>(),
                kind
            );
        }
        Ok(Layer {
            kind,
            data: SeriesData::new(x, y),
            style: spec.kwargs,
        })
    }
}
