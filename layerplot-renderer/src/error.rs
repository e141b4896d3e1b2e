use layerplot_core::LayerKind;
use thiserror::Error;

/// Failures raised by the plot primitives on [`crate::Axes`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("{kind}: x and y must have the same length, got {x_len} and {y_len}")]
    LengthMismatch {
        kind: LayerKind,
        x_len: usize,
        y_len: usize,
    },

    #[error("{kind}: unsupported style option '{key}'")]
    UnsupportedStyle { kind: LayerKind, key: String },

    #[error("{kind}: invalid value '{value}' for style option '{key}': {reason}")]
    InvalidStyle {
        kind: LayerKind,
        key: String,
        value: String,
        reason: String,
    },
}
