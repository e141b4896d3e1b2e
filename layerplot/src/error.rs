use std::io;

use layerplot_core::LayerError;
use layerplot_io::ExportError;
use layerplot_renderer::PlotError;
use thiserror::Error;

/// Everything that can abort a compose call. Nothing is retried or repaired;
/// the surface keeps whatever was drawn before the failure.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("render order index {index} is out of range for {len} layer(s)")]
    OrderOutOfRange { index: usize, len: usize },

    #[error("layer {index}: {source}")]
    Plot {
        index: usize,
        #[source]
        source: PlotError,
    },

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error("invalid layer descriptors: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("failed to present figure: {0}")]
    Present(#[source] io::Error),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ComposeError {
    /// Bad caller input: order, descriptor shape, kind, data or style.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ComposeError::OrderOutOfRange { .. }
                | ComposeError::Plot { .. }
                | ComposeError::Layer(_)
                | ComposeError::Descriptor(_)
        )
    }

    /// Failure while showing or writing an already drawn surface.
    pub fn is_io_error(&self) -> bool {
        matches!(self, ComposeError::Present(_) | ComposeError::Export(_))
    }
}
