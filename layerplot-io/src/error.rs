use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot export to {}: unsupported format {}", path.display(), describe_extension(extension))]
    UnsupportedFormat {
        path: PathBuf,
        extension: Option<String>,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rasterisation failed: {0}")]
    Raster(String),
}

fn describe_extension(extension: &Option<String>) -> String {
    match extension {
        Some(ext) => format!("'.{ext}'"),
        None => "(no extension)".to_string(),
    }
}
