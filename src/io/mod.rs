pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the files handed to the pipeline
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("page numbers start at 1; entry {index} has page 0")]
    InvalidPage { index: usize },
}
