use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in this crate.
///
/// Codec and context operations never fail; the variants below cover
/// environment and configuration defects only.
#[derive(Debug, Error)]
pub enum Error {
    /// The fallback time zone itself could not be loaded.
    #[error("default time zone {0:?} cannot be loaded")]
    DefaultTimeZone(String),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
