//! Unified error type for mediasift.
//!
//! The analysis components themselves are infallible; [`Error`] covers the
//! edges around them: loading configuration and reading analysis input.
//! Contract violations that reach the components (mixed tool identities,
//! duplicate track keys) panic; [`Error::Input`] is for rejecting such data
//! before it gets that far.

/// Unified error type covering the recoverable failure modes in mediasift.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// JSON input could not be decoded.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serde_json error.
        #[from]
        source: serde_json::Error,
    },

    /// TOML input could not be decoded.
    #[error("TOML error: {0}")]
    Toml(String),

    /// Analysis input was structurally unusable.
    #[error("Invalid input: {0}")]
    Input(String),
}

impl Error {
    /// Convenience constructor for [`Error::Input`].
    pub fn input(message: impl Into<String>) -> Self {
        Error::Input(message.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
