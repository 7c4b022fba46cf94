//! mediasift-core: shared data model, errors and configuration.
//!
//! This crate is the foundational dependency for the other mediasift
//! crates. It defines the per-tool track collections ([`MediaInfo`]), the
//! packet records consumed by bitrate analysis ([`Packet`]), the closed
//! media-domain enums, a unified error type and the analysis configuration.

pub mod config;
pub mod error;
pub mod media;
pub mod packet;
pub mod track;

// Re-export the most commonly used items at the crate root.
pub use config::Config;
pub use error::{Error, Result};
pub use media::*;
pub use packet::Packet;
pub use track::{MediaInfo, Track, TrackKey};
