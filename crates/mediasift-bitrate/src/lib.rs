//! # mediasift-bitrate
//!
//! Bitrate profiling over decode-order packet lists.
//!
//! - [`BitrateSampler`] -- per-second byte buckets for one logical stream and
//!   the [`BitrateStats`] derived from them.
//! - [`StreamBitrateAnalyzer`] -- validates packets and routes them to the
//!   video, audio and combined samplers.

pub mod analyzer;
pub mod sampler;

pub use analyzer::{BitrateReport, StreamBitrateAnalyzer};
pub use sampler::{BitrateSampler, BitrateStats, MAX_BUCKETS};
