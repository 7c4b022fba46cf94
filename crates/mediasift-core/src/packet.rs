//! Decode-order packet samples used for bitrate analysis.

use serde::{Deserialize, Serialize};

/// Timestamps at or below this value are treated as missing.
pub const TIMESTAMP_EPSILON: f64 = 1e-9;

/// Packets claiming to last longer than this many seconds are rejected.
pub const MAX_PACKET_DURATION: f64 = 1.0;

/// One packet as listed by the packet probe, in container order.
///
/// Absent timestamps may be encoded either as `None` or as `NaN`; both are
/// treated the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Container stream index the packet belongs to.
    pub stream_index: u32,
    /// Codec type as reported by the probe ("video", "audio", ...).
    #[serde(default)]
    pub codec_type: String,
    /// Presentation timestamp in seconds.
    #[serde(default)]
    pub pts_time: Option<f64>,
    /// Decode timestamp in seconds.
    #[serde(default)]
    pub dts_time: Option<f64>,
    /// Packet duration in seconds.
    #[serde(default)]
    pub duration_time: Option<f64>,
    /// Payload size in bytes.
    pub size: u64,
}

impl Packet {
    /// Create a packet with a presentation timestamp and no duration.
    pub fn new(stream_index: u32, pts_time: f64, size: u64) -> Self {
        Self {
            stream_index,
            codec_type: String::new(),
            pts_time: Some(pts_time),
            dts_time: None,
            duration_time: None,
            size,
        }
    }

    pub fn with_codec_type(mut self, codec_type: impl Into<String>) -> Self {
        self.codec_type = codec_type.into();
        self
    }

    pub fn with_dts(mut self, dts_time: f64) -> Self {
        self.dts_time = Some(dts_time);
        self
    }

    pub fn with_duration(mut self, duration_time: f64) -> Self {
        self.duration_time = Some(duration_time);
        self
    }

    /// Presentation timestamp, falling back to the decode timestamp.
    pub fn timestamp(&self) -> Option<f64> {
        present(self.pts_time).or_else(|| present(self.dts_time))
    }

    /// Whether the packet can contribute to a bitrate profile.
    ///
    /// Requires a timestamp strictly above [`TIMESTAMP_EPSILON`], a duration
    /// (when present) of at most [`MAX_PACKET_DURATION`], and a non-zero size.
    pub fn is_admissible(&self) -> bool {
        let Some(timestamp) = self.timestamp() else {
            return false;
        };
        if timestamp <= TIMESTAMP_EPSILON {
            return false;
        }
        if present(self.duration_time).is_some_and(|d| d > MAX_PACKET_DURATION) {
            return false;
        }
        self.size > 0
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
