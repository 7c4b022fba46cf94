//! Routes a packet list to per-stream bitrate samplers.

use mediasift_core::config::BitrateConfig;
use mediasift_core::Packet;
use serde::Serialize;

use crate::sampler::{BitrateSampler, BitrateStats};

/// Drives the video, audio and combined samplers for one file.
///
/// Packets must be admitted in the order the probe listed them.
#[derive(Debug, Clone)]
pub struct StreamBitrateAnalyzer {
    video_stream_index: u32,
    audio_stream_index: u32,
    max_bytes_per_second: u64,
    video: BitrateSampler,
    audio: BitrateSampler,
    combined: BitrateSampler,
    admitted: u64,
    skipped: u64,
}

impl StreamBitrateAnalyzer {
    pub fn new(video_stream_index: u32, audio_stream_index: u32, max_bytes_per_second: u64) -> Self {
        Self {
            video_stream_index,
            audio_stream_index,
            max_bytes_per_second,
            video: BitrateSampler::new(),
            audio: BitrateSampler::new(),
            combined: BitrateSampler::new(),
            admitted: 0,
            skipped: 0,
        }
    }

    pub fn from_config(config: &BitrateConfig) -> Self {
        Self::new(
            config.video_stream_index,
            config.audio_stream_index,
            config.max_bytes_per_second,
        )
    }

    /// Presize all samplers for a stream of known duration.
    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.video = BitrateSampler::with_duration(duration_seconds);
        self.audio = BitrateSampler::with_duration(duration_seconds);
        self.combined = BitrateSampler::with_duration(duration_seconds);
        self
    }

    /// Feed one packet. Returns `false` if the packet was ignored.
    pub fn admit(&mut self, packet: &Packet) -> bool {
        let sampler = if packet.stream_index == self.video_stream_index {
            &mut self.video
        } else if packet.stream_index == self.audio_stream_index {
            &mut self.audio
        } else {
            self.skipped += 1;
            return false;
        };

        let timestamp = match packet.timestamp() {
            Some(ts) if packet.is_admissible() && BitrateSampler::bucket_index(ts).is_some() => ts,
            _ => {
                tracing::trace!(
                    stream_index = packet.stream_index,
                    pts = ?packet.pts_time,
                    dts = ?packet.dts_time,
                    size = packet.size,
                    "skipping inadmissible packet"
                );
                self.skipped += 1;
                return false;
            }
        };

        sampler.add(timestamp, packet.size);
        self.combined.add(timestamp, packet.size);
        self.admitted += 1;
        true
    }

    /// Feed packets in order, returning how many were admitted.
    pub fn admit_all<'a, I>(&mut self, packets: I) -> usize
    where
        I: IntoIterator<Item = &'a Packet>,
    {
        packets.into_iter().filter(|p| self.admit(p)).count()
    }

    pub fn video(&self) -> &BitrateSampler {
        &self.video
    }

    pub fn audio(&self) -> &BitrateSampler {
        &self.audio
    }

    pub fn combined(&self) -> &BitrateSampler {
        &self.combined
    }

    /// Calculate all three samplers against the configured threshold.
    pub fn finalize(&self) -> BitrateReport {
        self.finalize_with(self.max_bytes_per_second)
    }

    /// Calculate all three samplers against an explicit threshold.
    pub fn finalize_with(&self, threshold_bytes_per_second: u64) -> BitrateReport {
        let report = BitrateReport {
            video: self.video.calculate(threshold_bytes_per_second),
            audio: self.audio.calculate(threshold_bytes_per_second),
            combined: self.combined.calculate(threshold_bytes_per_second),
            admitted: self.admitted,
            skipped: self.skipped,
            threshold: threshold_bytes_per_second,
        };
        tracing::debug!(
            admitted = report.admitted,
            skipped = report.skipped,
            combined_max = report.combined.maximum,
            combined_exceeded = report.combined.exceeded,
            "bitrate analysis complete"
        );
        report
    }
}

/// Statistics for the analyzed stream categories of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitrateReport {
    pub video: BitrateStats,
    pub audio: BitrateStats,
    pub combined: BitrateStats,
    /// Packets that contributed to the profile.
    pub admitted: u64,
    /// Packets ignored for index mismatch, failed validation or a timestamp
    /// past the longest profile.
    pub skipped: u64,
    pub threshold: u64,
}

impl BitrateReport {
    /// Whether the combined stream went over a non-zero threshold.
    pub fn exceeds_threshold(&self) -> bool {
        self.combined.exceeds_threshold()
    }
}
