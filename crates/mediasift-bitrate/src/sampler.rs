//! Per-second byte accumulation and bitrate statistics.

use serde::Serialize;
use std::fmt;

/// Longest profile a sampler will hold, in seconds (one week).
pub const MAX_BUCKETS: usize = 7 * 24 * 60 * 60;

/// Accumulates byte totals into one-second buckets for a single stream.
#[derive(Debug, Clone, Default)]
pub struct BitrateSampler {
    buckets: Vec<u64>,
}

impl BitrateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler presized to `round(duration_seconds)` empty buckets,
    /// capped at [`MAX_BUCKETS`].
    pub fn with_duration(duration_seconds: f64) -> Self {
        let len = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds.round().min(MAX_BUCKETS as f64) as usize
        } else {
            0
        };
        Self {
            buckets: vec![0; len],
        }
    }

    /// Bucket that `elapsed_seconds` falls into, if the sampler can hold it.
    ///
    /// Negative, non-finite and beyond-[`MAX_BUCKETS`] values have none.
    pub fn bucket_index(elapsed_seconds: f64) -> Option<usize> {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return None;
        }
        let second = elapsed_seconds.floor();
        (second < MAX_BUCKETS as f64).then(|| second as usize)
    }

    /// Add `byte_size` bytes to the bucket for `floor(elapsed_seconds)`.
    /// Returns `false` if the value has no bucket (see [`Self::bucket_index`]).
    ///
    /// Growing past the current length leaves the skipped seconds at zero.
    /// Bucket totals saturate at `u64::MAX`.
    pub fn add(&mut self, elapsed_seconds: f64, byte_size: u64) -> bool {
        let Some(index) = Self::bucket_index(elapsed_seconds) else {
            return false;
        };
        if index >= self.buckets.len() {
            self.buckets.resize(index + 1, 0);
        }
        self.buckets[index] = self.buckets[index].saturating_add(byte_size);
        true
    }

    /// Byte totals per elapsed second.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Compute statistics against a byte-per-second threshold.
    ///
    /// A threshold of 0 disables the exceeded-second counters.
    pub fn calculate(&self, threshold_bytes_per_second: u64) -> BitrateStats {
        if self.buckets.is_empty() {
            return BitrateStats {
                threshold: threshold_bytes_per_second,
                ..BitrateStats::default()
            };
        }

        let mut minimum = u64::MAX;
        let mut maximum = 0u64;
        let mut sum = 0u128;
        let mut exceeded = 0u64;
        let mut run = 0u64;
        let mut max_exceeded_run = 0u64;

        for &bytes in &self.buckets {
            minimum = minimum.min(bytes);
            maximum = maximum.max(bytes);
            sum += u128::from(bytes);

            if threshold_bytes_per_second > 0 {
                if bytes > threshold_bytes_per_second {
                    exceeded += 1;
                    run += 1;
                    max_exceeded_run = max_exceeded_run.max(run);
                } else {
                    run = 0;
                }
            }
        }

        BitrateStats {
            minimum,
            maximum,
            average: (sum / self.buckets.len() as u128) as u64,
            duration: self.buckets.len() as u64,
            threshold: threshold_bytes_per_second,
            exceeded,
            max_exceeded_run,
        }
    }
}

/// Aggregate rate statistics for one stream, in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BitrateStats {
    pub minimum: u64,
    pub maximum: u64,
    pub average: u64,
    /// Number of one-second buckets, i.e. profiled seconds.
    pub duration: u64,
    /// Threshold the counters below were computed against.
    pub threshold: u64,
    /// Seconds strictly above the threshold.
    pub exceeded: u64,
    /// Longest contiguous run of exceeded seconds.
    pub max_exceeded_run: u64,
}

impl BitrateStats {
    /// Whether any second went over a non-zero threshold.
    pub fn exceeds_threshold(&self) -> bool {
        self.threshold > 0 && self.exceeded > 0
    }
}

impl fmt::Display for BitrateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {}, max {}, avg {} over {}s",
            format_bitrate(self.minimum),
            format_bitrate(self.maximum),
            format_bitrate(self.average),
            self.duration
        )?;
        if self.threshold > 0 {
            write!(
                f,
                ", {}s above {} (longest run {}s)",
                self.exceeded,
                format_bitrate(self.threshold),
                self.max_exceeded_run
            )?;
        }
        Ok(())
    }
}

/// Render a byte-per-second rate as bits per second with a unit suffix.
pub fn format_bitrate(bytes_per_second: u64) -> String {
    let bits = bytes_per_second as f64 * 8.0;
    if bits >= 1_000_000.0 {
        format!("{:.2} Mbps", bits / 1_000_000.0)
    } else if bits >= 1_000.0 {
        format!("{:.2} kbps", bits / 1_000.0)
    } else {
        format!("{bits} bps")
    }
}
