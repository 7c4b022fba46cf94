//! Analysis configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON or TOML. Every
//! section defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::media::TrackFlags;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bitrate: BitrateConfig,
    pub languages: LanguageConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a file, choosing the format by extension
    /// (`.toml` is TOML, anything else JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None`, missing, or unparseable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => config,
            Err(Error::Io { source }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    ///
    /// Whether `languages.default_language` is covered by `languages.keep`
    /// depends on the language matcher and is checked by the caller.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.bitrate.video_stream_index == self.bitrate.audio_stream_index {
            warnings.push(format!(
                "bitrate.video_stream_index and bitrate.audio_stream_index are both {}; \
                 packets will only be counted as video",
                self.bitrate.video_stream_index
            ));
        }

        if self.languages.keep.is_empty() {
            warnings.push(
                "languages.keep is empty; only undefined-language tracks can be kept".into(),
            );
        }

        for (i, tag) in self.languages.keep.iter().enumerate() {
            if tag.trim().is_empty() {
                warnings.push(format!("languages.keep[{i}] is blank"));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Packet routing and threshold settings for bitrate analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitrateConfig {
    /// Container stream index of the video stream to profile.
    pub video_stream_index: u32,
    /// Container stream index of the audio stream to profile.
    pub audio_stream_index: u32,
    /// Byte-per-second ceiling; 0 disables threshold analysis.
    pub max_bytes_per_second: u64,
}

impl Default for BitrateConfig {
    fn default() -> Self {
        Self {
            video_stream_index: 0,
            audio_stream_index: 1,
            max_bytes_per_second: 0,
        }
    }
}

/// Language selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// IETF tag prefixes of languages to keep.
    pub keep: Vec<String>,
    /// Preferred language for the default audio track.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Keep tracks whose language is undefined.
    #[serde(default = "default_true")]
    pub keep_undefined: bool,
    /// Tracks carrying any of these flags are removed.
    #[serde(default = "default_remove_flags")]
    pub remove_flags: TrackFlags,
}

fn default_language() -> String {
    "en".into()
}

fn default_true() -> bool {
    true
}

fn default_remove_flags() -> TrackFlags {
    TrackFlags::COMMENTARY | TrackFlags::DESCRIPTIONS
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            keep: vec![default_language()],
            default_language: default_language(),
            keep_undefined: default_true(),
            remove_flags: default_remove_flags(),
        }
    }
}
