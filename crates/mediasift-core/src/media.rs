//! Media-domain enums: track kinds, tool identities, dispositions and flags.
//!
//! All enums serialize in snake_case / lowercase and implement `Display`
//! manually for consistent string representation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

/// Kind of elementary stream a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    /// All kinds, in the order collections are walked.
    pub const ALL: [TrackKind; 3] = [TrackKind::Video, TrackKind::Audio, TrackKind::Subtitle];
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Subtitle => write!(f, "subtitle"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Probing tool that reported a track collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parser {
    /// Format prober (ffprobe).
    FfProbe,
    /// Container lister (mkvmerge).
    MkvMerge,
    /// Frame analyzer (mediainfo).
    MediaInfo,
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FfProbe => write!(f, "ffprobe"),
            Self::MkvMerge => write!(f, "mkvmerge"),
            Self::MediaInfo => write!(f, "mediainfo"),
        }
    }
}

// ---------------------------------------------------------------------------
// TrackState
// ---------------------------------------------------------------------------

/// Disposition decided for a track.
///
/// `Unknown` marks a track no decision has been applied to yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackState {
    #[default]
    Unknown,
    Keep,
    Remove,
    ReEncode,
    ReMux,
    Default,
}

impl TrackState {
    /// Whether the track survives into the output file.
    pub fn is_retained(self) -> bool {
        matches!(
            self,
            Self::Keep | Self::ReEncode | Self::ReMux | Self::Default
        )
    }
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Keep => write!(f, "keep"),
            Self::Remove => write!(f, "remove"),
            Self::ReEncode => write!(f, "re_encode"),
            Self::ReMux => write!(f, "re_mux"),
            Self::Default => write!(f, "default"),
        }
    }
}

// ---------------------------------------------------------------------------
// TrackFlags
// ---------------------------------------------------------------------------

bitflags! {
    /// Disposition flags reported for a track. The empty set means "none".
    ///
    /// Serializes as pipe-separated flag names, e.g. `"DEFAULT | FORCED"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TrackFlags: u16 {
        const DEFAULT = 1 << 0;
        const FORCED = 1 << 1;
        const HEARING_IMPAIRED = 1 << 2;
        const VISUAL_IMPAIRED = 1 << 3;
        const DESCRIPTIONS = 1 << 4;
        const ORIGINAL = 1 << 5;
        const COMMENTARY = 1 << 6;
    }
}

impl TrackFlags {
    /// Derive flags from the keywords tools commonly put in track titles.
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        let mut flags = TrackFlags::empty();
        if title.contains("commentary") {
            flags |= TrackFlags::COMMENTARY;
        }
        if title.contains("sdh") || title.contains("hearing impaired") {
            flags |= TrackFlags::HEARING_IMPAIRED;
        }
        if title.contains("forced") {
            flags |= TrackFlags::FORCED;
        }
        if title.contains("descriptive") || title.contains("audio description") {
            flags |= TrackFlags::DESCRIPTIONS | TrackFlags::VISUAL_IMPAIRED;
        }
        if title.contains("original") {
            flags |= TrackFlags::ORIGINAL;
        }
        flags
    }
}

impl fmt::Display for TrackFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        bitflags::parser::to_writer(self, f)
    }
}
