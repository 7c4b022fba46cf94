//! Per-tool track records.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::{Parser, TrackFlags, TrackKind, TrackState};

/// Identifies a track inside one tool's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub kind: TrackKind,
    pub id: u32,
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// One elementary stream as reported by one probing tool.
///
/// The identity and attribute fields are fixed once the adapter layer has
/// built the track; `flags` and `state` are written later by disposition
/// logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track number assigned by the reporting tool.
    pub id: u32,
    /// Stream kind.
    pub kind: TrackKind,
    /// Codec / profile string as the tool names it.
    #[serde(default)]
    pub format: Option<String>,
    /// IETF language tag.
    #[serde(default)]
    pub language_ietf: Option<String>,
    /// Track title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub flags: TrackFlags,
    /// Whether the tool reported errors for this track.
    #[serde(default)]
    pub has_errors: bool,
    #[serde(default)]
    pub state: TrackState,
}

impl Track {
    /// Create a track with no attributes and an undecided state.
    pub fn new(kind: TrackKind, id: u32) -> Self {
        Self {
            id,
            kind,
            format: None,
            language_ietf: None,
            title: None,
            flags: TrackFlags::empty(),
            has_errors: false,
            state: TrackState::Unknown,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_ietf = Some(language.into());
        self
    }

    /// Set the title and merge in the flags its keywords imply.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.flags |= TrackFlags::from_title(&title);
        self.title = Some(title);
        self
    }

    pub fn with_flags(mut self, flags: TrackFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_errors(mut self, has_errors: bool) -> Self {
        self.has_errors = has_errors;
        self
    }

    /// The `(kind, id)` key of this track.
    pub fn key(&self) -> TrackKey {
        TrackKey {
            kind: self.kind,
            id: self.id,
        }
    }

    /// The format string, or `placeholder` when it is missing or empty.
    pub fn format_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.format.as_deref() {
            Some(format) if !format.trim().is_empty() => format,
            _ => placeholder,
        }
    }
}

/// The tool-tagged track collections describing one physical file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Tool that produced these tracks.
    pub parser: Parser,
    #[serde(default)]
    pub video: Vec<Track>,
    #[serde(default)]
    pub audio: Vec<Track>,
    #[serde(default)]
    pub subtitle: Vec<Track>,
}

impl MediaInfo {
    /// Create an empty collection for `parser`.
    pub fn new(parser: Parser) -> Self {
        Self {
            parser,
            video: Vec::new(),
            audio: Vec::new(),
            subtitle: Vec::new(),
        }
    }

    /// Tracks of a given kind, in reported order.
    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
            TrackKind::Subtitle => &self.subtitle,
        }
    }

    pub fn tracks_mut(&mut self, kind: TrackKind) -> &mut Vec<Track> {
        match kind {
            TrackKind::Video => &mut self.video,
            TrackKind::Audio => &mut self.audio,
            TrackKind::Subtitle => &mut self.subtitle,
        }
    }

    /// Number of tracks of a given kind.
    pub fn count(&self, kind: TrackKind) -> usize {
        self.tracks(kind).len()
    }

    /// Total number of tracks across all kinds.
    pub fn len(&self) -> usize {
        self.video.len() + self.audio.len() + self.subtitle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a track to the collection matching its kind.
    pub fn push(&mut self, track: Track) {
        self.tracks_mut(track.kind).push(track);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_track(mut self, track: Track) -> Self {
        self.push(track);
        self
    }

    /// Iterate all tracks: video, then audio, then subtitle.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.video
            .iter()
            .chain(self.audio.iter())
            .chain(self.subtitle.iter())
    }

    /// Consume the collection, yielding all tracks in [`iter`](Self::iter) order.
    pub fn into_tracks(self) -> impl Iterator<Item = Track> {
        self.video
            .into_iter()
            .chain(self.audio)
            .chain(self.subtitle)
    }

    /// Keys that occur more than once within their kind, sorted.
    pub fn duplicate_ids(&self) -> Vec<TrackKey> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates: Vec<TrackKey> = self
            .iter()
            .map(Track::key)
            .filter(|key| !seen.insert(*key))
            .collect();
        duplicates.sort();
        duplicates.dedup();
        duplicates
    }

    /// Check the adapter contract: every track sits in the collection of its
    /// own kind and ids are unique per kind.
    pub fn validate(&self) -> Result<()> {
        for kind in TrackKind::ALL {
            if let Some(track) = self.tracks(kind).iter().find(|t| t.kind != kind) {
                return Err(Error::input(format!(
                    "{}: track {} listed under {kind}",
                    self.parser,
                    track.key()
                )));
            }
        }
        let duplicates = self.duplicate_ids();
        if let Some(key) = duplicates.first() {
            return Err(Error::input(format!(
                "{}: duplicate track {key}",
                self.parser
            )));
        }
        Ok(())
    }
}
