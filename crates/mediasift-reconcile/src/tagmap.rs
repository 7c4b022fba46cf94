//! Consensus map entries and their per-kind collections.

use std::collections::BTreeMap;

use mediasift_core::{Parser, TrackKind};
use serde::{Deserialize, Serialize};

/// Format recorded for a track whose tool reported no format.
pub const UNDEFINED_FORMAT: &str = "undefined";

/// What three tools reported for tracks at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMap {
    pub primary: String,
    pub primary_tool: Parser,
    pub secondary: String,
    pub secondary_tool: Parser,
    pub tertiary: String,
    pub tertiary_tool: Parser,
    /// Tracks that reported this primary format.
    pub count: u64,
}

impl TagMap {
    /// Whether all three tools report the same format, ignoring case.
    pub fn is_unanimous(&self) -> bool {
        self.primary.eq_ignore_ascii_case(&self.secondary)
            && self.primary.eq_ignore_ascii_case(&self.tertiary)
    }
}

impl std::fmt::Display for TagMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={} {}={} {}={} (x{})",
            self.primary_tool,
            self.primary,
            self.secondary_tool,
            self.secondary,
            self.tertiary_tool,
            self.tertiary,
            self.count
        )
    }
}

/// Consensus maps for every track kind.
///
/// Keys are the lowercased primary format, so lookups are case-insensitive
/// while each entry keeps the spelling first observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagMapSet {
    #[serde(default)]
    video: BTreeMap<String, TagMap>,
    #[serde(default)]
    audio: BTreeMap<String, TagMap>,
    #[serde(default)]
    subtitle: BTreeMap<String, TagMap>,
}

impl TagMapSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for a primary format, ignoring case.
    pub fn get(&self, kind: TrackKind, format: &str) -> Option<&TagMap> {
        self.map(kind).get(&format.to_lowercase())
    }

    /// Number of distinct primary formats recorded for `kind`.
    pub fn len(&self, kind: TrackKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        TrackKind::ALL.iter().all(|&kind| self.map(kind).is_empty())
    }

    /// Entries for `kind`, most common first, ties by primary format.
    pub fn entries(&self, kind: TrackKind) -> Vec<&TagMap> {
        let mut entries: Vec<&TagMap> = self.map(kind).values().collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.primary.cmp(&b.primary)));
        entries
    }

    /// Record one track position. Increments the count of an existing entry
    /// or inserts `entry` with a count of one.
    pub(crate) fn observe(&mut self, kind: TrackKind, entry: TagMap) {
        self.map_mut(kind)
            .entry(entry.primary.to_lowercase())
            .and_modify(|existing| existing.count += 1)
            .or_insert(TagMap { count: 1, ..entry });
    }

    /// Fold `other` into `self`, summing the counts of shared primaries.
    pub fn merge(&mut self, other: TagMapSet) {
        let TagMapSet {
            video,
            audio,
            subtitle,
        } = other;
        for (kind, entries) in [
            (TrackKind::Video, video),
            (TrackKind::Audio, audio),
            (TrackKind::Subtitle, subtitle),
        ] {
            let target = self.map_mut(kind);
            for (key, entry) in entries {
                match target.get_mut(&key) {
                    Some(existing) => existing.count += entry.count,
                    None => {
                        target.insert(key, entry);
                    }
                }
            }
        }
    }

    fn map(&self, kind: TrackKind) -> &BTreeMap<String, TagMap> {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
            TrackKind::Subtitle => &self.subtitle,
        }
    }

    fn map_mut(&mut self, kind: TrackKind) -> &mut BTreeMap<String, TagMap> {
        match kind {
            TrackKind::Video => &mut self.video,
            TrackKind::Audio => &mut self.audio,
            TrackKind::Subtitle => &mut self.subtitle,
        }
    }
}
