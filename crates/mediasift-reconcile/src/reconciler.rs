//! Index-parallel reconciliation of three tools' track lists.
//!
//! Tracks are aligned by position within each kind, which assumes every
//! tool lists tracks in container order. When the per-kind counts disagree
//! there is no safe alignment, so the whole file is skipped and reported.

use mediasift_core::{MediaInfo, Parser, TrackKind};
use serde::Serialize;

use crate::tagmap::{TagMap, TagMapSet, UNDEFINED_FORMAT};

/// Per-kind track counts that differed between the three tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountMismatch {
    pub kind: TrackKind,
    pub primary: usize,
    pub secondary: usize,
    pub tertiary: usize,
}

impl std::fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} track counts differ ({} / {} / {})",
            self.kind, self.primary, self.secondary, self.tertiary
        )
    }
}

/// Result of reconciling one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Every track position was folded into the maps.
    Merged { tracks: usize },
    /// Nothing was merged.
    Mismatch { kinds: Vec<CountMismatch> },
}

impl ReconcileOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Folds per-file track lists from three tools into a [`TagMapSet`].
#[derive(Debug, Clone)]
pub struct CrossToolReconciler {
    primary: Parser,
    secondary: Parser,
    tertiary: Parser,
    maps: TagMapSet,
}

impl Default for CrossToolReconciler {
    fn default() -> Self {
        Self::new(Parser::FfProbe, Parser::MkvMerge, Parser::MediaInfo)
    }
}

impl CrossToolReconciler {
    pub fn new(primary: Parser, secondary: Parser, tertiary: Parser) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
            maps: TagMapSet::new(),
        }
    }

    /// Reconcile one file.
    ///
    /// # Panics
    ///
    /// Panics if any collection was produced by a tool other than the one
    /// configured for its slot.
    pub fn reconcile(
        &mut self,
        primary: &MediaInfo,
        secondary: &MediaInfo,
        tertiary: &MediaInfo,
    ) -> ReconcileOutcome {
        for (slot, expected, info) in [
            ("primary", self.primary, primary),
            ("secondary", self.secondary, secondary),
            ("tertiary", self.tertiary, tertiary),
        ] {
            assert_eq!(
                info.parser, expected,
                "{slot} slot expects {expected} tracks, got {}",
                info.parser
            );
        }

        let mismatched: Vec<CountMismatch> = TrackKind::ALL
            .into_iter()
            .map(|kind| CountMismatch {
                kind,
                primary: primary.count(kind),
                secondary: secondary.count(kind),
                tertiary: tertiary.count(kind),
            })
            .filter(|m| m.primary != m.secondary || m.primary != m.tertiary)
            .collect();

        if !mismatched.is_empty() {
            for m in &mismatched {
                tracing::warn!(
                    kind = %m.kind,
                    primary = m.primary,
                    secondary = m.secondary,
                    tertiary = m.tertiary,
                    "track counts differ between tools, skipping reconciliation"
                );
            }
            return ReconcileOutcome::Mismatch { kinds: mismatched };
        }

        let mut tracks = 0;
        for kind in TrackKind::ALL {
            let rows = primary
                .tracks(kind)
                .iter()
                .zip(secondary.tracks(kind))
                .zip(tertiary.tracks(kind));
            for ((p, s), t) in rows {
                self.maps.observe(
                    kind,
                    TagMap {
                        primary: p.format_or(UNDEFINED_FORMAT).to_string(),
                        primary_tool: self.primary,
                        secondary: s.format_or(UNDEFINED_FORMAT).to_string(),
                        secondary_tool: self.secondary,
                        tertiary: t.format_or(UNDEFINED_FORMAT).to_string(),
                        tertiary_tool: self.tertiary,
                        count: 1,
                    },
                );
                tracks += 1;
            }
        }

        tracing::debug!(tracks, "reconciled track formats");
        ReconcileOutcome::Merged { tracks }
    }

    pub fn tag_maps(&self) -> &TagMapSet {
        &self.maps
    }

    pub fn into_tag_maps(self) -> TagMapSet {
        self.maps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasift_core::Track;

    fn info(parser: Parser, kind: TrackKind, formats: &[Option<&str>]) -> MediaInfo {
        let mut info = MediaInfo::new(parser);
        for (id, format) in formats.iter().enumerate() {
            let mut track = Track::new(kind, id as u32);
            if let Some(format) = format {
                track = track.with_format(*format);
            }
            info.push(track);
        }
        info
    }

    #[test]
    fn two_video_tracks_build_two_entries() {
        let a = info(Parser::FfProbe, TrackKind::Video, &[Some("h264"), Some("hevc")]);
        let b = info(Parser::MkvMerge, TrackKind::Video, &[Some("AVC"), Some("HEVC")]);
        let c = info(Parser::MediaInfo, TrackKind::Video, &[Some("H.264"), Some("H.265")]);

        let mut reconciler = CrossToolReconciler::default();
        let outcome = reconciler.reconcile(&a, &b, &c);
        assert_eq!(outcome, ReconcileOutcome::Merged { tracks: 2 });

        let maps = reconciler.tag_maps();
        assert_eq!(maps.len(TrackKind::Video), 2);
        let h264 = maps.get(TrackKind::Video, "H264").unwrap();
        assert_eq!(h264.count, 1);
        assert_eq!(h264.secondary, "AVC");
        assert_eq!(h264.tertiary, "H.264");
        assert_eq!(h264.tertiary_tool, Parser::MediaInfo);
        assert_eq!(maps.get(TrackKind::Video, "hevc").unwrap().tertiary, "H.265");
    }

    #[test]
    fn repeated_primary_increments_count() {
        let a = info(Parser::FfProbe, TrackKind::Audio, &[Some("aac"), Some("AAC")]);
        let b = info(Parser::MkvMerge, TrackKind::Audio, &[Some("AAC"), Some("AAC")]);
        let c = info(Parser::MediaInfo, TrackKind::Audio, &[Some("AAC LC"), Some("AAC")]);

        let mut reconciler = CrossToolReconciler::default();
        reconciler.reconcile(&a, &b, &c);
        let aac = reconciler.tag_maps().get(TrackKind::Audio, "aac").unwrap();
        assert_eq!(aac.count, 2);
        assert_eq!(aac.tertiary, "AAC LC");
    }

    #[test]
    fn missing_format_uses_placeholder() {
        let a = info(Parser::FfProbe, TrackKind::Subtitle, &[None]);
        let b = info(Parser::MkvMerge, TrackKind::Subtitle, &[Some("")]);
        let c = info(Parser::MediaInfo, TrackKind::Subtitle, &[Some("PGS")]);

        let mut reconciler = CrossToolReconciler::default();
        reconciler.reconcile(&a, &b, &c);
        let entry = reconciler
            .tag_maps()
            .get(TrackKind::Subtitle, UNDEFINED_FORMAT)
            .unwrap();
        assert_eq!(entry.secondary, UNDEFINED_FORMAT);
        assert_eq!(entry.tertiary, "PGS");
    }

    #[test]
    fn count_mismatch_skips_whole_file() {
        let mut a = info(Parser::FfProbe, TrackKind::Video, &[Some("h264")]);
        a.push(Track::new(TrackKind::Audio, 1).with_format("aac"));
        a.push(Track::new(TrackKind::Audio, 2).with_format("ac3"));
        let mut b = info(Parser::MkvMerge, TrackKind::Video, &[Some("AVC")]);
        b.push(Track::new(TrackKind::Audio, 1).with_format("AAC"));
        let mut c = info(Parser::MediaInfo, TrackKind::Video, &[Some("AVC")]);
        c.push(Track::new(TrackKind::Audio, 1).with_format("AAC"));
        c.push(Track::new(TrackKind::Audio, 2).with_format("AC-3"));

        let mut reconciler = CrossToolReconciler::default();
        let outcome = reconciler.reconcile(&a, &b, &c);
        assert_eq!(
            outcome,
            ReconcileOutcome::Mismatch {
                kinds: vec![CountMismatch {
                    kind: TrackKind::Audio,
                    primary: 2,
                    secondary: 1,
                    tertiary: 2,
                }]
            }
        );
        assert!(!outcome.is_merged());
        assert!(reconciler.tag_maps().is_empty());
    }

    #[test]
    #[should_panic(expected = "secondary slot expects mkvmerge tracks, got mediainfo")]
    fn wrong_tool_in_slot_panics() {
        let mut reconciler = CrossToolReconciler::default();
        reconciler.reconcile(
            &MediaInfo::new(Parser::FfProbe),
            &MediaInfo::new(Parser::MediaInfo),
            &MediaInfo::new(Parser::MediaInfo),
        );
    }

    #[test]
    fn custom_slot_order() {
        let a = info(Parser::MediaInfo, TrackKind::Audio, &[Some("E-AC-3")]);
        let b = info(Parser::FfProbe, TrackKind::Audio, &[Some("eac3")]);
        let c = info(Parser::MkvMerge, TrackKind::Audio, &[Some("E-AC-3")]);

        let mut reconciler =
            CrossToolReconciler::new(Parser::MediaInfo, Parser::FfProbe, Parser::MkvMerge);
        reconciler.reconcile(&a, &b, &c);
        let maps = reconciler.into_tag_maps();
        let entry = maps.get(TrackKind::Audio, "e-ac-3").unwrap();
        assert_eq!(entry.primary_tool, Parser::MediaInfo);
        assert_eq!(entry.secondary, "eac3");
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(ReconcileOutcome::Merged { tracks: 3 }).unwrap();
        assert_eq!(json["outcome"], "merged");
        assert_eq!(json["tracks"], 3);
        let mismatch = CountMismatch {
            kind: TrackKind::Video,
            primary: 1,
            secondary: 2,
            tertiary: 1,
        };
        assert_eq!(mismatch.to_string(), "video track counts differ (1 / 2 / 1)");
    }
}
