//! Per-file analysis combining reconciliation, track selection and bitrate
//! profiling into a single disposition report.

use std::fmt;

use mediasift_bitrate::{BitrateReport, StreamBitrateAnalyzer};
use mediasift_core::config::LanguageConfig;
use mediasift_core::{
    Config, Error, MediaInfo, Packet, Parser, Result, Track, TrackFlags, TrackKind, TrackState,
};
use mediasift_reconcile::{CrossToolReconciler, ReconcileOutcome, TagMapSet};
use mediasift_select::{Condition, Expr, LanguageMatcher, TrackPartitioner};
use serde::{Deserialize, Serialize};

/// Everything the probing tools reported for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub ffprobe: MediaInfo,
    pub mkvmerge: MediaInfo,
    pub mediainfo: MediaInfo,
    /// Packets in container order.
    #[serde(default)]
    pub packets: Vec<Packet>,
    /// Container duration in seconds, if known.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl AnalysisInput {
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Check that each collection comes from the tool named by its field and
    /// is internally consistent.
    pub fn validate(&self) -> Result<()> {
        for (expected, info) in [
            (Parser::FfProbe, &self.ffprobe),
            (Parser::MkvMerge, &self.mkvmerge),
            (Parser::MediaInfo, &self.mediainfo),
        ] {
            if info.parser != expected {
                return Err(Error::input(format!(
                    "{expected} section holds tracks reported by {}",
                    info.parser
                )));
            }
            info.validate()?;
        }
        Ok(())
    }
}

/// The rule that decides which primary-tool tracks are selected.
///
/// Video is always selected. Audio and subtitles are selected when their
/// language is kept (or undefined and `keep_undefined` is set) and they
/// carry none of the `remove_flags`.
pub fn selection_rule(languages: &LanguageConfig) -> Expr {
    let mut wanted = vec![Expr::cond(Condition::Language(languages.keep.clone()))];
    if languages.keep_undefined {
        wanted.push(Expr::cond(Condition::UndefinedLanguage));
    }
    Expr::Or(vec![
        Expr::cond(Condition::Kind(vec![TrackKind::Video])),
        Expr::And(vec![
            Expr::Or(wanted),
            Expr::negate(Expr::cond(Condition::AnyFlag(languages.remove_flags))),
        ]),
    ])
}

/// Runs the analysis for one file at a time under a fixed configuration.
#[derive(Debug, Clone)]
pub struct FileAnalysis<'a> {
    config: &'a Config,
    languages: LanguageMatcher,
    rule: Expr,
}

impl<'a> FileAnalysis<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            languages: LanguageMatcher::new(),
            rule: selection_rule(&config.languages),
        }
    }

    pub fn with_languages(mut self, languages: LanguageMatcher) -> Self {
        self.languages = languages;
        self
    }

    /// Replace the selection rule derived from the language config.
    pub fn with_rule(mut self, rule: Expr) -> Self {
        self.rule = rule;
        self
    }

    /// Configuration warnings, including whether the default language is
    /// covered by the keep list under this analysis' language matcher.
    pub fn config_warnings(&self) -> Vec<String> {
        let mut warnings = self.config.validate();
        let languages = &self.config.languages;
        let default_language = languages.default_language.trim();
        if !default_language.is_empty()
            && !self.languages.matches_any(Some(default_language), &languages.keep)
        {
            warnings.push(format!(
                "languages.default_language '{default_language}' is not covered by languages.keep"
            ));
        }
        warnings
    }

    /// Analyze one file, folding its format consensus into `tag_maps`.
    ///
    /// # Panics
    ///
    /// Panics if the input has not passed [`AnalysisInput::validate`] and
    /// holds collections from the wrong tools.
    pub fn run(&self, input: AnalysisInput, tag_maps: &mut TagMapSet) -> AnalysisReport {
        let AnalysisInput {
            ffprobe,
            mkvmerge,
            mediainfo,
            packets,
            duration,
        } = input;

        let mut reconciler = CrossToolReconciler::default();
        let reconcile = reconciler.reconcile(&ffprobe, &mkvmerge, &mediainfo);
        tag_maps.merge(reconciler.into_tag_maps());

        let languages = self.languages.distinct_languages(ffprobe.iter());

        let mut partitioner = TrackPartitioner::new(Parser::FfProbe);
        partitioner.classify_expr(ffprobe.into_tracks(), &self.rule, &self.languages);

        if partitioner.selected_count(TrackKind::Audio) == 0 {
            let first_audio = partitioner.not_selected(TrackKind::Audio).next().map(Track::key);
            if let Some(key) = first_audio {
                tracing::debug!(track = %key, "no audio track selected, keeping first audio track");
                partitioner.move_track(key, true);
            }
        }

        partitioner.apply_state(TrackState::Keep, TrackState::Remove);
        let default_audio = self.assign_default_audio(&mut partitioner);

        let mut analyzer = StreamBitrateAnalyzer::from_config(&self.config.bitrate);
        if let Some(duration) = duration {
            analyzer = analyzer.with_duration(duration);
        }
        analyzer.admit_all(&packets);
        let bitrate = analyzer.finalize();

        if bitrate.exceeds_threshold() {
            for track in partitioner.selected_mut(TrackKind::Video) {
                tracing::debug!(track = %track.key(), "bitrate over threshold, marking for re-encode");
                track.state = TrackState::ReEncode;
            }
        }

        for kind in TrackKind::ALL {
            for track in partitioner.selected_mut(kind) {
                if track.has_errors && track.state == TrackState::Keep {
                    track.state = TrackState::ReMux;
                }
            }
        }

        let (selected, removed) = partitioner.into_partitions();
        let selected_counts = KindCounts::of(&selected);
        let removed_counts = KindCounts::of(&removed);
        let mut tracks: Vec<Track> = selected.into_tracks().chain(removed.into_tracks()).collect();
        tracks.sort_by_key(|t| (t.id, t.kind));

        tracing::debug!(
            selected = selected_counts.total(),
            removed = removed_counts.total(),
            re_encode = bitrate.exceeds_threshold(),
            "file analysis complete"
        );

        AnalysisReport {
            tracks,
            selected: selected_counts,
            removed: removed_counts,
            languages,
            default_audio,
            bitrate,
            reconcile,
        }
    }

    /// Mark the preferred selected audio track as the default and clear the
    /// default flag from the other selected audio tracks.
    fn assign_default_audio(&self, partitioner: &mut TrackPartitioner) -> Option<u32> {
        let preferred = [self.config.languages.default_language.as_str()];
        let chosen = partitioner
            .selected(TrackKind::Audio)
            .find(|t| self.languages.matches_any(t.language_ietf.as_deref(), &preferred))
            .or_else(|| partitioner.selected(TrackKind::Audio).next())
            .map(|t| t.id)?;

        for track in partitioner.selected_mut(TrackKind::Audio) {
            if track.id == chosen {
                track.state = TrackState::Default;
                track.flags |= TrackFlags::DEFAULT;
            } else {
                track.flags.remove(TrackFlags::DEFAULT);
            }
        }
        Some(chosen)
    }
}

/// Track counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub video: usize,
    pub audio: usize,
    pub subtitle: usize,
}

impl KindCounts {
    fn of(info: &MediaInfo) -> Self {
        Self {
            video: info.count(TrackKind::Video),
            audio: info.count(TrackKind::Audio),
            subtitle: info.count(TrackKind::Subtitle),
        }
    }

    pub fn total(&self) -> usize {
        self.video + self.audio + self.subtitle
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} video, {} audio, {} subtitle",
            self.video, self.audio, self.subtitle
        )
    }
}

/// Disposition and bitrate summary for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Primary-tool tracks with their decided state, ordered by id.
    pub tracks: Vec<Track>,
    pub selected: KindCounts,
    pub removed: KindCounts,
    /// Distinct languages across all primary-tool tracks.
    pub languages: Vec<String>,
    /// Id of the audio track chosen as default.
    pub default_audio: Option<u32>,
    pub bitrate: BitrateReport,
    pub reconcile: ReconcileOutcome,
}

impl AnalysisReport {
    /// Tracks that end up in the output file.
    pub fn retained(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.state.is_retained())
    }

    /// Whether any track needs more than a plain keep or remove.
    pub fn needs_processing(&self) -> bool {
        self.tracks
            .iter()
            .any(|t| matches!(t.state, TrackState::ReEncode | TrackState::ReMux))
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tracks: {}", self.tracks.len())?;
        for track in &self.tracks {
            writeln!(
                f,
                "  [{}] {} {} ({}) flags={} -> {}",
                track.id,
                track.kind,
                track.format_or("unknown"),
                track.language_ietf.as_deref().unwrap_or("und"),
                track.flags,
                track.state
            )?;
        }
        writeln!(f, "Selected: {}", self.selected)?;
        writeln!(f, "Removed: {}", self.removed)?;
        writeln!(f, "Languages: {}", self.languages.join(", "))?;
        writeln!(f, "Bitrate (video): {}", self.bitrate.video)?;
        writeln!(f, "Bitrate (audio): {}", self.bitrate.audio)?;
        writeln!(f, "Bitrate (combined): {}", self.bitrate.combined)?;
        match &self.reconcile {
            ReconcileOutcome::Merged { tracks } => {
                write!(f, "Reconcile: merged {tracks} tracks")
            }
            ReconcileOutcome::Mismatch { kinds } => {
                let reasons: Vec<String> = kinds.iter().map(ToString::to_string).collect();
                write!(f, "Reconcile: skipped, {}", reasons.join("; "))
            }
        }
    }
}
