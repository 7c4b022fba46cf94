//! Selected / not-selected partitioning of one tool's tracks.
//!
//! All tracks live in a single arena; partition membership is a flag on
//! each entry. A track therefore belongs to exactly one partition at any
//! time, and moving it between partitions never copies it.

use mediasift_core::{MediaInfo, Parser, Track, TrackKey, TrackKind, TrackState};

use crate::expr::Expr;
use crate::language::LanguageMatcher;

#[derive(Debug, Clone)]
struct Entry {
    track: Track,
    selected: bool,
}

/// Partitions the tracks reported by one tool.
#[derive(Debug, Clone)]
pub struct TrackPartitioner {
    parser: Parser,
    entries: Vec<Entry>,
}

impl TrackPartitioner {
    pub fn new(parser: Parser) -> Self {
        Self {
            parser,
            entries: Vec::new(),
        }
    }

    /// Tool whose tracks this partitioner accepts.
    pub fn parser(&self) -> Parser {
        self.parser
    }

    /// Place each track in the selected partition when `predicate` holds,
    /// otherwise in the not-selected partition.
    pub fn classify<I, F>(&mut self, tracks: I, mut predicate: F)
    where
        I: IntoIterator<Item = Track>,
        F: FnMut(&Track) -> bool,
    {
        let before = self.entries.len();
        for track in tracks {
            let selected = predicate(&track);
            self.entries.push(Entry { track, selected });
        }
        tracing::debug!(
            parser = %self.parser,
            classified = self.entries.len() - before,
            "tracks classified"
        );
    }

    /// Fallible [`classify`](Self::classify).
    ///
    /// The first predicate error is returned and none of the tracks in this
    /// batch are added.
    pub fn try_classify<I, F, E>(&mut self, tracks: I, mut predicate: F) -> Result<(), E>
    where
        I: IntoIterator<Item = Track>,
        F: FnMut(&Track) -> Result<bool, E>,
    {
        let mut staged = Vec::new();
        for track in tracks {
            let selected = predicate(&track)?;
            staged.push(Entry { track, selected });
        }
        self.entries.extend(staged);
        Ok(())
    }

    /// Place every track on the same side.
    pub fn classify_all<I>(&mut self, tracks: I, selected: bool)
    where
        I: IntoIterator<Item = Track>,
    {
        self.classify(tracks, |_| selected);
    }

    /// Classify every track of `media`.
    ///
    /// # Panics
    ///
    /// Panics if `media` was produced by a different tool than this
    /// partitioner's.
    pub fn classify_media<F>(&mut self, media: MediaInfo, predicate: F)
    where
        F: FnMut(&Track) -> bool,
    {
        assert_eq!(
            media.parser, self.parser,
            "partitioner for {} was handed tracks from {}",
            self.parser, media.parser
        );
        self.classify(media.into_tracks(), predicate);
    }

    /// Classify by a rule tree.
    pub fn classify_expr<I>(&mut self, tracks: I, expr: &Expr, languages: &LanguageMatcher)
    where
        I: IntoIterator<Item = Track>,
    {
        self.classify(tracks, |track| expr.evaluate(track, languages));
    }

    /// Move the track with `key` into the selected (`true`) or not-selected
    /// (`false`) partition. Returns `false` if no such track exists.
    ///
    /// Moving a track to the side it is already on is a no-op.
    pub fn move_track(&mut self, key: TrackKey, to_selected: bool) -> bool {
        match self.entry_mut(key) {
            Some(entry) => {
                if entry.selected != to_selected {
                    tracing::trace!(track = %key, to_selected, "moving track");
                    entry.selected = to_selected;
                }
                true
            }
            None => false,
        }
    }

    /// Assign one state to every selected track and another to every
    /// not-selected track.
    pub fn apply_state(&mut self, selected_state: TrackState, not_selected_state: TrackState) {
        for entry in &mut self.entries {
            entry.track.state = if entry.selected {
                selected_state
            } else {
                not_selected_state
            };
        }
    }

    /// Selected tracks of `kind`, in the order they were classified.
    pub fn selected(&self, kind: TrackKind) -> impl Iterator<Item = &Track> + '_ {
        self.side(kind, true)
    }

    /// Not-selected tracks of `kind`, in the order they were classified.
    pub fn not_selected(&self, kind: TrackKind) -> impl Iterator<Item = &Track> + '_ {
        self.side(kind, false)
    }

    /// Mutable access to the selected tracks of `kind`.
    pub fn selected_mut(&mut self, kind: TrackKind) -> impl Iterator<Item = &mut Track> + '_ {
        self.entries
            .iter_mut()
            .filter(move |e| e.selected && e.track.kind == kind)
            .map(|e| &mut e.track)
    }

    pub fn selected_count(&self, kind: TrackKind) -> usize {
        self.selected(kind).count()
    }

    pub fn not_selected_count(&self, kind: TrackKind) -> usize {
        self.not_selected(kind).count()
    }

    /// `Some(true)` if the track is selected, `Some(false)` if not, `None` if
    /// the partitioner does not hold it.
    pub fn is_selected(&self, key: TrackKey) -> Option<bool> {
        self.entry(key).map(|e| e.selected)
    }

    pub fn track(&self, key: TrackKey) -> Option<&Track> {
        self.entry(key).map(|e| &e.track)
    }

    pub fn track_mut(&mut self, key: TrackKey) -> Option<&mut Track> {
        self.entry_mut(key).map(|e| &mut e.track)
    }

    /// Total number of tracks across both partitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All tracks from both partitions ordered by id, then kind.
    ///
    /// # Panics
    ///
    /// Panics if the same `(kind, id)` was classified more than once.
    pub fn flatten(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.entries.iter().map(|e| &e.track).collect();
        tracks.sort_by_key(|t| (t.id, t.kind));
        for pair in tracks.windows(2) {
            assert!(
                pair[0].key() != pair[1].key(),
                "track {} is held more than once by the {} partitioner",
                pair[0].key(),
                self.parser
            );
        }
        tracks
    }

    /// Hand back the selected and not-selected partitions, each kind ordered
    /// by id.
    pub fn into_partitions(self) -> (MediaInfo, MediaInfo) {
        let mut selected = MediaInfo::new(self.parser);
        let mut not_selected = MediaInfo::new(self.parser);
        for entry in self.entries {
            if entry.selected {
                selected.push(entry.track);
            } else {
                not_selected.push(entry.track);
            }
        }
        for kind in TrackKind::ALL {
            selected.tracks_mut(kind).sort_by_key(|t| t.id);
            not_selected.tracks_mut(kind).sort_by_key(|t| t.id);
        }
        (selected, not_selected)
    }

    fn side(&self, kind: TrackKind, selected: bool) -> impl Iterator<Item = &Track> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.selected == selected && e.track.kind == kind)
            .map(|e| &e.track)
    }

    fn entry(&self, key: TrackKey) -> Option<&Entry> {
        self.entries.iter().find(|e| e.track.key() == key)
    }

    fn entry_mut(&mut self, key: TrackKey) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.track.key() == key)
    }
}
