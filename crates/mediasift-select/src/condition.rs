//! Leaf conditions that evaluate against a single [`Track`].
//!
//! Conditions are composed into rule trees via [`Expr`](crate::Expr).

use mediasift_core::{Track, TrackFlags, TrackKind};
use serde::{Deserialize, Serialize};

use crate::language::LanguageMatcher;

/// A leaf condition that evaluates a single property of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// Matches if the track kind is in the given list.
    Kind(Vec<TrackKind>),
    /// Matches if the track language falls under any of the given tag prefixes.
    Language(Vec<String>),
    /// Matches if the track language is missing, blank or `und`.
    UndefinedLanguage,
    /// Matches if the track carries any of the given flags.
    AnyFlag(TrackFlags),
    /// Matches on the reported format (case-insensitive).
    Format(Vec<String>),
    /// Matches if the tool's error report equals the given value.
    HasErrors(bool),
}

impl Condition {
    /// Evaluate this condition against the given track.
    pub fn evaluate(&self, track: &Track, languages: &LanguageMatcher) -> bool {
        match self {
            Condition::Kind(kinds) => kinds.contains(&track.kind),
            Condition::Language(prefixes) => {
                languages.matches_any(track.language_ietf.as_deref(), prefixes)
            }
            Condition::UndefinedLanguage => languages.is_undefined(track.language_ietf.as_deref()),
            Condition::AnyFlag(flags) => track.flags.intersects(*flags),
            Condition::Format(formats) => match track.format.as_deref() {
                Some(format) => formats.iter().any(|f| f.eq_ignore_ascii_case(format)),
                None => false,
            },
            Condition::HasErrors(value) => track.has_errors == *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_track() -> Track {
        Track::new(TrackKind::Audio, 2)
            .with_format("E-AC-3")
            .with_language("en-US")
            .with_title("Commentary")
    }

    #[test]
    fn kind_matches() {
        let m = LanguageMatcher::new();
        let track = make_test_track();
        assert!(Condition::Kind(vec![TrackKind::Audio]).evaluate(&track, &m));
        assert!(!Condition::Kind(vec![TrackKind::Video, TrackKind::Subtitle]).evaluate(&track, &m));
    }

    #[test]
    fn language_matches_prefix() {
        let m = LanguageMatcher::new();
        let track = make_test_track();
        assert!(Condition::Language(vec!["en".into()]).evaluate(&track, &m));
        assert!(!Condition::Language(vec!["de".into()]).evaluate(&track, &m));
    }

    #[test]
    fn undefined_language_matches() {
        let m = LanguageMatcher::new();
        assert!(!Condition::UndefinedLanguage.evaluate(&make_test_track(), &m));
        assert!(Condition::UndefinedLanguage.evaluate(&Track::new(TrackKind::Audio, 1), &m));
    }

    #[test]
    fn any_flag_matches() {
        let m = LanguageMatcher::new();
        let track = make_test_track();
        assert!(Condition::AnyFlag(TrackFlags::COMMENTARY | TrackFlags::FORCED).evaluate(&track, &m));
        assert!(!Condition::AnyFlag(TrackFlags::FORCED).evaluate(&track, &m));
        assert!(!Condition::AnyFlag(TrackFlags::empty()).evaluate(&track, &m));
    }

    #[test]
    fn format_matches_case_insensitively() {
        let m = LanguageMatcher::new();
        let track = make_test_track();
        assert!(Condition::Format(vec!["e-ac-3".into()]).evaluate(&track, &m));
        assert!(!Condition::Format(vec!["AC-3".into()]).evaluate(&track, &m));
        assert!(!Condition::Format(vec!["AC-3".into()]).evaluate(&Track::new(TrackKind::Audio, 1), &m));
    }

    #[test]
    fn has_errors_matches() {
        let m = LanguageMatcher::new();
        let track = make_test_track().with_errors(true);
        assert!(Condition::HasErrors(true).evaluate(&track, &m));
        assert!(!Condition::HasErrors(false).evaluate(&track, &m));
    }

    #[test]
    fn serde_roundtrip_tagged() {
        let cond = Condition::Language(vec!["zh".into()]);
        let json = serde_json::to_string(&cond).unwrap();
        assert_eq!(json, r#"{"type":"language","value":["zh"]}"#);
        let back: Condition = serde_json::from_str(r#"{"type":"undefined_language"}"#).unwrap();
        assert_eq!(back, Condition::UndefinedLanguage);
    }
}
