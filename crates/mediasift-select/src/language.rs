//! IETF language tag matching.
//!
//! A configured tag acts as a prefix in the tag hierarchy: `zh` matches
//! `zh-Hans` and `zh-Hant-TW`, `en-US` matches `en-US-posix` but not `en`.
//! The hierarchy lookup itself sits behind [`TagHierarchy`] so a full
//! language-tag database can be plugged in.

use std::sync::Arc;

use mediasift_core::Track;
use unic_langid::LanguageIdentifier;

/// The undefined-language tag.
pub const UNDEFINED: &str = "und";

/// Decides whether a language tag falls under a configured prefix tag.
pub trait TagHierarchy: Send + Sync {
    /// Human-readable name identifying this hierarchy implementation.
    fn name(&self) -> &'static str;

    /// Whether `tag` is `prefix` or one of its descendants.
    fn is_match(&self, tag: &str, prefix: &str) -> bool;
}

/// Subtag-wise comparison of parsed language identifiers.
///
/// The language subtags must be equal, and every script, region and variant
/// the prefix names must be present in the tag. Tags `unic-langid` cannot
/// parse (private use, extensions) fall back to RFC 4647 basic filtering.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtagHierarchy;

impl TagHierarchy for SubtagHierarchy {
    fn name(&self) -> &'static str {
        "subtag"
    }

    fn is_match(&self, tag: &str, prefix: &str) -> bool {
        match (
            tag.trim().parse::<LanguageIdentifier>(),
            prefix.trim().parse::<LanguageIdentifier>(),
        ) {
            (Ok(tag), Ok(prefix)) => {
                tag.language == prefix.language
                    && prefix
                        .script
                        .as_ref()
                        .map_or(true, |s| tag.script.as_ref() == Some(s))
                    && prefix
                        .region
                        .as_ref()
                        .map_or(true, |r| tag.region.as_ref() == Some(r))
                    && prefix.variants().all(|v| tag.variants().any(|tv| tv == v))
            }
            _ => basic_filter(tag, prefix),
        }
    }
}

/// RFC 4647 basic filtering: equal, or the prefix followed by `-`.
fn basic_filter(tag: &str, prefix: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return false;
    }
    tag == prefix
        || tag
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
}

/// Matches track languages against configured allow-lists.
#[derive(Clone)]
pub struct LanguageMatcher {
    hierarchy: Arc<dyn TagHierarchy>,
}

impl std::fmt::Debug for LanguageMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageMatcher")
            .field("hierarchy", &self.hierarchy.name())
            .finish()
    }
}

impl Default for LanguageMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageMatcher {
    /// Create a matcher backed by [`SubtagHierarchy`].
    pub fn new() -> Self {
        Self::with_hierarchy(SubtagHierarchy)
    }

    pub fn with_hierarchy(hierarchy: impl TagHierarchy + 'static) -> Self {
        Self {
            hierarchy: Arc::new(hierarchy),
        }
    }

    /// `None`, blank, or `und` in any casing.
    pub fn is_undefined(&self, tag: Option<&str>) -> bool {
        match tag.map(str::trim) {
            None => true,
            Some(tag) => tag.is_empty() || tag.eq_ignore_ascii_case(UNDEFINED),
        }
    }

    /// Whether `tag` falls under at least one of `prefixes`.
    ///
    /// Undefined tags never match.
    pub fn matches_any<S: AsRef<str>>(&self, tag: Option<&str>, prefixes: &[S]) -> bool {
        if self.is_undefined(tag) {
            return false;
        }
        let Some(tag) = tag else {
            return false;
        };
        prefixes
            .iter()
            .map(AsRef::as_ref)
            .filter(|prefix| !prefix.trim().is_empty())
            .any(|prefix| self.hierarchy.is_match(tag, prefix))
    }

    /// Languages observed across `tracks`, deduplicated case-insensitively.
    ///
    /// The first spelling seen is kept; undefined tags are reported as `und`.
    pub fn distinct_languages<'a, I>(&self, tracks: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut languages: Vec<String> = Vec::new();
        for track in tracks {
            let tag = track.language_ietf.as_deref();
            let tag = if self.is_undefined(tag) {
                UNDEFINED
            } else {
                tag.unwrap_or(UNDEFINED).trim()
            };
            if !languages.iter().any(|l| l.eq_ignore_ascii_case(tag)) {
                languages.push(tag.to_string());
            }
        }
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasift_core::TrackKind;

    #[test]
    fn language_prefix_matches_scripts() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.matches_any(Some("zh-Hans"), &["zh"]));
        assert!(matcher.matches_any(Some("zh-Hant-TW"), &["zh"]));
        assert!(matcher.matches_any(Some("zh"), &["zh"]));
        assert!(!matcher.matches_any(Some("ja"), &["zh"]));
    }

    #[test]
    fn region_prefix_requires_region() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.matches_any(Some("en-US"), &["en-US"]));
        assert!(!matcher.matches_any(Some("en"), &["en-US"]));
        assert!(!matcher.matches_any(Some("en-GB"), &["en-US"]));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.matches_any(Some("ZH-hans"), &["zh"]));
        assert!(matcher.matches_any(Some("pt-br"), &["PT-BR"]));
    }

    #[test]
    fn any_prefix_in_list() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.matches_any(Some("fr-CA"), &["en", "fr"]));
        assert!(!matcher.matches_any(Some("fr-CA"), &["en", "de"]));
        assert!(!matcher.matches_any::<&str>(Some("fr-CA"), &[]));
    }

    #[test]
    fn unparseable_tags_use_basic_filtering() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.matches_any(Some("en-US-u-ca-gregory"), &["en"]));
        assert!(matcher.matches_any(Some("x-klingon"), &["x-klingon"]));
        assert!(!matcher.matches_any(Some("english"), &["en"]));
    }

    #[test]
    fn undefined_tags() {
        let matcher = LanguageMatcher::new();
        assert!(matcher.is_undefined(None));
        assert!(matcher.is_undefined(Some("")));
        assert!(matcher.is_undefined(Some("  ")));
        assert!(matcher.is_undefined(Some("und")));
        assert!(matcher.is_undefined(Some("UND")));
        assert!(!matcher.is_undefined(Some("en")));
        assert!(!matcher.matches_any(Some("und"), &["und"]));
    }

    #[test]
    fn blank_prefixes_are_ignored() {
        let matcher = LanguageMatcher::new();
        assert!(!matcher.matches_any(Some("en"), &[""]));
    }

    #[test]
    fn distinct_languages_dedupes() {
        let matcher = LanguageMatcher::new();
        let tracks = vec![
            Track::new(TrackKind::Audio, 1).with_language("en-US"),
            Track::new(TrackKind::Audio, 2).with_language("EN-us"),
            Track::new(TrackKind::Audio, 3),
            Track::new(TrackKind::Subtitle, 4).with_language("und"),
            Track::new(TrackKind::Subtitle, 5).with_language("zh-Hans"),
        ];
        assert_eq!(
            matcher.distinct_languages(&tracks),
            vec!["en-US".to_string(), "und".to_string(), "zh-Hans".to_string()]
        );
    }

    struct ExactOnly;

    impl TagHierarchy for ExactOnly {
        fn name(&self) -> &'static str {
            "exact"
        }

        fn is_match(&self, tag: &str, prefix: &str) -> bool {
            tag.eq_ignore_ascii_case(prefix)
        }
    }

    #[test]
    fn custom_hierarchy_is_used() {
        let matcher = LanguageMatcher::with_hierarchy(ExactOnly);
        assert!(!matcher.matches_any(Some("zh-Hans"), &["zh"]));
        assert!(matcher.matches_any(Some("zh"), &["ZH"]));
        assert_eq!(format!("{matcher:?}"), "LanguageMatcher { hierarchy: \"exact\" }");
    }
}
