//! Pure transforms among the tagged-text representations and plain strings.
//!
//! Every function here is a structural transform: inputs are never mutated
//! and no validation switches apply (string parsing is the one entry point
//! that constructs through the validating path). Text content round-trips
//! losslessly; the original casing of a language tag does not survive a
//! transform that merges case-variant tags.

use crate::{
    config::Config,
    error::Error,
    lang_map::MultiLangMap,
    text::TaggedText,
    text_set::TaggedTextSet,
};
use std::collections::HashSet;

/// Configuration for the string renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Double-quote each text.
    pub quotes: bool,
    /// Append the `@lang` suffix.
    pub lang: bool,
    /// Joins the rendered items.
    pub separator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            quotes: true,
            lang: true,
            separator: ", ".to_string(),
        }
    }
}

fn render_one(text: &str, lang: Option<&str>, opts: &RenderOptions) -> String {
    let mut out = if opts.quotes {
        format!("\"{text}\"")
    } else {
        text.to_string()
    };
    if opts.lang && let Some(lang) = lang.filter(|lang| !lang.is_empty()) {
        out.push('@');
        out.push_str(lang);
    }
    out
}

// ──────────────────────────────────────────────────────────────
//  Into sets
// ──────────────────────────────────────────────────────────────

/// A singleton set sharing the text's tag (an absent tag becomes the empty
/// tag).
pub fn text_to_set(text: &TaggedText) -> TaggedTextSet {
    let mut texts = HashSet::with_capacity(1);
    texts.insert(text.text().to_string());
    TaggedTextSet::from_parts(texts, text.lang().unwrap_or_default().to_string())
}

/// Group a list of tagged texts into sets, one per case-folded tag, in
/// first-seen order. Divergent tag casings fold.
pub fn texts_to_sets(texts: &[TaggedText]) -> Vec<TaggedTextSet> {
    let singletons: Vec<TaggedTextSet> = texts.iter().map(text_to_set).collect();
    TaggedTextSet::merge(&singletons)
}

// ──────────────────────────────────────────────────────────────
//  Into maps
// ──────────────────────────────────────────────────────────────

pub fn text_to_map(text: &TaggedText) -> MultiLangMap {
    let mut map = MultiLangMap::new();
    map.insert_raw(
        text.lang().unwrap_or_default(),
        text.text().to_string(),
    );
    map
}

pub fn texts_to_map(texts: &[TaggedText]) -> MultiLangMap {
    let mut map = MultiLangMap::new();
    for text in texts {
        map.insert_raw(text.lang().unwrap_or_default(), text.text().to_string());
    }
    map
}

/// An empty set still registers its tag as a key.
pub fn set_to_map(set: &TaggedTextSet) -> MultiLangMap {
    let mut map = MultiLangMap::new();
    map.ensure_lang_raw(set.lang());
    for text in set.texts() {
        map.insert_raw(set.lang(), text.clone());
    }
    map
}

pub fn sets_to_map(sets: &[TaggedTextSet]) -> MultiLangMap {
    let mut map = MultiLangMap::new();
    for set in sets {
        map.ensure_lang_raw(set.lang());
        for text in set.texts() {
            map.insert_raw(set.lang(), text.clone());
        }
    }
    map
}

/// Collapse a list of maps into one by the cumulative grouping merge.
pub fn maps_to_map(maps: &[MultiLangMap]) -> MultiLangMap {
    MultiLangMap::merge(maps)
}

// ──────────────────────────────────────────────────────────────
//  Out of sets and maps
// ──────────────────────────────────────────────────────────────

/// One tagged text per set member, sharing the set's tag. Sorted by text so
/// the output is deterministic.
pub fn set_to_texts(set: &TaggedTextSet) -> Vec<TaggedText> {
    let mut texts: Vec<&String> = set.texts().iter().collect();
    texts.sort_unstable();
    let lang = (!set.lang().is_empty()).then(|| set.lang().to_string());
    texts
        .into_iter()
        .map(|text| TaggedText::from_parts(text.clone(), lang.clone()))
        .collect()
}

/// Flatten a map into tagged texts, sorted by tag then text.
pub fn map_to_texts(map: &MultiLangMap) -> Vec<TaggedText> {
    map_to_sets(map).iter().flat_map(set_to_texts).collect()
}

/// One tagged set per map key, sorted by tag.
pub fn map_to_sets(map: &MultiLangMap) -> Vec<TaggedTextSet> {
    let mut langs: Vec<&str> = map.langs().collect();
    langs.sort_unstable();
    langs
        .into_iter()
        .map(|lang| {
            let texts = map.get(lang).cloned().unwrap_or_default();
            TaggedTextSet::from_parts(texts, lang.to_string())
        })
        .collect()
}

// ──────────────────────────────────────────────────────────────
//  Strings
// ──────────────────────────────────────────────────────────────

/// Parse the canonical `"text"@lang` form; a quoted string without a tag
/// yields an untagged text, and anything else is taken as bare text.
///
/// Construction goes through the validating path with the single-text
/// category switches of `cfg`.
pub fn string_to_text(cfg: &Config, input: &str) -> Result<TaggedText, Error> {
    if let Some(rest) = input.strip_prefix('"')
        && let Some(end) = rest.rfind('"')
    {
        let text = &rest[..end];
        let after = &rest[end + 1..];
        if after.is_empty() {
            return TaggedText::new(cfg, text, None);
        }
        if let Some(lang) = after.strip_prefix('@') {
            return TaggedText::new(cfg, text, Some(lang));
        }
    }
    TaggedText::new(cfg, input, None)
}

pub fn strings_to_texts(cfg: &Config, inputs: &[&str]) -> Result<Vec<TaggedText>, Error> {
    inputs
        .iter()
        .map(|input| string_to_text(cfg, input))
        .collect()
}

/// Join a list of tagged texts into one string under `opts`.
pub fn render_texts(texts: &[TaggedText], opts: &RenderOptions) -> String {
    texts
        .iter()
        .map(|text| render_one(text.text(), text.lang(), opts))
        .collect::<Vec<_>>()
        .join(&opts.separator)
}

/// Join every entry of a map into one string under `opts`, sorted by tag
/// then text.
pub fn render_map(map: &MultiLangMap, opts: &RenderOptions) -> String {
    render_texts(&map_to_texts(map), opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn text_set_round_trip() {
        let text = TaggedText::new(&cfg(), "Hello", Some("en")).unwrap();
        let set = text_to_set(&text);
        assert_eq!(set_to_texts(&set), vec![text]);
    }

    #[test]
    fn untagged_text_round_trips_through_set() {
        let text = TaggedText::new(&cfg(), "Hello", None).unwrap();
        let set = text_to_set(&text);
        assert_eq!(set.lang(), "");
        assert_eq!(set_to_texts(&set), vec![text]);
    }

    #[test]
    fn texts_to_sets_groups_by_folded_tag() {
        let cfg = cfg();
        let texts = [
            TaggedText::new(&cfg, "a", Some("En")).unwrap(),
            TaggedText::new(&cfg, "b", Some("EN")).unwrap(),
            TaggedText::new(&cfg, "c", Some("fr")).unwrap(),
        ];
        let sets = texts_to_sets(&texts);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].lang(), "en");
        assert!(sets[0].contains("a") && sets[0].contains("b"));
        assert_eq!(sets[1].lang(), "fr");
    }

    #[test]
    fn map_round_trip_through_sets() {
        let cfg = cfg();
        let mut map = MultiLangMap::new();
        map.add_entry(&cfg, "Hello", "en").unwrap();
        map.add_entry(&cfg, "World", "en").unwrap();
        map.add_entry(&cfg, "Bonjour", "fr").unwrap();
        let rebuilt = sets_to_map(&map_to_sets(&map));
        assert_eq!(rebuilt.to_entries(), map.to_entries());
    }

    #[test]
    fn empty_set_registers_its_tag() {
        let set = TaggedTextSet::new(&cfg(), std::iter::empty::<&str>(), "en").unwrap();
        let map = set_to_map(&set);
        assert_eq!(map.len_langs(), 1);
        assert_eq!(map.get("en"), Some(&HashSet::new()));
    }

    #[test]
    fn parse_canonical_forms() {
        let cfg = cfg();
        let tagged = string_to_text(&cfg, "\"Hello\"@en").unwrap();
        assert_eq!(tagged.text(), "Hello");
        assert_eq!(tagged.lang(), Some("en"));

        let quoted = string_to_text(&cfg, "\"Hello\"").unwrap();
        assert_eq!(quoted.text(), "Hello");
        assert_eq!(quoted.lang(), None);

        let bare = string_to_text(&cfg, "Hello").unwrap();
        assert_eq!(bare.text(), "Hello");
        assert_eq!(bare.lang(), None);
    }

    #[test]
    fn parse_display_round_trip() {
        let cfg = cfg();
        let text = TaggedText::new(&cfg, "Hello, world", Some("en-GB")).unwrap();
        assert_eq!(string_to_text(&cfg, &text.to_string()).unwrap(), text);
    }

    #[test]
    fn render_respects_options() {
        let cfg = cfg();
        let texts = [
            TaggedText::new(&cfg, "a", Some("en")).unwrap(),
            TaggedText::new(&cfg, "b", None).unwrap(),
        ];
        assert_eq!(
            render_texts(&texts, &RenderOptions::default()),
            "\"a\"@en, \"b\""
        );
        let plain = RenderOptions {
            quotes: false,
            lang: false,
            separator: " | ".to_string(),
        };
        assert_eq!(render_texts(&texts, &plain), "a | b");
    }

    #[test]
    fn render_map_is_deterministic() {
        let cfg = cfg();
        let mut map = MultiLangMap::new();
        map.add_entry(&cfg, "b", "en").unwrap();
        map.add_entry(&cfg, "a", "en").unwrap();
        map.add_entry(&cfg, "x", "de").unwrap();
        assert_eq!(
            render_map(&map, &RenderOptions::default()),
            "\"x\"@de, \"a\"@en, \"b\"@en"
        );
    }
}
