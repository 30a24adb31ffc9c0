//! Case-insensitive mapping from language tag to a set of texts.
//!
//! [`CaseFoldMap`] is the keying primitive: a hash map over the case-folded
//! tag, each slot carrying the display casing alongside the texts. Exactly
//! one slot exists per folded tag after any mutation. [`MultiLangMap`] is
//! the public container built on it, with the flag-driven add/remove/pop
//! families and the grouping merge.

use crate::{
    config::{Category, Config},
    error::Error,
    fold::case_fold,
    text::TaggedText,
    text_set::TaggedTextSet,
    validate::{validate_lang, validate_text},
};
use std::collections::{HashMap, HashSet, hash_map::Entry};
use std::fmt;

/// Display language used when none is chosen.
pub const DEFAULT_PREFERRED: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    display: String,
    texts: HashSet<String>,
}

/// Hash map keyed by case-folded language tag.
///
/// Every lookup folds the probe tag. Insertion follows the
/// preserve-unless-conflict rule: an existing slot keeps its display casing,
/// a new slot adopts the inserted casing exactly. Conflict folding is the
/// merge operations' concern, not this map's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFoldMap {
    slots: HashMap<String, Slot>,
}

impl CaseFoldMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, lang: &str) -> Option<&HashSet<String>> {
        self.slots.get(&case_fold(lang)).map(|slot| &slot.texts)
    }

    /// The stored casing of a key, whatever casing is probed with.
    pub fn display_key(&self, lang: &str) -> Option<&str> {
        self.slots
            .get(&case_fold(lang))
            .map(|slot| slot.display.as_str())
    }

    pub fn contains_text(&self, lang: &str, text: &str) -> bool {
        self.get(lang).is_some_and(|texts| texts.contains(text))
    }

    /// Iterate (display key, texts) pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.slots
            .values()
            .map(|slot| (slot.display.as_str(), &slot.texts))
    }

    fn slot_mut(&mut self, lang: &str) -> &mut Slot {
        self.slots
            .entry(case_fold(lang))
            .or_insert_with(|| Slot {
                display: lang.to_string(),
                texts: HashSet::new(),
            })
    }

    /// Make sure a slot exists for `lang`, creating an empty one if needed.
    pub fn ensure_key(&mut self, lang: &str) {
        self.slot_mut(lang);
    }

    /// Insert one text under `lang`.
    pub fn insert_text(&mut self, lang: &str, text: String) {
        self.slot_mut(lang).texts.insert(text);
    }

    /// Insert many texts under `lang`.
    pub fn insert_texts<I>(&mut self, lang: &str, texts: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.slot_mut(lang).texts.extend(texts);
    }

    /// Remove one text. With `clean_empty`, an emptied slot is dropped;
    /// otherwise it stays as an empty set. Returns whether the text was
    /// present.
    pub fn remove_text(&mut self, lang: &str, text: &str, clean_empty: bool) -> bool {
        let folded = case_fold(lang);
        let Some(slot) = self.slots.get_mut(&folded) else {
            return false;
        };
        let removed = slot.texts.remove(text);
        if removed && clean_empty && slot.texts.is_empty() {
            self.slots.remove(&folded);
        }
        removed
    }

    /// Take every text stored under `lang`, returning the display casing and
    /// the texts. With `clean_empty` the slot itself is dropped; otherwise it
    /// stays as an empty set.
    pub fn take_key(&mut self, lang: &str, clean_empty: bool) -> Option<(String, HashSet<String>)> {
        let folded = case_fold(lang);
        if clean_empty {
            self.slots
                .remove(&folded)
                .map(|slot| (slot.display, slot.texts))
        } else {
            let slot = self.slots.get_mut(&folded)?;
            let texts = std::mem::take(&mut slot.texts);
            Some((slot.display.clone(), texts))
        }
    }
}

/// A many-language mapping: case-insensitively keyed language tags, each
/// holding a set of texts, plus a preferred display language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLangMap {
    entries: CaseFoldMap,
    preferred: String,
}

impl Default for MultiLangMap {
    fn default() -> Self {
        Self {
            entries: CaseFoldMap::new(),
            preferred: DEFAULT_PREFERRED.to_string(),
        }
    }
}

impl MultiLangMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validating constructor from a plain entry map. Case-variant keys in
    /// the input collapse into one entry.
    pub fn from_entries(
        cfg: &Config,
        entries: HashMap<String, HashSet<String>>,
    ) -> Result<Self, Error> {
        let mut map = Self::new();
        for (lang, texts) in entries {
            let lang = validate_lang(cfg, Category::Multi, &lang)?;
            map.entries.ensure_key(&lang);
            for text in texts {
                let text = validate_text(cfg, Category::Multi, &text)?;
                map.entries.insert_text(&lang, text);
            }
        }
        Ok(map)
    }

    /// Structural insert for already-normalized values; the conversion
    /// functions go through here to stay flag-independent.
    pub(crate) fn insert_raw(&mut self, lang: &str, text: String) {
        self.entries.insert_text(lang, text);
    }

    pub(crate) fn ensure_lang_raw(&mut self, lang: &str) {
        self.entries.ensure_key(lang);
    }

    // ──────────────────────────────────────────────────────────────
    //  Addition
    // ──────────────────────────────────────────────────────────────

    /// Add one (text, lang) entry.
    ///
    /// Both inputs pass through the multilanguage category switches. An
    /// existing case-variant key keeps its casing; a new key adopts the
    /// normalized tag exactly as given.
    pub fn add_entry(&mut self, cfg: &Config, text: &str, lang: &str) -> Result<(), Error> {
        let text = validate_text(cfg, Category::Multi, text)?;
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        self.entries.insert_text(&lang, text);
        Ok(())
    }

    pub fn add_text(&mut self, cfg: &Config, text: &TaggedText) -> Result<(), Error> {
        self.add_entry(cfg, text.text(), text.lang().unwrap_or_default())
    }

    /// Add every text of a tagged set. An empty set still registers its tag.
    pub fn add_text_set(&mut self, cfg: &Config, set: &TaggedTextSet) -> Result<(), Error> {
        let lang = validate_lang(cfg, Category::Multi, set.lang())?;
        self.entries.ensure_key(&lang);
        for text in set.texts() {
            let text = validate_text(cfg, Category::Multi, text)?;
            self.entries.insert_text(&lang, text);
        }
        Ok(())
    }

    /// Add every entry of another map.
    pub fn absorb(&mut self, cfg: &Config, other: &MultiLangMap) -> Result<(), Error> {
        for (lang, texts) in other.entries() {
            let lang = validate_lang(cfg, Category::Multi, lang)?;
            self.entries.ensure_key(&lang);
            for text in texts {
                let text = validate_text(cfg, Category::Multi, text)?;
                self.entries.insert_text(&lang, text);
            }
        }
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────
    //  Removal. `clean_empty` drops a key whose set becomes empty;
    //  otherwise the key stays with an empty set.
    // ──────────────────────────────────────────────────────────────

    /// Remove one exact (text, lang) entry after normalization; a missing
    /// entry fails with [`Error::EntryNotFound`].
    pub fn remove_entry(
        &mut self,
        cfg: &Config,
        text: &str,
        lang: &str,
        clean_empty: bool,
    ) -> Result<(), Error> {
        let text = validate_text(cfg, Category::Multi, text)?;
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        if !self.entries.remove_text(&lang, &text, clean_empty) {
            return Err(Error::EntryNotFound { text, lang });
        }
        Ok(())
    }

    /// Remove one entry if present; returns whether anything was removed.
    pub fn discard_entry(
        &mut self,
        cfg: &Config,
        text: &str,
        lang: &str,
        clean_empty: bool,
    ) -> Result<bool, Error> {
        let text = validate_text(cfg, Category::Multi, text)?;
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        Ok(self.entries.remove_text(&lang, &text, clean_empty))
    }

    /// Remove every text stored under a tag; returns whether the tag was
    /// present.
    pub fn discard_lang(
        &mut self,
        cfg: &Config,
        lang: &str,
        clean_empty: bool,
    ) -> Result<bool, Error> {
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        Ok(self.entries.take_key(&lang, clean_empty).is_some())
    }

    /// Remove the entry matching a tagged text.
    pub fn discard_text(
        &mut self,
        cfg: &Config,
        text: &TaggedText,
        clean_empty: bool,
    ) -> Result<bool, Error> {
        self.discard_entry(cfg, text.text(), text.lang().unwrap_or_default(), clean_empty)
    }

    /// Remove every (text, lang) entry present in another map.
    pub fn discard_map(
        &mut self,
        cfg: &Config,
        other: &MultiLangMap,
        clean_empty: bool,
    ) -> Result<(), Error> {
        for (lang, texts) in other.entries() {
            for text in texts {
                self.discard_entry(cfg, text, lang, clean_empty)?;
            }
        }
        Ok(())
    }

    /// Remove one exact entry and return it, tagged with the key's display
    /// casing.
    pub fn pop_entry(
        &mut self,
        cfg: &Config,
        text: &str,
        lang: &str,
        clean_empty: bool,
    ) -> Result<Option<TaggedText>, Error> {
        let text = validate_text(cfg, Category::Multi, text)?;
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        let display = self.entries.display_key(&lang).map(str::to_string);
        if !self.entries.remove_text(&lang, &text, clean_empty) {
            return Ok(None);
        }
        let display = display.unwrap_or(lang);
        Ok(Some(TaggedText::from_parts(
            text,
            (!display.is_empty()).then_some(display),
        )))
    }

    /// Remove every text under a tag and return them as a tagged set.
    pub fn pop_lang(
        &mut self,
        cfg: &Config,
        lang: &str,
        clean_empty: bool,
    ) -> Result<Option<TaggedTextSet>, Error> {
        let lang = validate_lang(cfg, Category::Multi, lang)?;
        Ok(self
            .entries
            .take_key(&lang, clean_empty)
            .map(|(display, texts)| TaggedTextSet::from_parts(texts, display)))
    }

    /// Split the entries of the given tags off into a new map.
    pub fn pop_langs(
        &mut self,
        cfg: &Config,
        langs: &[&str],
        clean_empty: bool,
    ) -> Result<MultiLangMap, Error> {
        let mut out = MultiLangMap::new();
        for lang in langs {
            let lang = validate_lang(cfg, Category::Multi, lang)?;
            if let Some((display, texts)) = self.entries.take_key(&lang, clean_empty) {
                out.entries.insert_texts(&display, texts);
            }
        }
        Ok(out)
    }

    // ──────────────────────────────────────────────────────────────
    //  Lookup. Tag comparisons are case-insensitive throughout.
    // ──────────────────────────────────────────────────────────────

    pub fn contains_entry(&self, text: &str, lang: &str) -> bool {
        self.entries.contains_text(lang, text)
    }

    pub fn contains_text_in_any_lang(&self, text: &str) -> bool {
        self.entries.iter().any(|(_, texts)| texts.contains(text))
    }

    /// `true` iff every text of the operand set is present under the
    /// matching tag. Vacuously true for an empty operand.
    pub fn contains_text_set(&self, set: &TaggedTextSet) -> bool {
        set.texts()
            .iter()
            .all(|text| self.contains_entry(text, set.lang()))
    }

    pub fn get(&self, lang: &str) -> Option<&HashSet<String>> {
        self.entries.get(lang)
    }

    /// The stored casing of a tag, whatever casing is probed with.
    pub fn display_lang(&self, lang: &str) -> Option<&str> {
        self.entries.display_key(lang)
    }

    pub fn langs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(lang, _)| lang)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.entries.iter()
    }

    /// Display-keyed snapshot of the entries.
    pub fn to_entries(&self) -> HashMap<String, HashSet<String>> {
        self.entries
            .iter()
            .map(|(lang, texts)| (lang.to_string(), texts.clone()))
            .collect()
    }

    #[inline]
    pub fn len_langs(&self) -> usize {
        self.entries.len()
    }

    pub fn len_texts(&self) -> usize {
        self.entries.iter().map(|(_, texts)| texts.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn preferred(&self) -> &str {
        &self.preferred
    }

    pub fn set_preferred(&mut self, cfg: &Config, lang: &str) -> Result<(), Error> {
        self.preferred = validate_lang(cfg, Category::Multi, lang)?;
        Ok(())
    }

    /// Texts stored under the preferred language, if any.
    pub fn preferred_texts(&self) -> Option<&HashSet<String>> {
        self.entries.get(&self.preferred)
    }

    // ──────────────────────────────────────────────────────────────
    //  Merge
    // ──────────────────────────────────────────────────────────────

    /// Group candidate (tag, texts) pairs by case-folded tag.
    ///
    /// A group whose occurrences share one casing keeps it; divergent
    /// casings fold the output key. Values union.
    pub fn merge_language_entries<I>(candidates: I) -> HashMap<String, HashSet<String>>
    where
        I: IntoIterator<Item = (String, HashSet<String>)>,
    {
        struct Group {
            display: String,
            diverged: bool,
            texts: HashSet<String>,
        }

        let mut groups: HashMap<String, Group> = HashMap::new();
        for (lang, texts) in candidates {
            match groups.entry(case_fold(&lang)) {
                Entry::Occupied(mut slot) => {
                    let group = slot.get_mut();
                    group.texts.extend(texts);
                    if group.display != lang {
                        group.diverged = true;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(Group {
                        display: lang,
                        diverged: false,
                        texts,
                    });
                }
            }
        }

        groups
            .into_values()
            .map(|group| {
                let key = if group.diverged {
                    case_fold(&group.display)
                } else {
                    group.display
                };
                (key, group.texts)
            })
            .collect()
    }

    /// Cumulative left-fold of [`MultiLangMap::merge_language_entries`] over
    /// every input's entries. The result's preferred language is the first
    /// input's.
    pub fn merge(maps: &[MultiLangMap]) -> MultiLangMap {
        let mut acc: HashMap<String, HashSet<String>> = HashMap::new();
        for map in maps {
            acc = Self::merge_language_entries(acc.into_iter().chain(map.to_entries()));
        }

        let mut out = MultiLangMap::new();
        if let Some(first) = maps.first() {
            out.preferred = first.preferred.clone();
        }
        for (lang, texts) in acc {
            out.entries.insert_texts(&lang, texts);
        }
        out
    }
}

/// Deterministic form: keys and texts sorted, e.g.
/// `{en: {"Hello"}, fr: {"Bonjour"}}`.
impl fmt::Display for MultiLangMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.langs().collect();
        keys.sort_unstable();
        write!(f, "{{")?;
        for (i, lang) in keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let mut texts: Vec<&str> = self
                .get(lang)
                .map(|texts| texts.iter().map(String::as_str).collect())
                .unwrap_or_default();
            texts.sort_unstable();
            write!(f, "{lang}: {{")?;
            for (j, text) in texts.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "\"{text}\"")?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}
