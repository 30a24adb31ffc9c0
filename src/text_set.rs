//! A set of texts sharing one language tag, with set algebra over mixed
//! operands.

use crate::{
    config::{Category, Config, Flag, Flags},
    error::Error,
    fold::{case_fold, eq_fold},
    text::TaggedText,
    validate::{validate_lang, validate_text},
};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Operand accepted by the set-algebra methods.
///
/// A raw set carries no tag and is exempt from the tag check; under `strict`
/// it is rejected instead.
#[derive(Debug, Clone)]
pub enum SetOperand {
    Raw(HashSet<String>),
    Set(TaggedTextSet),
    Text(TaggedText),
}

impl SetOperand {
    fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "a raw text set",
            Self::Set(_) => "a tagged text set",
            Self::Text(_) => "a tagged text",
        }
    }
}

impl From<HashSet<String>> for SetOperand {
    fn from(texts: HashSet<String>) -> Self {
        Self::Raw(texts)
    }
}

impl From<TaggedTextSet> for SetOperand {
    fn from(set: TaggedTextSet) -> Self {
        Self::Set(set)
    }
}

impl From<TaggedText> for SetOperand {
    fn from(text: TaggedText) -> Self {
        Self::Text(text)
    }
}

/// One language tag shared by a set of texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTextSet {
    texts: HashSet<String>,
    lang: String,
}

impl TaggedTextSet {
    /// Validating constructor. Every text and the tag pass through the
    /// text-set category switches of `cfg`.
    pub fn new<I, S>(cfg: &Config, texts: I, lang: &str) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lang = validate_lang(cfg, Category::Set, lang)?;
        let texts = texts
            .into_iter()
            .map(|text| validate_text(cfg, Category::Set, text.as_ref()))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { texts, lang })
    }

    /// Internal constructor for values already normalized by a validating
    /// entry point.
    pub(crate) fn from_parts(texts: HashSet<String>, lang: String) -> Self {
        Self { texts, lang }
    }

    #[inline]
    pub fn texts(&self) -> &HashSet<String> {
        &self.texts
    }

    #[inline]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    pub fn add_text(&mut self, cfg: &Config, text: &str) -> Result<(), Error> {
        let text = validate_text(cfg, Category::Set, text)?;
        self.texts.insert(text);
        Ok(())
    }

    /// Remove a text; fails when the (normalized) text is not present.
    pub fn remove_text(&mut self, cfg: &Config, text: &str) -> Result<(), Error> {
        let text = validate_text(cfg, Category::Set, text)?;
        if !self.texts.remove(&text) {
            return Err(Error::EntryNotFound {
                text,
                lang: self.lang.clone(),
            });
        }
        Ok(())
    }

    /// Remove a text if present; returns whether anything was removed.
    pub fn discard_text(&mut self, cfg: &Config, text: &str) -> Result<bool, Error> {
        let text = validate_text(cfg, Category::Set, text)?;
        Ok(self.texts.remove(&text))
    }

    fn check_lang(&self, other: &str) -> Result<(), Error> {
        if eq_fold(&self.lang, other) {
            Ok(())
        } else {
            Err(Error::LangMismatch {
                left: self.lang.clone(),
                right: other.to_string(),
            })
        }
    }

    fn operand_texts<'a>(
        &self,
        operand: &'a SetOperand,
        strict: bool,
    ) -> Result<Cow<'a, HashSet<String>>, Error> {
        match operand {
            SetOperand::Raw(texts) => {
                if strict {
                    return Err(Error::OperandType {
                        expected: "a tagged text set or a tagged text",
                        found: operand.kind(),
                    });
                }
                Ok(Cow::Borrowed(texts))
            }
            SetOperand::Set(set) => {
                self.check_lang(&set.lang)?;
                Ok(Cow::Borrowed(&set.texts))
            }
            SetOperand::Text(text) => {
                self.check_lang(text.lang().unwrap_or_default())?;
                let mut single = HashSet::with_capacity(1);
                single.insert(text.text().to_string());
                Ok(Cow::Owned(single))
            }
        }
    }

    /// Resolve every operand up front so a bad operand fails the whole call
    /// before any set arithmetic happens.
    fn operand_views<'a>(
        &self,
        operands: &'a [SetOperand],
        strict: bool,
    ) -> Result<SmallVec<[Cow<'a, HashSet<String>>; 4]>, Error> {
        operands
            .iter()
            .map(|operand| self.operand_texts(operand, strict))
            .collect()
    }

    pub fn union(&self, operands: &[SetOperand], strict: bool) -> Result<Self, Error> {
        let views = self.operand_views(operands, strict)?;
        let mut texts = self.texts.clone();
        for view in views {
            texts.extend(view.iter().cloned());
        }
        Ok(Self {
            texts,
            lang: self.lang.clone(),
        })
    }

    pub fn intersection(&self, operands: &[SetOperand], strict: bool) -> Result<Self, Error> {
        let views = self.operand_views(operands, strict)?;
        let mut texts = self.texts.clone();
        for view in views {
            texts.retain(|text| view.contains(text));
        }
        Ok(Self {
            texts,
            lang: self.lang.clone(),
        })
    }

    pub fn difference(&self, operands: &[SetOperand], strict: bool) -> Result<Self, Error> {
        let views = self.operand_views(operands, strict)?;
        let mut texts = self.texts.clone();
        for view in views {
            texts.retain(|text| !view.contains(text));
        }
        Ok(Self {
            texts,
            lang: self.lang.clone(),
        })
    }

    /// Pairwise symmetric difference, folded left to right.
    pub fn symmetric_difference(
        &self,
        operands: &[SetOperand],
        strict: bool,
    ) -> Result<Self, Error> {
        let views = self.operand_views(operands, strict)?;
        let mut texts = self.texts.clone();
        for view in views {
            for text in view.iter() {
                if !texts.remove(text) {
                    texts.insert(text.clone());
                }
            }
        }
        Ok(Self {
            texts,
            lang: self.lang.clone(),
        })
    }

    pub fn is_subset(&self, operand: &SetOperand, strict: bool) -> Result<bool, Error> {
        let view = self.operand_texts(operand, strict)?;
        Ok(self.texts.is_subset(view.as_ref()))
    }

    pub fn is_superset(&self, operand: &SetOperand, strict: bool) -> Result<bool, Error> {
        let view = self.operand_texts(operand, strict)?;
        Ok(self.texts.is_superset(view.as_ref()))
    }

    pub fn is_disjoint(&self, operand: &SetOperand, strict: bool) -> Result<bool, Error> {
        let view = self.operand_texts(operand, strict)?;
        Ok(self.texts.is_disjoint(view.as_ref()))
    }

    /// Group a list by case-folded tag, unioning the text sets.
    ///
    /// Same casing rule as [`TaggedText::merge`]: one distinct casing in a
    /// group is kept, divergent casings fold. Groups come out in first-seen
    /// order.
    pub fn merge(items: &[TaggedTextSet]) -> Vec<TaggedTextSet> {
        struct Group {
            texts: HashSet<String>,
            lang: String,
            diverged: bool,
        }

        let mut order: Vec<Group> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for item in items {
            match index.entry(case_fold(&item.lang)) {
                std::collections::hash_map::Entry::Occupied(slot) => {
                    let group = &mut order[*slot.get()];
                    group.texts.extend(item.texts.iter().cloned());
                    if group.lang != item.lang {
                        group.diverged = true;
                    }
                }
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(order.len());
                    order.push(Group {
                        texts: item.texts.clone(),
                        lang: item.lang.clone(),
                        diverged: false,
                    });
                }
            }
        }

        order
            .into_iter()
            .map(|group| TaggedTextSet {
                texts: group.texts,
                lang: if group.diverged {
                    case_fold(&group.lang)
                } else {
                    group.lang
                },
            })
            .collect()
    }

    fn sorted_texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = self.texts.iter().map(String::as_str).collect();
        texts.sort_unstable();
        texts
    }

    /// Render under the text-set print switches. Texts are sorted so output
    /// is deterministic.
    pub fn render(&self, flags: &Flags) -> String {
        let quotes = flags.get(Category::Set, Flag::PrintWithQuotes);
        let with_lang = flags.get(Category::Set, Flag::PrintWithLang);
        let body = self
            .sorted_texts()
            .iter()
            .map(|text| {
                if quotes {
                    format!("\"{text}\"")
                } else {
                    (*text).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!("{{{body}}}");
        if with_lang && !self.lang.is_empty() {
            out.push('@');
            out.push_str(&self.lang);
        }
        out
    }
}

/// Canonical form: `{"a", "b"}@lang`, texts sorted, the suffix only when the
/// tag is non-empty.
impl fmt::Display for TaggedTextSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, text) in self.sorted_texts().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{text}\"")?;
        }
        write!(f, "}}")?;
        if !self.lang.is_empty() {
            write!(f, "@{}", self.lang)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    fn set(texts: &[&str], lang: &str) -> TaggedTextSet {
        TaggedTextSet::new(&cfg(), texts.iter().copied(), lang).unwrap()
    }

    #[test]
    fn difference_with_case_variant_tag() {
        let left = set(&["Hello", "World"], "en");
        let right = set(&["World"], "EN");
        let out = left.difference(&[right.into()], false).unwrap();
        assert_eq!(out, set(&["Hello"], "en"));
    }

    #[test]
    fn mismatched_tag_fails() {
        let left = set(&["Hello", "World"], "en");
        let right = set(&["World"], "fr");
        assert!(matches!(
            left.difference(&[right.into()], false),
            Err(Error::LangMismatch { .. })
        ));
    }

    #[test]
    fn strict_rejects_raw_operand() {
        let left = set(&["a"], "en");
        let raw: HashSet<String> = ["a".to_string()].into();
        assert!(left.union(&[raw.clone().into()], false).is_ok());
        assert!(matches!(
            left.union(&[raw.into()], true),
            Err(Error::OperandType { .. })
        ));
    }

    #[test]
    fn tagged_text_operand_is_a_singleton() {
        let left = set(&["a", "b"], "en");
        let text = TaggedText::new(&cfg(), "b", Some("EN")).unwrap();
        let out = left.difference(&[text.into()], true).unwrap();
        assert_eq!(out, set(&["a"], "en"));
    }

    #[test]
    fn bad_operand_fails_before_any_arithmetic() {
        let left = set(&["a"], "en");
        let good = set(&["b"], "en");
        let bad = set(&["c"], "fr");
        assert!(left.union(&[good.into(), bad.into()], false).is_err());
    }

    #[test]
    fn symmetric_difference_folds_pairwise() {
        let left = set(&["a", "b"], "en");
        let out = left
            .symmetric_difference(&[set(&["b", "c"], "en").into()], false)
            .unwrap();
        assert_eq!(out, set(&["a", "c"], "en"));
    }

    #[test]
    fn subset_and_superset() {
        let small = set(&["a"], "en");
        let big = set(&["a", "b"], "en");
        assert!(small.is_subset(&big.clone().into(), false).unwrap());
        assert!(big.is_superset(&small.clone().into(), false).unwrap());
        assert!(!small.is_disjoint(&big.into(), false).unwrap());
    }

    #[test]
    fn remove_missing_text_fails_and_discard_does_not() {
        let cfg = cfg();
        let mut s = set(&["a"], "en");
        assert!(matches!(
            s.remove_text(&cfg, "zzz"),
            Err(Error::EntryNotFound { .. })
        ));
        assert!(!s.discard_text(&cfg, "zzz").unwrap());
        s.remove_text(&cfg, "a").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn merge_unions_sets_and_applies_casing_rule() {
        let items = [set(&["A"], "En"), set(&["B"], "EN"), set(&["C"], "fr")];
        let merged = TaggedTextSet::merge(&items);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].lang(), "en");
        assert_eq!(merged[0].texts().len(), 2);
        assert_eq!(merged[1].lang(), "fr");
    }

    #[test]
    fn display_sorts_texts() {
        let s = set(&["b", "a"], "en");
        assert_eq!(s.to_string(), "{\"a\", \"b\"}@en");
    }
}
