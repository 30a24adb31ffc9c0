//! Single text value paired with an optional language tag.

use crate::{
    config::{Category, Config, Flag, Flags},
    error::Error,
    fold::{case_fold, eq_fold},
    validate::{validate_lang, validate_text},
};
use std::collections::HashMap;
use std::fmt;

/// A text value and its optional language tag.
///
/// An empty tag means "no language" and is normalized to `None` at
/// construction. Derived equality is the exact sense (text and tag, tag
/// case-sensitive); [`TaggedText::same_text`] and [`TaggedText::same_lang`]
/// are the looser senses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedText {
    text: String,
    lang: Option<String>,
}

impl TaggedText {
    /// Validating constructor. Inputs pass through the single-text category
    /// switches of `cfg`.
    pub fn new(cfg: &Config, text: &str, lang: Option<&str>) -> Result<Self, Error> {
        let text = validate_text(cfg, Category::Single, text)?;
        let lang = match lang {
            Some(lang) => {
                let lang = validate_lang(cfg, Category::Single, lang)?;
                (!lang.is_empty()).then_some(lang)
            }
            None => {
                if cfg.flags.get(Category::Single, Flag::DefinedLang) {
                    return Err(Error::EmptyLang {
                        category: Category::Single,
                    });
                }
                None
            }
        };
        Ok(Self { text, lang })
    }

    /// Internal constructor for values already normalized by a validating
    /// entry point.
    pub(crate) fn from_parts(text: String, lang: Option<String>) -> Self {
        Self { text, lang }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn set_text(&mut self, cfg: &Config, text: &str) -> Result<(), Error> {
        self.text = validate_text(cfg, Category::Single, text)?;
        Ok(())
    }

    pub fn set_lang(&mut self, cfg: &Config, lang: Option<&str>) -> Result<(), Error> {
        *self = Self::new(cfg, &self.text, lang)?;
        Ok(())
    }

    /// Text-only equality, ignoring both tags.
    #[inline]
    pub fn same_text(&self, other: &Self) -> bool {
        self.text == other.text
    }

    /// Case-insensitive tag equality. An absent tag equals an absent tag.
    pub fn same_lang(&self, other: &Self) -> bool {
        eq_fold(
            self.lang.as_deref().unwrap_or_default(),
            other.lang.as_deref().unwrap_or_default(),
        )
    }

    /// Concatenate two tagged texts.
    ///
    /// The tags must be equal case-insensitively, compared after `STRIP_LANG`
    /// normalization when that switch is active; a mismatch fails with
    /// [`Error::LangMismatch`]. The result keeps the left operand's tag
    /// casing.
    pub fn concat(&self, cfg: &Config, other: &Self) -> Result<Self, Error> {
        let strip = cfg.flags.get(Category::Single, Flag::StripLang);
        fn normalize(lang: Option<&str>, strip: bool) -> &str {
            let lang = lang.unwrap_or_default();
            if strip { lang.trim() } else { lang }
        }
        let left = normalize(self.lang.as_deref(), strip);
        let right = normalize(other.lang.as_deref(), strip);
        if !eq_fold(left, right) {
            return Err(Error::LangMismatch {
                left: left.to_string(),
                right: right.to_string(),
            });
        }
        Ok(Self {
            text: format!("{}{}", self.text, other.text),
            lang: self.lang.clone(),
        })
    }

    /// Concatenate with a raw string; the tag is kept as-is.
    pub fn concat_str(&self, suffix: &str) -> Self {
        Self {
            text: format!("{}{}", self.text, suffix),
            lang: self.lang.clone(),
        }
    }

    /// Deduplicate a list by (text, case-folded tag).
    ///
    /// Within a group, one distinct tag casing is kept; divergent casings
    /// fold. Groups come out in first-seen order.
    pub fn merge(items: &[TaggedText]) -> Vec<TaggedText> {
        struct Group {
            text: String,
            lang: Option<String>,
            diverged: bool,
        }

        let mut order: Vec<Group> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for item in items {
            let folded = item.lang.as_deref().map(case_fold).unwrap_or_default();
            match index.entry((item.text.clone(), folded)) {
                std::collections::hash_map::Entry::Occupied(slot) => {
                    let group = &mut order[*slot.get()];
                    if group.lang != item.lang {
                        group.diverged = true;
                    }
                }
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(order.len());
                    order.push(Group {
                        text: item.text.clone(),
                        lang: item.lang.clone(),
                        diverged: false,
                    });
                }
            }
        }

        order
            .into_iter()
            .map(|group| TaggedText {
                text: group.text,
                lang: if group.diverged {
                    group.lang.map(|lang| case_fold(&lang))
                } else {
                    group.lang
                },
            })
            .collect()
    }

    /// Render under the single-text print switches.
    pub fn render(&self, flags: &Flags) -> String {
        let quotes = flags.get(Category::Single, Flag::PrintWithQuotes);
        let with_lang = flags.get(Category::Single, Flag::PrintWithLang);
        let mut out = if quotes {
            format!("\"{}\"", self.text)
        } else {
            self.text.clone()
        };
        if with_lang && let Some(lang) = &self.lang {
            out.push('@');
            out.push_str(lang);
        }
        out
    }
}

/// Canonical form: `"text"@lang`, the suffix only when a tag is present.
impl fmt::Display for TaggedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.text)?;
        if let Some(lang) = &self.lang {
            write!(f, "@{lang}")?;
        }
        Ok(())
    }
}
