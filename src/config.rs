//! Validation and normalization switches.
//!
//! One [`Flag`] kind serves all four [`Category`] scopes; the registry is a
//! dense boolean matrix and a write to the global scope fans out to the three
//! entity scopes through an explicit expansion table. There is no process
//! -wide state: a [`Config`] is built once and passed by reference to every
//! validating constructor and mutator.

use crate::error::Error;
use std::fmt;
use std::sync::Arc;

/// Scope a switch applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Writes here fan out to `Single`, `Set`, and `Multi`.
    Global,
    /// Single tagged text values.
    Single,
    /// Tagged text sets.
    Set,
    /// Multilanguage maps.
    Multi,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Global, Self::Single, Self::Set, Self::Multi];

    /// Targets of a global write.
    const CASCADE: [Category; 3] = [Self::Single, Self::Set, Self::Multi];

    #[inline(always)]
    const fn index(self) -> usize {
        match self {
            Self::Global => 0,
            Self::Single => 1,
            Self::Set => 2,
            Self::Multi => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Single => "single-text",
            Self::Set => "text-set",
            Self::Multi => "multilanguage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named boolean switch controlling validation, normalization, or
/// rendering behaviour for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Reject empty text.
    DefinedText,
    /// Reject an empty language tag.
    DefinedLang,
    /// Check tags against the configured [`TagOracle`].
    ValidLang,
    /// Trim surrounding whitespace from text.
    StripText,
    /// Trim surrounding whitespace from language tags.
    StripLang,
    /// Case-fold language tags on input.
    LowercaseLang,
    /// Render texts double-quoted. Single and Set categories only.
    PrintWithQuotes,
    /// Render the `@lang` suffix. Single and Set categories only.
    PrintWithLang,
}

const FLAG_COUNT: usize = 8;

impl Flag {
    pub const ALL: [Flag; FLAG_COUNT] = [
        Self::DefinedText,
        Self::DefinedLang,
        Self::ValidLang,
        Self::StripText,
        Self::StripLang,
        Self::LowercaseLang,
        Self::PrintWithQuotes,
        Self::PrintWithLang,
    ];

    #[inline(always)]
    const fn index(self) -> usize {
        match self {
            Self::DefinedText => 0,
            Self::DefinedLang => 1,
            Self::ValidLang => 2,
            Self::StripText => 3,
            Self::StripLang => 4,
            Self::LowercaseLang => 5,
            Self::PrintWithQuotes => 6,
            Self::PrintWithLang => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DefinedText => "DEFINED_TEXT",
            Self::DefinedLang => "DEFINED_LANG",
            Self::ValidLang => "VALID_LANG",
            Self::StripText => "STRIP_TEXT",
            Self::StripLang => "STRIP_LANG",
            Self::LowercaseLang => "LOWERCASE_LANG",
            Self::PrintWithQuotes => "PRINT_WITH_QUOTES",
            Self::PrintWithLang => "PRINT_WITH_LANG",
        }
    }

    /// The print switches only exist for the single-text and text-set
    /// categories.
    #[inline]
    pub const fn supported_in(self, category: Category) -> bool {
        match self {
            Self::PrintWithQuotes | Self::PrintWithLang => {
                matches!(category, Category::Single | Category::Set)
            }
            _ => true,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense switch matrix over (category, flag).
///
/// The matrix is `Copy`; cloning it yields an independent snapshot a caller
/// can inspect or stash. Every switch defaults to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    states: [[bool; FLAG_COUNT]; 4],
}

impl Flags {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one switch.
    ///
    /// A write to [`Category::Global`] fans out atomically to the same
    /// switch in every entity category. A (category, flag) pair the matrix
    /// does not recognise fails with [`Error::UnsupportedFlag`].
    pub fn set(&mut self, category: Category, flag: Flag, state: bool) -> Result<(), Error> {
        if !flag.supported_in(category) {
            return Err(Error::UnsupportedFlag { category, flag });
        }
        self.states[category.index()][flag.index()] = state;
        if category == Category::Global {
            for target in Category::CASCADE {
                self.states[target.index()][flag.index()] = state;
            }
        }
        Ok(())
    }

    /// Current state of one switch. Unsupported pairs read as `false`.
    #[inline]
    pub fn get(&self, category: Category, flag: Flag) -> bool {
        flag.supported_in(category) && self.states[category.index()][flag.index()]
    }

    /// Every supported (category, flag) pair with its current state.
    pub fn entries(&self) -> impl Iterator<Item = (Category, Flag, bool)> + '_ {
        Category::ALL.into_iter().flat_map(move |category| {
            Flag::ALL
                .into_iter()
                .filter(move |flag| flag.supported_in(category))
                .map(move |flag| (category, flag, self.get(category, flag)))
        })
    }

    /// Restore every category to its defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restore one category to its defaults.
    pub fn reset_category(&mut self, category: Category) {
        self.states[category.index()] = [false; FLAG_COUNT];
    }
}

/// Injected "is this a well-formed language tag" capability.
///
/// Consulted only while [`Flag::ValidLang`] is active. The crate ships no
/// implementation; callers wire in whatever tag registry they trust.
pub trait TagOracle: Send + Sync {
    fn is_valid(&self, tag: &str) -> bool;
}

impl<F> TagOracle for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    #[inline]
    fn is_valid(&self, tag: &str) -> bool {
        self(tag)
    }
}

/// Configuration carried by reference through every validating call.
#[derive(Clone, Default)]
pub struct Config {
    pub flags: Flags,
    oracle: Option<Arc<dyn TagOracle>>,
    strict_oracle: bool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    #[inline]
    pub fn oracle(&self) -> Option<&dyn TagOracle> {
        self.oracle.as_deref()
    }

    /// When `true`, a missing oracle under [`Flag::ValidLang`] is a hard
    /// failure instead of a warn-and-skip.
    #[inline]
    pub fn strict_oracle(&self) -> bool {
        self.strict_oracle
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("flags", &self.flags)
            .field("oracle", &self.oracle.as_ref().map(|_| "<injected>"))
            .field("strict_oracle", &self.strict_oracle)
            .finish()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    flags: Flags,
    oracle: Option<Arc<dyn TagOracle>>,
    strict_oracle: bool,
}

impl ConfigBuilder {
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Convenience passthrough to [`Flags::set`].
    pub fn flag(mut self, category: Category, flag: Flag, state: bool) -> Result<Self, Error> {
        self.flags.set(category, flag, state)?;
        Ok(self)
    }

    pub fn oracle(mut self, oracle: Arc<dyn TagOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn strict_oracle(mut self, strict: bool) -> Self {
        self.strict_oracle = strict;
        self
    }

    pub fn build(self) -> Config {
        Config {
            flags: self.flags,
            oracle: self.oracle,
            strict_oracle: self.strict_oracle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_write_cascades_to_entity_categories() {
        let mut flags = Flags::new();
        flags
            .set(Category::Global, Flag::LowercaseLang, true)
            .unwrap();
        for category in Category::ALL {
            assert!(flags.get(category, Flag::LowercaseLang));
        }
    }

    #[test]
    fn entity_write_does_not_cascade() {
        let mut flags = Flags::new();
        flags.set(Category::Set, Flag::StripText, true).unwrap();
        assert!(flags.get(Category::Set, Flag::StripText));
        assert!(!flags.get(Category::Global, Flag::StripText));
        assert!(!flags.get(Category::Single, Flag::StripText));
        assert!(!flags.get(Category::Multi, Flag::StripText));
    }

    #[test]
    fn print_flags_rejected_outside_single_and_set() {
        let mut flags = Flags::new();
        assert_eq!(
            flags.set(Category::Global, Flag::PrintWithQuotes, true),
            Err(Error::UnsupportedFlag {
                category: Category::Global,
                flag: Flag::PrintWithQuotes,
            })
        );
        assert_eq!(
            flags.set(Category::Multi, Flag::PrintWithLang, true),
            Err(Error::UnsupportedFlag {
                category: Category::Multi,
                flag: Flag::PrintWithLang,
            })
        );
        flags
            .set(Category::Single, Flag::PrintWithQuotes, true)
            .unwrap();
        flags.set(Category::Set, Flag::PrintWithLang, true).unwrap();
    }

    #[test]
    fn reset_category_leaves_others_untouched() {
        let mut flags = Flags::new();
        flags.set(Category::Global, Flag::StripLang, true).unwrap();
        flags.reset_category(Category::Set);
        assert!(!flags.get(Category::Set, Flag::StripLang));
        assert!(flags.get(Category::Single, Flag::StripLang));
        assert!(flags.get(Category::Multi, Flag::StripLang));
        flags.reset();
        assert!(flags.entries().all(|(_, _, state)| !state));
    }

    #[test]
    fn entries_skips_unsupported_pairs() {
        let flags = Flags::new();
        // 6 shared switches in 4 categories, 2 print switches in 2.
        assert_eq!(flags.entries().count(), 6 * 4 + 2 * 2);
    }

    #[test]
    fn builder_wires_oracle_and_strictness() {
        let cfg = Config::builder()
            .flag(Category::Global, Flag::ValidLang, true)
            .unwrap()
            .oracle(Arc::new(|tag: &str| tag == "en"))
            .strict_oracle(true)
            .build();
        assert!(cfg.flags.get(Category::Multi, Flag::ValidLang));
        assert!(cfg.oracle().unwrap().is_valid("en"));
        assert!(!cfg.oracle().unwrap().is_valid("zz"));
        assert!(cfg.strict_oracle());
    }
}
