//! Flag-driven text and language-tag validation.
//!
//! Free functions rather than a carrier type: every validating constructor
//! and mutator in the crate funnels its inputs through these two entry
//! points with its own [`Category`].

use crate::{
    config::{Category, Config, Flag},
    error::Error,
    fold::case_fold,
};
use tracing::warn;

/// Normalize and validate a text value for `category`.
///
/// The `DEFINED_TEXT` check always inspects the trimmed form; the returned
/// string is trimmed only when `STRIP_TEXT` is active.
pub fn validate_text(cfg: &Config, category: Category, text: &str) -> Result<String, Error> {
    let trimmed = text.trim();
    if cfg.flags.get(category, Flag::DefinedText) && trimmed.is_empty() {
        return Err(Error::EmptyText { category });
    }
    Ok(if cfg.flags.get(category, Flag::StripText) {
        trimmed.to_string()
    } else {
        text.to_string()
    })
}

/// Normalize and validate a language tag for `category`.
///
/// Applies `STRIP_LANG`, then `LOWERCASE_LANG`, then the `DEFINED_LANG`
/// emptiness check, then the `VALID_LANG` oracle check. A missing oracle is
/// a hard failure only under strict enforcement; otherwise the check is
/// skipped with a warning.
pub fn validate_lang(cfg: &Config, category: Category, lang: &str) -> Result<String, Error> {
    let stripped = if cfg.flags.get(category, Flag::StripLang) {
        lang.trim()
    } else {
        lang
    };
    let normalized = if cfg.flags.get(category, Flag::LowercaseLang) {
        case_fold(stripped)
    } else {
        stripped.to_string()
    };

    if cfg.flags.get(category, Flag::DefinedLang) && normalized.is_empty() {
        return Err(Error::EmptyLang { category });
    }

    if cfg.flags.get(category, Flag::ValidLang) {
        match cfg.oracle() {
            Some(oracle) => {
                if !oracle.is_valid(&normalized) {
                    return Err(Error::InvalidTag { tag: normalized });
                }
            }
            None if cfg.strict_oracle() => return Err(Error::OracleUnavailable),
            None => {
                warn!(tag = %normalized, "no tag oracle configured, skipping VALID_LANG check");
            }
        }
    }

    Ok(normalized)
}
