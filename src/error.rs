use crate::config::{Category, Flag};
use thiserror::Error;

/// Crate-wide error type.
///
/// Variants fall into three families: shape errors (`UnsupportedFlag`,
/// `OperandType`), value errors (`EmptyText`, `EmptyLang`, `InvalidTag`,
/// `LangMismatch`, `EntryNotFound`), and missing-capability errors
/// (`OracleUnavailable`). Every failure is returned synchronously at the
/// violating call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("flag `{flag}` is not recognised for the {category} category")]
    UnsupportedFlag { category: Category, flag: Flag },

    #[error("operand must be {expected}, got {found}")]
    OperandType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("text is empty but `DEFINED_TEXT` is enabled for the {category} category")]
    EmptyText { category: Category },

    #[error("language tag is empty but `DEFINED_LANG` is enabled for the {category} category")]
    EmptyLang { category: Category },

    #[error("`{tag}` is not a valid language tag")]
    InvalidTag { tag: String },

    #[error("language tags `{left}` and `{right}` do not match")]
    LangMismatch { left: String, right: String },

    #[error("no entry `{text}`@{lang}")]
    EntryNotFound { text: String, lang: String },

    #[error("`VALID_LANG` is enforced but no tag oracle is configured")]
    OracleUnavailable,
}
