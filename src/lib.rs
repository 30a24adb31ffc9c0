pub mod config;
pub mod convert;
pub mod error;
pub mod fold;
pub mod lang_map;
pub mod text;
pub mod text_set;
pub mod validate;

pub use config::{Category, Config, ConfigBuilder, Flag, Flags, TagOracle};
pub use error::Error;
pub use lang_map::{CaseFoldMap, MultiLangMap};
pub use text::TaggedText;
pub use text_set::{SetOperand, TaggedTextSet};
