//! Inventory OCR Common Library
//!
//! CLIから使う純粋ロジック（語彙照合・属性抽出・レコード生成）と共有型

pub mod types;
pub mod error;
pub mod vocabulary;
pub mod matcher;
pub mod attributes;
pub mod record;

pub use types::{AttributeValue, ItemName, ItemRecord};
pub use error::{Error, Result};
pub use vocabulary::Vocabulary;
pub use matcher::{closest_match, levenshtein, MatchOutcome, NameMatcher};
pub use attributes::{parse_tooltip, AttributeKind, AttributeSchema, AttributeSpec, ParsedTooltip};
pub use record::RecordBuilder;
