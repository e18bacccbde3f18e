//! 出力レコードの型定義
//!
//! - AttributeValue: 属性値（数値・テキスト・フラグ）
//! - ItemName: 照合済みのアイテム名または未照合センチネル
//! - ItemRecord: 1画像 = 1アイテムの最終出力

use serde::{Deserialize, Serialize};
use std::fmt;

/// 属性値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Flag(bool),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{}", v),
            AttributeValue::Flag(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// 照合済みアイテム名
///
/// 語彙に含まれる名前か、未照合を示すセンチネルのどちらか。
/// OCRの生文字列がそのまま入ることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "name")]
pub enum ItemName {
    Known(String),
    Unmatched,
}

impl ItemName {
    pub fn is_known(&self) -> bool {
        matches!(self, ItemName::Known(_))
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            ItemName::Known(name) => Some(name),
            ItemName::Unmatched => None,
        }
    }

    /// 出力用の表示名（未照合時はラベルを使用）
    pub fn display_or<'a>(&'a self, unmatched_label: &'a str) -> &'a str {
        self.as_known().unwrap_or(unmatched_label)
    }
}

/// アイテムレコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// 元画像のファイル名
    pub source: String,

    pub name: ItemName,

    /// アイテム種別（語彙から取得）
    pub item_type: String,

    /// スキーマ順の属性値
    pub attributes: Vec<(String, AttributeValue)>,

    /// 照合時の編集距離
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

impl ItemRecord {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// CSV行に変換（Filename, Name, Item Type, 属性...）
    pub fn to_row(&self, unmatched_label: &str) -> Vec<String> {
        let mut row = Vec::with_capacity(self.attributes.len() + 3);
        row.push(self.source.clone());
        row.push(self.name.display_or(unmatched_label).to_string());
        row.push(self.item_type.clone());
        row.extend(self.attributes.iter().map(|(_, value)| value.to_string()));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::Integer(42).to_string(), "42");
        assert_eq!(AttributeValue::Flag(true).to_string(), "true");
        assert_eq!(AttributeValue::Text("Rare".into()).to_string(), "Rare");
    }

    #[test]
    fn test_item_name_display_or() {
        let known = ItemName::Known("Helmet".to_string());
        assert_eq!(known.display_or("N/A"), "Helmet");
        assert_eq!(ItemName::Unmatched.display_or("N/A"), "N/A");
    }

    #[test]
    fn test_to_row_order() {
        let record = ItemRecord {
            source: "shot1.png".to_string(),
            name: ItemName::Unmatched,
            item_type: "N/A".to_string(),
            attributes: vec![
                ("Is Radiant".to_string(), AttributeValue::Flag(false)),
                ("Weight".to_string(), AttributeValue::Integer(12)),
            ],
            distance: None,
        };

        assert_eq!(
            record.to_row("UNMATCHED"),
            vec!["shot1.png", "UNMATCHED", "N/A", "false", "12"]
        );
        assert_eq!(record.attribute("Weight"), Some(&AttributeValue::Integer(12)));
        assert_eq!(record.attribute("Durability"), None);
    }
}
