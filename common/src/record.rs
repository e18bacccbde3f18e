//! レコード生成モジュール
//!
//! 照合済みの名前と属性の生値からアイテムレコードを組み立てる。
//! 欠損値や検証に失敗した値はすべてデフォルト値で埋める（エラーにはしない）。

use crate::attributes::{AttributeKind, AttributeSchema, AttributeSpec};
use crate::error::{Error, Result};
use crate::matcher::MatchOutcome;
use crate::types::{AttributeValue, ItemRecord};
use std::collections::{BTreeMap, HashMap};

pub const FILENAME_COLUMN: &str = "Filename";
pub const NAME_COLUMN: &str = "Name";
pub const ITEM_TYPE_COLUMN: &str = "Item Type";

/// レコード生成器
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    schema: AttributeSchema,
    /// 属性ごとのデフォルト値の上書き
    overrides: HashMap<String, AttributeValue>,
    text_default: String,
    unmatched_label: String,
}

impl RecordBuilder {
    pub fn new(schema: AttributeSchema) -> Self {
        Self {
            schema,
            overrides: HashMap::new(),
            text_default: "N/A".to_string(),
            unmatched_label: "N/A".to_string(),
        }
    }

    pub fn text_default(mut self, value: impl Into<String>) -> Self {
        self.text_default = value.into();
        self
    }

    pub fn unmatched_label(mut self, value: impl Into<String>) -> Self {
        self.unmatched_label = value.into();
        self
    }

    /// 属性のデフォルト値を上書きする
    ///
    /// 値は属性の種類で解釈する。解釈できない場合や未知の属性はエラー。
    pub fn with_default(mut self, attribute: &str, raw: &str) -> Result<Self> {
        let spec = self
            .schema
            .get(attribute)
            .ok_or_else(|| Error::Config(format!("未知の属性: {}", attribute)))?;
        let value = parse_value(spec.kind, raw).ok_or_else(|| {
            Error::Config(format!("{} のデフォルト値が不正です: {:?}", attribute, raw))
        })?;
        self.overrides.insert(attribute.to_string(), value);
        Ok(self)
    }

    /// 設定の上書きマップをまとめて適用する（不正な値は警告して無視）
    pub fn with_defaults(mut self, defaults: &BTreeMap<String, String>) -> Self {
        for (attribute, raw) in defaults {
            match self.clone().with_default(attribute, raw) {
                Ok(updated) => self = updated,
                Err(e) => tracing::warn!("デフォルト値を無視します: {}", e),
            }
        }
        self
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn unmatched_label_str(&self) -> &str {
        &self.unmatched_label
    }

    /// 出力ヘッダー
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            FILENAME_COLUMN.to_string(),
            NAME_COLUMN.to_string(),
            ITEM_TYPE_COLUMN.to_string(),
        ];
        header.extend(self.schema.specs().iter().map(|s| s.name.clone()));
        header
    }

    /// 属性のデフォルト値
    pub fn default_for(&self, spec: &AttributeSpec) -> AttributeValue {
        if let Some(value) = self.overrides.get(&spec.name) {
            return value.clone();
        }
        match spec.kind {
            AttributeKind::Integer => AttributeValue::Integer(0),
            AttributeKind::Flag => AttributeValue::Flag(false),
            AttributeKind::Text => AttributeValue::Text(self.text_default.clone()),
        }
    }

    /// レコードを組み立てる
    ///
    /// `item_type` が空なら（未照合など）テキストのデフォルト値を使う。
    pub fn build(
        &self,
        source: &str,
        outcome: MatchOutcome,
        item_type: Option<&str>,
        raw: &BTreeMap<String, String>,
    ) -> ItemRecord {
        let attributes = self
            .schema
            .specs()
            .iter()
            .map(|spec| {
                let value = raw
                    .get(&spec.name)
                    .and_then(|raw_value| {
                        let parsed = parse_value(spec.kind, raw_value);
                        if parsed.is_none() {
                            tracing::debug!(
                                "{}: {} の値 {:?} が不正なためデフォルトを使用",
                                source,
                                spec.name,
                                raw_value
                            );
                        }
                        parsed
                    })
                    .unwrap_or_else(|| self.default_for(spec));
                (spec.name.clone(), value)
            })
            .collect();

        let distance = outcome.distance();
        let item_type = match (&outcome, item_type) {
            (MatchOutcome::Matched { .. }, Some(t)) if !t.trim().is_empty() => t.to_string(),
            _ => self.text_default.clone(),
        };

        ItemRecord {
            source: source.to_string(),
            name: outcome.into_item_name(),
            item_type,
            attributes,
            distance,
        }
    }
}

/// 属性の種類に応じて生値を検証・変換する
pub fn parse_value(kind: AttributeKind, raw: &str) -> Option<AttributeValue> {
    let raw = raw.trim();
    match kind {
        AttributeKind::Integer => raw
            .trim_start_matches('+')
            .parse::<i64>()
            .ok()
            .map(AttributeValue::Integer),
        AttributeKind::Flag => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(AttributeValue::Flag(true)),
            "false" | "no" | "0" => Some(AttributeValue::Flag(false)),
            _ => None,
        },
        AttributeKind::Text => {
            if raw.is_empty() {
                None
            } else {
                Some(AttributeValue::Text(raw.to_string()))
            }
        }
    }
}
