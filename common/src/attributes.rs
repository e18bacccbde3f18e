//! ツールチップ属性の定義と抽出
//!
//! インベントリのツールチップをOCRしたテキストから、
//! アイテム名候補と各属性の生値を取り出す。

use regex::Regex;
use std::collections::BTreeMap;

/// 属性の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Integer,
    Text,
    Flag,
}

/// 属性定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: String,
    pub kind: AttributeKind,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

pub const IS_RADIANT: &str = "Is Radiant";
pub const ITEM_QUALITY: &str = "Item Quality";
pub const GRADE: &str = "Grade";
pub const DESCRIPTION: &str = "Description";

const NUMERIC_ATTRIBUTES: &[&str] = &[
    "Max Rune",
    "Attack Power",
    "Physical Defense Bonus",
    "Dagger Defense",
    "Sword Defense",
    "Mace Defense",
    "Axe Defense",
    "Spear Defense",
    "Bow Defense",
    "Mirror Damage",
    "Poison Damage",
    "Fire Damage",
    "Ice Damage",
    "Lightning Damage",
    "Holy Damage",
    "HP Leech",
    "Mana Burn",
    "Strength Bonus",
    "Health Bonus",
    "Dexterity Bonus",
    "Intelligence Bonus",
    "Magic Bonus",
    "HP Bonus",
    "MP Bonus",
    "Fire Resistance",
    "Ice Resistance",
    "Lightning Resistance",
    "Holy Damage Resistance",
    "Poison Damage Resistance",
    "Curse Damage Resistance",
    "Required Magic",
    "Required Intelligence",
    "Required HP",
    "Required Strength",
    "Required Dexterity",
    "Required Level",
    "Durability",
    "Weight",
];

/// 出力対象の属性一覧（出力列順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    specs: Vec<AttributeSpec>,
}

impl Default for AttributeSchema {
    fn default() -> Self {
        let mut specs = vec![
            AttributeSpec::new(IS_RADIANT, AttributeKind::Flag),
            AttributeSpec::new(ITEM_QUALITY, AttributeKind::Text),
            AttributeSpec::new(GRADE, AttributeKind::Text),
        ];
        specs.extend(
            NUMERIC_ATTRIBUTES
                .iter()
                .map(|name| AttributeSpec::new(*name, AttributeKind::Integer)),
        );
        specs.push(AttributeSpec::new(DESCRIPTION, AttributeKind::Text));
        Self { specs }
    }
}

impl AttributeSchema {
    pub fn new(specs: Vec<AttributeSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[AttributeSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// 数値属性のラベルと単語境界つきパターン（長い順）
    fn numeric_label_patterns(&self) -> Vec<(&str, Regex)> {
        let mut labels: Vec<&str> = self
            .specs
            .iter()
            .filter(|s| s.kind == AttributeKind::Integer)
            .map(|s| s.name.as_str())
            .collect();
        labels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        labels
            .into_iter()
            .filter_map(|label| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(label)))
                    .ok()
                    .map(|re| (label, re))
            })
            .collect()
    }
}

/// ツールチップの抽出結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTooltip {
    /// アイテム名候補（照合前の生トークン）
    pub name_token: Option<String>,
    /// 属性名 → 生値
    pub raw: BTreeMap<String, String>,
}

/// ルーン不可の注記（この行があるアイテムはRadiant）
pub fn is_rune_lock_notice(line: &str) -> bool {
    lazy_static::lazy_static! {
        static ref RUNE_LOCK_RE: Regex = Regex::new(
            r"(?i)runes\s+can\W?t\s+be\s+added"
        ).unwrap();
    }

    RUNE_LOCK_RE.is_match(line)
}

fn mentions_quality(line: &str) -> bool {
    lazy_static::lazy_static! {
        static ref QUALITY_RE: Regex = Regex::new(r"(?i)\bquality\b").unwrap();
    }

    QUALITY_RE.is_match(line)
}

fn mentions_grade(line: &str) -> bool {
    lazy_static::lazy_static! {
        static ref GRADE_RE: Regex = Regex::new(r"(?i)\bgrade\b").unwrap();
    }

    GRADE_RE.is_match(line)
}

/// ラベル以降の最初の整数を取得（なければ行内の最初の整数）
fn extract_number(line: &str, label_end: usize) -> Option<String> {
    lazy_static::lazy_static! {
        static ref NUMBER_RE: Regex = Regex::new(r"\d+").unwrap();
    }

    NUMBER_RE
        .find(&line[label_end..])
        .or_else(|| NUMBER_RE.find(line))
        .map(|m| m.as_str().to_string())
}

/// 最後の `:` 以降のテキスト
fn text_after_colon(line: &str) -> String {
    line.rsplit(':').next().unwrap_or(line).trim().to_string()
}

/// OCRテキストからアイテム名候補と属性値を抽出する
pub fn parse_tooltip(text: &str, schema: &AttributeSchema) -> ParsedTooltip {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut parsed = ParsedTooltip::default();
    if lines.is_empty() {
        tracing::warn!("OCRテキストが空です");
        return parsed;
    }

    for (i, line) in lines.iter().enumerate() {
        tracing::debug!("Line {}: {}", i + 1, line);
    }

    let name_index = lines.iter().position(|line| !is_rune_lock_notice(line));
    parsed.name_token = name_index.map(|i| lines[i].to_string());

    let labels = schema.numeric_label_patterns();
    let has_quality = schema.get(ITEM_QUALITY).is_some();
    let has_grade = schema.get(GRADE).is_some();
    let mut description = None;

    for (i, line) in lines.iter().enumerate() {
        if is_rune_lock_notice(line) {
            if schema.get(IS_RADIANT).is_some() {
                parsed.raw.insert(IS_RADIANT.to_string(), "true".to_string());
            }
            continue;
        }
        if Some(i) == name_index {
            continue;
        }

        let mut labelled = false;

        // 長いラベルを優先（"Holy Damage Resistance" と "Holy Damage" の重複対策）
        // 単語の一部（"lightweight" の "weight" など）はラベルとみなさない
        if let Some((label, label_end)) = labels
            .iter()
            .find_map(|(label, re)| re.find(line).map(|m| (*label, m.end())))
        {
            labelled = true;
            if let Some(value) = extract_number(line, label_end) {
                tracing::debug!("抽出 {}: {}", label, value);
                parsed.raw.insert(label.to_string(), value);
            }
        }

        if has_quality && mentions_quality(line) {
            labelled = true;
            parsed.raw.insert(ITEM_QUALITY.to_string(), text_after_colon(line));
        }
        if has_grade && mentions_grade(line) {
            labelled = true;
            parsed.raw.insert(GRADE.to_string(), text_after_colon(line));
        }

        if !labelled {
            description = Some(*line);
        }
    }

    if let Some(description) = description {
        if schema.get(DESCRIPTION).is_some() {
            parsed.raw.insert(DESCRIPTION.to_string(), description.to_string());
        }
    }

    parsed
}
