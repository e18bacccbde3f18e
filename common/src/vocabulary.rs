//! 参照語彙モジュール
//!
//! OCRで読み取ったアイテム名の照合先となる既知の名前一覧を管理する。
//! CSV（`Name`, `Type` 列）から読み込み、実行中は読み取り専用で扱う。
//!
//! 列名ラベル（`Name` 列のみのCSV）を別途読み込むと、
//! ツールチップ上の見出し文字列がアイテム名として採用されるのを防げる。

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const NAME_COLUMN: &str = "name";
const TYPE_COLUMN: &str = "type";

/// 参照語彙
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// 名前 → アイテム種別（名前順）
    entries: BTreeMap<String, String>,
    /// 名前として採用しない列名ラベル（小文字）
    column_labels: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 名前の一覧から作成（種別は空）
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .map(|name| (name, String::new()))
            .collect();

        Self {
            entries,
            column_labels: HashSet::new(),
        }
    }

    /// CSVファイルから読み込み
    pub fn from_csv(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content)
            .map_err(|e| Error::Vocabulary(format!("{}: {}", path.display(), e)))
    }

    /// CSV文字列から読み込み
    ///
    /// ヘッダーに `Name` 列が必須。`Type` 列はなくてもよい。
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut vocabulary = Self::new();
        for (name, item_type) in read_name_rows(content, true)? {
            vocabulary.entries.insert(name, item_type);
        }
        Ok(vocabulary)
    }

    /// 列名ラベルのCSVファイルを読み込む
    pub fn load_column_labels(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.load_column_labels_str(&content)
            .map_err(|e| Error::Vocabulary(format!("{}: {}", path.display(), e)))
    }

    /// 列名ラベルをCSV文字列から読み込む
    pub fn load_column_labels_str(&mut self, content: &str) -> Result<usize> {
        let rows = read_name_rows(content, false)?;
        let count = rows.len();
        self.add_column_labels(rows.into_iter().map(|(name, _)| name));
        Ok(count)
    }

    pub fn add_column_labels<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.column_labels
            .extend(labels.into_iter().map(|l| l.as_ref().trim().to_lowercase()));
    }

    /// 別の語彙を統合する（同名は後勝ち）
    pub fn merge(&mut self, other: Vocabulary) {
        self.entries.extend(other.entries);
        self.column_labels.extend(other.column_labels);
    }

    pub fn is_column_label(&self, token: &str) -> bool {
        self.column_labels.contains(&token.trim().to_lowercase())
    }

    /// 名前一覧（辞書順）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn item_type(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn column_label_count(&self) -> usize {
        self.column_labels.len()
    }
}

/// ヘッダー付きCSVから (Name, Type) の組を読み出す
fn read_name_rows(content: &str, with_type: bool) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
    };

    let name_idx = column(NAME_COLUMN)
        .ok_or_else(|| Error::Vocabulary("ヘッダーに Name 列がありません".into()))?;
    let type_idx = if with_type { column(TYPE_COLUMN) } else { None };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = match record.get(name_idx) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let item_type = type_idx
            .and_then(|idx| record.get(idx))
            .unwrap_or_default()
            .to_string();
        rows.push((name, item_type));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "Name,Type\n\
Sword of Flame,Sword\n\
Sword of Frost,Sword\n\
\"Ring, Lesser\",Ring\n\
,Empty\n";

    #[test]
    fn test_load_csv() {
        let vocab = Vocabulary::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.item_type("Sword of Flame"), Some("Sword"));
        assert_eq!(vocab.item_type("Ring, Lesser"), Some("Ring"));
    }

    #[test]
    fn test_names_sorted() {
        let vocab = Vocabulary::from_csv_str(TEST_CSV).unwrap();
        let names: Vec<&str> = vocab.names().collect();
        assert_eq!(names, vec!["Ring, Lesser", "Sword of Flame", "Sword of Frost"]);
    }

    #[test]
    fn test_missing_name_column() {
        let result = Vocabulary::from_csv_str("Title,Type\nHelmet,Armor\n");
        assert!(matches!(result, Err(Error::Vocabulary(_))));
    }

    #[test]
    fn test_type_column_optional() {
        let vocab = Vocabulary::from_csv_str("Name\nHelmet\n").unwrap();
        assert!(vocab.contains("Helmet"));
        assert_eq!(vocab.item_type("Helmet"), Some(""));
    }

    #[test]
    fn test_header_only_is_empty() {
        let vocab = Vocabulary::from_csv_str("Name,Type\n").unwrap();
        assert!(vocab.is_empty());
    }

    #[test]
    fn test_merge_later_wins() {
        let mut vocab = Vocabulary::from_csv_str("Name,Type\nHelmet,Armor\n").unwrap();
        let other = Vocabulary::from_csv_str("Name,Type\nHelmet,Headgear\nAnklet,Anklet\n").unwrap();
        vocab.merge(other);

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.item_type("Helmet"), Some("Headgear"));
    }

    #[test]
    fn test_column_labels() {
        let mut vocab = Vocabulary::from_names(["Helmet"]);
        let count = vocab
            .load_column_labels_str("Name\nAttack Power\nDurability\n")
            .unwrap();

        assert_eq!(count, 2);
        assert!(vocab.is_column_label("attack power"));
        assert!(vocab.is_column_label("  DURABILITY "));
        assert!(!vocab.is_column_label("Helmet"));
    }
}
