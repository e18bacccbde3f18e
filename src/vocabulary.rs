//! 参照語彙の読み込み

use crate::error::{InventoryOcrError, Result};
use inventory_ocr_common::Vocabulary;
use std::path::{Path, PathBuf};

/// アイテム一覧CSVと列名ラベルCSVを読み込んで1つの語彙にまとめる
///
/// 後に指定したファイルほど優先される（同名アイテムの種別は上書き）。
pub fn load_vocabulary(files: &[PathBuf], column_names: Option<&Path>) -> Result<Vocabulary> {
    let mut vocabulary = Vocabulary::new();

    for path in files {
        if !path.exists() {
            return Err(InventoryOcrError::FileNotFound(path.display().to_string()));
        }
        let loaded = Vocabulary::from_csv(path)?;
        if loaded.is_empty() {
            tracing::warn!("アイテムが読み込めませんでした: {}", path.display());
        } else {
            tracing::info!("{}件のアイテムを読み込み: {}", loaded.len(), path.display());
        }
        vocabulary.merge(loaded);
    }

    if let Some(path) = column_names {
        if path.exists() {
            let count = vocabulary.load_column_labels(path)?;
            tracing::info!("{}件の列名ラベルを読み込み: {}", count, path.display());
        } else {
            tracing::warn!("列名ラベルCSVが見つかりません、スキップします: {}", path.display());
        }
    }

    Ok(vocabulary)
}
