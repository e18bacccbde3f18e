use crate::error::{InventoryOcrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 照合の最大編集距離
    pub threshold: usize,
    pub case_insensitive: bool,
    /// 未照合時に Name 列へ出力する値
    pub unmatched_label: String,
    /// テキスト属性のデフォルト値
    pub text_default: String,
    /// 属性ごとのデフォルト値（属性名 → 値）
    pub attribute_defaults: BTreeMap<String, String>,
    pub tesseract_cmd: String,
    pub ocr_lang: String,
    pub page_seg_mode: u8,
    pub vocabulary_files: Vec<PathBuf>,
    pub column_names_file: Option<PathBuf>,
    /// コントラスト補正をかける上部の割合（0で無効）
    pub enhance_top_fraction: f32,
    pub binarize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 5,
            case_insensitive: true,
            unmatched_label: "N/A".into(),
            text_default: "N/A".into(),
            attribute_defaults: BTreeMap::new(),
            tesseract_cmd: "tesseract".into(),
            ocr_lang: "eng".into(),
            page_seg_mode: 6,
            vocabulary_files: Vec::new(),
            column_names_file: None,
            enhance_top_fraction: 1.0 / 3.0,
            binarize: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 設定を読み込む（壊れている場合は警告してデフォルト）
    ///
    /// `config` や `cache` サブコマンドが壊れた設定ファイルで止まらないようにする。
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                tracing::warn!("{}。デフォルト設定を使います", e);
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        match Self::load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "設定ファイルを読み込めません ({}): {}。デフォルト設定を使います",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InventoryOcrError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("inventory-ocr").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.enhance_top_fraction) {
            return Err(InventoryOcrError::Config(format!(
                "enhance_top_fraction は 0.0〜1.0 で指定してください: {}",
                self.enhance_top_fraction
            )));
        }
        if self.page_seg_mode > 13 {
            return Err(InventoryOcrError::Config(format!(
                "page_seg_mode は 0〜13 で指定してください: {}",
                self.page_seg_mode
            )));
        }
        Ok(())
    }

    /// 語彙ファイルを追加（重複は無視）
    pub fn add_vocabulary_file(&mut self, path: PathBuf) -> bool {
        if self.vocabulary_files.contains(&path) {
            return false;
        }
        self.vocabulary_files.push(path);
        true
    }
}
