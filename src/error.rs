use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryOcrError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("OCRエラー: {0}")]
    Ocr(String),

    #[error("OCRエンジンが利用できません: {0}。tesseract をインストールするか `inventory-ocr config --set-tesseract PATH` で指定してください")]
    OcrUnavailable(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("参照語彙が空です。`--vocab` でアイテム一覧CSVを指定してください")]
    EmptyVocabulary,

    #[error("CSV出力エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] inventory_ocr_common::Error),
}

pub type Result<T> = std::result::Result<T, InventoryOcrError>;
