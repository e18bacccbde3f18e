//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use inventory_ocr::error::InventoryOcrError;
use inventory_ocr::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, InventoryOcrError::FolderNotFound(_)));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("items.csv"), "Name,Type\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let result = scanner::scan_folder(dir.path(), false);
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// Display実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        InventoryOcrError::Config("テスト設定エラー".to_string()),
        InventoryOcrError::FileNotFound("items.csv".to_string()),
        InventoryOcrError::FolderNotFound("/path/to/folder".to_string()),
        InventoryOcrError::ImageLoad("shot.png".to_string()),
        InventoryOcrError::Ocr("tesseract 失敗".to_string()),
        InventoryOcrError::NoImagesFound("フォルダ".to_string()),
        InventoryOcrError::EmptyVocabulary,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// OCRエンジン未導入時のメッセージ
#[test]
fn test_ocr_unavailable_message() {
    let err = InventoryOcrError::OcrUnavailable("tesseract".to_string());
    let display = format!("{}", err);

    assert!(display.contains("tesseract"));
    assert!(display.contains("inventory-ocr config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: InventoryOcrError = io_err.into();

    assert!(matches!(err, InventoryOcrError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: InventoryOcrError = json_err.into();

    assert!(matches!(err, InventoryOcrError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = inventory_ocr_common::Error::InvalidInput("空のトークン".to_string());
    let err: InventoryOcrError = common_err.into();

    assert!(matches!(err, InventoryOcrError::Common(_)));
    assert_eq!(format!("{}", err), "Invalid input: 空のトークン");
}
