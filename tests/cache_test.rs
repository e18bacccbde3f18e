//! キャッシュ機能テスト
//!
//! OCR結果キャッシュの動作を検証

use inventory_ocr::cache::{compute_file_hash, content_hash, CacheFile};
use tempfile::tempdir;

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = CacheFile::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    cache.insert(
        "abc123".to_string(),
        "shot.png".to_string(),
        1024,
        "Sword of Flame\nAttack Power 120".to_string(),
    );
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("abc123"), Some("Sword of Flame\nAttack Power 120"));
    assert!(loaded.get("nonexistent_hash").is_none());
}

/// キャッシュの上書き
#[test]
fn test_cache_overwrite() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    cache.insert("same_hash".to_string(), "a.png".to_string(), 10, "first".to_string());
    cache.insert("same_hash".to_string(), "a.png".to_string(), 10, "second".to_string());

    assert_eq!(cache.get("same_hash"), Some("second"));
    assert_eq!(cache.len(), 1);
}

/// キャッシュファイルが破損している場合
#[test]
fn test_cache_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(CacheFile::cache_path(dir.path()), "{ invalid json }").unwrap();

    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// バージョンが異なるキャッシュは破棄
#[test]
fn test_cache_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        CacheFile::cache_path(dir.path()),
        r#"{"version": 99, "entries": {"h": {"file_name": "a.png", "file_size": 1, "text": "x"}}}"#,
    )
    .unwrap();

    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// キャッシュの削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");
    assert!(!CacheFile::clear(dir.path()).unwrap());

    CacheFile::default().save(dir.path()).unwrap();
    assert!(CacheFile::cache_path(dir.path()).exists());
    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(!CacheFile::cache_path(dir.path()).exists());
}

/// ファイル内容のハッシュ
#[test]
fn test_file_hash_depends_on_content() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    let c = dir.path().join("c.png");
    std::fs::write(&a, b"same bytes").unwrap();
    std::fs::write(&b, b"same bytes").unwrap();
    std::fs::write(&c, b"other bytes").unwrap();

    let hash_a = compute_file_hash(&a).unwrap();
    assert_eq!(hash_a, compute_file_hash(&b).unwrap());
    assert_ne!(hash_a, compute_file_hash(&c).unwrap());
    assert_eq!(hash_a.len(), 64);
    assert_eq!(
        content_hash(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
