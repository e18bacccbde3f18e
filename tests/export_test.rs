//! 出力機能テスト
//!
//! CSV/JSON出力とファイル名の決定を検証

use inventory_ocr::cli::ExportFormat;
use inventory_ocr::export::{export_records, resolve_output_path};
use inventory_ocr_common::{AttributeSchema, MatchOutcome, RecordBuilder};
use std::collections::BTreeMap;
use tempfile::tempdir;

fn builder() -> RecordBuilder {
    RecordBuilder::new(AttributeSchema::default())
}

fn sample_records(builder: &RecordBuilder) -> Vec<inventory_ocr_common::ItemRecord> {
    let mut raw = BTreeMap::new();
    raw.insert("Attack Power".to_string(), "120".to_string());
    raw.insert("Description".to_string(), "Hot, very hot.".to_string());

    vec![
        builder.build(
            "shot_001.png",
            MatchOutcome::Matched { name: "Sword of Flame".to_string(), distance: 1 },
            Some("Weapon"),
            &raw,
        ),
        builder.build("shot_002.png", MatchOutcome::Unmatched, None, &BTreeMap::new()),
    ]
}

/// ディレクトリを指定するとタイムスタンプ付きのCSVを作る
#[test]
fn test_export_csv_to_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let builder = builder();
    let records = sample_records(&builder);

    let path = export_records(&records, &builder, &ExportFormat::Csv, dir.path())
        .expect("CSV出力失敗");

    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("ocr_output_"));
    assert!(file_name.ends_with(".csv"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Filename,Name,Item Type,Is Radiant,Item Quality,Grade,Max Rune"));
    assert!(lines[0].ends_with(",Description"));
    assert!(lines[1].starts_with("shot_001.png,Sword of Flame,Weapon,false,N/A,N/A,0,120"));
    assert!(lines[1].ends_with(",\"Hot, very hot.\""));
    assert!(lines[2].starts_with("shot_002.png,N/A,N/A,false"));
}

/// 列数はヘッダーと一致する
#[test]
fn test_export_csv_column_count() {
    let dir = tempdir().expect("Failed to create temp dir");
    let builder = builder();
    let records = sample_records(&builder);
    let output = dir.path().join("items.csv");

    export_records(&records, &builder, &ExportFormat::Csv, &output).expect("CSV出力失敗");

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let header_len = reader.headers().unwrap().len();
    assert_eq!(header_len, builder.header().len());
    for row in reader.records() {
        assert_eq!(row.unwrap().len(), header_len);
    }
}

/// 明示したファイルパスにはそのまま出力し、親ディレクトリを作る
#[test]
fn test_export_explicit_path_creates_parent() {
    let dir = tempdir().expect("Failed to create temp dir");
    let builder = builder();
    let output = dir.path().join("nested").join("out").join("result.json");

    let path = export_records(&sample_records(&builder), &builder, &ExportFormat::Json, &output)
        .expect("JSON出力失敗");
    assert_eq!(path, output);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let items = json.as_array().expect("配列であるべき");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["source"], "shot_001.png");
    assert_eq!(items[0]["name"]["status"], "known");
    assert_eq!(items[1]["name"]["status"], "unmatched");
}

/// レコードが空でもヘッダーは出力する
#[test]
fn test_export_empty_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let builder = builder();
    let output = dir.path().join("empty.csv");

    export_records(&[], &builder, &ExportFormat::Csv, &output).expect("CSV出力失敗");

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("Filename,Name,Item Type"));
}

/// 出力パスの決定
#[test]
fn test_resolve_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");

    let resolved = resolve_output_path(dir.path(), &ExportFormat::Json);
    assert_eq!(resolved.parent(), Some(dir.path()));
    assert_eq!(resolved.extension().unwrap(), "json");

    let explicit = dir.path().join("report.csv");
    assert_eq!(resolve_output_path(&explicit, &ExportFormat::Csv), explicit);
}
