//! CSV出力

use crate::error::Result;
use inventory_ocr_common::ItemRecord;
use std::io::Write;
use std::path::Path;

/// レコードをCSVファイルに書き出す
pub fn write_csv(
    records: &[ItemRecord],
    header: &[String],
    unmatched_label: &str,
    output_path: &Path,
) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv_to(file, records, header, unmatched_label)
}

/// 任意の出力先にCSVを書き出す
pub fn write_csv_to<W: Write>(
    writer: W,
    records: &[ItemRecord],
    header: &[String],
    unmatched_label: &str,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(header)?;

    for record in records {
        writer.write_record(record.to_row(unmatched_label))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_ocr_common::{AttributeValue, ItemName};

    fn record(source: &str, name: ItemName, description: &str) -> ItemRecord {
        ItemRecord {
            source: source.to_string(),
            name,
            item_type: "Sword".to_string(),
            attributes: vec![
                ("Weight".to_string(), AttributeValue::Integer(3)),
                ("Description".to_string(), AttributeValue::Text(description.to_string())),
            ],
            distance: None,
        }
    }

    #[test]
    fn test_write_csv_quotes_commas() {
        let header: Vec<String> = ["Filename", "Name", "Item Type", "Weight", "Description"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![
            record("a.png", ItemName::Known("Sword of Flame".into()), "Hot, sharp"),
            record("b.png", ItemName::Unmatched, "Plain"),
        ];

        let mut buffer = Vec::new();
        write_csv_to(&mut buffer, &records, &header, "N/A").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Filename,Name,Item Type,Weight,Description");
        assert_eq!(lines[1], "a.png,Sword of Flame,Sword,3,\"Hot, sharp\"");
        assert_eq!(lines[2], "b.png,N/A,Sword,3,Plain");
    }
}
