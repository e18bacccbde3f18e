pub mod csv_writer;

use crate::cli::ExportFormat;
use crate::error::Result;
use inventory_ocr_common::{ItemRecord, RecordBuilder};
use std::path::{Path, PathBuf};

/// 出力パスを決定する
///
/// ディレクトリ（または拡張子なし）の場合は `ocr_output_<日時>.<拡張子>` をその中に作る。
pub fn resolve_output_path(output: &Path, format: &ExportFormat) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        output.join(format!("ocr_output_{}.{}", timestamp, format.extension()))
    } else {
        output.to_path_buf()
    }
}

pub fn export_records(
    records: &[ItemRecord],
    builder: &RecordBuilder,
    format: &ExportFormat,
    output: &Path,
) -> Result<PathBuf> {
    let output_path = resolve_output_path(output, format);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Csv => {
            csv_writer::write_csv(records, &builder.header(), builder.unmatched_label_str(), &output_path)?
        }
        ExportFormat::Json => write_json(records, &output_path)?,
    }

    tracing::info!("{}件を出力: {}", records.len(), output_path.display());
    Ok(output_path)
}

/// JSON配列として出力
pub fn write_json(records: &[ItemRecord], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
