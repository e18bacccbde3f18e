//! tesseract CLI連携
//!
//! 画像を一時PNGに書き出し、`tesseract <png> stdout` の標準出力を認識結果とする。

use super::OcrEngine;
use crate::error::{InventoryOcrError, Result};
use image::GrayImage;
use std::process::Command;

pub struct TesseractCli {
    command: String,
    lang: String,
    page_seg_mode: u8,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, lang: impl Into<String>, page_seg_mode: u8) -> Self {
        Self {
            command: command.into(),
            lang: lang.into(),
            page_seg_mode,
        }
    }

    /// tesseract が実行できるか確認し、バージョン行を返す
    pub fn check_available(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|e| InventoryOcrError::OcrUnavailable(format!("{}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(InventoryOcrError::OcrUnavailable(format!(
                "{} --version が失敗しました",
                self.command
            )));
        }

        // 古いバージョンはstderrにバージョンを出力する
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).to_string()
        } else {
            String::from_utf8_lossy(&output.stdout).to_string()
        };
        Ok(text.lines().next().unwrap_or_default().trim().to_string())
    }

    fn build_command(&self, image_path: &std::path::Path) -> Command {
        let mut command = Command::new(&self.command);
        command
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.page_seg_mode.to_string());
        command
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String> {
        let temp_file = tempfile::Builder::new()
            .prefix("inventory-ocr-")
            .suffix(".png")
            .tempfile()?;

        image
            .save_with_format(temp_file.path(), image::ImageFormat::Png)
            .map_err(|e| InventoryOcrError::Ocr(format!("一時画像の保存に失敗: {}", e)))?;

        let output = self
            .build_command(temp_file.path())
            .output()
            .map_err(|e| InventoryOcrError::OcrUnavailable(format!("{}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InventoryOcrError::Ocr(format!(
                "tesseract 失敗: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
