//! OCRエンジン
//!
//! 実際の文字認識は外部エンジンに任せる。パイプラインは `OcrEngine` トレイト越しに呼び出す。

mod tesseract;

pub use tesseract::TesseractCli;

use crate::error::Result;
use image::GrayImage;

/// OCRエンジンの抽象
pub trait OcrEngine: Send + Sync {
    /// エンジン名（ログ用）
    fn name(&self) -> &str;

    /// 前処理済み画像からテキストを認識する
    fn recognize(&self, image: &GrayImage) -> Result<String>;
}
