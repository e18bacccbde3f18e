//! OCR前処理
//!
//! グレースケール化 → 上部（アイテム名の領域）のコントラスト補正 → 大津の二値化

use crate::error::{InventoryOcrError, Result};
use image::{imageops, DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::contrast::{equalize_histogram, otsu_level};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// コントラスト補正をかける上部の割合（0で無効）
    pub enhance_top_fraction: f32,
    pub binarize: bool,
    /// 前処理済み画像の保存先（デバッグ用）
    pub debug_dir: Option<PathBuf>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            enhance_top_fraction: 1.0 / 3.0,
            binarize: true,
            debug_dir: None,
        }
    }
}

pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    /// 画像ファイルを読み込んで前処理する
    pub fn load_and_preprocess(&self, path: &Path) -> Result<GrayImage> {
        let image = image::open(path)
            .map_err(|e| InventoryOcrError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        let processed = self.preprocess(&image);

        if let Some(debug_dir) = &self.options.debug_dir {
            self.save_debug(&processed, debug_dir, path)?;
        }

        Ok(processed)
    }

    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        let mut gray = image.to_luma8();
        self.enhance_top(&mut gray);

        if self.options.binarize {
            binarize(&gray)
        } else {
            gray
        }
    }

    fn enhance_top(&self, gray: &mut GrayImage) {
        let fraction = self.options.enhance_top_fraction.clamp(0.0, 1.0);
        let band_height = (gray.height() as f32 * fraction) as u32;
        if band_height == 0 || gray.width() == 0 {
            return;
        }

        let band = imageops::crop_imm(&*gray, 0, 0, gray.width(), band_height).to_image();
        let enhanced = equalize_histogram(&band);
        imageops::replace(gray, &enhanced, 0, 0);
    }

    fn save_debug(&self, image: &GrayImage, debug_dir: &Path, source: &Path) -> Result<()> {
        std::fs::create_dir_all(debug_dir)?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image.png".into());
        let debug_path = debug_dir.join(format!("preprocessed_{}", file_name));

        image
            .save(&debug_path)
            .map_err(|e| InventoryOcrError::ImageLoad(format!("{}: {}", debug_path.display(), e)))?;
        tracing::debug!("前処理画像を保存: {}", debug_path.display());
        Ok(())
    }
}

/// 大津の方法で二値化
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);

    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
