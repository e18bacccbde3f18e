//! 一括処理パイプライン
//!
//! 画像ごとに 前処理 → OCR → 属性抽出 → 名前照合 → レコード生成 を行う。
//! 1枚の失敗は記録してスキップし、バッチ全体は止めない。

use crate::cache::{compute_file_hash, CacheFile};
use crate::error::Result;
use crate::ocr::OcrEngine;
use crate::preprocess::Preprocessor;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use inventory_ocr_common::{
    parse_tooltip, ItemRecord, MatchOutcome, NameMatcher, RecordBuilder, Vocabulary,
};
use rayon::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// 画像を並列に処理する（出力順は入力順のまま）
    pub parallel: bool,
    pub show_progress: bool,
}

/// 処理できなかった画像
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub file_name: String,
    pub error: String,
}

/// バッチ処理結果
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<ItemRecord>,
    pub failures: Vec<ItemFailure>,
    pub cache_hits: usize,
}

impl BatchReport {
    pub fn matched_count(&self) -> usize {
        self.records.iter().filter(|r| r.name.is_known()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.records.len() - self.matched_count()
    }
}

enum ItemResult {
    Done {
        record: ItemRecord,
        /// 新たにOCRした結果（ハッシュ, ファイル名, サイズ, テキスト）
        fresh: Option<(String, String, u64, String)>,
        cache_hit: bool,
    },
    Failed(ItemFailure),
}

pub struct Pipeline<'a> {
    engine: &'a dyn OcrEngine,
    preprocessor: &'a Preprocessor,
    vocabulary: &'a Vocabulary,
    matcher: NameMatcher,
    builder: &'a RecordBuilder,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        engine: &'a dyn OcrEngine,
        preprocessor: &'a Preprocessor,
        vocabulary: &'a Vocabulary,
        matcher: NameMatcher,
        builder: &'a RecordBuilder,
    ) -> Self {
        Self {
            engine,
            preprocessor,
            vocabulary,
            matcher,
            builder,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// 画像一覧を処理する
    ///
    /// `cache` を渡すと、キャッシュ済みの画像はOCRを省略し、新しい結果を追加する。
    pub fn process(&self, images: &[ImageInfo], mut cache: Option<&mut CacheFile>) -> BatchReport {
        let progress = self.progress_bar(images.len());
        let cache_view = cache.as_deref();

        let results: Vec<ItemResult> = if self.options.parallel {
            images
                .par_iter()
                .map(|image| self.process_one(image, cache_view, &progress))
                .collect()
        } else {
            images
                .iter()
                .map(|image| self.process_one(image, cache_view, &progress))
                .collect()
        };
        progress.finish_and_clear();

        let mut report = BatchReport::default();
        for result in results {
            match result {
                ItemResult::Done { record, fresh, cache_hit } => {
                    if cache_hit {
                        report.cache_hits += 1;
                    }
                    if let (Some(cache), Some((hash, file_name, size, text))) =
                        (cache.as_deref_mut(), fresh)
                    {
                        cache.insert(hash, file_name, size, text);
                    }
                    report.records.push(record);
                }
                ItemResult::Failed(failure) => report.failures.push(failure),
            }
        }

        tracing::info!(
            "処理完了: {}件 (照合 {}件, 未照合 {}件, 失敗 {}件, キャッシュ {}件)",
            report.records.len(),
            report.matched_count(),
            report.unmatched_count(),
            report.failures.len(),
            report.cache_hits
        );

        report
    }

    /// OCRテキストからレコードを作る
    pub fn build_record(&self, source: &str, text: &str) -> ItemRecord {
        let parsed = parse_tooltip(text, self.builder.schema());
        let token = parsed.name_token.as_deref().unwrap_or_default();

        // 空トークン等の照合エラーは未照合として扱う
        let outcome = match self.matcher.match_token(token, self.vocabulary) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}: 名前を照合できません ({})", source, e);
                MatchOutcome::Unmatched
            }
        };
        if !outcome.is_match() && !token.is_empty() {
            tracing::info!("{}: 語彙に一致する名前がありません: {:?}", source, token);
        }

        let item_type = outcome.name().and_then(|name| self.vocabulary.item_type(name));
        self.builder.build(source, outcome, item_type, &parsed.raw)
    }

    fn recognize(&self, image: &ImageInfo) -> Result<String> {
        let processed = self.preprocessor.load_and_preprocess(&image.path)?;
        let text = self.engine.recognize(&processed)?;
        tracing::debug!("{} OCR出力 ({}):\n{}", image.file_name, self.engine.name(), text);
        Ok(text)
    }

    fn process_one(
        &self,
        image: &ImageInfo,
        cache: Option<&CacheFile>,
        progress: &ProgressBar,
    ) -> ItemResult {
        progress.set_message(image.file_name.clone());
        let result = self.process_image(image, cache);
        progress.inc(1);
        result
    }

    fn process_image(&self, image: &ImageInfo, cache: Option<&CacheFile>) -> ItemResult {
        let hash = cache.and_then(|_| match compute_file_hash(&image.path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!("{}: ハッシュ計算に失敗、キャッシュを使いません ({})", image.file_name, e);
                None
            }
        });

        let cached = match (cache, hash.as_deref()) {
            (Some(cache), Some(hash)) => cache.get(hash).map(str::to_string),
            _ => None,
        };
        let cache_hit = cached.is_some();

        let text = match cached {
            Some(text) => text,
            None => match self.recognize(image) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("{}: スキップします ({})", image.file_name, e);
                    return ItemResult::Failed(ItemFailure {
                        file_name: image.file_name.clone(),
                        error: e.to_string(),
                    });
                }
            },
        };

        let record = self.build_record(&image.file_name, &text);

        let fresh = match hash {
            Some(hash) if !cache_hit => {
                let size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
                Some((hash, image.file_name.clone(), size, text))
            }
            _ => None,
        };

        ItemResult::Done {
            record,
            fresh,
            cache_hit,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            progress.set_style(style.progress_chars("=> "));
        }
        progress
    }
}
