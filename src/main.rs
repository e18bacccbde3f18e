use anyhow::Context;
use clap::Parser;
use inventory_ocr::{cache, cli, config, error, export, ocr, pipeline, preprocess, scanner, vocabulary};
use inventory_ocr_common::{AttributeSchema, MatchOutcome, NameMatcher, RecordBuilder};
use cli::{Cli, Commands};
use config::Config;
use error::InventoryOcrError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    inventory_ocr::init_tracing(cli.verbose);
    // 設定の修復やキャッシュ削除は壊れた設定ファイルでも実行できるようにする
    let config = match cli.command {
        Commands::Config { .. } | Commands::Cache { .. } => Config::load_or_default(),
        _ => Config::load().context("設定の読み込みに失敗しました")?,
    };

    match cli.command {
        Commands::Run {
            folder,
            output,
            format,
            vocab,
            column_names,
            threshold,
            use_cache,
            recursive,
            parallel,
            debug_dir,
        } => {
            println!("🎒 inventory-ocr - スクリーンショット解析\n");

            // 1. 参照語彙
            println!("[1/4] 参照語彙を読み込み中...");
            let vocab_files = if vocab.is_empty() {
                config.vocabulary_files.clone()
            } else {
                vocab
            };
            let column_names = column_names.or_else(|| config.column_names_file.clone());
            let vocabulary = vocabulary::load_vocabulary(&vocab_files, column_names.as_deref())?;
            if vocabulary.is_empty() {
                return Err(InventoryOcrError::EmptyVocabulary.into());
            }
            println!("✔ {}件のアイテム名を読み込み\n", vocabulary.len());

            // 2. 画像スキャン
            println!("[2/4] スクリーンショットをスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(InventoryOcrError::NoImagesFound(folder.display().to_string()).into());
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 3. OCR・照合
            println!("[3/4] OCR中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let engine = ocr::TesseractCli::new(
                config.tesseract_cmd.as_str(),
                config.ocr_lang.as_str(),
                config.page_seg_mode,
            );
            let version = engine.check_available()?;
            tracing::info!("OCRエンジン: {}", version);

            let preprocessor = preprocess::Preprocessor::new(preprocess::PreprocessOptions {
                enhance_top_fraction: config.enhance_top_fraction,
                binarize: config.binarize,
                debug_dir,
            });
            let matcher = NameMatcher::new(threshold.unwrap_or(config.threshold))
                .case_insensitive(config.case_insensitive);
            let builder = RecordBuilder::new(AttributeSchema::default())
                .text_default(config.text_default.as_str())
                .unmatched_label(config.unmatched_label.as_str())
                .with_defaults(&config.attribute_defaults);

            let pipeline = pipeline::Pipeline::new(&engine, &preprocessor, &vocabulary, matcher, &builder)
                .with_options(pipeline::PipelineOptions {
                    parallel,
                    show_progress: true,
                });

            let mut ocr_cache = use_cache.then(|| cache::CacheFile::load(&folder));
            let report = pipeline.process(&images, ocr_cache.as_mut());

            if let Some(ocr_cache) = &ocr_cache {
                if let Err(e) = ocr_cache.save(&folder) {
                    tracing::warn!("キャッシュを保存できません: {}", e);
                }
            }

            println!(
                "✔ {}件を処理 (照合 {}件 / 未照合 {}件)",
                report.records.len(),
                report.matched_count(),
                report.unmatched_count()
            );
            if !report.failures.is_empty() {
                println!("⚠ {}枚をスキップ:", report.failures.len());
                for failure in &report.failures {
                    println!("  - {}: {}", failure.file_name, failure.error);
                }
            }
            println!();

            // 4. 出力
            println!("[4/4] {}を出力中...", format.extension().to_uppercase());
            let output_dir = output.unwrap_or_else(|| folder.clone());
            let output_path = export::export_records(&report.records, &builder, &format, &output_dir)
                .with_context(|| format!("出力に失敗しました: {}", output_dir.display()))?;
            println!("✔ 結果を保存: {}", output_path.display());

            println!("\n✅ 完了");
        }

        Commands::Match { token, vocab, threshold } => {
            let vocab_files = if vocab.is_empty() {
                config.vocabulary_files.clone()
            } else {
                vocab
            };
            let vocabulary =
                vocabulary::load_vocabulary(&vocab_files, config.column_names_file.as_deref())?;
            let matcher = NameMatcher::new(threshold.unwrap_or(config.threshold))
                .case_insensitive(config.case_insensitive);

            match matcher.match_token(&token, &vocabulary)? {
                MatchOutcome::Matched { name, distance } => {
                    let item_type = vocabulary.item_type(&name).unwrap_or_default();
                    println!("✔ {} [{}] (距離 {})", name, item_type, distance);
                }
                MatchOutcome::Unmatched => {
                    println!(
                        "✘ 一致なし (閾値 {}, 語彙 {}件)",
                        matcher.threshold(),
                        vocabulary.len()
                    );
                }
            }
        }

        Commands::Config { set_threshold, set_tesseract, set_lang, add_vocab, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(threshold) = set_threshold {
                config.threshold = threshold;
                changed = true;
                println!("✔ 閾値を {} に設定しました", threshold);
            }
            if let Some(command) = set_tesseract {
                println!("✔ tesseract を {} に設定しました", command);
                config.tesseract_cmd = command;
                changed = true;
            }
            if let Some(lang) = set_lang {
                println!("✔ OCR言語を {} に設定しました", lang);
                config.ocr_lang = lang;
                changed = true;
            }
            if let Some(path) = add_vocab {
                if config.add_vocabulary_file(path.clone()) {
                    println!("✔ アイテム一覧を追加しました: {}", path.display());
                    changed = true;
                } else {
                    println!("登録済みです: {}", path.display());
                }
            }

            if changed {
                config.save()?;
            }

            if show {
                println!("設定:");
                println!("  閾値: {}", config.threshold);
                println!("  大文字小文字を無視: {}", config.case_insensitive);
                println!("  未照合ラベル: {}", config.unmatched_label);
                println!("  テキスト既定値: {}", config.text_default);
                println!("  tesseract: {} (言語 {}, psm {})", config.tesseract_cmd, config.ocr_lang, config.page_seg_mode);
                println!("  アイテム一覧: {}件", config.vocabulary_files.len());
                for path in &config.vocabulary_files {
                    println!("    - {}", path.display());
                }
                if let Some(path) = &config.column_names_file {
                    println!("  列名ラベル: {}", path.display());
                }
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = cache::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = cache::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match cache::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
