use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inventory-ocr")]
#[command(about = "インベントリのスクリーンショットからアイテム名と属性をCSVに抽出するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スクリーンショットフォルダを処理してCSVを出力
    Run {
        /// スクリーンショットフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: 入力フォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/json)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// アイテム一覧CSV（Name,Type）。複数指定可
        #[arg(long = "vocab")]
        vocab: Vec<PathBuf>,

        /// 列名ラベルCSV（アイテム名として採用しない見出し）
        #[arg(long)]
        column_names: Option<PathBuf>,

        /// 照合の最大編集距離
        #[arg(short, long)]
        threshold: Option<usize>,

        /// キャッシュを使用（再OCRをスキップ）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 画像を並列に処理
        #[arg(long)]
        parallel: bool,

        /// 前処理済み画像の保存先
        #[arg(long)]
        debug_dir: Option<PathBuf>,
    },

    /// 1つのトークンを語彙と照合して結果を表示
    Match {
        /// 照合する文字列
        #[arg(required = true)]
        token: String,

        /// アイテム一覧CSV（Name,Type）。複数指定可
        #[arg(long = "vocab")]
        vocab: Vec<PathBuf>,

        /// 照合の最大編集距離
        #[arg(short, long)]
        threshold: Option<usize>,
    },

    /// 設定を表示/編集
    Config {
        /// 照合の最大編集距離を設定
        #[arg(long)]
        set_threshold: Option<usize>,

        /// tesseract 実行ファイルを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// OCR言語を設定（例: eng）
        #[arg(long)]
        set_lang: Option<String>,

        /// 既定のアイテム一覧CSVを追加
        #[arg(long)]
        add_vocab: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv or json", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
