use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gemini-vision")]
#[command(about = "Gemini画像解析ツール（単体解析・フォルダ一括解析）", long_about = None)]
pub struct Cli {
    /// 省略時はデモを実行
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 使用するモデル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// サンプル画像とサンプルフォルダでデモを実行
    Demo {
        /// サンプル画像（デフォルト: sample_image.jpg）
        #[arg(long)]
        image: Option<PathBuf>,

        /// サンプルフォルダ（デフォルト: images）
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// 画像1枚を解析
    Analyze {
        /// 画像ファイル（--as base64 の場合はBase64テキストのファイル）
        #[arg(required = true)]
        image: PathBuf,

        /// 解析プロンプト
        #[arg(short, long)]
        prompt: Option<String>,

        /// 入力の渡し方 (path/decoded/base64)
        #[arg(long = "as", value_enum, default_value_t = InputMode::Path)]
        input: InputMode,
    },

    /// フォルダ内の画像を一括解析
    Batch {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 解析プロンプト
        #[arg(short, long)]
        prompt: Option<String>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// キャッシュを使用（再解析をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを保存（値を省略すると入力を求める）
        #[arg(long, num_args = 0..=1, value_name = "KEY")]
        set_api_key: Option<Option<String>>,

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

/// `analyze` の入力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// ファイルパスをそのまま渡す
    #[default]
    Path,
    /// 読み込んでデコードした画像を渡す
    Decoded,
    /// ファイル内容をBase64文字列（Data URL可）として渡す
    Base64,
}
