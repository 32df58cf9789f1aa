//! 診断ログの初期化
//!
//! 画面向けの進捗表示は `println!`、診断情報は `tracing` に出す。
//! `GEMINI_VISION_LOG` が設定されていればそちらのフィルタを優先する。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// フィルタを上書きする環境変数
pub const LOG_ENV: &str = "GEMINI_VISION_LOG";

/// 既定のフィルタ文字列
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "gemini_vision=debug"
    } else {
        "gemini_vision=warn"
    }
}

pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // 二重初期化（テスト等）は無視する
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();
}
