use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY を設定するか、`gemini-vision config --set-api-key` で保存してください")]
    MissingApiKey,

    #[error("画像ファイルが存在しません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("Base64デコードエラー: {0}")]
    InvalidBase64(String),

    #[error("APIキーが拒否されました (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("APIの利用上限に達しました: {0}")]
    QuotaExceeded(String),

    #[error("APIエラー (HTTP {status}): {message}")]
    ApiStatus { status: u16, message: String },

    #[error("プロンプトがブロックされました: {0}")]
    Blocked(String),

    #[error("APIレスポンスにテキストがありません (finishReason: {0})")]
    EmptyResponse(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// ネットワーク越しのAPI呼び出しで発生したエラーか
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            VisionError::Unauthorized { .. }
                | VisionError::QuotaExceeded(_)
                | VisionError::ApiStatus { .. }
                | VisionError::Blocked(_)
                | VisionError::EmptyResponse(_)
                | VisionError::ApiParse(_)
                | VisionError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
