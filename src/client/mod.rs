//! 画像解析クライアント
//!
//! `AnalysisClient` がAPI呼び出しの境界。本番は `GeminiClient`、
//! テストではスタブ実装に差し替える。

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use crate::image_source::AnalysisRequest;
use async_trait::async_trait;

#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// プロンプトと画像を送り、解析テキストを返す
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String>;

    /// キャッシュキーとログに使うモデル名
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: AnalysisClient + ?Sized> AnalysisClient for &T {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        (**self).analyze(request).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
