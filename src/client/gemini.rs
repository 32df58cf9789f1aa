//! Gemini generateContent API クライアント

use super::AnalysisClient;
use crate::config::{Config, Credentials};
use crate::error::{Result, VisionError};
use crate::image_source::AnalysisRequest;
use async_trait::async_trait;
use gemini_vision_common::{
    parse_api_error, parse_response, response_outcome, GenerateContentRequest, GenerationConfig,
    InlineData, ResponseOutcome,
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error};

/// エラーボディを表示するときの最大文字数
const ERROR_BODY_PREVIEW: usize = 300;

pub struct GeminiClient {
    http: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
    model: String,
    generation_config: GenerationConfig,
}

impl GeminiClient {
    /// 認証情報と設定からクライアントを作る
    pub fn new(credentials: Credentials, config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            credentials,
            endpoint: config.endpoint(),
            model: config.model.clone(),
            generation_config: config.generation_config(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_request(&self, prompt: &str, image: InlineData) -> GenerateContentRequest {
        GenerateContentRequest::prompt_with_image(prompt, image, self.generation_config.clone())
    }

    async fn send(&self, body: &GenerateContentRequest) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.credentials.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini APIへのリクエストに失敗");
                VisionError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini APIがエラーを返した");
            return Err(status_error(status, &text));
        }

        let parsed = parse_response(&text).map_err(|e| VisionError::ApiParse(e.to_string()))?;

        match response_outcome(&parsed) {
            ResponseOutcome::Text(text) => {
                debug!(chars = text.chars().count(), "解析テキストを受信");
                Ok(text)
            }
            ResponseOutcome::Blocked(reason) => Err(VisionError::Blocked(reason)),
            ResponseOutcome::Empty { finish_reason } => Err(VisionError::EmptyResponse(
                finish_reason.unwrap_or_else(|| "UNKNOWN".to_string()),
            )),
        }
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        let image = request.image.load()?;
        debug!(
            source = request.image.kind(),
            mime_type = %image.mime_type,
            model = %self.model,
            "generateContent 呼び出し"
        );

        let body = self.build_request(&request.prompt, image);
        self.send(&body).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// HTTPステータスとボディからエラーを分類
fn status_error(status: StatusCode, body: &str) -> VisionError {
    let detail = parse_api_error(body);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(ERROR_BODY_PREVIEW).collect());

    // 無効なキーは400 INVALID_ARGUMENTで返ってくる
    let invalid_key = status == StatusCode::BAD_REQUEST && message.contains("API key not valid");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VisionError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        _ if invalid_key => VisionError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => VisionError::QuotaExceeded(message),
        _ => VisionError::ApiStatus {
            status: status.as_u16(),
            message,
        },
    }
}
