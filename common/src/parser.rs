//! APIレスポンスパーサー
//!
//! generateContent のレスポンスボディから解析テキストを取り出す

use crate::error::{Error, Result};
use crate::types::{ApiErrorBody, ApiErrorDetail, GenerateContentResponse};

/// レスポンスの判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// 解析テキスト
    Text(String),
    /// プロンプトがブロックされた（blockReason）
    Blocked(String),
    /// テキストが含まれない
    Empty { finish_reason: Option<String> },
}

/// レスポンスボディ文字列をパース
///
/// # Examples
/// ```
/// use gemini_vision_common::parse_response;
///
/// let body = r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#;
/// let response = parse_response(body).unwrap();
/// assert_eq!(response.candidates.len(), 1);
/// ```
pub fn parse_response(body: &str) -> Result<GenerateContentResponse> {
    serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("レスポンスJSONパースエラー: {}", e)))
}

/// 先頭候補のテキストパートを連結して返す
///
/// 判定順:
/// 1. promptFeedback.blockReason があれば Blocked
/// 2. 先頭候補のテキストパートを連結（空白のみなら Empty）
pub fn response_outcome(response: &GenerateContentResponse) -> ResponseOutcome {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return ResponseOutcome::Blocked(reason);
    }

    let Some(candidate) = response.candidates.first() else {
        return ResponseOutcome::Empty { finish_reason: None };
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.as_text())
        .collect();

    if text.trim().is_empty() {
        ResponseOutcome::Empty {
            finish_reason: candidate.finish_reason.clone(),
        }
    } else {
        ResponseOutcome::Text(text)
    }
}

/// エラーレスポンスから詳細を取り出す（形式が違えばNone）
pub fn parse_api_error(body: &str) -> Option<ApiErrorDetail> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
}
