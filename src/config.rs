use crate::error::{Result, VisionError};
use gemini_vision_common::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// APIキーを読む環境変数
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub api_version: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash-image-preview".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_version: "v1beta".into(),
            temperature: 0.4,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VisionError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("gemini-vision").join("config.json"))
    }

    /// 環境変数からAPIキーを解決
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// 環境変数の参照方法を差し替えてAPIキーを解決
    ///
    /// 環境変数（空白のみは未設定扱い）を優先し、なければ保存済みのキーを使う。
    pub fn credentials_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .and_then(|key| Credentials::new(key).ok())
            .ok_or(VisionError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        let credentials = Credentials::new(key)?;
        self.api_key = Some(credentials.api_key().to_string());
        self.save()
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// generateContent のエンドポイントURL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.model
        )
    }
}

/// 検証済みのAPI認証情報
///
/// クライアント生成時に明示的に渡す。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(VisionError::MissingApiKey);
        }
        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// 表示用（先頭4文字以外を伏せる）
    pub fn masked(&self) -> String {
        let head: String = self.api_key.chars().take(4).collect();
        format!("{}****", head)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked())
            .finish()
    }
}
