#![allow(dead_code)]

use async_trait::async_trait;
use gemini_vision::error::{Result, VisionError};
use gemini_vision::{AnalysisClient, AnalysisRequest, Config, GeminiClient, ImageSource};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 呼び出し回数と受け取った画像を記録するスタブ
pub struct StubClient {
    reply: Box<dyn Fn(&AnalysisRequest) -> Result<String> + Send + Sync>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&AnalysisRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// 常に同じテキストを返す
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// 常に失敗する
    pub fn failing() -> Self {
        Self::new(|_| {
            Err(VisionError::ApiStatus {
                status: 500,
                message: "internal".into(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 受け取った画像（ファイル名、またはパス以外の入力種別）を呼び出し順に返す
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisClient for StubClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let label = match &request.image {
            ImageSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            other => other.kind().to_string(),
        };
        self.seen.lock().unwrap().push(label);
        (self.reply)(request)
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn write_files(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), format!("content of {}", name)).unwrap();
    }
}

pub fn build_gemini_client(base_url: &str) -> GeminiClient {
    let config = Config {
        base_url: base_url.to_string(),
        model: "gemini-test".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    GeminiClient::new(gemini_vision::Credentials::new("test-key").unwrap(), &config).unwrap()
}
