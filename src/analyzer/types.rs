use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// ファイル名 → 解析テキスト（ファイル名順）
pub type BatchResultMap = BTreeMap<String, String>;

/// 一括解析の結果一式
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub folder: String,
    pub prompt: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,

    pub results: BatchResultMap,

    #[serde(default)]
    pub failures: Vec<BatchFailure>,

    /// キャッシュから取得した件数
    #[serde(default)]
    pub cached: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub file_name: String,
    pub reason: String,
}

impl BatchReport {
    pub fn new(folder: &Path, prompt: &str, model: &str) -> Self {
        Self {
            folder: folder.display().to_string(),
            prompt: prompt.to_string(),
            model: model.to_string(),
            generated_at: Utc::now(),
            results: BatchResultMap::new(),
            failures: Vec::new(),
            cached: 0,
        }
    }

    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// 対象になった画像の総数
    pub fn total(&self) -> usize {
        self.success_count() + self.failure_count()
    }
}
