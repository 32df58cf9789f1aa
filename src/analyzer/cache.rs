//! 解析結果キャッシュモジュール
//!
//! モデル名・プロンプト・画像内容のSHA-256をキーにして解析テキストを保存し、
//! 同じ条件での再解析をスキップする。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".gemini-vision-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// キー → 解析結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub text: String,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    ///
    /// 存在しない・壊れている・バージョン違いの場合は空のキャッシュを返す。
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, path = %cache_path.display(), "キャッシュを開けません");
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(found = cache.version, "キャッシュバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "キャッシュが壊れているため無視します");
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.text.as_str())
    }

    pub fn insert(&mut self, key: String, file_name: String, file_size: u64, text: String) {
        self.entries.insert(key, CacheEntry {
            file_name,
            file_size,
            text,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// キャッシュキーを計算
///
/// モデルかプロンプトが変われば別のキーになる。
pub fn cache_key(model: &str, prompt: &str, image_path: &Path) -> Result<String> {
    let bytes = std::fs::read(image_path)?;

    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    hasher.update(prompt.as_bytes());
    hasher.update([0u8]);
    hasher.update(&bytes);

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cache_key_depends_on_inputs() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        std::fs::write(&a, b"image bytes").unwrap();
        std::fs::write(&b, b"other bytes").unwrap();

        let base = cache_key("model", "prompt", &a).unwrap();
        assert_eq!(base.len(), 64);
        assert_eq!(base, cache_key("model", "prompt", &a).unwrap());
        assert_ne!(base, cache_key("model", "prompt", &b).unwrap());
        assert_ne!(base, cache_key("other-model", "prompt", &a).unwrap());
        assert_ne!(base, cache_key("model", "other prompt", &a).unwrap());
    }

    #[test]
    fn test_cache_key_same_content_different_name() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("copy.jpg");
        std::fs::write(&a, b"same").unwrap();
        std::fs::write(&b, b"same").unwrap();

        assert_eq!(
            cache_key("m", "p", &a).unwrap(),
            cache_key("m", "p", &b).unwrap()
        );
    }

    #[test]
    fn test_cache_key_missing_file() {
        assert!(cache_key("m", "p", Path::new("/nonexistent/x.jpg")).is_err());
    }
}
