//! 画像解析
//!
//! - 単体解析: ファイル / デコード済み画像 / Base64 の3種類の入力
//! - 一括解析: フォルダ直下の対象画像を1枚ずつ解析し、成功分だけを集計

pub mod cache;
mod types;

pub use cache::CacheFile;
pub use types::{BatchFailure, BatchReport, BatchResultMap};

use crate::client::AnalysisClient;
use crate::error::{Result, VisionError};
use crate::image_source::{AnalysisRequest, ImageSource};
use crate::scanner;
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, error, warn};

/// 一括解析のオプション
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// キャッシュを使用（再解析をスキップ）
    pub use_cache: bool,
    /// 進捗バーを表示
    pub show_progress: bool,
}

/// 解析リクエストを送る（失敗はログに残して返す）
pub async fn analyze_image<C>(client: &C, request: &AnalysisRequest) -> Result<String>
where
    C: AnalysisClient + ?Sized,
{
    let result = client.analyze(request).await;
    if let Err(e) = &result {
        warn!(source = request.image.kind(), error = %e, "画像解析に失敗");
    }
    result
}

/// ファイルパスから解析
///
/// ファイルが存在しなければクライアントを呼ばずに `FileNotFound` を返す。
pub async fn analyze_image_from_file<C>(client: &C, image_path: &Path, prompt: &str) -> Result<String>
where
    C: AnalysisClient + ?Sized,
{
    if !image_path.exists() {
        let e = VisionError::FileNotFound(image_path.display().to_string());
        warn!(error = %e, "画像解析に失敗");
        return Err(e);
    }

    analyze_image(client, &AnalysisRequest::from_path(prompt, image_path)).await
}

/// デコード済み画像から解析
pub async fn analyze_image_from_decoded<C>(client: &C, image: DynamicImage, prompt: &str) -> Result<String>
where
    C: AnalysisClient + ?Sized,
{
    analyze_image(client, &AnalysisRequest::new(prompt, ImageSource::Decoded(image))).await
}

/// Base64文字列（またはData URL）から解析
///
/// デコードできない・画像として読めない場合はクライアントを呼ばない。
/// 検証で変換したインラインデータをそのまま送る。
pub async fn analyze_image_from_base64<C>(client: &C, base64: &str, prompt: &str) -> Result<String>
where
    C: AnalysisClient + ?Sized,
{
    let inline = match ImageSource::Base64(base64.to_string()).load() {
        Ok(inline) => inline,
        Err(e) => {
            warn!(error = %e, "画像解析に失敗");
            return Err(e);
        }
    };

    analyze_image(client, &AnalysisRequest::new(prompt, ImageSource::Inline(inline))).await
}

/// フォルダ内の画像を一括解析し、ファイル名 → 解析テキストを返す
///
/// フォルダが無い・読めない場合も含め、エラーは返さない（空のマップになる）。
pub async fn batch_analyze_images<C>(client: &C, image_dir: &Path, prompt: &str) -> BatchResultMap
where
    C: AnalysisClient + ?Sized,
{
    run_batch(client, image_dir, prompt, &BatchOptions::default())
        .await
        .results
}

/// 一括解析を実行してレポートを返す
///
/// 画像はファイル名順に1枚ずつ処理する。失敗した画像（空のテキストを含む）は
/// 結果に含めず `failures` に記録する。
pub async fn run_batch<C>(client: &C, image_dir: &Path, prompt: &str, options: &BatchOptions) -> BatchReport
where
    C: AnalysisClient + ?Sized,
{
    let mut report = BatchReport::new(image_dir, prompt, client.model());

    let images = match scanner::scan_folder(image_dir) {
        Ok(images) => images,
        Err(e) => {
            error!(error = %e, folder = %image_dir.display(), "一括解析に失敗");
            println!("✘ 一括解析に失敗: {}", e);
            return report;
        }
    };

    let mut cache = options.use_cache.then(|| CacheFile::load(image_dir));

    let progress = if options.show_progress {
        let pb = ProgressBar::new(images.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    for img in &images {
        progress.set_message(img.file_name.clone());

        let key = match cache.as_ref() {
            Some(_) => match cache::cache_key(client.model(), prompt, &img.path) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(error = %e, file = %img.file_name, "キャッシュキーを計算できません");
                    None
                }
            },
            None => None,
        };

        let hit = match (cache.as_ref(), key.as_deref()) {
            (Some(cache), Some(key)) => cache.get(key).map(str::to_string),
            _ => None,
        };
        if let Some(text) = hit {
            debug!(file = %img.file_name, "キャッシュヒット");
            report.results.insert(img.file_name.clone(), text);
            report.cached += 1;
            progress.suspend(|| println!("✔ 解析済み(キャッシュ): {}", img.file_name));
            progress.inc(1);
            continue;
        }

        // 失敗の報告はステータス行のみ（ログはdebug）
        let result = match client.analyze(&AnalysisRequest::from_path(prompt, img.path.clone())).await {
            Ok(text) if text.trim().is_empty() => Err(VisionError::EmptyResponse("EMPTY_TEXT".to_string())),
            other => other,
        };

        match result {
            Ok(text) => {
                if let (Some(cache), Some(key)) = (cache.as_mut(), key) {
                    cache.insert(key, img.file_name.clone(), img.file_size, text.clone());
                }
                report.results.insert(img.file_name.clone(), text);
                progress.suspend(|| println!("✔ 解析済み: {}", img.file_name));
            }
            Err(e) => {
                debug!(error = %e, file = %img.file_name, "画像解析に失敗");
                report.failures.push(BatchFailure {
                    file_name: img.file_name.clone(),
                    reason: e.to_string(),
                });
                progress.suspend(|| println!("✘ 解析失敗: {} ({})", img.file_name, e));
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    if let Some(cache) = cache {
        if let Err(e) = cache.save(image_dir) {
            warn!(error = %e, "キャッシュを保存できません");
        }
    }

    report
}
