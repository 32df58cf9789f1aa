//! 使用例デモ
//!
//! サンプル画像1枚の解析と、サンプルフォルダの一括解析を順に実行する。
//! パスとプロンプトは `DemoPlan` の既定値を書き換えて使う想定。

use crate::analyzer::{self, BatchResultMap};
use crate::client::AnalysisClient;
use crate::config::Credentials;
use crate::error::Result;
use gemini_vision_common::prompts;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub sample_image: PathBuf,
    pub image_dir: PathBuf,
    pub single_prompt: String,
    pub batch_prompt: String,
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            sample_image: PathBuf::from(prompts::SAMPLE_IMAGE_PATH),
            image_dir: PathBuf::from(prompts::SAMPLE_IMAGE_DIR),
            single_prompt: prompts::DETAILED_DESCRIPTION_PROMPT.to_string(),
            batch_prompt: prompts::BRIEF_DESCRIPTION_PROMPT.to_string(),
        }
    }
}

/// デモの実行結果
#[derive(Debug, Default)]
pub struct DemoSummary {
    /// 例1の解析テキスト（スキップ・失敗時はNone）
    pub single_result: Option<String>,
    /// 例2の結果（フォルダが無ければNone）
    pub batch_results: Option<BatchResultMap>,
    /// 存在しなかったため飛ばしたパス
    pub skipped: Vec<PathBuf>,
}

/// デモを実行する
///
/// 認証情報が無ければクライアントを作る前にエラーで終了する。
/// サンプルが見つからない例は警告を出して飛ばす。
pub async fn run_demo<C, F>(
    credentials: Result<Credentials>,
    connect: F,
    plan: &DemoPlan,
) -> Result<DemoSummary>
where
    C: AnalysisClient,
    F: FnOnce(Credentials) -> Result<C>,
{
    println!("🚀 gemini-vision - Gemini画像解析デモ\n");

    let credentials = credentials?;
    println!("✔ API設定完了 (キー: {})", credentials.masked());

    let client = connect(credentials)?;
    println!("✔ クライアント作成完了 (モデル: {})", client.model());

    let mut summary = DemoSummary::default();

    // 例1: ファイルから解析
    println!("\n📸 例1: ファイルから画像を解析");
    if plan.sample_image.exists() {
        match analyzer::analyze_image_from_file(&client, &plan.sample_image, &plan.single_prompt).await {
            Ok(text) => {
                println!("解析結果:\n{}\n", text);
                summary.single_result = Some(text);
            }
            Err(e) => println!("✘ 画像解析に失敗: {}\n", e),
        }
    } else {
        println!("⚠ サンプル画像が存在しません: {}\n", plan.sample_image.display());
        summary.skipped.push(plan.sample_image.clone());
    }

    // 例2: 一括解析
    println!("📸 例2: 画像を一括解析");
    if plan.image_dir.exists() {
        let results = analyzer::batch_analyze_images(&client, &plan.image_dir, &plan.batch_prompt).await;
        println!("✔ 一括解析完了: {}枚を処理\n", results.len());
        summary.batch_results = Some(results);
    } else {
        println!("⚠ サンプルフォルダが存在しません: {}\n", plan.image_dir.display());
        summary.skipped.push(plan.image_dir.clone());
    }

    println!("🎉 デモ完了");
    Ok(summary)
}
