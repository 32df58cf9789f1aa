use anyhow::Context;
use clap::Parser;
use gemini_vision::analyzer::{self, BatchOptions, CacheFile};
use gemini_vision::cli::{Cli, Commands, InputMode};
use gemini_vision::config::Config;
use gemini_vision::demo::{self, DemoPlan};
use gemini_vision::{logging, GeminiClient};
use gemini_vision_common::prompts;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load().context("設定ファイルを読み込めません")?;
    if let Some(model) = cli.model.clone() {
        config.model = model;
    }

    match cli.command {
        None => run_demo(&config, DemoPlan::default()).await?,

        Some(Commands::Demo { image, dir }) => {
            let mut plan = DemoPlan::default();
            if let Some(image) = image {
                plan.sample_image = image;
            }
            if let Some(dir) = dir {
                plan.image_dir = dir;
            }
            run_demo(&config, plan).await?;
        }

        Some(Commands::Analyze { image: image_path, prompt, input }) => {
            println!("📸 gemini-vision - 画像解析\n");

            let client = GeminiClient::new(config.credentials()?, &config)?;
            let prompt = prompt.unwrap_or_else(|| prompts::DEFAULT_PROMPT.to_string());

            let text = match input {
                InputMode::Path => analyzer::analyze_image_from_file(&client, &image_path, &prompt).await,
                InputMode::Decoded => {
                    let decoded = image::open(&image_path)
                        .with_context(|| format!("画像を読み込めません: {}", image_path.display()))?;
                    analyzer::analyze_image_from_decoded(&client, decoded, &prompt).await
                }
                InputMode::Base64 => {
                    let text = std::fs::read_to_string(&image_path)
                        .with_context(|| format!("読み込めません: {}", image_path.display()))?;
                    analyzer::analyze_image_from_base64(&client, &text, &prompt).await
                }
            }?;

            println!("解析結果:\n{}", text);
        }

        Some(Commands::Batch { folder, prompt, output, use_cache }) => {
            println!("📸 gemini-vision - 一括解析\n");

            let client = GeminiClient::new(config.credentials()?, &config)?;
            let prompt = prompt.unwrap_or_else(|| prompts::BRIEF_DESCRIPTION_PROMPT.to_string());
            let options = BatchOptions {
                use_cache,
                show_progress: true,
            };

            let report = analyzer::run_batch(&client, &folder, &prompt, &options).await;

            println!(
                "\n✔ 一括解析完了: 成功 {}枚 / 失敗 {}枚{}",
                report.success_count(),
                report.failure_count(),
                if use_cache { format!(" (キャッシュ {}枚)", report.cached) } else { String::new() }
            );

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&output, json)
                    .with_context(|| format!("書き込めません: {}", output.display()))?;
                println!("✔ 結果を保存: {}", output.display());
            } else {
                for (file_name, text) in &report.results {
                    println!("\n--- {} ---\n{}", file_name, text);
                }
            }
        }

        Some(Commands::Config { set_api_key, show }) => {
            if let Some(key) = set_api_key {
                let key = match key {
                    Some(key) => key,
                    None => dialoguer::Password::new()
                        .with_prompt("Gemini APIキー")
                        .interact()?,
                };
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                let credentials = config.credentials().ok();
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint());
                println!(
                    "  生成設定: temperature={} topK={} topP={} maxOutputTokens={}",
                    config.temperature, config.top_k, config.top_p, config.max_output_tokens
                );
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    credentials.map(|c| c.masked()).unwrap_or_else(|| "未設定".to_string())
                );
            }
        }

        Some(Commands::Cache { clear, folder, info }) => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            show_or_clear_cache(&target, clear, info);
        }
    }

    Ok(())
}

async fn run_demo(config: &Config, plan: DemoPlan) -> anyhow::Result<()> {
    demo::run_demo(
        config.credentials(),
        |credentials| GeminiClient::new(credentials, config),
        &plan,
    )
    .await?;
    Ok(())
}

fn show_or_clear_cache(target: &Path, clear: bool, info: bool) {
    let cache_path = CacheFile::cache_path(target);

    if info || !clear {
        // デフォルトまたは--info: 情報表示
        if cache_path.exists() {
            let cache = CacheFile::load(target);
            println!("キャッシュ情報:");
            println!("  パス: {}", cache_path.display());
            println!("  件数: {}", cache.len());
            if let Ok(meta) = std::fs::metadata(&cache_path) {
                println!("  サイズ: {} bytes", meta.len());
            }
        } else {
            println!("キャッシュファイルが存在しません: {}", cache_path.display());
        }
    }

    if clear {
        match CacheFile::clear(target) {
            Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
            Ok(false) => println!("キャッシュファイルが存在しません"),
            Err(e) => println!("キャッシュ削除エラー: {}", e),
        }
    }
}
