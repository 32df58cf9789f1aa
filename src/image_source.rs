//! 画像入力アダプタ
//!
//! ファイルパス・デコード済み画像・Base64文字列の3種類を、
//! APIへ送るインラインデータ（MIMEタイプ + Base64）にそろえる。

use crate::error::{Result, VisionError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gemini_vision_common::InlineData;
use image::{DynamicImage, ImageFormat};
use regex::Regex;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// インライン送信できるMIMEタイプ（それ以外はPNGに変換する）
const API_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// 解析対象の画像
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Decoded(DynamicImage),
    /// 生のBase64、または `data:image/...;base64,...` 形式
    Base64(String),
    /// 変換済みのインラインデータ（そのまま送る）
    Inline(InlineData),
}

/// 解析リクエスト（プロンプト + 画像1枚）
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub image: ImageSource,
}

impl AnalysisRequest {
    pub fn new(prompt: impl Into<String>, image: ImageSource) -> Self {
        Self {
            prompt: prompt.into(),
            image,
        }
    }

    pub fn from_path(prompt: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(prompt, ImageSource::Path(path.into()))
    }
}

impl ImageSource {
    /// 入力の種類（ログ用）
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Path(_) => "path",
            ImageSource::Decoded(_) => "decoded",
            ImageSource::Base64(_) => "base64",
            ImageSource::Inline(_) => "inline",
        }
    }

    /// インラインデータに変換する
    pub fn load(&self) -> Result<InlineData> {
        match self {
            ImageSource::Path(path) => load_path(path),
            ImageSource::Decoded(image) => encode_png(image),
            ImageSource::Base64(text) => load_base64(text),
            ImageSource::Inline(inline) => Ok(inline.clone()),
        }
    }
}

fn load_path(path: &Path) -> Result<InlineData> {
    if !path.exists() {
        return Err(VisionError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let format = ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(&bytes))
        .map_err(|e| VisionError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    inline_from_bytes(bytes, format)
}

fn load_base64(text: &str) -> Result<InlineData> {
    let (declared_mime, payload) = split_data_url(text);
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| VisionError::InvalidBase64(e.to_string()))?;

    let format = image::guess_format(&bytes)
        .map_err(|e| VisionError::ImageLoad(format!("画像形式を判定できません: {}", e)))?;

    if let Some(declared) = declared_mime {
        if declared != format.to_mime_type() {
            tracing::debug!(declared, detected = format.to_mime_type(), "Data URLのMIMEタイプと内容が異なる");
        }
    }

    // 実際に画像として読めるか確認する
    image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| VisionError::ImageLoad(e.to_string()))?;

    inline_from_bytes(bytes, format)
}

/// Data URLならMIMEタイプとBase64部分に分ける
///
/// Data URLでなければ入力全体をBase64として扱う。
pub fn split_data_url(text: &str) -> (Option<&str>, &str) {
    lazy_static::lazy_static! {
        static ref DATA_URL: Regex =
            Regex::new(r"(?s)^\s*data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+)?(?:;[^,;]+)*;base64,(.*)$").unwrap();
    }

    match DATA_URL.captures(text) {
        Some(caps) => {
            let mime = caps.get(1).map(|m| m.as_str());
            let payload = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            (mime, payload)
        }
        None => (None, text),
    }
}

fn inline_from_bytes(bytes: Vec<u8>, format: ImageFormat) -> Result<InlineData> {
    let mime_type = format.to_mime_type();

    if API_MIME_TYPES.contains(&mime_type) {
        return Ok(InlineData {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(&bytes),
        });
    }

    // BMP等はそのまま送れないのでPNGに変換
    tracing::debug!(mime_type, "PNGに変換して送信");
    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| VisionError::ImageLoad(e.to_string()))?;
    encode_png(&image)
}

fn encode_png(image: &DynamicImage) -> Result<InlineData> {
    let rgba;
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            &rgba
        }
        other => other,
    };

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| VisionError::ImageLoad(format!("PNGエンコードに失敗: {}", e)))?;

    Ok(InlineData {
        mime_type: "image/png".to_string(),
        data: STANDARD.encode(buffer.into_inner()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([200, 10, 10])))
    }

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        sample_image().write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_split_data_url() {
        let (mime, payload) = split_data_url("data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(mime, Some("image/jpeg"));
        assert_eq!(payload, "/9j/4AAQ");

        let (mime, payload) = split_data_url("iVBORw0KGgo=");
        assert_eq!(mime, None);
        assert_eq!(payload, "iVBORw0KGgo=");
    }

    #[test]
    fn test_load_path_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.png");
        std::fs::write(&path, encoded(ImageFormat::Png)).unwrap();

        let inline = ImageSource::Path(path).load().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(STANDARD.decode(inline.data).unwrap(), encoded(ImageFormat::Png));
    }

    #[test]
    fn test_load_path_uppercase_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, encoded(ImageFormat::Jpeg)).unwrap();

        let inline = ImageSource::Path(path).load().unwrap();
        assert_eq!(inline.mime_type, "image/jpeg");
    }

    #[test]
    fn test_load_path_bmp_is_converted_to_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.bmp");
        std::fs::write(&path, encoded(ImageFormat::Bmp)).unwrap();

        let inline = ImageSource::Path(path).load().unwrap();
        assert_eq!(inline.mime_type, "image/png");

        let bytes = STANDARD.decode(inline.data).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_load_path_missing() {
        let result = ImageSource::Path(PathBuf::from("/nonexistent/sample_image.jpg")).load();
        assert!(matches!(result, Err(VisionError::FileNotFound(_))));
    }

    #[test]
    fn test_load_decoded() {
        let inline = ImageSource::Decoded(sample_image()).load().unwrap();
        assert_eq!(inline.mime_type, "image/png");

        let bytes = STANDARD.decode(inline.data).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_load_base64_raw_and_data_url() {
        let raw = STANDARD.encode(encoded(ImageFormat::Jpeg));

        let inline = ImageSource::Base64(raw.clone()).load().unwrap();
        assert_eq!(inline.mime_type, "image/jpeg");
        assert_eq!(inline.data, raw);

        let data_url = format!("data:image/jpeg;base64,{}", raw);
        let inline = ImageSource::Base64(data_url).load().unwrap();
        assert_eq!(inline.data, raw);
    }

    #[test]
    fn test_load_base64_with_line_breaks() {
        let raw = STANDARD.encode(encoded(ImageFormat::Png));
        let wrapped: String = raw
            .as_bytes()
            .chunks(20)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        let inline = ImageSource::Base64(wrapped).load().unwrap();
        assert_eq!(inline.data, raw);
    }

    #[test]
    fn test_load_base64_invalid() {
        let result = ImageSource::Base64("これはBase64ではない".into()).load();
        assert!(matches!(result, Err(VisionError::InvalidBase64(_))));
    }

    #[test]
    fn test_load_base64_not_an_image() {
        let text = STANDARD.encode(b"plain text, not an image");
        let result = ImageSource::Base64(text).load();
        assert!(matches!(result, Err(VisionError::ImageLoad(_))));
    }

    #[test]
    fn test_load_inline_passes_through() {
        let inline = ImageSource::Base64(STANDARD.encode(encoded(ImageFormat::Png))).load().unwrap();
        let again = ImageSource::Inline(inline.clone()).load().unwrap();
        assert_eq!(again, inline);
    }

    #[test]
    fn test_kind() {
        assert_eq!(ImageSource::Path(PathBuf::from("a.jpg")).kind(), "path");
        assert_eq!(ImageSource::Decoded(sample_image()).kind(), "decoded");
        assert_eq!(ImageSource::Base64(String::new()).kind(), "base64");
    }
}
