//! 解析用プロンプトとサンプル設定

/// 単体解析デモのプロンプト
pub const DETAILED_DESCRIPTION_PROMPT: &str =
    "この画像の内容を詳しく説明してください。写っている物体、場面、色、雰囲気を含めてください。";

/// 一括解析デモのプロンプト
pub const BRIEF_DESCRIPTION_PROMPT: &str = "この画像の主な内容を簡潔に説明してください。";

/// `analyze` でプロンプト未指定時に使う
pub const DEFAULT_PROMPT: &str = "この画像の内容を説明してください。";

/// デモが参照するサンプル画像（読者が書き換える前提）
pub const SAMPLE_IMAGE_PATH: &str = "sample_image.jpg";

/// デモが参照するサンプル画像フォルダ
pub const SAMPLE_IMAGE_DIR: &str = "images";

/// 一括解析の対象拡張子（小文字、ドットなし）
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// 拡張子が一括解析の対象か（大文字小文字を区別しない）
///
/// # Examples
/// ```
/// use gemini_vision_common::is_supported_extension;
///
/// assert!(is_supported_extension("JPG"));
/// assert!(!is_supported_extension("gif"));
/// ```
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(ext))
}
