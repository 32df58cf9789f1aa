use crate::error::{Result, VisionError};
use gemini_vision_common::is_supported_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
}

/// フォルダ直下の対象画像を列挙する
///
/// 拡張子は大文字小文字を区別せずに判定し、結果はファイル名順に並べる。
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(VisionError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                // フォルダ自体が読めない
                return Err(VisionError::Io(e.into()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "エントリを読めないためスキップ");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // ".jpg" という名前も対象（Path::extension では None になる）
        let file_name = entry.file_name().to_string_lossy().to_string();
        let supported = file_name
            .rsplit_once('.')
            .map(|(_, ext)| is_supported_extension(ext))
            .unwrap_or(false);
        if !supported {
            continue;
        }

        let file_size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        images.push(ImageInfo {
            path: path.to_path_buf(),
            file_name,
            file_size,
        });
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}
