use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::types::FileEntry;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "heic", "tiff"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv", "flv"];

/// EXIFを持ち得る拡張子（それ以外はEXIF読み取りを試みない）
const EXIF_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "heic"];

pub struct FileCatalog;

impl FileCatalog {
    /// ルート以下の全ファイルを再帰的に列挙してスナップショットを取る
    ///
    /// 名前順で走査するため、列挙順（= 重複検出の正本選択）は決定的。
    /// 読み取れないエントリは黙ってスキップする（列挙は失敗しない）
    pub fn enumerate(root: &Path) -> Vec<FileEntry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };

            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();

            let captured = Self::capture_date(path, &extension, &metadata);

            entries.push(FileEntry {
                path: path.to_path_buf(),
                size: metadata.len(),
                extension,
                captured,
            });
        }

        entries
    }

    pub fn is_image_extension(extension: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&extension)
    }

    pub fn is_video_extension(extension: &str) -> bool {
        VIDEO_EXTENSIONS.contains(&extension)
    }

    /// 撮影日を決定する: EXIFのDateTimeOriginal、なければファイル更新日時
    fn capture_date(path: &Path, extension: &str, metadata: &fs::Metadata) -> Option<NaiveDate> {
        if EXIF_EXTENSIONS.contains(&extension) {
            if let Some(date) = Self::exif_date(path) {
                return Some(date);
            }
        }
        metadata
            .modified()
            .ok()
            .map(|t| DateTime::<Local>::from(t).date_naive())
    }

    fn exif_date(path: &Path) -> Option<NaiveDate> {
        let file = fs::File::open(path).ok()?;
        let mut reader = std::io::BufReader::new(&file);
        let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
        let field = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)?;
        let raw = field.display_value().to_string().replace('"', "");
        NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S")
            .ok()
            .map(|dt| dt.date())
    }
}
