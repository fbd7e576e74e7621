// パターン指定による一括リネーム
//
// パターン中のトークンをファイルごとに展開する:
//   {date}    撮影日（なければ今日）を YYYY-MM-DD で
//   {name}    元のファイル名（拡張子なし）
//   {ext}     元の拡張子（ドット付き、小文字）
//   {counter} 連番
//   {time}    現在時刻 HHMMSS

use chrono::Local;
use std::fs;

use crate::core::types::FileEntry;

pub struct BatchRenamer {
    pattern: String,
    start_counter: usize,
}

impl BatchRenamer {
    pub fn new(pattern: impl Into<String>, start_counter: usize) -> Self {
        Self {
            pattern: pattern.into(),
            start_counter,
        }
    }

    /// 1ファイル分の新しいファイル名を組み立てる
    pub fn apply_pattern(&self, entry: &FileEntry, counter: usize) -> String {
        let date = entry
            .captured
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();
        let stem = entry
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = if entry.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", entry.extension)
        };
        let time = Local::now().format("%H%M%S").to_string();

        self.pattern
            .replace("{date}", &date)
            .replace("{name}", &stem)
            .replace("{ext}", &ext)
            .replace("{counter}", &counter.to_string())
            .replace("{time}", &time)
    }

    /// 各ファイルを同じフォルダ内でリネームし、成功した件数を返す
    ///
    /// 個々の失敗はそのファイルを飛ばすだけで、処理は続行する
    pub fn rename_files(&self, entries: &[FileEntry]) -> usize {
        let mut renamed = 0usize;
        for (i, entry) in entries.iter().enumerate() {
            let Some(parent) = entry.path.parent() else {
                continue;
            };
            let new_name = self.apply_pattern(entry, self.start_counter + i);
            let new_path = parent.join(&new_name);
            if new_path == entry.path || new_path.exists() {
                continue;
            }
            if fs::rename(&entry.path, &new_path).is_ok() {
                renamed += 1;
            }
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn entry(path: PathBuf, captured: Option<NaiveDate>) -> FileEntry {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        FileEntry {
            path,
            size: 0,
            extension,
            captured,
        }
    }

    #[test]
    fn test_pattern_tokens_expand() {
        let renamer = BatchRenamer::new("{date}_{name}_{counter}{ext}", 1);
        let entry = entry(
            PathBuf::from("/photos/IMG_001.JPG"),
            NaiveDate::from_ymd_opt(2023, 7, 15),
        );
        assert_eq!(
            renamer.apply_pattern(&entry, 3),
            "2023-07-15_IMG_001_3.jpg"
        );
    }

    #[test]
    fn test_missing_date_falls_back_to_today() {
        let renamer = BatchRenamer::new("{date}", 1);
        let entry = entry(PathBuf::from("/photos/a.png"), None);
        let expected = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(renamer.apply_pattern(&entry, 1), expected);
    }

    #[test]
    fn test_rename_files_counts_successes() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let b = temp_dir.path().join("b.jpg");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"y").unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 2);
        let entries = vec![entry(a.clone(), date), entry(b.clone(), date)];
        let renamer = BatchRenamer::new("photo_{counter}{ext}", 10);

        assert_eq!(renamer.rename_files(&entries), 2);
        assert!(!a.exists());
        assert!(temp_dir.path().join("photo_10.jpg").exists());
        assert!(temp_dir.path().join("photo_11.jpg").exists());
    }

    #[test]
    fn test_existing_target_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let taken = temp_dir.path().join("photo_1.jpg");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&taken, b"y").unwrap();

        let entries = vec![entry(a.clone(), None)];
        let renamer = BatchRenamer::new("photo_{counter}{ext}", 1);

        assert_eq!(renamer.rename_files(&entries), 0);
        assert!(a.exists());
    }
}
