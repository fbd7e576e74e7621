// ジョブシステム共通のデータ型定義
// ファイルスナップショット・競合ポリシー・イベント型をここに集約する

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{JobError, JobResult};

/// 列挙時点でのファイルスナップショット
///
/// 列挙後にファイルが移動・削除された場合は実行時エラーとして扱う
/// （スナップショット自体は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    /// 小文字化済み・ドットなしの拡張子
    pub extension: String,
    /// 撮影日（EXIF優先、なければファイル更新日時）
    pub captured: Option<NaiveDate>,
}

impl FileEntry {
    /// ログ出力用のファイル名
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// 出力先パスが既に存在する場合の解決ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    Overwrite,
    Skip,
    CopyWithSuffix,
}

impl ConflictPolicy {
    /// 自由記述のラベルを安定コードへ正規化する
    ///
    /// 旧バージョンはUI上のローカライズ文字列をそのまま渡していたため、
    /// 大文字小文字を無視した部分一致で受け付ける。解釈できない入力は
    /// データを壊さない `CopyWithSuffix` に倒す。
    pub fn normalize(label: &str) -> Self {
        let lowered = label.trim().to_lowercase();
        match lowered.as_str() {
            "overwrite" => return Self::Overwrite,
            "skip" => return Self::Skip,
            "copy" | "copy_with_suffix" | "copy-with-suffix" => return Self::CopyWithSuffix,
            _ => {}
        }
        if lowered.contains("overwrite") || lowered.contains("üstüne yaz") {
            Self::Overwrite
        } else if lowered.contains("skip") || lowered.contains("atla") {
            Self::Skip
        } else {
            Self::CopyWithSuffix
        }
    }

    pub const fn as_code(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
            Self::CopyWithSuffix => "copy",
        }
    }
}

/// 競合解決の結果
///
/// 不変条件: `skipped == true` なら `destination` は `None`、
/// `skipped == false` なら `destination` は書き込み可能なパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDecision {
    pub destination: Option<PathBuf>,
    pub skipped: bool,
}

impl ConflictDecision {
    pub fn proceed(destination: PathBuf) -> Self {
        Self {
            destination: Some(destination),
            skipped: false,
        }
    }

    pub fn skip() -> Self {
        Self {
            destination: None,
            skipped: true,
        }
    }
}

/// 同一コンテンツハッシュを持つファイル群
///
/// `members` はハッシュ化順。先頭が正本として残り、残りが重複として退避される。
/// メンバー1件のグループは重複ではないため生成されない。
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub hash: String,
    pub members: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// 正本（最初に発見されたメンバー）
    pub fn canonical(&self) -> &FileEntry {
        &self.members[0]
    }

    /// 退避対象となる重複メンバー
    pub fn duplicates(&self) -> &[FileEntry] {
        &self.members[1..]
    }
}

/// ログ行の重要度タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// ジョブが発行するログ行（発行後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

/// ジョブの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Completed,
    Cancelled,
}

/// ジョブがチャンネルへ流すイベント
///
/// 1回の実行につき `Finished` はちょうど1回、`Progress` は単調非減少
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Progress(u8),
    Log(LogEvent),
    Finished(Termination),
}

/// ジョブ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Analyze,
    Organize,
    Cleanup,
    Convert,
    Privacy,
    Repair,
}

impl JobKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Organize => "organize",
            Self::Cleanup => "cleanup",
            Self::Convert => "convert",
            Self::Privacy => "privacy",
            Self::Repair => "repair",
        }
    }
}

/// ファイル1件ごとの処理結果
///
/// 例外の握り潰しではなく、結果を明示的な値としてジョブが集計する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Done,
    Skipped,
    Failed(FileFailure),
}

/// ファイル単位の失敗分類（ジョブ全体は継続する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFailure {
    AccessDenied,
    Corrupt,
    ReadFailed(String),
    WriteFailed(String),
    Unexpected(String),
}

/// 書き込み系のI/Oエラーを失敗分類へ変換
pub fn classify_write_error(err: &std::io::Error) -> FileFailure {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        FileFailure::AccessDenied
    } else {
        FileFailure::WriteFailed(err.to_string())
    }
}

/// 読み取り系のI/Oエラーを失敗分類へ変換
pub fn classify_read_error(err: &std::io::Error) -> FileFailure {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        FileFailure::AccessDenied
    } else {
        FileFailure::ReadFailed(err.to_string())
    }
}

/// 画像の出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// アルファチャンネルを保持できないフォーマットは事前にRGBへ変換する
    pub const fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// ジョブ共通の設定
///
/// 呼び出し側が構築し、ジョブの生存期間中は読み取り専用。
/// ジョブ固有のモードは各ジョブ構造体が持つ（グローバル状態への依存は禁止）。
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub root: PathBuf,
    pub policy: ConflictPolicy,
    pub output: Option<PathBuf>,
}

impl JobConfig {
    pub fn new(root: impl Into<PathBuf>, policy: ConflictPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// ルートフォルダの起動時検証
    pub fn validate_root(&self) -> JobResult<()> {
        if !self.root.is_dir() {
            return Err(JobError::validation(
                "root",
                format!("存在するディレクトリではありません: {}", self.root.display()),
            ));
        }
        Ok(())
    }

    /// 必須の出力ディレクトリを作成する（失敗は起動エラー）
    pub fn ensure_dir(path: &Path) -> JobResult<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            JobError::setup(
                format!("出力ディレクトリを作成できません: {}", path.display()),
                e.into(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_normalize_stable_codes() {
        assert_eq!(
            ConflictPolicy::normalize("overwrite"),
            ConflictPolicy::Overwrite
        );
        assert_eq!(ConflictPolicy::normalize("skip"), ConflictPolicy::Skip);
        assert_eq!(
            ConflictPolicy::normalize("copy"),
            ConflictPolicy::CopyWithSuffix
        );
    }

    #[test]
    fn test_policy_normalize_legacy_labels() {
        // 旧UIのローカライズ文字列も受け付ける
        assert_eq!(
            ConflictPolicy::normalize("Üstüne Yaz"),
            ConflictPolicy::Overwrite
        );
        assert_eq!(ConflictPolicy::normalize("Atla"), ConflictPolicy::Skip);
        assert_eq!(
            ConflictPolicy::normalize("Overwrite existing files"),
            ConflictPolicy::Overwrite
        );
        assert_eq!(
            ConflictPolicy::normalize("Skip existing"),
            ConflictPolicy::Skip
        );
    }

    #[test]
    fn test_policy_normalize_defaults_to_copy() {
        // 解釈できない入力はデータを壊さない選択に倒す
        assert_eq!(
            ConflictPolicy::normalize("???"),
            ConflictPolicy::CopyWithSuffix
        );
        assert_eq!(ConflictPolicy::normalize(""), ConflictPolicy::CopyWithSuffix);
    }

    #[test]
    fn test_conflict_decision_invariant() {
        let skip = ConflictDecision::skip();
        assert!(skip.skipped);
        assert!(skip.destination.is_none());

        let proceed = ConflictDecision::proceed(PathBuf::from("/tmp/x"));
        assert!(!proceed.skipped);
        assert!(proceed.destination.is_some());
    }

    #[test]
    fn test_output_format_extension_roundtrip() {
        assert_eq!(OutputFormat::from_extension("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_extension("tif"), Some(OutputFormat::Tiff));
        assert_eq!(OutputFormat::from_extension("heic"), None);
        assert!(!OutputFormat::Jpeg.supports_alpha());
        assert!(OutputFormat::Png.supports_alpha());
    }

    #[test]
    fn test_duplicate_group_canonical() {
        let entry = |p: &str| FileEntry {
            path: PathBuf::from(p),
            size: 10,
            extension: "jpg".to_string(),
            captured: None,
        };
        let group = DuplicateGroup {
            hash: "abc".to_string(),
            members: vec![entry("/a.jpg"), entry("/b.jpg"), entry("/c.jpg")],
        };
        assert_eq!(group.canonical().path, PathBuf::from("/a.jpg"));
        assert_eq!(group.duplicates().len(), 2);
    }
}
