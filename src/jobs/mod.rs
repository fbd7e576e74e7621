// ジョブ実装群と共通ヘルパー
//
// 各ジョブはファイル1件を独立に処理し、結果を `FileOutcome` として
// 集計する。どの失敗分類もジョブ全体を止めない。

pub mod analyze;
pub mod cleanup;
pub mod convert;
pub mod organize;
pub mod privacy;
pub mod repair;

pub use analyze::AnalyzeJob;
pub use cleanup::CleanupJob;
pub use convert::ConvertJob;
pub use organize::{OrganizeJob, OrganizeMode};
pub use privacy::PrivacyJob;
pub use repair::RepairJob;

use std::fs;
use std::io;
use std::path::Path;

use crate::core::error::ImagingError;
use crate::core::types::{FileFailure, FileOutcome};
use crate::runner::JobContext;

/// ファイル単位の結果集計
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct JobStats {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl JobStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Done => self.done += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "📊 Done: {}, Skipped: {}, Errors: {}",
            self.done, self.skipped, self.failed
        )
    }
}

/// 失敗分類を安定した重要度つきログ行として発行する
pub(crate) fn log_failure(ctx: &JobContext, name: &str, failure: &FileFailure) {
    match failure {
        FileFailure::AccessDenied => ctx.error(format!("❌ Access Denied: {name}")),
        FileFailure::Corrupt => ctx.error(format!("❌ Corrupt/Unknown Image: {name}")),
        FileFailure::ReadFailed(detail) => {
            ctx.error(format!("❌ Read Error: {name} ({detail})"))
        }
        FileFailure::WriteFailed(detail) => {
            ctx.error(format!("❌ Disk/File Error: {name} ({detail})"))
        }
        FileFailure::Unexpected(detail) => {
            ctx.error(format!("❌ Unexpected Error: {name} ({detail})"))
        }
    }
}

/// rename優先のファイル移動（デバイス跨ぎはコピー+削除へフォールバック）
pub(crate) fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dst)?;
            fs::remove_file(src)
        }
    }
}

/// デコード側の画像エラーを失敗分類へ写像する
pub(crate) fn decode_failure(err: ImagingError) -> FileFailure {
    match err {
        ImagingError::Corrupt(_) => FileFailure::Corrupt,
        ImagingError::AccessDenied => FileFailure::AccessDenied,
        ImagingError::Io(detail) => FileFailure::ReadFailed(detail),
        ImagingError::Encode(detail) => FileFailure::Unexpected(detail),
    }
}

/// エンコード側の画像エラーを失敗分類へ写像する
pub(crate) fn encode_failure(err: ImagingError) -> FileFailure {
    match err {
        ImagingError::Corrupt(detail) => FileFailure::Unexpected(detail),
        ImagingError::AccessDenied => FileFailure::AccessDenied,
        ImagingError::Io(detail) | ImagingError::Encode(detail) => {
            FileFailure::WriteFailed(detail)
        }
    }
}

/// 進捗率の計算（total=0は呼び出し側で弾く）
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    (done * 100 / total.max(1)) as u8
}
