// ジョブ起動時エラーのカスタム型定義
//
// ファイル単位の失敗はエラーではなく `FileOutcome` の値として扱うため、
// ここにあるのはジョブを `Running` に入れない種類のエラーだけ。

use thiserror::Error;

/// ジョブ起動・検証フェーズのエラー型
#[derive(Error, Debug)]
pub enum JobError {
    #[error("別のジョブが実行中です")]
    Busy,

    #[error("設定エラー: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("初期化エラー: {message}")]
    Setup {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl JobError {
    /// ビジー状態エラーの作成
    pub fn busy() -> Self {
        Self::Busy
    }

    /// 設定検証エラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 初期化エラーの作成
    pub fn setup(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Setup {
            message: message.into(),
            source,
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Busy => ErrorSeverity::Medium,
            Self::Validation { .. } | Self::Setup { .. } => ErrorSeverity::High,
            Self::Task { .. } => ErrorSeverity::Critical,
        }
    }
}

impl From<tokio::task::JoinError> for JobError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// ジョブ起動処理の結果型
pub type JobResult<T> = std::result::Result<T, JobError>;

/// 画像バックエンドのエラー分類
///
/// ジョブ側でファイル単位の失敗分類（`FileFailure`）へ写像される
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("壊れた、または未対応の画像です: {0}")]
    Corrupt(String),

    #[error("アクセスが拒否されました")]
    AccessDenied,

    #[error("入出力エラー: {0}")]
    Io(String),

    #[error("エンコードエラー: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = JobError::validation("root", "ディレクトリではありません");
        assert!(err.to_string().contains("設定エラー"));
        assert!(err.to_string().contains("root"));

        assert!(JobError::busy().to_string().contains("実行中"));
    }

    #[test]
    fn test_setup_error_source_chain() {
        let err = JobError::setup("出力先を作成できません", anyhow::anyhow!("disk full"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(JobError::busy().severity() < JobError::validation("x", "y").severity());
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
    }
}
