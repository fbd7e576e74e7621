// コアモジュール - 型・エラー・抽象化インターフェース

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorSeverity, ImagingError, JobError, JobResult};
pub use traits::{ImagingBackend, NoRestoration, RestorationBackend};
pub use types::{
    ConflictDecision, ConflictPolicy, DuplicateGroup, FileEntry, FileFailure, FileOutcome,
    JobConfig, JobEvent, JobKind, LogEvent, LogLevel, OutputFormat, Termination,
};
