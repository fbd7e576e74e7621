pub mod catalog;
pub mod cli;
pub mod conflict;
pub mod core;
pub mod dedup;
pub mod imaging;
pub mod jobs;
pub mod plugins;
pub mod rename;
pub mod runner;
pub mod settings;

pub use catalog::FileCatalog;
pub use conflict::ConflictResolver;
pub use crate::core::error::{ErrorSeverity, ImagingError, JobError, JobResult};
pub use crate::core::traits::{ImagingBackend, NoRestoration, RestorationBackend};
pub use crate::core::types::{
    ConflictDecision, ConflictPolicy, DuplicateGroup, FileEntry, FileFailure, FileOutcome,
    JobConfig, JobEvent, JobKind, LogEvent, LogLevel, OutputFormat, Termination,
};
pub use dedup::{DedupEngine, DedupProgress, DedupScan};
pub use imaging::StandardImagingBackend;
pub use jobs::{AnalyzeJob, CleanupJob, ConvertJob, OrganizeJob, OrganizeMode, PrivacyJob, RepairJob};
pub use rename::BatchRenamer;
pub use runner::{Job, JobCanceller, JobContext, JobHandle, JobRunner};
pub use settings::SettingsStore;
