// 撮影日ベースのフォルダ整理ジョブ

use chrono::NaiveDate;
use std::fs;

use crate::catalog::FileCatalog;
use crate::conflict::ConflictResolver;
use crate::core::error::JobResult;
use crate::core::types::{
    classify_write_error, FileEntry, FileOutcome, JobConfig, JobKind, Termination,
};
use crate::jobs::{log_failure, move_file, percent, JobStats};
use crate::runner::{Job, JobContext};

/// 日付フォルダの粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrganizeMode {
    ByDay,
    ByMonth,
    ByYear,
}

impl OrganizeMode {
    /// 撮影日から対象フォルダ名を導出する
    pub fn folder_name(&self, date: NaiveDate) -> String {
        match self {
            Self::ByDay => date.format("%Y-%m-%d").to_string(),
            Self::ByMonth => date.format("%Y-%m").to_string(),
            Self::ByYear => date.format("%Y").to_string(),
        }
    }
}

pub struct OrganizeJob {
    config: JobConfig,
    mode: OrganizeMode,
}

impl OrganizeJob {
    pub fn new(config: JobConfig, mode: OrganizeMode) -> Self {
        Self { config, mode }
    }

    fn process_file(&self, entry: &FileEntry, ctx: &JobContext) -> FileOutcome {
        // 日付が全く決まらないファイルは手を付けずにその旨を記録する
        let Some(date) = entry.captured else {
            ctx.info(format!(
                "ℹ️ No date available, left in place: {}",
                entry.file_name()
            ));
            return FileOutcome::Skipped;
        };

        let target_dir = self.config.root.join(self.mode.folder_name(date));
        if let Err(err) = fs::create_dir_all(&target_dir) {
            return FileOutcome::Failed(classify_write_error(&err));
        }

        let Some(name) = entry.path.file_name() else {
            return FileOutcome::Skipped;
        };
        let target = target_dir.join(name);
        // 既に正しい場所にあるファイルは動かさない
        if target == entry.path {
            return FileOutcome::Skipped;
        }

        let decision = match ConflictResolver::resolve(&target, self.config.policy) {
            Ok(decision) => decision,
            Err(err) => return FileOutcome::Failed(classify_write_error(&err)),
        };
        let Some(destination) = decision.destination else {
            ctx.info(format!("⏩ Skipped: {}", entry.file_name()));
            return FileOutcome::Skipped;
        };

        if let Err(err) = move_file(&entry.path, &destination) {
            return FileOutcome::Failed(classify_write_error(&err));
        }
        ctx.success(format!("✅ Moved: {}", entry.file_name()));
        FileOutcome::Done
    }
}

impl Job for OrganizeJob {
    fn kind(&self) -> JobKind {
        JobKind::Organize
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        let files = FileCatalog::enumerate(&self.config.root);
        let total = files.len();
        if total == 0 {
            ctx.progress(100);
            return Termination::Completed;
        }

        ctx.info("🚀 Organizing started...");
        let mut stats = JobStats::default();

        for (i, entry) in files.iter().enumerate() {
            if ctx.is_cancelled() {
                ctx.warning("🛑 Process stopped by user.");
                return Termination::Cancelled;
            }

            let outcome = self.process_file(entry, ctx);
            if let FileOutcome::Failed(failure) = &outcome {
                log_failure(ctx, &entry.file_name(), failure);
            }
            stats.record(&outcome);
            ctx.progress(percent(i + 1, total));
        }

        ctx.success(stats.summary());
        Termination::Completed
    }
}
