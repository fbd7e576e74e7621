// バイト同一の重複ファイルを検出して隔離するジョブ
//
// 進捗の配分は 0-50% がサイズパス、50-75% がハッシュパス、
// 75-100% が隔離フォルダへの移動。

use std::fs;
use std::path::Path;

use crate::catalog::FileCatalog;
use crate::conflict::ConflictResolver;
use crate::core::error::JobResult;
use crate::core::types::{
    classify_write_error, FileEntry, FileOutcome, JobConfig, JobKind, Termination,
};
use crate::dedup::{DedupEngine, DedupProgress};
use crate::jobs::{log_failure, move_file, JobStats};
use crate::runner::{Job, JobContext};

/// 隔離フォルダ名（スキャン対象ルート直下に作られる）
pub const QUARANTINE_DIR: &str = "duplicates";

pub struct CleanupJob {
    config: JobConfig,
}

impl CleanupJob {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    fn quarantine(&self, entry: &FileEntry, dir: &Path, ctx: &JobContext) -> FileOutcome {
        let Some(name) = entry.path.file_name() else {
            return FileOutcome::Skipped;
        };
        let target = dir.join(name);

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
        ctx.success(format!("🗑️ Moved: {}", entry.file_name()));
        FileOutcome::Done
    }
}

impl Job for CleanupJob {
    fn kind(&self) -> JobKind {
        JobKind::Cleanup
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        let files = FileCatalog::enumerate(&self.config.root);
        if files.is_empty() {
            ctx.progress(100);
            return Termination::Completed;
        }

        ctx.info("🔍 Duplicate scan started...");

        let scan = DedupEngine::find_duplicates(&files, |progress| {
            if ctx.is_cancelled() {
                return false;
            }
            match progress {
                DedupProgress::Sized { done, total } => {
                    ctx.progress((done * 50 / total) as u8);
                }
                DedupProgress::Hashed {
                    done,
                    total,
                    duplicate,
                } => {
                    if let Some(found) = duplicate {
                        ctx.warning(format!("⚠️ Duplicate Found: {}", found.file_name()));
                    }
                    ctx.progress((50 + done * 25 / total.max(1)) as u8);
                }
                DedupProgress::ReadError { path, error } => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    ctx.error(format!("❌ Read Error: {name} ({error})"));
                }
            }
            true
        });

        if scan.cancelled {
            ctx.warning("🛑 Process stopped by user.");
            return Termination::Cancelled;
        }

        let duplicates: Vec<&FileEntry> = scan
            .groups
            .iter()
            .flat_map(|group| group.duplicates())
            .collect();

        let mut stats = JobStats::default();
        if !duplicates.is_empty() {
            let quarantine_dir = self.config.root.join(QUARANTINE_DIR);
            if let Err(err) = fs::create_dir_all(&quarantine_dir) {
                // 隔離先が作れなければ移動フェーズ全体を諦める（検出結果は報告済み）
                ctx.error(format!(
                    "❌ Disk/File Error: {} ({err})",
                    quarantine_dir.display()
                ));
                ctx.progress(100);
                return Termination::Completed;
            }

            let total = duplicates.len();
            for (i, duplicate) in duplicates.iter().enumerate() {
                if ctx.is_cancelled() {
                    ctx.warning("🛑 Process stopped by user.");
                    return Termination::Cancelled;
                }

                let outcome = self.quarantine(duplicate, &quarantine_dir, ctx);
                if let FileOutcome::Failed(failure) = &outcome {
                    log_failure(ctx, &duplicate.file_name(), failure);
                }
                stats.record(&outcome);
                ctx.progress((75 + (i + 1) * 25 / total) as u8);
            }
        }

        ctx.progress(100);
        ctx.success(format!(
            "🧹 Cleanup finished: {} duplicate group(s), {} file(s) quarantined",
            scan.groups.len(),
            stats.done
        ));
        Termination::Completed
    }
}
