// 埋め込みメタデータ除去ジョブ
//
// ピクセルデータだけを同寸・同カラーモードの新規バッファへ写して
// 書き戻す。ポリシーが `Overwrite` のときだけ元ファイルを直接置き換え、
// それ以外は専用の出力フォルダへ保存する。

use std::path::PathBuf;

use crate::catalog::FileCatalog;
use crate::conflict::ConflictResolver;
use crate::core::error::JobResult;
use crate::core::traits::ImagingBackend;
use crate::core::types::{
    classify_write_error, ConflictPolicy, FileEntry, FileOutcome, JobConfig, JobKind,
    OutputFormat, Termination,
};
use crate::jobs::{decode_failure, encode_failure, log_failure, percent, JobStats};
use crate::runner::{Job, JobContext};

/// サニタイズ結果のデフォルト出力フォルダ名
pub const PRIVACY_OUTPUT_DIR: &str = "sanitized";

/// メタデータ除去の対象拡張子
const PRIVACY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tiff"];

pub struct PrivacyJob<B: ImagingBackend> {
    config: JobConfig,
    imaging: B,
    /// `None` なら元ファイルを直接置き換える
    out_dir: Option<PathBuf>,
}

impl<B: ImagingBackend> PrivacyJob<B> {
    pub fn new(config: JobConfig, imaging: B) -> Self {
        let out_dir = (config.policy != ConflictPolicy::Overwrite).then(|| {
            config
                .output
                .clone()
                .unwrap_or_else(|| config.root.join(PRIVACY_OUTPUT_DIR))
        });
        Self {
            config,
            imaging,
            out_dir,
        }
    }

    fn process_file(&self, entry: &FileEntry, ctx: &JobContext) -> FileOutcome {
        let image = match self.imaging.decode(&entry.path) {
            Ok(image) => image,
            Err(err) => return FileOutcome::Failed(decode_failure(err)),
        };
        // 除去に失敗したファイルは元を触らずスキップする（デコード段階で判明する）
        let clean = self.imaging.strip_metadata(&image);

        let Some(format) = OutputFormat::from_extension(&entry.extension) else {
            return FileOutcome::Skipped;
        };
        let Some(name) = entry.path.file_name() else {
            return FileOutcome::Skipped;
        };

        let target = match &self.out_dir {
            Some(dir) => dir.join(name),
            None => entry.path.clone(),
        };

        let decision = match ConflictResolver::resolve(&target, self.config.policy) {
            Ok(decision) => decision,
            Err(err) => return FileOutcome::Failed(classify_write_error(&err)),
        };
        let Some(destination) = decision.destination else {
            ctx.info(format!("⏩ Skipped: {}", entry.file_name()));
            return FileOutcome::Skipped;
        };

        if let Err(err) = self.imaging.encode(&clean, &destination, format) {
            return FileOutcome::Failed(encode_failure(err));
        }

        if self.out_dir.is_none() {
            ctx.success(format!("🔒 Cleaned in place: {}", entry.file_name()));
        } else {
            ctx.success(format!("🔒 Saved to folder: {}", entry.file_name()));
        }
        FileOutcome::Done
    }
}

impl<B: ImagingBackend + 'static> Job for PrivacyJob<B> {
    fn kind(&self) -> JobKind {
        JobKind::Privacy
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()?;
        if let Some(dir) = &self.out_dir {
            JobConfig::ensure_dir(dir)?;
        }
        Ok(())
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        let files: Vec<FileEntry> = FileCatalog::enumerate(&self.config.root)
            .into_iter()
            .filter(|e| PRIVACY_EXTENSIONS.contains(&e.extension.as_str()))
            .collect();

        let total = files.len();
        if total == 0 {
            ctx.progress(100);
            return Termination::Completed;
        }

        ctx.info("🛡️ Cleaning metadata...");
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
