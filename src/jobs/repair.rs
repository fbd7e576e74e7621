// 損傷画像の自動修復ジョブ
//
// エッジ検出・輪郭からのマスク生成・インペインティングは外部の
// 復元バックエンドに依存する。バックエンドが提供されない環境では
// ファイル単位のエラーではなく「機能なし」として1行だけ記録し、
// 何も処理せずに完了する。

use std::path::PathBuf;

use crate::catalog::FileCatalog;
use crate::conflict::ConflictResolver;
use crate::core::error::JobResult;
use crate::core::traits::{ImagingBackend, RestorationBackend};
use crate::core::types::{
    classify_write_error, FileEntry, FileFailure, FileOutcome, JobConfig, JobKind, OutputFormat,
    Termination,
};
use crate::jobs::{decode_failure, encode_failure, log_failure, percent, JobStats};
use crate::runner::{Job, JobContext};

/// 修復結果のデフォルト出力フォルダ名
pub const REPAIR_OUTPUT_DIR: &str = "repaired";

pub struct RepairJob<B: ImagingBackend, R: RestorationBackend> {
    config: JobConfig,
    imaging: B,
    restoration: Option<R>,
    out_dir: PathBuf,
}

impl<B: ImagingBackend, R: RestorationBackend> RepairJob<B, R> {
    pub fn new(config: JobConfig, imaging: B, restoration: Option<R>) -> Self {
        let out_dir = config
            .output
            .clone()
            .unwrap_or_else(|| config.root.join(REPAIR_OUTPUT_DIR));
        Self {
            config,
            imaging,
            restoration,
            out_dir,
        }
    }

    fn process_file(
        &self,
        restoration: &R,
        entry: &FileEntry,
        ctx: &JobContext,
    ) -> FileOutcome {
        let image = match self.imaging.decode(&entry.path) {
            Ok(image) => image,
            Err(err) => return FileOutcome::Failed(decode_failure(err)),
        };

        // 復元パイプラインのどの段の失敗もこのファイルだけの失敗に留める
        let restored = match restoration
            .detect_edges(&image)
            .and_then(|edges| restoration.build_damage_mask(&edges))
            .and_then(|mask| restoration.inpaint(&image, &mask))
        {
            Ok(restored) => restored,
            Err(err) => return FileOutcome::Failed(FileFailure::Unexpected(err.to_string())),
        };

        let Some(name) = entry.path.file_name() else {
            return FileOutcome::Skipped;
        };
        let format =
            OutputFormat::from_extension(&entry.extension).unwrap_or(OutputFormat::Png);
        let target = self.out_dir.join(name);

        let decision = match ConflictResolver::resolve(&target, self.config.policy) {
            Ok(decision) => decision,
            Err(err) => return FileOutcome::Failed(classify_write_error(&err)),
        };
        let Some(destination) = decision.destination else {
            ctx.info(format!("⏩ Skipped: {}", entry.file_name()));
            return FileOutcome::Skipped;
        };

        if let Err(err) = self.imaging.encode(&restored, &destination, format) {
            return FileOutcome::Failed(encode_failure(err));
        }
        ctx.success(format!("✨ Repaired: {}", entry.file_name()));
        FileOutcome::Done
    }
}

impl<B, R> Job for RepairJob<B, R>
where
    B: ImagingBackend + 'static,
    R: RestorationBackend + 'static,
{
    fn kind(&self) -> JobKind {
        JobKind::Repair
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()?;
        JobConfig::ensure_dir(&self.out_dir)
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        // 機能の欠落はジョブレベルの状態であってファイル単位のエラーではない
        let Some(restoration) = self.restoration.take() else {
            ctx.error(
                "❌ Repair feature requires edge detection, contour extraction and inpainting support.",
            );
            ctx.progress(100);
            return Termination::Completed;
        };

        let files: Vec<FileEntry> = FileCatalog::enumerate(&self.config.root)
            .into_iter()
            .filter(|e| FileCatalog::is_image_extension(&e.extension))
            .collect();

        let total = files.len();
        if total == 0 {
            ctx.progress(100);
            return Termination::Completed;
        }

        ctx.info("🔧 Repair started...");
        let mut stats = JobStats::default();

        for (i, entry) in files.iter().enumerate() {
            if ctx.is_cancelled() {
                ctx.warning("🛑 Process stopped by user.");
                return Termination::Cancelled;
            }

            let outcome = self.process_file(&restoration, entry, ctx);
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
