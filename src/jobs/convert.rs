// 画像フォーマット変換ジョブ

use image::DynamicImage;
use std::path::PathBuf;

use crate::catalog::FileCatalog;
use crate::conflict::ConflictResolver;
use crate::core::error::JobResult;
use crate::core::traits::ImagingBackend;
use crate::core::types::{
    classify_write_error, FileEntry, FileOutcome, JobConfig, JobKind, OutputFormat, Termination,
};
use crate::jobs::{decode_failure, encode_failure, log_failure, percent, JobStats};
use crate::runner::{Job, JobContext};

/// 変換結果のデフォルト出力フォルダ名
pub const CONVERT_OUTPUT_DIR: &str = "converted";

pub struct ConvertJob<B: ImagingBackend> {
    config: JobConfig,
    target: OutputFormat,
    imaging: B,
    out_dir: PathBuf,
}

impl<B: ImagingBackend> ConvertJob<B> {
    pub fn new(config: JobConfig, target: OutputFormat, imaging: B) -> Self {
        let out_dir = config
            .output
            .clone()
            .unwrap_or_else(|| config.root.join(CONVERT_OUTPUT_DIR));
        Self {
            config,
            target,
            imaging,
            out_dir,
        }
    }

    fn process_file(&self, entry: &FileEntry, ctx: &JobContext) -> FileOutcome {
        let image = match self.imaging.decode(&entry.path) {
            Ok(image) => image,
            Err(err) => return FileOutcome::Failed(decode_failure(err)),
        };

        // アルファを持てないフォーマットへは不透明なRGBに落としてから書く
        let image = if self.target.supports_alpha() {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let Some(stem) = entry.path.file_stem() else {
            return FileOutcome::Skipped;
        };
        let target_path = self.out_dir.join(format!(
            "{}.{}",
            stem.to_string_lossy(),
            self.target.extension()
        ));

        let decision = match ConflictResolver::resolve(&target_path, self.config.policy) {
            Ok(decision) => decision,
            Err(err) => return FileOutcome::Failed(classify_write_error(&err)),
        };
        let Some(destination) = decision.destination else {
            ctx.info(format!("⏩ Skipped: {}", entry.file_name()));
            return FileOutcome::Skipped;
        };

        if let Err(err) = self.imaging.encode(&image, &destination, self.target) {
            return FileOutcome::Failed(encode_failure(err));
        }
        ctx.success(format!("✅ Converted: {}", entry.file_name()));
        FileOutcome::Done
    }
}

impl<B: ImagingBackend + 'static> Job for ConvertJob<B> {
    fn kind(&self) -> JobKind {
        JobKind::Convert
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()?;
        JobConfig::ensure_dir(&self.out_dir)
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        // 既に目的フォーマットのファイルは対象外
        let files: Vec<FileEntry> = FileCatalog::enumerate(&self.config.root)
            .into_iter()
            .filter(|e| FileCatalog::is_image_extension(&e.extension))
            .filter(|e| OutputFormat::from_extension(&e.extension) != Some(self.target))
            .collect();

        let total = files.len();
        if total == 0 {
            ctx.info("ℹ️ No images to convert.");
            ctx.progress(100);
            return Termination::Completed;
        }

        ctx.info(format!("🔄 Converting -> {}", self.target.extension()));
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
