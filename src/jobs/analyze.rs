// フォルダ内容の集計ジョブ（画像・動画・その他の件数と総サイズ）

use crate::catalog::FileCatalog;
use crate::core::error::JobResult;
use crate::core::types::{JobConfig, JobKind, Termination};
use crate::jobs::percent;
use crate::runner::{Job, JobContext};

pub struct AnalyzeJob {
    config: JobConfig,
}

impl AnalyzeJob {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }
}

impl Job for AnalyzeJob {
    fn kind(&self) -> JobKind {
        JobKind::Analyze
    }

    fn validate(&self) -> JobResult<()> {
        self.config.validate_root()
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        let files = FileCatalog::enumerate(&self.config.root);
        let total = files.len();

        let mut images = 0usize;
        let mut videos = 0usize;
        let mut others = 0usize;
        let mut bytes = 0u64;

        for (i, entry) in files.iter().enumerate() {
            if ctx.is_cancelled() {
                ctx.warning("🛑 Process stopped by user.");
                return Termination::Cancelled;
            }

            if FileCatalog::is_image_extension(&entry.extension) {
                images += 1;
            } else if FileCatalog::is_video_extension(&entry.extension) {
                videos += 1;
            } else {
                others += 1;
            }
            bytes += entry.size;
            ctx.progress(percent(i + 1, total));
        }

        ctx.info(format!("🖼 Images: {images}"));
        ctx.info(format!("🎬 Videos: {videos}"));
        ctx.info(format!("📦 Others: {others}"));
        ctx.success(format!(
            "💾 Total size: {:.2} MB",
            bytes as f64 / (1024.0 * 1024.0)
        ));
        ctx.progress(100);
        Termination::Completed
    }
}
