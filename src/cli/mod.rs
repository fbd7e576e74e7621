// コマンドラインフロントエンド
//
// サブコマンドからジョブを組み立てて実行し、イベントストリームを
// コンソールへ流す。Ctrl+C はジョブへのキャンセル要求に変換する。

pub mod args;

use anyhow::Result;
use std::path::PathBuf;

use crate::catalog::FileCatalog;
use crate::core::traits::NoRestoration;
use crate::core::types::{ConflictPolicy, JobConfig, JobEvent, LogLevel, Termination};
use crate::imaging::StandardImagingBackend;
use crate::jobs::{AnalyzeJob, CleanupJob, ConvertJob, OrganizeJob, PrivacyJob, RepairJob};
use crate::rename::BatchRenamer;
use crate::runner::{JobHandle, JobRunner};

pub use args::{Cli, Commands};

fn build_config(root: PathBuf, on_conflict: &str, output: Option<PathBuf>) -> JobConfig {
    let mut config = JobConfig::new(root, ConflictPolicy::normalize(on_conflict));
    if let Some(output) = output {
        config = config.with_output(output);
    }
    config
}

pub async fn run(cli: Cli) -> Result<()> {
    let runner = JobRunner::new();
    match cli.command {
        Commands::Analyze { root } => {
            let config = JobConfig::new(root, ConflictPolicy::CopyWithSuffix);
            drive(runner.start(AnalyzeJob::new(config))?).await
        }
        Commands::Organize {
            root,
            mode,
            on_conflict,
        } => {
            let config = build_config(root, &on_conflict, None);
            drive(runner.start(OrganizeJob::new(config, mode))?).await
        }
        Commands::Cleanup { root, on_conflict } => {
            let config = build_config(root, &on_conflict, None);
            drive(runner.start(CleanupJob::new(config))?).await
        }
        Commands::Convert {
            root,
            format,
            output,
            on_conflict,
        } => {
            let config = build_config(root, &on_conflict, output);
            let job = ConvertJob::new(config, format, StandardImagingBackend::new());
            drive(runner.start(job)?).await
        }
        Commands::Privacy {
            root,
            output,
            on_conflict,
        } => {
            let config = build_config(root, &on_conflict, output);
            let job = PrivacyJob::new(config, StandardImagingBackend::new());
            drive(runner.start(job)?).await
        }
        Commands::Repair {
            root,
            output,
            on_conflict,
        } => {
            let config = build_config(root, &on_conflict, output);
            // このビルドは復元バックエンドを同梱しない
            let job =
                RepairJob::<_, NoRestoration>::new(config, StandardImagingBackend::new(), None);
            drive(runner.start(job)?).await
        }
        Commands::Rename {
            root,
            pattern,
            start,
        } => {
            let entries = FileCatalog::enumerate(&root);
            let renamer = BatchRenamer::new(pattern, start);
            let renamed = renamer.rename_files(&entries);
            println!("✅ Renamed {renamed} of {} file(s)", entries.len());
            Ok(())
        }
    }
}

/// イベントを読み切るまでコンソールへ流す
async fn drive(mut handle: JobHandle) -> Result<()> {
    let canceller = handle.canceller();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    while let Some(event) = handle.recv().await {
        match event {
            JobEvent::Progress(percent) => println!("⏳ {percent}%"),
            JobEvent::Log(log) => match log.level {
                LogLevel::Warning | LogLevel::Error => eprintln!("{}", log.message),
                _ => println!("{}", log.message),
            },
            JobEvent::Finished(Termination::Completed) => println!("✅ Job finished."),
            JobEvent::Finished(Termination::Cancelled) => println!("🛑 Job cancelled."),
        }
    }

    ctrl_c.abort();
    Ok(())
}
