// 修復ジョブの結合テスト
//
// 復元バックエンドはモックで差し替え、ジョブ側の配線
// （機能欠落時の挙動・パイプライン失敗の局所化）を検証する。

use image::GrayImage;
use std::fs;
use std::path::Path;

use media_organizer::core::traits::MockRestorationBackend;
use media_organizer::{
    ConflictPolicy, JobConfig, JobEvent, JobRunner, NoRestoration, RepairJob,
    StandardImagingBackend, Termination,
};

// 1x1の透過PNG
const MINIMAL_PNG_DATA: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
    0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
    0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
    0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
    0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

async fn collect<B, R>(job: RepairJob<B, R>) -> (Termination, Vec<String>)
where
    B: media_organizer::ImagingBackend + Send + 'static,
    R: media_organizer::RestorationBackend + Send + 'static,
{
    let runner = JobRunner::new();
    let mut handle = runner.start(job).unwrap();

    let mut logs = Vec::new();
    let mut termination = None;
    while let Some(event) = handle.recv().await {
        match event {
            JobEvent::Log(log) => logs.push(log.message),
            JobEvent::Finished(t) => termination = Some(t),
            JobEvent::Progress(_) => {}
        }
    }
    (termination.unwrap(), logs)
}

fn config(root: &Path) -> JobConfig {
    JobConfig::new(root, ConflictPolicy::CopyWithSuffix)
}

#[tokio::test]
async fn test_missing_backend_completes_without_touching_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tiny.png"), MINIMAL_PNG_DATA).unwrap();

    let job = RepairJob::<_, NoRestoration>::new(
        config(root),
        StandardImagingBackend::new(),
        None,
    );
    let (termination, logs) = collect(job).await;

    // 機能欠落はエラー終了ではなく「何もせず完了」
    assert_eq!(termination, Termination::Completed);
    assert!(logs.iter().any(|m| m.contains("Repair feature requires")));
    assert!(!root.join("repaired").join("tiny.png").exists());
    assert_eq!(fs::read(root.join("tiny.png")).unwrap(), MINIMAL_PNG_DATA);
}

#[tokio::test]
async fn test_mocked_pipeline_writes_repaired_copy() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("tiny.png"), MINIMAL_PNG_DATA).unwrap();

    let mut restoration = MockRestorationBackend::new();
    restoration
        .expect_detect_edges()
        .times(1)
        .returning(|image| Ok(GrayImage::new(image.width(), image.height())));
    restoration
        .expect_build_damage_mask()
        .times(1)
        .returning(|edges| Ok(edges.clone()));
    restoration
        .expect_inpaint()
        .times(1)
        .returning(|image, _mask| Ok(image.clone()));

    let job = RepairJob::new(config(root), StandardImagingBackend::new(), Some(restoration));
    let (termination, logs) = collect(job).await;

    assert_eq!(termination, Termination::Completed);
    assert!(logs.iter().any(|m| m.contains("Repaired: tiny.png")));
    assert!(root.join("repaired").join("tiny.png").exists());
    // 元ファイルはそのまま
    assert_eq!(fs::read(root.join("tiny.png")).unwrap(), MINIMAL_PNG_DATA);
}

#[tokio::test]
async fn test_pipeline_failure_is_contained_per_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.png"), MINIMAL_PNG_DATA).unwrap();
    fs::write(root.join("b.png"), MINIMAL_PNG_DATA).unwrap();

    let mut restoration = MockRestorationBackend::new();
    restoration
        .expect_detect_edges()
        .times(2)
        .returning(|_| Err(anyhow::anyhow!("edge detector exploded")));

    let job = RepairJob::new(config(root), StandardImagingBackend::new(), Some(restoration));
    let (termination, logs) = collect(job).await;

    // 全ファイル失敗でもジョブ自体は完了する
    assert_eq!(termination, Termination::Completed);
    assert_eq!(
        logs.iter()
            .filter(|m| m.contains("Unexpected Error"))
            .count(),
        2
    );
    assert!(logs.iter().any(|m| m.contains("Done: 0")));
}
