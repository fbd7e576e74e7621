// 集計ジョブの結合テスト

use std::fs;

use media_organizer::{AnalyzeJob, ConflictPolicy, JobConfig, JobEvent, JobRunner, Termination};

#[tokio::test]
async fn test_counts_by_category() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.jpg"), vec![0u8; 100]).unwrap();
    fs::write(root.join("b.png"), vec![0u8; 200]).unwrap();
    fs::write(root.join("clip.mp4"), vec![0u8; 300]).unwrap();
    fs::write(root.join("notes.txt"), vec![0u8; 50]).unwrap();

    let runner = JobRunner::new();
    let config = JobConfig::new(root, ConflictPolicy::CopyWithSuffix);
    let mut handle = runner.start(AnalyzeJob::new(config)).unwrap();

    let mut logs = Vec::new();
    let mut termination = None;
    while let Some(event) = handle.recv().await {
        match event {
            JobEvent::Log(log) => logs.push(log.message),
            JobEvent::Finished(t) => termination = Some(t),
            JobEvent::Progress(_) => {}
        }
    }

    assert_eq!(termination, Some(Termination::Completed));
    assert!(logs.iter().any(|m| m.contains("Images: 2")));
    assert!(logs.iter().any(|m| m.contains("Videos: 1")));
    assert!(logs.iter().any(|m| m.contains("Others: 1")));
    assert!(logs.iter().any(|m| m.contains("Total size: 0.00 MB")));
}

#[tokio::test]
async fn test_empty_folder_reports_zeroes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let runner = JobRunner::new();
    let config = JobConfig::new(temp_dir.path(), ConflictPolicy::CopyWithSuffix);
    let handle = runner.start(AnalyzeJob::new(config)).unwrap();
    assert_eq!(handle.wait().await.unwrap(), Termination::Completed);
}
