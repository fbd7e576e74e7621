// ジョブ実行基盤の結合テスト
//
// 実際のジョブ実装には依存せず、テスト専用の小さなジョブで
// 単一実行・キャンセル・イベント順序の契約を検証する。

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use media_organizer::{Job, JobContext, JobError, JobEvent, JobKind, JobRunner, Termination};

/// 1ティックごとにファイルを1つ書き、キャンセルに応答するテストジョブ
struct TickJob {
    dir: PathBuf,
    ticks: usize,
    delay: Duration,
}

impl Job for TickJob {
    fn kind(&self) -> JobKind {
        JobKind::Analyze
    }

    fn run(&mut self, ctx: &JobContext) -> Termination {
        for i in 0..self.ticks {
            if ctx.is_cancelled() {
                return Termination::Cancelled;
            }
            fs::write(self.dir.join(format!("tick_{i}.txt")), b"x").unwrap();
            ctx.info(format!("tick {i}"));
            ctx.progress(((i + 1) * 100 / self.ticks) as u8);
            std::thread::sleep(self.delay);
        }
        Termination::Completed
    }
}

#[tokio::test]
async fn test_completed_job_emits_monotone_progress_and_one_terminal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let runner = JobRunner::new();
    let mut handle = runner
        .start(TickJob {
            dir: temp_dir.path().to_path_buf(),
            ticks: 4,
            delay: Duration::from_millis(1),
        })
        .unwrap();

    let mut progress = Vec::new();
    let mut terminals = Vec::new();
    while let Some(event) = handle.recv().await {
        match event {
            JobEvent::Progress(p) => progress.push(p),
            JobEvent::Finished(t) => terminals.push(t),
            JobEvent::Log(_) => {}
        }
    }

    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress.last(), Some(&100));
    assert_eq!(terminals, vec![Termination::Completed]);
}

#[tokio::test]
async fn test_second_start_is_rejected_while_busy() {
    let temp_dir = tempfile::tempdir().unwrap();
    let runner = JobRunner::new();
    let handle = runner
        .start(TickJob {
            dir: temp_dir.path().to_path_buf(),
            ticks: 200,
            delay: Duration::from_millis(10),
        })
        .unwrap();

    // 実行中の2本目は同期的に拒否される（キューイングしない）
    let second = runner.start(TickJob {
        dir: temp_dir.path().to_path_buf(),
        ticks: 1,
        delay: Duration::ZERO,
    });
    assert!(matches!(second, Err(JobError::Busy)));

    handle.cancel();
    let termination = handle.wait().await.unwrap();
    assert_eq!(termination, Termination::Cancelled);

    // 終了後は次のジョブを受け付ける
    let third = runner
        .start(TickJob {
            dir: temp_dir.path().to_path_buf(),
            ticks: 1,
            delay: Duration::ZERO,
        })
        .unwrap();
    assert_eq!(third.wait().await.unwrap(), Termination::Completed);
}

#[tokio::test]
async fn test_cancel_stops_processing_partway() {
    let temp_dir = tempfile::tempdir().unwrap();
    let runner = JobRunner::new();
    let mut handle = runner
        .start(TickJob {
            dir: temp_dir.path().to_path_buf(),
            ticks: 500,
            delay: Duration::from_millis(5),
        })
        .unwrap();

    // 最初のログを見てからキャンセルする
    while let Some(event) = handle.recv().await {
        if matches!(event, JobEvent::Log(_)) {
            break;
        }
    }
    handle.cancel();

    let termination = handle.wait().await.unwrap();
    assert_eq!(termination, Termination::Cancelled);

    // 既に処理済みのファイルはそのまま残り、全件には到達していない
    let written = fs::read_dir(temp_dir.path()).unwrap().count();
    assert!(written >= 1);
    assert!(written < 500);
}

#[tokio::test]
async fn test_validation_failure_leaves_runner_free() {
    struct FailingJob;
    impl Job for FailingJob {
        fn kind(&self) -> JobKind {
            JobKind::Analyze
        }
        fn validate(&self) -> Result<(), JobError> {
            Err(JobError::validation("root", "missing"))
        }
        fn run(&mut self, _ctx: &JobContext) -> Termination {
            Termination::Completed
        }
    }

    let temp_dir = tempfile::tempdir().unwrap();
    let runner = JobRunner::new();
    assert!(matches!(
        runner.start(FailingJob),
        Err(JobError::Validation { .. })
    ));
    assert!(!runner.is_busy());

    // 検証失敗後も通常のジョブは起動できる
    let handle = runner
        .start(TickJob {
            dir: temp_dir.path().to_path_buf(),
            ticks: 1,
            delay: Duration::ZERO,
        })
        .unwrap();
    assert_eq!(handle.wait().await.unwrap(), Termination::Completed);
}
