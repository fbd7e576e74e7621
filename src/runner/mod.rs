// キャンセル可能なバックグラウンドジョブの実行基盤
//
// システム全体で同時に動くジョブは最大1つ。呼び出し側スレッドとは
// 別のワーカーでジョブ本体（同期的なファイルループ）を実行し、
// 進捗・ログ・終了イベントをチャンネル経由で順序通りに届ける。

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::core::error::{JobError, JobResult};
use crate::core::types::{JobEvent, JobKind, LogEvent, LogLevel, Termination};

/// 1回のファイル変換操作を表すジョブ
///
/// `validate` は起動前に同期的に呼ばれ、ここで失敗したジョブは
/// `Running` に入らない。`run` の中のファイル単位の失敗はログとして
/// 発行し、戻り値は完了かキャンセルかだけを区別する。
pub trait Job: Send + 'static {
    fn kind(&self) -> JobKind;

    /// 起動時検証（ルートの存在確認、必須出力先の作成など）
    fn validate(&self) -> JobResult<()> {
        Ok(())
    }

    /// ジョブ本体。ファイル1件ごとに `ctx.is_cancelled()` を確認すること。
    fn run(&mut self, ctx: &JobContext) -> Termination;
}

/// 実行中ジョブからイベントを発行するためのハンドル
pub struct JobContext {
    events: UnboundedSender<JobEvent>,
    cancel: Arc<AtomicBool>,
    // 単調性を強制するための最終送信値（未送信はセンチネル）
    last_progress: AtomicU16,
}

const PROGRESS_UNSET: u16 = u16::MAX;

impl JobContext {
    fn new(events: UnboundedSender<JobEvent>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            events,
            cancel,
            last_progress: AtomicU16::new(PROGRESS_UNSET),
        }
    }

    /// キャンセル要求が届いているか（ファイル1件ごとに確認する）
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// 進捗率を発行する（0..=100、単調非減少にクランプ）
    pub fn progress(&self, percent: u8) {
        let percent = percent.min(100) as u16;
        let previous = self.last_progress.load(Ordering::Relaxed);
        if previous != PROGRESS_UNSET && percent <= previous {
            return;
        }
        self.last_progress.store(percent, Ordering::Relaxed);
        let _ = self.events.send(JobEvent::Progress(percent as u8));
    }

    /// ログ行を発行する（発行後は不変・順序保証あり）
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let _ = self.events.send(JobEvent::Log(LogEvent {
            level,
            message: message.into(),
        }));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    fn finish(&self, termination: Termination) {
        let _ = self.events.send(JobEvent::Finished(termination));
    }
}

/// 起動中フラグをワーカー終了時に確実に戻すガード
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 呼び出し側が保持するジョブハンドル
pub struct JobHandle {
    kind: JobKind,
    cancel: Arc<AtomicBool>,
    events: UnboundedReceiver<JobEvent>,
    task: JoinHandle<()>,
}

/// UIのキャンセルボタン等へ渡せる独立したキャンセル用ハンドル
#[derive(Clone)]
pub struct JobCanceller(Arc<AtomicBool>);

impl JobCanceller {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl JobHandle {
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// キャンセルを要求する（冪等・非同期、次のチェックポイントで反映）
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn canceller(&self) -> JobCanceller {
        JobCanceller(Arc::clone(&self.cancel))
    }

    /// 次のイベントを受け取る。チャンネルが閉じたら `None`。
    pub async fn recv(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }

    /// イベントを読み捨てて終了まで待つ
    pub async fn wait(mut self) -> JobResult<Termination> {
        let mut termination = None;
        while let Some(event) = self.events.recv().await {
            if let JobEvent::Finished(t) = event {
                termination = Some(t);
            }
        }
        self.task.await?;
        termination.ok_or_else(|| {
            JobError::setup(
                "ジョブが終了イベントを発行しませんでした",
                anyhow::anyhow!("missing terminal event"),
            )
        })
    }
}

/// ジョブ実行器 - 同時実行は常に1ジョブまで
pub struct JobRunner {
    active: Arc<AtomicBool>,
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// ジョブを検証して起動する
    ///
    /// 別のジョブが実行中なら同期的に `JobError::Busy` を返す
    /// （キューイングはしない）。検証に失敗したジョブも起動しない。
    pub fn start<J: Job>(&self, mut job: J) -> JobResult<JobHandle> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(JobError::busy());
        }

        if let Err(err) = job.validate() {
            self.active.store(false, Ordering::SeqCst);
            return Err(err);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let ctx = JobContext::new(tx, Arc::clone(&cancel));
        let kind = job.kind();
        let active = Arc::clone(&self.active);

        let task = tokio::task::spawn_blocking(move || {
            let _guard = ActiveGuard(active);
            let termination = job.run(&ctx);
            ctx.finish(termination);
        });

        Ok(JobHandle {
            kind,
            cancel,
            events: rx,
            task,
        })
    }
}
