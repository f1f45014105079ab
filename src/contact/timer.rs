//! Cancellable one-shot timers

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// 遅延実行タスクのハンドル
///
/// `cancel` するかハンドルを破棄するとタスクは中断される。
/// 所有者（フォーム）が破棄されたあとに古いタイマーが状態を書き換えることはない。
#[derive(Debug)]
pub struct TimerHandle {
    /// 遅延実行タスク
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// `delay` 経過後に `callback` を実行する
    ///
    /// tokio ランタイム上で呼び出すこと。
    pub fn schedule<F>(delay: Duration, callback: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
        Self { task }
    }

    /// タイマーを中断する
    pub fn cancel(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
