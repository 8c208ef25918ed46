//! 并发读取与聚合流水线
//!
//! ```text
//! TraversalSource ──spawn──► Read Task × N ──► payload 通道 ──► 长度消费者
//!                                  │       └─► filename 通道 ──► 文件名收集者
//!                                  └─► 原子计数器
//! ```
//!
//! 所有读取任务由 `TaskTracker` 跟踪，关闭观察者在其全部完成后释放最后的发送端，
//! 两个通道随之关闭，消费者在排空后结束。

pub mod consumers;
pub mod coordinator;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

use crate::error::ReadError;
use crate::models::ReadOutcome;

pub use consumers::{collect_filenames, report_lengths, LengthReporter, PayloadProcessor};
pub use coordinator::Pipeline;

/// 成功与失败计数，生产者直接原子递增
#[derive(Debug, Default)]
pub struct Counters {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }
}

/// 读取任务持有的发送端集合
#[derive(Debug, Clone)]
pub struct AggregationSenders {
    payloads: mpsc::Sender<Vec<u8>>,
    filenames: mpsc::Sender<PathBuf>,
    counters: Arc<Counters>,
}

/// 创建两个有界聚合通道
///
/// `capacity` 必须大于 0。
pub fn channels(
    capacity: usize,
) -> (AggregationSenders, mpsc::Receiver<Vec<u8>>, mpsc::Receiver<PathBuf>) {
    let (payload_tx, payload_rx) = mpsc::channel(capacity);
    let (filename_tx, filename_rx) = mpsc::channel(capacity);

    let senders = AggregationSenders {
        payloads: payload_tx,
        filenames: filename_tx,
        counters: Arc::new(Counters::default()),
    };

    (senders, payload_rx, filename_rx)
}

impl AggregationSenders {
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    /// 投递一次读取结果，只有两个通道都发送成功才计入成功数
    pub async fn deliver(&self, result: Result<ReadOutcome, ReadError>) -> bool {
        let ReadOutcome { path, payload } = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("{}", err);
                self.counters.failed.fetch_add(1, Ordering::AcqRel);
                return false;
            }
        };

        if self.payloads.send(payload).await.is_err() {
            warn!("长度消费者已退出，丢弃: {}", path.display());
            return false;
        }

        if self.filenames.send(path).await.is_err() {
            warn!("文件名收集者已退出");
            return false;
        }

        self.counters.succeeded.fetch_add(1, Ordering::AcqRel);
        true
    }
}

/// 等待所有读取任务结束后释放发送端
///
/// 调用方必须在遍历结束后调用 `tracker.close()`，否则该任务永远不会结束。
pub fn spawn_shutdown_watcher(tracker: TaskTracker, senders: AggregationSenders) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracker.wait().await;
        debug!("所有读取任务已结束，关闭聚合通道");
        drop(senders);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_success() {
        let (senders, mut payloads, mut filenames) = channels(4);
        let counters = senders.counters();

        let delivered = senders
            .deliver(Ok(ReadOutcome {
                path: PathBuf::from("a.txt"),
                payload: b"hello".to_vec(),
            }))
            .await;

        assert!(delivered);
        assert_eq!(payloads.recv().await.unwrap(), b"hello");
        assert_eq!(filenames.recv().await.unwrap(), PathBuf::from("a.txt"));
        assert_eq!(counters.succeeded(), 1);
        assert_eq!(counters.failed(), 0);
    }

    #[tokio::test]
    async fn test_deliver_failure_sends_nothing() {
        let (senders, mut payloads, mut filenames) = channels(4);
        let counters = senders.counters();

        let err = ReadError::Io {
            path: PathBuf::from("locked.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!senders.deliver(Err(err)).await);

        drop(senders);
        assert!(payloads.recv().await.is_none());
        assert!(filenames.recv().await.is_none());
        assert_eq!(counters.succeeded(), 0);
        assert_eq!(counters.failed(), 1);
    }

    #[tokio::test]
    async fn test_deliver_to_closed_consumer_is_not_counted() {
        let (senders, payloads, _filenames) = channels(1);
        let counters = senders.counters();
        drop(payloads);

        let delivered = senders
            .deliver(Ok(ReadOutcome {
                path: PathBuf::from("a.txt"),
                payload: vec![1, 2, 3],
            }))
            .await;

        assert!(!delivered);
        assert_eq!(counters.succeeded(), 0);
    }

    #[tokio::test]
    async fn test_watcher_closes_channels_after_tasks() {
        let (senders, mut payloads, mut filenames) = channels(1);
        let tracker = TaskTracker::new();

        for i in 0..3u8 {
            let senders = senders.clone();
            tracker.spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(5 * i as u64)).await;
                senders
                    .deliver(Ok(ReadOutcome {
                        path: PathBuf::from(format!("{i}.txt")),
                        payload: vec![i],
                    }))
                    .await;
            });
        }

        let counters = senders.counters();
        let watcher = spawn_shutdown_watcher(tracker.clone(), senders);
        tracker.close();

        let names = tokio::spawn(async move {
            let mut names = Vec::new();
            while let Some(name) = filenames.recv().await {
                names.push(name);
            }
            names
        });

        let mut received = 0;
        while payloads.recv().await.is_some() {
            received += 1;
        }

        watcher.await.unwrap();
        assert_eq!(received, 3);
        assert_eq!(names.await.unwrap().len(), 3);
        assert_eq!(counters.succeeded(), 3);
    }
}
