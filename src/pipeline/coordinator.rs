use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError, TraversalError};
use crate::models::{display_path, Report};
use crate::pipeline::{
    channels, collect_filenames, report_lengths, spawn_shutdown_watcher, PayloadProcessor,
};
use crate::scanner::{read_file, FileReader, FsReader, TraversalSource};

/// 协调者 - 驱动遍历、派发读取任务、关闭通道并生成最终报告
pub struct Pipeline<R = FsReader> {
    source: TraversalSource,
    reader: Arc<R>,
    channel_capacity: usize,
    read_timeout: Option<Duration>,
}

impl Pipeline<FsReader> {
    /// 使用配置创建流水线，配置无效时返回错误
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            source: TraversalSource::from_config(root, config)?,
            reader: Arc::new(FsReader),
            channel_capacity: config.pipeline.channel_capacity,
            read_timeout: config.pipeline.read_timeout(),
        })
    }
}

impl<R: FileReader> Pipeline<R> {
    /// 替换文件读取器
    pub fn with_reader<T: FileReader>(self, reader: T) -> Pipeline<T> {
        Pipeline {
            source: self.source,
            reader: Arc::new(reader),
            channel_capacity: self.channel_capacity,
            read_timeout: self.read_timeout,
        }
    }

    /// 运行整个流水线
    ///
    /// 遍历错误是致命的：已派发的读取任务被取消，处理器不会收到任何数据，
    /// 直接返回 `PipelineError::Traversal`。单个文件的读取错误只记录日志。
    /// 报告只在两个消费者都排空结束后生成。
    pub async fn run<P: PayloadProcessor>(self, processor: P) -> Result<Report, PipelineError> {
        let started_at = Utc::now();
        let root = display_path(self.source.root());

        let (senders, payloads, filenames) = channels(self.channel_capacity);
        let counters = senders.counters();

        // 文件名收集不产生输出，可以先开始
        let filenames_task = tokio::spawn(collect_filenames(filenames));

        let tracker = TaskTracker::new();
        let cancel = CancellationToken::new();
        let watcher = spawn_shutdown_watcher(tracker.clone(), senders.clone());

        let traversal = {
            let tracker = tracker.clone();
            let cancel = cancel.clone();
            let handle = Handle::current();
            let source = self.source;
            let reader = self.reader;
            let timeout = self.read_timeout;

            tokio::task::spawn_blocking(move || -> Result<usize, TraversalError> {
                let mut spawned = 0usize;

                for entry in source.entries() {
                    let entry = entry?;
                    if entry.is_directory {
                        continue;
                    }

                    let reader = Arc::clone(&reader);
                    let senders = senders.clone();
                    let cancel = cancel.clone();
                    tracker.spawn_on(
                        async move {
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => {}
                                _ = async {
                                    let result = read_file(reader.as_ref(), entry.path, timeout).await;
                                    senders.deliver(result).await;
                                } => {}
                            }
                        },
                        &handle,
                    );
                    spawned += 1;
                }

                Ok(spawned)
            })
        };

        // 无论遍历成功与否都要关闭 tracker，否则关闭观察者会一直等待
        let walked = traversal.await;
        tracker.close();

        let spawned = match walked {
            Ok(Ok(spawned)) => spawned,
            Ok(Err(err)) => return Err(abort(&cancel, &tracker, err.into()).await),
            Err(err) => return Err(abort(&cancel, &tracker, err.into()).await),
        };
        debug!("遍历完成，共派发 {} 个读取任务", spawned);

        // 遍历成功后才开始处理数据，之前读取任务停在有界通道上
        let lengths_task = tokio::spawn(report_lengths(payloads, processor));

        watcher.await?;
        let data_lengths = lengths_task.await??;
        let files = filenames_task.await?;

        let report = Report::new(
            root,
            counters.succeeded(),
            counters.failed(),
            files,
            data_lengths,
            started_at,
        );

        debug!(
            "读取完成: 成功 {} 个, 失败 {} 个, 共 {} 字节, 用时 {}ms",
            report.file_count, report.failed_count, report.total_bytes, report.elapsed_ms
        );

        Ok(report)
    }
}

/// 取消所有读取任务并等待其退出
async fn abort(
    cancel: &CancellationToken,
    tracker: &TaskTracker,
    err: PipelineError,
) -> PipelineError {
    cancel.cancel();
    tracker.wait().await;
    err
}
