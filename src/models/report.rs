use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// 一次运行的最终汇总，所有并发任务结束后才会生成
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// 遍历的根目录
    pub root: PathBuf,

    /// 成功读取的文件数量
    pub file_count: u64,

    /// 读取失败的文件数量
    pub failed_count: u64,

    /// 成功读取的文件路径（按接收顺序）
    pub files: Vec<PathBuf>,

    /// 每个文件的数据长度（按长度消费者的接收顺序）
    pub data_lengths: Vec<usize>,

    /// 读取的总字节数
    pub total_bytes: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// 运行耗时（毫秒）
    pub elapsed_ms: u64,
}

impl Report {
    pub fn new(
        root: PathBuf,
        file_count: u64,
        failed_count: u64,
        files: Vec<PathBuf>,
        data_lengths: Vec<usize>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        let elapsed_ms = finished_at
            .signed_duration_since(started_at)
            .to_std()
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            root,
            file_count,
            failed_count,
            total_bytes: data_lengths.iter().map(|len| *len as u64).sum(),
            files,
            data_lengths,
            started_at,
            finished_at,
            elapsed_ms,
        }
    }

    /// 计数、文件列表、长度列表三者是否一致
    pub fn is_consistent(&self) -> bool {
        self.file_count as usize == self.files.len()
            && self.files.len() == self.data_lengths.len()
    }
}
