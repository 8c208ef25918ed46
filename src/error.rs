use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 目录遍历错误 - 对整个运行是致命的
#[derive(Debug, Error)]
pub enum TraversalError {
    /// 根目录不可访问，或遍历中途出现 I/O 错误
    #[error("Error walking the path {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// 单个文件读取错误 - 只影响当前文件，不会中断运行
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Error reading file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading file {}: timed out after {}ms", path.display(), after.as_millis())]
    TimedOut { path: PathBuf, after: Duration },
}

impl ReadError {
    /// 出错的文件路径
    pub fn path(&self) -> &Path {
        match self {
            ReadError::Io { path, .. } | ReadError::TimedOut { path, .. } => path,
        }
    }
}

/// 流水线级错误
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// 后台任务 panic 或被取消
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// 写出读取长度时失败
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("channel_capacity must be greater than zero")]
    ZeroChannelCapacity,

    #[error("read_timeout_ms must be greater than zero")]
    ZeroReadTimeout,

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
