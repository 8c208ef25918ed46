use futures::future::{BoxFuture, FutureExt};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ReadError;
use crate::models::ReadOutcome;

/// 文件读取接口，测试中可以替换为带延迟或故障注入的实现
pub trait FileReader: Send + Sync + 'static {
    fn read<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<Vec<u8>>>;
}

/// 基于 tokio::fs 的读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<Vec<u8>>> {
        tokio::fs::read(path).boxed()
    }
}

/// 完整读取一个文件，失败时返回带路径的 `ReadError`
pub async fn read_file<R>(
    reader: &R,
    path: PathBuf,
    timeout: Option<Duration>,
) -> Result<ReadOutcome, ReadError>
where
    R: FileReader + ?Sized,
{
    let read = reader.read(&path);
    let result = match timeout {
        Some(after) => match tokio::time::timeout(after, read).await {
            Ok(result) => result,
            Err(_) => return Err(ReadError::TimedOut { path, after }),
        },
        None => read.await,
    };

    match result {
        Ok(payload) => Ok(ReadOutcome { path, payload }),
        Err(source) => Err(ReadError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    struct SlowReader(Duration);

    impl FileReader for SlowReader {
        fn read<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<Vec<u8>>> {
            async move {
                tokio::time::sleep(self.0).await;
                tokio::fs::read(path).await
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_read_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").await.unwrap();

        let outcome = read_file(&FsReader, path.clone(), None).await.unwrap();
        assert_eq!(outcome.path, path);
        assert_eq!(outcome.payload, b"hello");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.txt");

        let err = read_file(&FsReader, path.clone(), None).await.unwrap_err();
        assert!(matches!(&err, ReadError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound));
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().starts_with("Error reading file "));
    }

    #[tokio::test]
    async fn test_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slow.txt");
        fs::write(&path, "zzz").await.unwrap();

        let reader = SlowReader(Duration::from_secs(5));
        let err = read_file(&reader, path, Some(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::TimedOut { .. }));

        let reader = SlowReader(Duration::from_millis(1));
        let outcome = read_file(&reader, temp_dir.path().join("slow.txt"), Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(outcome.payload.len(), 3);
    }
}
