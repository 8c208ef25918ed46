use futures::StreamExt;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// 文件内容的处理槽位
pub trait PayloadProcessor: Send + 'static {
    fn process(&mut self, payload: &[u8]) -> io::Result<()>;
}

/// 为每个文件输出一行 `Read file data length: <N>`
pub struct LengthReporter<W> {
    out: W,
}

impl<W: Write + Send + 'static> LengthReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send + 'static> PayloadProcessor for LengthReporter<W> {
    fn process(&mut self, payload: &[u8]) -> io::Result<()> {
        writeln!(self.out, "Read file data length: {}", payload.len())?;
        self.out.flush()
    }
}

/// 排空 payload 通道，返回按接收顺序记录的长度
///
/// 处理器出错时立即返回，接收端随之释放，后续发送会失败。
pub async fn report_lengths<P: PayloadProcessor>(
    mut payloads: mpsc::Receiver<Vec<u8>>,
    mut processor: P,
) -> io::Result<Vec<usize>> {
    let mut lengths = Vec::new();

    while let Some(payload) = payloads.recv().await {
        processor.process(&payload)?;
        lengths.push(payload.len());
    }

    Ok(lengths)
}

/// 排空 filename 通道，按接收顺序收集路径
///
/// 返回的列表只由本任务写入。
pub async fn collect_filenames(filenames: mpsc::Receiver<PathBuf>) -> Vec<PathBuf> {
    ReceiverStream::new(filenames).collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingProcessor;

    impl PayloadProcessor for FailingProcessor {
        fn process(&mut self, _payload: &[u8]) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[tokio::test]
    async fn test_report_lengths() {
        let (tx, rx) = mpsc::channel(8);
        let buffer = SharedBuffer::default();

        tx.send(vec![0u8; 5]).await.unwrap();
        tx.send(vec![0u8; 10]).await.unwrap();
        drop(tx);

        let lengths = report_lengths(rx, LengthReporter::new(buffer.clone()))
            .await
            .unwrap();

        assert_eq!(lengths, vec![5, 10]);
        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            written,
            "Read file data length: 5\nRead file data length: 10\n"
        );
    }

    #[tokio::test]
    async fn test_report_lengths_stops_on_processor_error() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(vec![1]).await.unwrap();

        let result = report_lengths(rx, FailingProcessor).await;
        assert!(result.is_err());
        // 接收端已释放
        assert!(tx.send(vec![2]).await.is_err());
    }

    #[tokio::test]
    async fn test_collect_filenames_in_receipt_order() {
        let (tx, rx) = mpsc::channel(2);
        let collector = tokio::spawn(collect_filenames(rx));

        for name in ["b.txt", "a.txt", "c/d.txt"] {
            tx.send(PathBuf::from(name)).await.unwrap();
        }
        drop(tx);

        let names = collector.await.unwrap();
        assert_eq!(
            names,
            vec![
                PathBuf::from("b.txt"),
                PathBuf::from("a.txt"),
                PathBuf::from("c/d.txt")
            ]
        );
    }
}
