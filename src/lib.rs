pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scanner;

// 重新导出常用类型
pub use config::Config;
pub use error::{PipelineError, ReadError, TraversalError};
pub use models::{DirectoryEntry, ReadOutcome, Report};
pub use pipeline::{LengthReporter, PayloadProcessor, Pipeline};
pub use scanner::{FileReader, FsReader, TraversalSource};
