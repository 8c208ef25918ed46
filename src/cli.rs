use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tree-reader")]
#[command(about = "Concurrently read every file under a directory tree and report what was read")]
#[command(version)]
pub struct Cli {
    /// 遍历的根目录
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 每个文件一行长度，最后输出汇总
    Text,
    /// JSON 格式的完整报告
    Json,
}
