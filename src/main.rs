mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::error;

use cli::{Cli, OutputFormat};
use tree_reader::config::Config;
use tree_reader::error::PipelineError;
use tree_reader::output;
use tree_reader::pipeline::{LengthReporter, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志写到 stderr，stdout 只留给报告
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // 流水线错误的消息已包含原因，不再展开来源链
            match err.downcast_ref::<PipelineError>() {
                Some(err) => error!("{}", err),
                None => error!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => Config::load_or_default().context("无法加载默认配置")?,
    };

    let pipeline = Pipeline::new(&cli.root, &config).context("配置无效")?;

    match cli.format {
        OutputFormat::Text => {
            let report = pipeline.run(LengthReporter::new(io::stdout())).await?;
            output::write_text_summary(&report, &mut io::stdout().lock())?;
        }
        OutputFormat::Json => {
            let report = pipeline.run(LengthReporter::new(io::sink())).await?;
            output::write_json(&report, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
