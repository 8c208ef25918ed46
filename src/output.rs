use anyhow::Result;
use std::io::Write;

use crate::models::Report;

/// 文本汇总：计数、`Files:` 以及每行一个路径
pub fn write_text_summary<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    writeln!(out, "Total files processed: {}", report.file_count)?;
    writeln!(out, "Files:")?;
    for file in &report.files {
        writeln!(out, "{}", file.display())?;
    }
    out.flush()?;
    Ok(())
}

/// JSON 格式的完整报告
pub fn write_json<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
