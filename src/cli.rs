//! 命令分发与输出渲染
//!
//! stdout 只输出结果（Markdown 或 JSON），日志一律走 stderr。

use anyhow::{Context, Result};
use serde_json::json;
use std::io::Read;
use std::path::Path;

use crate::assess::{self, Unit};
use crate::config::ScanConfig;
use crate::engine::{self, FileReport};
use crate::Command;

pub fn handle_command(command: Command, json_output: bool) -> Result<()> {
    match command {
        Command::Scan { path, full, config } => handle_scan(
            Path::new(&path),
            full,
            config.as_deref().map(Path::new),
            json_output,
        ),
        Command::Analyze { file } => handle_analyze(Path::new(&file), json_output),
        Command::Assess { file } => handle_assess(file.as_deref()),
        Command::Status => handle_status(json_output),
    }
}

fn handle_scan(path: &Path, full: bool, config: Option<&Path>, json_output: bool) -> Result<()> {
    let config = match config {
        Some(p) => ScanConfig::load(p)?,
        None => ScanConfig::default(),
    };
    let (file_count, reports) = engine::scan_directory(path, &config)?;

    if json_output {
        let total: usize = reports.iter().map(|r| r.findings.len()).sum();
        let out = json!({
            "files": file_count,
            "findings": total,
            "reports": reports,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_scan_report(file_count, &reports, full));
    }
    Ok(())
}

fn handle_analyze(file: &Path, json_output: bool) -> Result<()> {
    let report = engine::scan_file(file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_analyze_report(&report));
    }
    Ok(())
}

/// 批量评估走 JSON in / JSON out，不受 --json 影响
fn handle_assess(file: Option<&str>) -> Result<()> {
    let raw = match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read units file {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read units from stdin")?;
            buf
        }
    };

    let units: Vec<Unit> = serde_json::from_str(&raw).context("parse units json")?;
    let assessed = assess::assess_units(units);
    println!("{}", serde_json::to_string_pretty(&assessed)?);
    Ok(())
}

fn handle_status(json_output: bool) -> Result<()> {
    let status = engine::engine_status();
    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "✅ {} ready (v{})",
            status["rule"].as_str().unwrap_or("?"),
            status["version"].as_str().unwrap_or("?")
        );
    }
    Ok(())
}

// ============================================================================
// Markdown 渲染
// ============================================================================

fn render_scan_report(file_count: usize, reports: &[FileReport], full: bool) -> String {
    let total: usize = reports.iter().map(|r| r.findings.len()).sum();
    let mut out = format!(
        "## 🛰️ ABAP SELECT 扫描\n\n**时间**: {} | **文件**: {} | **发现**: {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        file_count,
        total
    );

    if total == 0 {
        out.push_str("✅ 未发现 ORDER BY / SORT 问题\n");
        return out;
    }

    for report in reports {
        out.push_str(&format!("### {}\n\n", report.file));
        for f in &report.findings {
            if full {
                out.push_str(&format!(
                    "- **{}** - [{}..{}) - {}\n",
                    f.target_name.as_str(),
                    f.start_char_in_unit,
                    f.end_char_in_unit,
                    f.suggested_statement
                ));
            } else {
                out.push_str(&format!(
                    "- `{}` [{}..{})\n",
                    f.target_name.as_str(),
                    f.start_char_in_unit,
                    f.end_char_in_unit
                ));
            }
        }
        out.push('\n');
    }

    if !full {
        out.push_str("*（使用 --full 查看修复建议）*\n");
    }
    out
}

fn render_analyze_report(report: &FileReport) -> String {
    let mut out = format!("## 🔍 扫描: {}\n\n", report.file);
    if report.findings.is_empty() {
        out.push_str("✅ 未发现 ORDER BY / SORT 问题\n");
    } else {
        for f in &report.findings {
            out.push_str(&format!(
                "🟡 **{}** [{}..{}) - {}\n",
                f.target_name.as_str(),
                f.start_char_in_unit,
                f.end_char_in_unit,
                f.suggested_statement
            ));
        }
    }
    out
}
