//! 扫描引擎 - 文件与目录级编排
//!
//! 单文件 / 目录树两种入口；目录扫描用 rayon 并行，结果按文件名排序后返回。

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::scanner::sql_select::SqlSelectAnalyzer;
use crate::scanner::{CodeAnalyzer, Finding};

/// 单个文件的扫描结果
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub findings: Vec<Finding>,
}

/// 扫描单个源文件
pub fn scan_file(path: &Path) -> Result<FileReport> {
    let code =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let findings = SqlSelectAnalyzer.analyze(&code, path)?;
    Ok(FileReport {
        file: path.display().to_string(),
        findings,
    })
}

/// 扫描目录树（并行），返回 (扫描文件数, 有发现的文件报告)
pub fn scan_directory(root: &Path, config: &ScanConfig) -> Result<(usize, Vec<FileReport>)> {
    let entries: Vec<_> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| config.matches_extension(e.path()))
        .collect();

    let file_count = entries.len();
    let reports: Mutex<Vec<FileReport>> = Mutex::new(Vec::new());

    entries.par_iter().for_each(|entry| {
        let path = entry.path();

        if let Ok(meta) = entry.metadata() {
            if meta.len() > config.max_file_size {
                debug!("跳过超大文件: {}", path.display());
                return;
            }
        }

        // 不可读/二进制文件直接跳过
        let code = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };

        if let Ok(findings) = SqlSelectAnalyzer.analyze(&code, path) {
            if !findings.is_empty() {
                // 处理 poisoned mutex（如果持锁线程 panic）
                let mut global = reports.lock().unwrap_or_else(|e| e.into_inner());
                global.push(FileReport {
                    file: path.display().to_string(),
                    findings,
                });
            }
        }
    });

    let mut reports = reports.into_inner().unwrap_or_else(|e| e.into_inner());
    reports.sort_by(|a, b| a.file.cmp(&b.file));

    info!(
        "扫描完成: {} 个文件, {} 个文件有发现",
        file_count,
        reports.len()
    );
    Ok((file_count, reports))
}

/// 引擎状态（就绪指示）
pub fn engine_status() -> Value {
    json!({
        "ok": true,
        "rule": "ORDER_BY_SORT_RULE",
        "note": "with SELECT SINGLE support",
        "version": env!("CARGO_PKG_VERSION"),
        "matcher": "regex (statically compiled)",
    })
}
