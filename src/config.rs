//! 扫描配置
//!
//! 可选 YAML 配置文件；未提供时使用内置默认值。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::scanner::sql_select::SqlSelectAnalyzer;
use crate::scanner::CodeAnalyzer;

/// 目录扫描配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 识别为 ABAP 源码的扩展名
    pub extensions: Vec<String>,
    /// 超过该大小的文件直接跳过（字节）
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: SqlSelectAnalyzer
                .supported_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 2_000_000, // 2MB
        }
    }
}

impl ScanConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: ScanConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}
