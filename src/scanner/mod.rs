use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::Result;

pub mod patterns;
pub mod sql_select;

/// finding 的目标类型（本规则只产出 SQL_SELECT 一种）
pub const TARGET_TYPE_SQL_SELECT: &str = "SQL_SELECT";

/// SELECT 语句变体标签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetName {
    #[serde(rename = "SELECT_SINGLE")]
    SelectSingle,
    #[serde(rename = "FOR_ALL_ENTRIES")]
    ForAllEntries,
    #[serde(rename = "NO_FOR_ALL_ENTRIES")]
    NoForAllEntries,
}

impl TargetName {
    pub fn of(is_single: bool, has_for_all_entries: bool) -> Self {
        if is_single {
            TargetName::SelectSingle
        } else if has_for_all_entries {
            TargetName::ForAllEntries
        } else {
            TargetName::NoForAllEntries
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetName::SelectSingle => "SELECT_SINGLE",
            TargetName::ForAllEntries => "FOR_ALL_ENTRIES",
            TargetName::NoForAllEntries => "NO_FOR_ALL_ENTRIES",
        }
    }
}

/// 一条规则违规
///
/// span 是语句在所属代码单元里的半开字符区间，永远对应一次定位命中。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    /// 解析到的 INTO TABLE 目标内表
    pub table: Option<String>,
    pub target_type: String,
    pub target_name: TargetName,
    pub start_char_in_unit: usize,
    pub end_char_in_unit: usize,
    /// 实际选择的字段（大写、去重）；`*` 选择时为 `["*"]`
    pub used_fields: Vec<String>,
    /// 为歧义场景预留；本规则恒为 false
    pub ambiguous: bool,
    /// 为字段改写建议预留；本规则不填
    pub suggested_fields: Option<Vec<String>>,
    pub suggested_statement: String,
}

/// 代码分析器 Trait
///
/// 定位/提取细节隔离在实现里，之后换成真正的 ABAP parser 也不动调用方。
pub trait CodeAnalyzer {
    /// 适用的文件扩展名 (e.g., "abap")
    fn supported_extensions(&self) -> &[&str];

    /// 分析源码并返回 findings
    fn analyze(&self, code: &str, file_path: &Path) -> Result<Vec<Finding>>;
}
