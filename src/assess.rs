//! 批量评估 - 对一组代码单元执行 ORDER BY / SORT 规则
//!
//! 服务化部署时的 assess 入口：输入单元列表，输出附加 `selects` 的同一列表。
//! 单元之间相互独立，用 rayon 并行处理，输出顺序与输入一致。

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::scanner::{sql_select, Finding};

/// 一个待扫描的代码单元（程序 / include 片段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub pgm_name: String,
    pub inc_name: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// 行号范围元数据：扫描不消费，原样透传给调用方
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

/// 附加 findings 之后的代码单元
#[derive(Debug, Clone, Serialize)]
pub struct AssessedUnit {
    #[serde(flatten)]
    pub unit: Unit,
    pub selects: Vec<Finding>,
}

/// 扫描单个单元并按 (target_type, span) 去重
fn assess_unit(unit: Unit) -> AssessedUnit {
    let findings = sql_select::scan_sql(unit.code.as_deref().unwrap_or(""));
    let mut seen: HashSet<(String, usize, usize)> = HashSet::new();
    let mut selects = Vec::with_capacity(findings.len());
    for finding in findings {
        let key = (
            finding.target_type.clone(),
            finding.start_char_in_unit,
            finding.end_char_in_unit,
        );
        if seen.insert(key) {
            selects.push(finding);
        }
    }
    AssessedUnit { unit, selects }
}

/// 批量评估：按输入顺序返回
pub fn assess_units(units: Vec<Unit>) -> Vec<AssessedUnit> {
    units.into_par_iter().map(assess_unit).collect()
}
