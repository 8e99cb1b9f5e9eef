//! SELECT 规则扫描 - ORDER BY / SORT
//!
//! 一条规则，四步流水线：
//! 1. 定位：在源码里找出每个 `SELECT ... FROM ... .` 语句块
//! 2. 分类：SELECT SINGLE？FOR ALL ENTRIES？选择列表是 `*`？
//! 3. 提取：字段列表（去重、大写）与 INTO TABLE 目标内表
//! 4. 评估：按变体给出 finding（缺 ORDER BY / 缺 SORT / SELECT *）
//!
//! 纯文本扫描：无 IO、无共享状态，相同输入必得相同输出。
//! 不匹配语句模式的残缺 SELECT 直接略过，不报错。

use std::borrow::Cow;
use std::path::Path;

use anyhow::Result;

use super::patterns::{
    sort_re, FIELD_TOKEN_RE, FOR_ALL_ENTRIES_RE, INTO_TABLE_RE, INTO_TAIL_RE, LEADING_SINGLE_RE,
    ORDER_BY_RE, SELECT_BLOCK_RE, WHITESPACE_RE,
};
use super::{CodeAnalyzer, Finding, TargetName, TARGET_TYPE_SQL_SELECT};

/// 定位到的一条 SELECT 语句块
///
/// 扫描过程中即产即销，不跨语句保留。
#[derive(Debug)]
struct SelectMatch<'a> {
    /// 完整语句文本（SELECT 到句号，含句号）
    text: &'a str,
    /// 在源码中的半开区间 [start, end)
    start: usize,
    end: usize,
    is_single: bool,
    has_for_all_entries: bool,
    /// 未清洗的选择列表文本（SELECT 与 FROM 之间）
    select_clause: &'a str,
}

/// 从左到右惰性定位所有 SELECT 语句块，互不重叠
fn locate_selects(code: &str) -> impl Iterator<Item = SelectMatch<'_>> {
    SELECT_BLOCK_RE.captures_iter(code).filter_map(|caps| {
        let whole = caps.get(0)?;
        let text = whole.as_str();
        Some(SelectMatch {
            text,
            start: whole.start(),
            end: whole.end(),
            is_single: caps.name("single").is_some(),
            has_for_all_entries: FOR_ALL_ENTRIES_RE.is_match(text),
            select_clause: caps.name("select").map(|m| m.as_str()).unwrap_or(""),
        })
    })
}

/// 清洗选择列表：去掉开头的 SINGLE、剔除 INTO 及其后内容、压缩空白
fn clean_select_clause(m: &SelectMatch) -> String {
    let clause: Cow<'_, str> = if m.is_single {
        LEADING_SINGLE_RE.replace(m.select_clause, "")
    } else {
        Cow::Borrowed(m.select_clause)
    };
    let clause = INTO_TAIL_RE.replace(clause.as_ref(), "");
    WHITESPACE_RE
        .replace_all(clause.as_ref(), " ")
        .trim()
        .to_string()
}

/// 提取字段 token：大写、剔除 DISTINCT 关键字、按首次出现顺序去重
fn extract_fields(clause: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for tok in FIELD_TOKEN_RE.find_iter(clause) {
        let up = tok.as_str().to_uppercase();
        if up != "DISTINCT" && !fields.contains(&up) {
            fields.push(up);
        }
    }
    fields
}

/// 提取 INTO TABLE 目标内表名（`@DATA(lt_x)` 或裸标识符）
fn extract_into_table(stmt_text: &str) -> Option<String> {
    INTO_TABLE_RE.captures(stmt_text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

/// 语句结束之后是否跟着对目标内表的 `SORT <itab> ... BY`
///
/// 先剔除整行注释（去掉首尾空白后以 `*` 开头的行），再做跨行搜索。
/// 目标内表未能解析时按未满足处理，宁可多报。
fn sort_follows(code: &str, stmt_end: usize, table: Option<&str>) -> bool {
    let table = match table {
        Some(t) => t,
        None => return false,
    };
    let after: String = code[stmt_end..]
        .lines()
        .filter(|line| !line.trim().starts_with('*'))
        .collect::<Vec<_>>()
        .join("\n");
    sort_re(table).map_or(false, |re| re.is_match(&after))
}

/// 按变体评估一条语句，最多产出一个 finding
fn evaluate(m: &SelectMatch, code: &str) -> Option<Finding> {
    let cleaned = clean_select_clause(m);
    let target_name = TargetName::of(m.is_single, m.has_for_all_entries);
    let table = extract_into_table(m.text);

    // SELECT * 一律给出建议，并跳过该语句的其余检查
    if cleaned.contains('*') {
        return Some(Finding {
            table,
            target_type: TARGET_TYPE_SQL_SELECT.to_string(),
            target_name,
            start_char_in_unit: m.start,
            end_char_in_unit: m.end,
            used_fields: vec!["*".to_string()],
            ambiguous: false,
            suggested_fields: None,
            suggested_statement:
                "Avoid SELECT * — not recommended. Please specify fields explicitly.".to_string(),
        });
    }

    let fields = extract_fields(&cleaned);

    let suggestion = if m.is_single {
        // SELECT SINGLE 不要求 ORDER BY / SORT
        None
    } else if !m.has_for_all_entries {
        // 普通 SELECT 必须自带 ORDER BY
        if ORDER_BY_RE.is_match(&m.text.replace('\n', " ")) {
            None
        } else if fields.is_empty() {
            Some("Add ORDER BY with all select fields.".to_string())
        } else {
            Some(format!(
                "Add ORDER BY {} inside SELECT (all fields in select list).",
                fields.join(", ")
            ))
        }
    } else {
        // FOR ALL ENTRIES 必须在语句之后对目标内表 SORT
        if sort_follows(code, m.end, table.as_deref()) {
            None
        } else {
            Some(match (fields.is_empty(), table.as_deref()) {
                (false, Some(t)) => format!(
                    "Add SORT by {} after this SELECT into {} (all fields in select list).",
                    fields.join(", "),
                    t
                ),
                (false, None) => format!(
                    "Add SORT by {} after this SELECT (all fields in select list).",
                    fields.join(", ")
                ),
                (true, Some(t)) => {
                    format!("Add SORT by all select fields after this SELECT into {t}.")
                }
                (true, None) => "Add SORT by all select fields after this SELECT.".to_string(),
            })
        }
    };

    suggestion.map(|suggested_statement| Finding {
        table,
        target_type: TARGET_TYPE_SQL_SELECT.to_string(),
        target_name,
        start_char_in_unit: m.start,
        end_char_in_unit: m.end,
        used_fields: fields,
        ambiguous: false,
        suggested_fields: None,
        suggested_statement,
    })
}

/// 扫描一段 ABAP 源码，返回 ORDER BY / SORT 规则的全部 findings
pub fn scan_sql(code: &str) -> Vec<Finding> {
    locate_selects(code)
        .filter_map(|m| evaluate(&m, code))
        .collect()
}

/// ORDER BY / SORT 规则分析器
pub struct SqlSelectAnalyzer;

impl CodeAnalyzer for SqlSelectAnalyzer {
    fn supported_extensions(&self) -> &[&str] {
        &["abap", "prog"]
    }

    fn analyze(&self, code: &str, _file_path: &Path) -> Result<Vec<Finding>> {
        Ok(scan_sql(code))
    }
}
