//! 静态编译正则表达式（只编译一次，全局复用）
//!
//! 这里是整个规则的"语法"：用模式匹配代替真正的 ABAP 解析器。
//! 所有模式大小写不敏感，语句类模式允许跨行（`(?s)`）。

use once_cell::sync::Lazy;
use regex::Regex;

/// SELECT 语句块：`SELECT [SINGLE] ... FROM <table> ...` 直到第一个句号
///
/// 捕获组：
/// - `single`: 单行修饰符（`SELECT SINGLE`）
/// - `select`: 选择列表原始文本（SELECT 与 FROM 之间）
/// - `table`:  FROM 后的数据库表名
/// - `rest`:   表名之后直到句号的剩余子句
///
/// 没有句号的残缺语句不会被匹配到（接受的精度限制，不按错误处理）。
pub static SELECT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)\bSELECT\b(?P<single>\s+SINGLE)?(?P<select>.+?)\bFROM\b\s+(?P<table>\w+)(?P<rest>.*?\.)",
    )
    .unwrap()
});

pub static FOR_ALL_ENTRIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bFOR\s+ALL\s+ENTRIES\b").unwrap()
});

pub static ORDER_BY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ORDER\s+BY").unwrap()
});

/// 字段 token（字母数字/下划线连续段）
pub static FIELD_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+\b").unwrap()
});

/// INTO TABLE 目标内表：支持 `@DATA(lt_x)` 内联声明和裸标识符两种写法
pub static INTO_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bINTO\s+TABLE\s+(?:@DATA\((\w+)\)|(\w+))").unwrap()
});

/// 选择列表开头的 SINGLE 修饰符（清洗用）
pub static LEADING_SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*SINGLE\s+").unwrap()
});

/// 从第一个 INTO 起的所有内容（把目标变量语法从字段提取中剔除）
pub static INTO_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bINTO\b.+").unwrap()
});

pub static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// 按目标内表名动态构建 `SORT <itab> ... BY` 检查模式
///
/// 表名来自 `\w+` 捕获，这里仍然 escape 一次，模式构建失败按"未找到 SORT"处理。
pub fn sort_re(table: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?is)\bSORT\s+{}\b.*?\bBY\b", regex::escape(table))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_block_captures() {
        let caps = SELECT_BLOCK_RE
            .captures("SELECT a b FROM zfoo INTO TABLE lt_foo.")
            .expect("statement should match");
        assert!(caps.name("single").is_none());
        assert_eq!(caps.name("select").map(|m| m.as_str()), Some(" a b "));
        assert_eq!(caps.name("table").map(|m| m.as_str()), Some("zfoo"));
    }

    #[test]
    fn test_select_single_modifier_captured() {
        let caps = SELECT_BLOCK_RE
            .captures("select single a from zfoo into wa_foo.")
            .expect("statement should match");
        assert_eq!(caps.name("single").map(|m| m.as_str()), Some(" single"));
    }

    #[test]
    fn test_sort_re_whole_word() {
        let re = sort_re("lt_foo").expect("pattern should build");
        assert!(re.is_match("SORT lt_foo BY a."));
        assert!(re.is_match("sort lt_foo\n  by a b."));
        // lt_foo2 是另一个内表
        assert!(!re.is_match("SORT lt_foo2 BY a."));
    }

    #[test]
    fn test_into_table_inline_declaration() {
        let caps = INTO_TABLE_RE
            .captures("SELECT a FROM zfoo INTO TABLE @DATA(lt_foo) ORDER BY a.")
            .expect("into table should match");
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("lt_foo"));
        assert!(caps.get(2).is_none());
    }
}
