// ==========================================
// 采购分析系统 - 字段清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 日期解析
// 红线: 单字段失败只产生 None，不中断整批
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};

/// 视为缺失值的占位文本（大小写不敏感）
const NULL_MARKERS: &[&str] = &["null", "none", "nan", "na", "n/a", "<na>", "nat"];

/// 带时间部分的日期格式（只取日期）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// 纯日期格式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// TRIM 并将空串/占位文本统一为 None
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        let trimmed = value?.trim();
        if trimmed.is_empty() || is_null_marker(trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 解析数值
    ///
    /// 兼容千分位空格与小数逗号（"1 234,50" → 1234.5）。
    /// 同时出现 '.' 与 ',' 时，最后出现者为小数点，另一个为千分位；
    /// 千分位分组不规整或写法有歧义（"1,234"）时按缺失处理。
    /// 非有限值（inf/NaN）按缺失处理
    pub fn parse_decimal(&self, value: Option<&str>) -> Option<f64> {
        let text = self.normalize_null(value)?;
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .collect();

        let candidate = canonical_decimal(&compact)?;
        candidate.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 解析日期（含时间的值截取日期部分）
    pub fn parse_date(&self, value: Option<&str>) -> Option<NaiveDate> {
        let text = self.normalize_null(value)?;

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&text, fmt) {
                return Some(dt.date());
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(&text, fmt) {
                return Some(d);
            }
        }
        None
    }
}

fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// 将带分隔符的数值文本转为 Rust 可解析的形式
fn canonical_decimal(text: &str) -> Option<String> {
    let dots = text.matches('.').count();
    let commas = text.matches(',').count();

    match (dots, commas) {
        (_, 0) if dots <= 1 => Some(text.to_string()),
        // "1.234.567"
        (_, 0) => strip_grouping(text, '.'),
        (0, 1) => {
            let (int_part, frac_part) = text.split_once(',')?;
            let digits = int_part.trim_start_matches(['-', '+']);
            // "1,234" 既可能是千分位也可能是小数
            if frac_part.len() == 3
                && (1..=3).contains(&digits.len())
                && !digits.starts_with('0')
            {
                return None;
            }
            Some(format!("{}.{}", int_part, frac_part))
        }
        // "1,234,567"
        (0, _) => strip_grouping(text, ','),
        _ => {
            let (decimal, group) = match (text.rfind('.'), text.rfind(',')) {
                (Some(d), Some(c)) if d > c => ('.', ','),
                _ => (',', '.'),
            };
            let (int_part, frac_part) = text.rsplit_once(decimal)?;
            if int_part.contains(decimal) || frac_part.contains(group) {
                return None;
            }
            let int_part = strip_grouping(int_part, group)?;
            Some(format!("{}.{}", int_part, frac_part))
        }
    }
}

/// 去除千分位分隔符；首组 1-3 位数字，其余各组恰为 3 位
fn strip_grouping(text: &str, sep: char) -> Option<String> {
    let (sign, body) = match text.strip_prefix(['-', '+']) {
        Some(rest) => (&text[..1], rest),
        None => ("", text),
    };

    let mut groups = body.split(sep);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut out = format!("{}{}", sign, first);
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        out.push_str(group);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ")), None);
        assert_eq!(cleaner.normalize_null(Some("")), None);
        assert_eq!(cleaner.normalize_null(Some("null")), None);
        assert_eq!(cleaner.normalize_null(Some("NULL")), None);
        assert_eq!(cleaner.normalize_null(Some("NaN")), None);
        assert_eq!(cleaner.normalize_null(Some("<NA>")), None);
        assert_eq!(
            cleaner.normalize_null(Some("  A001  ")),
            Some("A001".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_decimal() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal(Some("12.5")), Some(12.5));
        assert_eq!(cleaner.parse_decimal(Some(" 100 ")), Some(100.0));
        assert_eq!(cleaner.parse_decimal(Some("1 234,50")), Some(1234.5));
        assert_eq!(cleaner.parse_decimal(Some("1,234.50")), Some(1234.5));
        assert_eq!(cleaner.parse_decimal(Some("-3")), Some(-3.0));
        assert_eq!(cleaner.parse_decimal(Some("abc")), None);
        assert_eq!(cleaner.parse_decimal(Some("inf")), None);
        assert_eq!(cleaner.parse_decimal(Some("null")), None);
        assert_eq!(cleaner.parse_decimal(None), None);
    }

    #[test]
    fn test_parse_decimal_千分位与小数点() {
        let cleaner = DataCleaner;
        // 两种分隔符并存: 最后出现者为小数点
        assert_eq!(cleaner.parse_decimal(Some("1.234,56")), Some(1234.56));
        assert_eq!(cleaner.parse_decimal(Some("1,234.50")), Some(1234.5));
        assert_eq!(cleaner.parse_decimal(Some("1.234.567,8")), Some(1234567.8));
        assert_eq!(cleaner.parse_decimal(Some("-1.234,5")), Some(-1234.5));

        // 仅千分位
        assert_eq!(cleaner.parse_decimal(Some("1,234,567")), Some(1234567.0));
        assert_eq!(cleaner.parse_decimal(Some("1.234.567")), Some(1234567.0));

        // 小数逗号
        assert_eq!(cleaner.parse_decimal(Some("40,0")), Some(40.0));
        assert_eq!(cleaner.parse_decimal(Some("12,5")), Some(12.5));
        assert_eq!(cleaner.parse_decimal(Some("0,125")), Some(0.125));
        assert_eq!(cleaner.parse_decimal(Some("1234,567")), Some(1234.567));

        // 歧义或分组不规整 → 缺失
        assert_eq!(cleaner.parse_decimal(Some("1,234")), None);
        assert_eq!(cleaner.parse_decimal(Some("12,34,567")), None);
        assert_eq!(cleaner.parse_decimal(Some("1.23.4")), None);
        assert_eq!(cleaner.parse_decimal(Some("1,234.5,6")), None);
        assert_eq!(cleaner.parse_decimal(Some("1.2,3.4")), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let cleaner = DataCleaner;
        let expected = NaiveDate::from_ymd_opt(2023, 1, 20).unwrap();

        assert_eq!(cleaner.parse_date(Some("2023-01-20")), Some(expected));
        assert_eq!(cleaner.parse_date(Some("20230120")), Some(expected));
        assert_eq!(cleaner.parse_date(Some("20/01/2023")), Some(expected));
        assert_eq!(cleaner.parse_date(Some("2023-01-20 14:30:00")), Some(expected));
        assert_eq!(cleaner.parse_date(Some("2023-01-20T14:30:00.123")), Some(expected));
        assert_eq!(cleaner.parse_date(Some("20/01/2023 08:15")), Some(expected));
    }

    #[test]
    fn test_parse_date_invalid() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date(Some("2023-13-45")), None);
        assert_eq!(cleaner.parse_date(Some("not a date")), None);
        assert_eq!(cleaner.parse_date(Some("NaT")), None);
        assert_eq!(cleaner.parse_date(None), None);
    }
}
