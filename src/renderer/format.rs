//! Value formatting for substituted tokens
//!
//! Numbers render with thousands separators, percentages with fixed decimal
//! precision, currency with the VNĐ suffix. Missing or mistyped values
//! degrade to the format's safe default; formatting never fails.

use serde_json::Value;

/// How a bound snapshot value renders into run text
#[derive(Debug, Clone, PartialEq)]
pub enum ValueFormat {
    /// Whole number with thousands separators, e.g. `112,282,563`
    Integer,
    /// Fixed-precision percentage, e.g. `11.0%`
    Percent { precision: usize },
    /// Thousands-separated amount with currency suffix, e.g. `1,000 VNĐ`
    Currency,
    /// Verbatim text (numbers stringified)
    Text,
    /// Sequence joined with `"; "`
    JoinedList,
    /// Length of a sequence
    Count,
}

/// Render a looked-up value; `None` yields the format's safe default
pub fn format_value(value: Option<&Value>, format: &ValueFormat) -> String {
    match format {
        ValueFormat::Integer => thousands(as_i64(value)),
        ValueFormat::Percent { precision } => {
            format!("{:.*}%", *precision, as_f64(value))
        }
        ValueFormat::Currency => format!("{} VNĐ", thousands(as_i64(value))),
        ValueFormat::Text => as_text(value),
        ValueFormat::JoinedList => match value {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| as_text(Some(item)))
                .collect::<Vec<_>>()
                .join("; "),
            _ => String::new(),
        },
        ValueFormat::Count => match value {
            Some(Value::Array(items)) => items.len().to_string(),
            _ => "0".to_string(),
        },
    }
}

/// Group digits in threes: `112282563` → `"112,282,563"`
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn as_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn as_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn as_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(112282563), "112,282,563");
        assert_eq!(thousands(-45678), "-45,678");
    }

    #[test]
    fn test_integer_format() {
        let v = json!(112282563);
        assert_eq!(format_value(Some(&v), &ValueFormat::Integer), "112,282,563");
    }

    #[test]
    fn test_percent_format() {
        let v = json!(11.0);
        assert_eq!(
            format_value(Some(&v), &ValueFormat::Percent { precision: 1 }),
            "11.0%"
        );
    }

    #[test]
    fn test_currency_format() {
        let v = json!(173612532);
        assert_eq!(
            format_value(Some(&v), &ValueFormat::Currency),
            "173,612,532 VNĐ"
        );
    }

    #[test]
    fn test_joined_list_format() {
        let v = json!(["Honda", "Minh Đức", "Acecook"]);
        assert_eq!(
            format_value(Some(&v), &ValueFormat::JoinedList),
            "Honda; Minh Đức; Acecook"
        );
    }

    #[test]
    fn test_count_format() {
        let v = json!([1, 2, 3]);
        assert_eq!(format_value(Some(&v), &ValueFormat::Count), "3");
    }

    #[test]
    fn test_missing_values_use_safe_defaults() {
        assert_eq!(format_value(None, &ValueFormat::Integer), "0");
        assert_eq!(format_value(None, &ValueFormat::Percent { precision: 1 }), "0.0%");
        assert_eq!(format_value(None, &ValueFormat::Currency), "0 VNĐ");
        assert_eq!(format_value(None, &ValueFormat::Text), "");
        assert_eq!(format_value(None, &ValueFormat::JoinedList), "");
        assert_eq!(format_value(None, &ValueFormat::Count), "0");
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let v = json!("12345");
        assert_eq!(format_value(Some(&v), &ValueFormat::Integer), "12,345");
    }
}
