// 字段类型转换工具

/// CSV字段的目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
}

/// 转换结果，`Missing` 与 0 是不同的状态
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Integer(i64),
    Missing,
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// 将原始字段转换为指定类型
///
/// 字段不存在（行太短）和解析失败同样处理为 `Missing`，从不报错。
/// 小数保留两位；非有限值（NaN、inf）视为缺失。
pub fn coerce(raw: Option<&str>, kind: FieldKind) -> FieldValue {
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return FieldValue::Missing,
    };

    match kind {
        FieldKind::Text => FieldValue::Text(raw.to_string()),
        FieldKind::Decimal => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => FieldValue::Decimal(round_to(v, 2)),
            _ => FieldValue::Missing,
        },
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Missing),
    }
}

/// 按指定小数位舍入，恰好为一半时取偶数（银行家舍入）
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round_ties_even() / factor
}

/// 标题大小写：每个单词首字母大写，其余小写
///
/// 紧跟在字母之后的字母小写，其他位置的字母大写，
/// 因此 "oil & gas" → "Oil & Gas"，"e-commerce" → "E-Commerce"。
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_fields_round_to_two_digits() {
        assert_eq!(coerce(Some("187.149994"), FieldKind::Decimal), FieldValue::Decimal(187.15));
        assert_eq!(coerce(Some(" 12.5 "), FieldKind::Decimal), FieldValue::Decimal(12.5));
    }

    #[test]
    fn unparseable_or_absent_fields_are_missing() {
        assert_eq!(coerce(Some("null"), FieldKind::Decimal), FieldValue::Missing);
        assert_eq!(coerce(Some(""), FieldKind::Decimal), FieldValue::Missing);
        assert_eq!(coerce(Some("NaN"), FieldKind::Decimal), FieldValue::Missing);
        assert_eq!(coerce(None, FieldKind::Decimal), FieldValue::Missing);
        assert_eq!(coerce(None, FieldKind::Text), FieldValue::Missing);
        assert_eq!(coerce(Some("12.0"), FieldKind::Integer), FieldValue::Missing);
    }

    #[test]
    fn integer_fields_tolerate_trailing_newline() {
        assert_eq!(coerce(Some("52164500\r\n"), FieldKind::Integer), FieldValue::Integer(52164500));
    }

    #[test]
    fn text_fields_keep_source_format() {
        assert_eq!(
            coerce(Some("2024-01-05"), FieldKind::Text).into_text(),
            Some("2024-01-05".to_string())
        );
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("technology"), "Technology");
        assert_eq!(title_case("TECHNOLOGY"), "Technology");
        assert_eq!(title_case("consumer cyclical"), "Consumer Cyclical");
        assert_eq!(title_case("oil & gas e&p"), "Oil & Gas E&P");
        assert_eq!(title_case("internet content & information"), "Internet Content & Information");
        assert_eq!(title_case("real estate—development"), "Real Estate—Development");
    }

    #[test]
    fn round_to_four_digits() {
        assert_eq!(round_to(0.0123456, 4), 0.0123);
        assert_eq!(round_to(-2.345678, 2), -2.35);
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(round_to(181.125, 2), 181.12);
        assert_eq!(round_to(181.375, 2), 181.38);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
        // 2.675 的二进制值略小于一半
        assert_eq!(round_to(2.675, 2), 2.67);
    }
}
