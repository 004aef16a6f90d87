use crossterm::style::Stylize;
use std::fmt::Write;
use std::str::FromStr;

use crate::errors::FeedError;
use crate::models::daily::DailyRecord;
use crate::models::equity::EquityQuote;

/// 可单独输出的数据列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
    ChangeAmount,
    ChangeRate,
    DayRange,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::AdjClose,
        Column::Volume,
        Column::ChangeAmount,
        Column::ChangeRate,
        Column::DayRange,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::AdjClose => "Adj Close",
            Column::Volume => "Volume",
            Column::ChangeAmount => "Change Amount",
            Column::ChangeRate => "Change Rate",
            Column::DayRange => "Day Range",
        }
    }

    pub fn value(&self, record: &DailyRecord) -> Option<f64> {
        match self {
            Column::Open => record.open,
            Column::High => record.high,
            Column::Low => record.low,
            Column::Close => record.close,
            Column::AdjClose => record.adj_close,
            Column::Volume => record.volume.map(|v| v as f64),
            Column::ChangeAmount => record.change_amount,
            Column::ChangeRate => record.change_rate,
            Column::DayRange => record.day_range,
        }
    }
}

impl FromStr for Column {
    type Err = FeedError;

    /// 忽略大小写，空格、下划线和连字符等价
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        Column::ALL
            .iter()
            .find(|c| c.label().replace(' ', "").to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| {
                let options: Vec<&str> = Column::ALL.iter().map(|c| c.label()).collect();
                FeedError::NotFound(format!(
                    "unknown column {:?}, expected one of {:?}",
                    s, options
                ))
            })
    }
}

fn decimal(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

/// 日期与单列数值
pub fn column_series(records: &[DailyRecord], column: Column) -> Vec<(String, Option<f64>)> {
    records
        .iter()
        .map(|r| (r.date.clone(), column.value(r)))
        .collect()
}

/// 固定宽度的历史行情表格，缺失值显示为 `-`
pub fn history_table(records: &[DailyRecord]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14} {:>10} {:>10} {:>10}",
        "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume", "Chg", "Chg %", "Range"
    );
    let _ = writeln!(out, "{:-<122}", "");

    for r in records {
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14} {:>10} {:>10} {:>10}",
            r.date,
            decimal(r.open, 2),
            decimal(r.high, 2),
            decimal(r.low, 2),
            decimal(r.close, 2),
            decimal(r.adj_close, 2),
            r.volume.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            decimal(r.change_amount, 2),
            decimal(r.change_rate.map(|v| v * 100.0), 2),
            decimal(r.day_range, 2),
        );
    }

    out
}

/// 滚动行情的一行，例如 `AAPL 181.18 ▼ -0.81 (-0.45%)`
///
/// `colored` 为真时上涨显示绿色、下跌显示红色。
pub fn ticker_line(quote: &EquityQuote, colored: bool) -> String {
    let current = &quote.current;
    let price = decimal(current.close, 2);

    let (arrow, delta) = match (current.change_amount, current.change_rate) {
        (Some(amount), rate) => {
            let arrow = if amount > 0.0 {
                "▲"
            } else if amount < 0.0 {
                "▼"
            } else {
                "="
            };
            let pct = rate
                .map(|r| format!("{:+.2}%", r * 100.0))
                .unwrap_or_else(|| "-".to_string());
            (arrow, format!("{:+.2} ({})", amount, pct))
        }
        (None, _) => ("?", "-".to_string()),
    };

    let change = format!("{} {}", arrow, delta);
    let change = match current.change_amount {
        Some(amount) if colored && amount > 0.0 => change.as_str().green().to_string(),
        Some(amount) if colored && amount < 0.0 => change.as_str().red().to_string(),
        _ => change,
    };

    let symbol = if colored {
        quote.info.symbol.as_str().bold().to_string()
    } else {
        quote.info.symbol.clone()
    };

    format!("{} {} {}", symbol, price, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::equity::EquityInfo;
    use crate::parser::parse_line;

    fn quote(line: &str) -> EquityQuote {
        EquityQuote {
            info: EquityInfo::unknown("aapl"),
            current: parse_line(line),
        }
    }

    #[test]
    fn column_names_parse_like_the_labels() {
        assert_eq!("Adj Close".parse::<Column>().unwrap(), Column::AdjClose);
        assert_eq!("adj_close".parse::<Column>().unwrap(), Column::AdjClose);
        assert_eq!("change rate".parse::<Column>().unwrap(), Column::ChangeRate);
        assert_eq!("DAY-RANGE".parse::<Column>().unwrap(), Column::DayRange);
        assert!(matches!("price".parse::<Column>(), Err(FeedError::NotFound(_))));
    }

    #[test]
    fn series_for_a_column() {
        let records = vec![
            parse_line("2024-01-02,1,2,0.5,1.5,1.5,10"),
            parse_line("2024-01-03,x,2,1,1.8,1.8,20"),
        ];

        let series = column_series(&records, Column::Volume);
        assert_eq!(series, vec![("2024-01-02".to_string(), Some(10.0)), ("2024-01-03".to_string(), Some(20.0))]);

        let series = column_series(&records, Column::ChangeAmount);
        assert_eq!(series[0].1, Some(0.5));
        assert_eq!(series[1].1, None);
    }

    #[test]
    fn table_marks_missing_values() {
        let table = history_table(&[parse_line("2024-01-02,abc,2,0.5,1.5,1.5,10")]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[2].starts_with("2024-01-02"));
        assert!(lines[2].contains(" - "));
        assert!(lines[2].contains("1.50"));
    }

    #[test]
    fn ticker_line_plain() {
        let line = ticker_line(&quote("2024-01-05,181.99,182.76,180.17,181.18,180.70,62303300"), false);
        assert!(line.starts_with("AAPL "));
        assert!(line.contains("181.18 ▼ -0.81 (-0.45%)"));

        let line = ticker_line(&quote("2024-01-05,50,51,49,50,50,1000"), false);
        assert!(line.contains("50.00 = +0.00 (+0.00%)"));

        let line = ticker_line(&quote("2024-01-05,null,51,49,50,50,1000"), false);
        assert!(line.ends_with("50.00 ? -"));
    }

    #[test]
    fn ticker_line_colored_keeps_text() {
        let line = ticker_line(&quote("2024-01-05,10,12,9.5,11,11,100"), true);
        assert!(line.contains("▲ +1.00 (+10.00%)"));
        assert!(line.contains("AAPL"));
    }
}
