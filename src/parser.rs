use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::errors::{FeedError, Result};
use crate::models::daily::DailyRecord;
use crate::util::{coerce, round_to, FieldKind};

/// Date, Open, High, Low, Close, Adj Close, Volume
pub const COLUMN_COUNT: usize = 7;

/// 由开高低收计算出的字段
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedFields {
    pub change_amount: Option<f64>,
    pub change_rate: Option<f64>,
    pub day_range: Option<f64>,
}

/// 涨跌额 = 收盘 - 开盘
pub fn change_amount(open: Option<f64>, close: Option<f64>) -> Option<f64> {
    Some(round_to(close? - open?, 2))
}

/// 涨跌幅 = 涨跌额 / 开盘，保留四位小数
///
/// 涨跌额为0时直接返回0；开盘为0导致的非有限结果视为缺失。
pub fn change_rate(change_amount: Option<f64>, open: Option<f64>) -> Option<f64> {
    let amount = change_amount?;
    let open = open?;
    if amount == 0.0 {
        return Some(0.0);
    }
    let rate = amount / open;
    rate.is_finite().then(|| round_to(rate, 4))
}

/// 振幅 = |最低 - 最高|
pub fn day_range(low: Option<f64>, high: Option<f64>) -> Option<f64> {
    Some(round_to(low? - high?, 2).abs())
}

pub fn derive_fields(
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
) -> DerivedFields {
    let amount = change_amount(open, close);
    DerivedFields {
        change_amount: amount,
        change_rate: change_rate(amount, open),
        day_range: day_range(low, high),
    }
}

/// 将一行CSV转换为日线记录，字段缺失或格式错误时对应值为 `None`
pub fn parse_record(record: &StringRecord) -> DailyRecord {
    let date = coerce(record.get(0), FieldKind::Text)
        .into_text()
        .unwrap_or_default();
    let open = coerce(record.get(1), FieldKind::Decimal).as_decimal();
    let high = coerce(record.get(2), FieldKind::Decimal).as_decimal();
    let low = coerce(record.get(3), FieldKind::Decimal).as_decimal();
    let close = coerce(record.get(4), FieldKind::Decimal).as_decimal();
    let adj_close = coerce(record.get(5), FieldKind::Decimal).as_decimal();
    let volume = coerce(record.get(6), FieldKind::Integer).as_integer();

    let derived = derive_fields(open, high, low, close);

    DailyRecord {
        date,
        open,
        high,
        low,
        close,
        adj_close,
        volume,
        change_amount: derived.change_amount,
        change_rate: derived.change_rate,
        day_range: derived.day_range,
    }
}

/// 解析单行逗号分隔文本
pub fn parse_line(line: &str) -> DailyRecord {
    let fields: Vec<&str> = line.trim_end_matches(&['\r', '\n'][..]).split(',').collect();
    parse_record(&StringRecord::from(fields))
}

fn validate_header(header: &StringRecord) -> Result<()> {
    let first = header
        .get(0)
        .map(|h| h.trim().trim_start_matches('\u{feff}'))
        .unwrap_or_default();

    if !first.eq_ignore_ascii_case("date") || header.len() < COLUMN_COUNT {
        return Err(FeedError::MalformedData(format!(
            "unexpected header: {:?}",
            header.iter().collect::<Vec<_>>()
        )));
    }
    Ok(())
}

/// 解析完整的历史数据CSV（含表头），返回按日期升序排列的记录
///
/// 表头不符合预期时返回 `MalformedData`；单个字段错误不影响其他行。
pub fn parse_series(payload: &str) -> Result<Vec<DailyRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload.as_bytes());

    validate_header(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(parse_record(&row?));
    }

    // 数据源为降序时反转一次，方向只看首尾两个非空日期
    let mut dated = records.iter().map(|r| r.date.as_str()).filter(|d| !d.is_empty());
    let newest_first = matches!(
        (dated.next(), dated.next_back()),
        (Some(first), Some(last)) if first > last
    );
    if newest_first {
        debug!("Series delivered newest-first, reversing {} rows", records.len());
        records.reverse();
    }

    debug!("Parsed {} daily records", records.len());
    Ok(records)
}

/// 解析最新一行行情
pub fn parse_latest(payload: &str) -> Result<DailyRecord> {
    parse_series(payload)?
        .pop()
        .ok_or_else(|| FeedError::MalformedData("payload contains no data rows".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume";

    #[test]
    fn complete_row_has_no_missing_fields() {
        let record = parse_line("2024-01-05,181.990005,182.759995,180.169998,181.179993,180.703522,62303300\n");

        assert_eq!(record.date, "2024-01-05");
        assert_eq!(record.open, Some(181.99));
        assert_eq!(record.high, Some(182.76));
        assert_eq!(record.low, Some(180.17));
        assert_eq!(record.close, Some(181.18));
        assert_eq!(record.adj_close, Some(180.7));
        assert_eq!(record.volume, Some(62303300));
        assert_eq!(record.change_amount, Some(round_to(181.18 - 181.99, 2)));
        assert_eq!(record.change_amount, Some(-0.81));
        assert_eq!(record.day_range, Some(round_to(182.76 - 180.17, 2)));
        assert_eq!(record.change_rate, Some(round_to(-0.81 / 181.99, 4)));
    }

    #[test]
    fn non_numeric_open_propagates_to_change_fields() {
        let record = parse_line("2024-01-05,abc,182.76,180.17,181.18,180.70,62303300");

        assert_eq!(record.open, None);
        assert_eq!(record.change_amount, None);
        assert_eq!(record.change_rate, None);
        assert_eq!(record.high, Some(182.76));
        assert_eq!(record.day_range, Some(2.59));
    }

    #[test]
    fn short_row_degrades_to_missing_fields() {
        let record = parse_line("2024-01-05,10.00,11.00");

        assert_eq!(record.open, Some(10.0));
        assert_eq!(record.high, Some(11.0));
        assert_eq!(record.low, None);
        assert_eq!(record.close, None);
        assert_eq!(record.volume, None);
        assert_eq!(record.change_amount, None);
        assert_eq!(record.day_range, None);
    }

    #[test]
    fn unchanged_close_gives_zero_rate() {
        let record = parse_line("2024-01-05,50.00,51.00,49.00,50.00,50.00,1000");

        assert_eq!(record.change_amount, Some(0.0));
        assert_eq!(record.change_rate, Some(0.0));
    }

    #[test]
    fn zero_open_with_movement_gives_missing_rate() {
        assert_eq!(change_rate(Some(1.5), Some(0.0)), None);
        assert_eq!(change_rate(Some(0.0), Some(0.0)), Some(0.0));
    }

    #[test]
    fn day_range_is_never_negative() {
        assert_eq!(day_range(Some(9.5), Some(10.25)), Some(0.75));
        assert_eq!(day_range(Some(10.25), Some(9.5)), Some(0.75));
        assert_eq!(day_range(None, Some(9.5)), None);
    }

    #[test]
    fn series_keeps_ascending_order() {
        let payload = format!(
            "{}\n2024-01-02,1,2,0.5,1.5,1.5,10\n2024-01-03,1.5,2,1,1.8,1.8,20\n",
            HEADER
        );
        let records = parse_series(&payload).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-01-02");
        assert_eq!(records[1].date, "2024-01-03");
    }

    #[test]
    fn newest_first_series_is_reversed_once() {
        let payload = format!(
            "{}\r\n2024-01-04,1,2,0.5,1.5,1.5,10\r\n2024-01-03,1,2,0.5,1.5,1.5,10\r\n2024-01-02,1,2,0.5,1.5,1.5,10\r\n",
            HEADER
        );
        let dates: Vec<String> = parse_series(&payload)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();

        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn undated_trailing_row_keeps_ascending_order() {
        let payload = format!(
            "{}\n2024-01-02,1,2,0.5,1.5,1.5,10\n2024-01-03,1,2,0.5,1.5,1.5,10\n2024-01-04,1,2,0.5,1.5,1.5,10\n,1.5,2,1,1.9,1.9,30\n",
            HEADER
        );
        let dates: Vec<String> = parse_series(&payload)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04", ""]);

        let payload = format!(
            "{}\n,1.5,2,1,1.9,1.9,30\n2024-01-04,1,2,0.5,1.5,1.5,10\n2024-01-03,1,2,0.5,1.5,1.5,10\n",
            HEADER
        );
        let dates: Vec<String> = parse_series(&payload)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-04", ""]);
    }

    #[test]
    fn latest_ignores_undated_row_when_choosing_order() {
        let payload = format!(
            "{}\n2024-01-02,1,2,0.5,1.5,1.5,10\n2024-01-04,1.5,2,1,1.8,1.8,20\n,1.5,2,1,1.9,1.9,30\n",
            HEADER
        );
        let latest = parse_latest(&payload).unwrap();
        assert_eq!(latest.date, "");
        assert_eq!(latest.close, Some(1.9));

        let records = parse_series(&payload).unwrap();
        assert_eq!(records[0].date, "2024-01-02");
    }

    #[test]
    fn bad_rows_do_not_abort_the_series() {
        let payload = format!(
            "{}\n2024-01-02,null,null,null,null,null,null\n2024-01-03,1.5,2,1,1.8,1.8,20\n",
            HEADER
        );
        let records = parse_series(&payload).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].close, None);
        assert_eq!(records[1].close, Some(1.8));
    }

    #[test]
    fn unexpected_header_is_malformed() {
        let err = parse_series("<html>Not Found</html>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedData(_)));

        let err = parse_series("").unwrap_err();
        assert!(matches!(err, FeedError::MalformedData(_)));
    }

    #[test]
    fn latest_requires_a_data_row() {
        let err = parse_latest(HEADER).unwrap_err();
        assert!(matches!(err, FeedError::MalformedData(_)));

        let payload = format!("{}\n2024-01-02,1,2,0.5,1.5,1.5,10\n2024-01-03,1.5,2,1,1.8,1.8,20", HEADER);
        assert_eq!(parse_latest(&payload).unwrap().date, "2024-01-03");
    }
}
