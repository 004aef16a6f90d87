use log::debug;

use crate::errors::{FeedError, Result};
use crate::models::daily::DailyRecord;

/// `days` 参数的原始取值，保留调用方传入的类型
///
/// 只有整数（或纯数字的命令行文本）才是合法的天数，
/// 浮点数即使没有小数部分也会被拒绝。
#[derive(Debug, Clone, PartialEq)]
pub enum DaysArg {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<i64> for DaysArg {
    fn from(v: i64) -> Self {
        DaysArg::Integer(v)
    }
}

impl From<i32> for DaysArg {
    fn from(v: i32) -> Self {
        DaysArg::Integer(i64::from(v))
    }
}

impl From<u32> for DaysArg {
    fn from(v: u32) -> Self {
        DaysArg::Integer(i64::from(v))
    }
}

impl From<f64> for DaysArg {
    fn from(v: f64) -> Self {
        DaysArg::Decimal(v)
    }
}

impl From<&str> for DaysArg {
    fn from(v: &str) -> Self {
        DaysArg::Text(v.to_string())
    }
}

impl From<String> for DaysArg {
    fn from(v: String) -> Self {
        DaysArg::Text(v)
    }
}

impl DaysArg {
    fn to_filter(&self) -> Result<HistoryFilter> {
        match self {
            DaysArg::Integer(days) => HistoryFilter::last_days(*days),
            DaysArg::Decimal(days) => Err(FeedError::InvalidFilterArgument(format!(
                "days must be an integer, got {}",
                days
            ))),
            DaysArg::Text(raw) => HistoryFilter::parse_days(raw),
        }
    }
}

/// 调用方传入的原始过滤参数
///
/// 校验推迟到选择过滤器时进行，
/// 这样 `3.5`、`-1` 之类的输入可以得到明确的 `InvalidFilterArgument`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub date: Option<String>,
    pub days: Option<DaysArg>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn days<T: Into<DaysArg>>(mut self, days: T) -> Self {
        self.days = Some(days.into());
        self
    }

    pub fn range(mut self, start: &str, end: &str) -> Self {
        self.date_start = Some(start.to_string());
        self.date_end = Some(end.to_string());
        self
    }

    /// 按优先级选择过滤器：date > days > [date_start, date_end] > 不过滤
    ///
    /// 只给出区间的一端时不过滤。
    pub fn to_filter(&self) -> Result<HistoryFilter> {
        if let Some(date) = &self.date {
            return Ok(HistoryFilter::Date(date.clone()));
        }

        if let Some(days) = &self.days {
            return days.to_filter();
        }

        if let (Some(start), Some(end)) = (&self.date_start, &self.date_end) {
            return Ok(HistoryFilter::Range {
                start: start.clone(),
                end: end.clone(),
            });
        }

        Ok(HistoryFilter::All)
    }
}

/// 已校验的历史数据过滤器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    All,
    Date(String),
    LastDays(usize),
    Range { start: String, end: String },
}

impl HistoryFilter {
    pub fn last_days(days: i64) -> Result<Self> {
        if days < 1 {
            return Err(FeedError::InvalidFilterArgument(format!(
                "days must be a positive integer, got {}",
                days
            )));
        }
        usize::try_from(days)
            .map(HistoryFilter::LastDays)
            .map_err(|_| FeedError::InvalidFilterArgument(format!("days out of range: {}", days)))
    }

    /// 解析命令行文本，只接受不带符号的十进制数字
    pub fn parse_days(raw: &str) -> Result<Self> {
        let invalid = || {
            FeedError::InvalidFilterArgument(format!(
                "days must be a positive integer, got {:?}",
                raw
            ))
        };

        let digits = raw.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let days = digits.parse::<i64>().map_err(|_| invalid())?;
        Self::last_days(days)
    }

    /// 对升序排列的记录应用过滤
    ///
    /// 日期按字符串比较，不做日历解析；没有匹配记录时返回空序列。
    pub fn apply(&self, mut records: Vec<DailyRecord>) -> Vec<DailyRecord> {
        debug!("Applying history filter {:?} to {} records", self, records.len());
        match self {
            HistoryFilter::All => records,
            HistoryFilter::Date(date) => {
                records.retain(|r| &r.date == date);
                records
            }
            HistoryFilter::LastDays(days) => {
                let skip = records.len().saturating_sub(*days);
                records.split_off(skip)
            }
            HistoryFilter::Range { start, end } => {
                records.retain(|r| r.date.as_str() >= start.as_str() && r.date.as_str() <= end.as_str());
                records
            }
        }
    }
}
