use serde::{Deserialize, Serialize};
use crate::models::daily::DailyRecord;

/// 股票元数据：代码、名称、行业板块
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityInfo {
    #[serde(default, alias = "Symbol")]
    pub symbol: String,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Sector")]
    pub sector: String,
    #[serde(default, alias = "Industry")]
    pub industry: String,
}

impl EquityInfo {
    /// 目录中找不到的股票，只保留代码
    pub fn unknown(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            ..Self::default()
        }
    }
}

/// 最新行情
#[derive(Debug, Clone, Serialize)]
pub struct EquityQuote {
    pub info: EquityInfo,
    pub current: DailyRecord,
}

/// 单只股票的元数据、最新行情以及（过滤后的）升序历史数据
#[derive(Debug, Clone, Serialize)]
pub struct EquitySnapshot {
    pub info: EquityInfo,
    pub current: DailyRecord,
    pub history: Vec<DailyRecord>,
}
