use serde::Serialize;

/// 单日行情记录
///
/// 任何无法解析的字段都为 `None`，不会让整行或整个请求失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: String,  // 保持数据源原始格式，不做日历解析
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<i64>,
    pub change_amount: Option<f64>,
    pub change_rate: Option<f64>,
    pub day_range: Option<f64>,
}
