use crate::errors::Result;
use async_trait::async_trait;

/// 行情数据源
///
/// 返回以 `Date,Open,High,Low,Close,Adj Close,Volume` 为表头、
/// 换行分隔的CSV文本。
#[async_trait]
pub trait QuoteSource {
    /// 数据源名称，用于日志
    fn source_name(&self) -> &'static str;

    /// 获取某只股票完整日线数据的原始CSV文本
    async fn fetch_series(&self, symbol: &str) -> Result<String>;
}
