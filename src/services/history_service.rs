use crate::catalog::EquityCatalog;
use crate::errors::Result;
use crate::filter::HistoryQuery;
use crate::models::daily::DailyRecord;
use crate::models::equity::{EquityInfo, EquityQuote, EquitySnapshot};
use crate::parser;
use crate::sources::base::QuoteSource;
use log::{debug, info, warn};
use std::sync::Arc;

/// 行情服务：获取原始数据、解析、关联元数据并过滤
///
/// 每次调用都重新请求数据源，调用之间不共享状态。
pub struct HistoryService {
    catalog: Arc<EquityCatalog>,
    source: Arc<dyn QuoteSource + Send + Sync>,
}

impl HistoryService {
    /// 创建新的行情服务实例
    pub fn new(catalog: Arc<EquityCatalog>, source: Arc<dyn QuoteSource + Send + Sync>) -> Self {
        Self { catalog, source }
    }

    pub fn catalog(&self) -> &EquityCatalog {
        &self.catalog
    }

    /// 目录中没有的股票不视为错误，只保留代码
    fn resolve_info(&self, symbol: &str) -> EquityInfo {
        match self.catalog.lookup(symbol) {
            Ok(info) => info.clone(),
            Err(_) => {
                warn!("Symbol {} not found in catalog, continuing without metadata", symbol);
                EquityInfo::unknown(symbol)
            }
        }
    }

    /// 获取最新一日行情
    pub async fn current(&self, symbol: &str) -> Result<DailyRecord> {
        debug!("Fetching current quote for {} from {}", symbol, self.source.source_name());
        let payload = self.source.fetch_series(symbol).await?;
        parser::parse_latest(&payload)
    }

    /// 最新行情及元数据
    pub async fn quote(&self, symbol: &str) -> Result<EquityQuote> {
        let current = self.current(symbol).await?;
        let info = self.resolve_info(symbol);

        Ok(EquityQuote { info, current })
    }

    /// 获取元数据、最新行情和按条件过滤后的历史数据
    ///
    /// 过滤参数在发起请求前校验；最新行情与历史数据分别请求一次数据源。
    pub async fn fetch(&self, symbol: &str, query: &HistoryQuery) -> Result<EquitySnapshot> {
        let filter = query.to_filter()?;
        info!("Fetching history for {} with filter {:?}", symbol, filter);

        let current = self.current(symbol).await?;
        let info = self.resolve_info(symbol);

        let payload = self.source.fetch_series(symbol).await?;
        let records = parser::parse_series(&payload)?;
        let total = records.len();
        let history = filter.apply(records);

        info!("{}: {} of {} daily records selected", symbol, history.len(), total);

        Ok(EquitySnapshot {
            info,
            current,
            history,
        })
    }
}
