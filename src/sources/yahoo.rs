use crate::config::Config;
use crate::errors::{FeedError, Result};
use crate::sources::base::QuoteSource;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// Yahoo Finance 历史数据下载
pub struct YahooSource {
    client: Client,
    config: Config,
}

impl YahooSource {
    /// 创建新的数据源
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_client(config)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn series_url(&self, symbol: &str) -> String {
        format!("{}{}", self.config.quote_base_url, symbol.trim().to_uppercase())
    }
}

/// 按配置构建HTTP客户端
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(FeedError::from)
}

#[async_trait]
impl QuoteSource for YahooSource {
    fn source_name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_series(&self, symbol: &str) -> Result<String> {
        let url = self.series_url(symbol);
        debug!("获取 {} 的历史数据: {}", symbol, url);

        let response = self.client
            .get(&url)
            .query(&[
                ("period1", self.config.period_start.to_string()),
                ("period2", self.config.period_end().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| FeedError::MalformedData(format!("response is not UTF-8: {}", e)))?;

        debug!("成功获取响应, {} 字节", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_uppercase_symbol() {
        let config = Config::new().with_quote_base_url("http://localhost:9/download/");
        let source = YahooSource::new(&config).unwrap();

        assert_eq!(source.series_url(" aapl "), "http://localhost:9/download/AAPL");
        assert_eq!(source.source_name(), "yahoo");
    }

    #[tokio::test]
    async fn unreachable_host_is_source_unavailable() {
        let config = Config::new()
            .with_quote_base_url("http://127.0.0.1:9/download/")
            .with_request_timeout(std::time::Duration::from_secs(2));
        let source = YahooSource::new(&config).unwrap();

        let err = source.fetch_series("AAPL").await.unwrap_err();
        assert!(matches!(err, FeedError::SourceUnavailable(_)));
        assert!(err.is_retryable());
    }
}
