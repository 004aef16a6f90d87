use std::time::Duration;

pub const DEFAULT_QUOTE_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/download/";
pub const DEFAULT_CATALOG_URL: &str = "https://gist.githubusercontent.com/REPNOT/6bffda0dd727d63a0bd727d4ff1c890a/raw/5228da45d64741489973b8e05a0abf3d2a3957c1/fin_data.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub quote_base_url: String,
    pub catalog_url: String,
    pub period_start: i64,  // 历史数据起始时间（epoch秒）
    pub request_timeout: Duration,
    pub user_agent: String,
    pub ticker_interval: Duration,
}

impl Config {
    pub fn new() -> Self {
        Self {
            quote_base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            period_start: 76204800,
            request_timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            ticker_interval: Duration::from_secs(60),
        }
    }

    pub fn with_quote_base_url(mut self, url: &str) -> Self {
        self.quote_base_url = url.to_string();
        self
    }

    pub fn with_catalog_url(mut self, url: &str) -> Self {
        self.catalog_url = url.to_string();
        self
    }

    pub fn with_period_start(mut self, epoch_secs: i64) -> Self {
        self.period_start = epoch_secs;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_ticker_interval(mut self, interval: Duration) -> Self {
        self.ticker_interval = interval;
        self
    }

    /// 历史数据截止时间：当前时间往后一天，保证包含当日行情
    pub fn period_end(&self) -> i64 {
        chrono::Utc::now().timestamp() + 86400
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
