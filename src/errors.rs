use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Invalid filter argument: {0}")]
    InvalidFilterArgument(String),

    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FeedError {
    /// 只有传输层失败值得调用方重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::SourceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

// 网络请求失败（连接、超时、非2xx状态码）统一视为数据源不可用
impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::SourceUnavailable(e.to_string())
    }
}

// CSV能解码但行结构不符合预期
impl From<csv::Error> for FeedError {
    fn from(e: csv::Error) -> Self {
        FeedError::MalformedData(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_source_failures_are_retryable() {
        assert!(FeedError::SourceUnavailable("timeout".into()).is_retryable());
        assert!(!FeedError::MalformedData("bad".into()).is_retryable());
        assert!(!FeedError::InvalidFilterArgument("days".into()).is_retryable());
        assert!(!FeedError::NotFound("XYZ".into()).is_retryable());
    }

    #[test]
    fn json_errors_convert() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FeedError::JsonError(_)));
    }
}
