// 公开导出的模块，供外部使用
pub mod models;
pub mod catalog;
pub mod errors;
pub mod filter;
pub mod parser;
pub mod presenter;
pub mod sources;
pub mod services;
pub mod config;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::daily::DailyRecord;
pub use models::equity::{EquityInfo, EquityQuote, EquitySnapshot};
pub use catalog::{CategoryArg, EquityCatalog};
pub use filter::{DaysArg, HistoryFilter, HistoryQuery};
pub use services::history_service::HistoryService;
pub use sources::base::QuoteSource;
pub use errors::{Result, FeedError};
