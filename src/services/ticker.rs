use crate::errors::Result;
use crate::presenter;
use crate::services::history_service::HistoryService;
use chrono::Local;
use log::{debug, warn};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// 滚动行情：按固定间隔重新获取一组股票的最新行情
pub struct Ticker {
    service: Arc<HistoryService>,
    symbols: Vec<String>,
    interval: Duration,
    colored: bool,
}

impl Ticker {
    pub fn new(service: Arc<HistoryService>, symbols: Vec<String>, interval: Duration) -> Self {
        Self {
            service,
            symbols,
            interval,
            colored: false,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// 刷新一次，返回成功输出的行数
    ///
    /// 单只股票获取失败只记录日志，不影响其他股票。
    pub async fn refresh<W: Write>(&self, out: &mut W) -> Result<usize> {
        let mut written = 0;

        writeln!(out, "[{}]", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        for symbol in &self.symbols {
            match self.service.quote(symbol).await {
                Ok(quote) => {
                    writeln!(out, "{}", presenter::ticker_line(&quote, self.colored))?;
                    written += 1;
                }
                Err(e) => warn!("Ticker refresh for {} failed: {}", symbol, e),
            }
        }
        out.flush()?;

        Ok(written)
    }

    /// 循环刷新；`iterations` 为 `None` 时一直运行
    ///
    /// 刷新在同一个任务中顺序执行，耗时超过间隔时顺延下一次刷新。
    pub async fn run<W: Write>(&self, out: &mut W, iterations: Option<usize>) -> Result<usize> {
        let mut ticks = interval(self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut total = 0;
        let mut round = 0;
        while iterations.map_or(true, |n| round < n) {
            ticks.tick().await;
            total += self.refresh(out).await?;
            round += 1;
            debug!("Ticker round {} done", round);
        }

        Ok(total)
    }
}
