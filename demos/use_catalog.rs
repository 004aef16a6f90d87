use equity_feed::catalog::EquityCatalog;
use equity_feed::config::Config;
use equity_feed::filter::HistoryQuery;
use equity_feed::presenter;
use equity_feed::services::history_service::HistoryService;
use equity_feed::sources::yahoo::{self, YahooSource};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();

    // 下载元数据目录
    let client = yahoo::build_client(&config)?;
    let catalog = Arc::new(EquityCatalog::fetch(&client, &config.catalog_url).await?);

    println!("板块数量: {}", catalog.sectors().len());
    println!("股票数量: {}", catalog.symbols().len());

    // 科技板块的前5只股票
    for equity in catalog.sector_equities("technology")?.iter().take(5) {
        println!("{:<8} {:<40} {}", equity.symbol, equity.name, equity.industry);
    }

    // 最近5天行情
    let service = HistoryService::new(catalog, Arc::new(YahooSource::new(&config)?));
    let snapshot = service.fetch("AAPL", &HistoryQuery::new().days(5)).await?;

    println!("\n股票: {} ({})", snapshot.info.name, snapshot.info.symbol);
    print!("{}", presenter::history_table(&snapshot.history));

    Ok(())
}
