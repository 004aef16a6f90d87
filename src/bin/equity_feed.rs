use equity_feed::catalog::EquityCatalog;
use equity_feed::config::Config;
use equity_feed::filter::{DaysArg, HistoryQuery};
use equity_feed::presenter::{self, Column};
use equity_feed::services::history_service::HistoryService;
use equity_feed::services::ticker::Ticker;
use equity_feed::sources::yahoo::{self, YahooSource};

use anyhow::{bail, Context, Result};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::sync::Arc;
use std::time::Duration;

fn symbol_arg() -> Arg<'static> {
    Arg::with_name("symbol")
        .short('s')
        .long("symbol")
        .value_name("SYMBOL")
        .help("Stock symbol, e.g. AAPL")
        .required(true)
        .takes_value(true)
}

fn json_arg() -> Arg<'static> {
    Arg::with_name("json")
        .long("json")
        .help("Print the result as JSON")
        .takes_value(false)
}

async fn load_catalog(matches: &ArgMatches, config: &Config) -> Result<EquityCatalog> {
    if let Some(path) = matches.value_of("catalog-file") {
        info!("Loading catalog from file {}", path);
        return EquityCatalog::load_from_file(path)
            .with_context(|| format!("failed to load catalog file {}", path));
    }

    let client = yahoo::build_client(config)?;
    EquityCatalog::fetch(&client, &config.catalog_url)
        .await
        .context("failed to download equity catalog")
}

fn print_list<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) {
    for item in items {
        println!("{}", item);
    }
}

fn run_catalog(matches: &ArgMatches, catalog: &EquityCatalog) -> Result<()> {
    let json = matches.is_present("json");

    if let Some(symbol) = matches.value_of("equity") {
        let equity = catalog.lookup(symbol)?;
        if json {
            println!("{}", serde_json::to_string_pretty(equity)?);
        } else {
            println!("{} | {} | {} | {}", equity.symbol, equity.name, equity.sector, equity.industry);
        }
    } else if let Some(sector) = matches.value_of("sector") {
        let equities = catalog.sector_equities(sector)?;
        if json {
            println!("{}", serde_json::to_string_pretty(equities)?);
        } else {
            print_list(equities.iter().map(|e| format!("{:<8} {}", e.symbol, e.name)));
        }
    } else if let Some(industry) = matches.value_of("industry") {
        let equities = catalog.industry_equities(industry)?;
        if json {
            println!("{}", serde_json::to_string_pretty(equities)?);
        } else {
            print_list(equities.iter().map(|e| format!("{:<8} {}", e.symbol, e.name)));
        }
    } else if let Some(sector) = matches.value_of("sector-industries") {
        print_list(catalog.sector_industries(sector)?);
    } else if let Some(sector) = matches.value_of("sector-symbols") {
        print_list(catalog.sector_symbols(sector)?);
    } else if let Some(industry) = matches.value_of("industry-symbols") {
        print_list(catalog.industry_symbols(industry)?);
    } else {
        match matches.value_of("list").unwrap_or("sectors") {
            "symbols" => print_list(catalog.symbols()),
            "sectors" => print_list(catalog.sectors()),
            "industries" => print_list(catalog.industries()),
            "equities" => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&catalog.equities())?);
                } else {
                    print_list(catalog.equities().into_iter().map(|e| format!("{:<8} {}", e.symbol, e.name)));
                }
            }
            other => bail!("Unknown list: {}", other),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("equity_feed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stock quotes, daily history and equity metadata")
        .arg(
            Arg::with_name("catalog-url")
                .long("catalog-url")
                .value_name("URL")
                .help("Metadata catalog URL")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("catalog-file")
                .long("catalog-file")
                .value_name("PATH")
                .help("Load the metadata catalog from a local JSON file")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Quote download base URL")
                .takes_value(true)
                .global(true),
        );

    // 添加子命令
    let app = app
        .subcommand(
            SubCommand::with_name("quote")
                .about("Show the most recent quote for a symbol")
                .arg(symbol_arg())
                .arg(json_arg()),
        )
        .subcommand(
            SubCommand::with_name("history")
                .about("Show daily history for a symbol")
                .arg(symbol_arg())
                .arg(
                    Arg::with_name("date")
                        .short('d')
                        .long("date")
                        .value_name("DATE")
                        .help("Single date, in the source's date format (takes precedence)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("days")
                        .short('n')
                        .long("days")
                        .value_name("DAYS")
                        .help("Most recent N records")
                        .takes_value(true)
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::with_name("start")
                        .long("start")
                        .value_name("DATE")
                        .help("Range start (inclusive, requires --end)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("end")
                        .long("end")
                        .value_name("DATE")
                        .help("Range end (inclusive, requires --start)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("column")
                        .short('c')
                        .long("column")
                        .value_name("COLUMN")
                        .help("Print a single column: Open, High, Low, Close, Adj Close, Volume, Change Amount, Change Rate, Day Range")
                        .takes_value(true),
                )
                .arg(json_arg()),
        )
        .subcommand(
            SubCommand::with_name("catalog")
                .about("Query the equity metadata catalog")
                .arg(Arg::with_name("equity").long("equity").value_name("SYMBOL").takes_value(true).help("Metadata for one symbol"))
                .arg(Arg::with_name("sector").long("sector").value_name("SECTOR").takes_value(true).help("Equities in a sector"))
                .arg(Arg::with_name("industry").long("industry").value_name("INDUSTRY").takes_value(true).help("Equities in an industry"))
                .arg(Arg::with_name("sector-industries").long("sector-industries").value_name("SECTOR").takes_value(true).help("Industries in a sector"))
                .arg(Arg::with_name("sector-symbols").long("sector-symbols").value_name("SECTOR").takes_value(true).help("Symbols in a sector"))
                .arg(Arg::with_name("industry-symbols").long("industry-symbols").value_name("INDUSTRY").takes_value(true).help("Symbols in an industry"))
                .arg(
                    Arg::with_name("list")
                        .long("list")
                        .value_name("WHAT")
                        .help("List symbols, sectors, industries or equities")
                        .possible_values(["symbols", "sectors", "industries", "equities"])
                        .takes_value(true),
                )
                .arg(json_arg()),
        )
        .subcommand(
            SubCommand::with_name("ticker")
                .about("Refresh quotes for several symbols on a fixed interval")
                .arg(
                    Arg::with_name("symbols")
                        .short('s')
                        .long("symbols")
                        .value_name("SYMBOLS")
                        .help("Comma separated symbols")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Refresh interval in seconds")
                        .takes_value(true)
                        .default_value("60"),
                )
                .arg(
                    Arg::with_name("count")
                        .long("count")
                        .value_name("N")
                        .help("Stop after N refreshes")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("no-color")
                        .long("no-color")
                        .help("Disable colored output")
                        .takes_value(false),
                ),
        );

    let matches = app.get_matches();

    let mut config = Config::new();
    if let Some(url) = matches.value_of("catalog-url") {
        config = config.with_catalog_url(url);
    }
    if let Some(url) = matches.value_of("base-url") {
        config = config.with_quote_base_url(url);
    }

    let catalog = Arc::new(load_catalog(&matches, &config).await?);

    match matches.subcommand() {
        Some(("catalog", sub)) => run_catalog(sub, &catalog)?,
        Some(("quote", sub)) => {
            let service = HistoryService::new(catalog, Arc::new(YahooSource::new(&config)?));
            let symbol = sub.value_of("symbol").unwrap_or_default();
            let quote = service.quote(symbol).await?;

            if sub.is_present("json") {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("{} ({}) - {} / {}", quote.info.symbol, quote.info.name, quote.info.sector, quote.info.industry);
                print!("{}", presenter::history_table(std::slice::from_ref(&quote.current)));
            }
        }
        Some(("history", sub)) => {
            let service = HistoryService::new(catalog, Arc::new(YahooSource::new(&config)?));
            let symbol = sub.value_of("symbol").unwrap_or_default();

            let mut query = HistoryQuery::new();
            query.date = sub.value_of("date").map(str::to_string);
            query.days = sub.value_of("days").map(DaysArg::from);
            query.date_start = sub.value_of("start").map(str::to_string);
            query.date_end = sub.value_of("end").map(str::to_string);

            let column = sub.value_of("column").map(str::parse::<Column>).transpose()?;
            let snapshot = service.fetch(symbol, &query).await?;

            match (column, sub.is_present("json")) {
                (Some(column), true) => {
                    let series = presenter::column_series(&snapshot.history, column);
                    println!("{}", serde_json::to_string_pretty(&series)?);
                }
                (Some(column), false) => {
                    println!("{:<12} {}", "Date", column.label());
                    for (date, value) in presenter::column_series(&snapshot.history, column) {
                        println!("{:<12} {}", date, value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()));
                    }
                }
                (None, true) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                (None, false) => {
                    println!("{} ({}) - {} / {}", snapshot.info.symbol, snapshot.info.name, snapshot.info.sector, snapshot.info.industry);
                    print!("{}", presenter::history_table(&snapshot.history));
                    if snapshot.history.is_empty() {
                        info!("No records matched the filter");
                    }
                }
            }
        }
        Some(("ticker", sub)) => {
            let symbols: Vec<String> = sub
                .value_of("symbols")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if symbols.is_empty() {
                bail!("No symbols given");
            }

            let seconds: u64 = sub
                .value_of("interval")
                .unwrap_or("60")
                .parse()
                .context("interval must be a whole number of seconds")?;
            let config = config.with_ticker_interval(Duration::from_secs(seconds.max(1)));
            let count = sub
                .value_of("count")
                .map(str::parse::<usize>)
                .transpose()
                .context("count must be a whole number")?;

            let service = Arc::new(HistoryService::new(catalog, Arc::new(YahooSource::new(&config)?)));
            let ticker = Ticker::new(service, symbols, config.ticker_interval)
                .with_color(!sub.is_present("no-color"));

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            ticker.run(&mut out, count).await?;
        }
        _ => info!("No command specified. Use --help for usage information."),
    }

    Ok(())
}
