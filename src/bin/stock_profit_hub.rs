use stock_profit_hub::config::Config;
use stock_profit_hub::data_provider::StockDataProvider;
use stock_profit_hub::models::profit::ProfitRequest;
use stock_profit_hub::server;
use stock_profit_hub::services::DataService;
use stock_profit_hub::sources::{CsvDirectorySource, PriceSource};

use anyhow::{anyhow, Context};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::sync::Arc;

fn store_args() -> Vec<Arg<'static>> {
    vec![
        Arg::with_name("data-dir")
            .long("data-dir")
            .value_name("DIR")
            .help("Directory holding stocks.arrow")
            .takes_value(true)
            .default_value("data"),
        Arg::with_name("csv-dir")
            .long("csv-dir")
            .value_name("DIR")
            .help("Directory with <Company>.csv seed files")
            .takes_value(true)
            .default_value("csv_files"),
    ]
}

fn config_from(matches: &ArgMatches) -> Config {
    Config::new()
        .with_data_dir(matches.value_of("data-dir").unwrap_or("data"))
        .with_csv_dir(matches.value_of("csv-dir").unwrap_or("csv_files"))
}

fn csv_sources(config: &Config) -> anyhow::Result<Vec<Arc<dyn PriceSource + Send + Sync>>> {
    Ok(vec![Arc::new(CsvDirectorySource::new(&config.csv_dir)?)])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("ProfitHub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stock price history service with trading profit analysis")
        .subcommand(
            SubCommand::with_name("serve")
                .about("Run the HTTP API")
                .args(store_args())
                .arg(
                    Arg::with_name("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .takes_value(true)
                        .default_value("8000"),
                )
                .arg(
                    Arg::with_name("no-autosave")
                        .long("no-autosave")
                        .help("Keep changes in memory only")
                        .takes_value(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("seed")
                .about("Import the CSV seed files into the store")
                .args(store_args()),
        )
        .subcommand(
            SubCommand::with_name("profit")
                .about("Run a profit analysis and print it as JSON")
                .args(store_args())
                .arg(
                    Arg::with_name("ticker")
                        .short('t')
                        .long("ticker")
                        .value_name("TICKER")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("start")
                        .short('s')
                        .long("start")
                        .value_name("MM/DD/YYYY")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("end")
                        .short('e')
                        .long("end")
                        .value_name("MM/DD/YYYY")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("explore")
                .about("Explore stored stocks and prices")
                .args(store_args())
                .arg(
                    Arg::with_name("ticker")
                        .short('t')
                        .long("ticker")
                        .value_name("TICKER")
                        .help("Show price history for this ticker")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .help("Limit the number of records to display")
                        .takes_value(true)
                        .default_value("10"),
                ),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("serve") {
        let port = matches
            .value_of("port")
            .unwrap_or("8000")
            .parse::<u16>()
            .context("invalid --port")?;
        let config = config_from(matches)
            .with_port(port)
            .with_autosave(!matches.is_present("no-autosave"));
        let addr = config.bind_addr();

        let sources = csv_sources(&config)?;
        let service = DataService::open(config, sources).await?;
        server::serve(service, addr)
            .await
            .map_err(|e| anyhow!("server error: {}", e))?;
    } else if let Some(matches) = matches.subcommand_matches("seed") {
        let config = config_from(matches);
        let store = StockDataProvider::load_from_file(&config.store_path())?;
        let sources = csv_sources(&config)?;

        let service = DataService::new(config, Arc::new(store), sources);
        let added = service.seed().await?;
        info!("Seeded {} price records into {}", added, service.data_path().display());
    } else if let Some(matches) = matches.subcommand_matches("profit") {
        let config = config_from(matches);
        let sources = csv_sources(&config)?;
        let service = DataService::open(config, sources).await?;

        let request = ProfitRequest {
            ticker: matches.value_of("ticker").unwrap_or_default().to_string(),
            start_date: matches.value_of("start").unwrap_or_default().to_string(),
            end_date: matches.value_of("end").unwrap_or_default().to_string(),
        };
        let report = service.profit(&request).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(matches) = matches.subcommand_matches("explore") {
        let config = config_from(matches);
        let store = StockDataProvider::load_from_file(&config.store_path())?;
        let limit = matches
            .value_of("limit")
            .unwrap_or("10")
            .parse::<usize>()
            .unwrap_or(10);

        match matches.value_of("ticker") {
            Some(ticker) => {
                let stock = store
                    .get_stock_by_ticker(ticker)
                    .await
                    .ok_or_else(|| anyhow!("Stock not found: {}", ticker))?;
                let prices = store.get_prices(ticker).await?;

                info!("Stock: {} ({}) since {}", stock.name, stock.ticker, stock.inception_date);
                info!("{:-<60}", "");
                info!(
                    "{:<12} {:<10} {:<10} {:<10} {:<10} {:<15}",
                    "Date", "Open", "High", "Low", "Close", "Volume"
                );
                info!("{:-<60}", "");
                for price in prices.iter().rev().take(limit) {
                    info!(
                        "{:<12} {:<10.4} {:<10.4} {:<10.4} {:<10.4} {:<15}",
                        price.date, price.open, price.high, price.low, price.close, price.volume
                    );
                }
                if prices.len() > limit {
                    info!("... and {} more records", prices.len() - limit);
                } else if prices.is_empty() {
                    info!("No daily data available for this stock");
                }
            }
            None => {
                let stocks = store.get_all_stocks().await;
                info!("Found {} stocks in database", stocks.len());
                for stock in stocks.iter().take(limit) {
                    let count = store.get_prices(&stock.ticker).await?.len();
                    info!("{:<6} {:<20} {} records", stock.ticker, stock.name, count);
                }
            }
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}
