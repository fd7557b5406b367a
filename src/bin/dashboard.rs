use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use market_trend_visualizer::analysis::choropleth;
use market_trend_visualizer::catalog::Catalog;
use market_trend_visualizer::config;
use market_trend_visualizer::core::comparison;
use market_trend_visualizer::core::orchestrator::Orchestrator;
use market_trend_visualizer::core::rate_limiter::RateLimiter;
use market_trend_visualizer::fetcher::exchange_rate::ExchangeRateFetcher;
use market_trend_visualizer::fetcher::geo::{self, GeometryFetcher};
use market_trend_visualizer::fetcher::news::NewsFetcher;
use market_trend_visualizer::fetcher::worldbank::WorldBankFetcher;
use market_trend_visualizer::models::{Metric, Selection, YearRange};

#[derive(Parser)]
#[command(name = "dashboard", about = "Global market trend visualizer, terminal edition")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, align and trend-fit GDP or inflation series for countries
    Chart {
        /// ISO2 country codes, e.g. IN US CN
        #[arg(required = true)]
        countries: Vec<String>,
        /// gdp or inflation
        #[arg(long, default_value = "gdp")]
        metric: Metric,
    },
    /// Year-by-year GDP and inflation table per country
    Compare {
        #[arg(required = true)]
        countries: Vec<String>,
        #[arg(long, default_value_t = 2013)]
        from: i32,
        #[arg(long, default_value_t = 2022)]
        to: i32,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
    },
    /// Latest business headlines for a topic
    News {
        #[arg(default_value = "market")]
        topic: String,
    },
    /// Choropleth bucket summary of world GDP for one year
    Map {
        #[arg(long, default_value_t = 2021)]
        year: i32,
    },
    /// Gender and sustainability index comparison
    Indices {
        /// Country names to keep; empty shows all
        countries: Vec<String>,
    },
    /// List the recognized country codes
    Countries,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Chart { countries, metric } => chart(countries, metric).await,
        Command::Compare { countries, from, to } => {
            compare(countries, YearRange { start: from, end: to }).await
        }
        Command::Convert { amount, from, to } => convert(amount, &from, &to).await,
        Command::News { topic } => news(&topic).await,
        Command::Map { year } => map(year).await,
        Command::Indices { countries } => {
            indices(&countries);
            Ok(())
        }
        Command::Countries => {
            list_countries();
            Ok(())
        }
    }
}

async fn chart(countries: Vec<String>, metric: Metric) -> Result<()> {
    let orchestrator = Orchestrator::new(Arc::new(WorldBankFetcher::new()));
    let selection = Selection::new(countries, metric);
    let dataset = orchestrator.run_cycle(&selection).await?;

    if dataset.aligned.is_empty() {
        println!("No data: the selected countries share no common year.");
        return Ok(());
    }

    let trends: BTreeMap<&str, &Vec<f64>> = dataset
        .trends
        .iter()
        .map(|t| (t.entity_id.as_str(), &t.values))
        .collect();

    println!("Historical {} ({})", metric, metric.unit_label());
    print!("{:<6}", "Year");
    for entity in dataset.aligned.series.keys() {
        print!(" | {:>10} | {:>10}", entity, format!("{} fit", entity));
    }
    println!();

    for (i, year) in dataset.aligned.common_periods.iter().enumerate() {
        print!("{:<6}", year);
        for (entity, values) in &dataset.aligned.series {
            let fitted = trends
                .get(entity.as_str())
                .map(|t| t[i])
                .unwrap_or(f64::NAN);
            print!(" | {:>10.3} | {:>10.3}", values[i], fitted);
        }
        println!();
    }

    Ok(())
}

async fn compare(countries: Vec<String>, range: YearRange) -> Result<()> {
    let source = WorldBankFetcher::new();
    let entities: Vec<String> = countries.iter().map(|c| c.to_ascii_uppercase()).collect();
    let comparisons = comparison::build_comparison(&source, &entities, range).await?;

    for entry in comparisons {
        println!("\n{}", entry.entity_id);
        println!("{:<6} | {:>14} | {:>14}", "Year", "GDP (T USD)", "Inflation (%)");
        println!("{}", "-".repeat(42));
        for row in entry.rows {
            println!(
                "{:<6} | {:>14} | {:>14}",
                row.year,
                fmt_opt(row.gdp),
                fmt_opt(row.inflation)
            );
        }
    }

    Ok(())
}

async fn convert(amount: f64, from: &str, to: &str) -> Result<()> {
    let fetcher = ExchangeRateFetcher::new(config::exchange_rate_key()?);
    RateLimiter::wait("exchangerate").await;

    let result = fetcher.convert(from, to, amount).await?;
    println!(
        "{:.2} {} = {:.2} {}",
        amount,
        from.to_uppercase(),
        result,
        to.to_uppercase()
    );

    Ok(())
}

async fn news(topic: &str) -> Result<()> {
    let fetcher = NewsFetcher::new(config::news_api_key()?);
    RateLimiter::wait("newsdata").await;

    let articles = fetcher.fetch_headlines(topic).await?;
    if articles.is_empty() {
        println!("No headlines found for '{}'.", topic);
        return Ok(());
    }

    for article in articles {
        println!("* {}", article.title);
        if let Some(published) = article.published {
            println!("  {}", published.format("%Y-%m-%d %H:%M"));
        }
        if let Some(link) = article.link {
            println!("  {}", link);
        }
    }

    Ok(())
}

async fn map(year: i32) -> Result<()> {
    let worldbank = WorldBankFetcher::new();
    RateLimiter::wait("worldbank").await;
    let snapshot = worldbank.fetch_world_snapshot(Metric::Gdp, year).await?;
    let geojson = GeometryFetcher::new().fetch_countries().await?;

    let features = geojson["features"].as_array().cloned().unwrap_or_default();
    let mut buckets: BTreeMap<&str, usize> = BTreeMap::new();
    for feature in &features {
        let value = geo::feature_iso3(feature).and_then(|iso3| snapshot.get(iso3).copied());
        *buckets.entry(choropleth::color_for(value)).or_default() += 1;
    }

    println!("World GDP choropleth, {} ({} features)", year, features.len());
    for (color, count) in buckets {
        println!("{:<10} {:>4}", color, count);
    }

    // Catalog countries, largest first, the way the map tooltip reports them.
    let mut known: Vec<_> = Catalog::all()
        .iter()
        .filter_map(|c| snapshot.get(c.iso3).map(|v| (c, *v)))
        .collect();
    known.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!();
    for (country, value) in known.into_iter().take(10) {
        println!(
            "{:<16} {:>18.0} {}",
            country.name,
            value,
            choropleth::color_for(Some(value))
        );
    }

    Ok(())
}

fn indices(filter: &[String]) {
    let entries = Catalog::indices(filter);
    if entries.is_empty() {
        println!("No index data for the requested countries.");
        return;
    }

    println!("{:<10} | {:>8} | {:>16}", "Country", "Gender", "Sustainability");
    println!("{}", "-".repeat(40));
    for entry in entries {
        println!(
            "{:<10} | {:>8.2} | {:>16.2}",
            entry.country, entry.gender, entry.sustainability
        );
    }
}

fn list_countries() {
    for country in Catalog::all() {
        println!("{}  {}  {}", country.code, country.iso3, country.name);
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}
