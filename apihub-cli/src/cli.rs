use anyhow::{Context, anyhow};
use apihub_core::{
    Config, PageRequest, Services,
    logging::{LogOutput, init_tracing},
    pagination::DEFAULT_LIMIT,
    upstream::ServiceKind,
    usecase::{ForecastOptions, QuoteSearch, weather::DEFAULT_TIMEZONE},
    validate,
};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Select, Text};
use serde::Serialize;
use tracing::debug;

use crate::output;

const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "apihub", version, about = "Weather, quotes and country data from public APIs")]
pub struct Cli {
    /// Print results as pretty JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the version.
    Version,

    /// Interactively edit the config file.
    Configure,

    /// Open-Meteo weather.
    #[command(subcommand)]
    Weather(WeatherCommand),

    /// Quotable quotes.
    #[command(subcommand)]
    Quotes(QuotesCommand),

    /// REST Countries data.
    #[command(subcommand)]
    Countries(CountriesCommand),

    /// Local liveness and readiness.
    #[command(subcommand)]
    Health(HealthCommand),
}

#[derive(Debug, Args)]
pub struct Location {
    /// Latitude, -90 to 90.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude, -180 to 180.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// IANA timezone name, or "auto".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,
}

#[derive(Debug, Subcommand)]
pub enum WeatherCommand {
    /// Current conditions.
    Current(Location),

    /// Current conditions plus hourly and daily forecasts.
    Forecast {
        #[command(flatten)]
        location: Location,

        #[arg(long)]
        no_hourly: bool,

        #[arg(long)]
        no_daily: bool,
    },
}

#[derive(Debug, Args)]
pub struct Paging {
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    #[arg(long, default_value_t = 0)]
    pub skip: u32,
}

impl Paging {
    fn request(&self) -> anyhow::Result<PageRequest> {
        Ok(PageRequest::new(self.skip, validate::limit(self.limit)?))
    }
}

#[derive(Debug, Subcommand)]
pub enum QuotesCommand {
    /// One random quote.
    Random {
        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        max_length: Option<u32>,
    },

    /// A quote by id.
    Get { id: String },

    /// Search quotes.
    Search {
        #[arg(long)]
        query: Option<String>,

        #[arg(long)]
        author: Option<String>,

        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        min_length: Option<u32>,

        #[arg(long)]
        max_length: Option<u32>,

        #[command(flatten)]
        paging: Paging,
    },

    /// Quotes by author slug, e.g. "albert-einstein".
    Author {
        slug: String,

        #[command(flatten)]
        paging: Paging,
    },
}

#[derive(Debug, Subcommand)]
pub enum CountriesCommand {
    /// Every country.
    All {
        /// Restrict to these upstream fields, e.g. "name,capital".
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// First country matching a common or official name.
    Name { name: String },

    /// Country by alpha-2 or alpha-3 code.
    Code { code: String },

    /// Countries in a region, e.g. "Europe".
    Region { region: String },
}

#[derive(Debug, Subcommand)]
pub enum HealthCommand {
    Ping,
    Status,
    /// Status plus host and process metrics
    Detailed,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let directives = if self.verbose { "debug" } else { "warn" };
        init_tracing(directives, false, LogOutput::Stderr)?;

        match self.command {
            Command::Version => {
                println!("apihub {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            Command::Configure => configure(),
            command => {
                let config = Config::load()?;
                debug!(environment = %config.app.environment, "Loaded configuration");
                let services = Services::from_config(&config)?;
                dispatch(command, &services, self.json).await
            }
        }
    }
}

async fn dispatch(command: Command, services: &Services, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Weather(cmd) => weather(cmd, services, json).await,
        Command::Quotes(cmd) => quotes(cmd, services, json).await,
        Command::Countries(cmd) => countries(cmd, services, json).await,
        Command::Health(HealthCommand::Ping) => {
            emit(&services.health.ping(), json, output::ping)
        }
        Command::Health(HealthCommand::Status) => {
            emit(&services.health.status(), json, output::health_status)
        }
        Command::Health(HealthCommand::Detailed) => {
            emit(&services.health.detailed(), json, output::health_detailed)
        }
        Command::Version | Command::Configure => Ok(()),
    }
}

async fn weather(cmd: WeatherCommand, services: &Services, json: bool) -> anyhow::Result<()> {
    let report = match cmd {
        WeatherCommand::Current(loc) => {
            let (lat, lon) = coordinates(&loc)?;
            services.weather.current(lat, lon, &loc.timezone).await?
        }
        WeatherCommand::Forecast { location, no_hourly, no_daily } => {
            let (lat, lon) = coordinates(&location)?;
            let options = ForecastOptions { include_hourly: !no_hourly, include_daily: !no_daily };
            services.weather.forecast(lat, lon, &location.timezone, options).await?
        }
    };

    emit(&report, json, output::weather_report)
}

fn coordinates(loc: &Location) -> anyhow::Result<(f64, f64)> {
    Ok((validate::latitude(loc.lat)?, validate::longitude(loc.lon)?))
}

async fn quotes(cmd: QuotesCommand, services: &Services, json: bool) -> anyhow::Result<()> {
    match cmd {
        QuotesCommand::Random { tags, max_length } => {
            let max_length = validate::length_filter("max_length", max_length)?;
            let quote = services.quotes.random(tags.as_deref(), max_length).await?;
            emit(&quote, json, output::quote)
        }
        QuotesCommand::Get { id } => {
            let quote = services
                .quotes
                .by_id(&id)
                .await?
                .ok_or_else(|| anyhow!("Quote '{id}' not found"))?;
            emit(&quote, json, output::quote)
        }
        QuotesCommand::Search { query, author, tags, min_length, max_length, paging } => {
            let filter = QuoteSearch {
                query,
                author,
                tags,
                min_length: validate::length_filter("min_length", min_length)?,
                max_length: validate::length_filter("max_length", max_length)?,
            };
            let page = services.quotes.search(&filter, paging.request()?).await?;
            emit(&page, json, output::quote_page)
        }
        QuotesCommand::Author { slug, paging } => {
            let page = services.quotes.by_author(&slug, paging.request()?).await?;
            emit(&page, json, output::quote_page)
        }
    }
}

async fn countries(cmd: CountriesCommand, services: &Services, json: bool) -> anyhow::Result<()> {
    match cmd {
        CountriesCommand::All { fields } => {
            let fields = (!fields.is_empty()).then_some(fields.as_slice());
            let list = services.countries.all(fields).await?;
            emit(list.as_slice(), json, output::country_list)
        }
        CountriesCommand::Name { name } => {
            let country = services
                .countries
                .by_name(&name)
                .await?
                .ok_or_else(|| anyhow!("Country '{name}' not found"))?;
            emit(&country, json, output::country)
        }
        CountriesCommand::Code { code } => {
            let country = services
                .countries
                .by_code(&code)
                .await?
                .ok_or_else(|| anyhow!("Country with code '{code}' not found"))?;
            emit(&country, json, output::country)
        }
        CountriesCommand::Region { region } => {
            let list = services.countries.by_region(&region).await?;
            emit(list.as_slice(), json, output::country_list)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, json: bool, render: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{text}");
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    config.app.api_key = Text::new("API key expected in the X-API-Key header:")
        .with_default(&config.app.api_key)
        .prompt()?;

    let cursor = ENVIRONMENTS
        .iter()
        .position(|env| env.eq_ignore_ascii_case(&config.app.environment))
        .unwrap_or(0);
    config.app.environment = Select::new("Environment:", ENVIRONMENTS.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?
        .to_string();

    for &kind in ServiceKind::all() {
        let mut service = config.service_config(kind);

        service.base_url = Text::new(&format!("{kind} API base URL:"))
            .with_default(&service.base_url)
            .prompt()?;
        service.verify_tls = Confirm::new(&format!("Verify TLS certificates for the {kind} API?"))
            .with_default(service.verify_tls)
            .prompt()?;

        config.upsert_service_config(kind, service);
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "apihub", "weather", "forecast", "--lat", "-33.87", "--lon", "151.21", "--no-hourly",
        ])
        .unwrap();

        match cli.command {
            Command::Weather(WeatherCommand::Forecast { location, no_hourly, no_daily }) => {
                assert_eq!(location.lat, -33.87);
                assert_eq!(location.timezone, "auto");
                assert!(no_hourly);
                assert!(!no_daily);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["apihub", "countries", "code", "fr", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn fields_are_comma_separated() {
        let cli = Cli::try_parse_from(["apihub", "countries", "all", "--fields", "name,capital"])
            .unwrap();
        match cli.command {
            Command::Countries(CountriesCommand::All { fields }) => {
                assert_eq!(fields, vec!["name", "capital"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn paging_defaults_and_validation() {
        let paging = Paging { limit: DEFAULT_LIMIT, skip: 0 };
        assert_eq!(paging.request().unwrap(), PageRequest::default());

        assert!(Paging { limit: 151, skip: 0 }.request().is_err());
        assert!(Paging { limit: 0, skip: 0 }.request().is_err());
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let loc = Location { lat: 91.0, lon: 0.0, timezone: "auto".into() };
        assert!(coordinates(&loc).is_err());
    }
}
