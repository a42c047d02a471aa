//! Meteo Events - command line client
//!
//! Evaluates weather alert levels for a municipality forecast or for a
//! scheduled event, and prints the resulting report.

use clap::{Parser, Subcommand};
use shared::{EventQuery, ForecastQuery, ForecastReport, StatusReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meteo_events_client::config::{Config, LogFormat};
use meteo_events_client::external::{AemetClient, MeteoApiClient};
use meteo_events_client::services::{EventStatus, ForecastService, StatusService};
use meteo_events_client::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "meteo_events=info,meteo_events_client=info,shared=info";

#[derive(Debug, Parser)]
#[command(name = "meteo-events", version, about = "Weather alert evaluation for events")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the AEMET hourly forecast of a municipality
    Forecast {
        /// INE municipality code, e.g. 08019
        #[arg(long, short)]
        municipality: String,
        /// Date, YYYY-MM-DD
        #[arg(long, short)]
        date: String,
        /// Hour of day, 00-23
        #[arg(long = "hour", short = 'H')]
        hour: String,
    },
    /// Weather status of a scheduled event
    Status {
        #[arg(long, short)]
        event_id: String,
    },
    /// Show event details
    Event {
        #[arg(long, short)]
        event_id: String,
    },
    /// Check the configured backend credentials
    Login,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(config.logging.format);
    tracing::debug!(environment = %config.environment, "configuration loaded");

    let json = cli.json;
    if let Err(err) = run(cli.command, &config, json).await {
        tracing::error!(code = err.code(), error = %err, "command failed");
        if json {
            println!("{}", serde_json::to_string_pretty(&err.detail())?);
        } else {
            eprintln!("{}", err.user_message());
        }
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn status_service(config: &Config) -> AppResult<StatusService> {
    let credentials = config.credentials().ok_or(AppError::MissingCredentials)?;
    Ok(StatusService::new(MeteoApiClient::new(&config.api)?, credentials))
}

async fn run(command: Command, config: &Config, json: bool) -> AppResult<()> {
    match command {
        Command::Forecast {
            municipality,
            date,
            hour,
        } => {
            let service = ForecastService::new(AemetClient::new(&config.aemet)?);
            let evaluation = service
                .evaluate(&ForecastQuery::new(municipality, date, hour))
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("{}", ForecastReport(&evaluation));
            }
        }
        Command::Status { event_id } => {
            let status = status_service(config)?
                .event_status(&EventQuery { event_id })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status.view())?);
            } else {
                print_status(&status);
            }
        }
        Command::Event { event_id } => {
            let event = status_service(config)?
                .event_details(&EventQuery { event_id })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("Esdeveniment {}: {}", event.id, event.name);
                println!("Descripció: {}", event.description);
                println!("Organitzador: {}", event.organizer);
                println!("Adreça: {}, {} {}", event.address, event.postal_code, event.town);
                println!("Aforament: {}", event.capacity);
                println!("Data: {} {}-{}", event.date, event.start_time, event.end_time);
            }
        }
        Command::Login => {
            let session = status_service(config)?.check_login().await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "role": session.role, "admin": session.is_admin() })
                );
            } else if session.is_admin() {
                println!("Login correcte ({}, administrador)", session.role);
            } else {
                println!("Login correcte ({})", session.role);
            }
        }
    }
    Ok(())
}

fn print_status(status: &EventStatus) {
    println!("Esdeveniment: {} ({})", status.event.name, status.event.date);
    if !status.participants.is_empty() {
        println!("Usuaris participants: {}", status.participants.join(", "));
    }
    println!("{}", StatusReport(&status.outcome));
}
