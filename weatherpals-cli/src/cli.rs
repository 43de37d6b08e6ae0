use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Password, PasswordDisplayMode};
use tracing::{debug, info, warn};
use weatherpals_core::{
    AnalysisReport, AnalysisRequest, Config, EventKind, Geocoder, ProviderId, WeatherProvider,
    WeatherRequest, WeatherResponse,
    provider::{default_provider_from_config, provider_from_config},
    recommend,
    request::default_target,
    resolve_location, score,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherpals",
    version,
    about = "Score the weather for an outdoor event and suggest activities"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openmeteo" or "weatherapi".
        provider: String,
    },

    /// Assess how suitable the weather is for an event.
    Analyze {
        /// Place name or "lat, lng" coordinates.
        location: String,

        /// Event type: parade, concert, sports, picnic, gardening, festival.
        #[arg(short, long, default_value = "event")]
        event: String,

        #[command(flatten)]
        when: WhenArgs,

        /// Provider to query instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest activities for the weather at a place and time.
    Activities {
        /// Place name or "lat, lng" coordinates.
        location: String,

        #[command(flatten)]
        when: WhenArgs,

        /// Provider to query instead of the configured default.
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct WhenArgs {
    /// Date as YYYY-MM-DD (default: tomorrow).
    #[arg(long)]
    pub date: Option<String>,

    /// Local time as HH:MM (default: 12:00).
    #[arg(long)]
    pub time: Option<String>,

    /// Use current conditions.
    #[arg(long, conflicts_with_all = ["date", "time"])]
    pub now: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Analyze { location, event, when, provider, format, output } => {
                analyze(&location, &event, &when, provider.as_deref(), format, output).await
            }
            Command::Activities { location, when, provider } => {
                activities(&location, &when, provider.as_deref()).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;

        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key must not be empty");
        }
        config.upsert_provider_api_key(id, api_key.to_string());
    }

    if config.default_provider.as_deref() != Some(id.as_str()) {
        let make_default = Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    let path = config.save()?;
    info!(provider = %id, path = %path.display(), "configuration saved");
    println!("Saved configuration for {id} to {}", path.display());

    Ok(())
}

async fn analyze(
    query: &str,
    event: &str,
    when: &WhenArgs,
    provider: Option<&str>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let event = parse_event(event);
    let config = Config::load()?;
    let (request, response) = fetch(query, event, when, provider, &config).await?;

    let snapshot = &response.snapshot;
    let assessment = score(snapshot, event);
    let activities = recommend(snapshot);
    info!(score = assessment.score, level = assessment.level.as_str(), "analysis complete");

    let rendered = match format {
        OutputFormat::Text => render::analysis(&request, snapshot, &assessment, &activities),
        OutputFormat::Json => {
            AnalysisReport::new(&request, snapshot, &assessment, activities, Utc::now())
                .to_json()?
        }
        OutputFormat::Csv => {
            AnalysisReport::new(&request, snapshot, &assessment, activities, Utc::now()).to_csv()
        }
    };

    emit(&rendered, output)
}

async fn activities(query: &str, when: &WhenArgs, provider: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let (request, response) = fetch(query, EventKind::Generic, when, provider, &config).await?;

    let suggestions = recommend(&response.snapshot);
    if suggestions.is_empty() {
        warn!("no activities matched the conditions");
    }

    let rendered =
        render::activities_only(&request.location.display_name(), &response.snapshot, &suggestions);
    print!("{rendered}");
    Ok(())
}

/// Resolve the location, validate the target and query the provider.
///
/// With `--now` the request is dated by the provider's observation time.
async fn fetch(
    query: &str,
    event: EventKind,
    when: &WhenArgs,
    provider: Option<&str>,
    config: &Config,
) -> anyhow::Result<(AnalysisRequest, WeatherResponse)> {
    let today = Local::now().date_naive();
    let target = resolve_target(when, today)?;

    let location = resolve_location(query, &Geocoder::new()).await?;
    info!(location = %location, "location resolved");

    let planned = target.map(|target| AnalysisRequest::new(location.clone(), event, target));
    let weather_request = match &planned {
        Some(request) => {
            request.validate(today, config.horizon_days)?;
            request.weather_request()
        }
        None => WeatherRequest {
            latitude: location.latitude,
            longitude: location.longitude,
            when: None,
        },
    };

    let provider = select_provider(provider, config)?;
    debug!(provider = %provider.id(), ?target, "requesting weather");

    let response = provider
        .get_weather(&weather_request)
        .await
        .with_context(|| format!("Failed to fetch weather for {location}"))?;

    let request = planned
        .unwrap_or_else(|| AnalysisRequest::new(location, event, response.observed_at));

    Ok((request, response))
}

fn select_provider(
    explicit: Option<&str>,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    match explicit {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, config),
        None => default_provider_from_config(config),
    }
}

/// `None` means current conditions.
fn resolve_target(when: &WhenArgs, today: NaiveDate) -> anyhow::Result<Option<NaiveDateTime>> {
    if when.now {
        return Ok(None);
    }

    let fallback = default_target(today);

    let date = match &when.date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => fallback.date(),
    };
    let time = match &when.time {
        Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .with_context(|| format!("Invalid time '{raw}', expected HH:MM"))?,
        None => fallback.time(),
    };

    Ok(Some(date.and_time(time)))
}

fn parse_event(raw: &str) -> EventKind {
    let kind = EventKind::parse(raw);
    let explicit_generic = raw.trim().eq_ignore_ascii_case(EventKind::Generic.as_str());
    if kind == EventKind::Generic && !explicit_generic {
        warn!(event = raw, "unknown event type, using general advice");
    }
    kind
}

fn emit(rendered: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherpals_core::RequestError;

    fn when(date: Option<&str>, time: Option<&str>, now: bool) -> WhenArgs {
        WhenArgs {
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date")
    }

    #[test]
    fn target_defaults_to_tomorrow_noon() {
        let target = resolve_target(&when(None, None, false), today()).unwrap();
        assert_eq!(target, Some(default_target(today())));
    }

    #[test]
    fn target_combines_date_and_time() {
        let target = resolve_target(&when(Some("2025-10-04"), Some("18:30"), false), today())
            .unwrap()
            .unwrap();
        assert_eq!(target.to_string(), "2025-10-04 18:30:00");
    }

    #[test]
    fn now_means_current_conditions() {
        assert_eq!(resolve_target(&when(None, None, true), today()).unwrap(), None);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = resolve_target(&when(Some("04/10/2025"), None, false), today()).unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn target_beyond_horizon_fails_before_querying_a_provider() {
        let config = Config { horizon_days: 3, ..Config::default() };
        let far = Local::now().date_naive() + chrono::Days::new(10);
        let args = when(Some(&far.format("%Y-%m-%d").to_string()), None, false);

        let err = fetch("26.22, 50.58", EventKind::Picnic, &args, None, &config)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RequestError>(),
            Some(RequestError::BeyondHorizon { horizon_days: 3, .. })
        ));
    }

    #[test]
    fn unknown_event_falls_back_to_generic() {
        assert_eq!(parse_event("Wedding"), EventKind::Generic);
        assert_eq!(parse_event("PICNIC"), EventKind::Picnic);
    }

    #[test]
    fn analyze_args_parse() {
        let cli = Cli::try_parse_from([
            "weatherpals", "-v", "analyze", "Manama", "--event", "concert", "--date",
            "2025-10-04", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Analyze { location, event, format, .. } => {
                assert_eq!(location, "Manama");
                assert_eq!(event, "concert");
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn now_conflicts_with_date() {
        let parsed = Cli::try_parse_from([
            "weatherpals", "activities", "Manama", "--now", "--date", "2025-10-04",
        ]);
        assert!(parsed.is_err());
    }
}
