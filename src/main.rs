mod config;
mod google;
mod local_dir;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use clap::Parser;
use gcal2org_core::{CalendarService, OrgRenderer, ResolvedConfiguration};
use tracing_subscriber::EnvFilter;

use google::GoogleCalendar;
use local_dir::LocalDir;

#[derive(Parser)]
#[command(name = "gcal2org")]
#[command(about = "Export Google Calendar events as an org-mode outline")]
struct Cli {
    /// Properties file to read (defaults to ~/.gcal2org.properties)
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Write the document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show times in this IANA zone (e.g. "Europe/Paris") instead of the local zone
    #[arg(long, value_name = "ZONE", value_parser = parse_timezone)]
    timezone: Option<chrono_tz::Tz>,

    /// Read calendars from saved `<calendar-id>.json` files in this directory (wins over --access-token)
    #[arg(long, value_name = "DIR")]
    events_dir: Option<PathBuf>,

    /// OAuth access token for the Google Calendar API
    #[arg(long, env = "GCAL2ORG_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_timezone(s: &str) -> Result<chrono_tz::Tz, String> {
    s.parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Unknown time zone '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config.as_deref() {
        Some(path) => config::expand_path(path),
        None => config::default_config_path()?,
    };
    let config = config::load_config(&config_path)?;

    match (&cli.events_dir, &cli.access_token) {
        (Some(dir), _) => write_document(&cli, &config, &LocalDir::new(dir)),
        (None, Some(token)) => write_document(&cli, &config, &GoogleCalendar::new(token.as_str())?),
        (None, None) => anyhow::bail!(
            "No calendar source given.\n\n\
            Pass a Google Calendar access token:\n  \
            gcal2org --access-token \"$(gcloud auth print-access-token)\"\n\n\
            or render saved event files:\n  \
            gcal2org --events-dir ./events"
        ),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn write_document<S: CalendarService>(
    cli: &Cli,
    config: &ResolvedConfiguration,
    service: &S,
) -> Result<()> {
    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);

    match cli.timezone {
        Some(tz) => render(config, tz, service, &mut out),
        None => render(config, Local, service, &mut out),
    }
}

fn render<Tz, S, W>(config: &ResolvedConfiguration, tz: Tz, service: &S, out: &mut W) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    S: CalendarService,
    W: Write,
{
    OrgRenderer::new(config, tz)
        .render(service, out)
        .context("Failed to render org document")
}
