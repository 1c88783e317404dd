//! CLI entry point for the Eventbrite report tool.
//!
//! Provides subcommands for reporting on the next upcoming event, a single
//! event, every past event, and an attendance overview across all of them.

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use eventbrite_report::{
    attendance::AttendanceTally,
    badges::generate_badges,
    identity::AliasMap,
    infra::eventbrite::{DEFAULT_API_BASE, EventbriteClient},
    output::{
        render_attendance_report, render_event_report, report_stem, write_json,
        write_leaderboard_csv, write_roster_csv, write_text,
    },
    pdf::write_event_pdf,
    roster::{EventRoster, RosterBuilder},
    services::ticketing_api::{Event, TicketingApi},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "eventbrite_report")]
#[command(about = "Attendee reports for your Eventbrite events", long_about = None)]
struct Cli {
    /// Eventbrite private token
    #[arg(long, env = "EVENTBRITE_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Eventbrite API base URL
    #[arg(long, env = "EVENTBRITE_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// JSON file mapping name variants to canonical names
    #[arg(long, env = "EVENTBRITE_ALIASES", default_value = "aliases.json", global = true)]
    aliases: PathBuf,

    /// Directory to write reports into
    #[arg(short, long, default_value = "output", global = true)]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report and badges for the next upcoming event (default)
    Next {
        /// P-touch label template to generate badges from
        #[arg(long, default_value = "badges.lbx")]
        badge_template: PathBuf,
    },
    /// Report for a single event
    Event {
        /// Eventbrite event id
        #[arg(value_name = "EVENT_ID")]
        id: String,
    },
    /// One report per past event
    Past,
    /// Attendance leaderboard across all past events
    Overview,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing()?;

    let cli = Cli::parse();

    let Some(token) = cli.token.filter(|t| !t.is_empty()) else {
        bail!(
            "EVENTBRITE_TOKEN is not set.\n\
             Copy .env.example to .env and fill in your private token.\n\
             You can create a token at https://www.eventbrite.com/platform/api-keys"
        );
    };

    let api = EventbriteClient::from_token(&token, &cli.api_base)?;
    let builder = RosterBuilder::new(AliasMap::load_or_empty(&cli.aliases));
    let output_dir = cli.output_dir.as_path();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let command = cli.command.unwrap_or(Commands::Next {
        badge_template: PathBuf::from("badges.lbx"),
    });

    match command {
        Commands::Next { badge_template } => {
            info!("Fetching your next event");
            let org_id = api.organization_id().await?;
            let event = api.next_event(&org_id).await?;

            let roster = report_event(&api, &builder, &event, output_dir).await?;
            generate_badges(&roster, output_dir, &badge_template)?;
        }
        Commands::Event { id } => {
            let event = api.event(&id).await?;
            report_event(&api, &builder, &event, output_dir).await?;
        }
        Commands::Past => {
            let org_id = api.organization_id().await?;
            let events = api.past_events(&org_id).await?;

            for event in &events {
                report_event(&api, &builder, event, output_dir).await?;
            }
            info!(events = events.len(), "Past event reports written");
        }
        Commands::Overview => {
            attendance_overview(&api, &builder, output_dir).await?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/eventbrite_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("eventbrite_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

/// Fetches one event's attendees and writes its Markdown, PDF and CSV report.
#[tracing::instrument(skip(api, builder, event, output_dir), fields(event_id = %event.id, title = %event.title))]
async fn report_event<T: TicketingApi + Sync>(
    api: &T,
    builder: &RosterBuilder,
    event: &Event,
    output_dir: &Path,
) -> Result<EventRoster> {
    let registrations = api.attendees(&event.id).await?;
    let roster = builder.build(&registrations);

    if roster.is_empty() {
        warn!("No confirmed attendees");
    }

    let stem = report_stem(event);
    let generated_at = Local::now().naive_local();
    let report = render_event_report(event, &roster, generated_at);

    let md_path = output_dir.join(format!("{stem}.md"));
    write_text(&md_path, &report)?;
    info!(path = %md_path.display(), "Markdown written");

    let pdf_path = output_dir.join(format!("{stem}.pdf"));
    write_event_pdf(&pdf_path, event, &roster, generated_at)?;
    info!(path = %pdf_path.display(), "PDF written");

    let csv_path = output_dir.join(format!("{stem}.csv"));
    write_roster_csv(&csv_path, &roster)?;
    info!(path = %csv_path.display(), attendees = roster.len(), "CSV written");

    Ok(roster)
}

/// Folds every past event's roster into one leaderboard and writes it out.
#[tracing::instrument(skip_all)]
async fn attendance_overview<T: TicketingApi + Sync>(
    api: &T,
    builder: &RosterBuilder,
    output_dir: &Path,
) -> Result<()> {
    let org_id = api.organization_id().await?;
    let events = api.past_events(&org_id).await?;

    let mut tally = AttendanceTally::new();
    for event in &events {
        let registrations = api.attendees(&event.id).await?;
        let roster = builder.build(&registrations);
        info!(event_id = %event.id, title = %event.title, attendees = roster.len(), "Event tallied");
        tally = tally.accumulate(&roster);
    }

    let board = tally.finalize();
    info!(events = board.total_events, people = board.len(), "Leaderboard ready");

    let md_path = output_dir.join("attendance.md");
    write_text(&md_path, &render_attendance_report(&board, Local::now().naive_local()))?;
    write_leaderboard_csv(&output_dir.join("attendance.csv"), &board)?;
    write_json(&output_dir.join("attendance.json"), &board)?;

    info!(path = %md_path.display(), "Attendance overview written");
    Ok(())
}
