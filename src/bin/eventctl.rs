// Command-line front end for the events API.
//
// Covers the same flows as the web client: browse with a location filter,
// view one event, create an event.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use event_discovery::{
    client::EventsClient,
    dates::{format_display, parse_event_date, relative_time},
    models::{available_spots, is_full, Event},
    validation::CreateEventRequest,
};

#[derive(Parser)]
#[command(name = "eventctl")]
#[command(about = "Browse and create events")]
#[command(version)]
struct Cli {
    /// API base URL
    #[arg(long, env = "EVENTS_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = Output::Text)]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List upcoming events, soonest first
    List {
        /// Case-insensitive location substring
        #[arg(long, short)]
        location: Option<String>,
    },

    /// Show a single event
    Show {
        /// 24-character event id
        id: String,
    },

    /// Create an event
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
        /// RFC 3339 or YYYY-MM-DDTHH:MM (UTC)
        #[arg(long)]
        date: String,
        #[arg(long)]
        max_participants: i64,
        #[arg(long)]
        current_participants: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = EventsClient::new(&cli.api_url)?;

    match cli.command {
        Command::List { location } => {
            let response = client.fetch_events(location.as_deref()).await?;
            let events = response.data.unwrap_or_default();
            match cli.output {
                Output::Json => print_json(&events)?,
                Output::Text => print_table(&events),
            }
        }
        Command::Show { id } => {
            let response = client.fetch_event(&id).await?;
            let Some(event) = response.data else {
                bail!("Server returned no event");
            };
            match cli.output {
                Output::Json => print_json(&event)?,
                Output::Text => print_event(&event),
            }
        }
        Command::Create {
            title,
            description,
            location,
            date,
            max_participants,
            current_participants,
        } => {
            let date = parse_event_date(&date)
                .with_context(|| format!("Cannot parse date {:?}", date))?;
            let mut request =
                CreateEventRequest::new(title, description, location, date, max_participants);
            if let Some(current) = current_participants {
                request = request.with_current_participants(current);
            }

            let response = client.create_event(&request).await?;
            if let Some(message) = &response.message {
                eprintln!("{}", message);
            }
            if let Some(event) = response.data {
                match cli.output {
                    Output::Json => print_json(&event)?,
                    Output::Text => print_event(&event),
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}

fn print_table(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    let now = Utc::now();
    println!(
        "{:<24}  {:<30}  {:<24}  {:<28}  {:<12}  {}",
        "ID", "TITLE", "LOCATION", "DATE", "WHEN", "SPOTS"
    );
    for event in events {
        let spots = if is_full(event) {
            "full".to_string()
        } else {
            format!("{}/{}", available_spots(event), event.max_participants)
        };
        println!(
            "{:<24}  {:<30}  {:<24}  {:<28}  {:<12}  {}",
            event.id.as_str(),
            truncate(&event.title, 30),
            truncate(&event.location, 24),
            format_display(&event.date),
            relative_time(&event.date, now),
            spots
        );
    }
    println!("\n{} event(s)", events.len());
}

fn print_event(event: &Event) {
    let now = Utc::now();
    let field = |label: &str, value: &str| println!("{:<14} {}", format!("{}:", label), value);

    field("ID", event.id.as_str());
    field("Title", &event.title);
    field("Location", &event.location);
    field(
        "Date",
        &format!("{} ({})", format_display(&event.date), relative_time(&event.date, now)),
    );
    field(
        "Participants",
        &format!("{} / {}", event.current_participants, event.max_participants),
    );
    field(
        "Available",
        &if is_full(event) {
            "Event is full".to_string()
        } else {
            format!("{} spots", available_spots(event))
        },
    );
    println!();
    println!("{}", event.description);
}
