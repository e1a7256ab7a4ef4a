//! MesseCall Dashboard
//!
//! A headless terminal dashboard for viewing parish service events and
//! requesting duty swaps.

mod config;
mod render;
mod shutdown;

use clap::{Parser, Subcommand};
use config::{ConfigLoader, Overrides};
use messecall_core::events::{DashboardCommand, OrganizationId, command_channel, snapshot_channel};
use messecall_core::{Coordinator, OperationStatus};
use messecall_sdk::client::DashboardClient;
use render::{render_snapshot, render_swap_status};
use shutdown::spawn_shutdown_handler;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// MesseCall Dashboard - parish service events and duty swaps
#[derive(Parser, Debug)]
#[command(name = "messecall-dashboard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./messecall.toml")]
    config: PathBuf,

    /// Override the backend base URL
    #[arg(long, env = "MESSECALL_API_BASE")]
    api_base: Option<String>,

    /// Override the initial church (organization) id
    #[arg(long)]
    church_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the internal and public event lists and print them
    Events,
    /// Submit a swap request for an assignment
    Swap {
        /// Id of the assignment being offered
        #[arg(long)]
        assignment: String,
        /// Comma-separated ids of the volunteers who may take it over
        #[arg(long, default_value = "")]
        users: String,
    },
    /// Keep the dashboard open; each stdin line selects a church id, or
    /// `swap <assignment> <user ids>` submits a swap request
    Watch,
    /// Print the public events of the church as an iCalendar feed
    Calendar,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::debug!("Starting messecall-dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let loader = ConfigLoader::new(
        &args.config,
        Overrides {
            api_base: args.api_base.clone(),
            church_id: args.church_id.clone(),
        },
    );
    let config = loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!(api_base = %config.api_base, church_id = %config.church_id, "Configuration loaded");

    let client = DashboardClient::new(config.api_base.clone()).with_http_client(config.http_client());

    match args.command {
        Command::Events => {
            let mut coordinator = Coordinator::new(Arc::new(client), config.church_id);
            coordinator.start();
            coordinator.settle().await;
            print!("{}", render_snapshot(&coordinator.snapshot()));
        }
        Command::Swap { assignment, users } => {
            let mut coordinator = Coordinator::new(Arc::new(client), config.church_id);
            if let Err(e) = coordinator.submit_swap(&assignment, &users) {
                anyhow::bail!("{e}");
            }
            coordinator.settle().await;
            let status = coordinator.submitter().status();
            if let Some(line) = render_swap_status(status) {
                println!("{line}");
            }
            if let OperationStatus::Failed(message) = status {
                anyhow::bail!("{message}");
            }
        }
        Command::Watch => watch(client, config.church_id).await?,
        Command::Calendar => {
            let ics = fetch_calendar(&client, &config.church_id).await?;
            print!("{ics}");
        }
    }

    Ok(())
}

/// Run the coordinator loop, feeding it commands read from stdin.
async fn watch(client: DashboardClient, church_id: String) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(Arc::new(client), church_id);
    let (command_tx, command_rx) = command_channel();
    let (snapshot_tx, mut snapshot_rx) = snapshot_channel();
    let (shutdown_tx, mut shutdown_rx) = spawn_shutdown_handler();

    let coordinator_handle = tokio::spawn(coordinator.run(command_rx, snapshot_tx, shutdown_rx.clone()));

    let printer_handle = tokio::spawn(async move {
        let mut last = None;
        while snapshot_rx.changed().await.is_ok() {
            let rendered = render_snapshot(&snapshot_rx.borrow_and_update());
            if last.as_ref() != Some(&rendered) {
                println!("{rendered}");
                last = Some(rendered);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("stdin closed");
                    break;
                };
                if command_tx.send(parse_watch_line(&line)).await.is_err() {
                    break;
                }
            }
        }
    }

    // Closing the command channel lets the coordinator finish outstanding
    // requests and stop on its own.
    drop(command_tx);
    coordinator_handle.await?;
    // A dropped sender reads as shutdown, so it outlives the coordinator.
    drop(shutdown_tx);
    printer_handle.await?;
    Ok(())
}

/// Fetch the iCalendar feed of a church. A blank church id sends nothing.
async fn fetch_calendar(client: &DashboardClient, church_id: &str) -> anyhow::Result<String> {
    let Some(organization_id) = OrganizationId::parse(church_id) else {
        anyhow::bail!("a church id is required for the calendar feed");
    };
    Ok(client.public_events_calendar(organization_id.as_str()).await?)
}

/// Interpret one line of `watch` input.
fn parse_watch_line(line: &str) -> DashboardCommand {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("swap ") {
        let mut parts = rest.trim().splitn(2, char::is_whitespace);
        let assignment_id = parts.next().unwrap_or_default().to_owned();
        let user_ids = parts.next().unwrap_or_default().trim().to_owned();
        return DashboardCommand::SubmitSwap {
            assignment_id,
            user_ids,
        };
    }
    DashboardCommand::SetOrganizationId(line.to_owned())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,messecall_core=info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_line_selects_church() {
        assert_eq!(
            parse_watch_line(" 4 "),
            DashboardCommand::SetOrganizationId("4".to_owned())
        );
        assert_eq!(
            parse_watch_line(""),
            DashboardCommand::SetOrganizationId(String::new())
        );
    }

    #[test]
    fn test_watch_line_submits_swap() {
        assert_eq!(
            parse_watch_line("swap 5 2, 3,x"),
            DashboardCommand::SubmitSwap {
                assignment_id: "5".to_owned(),
                user_ids: "2, 3,x".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn test_calendar_requires_church_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let client = DashboardClient::new(url::Url::parse(&server.url()).unwrap());

        assert!(fetch_calendar(&client, "").await.is_err());
        assert!(fetch_calendar(&client, "   ").await.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_calendar_trims_church_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/public/churches/4/events.ics")
            .with_status(200)
            .with_header("content-type", "text/calendar")
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create_async()
            .await;
        let client = DashboardClient::new(url::Url::parse(&server.url()).unwrap());

        let ics = fetch_calendar(&client, " 4 ").await.unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        mock.assert_async().await;
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from([
            "messecall-dashboard",
            "--church-id",
            "2",
            "swap",
            "--assignment",
            "5",
            "--users",
            "2,3",
        ])
        .unwrap();
        assert_eq!(args.church_id.as_deref(), Some("2"));
        assert!(matches!(args.command, Command::Swap { ref assignment, .. } if assignment == "5"));
    }
}
