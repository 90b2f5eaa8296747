use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use payroll_core::render::PresentationSurface;
use payroll_core::{ExportFormat, SubmitOutcome, Workflow};
use tracing::debug;

use payroll_client::config::ClientConfig;
use payroll_client::terminal::TerminalSurface;
use payroll_client::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Lohnsteuer 2025 client.
///
/// Sends payroll-tax inputs to the calculation service, shows the derived
/// figures and keeps a local history of past calculations.
#[derive(Debug, Parser)]
struct Cli {
    /// Configuration file. Defaults to `payroll.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store connection string, overriding the config file.
    /// For SQLite this is a file path (e.g. `payroll.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or filter directive, overriding the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate the taxes for the inputs in a form file.
    Calculate {
        #[arg(long)]
        form: PathBuf,
    },
    /// Past calculations.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Named input sets.
    Scenario {
        #[command(subcommand)]
        action: ScenarioAction,
    },
    /// Compare all calculations in the history.
    Compare,
    /// Export a calculation as a document.
    Export {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Name printed on the document and used as the file name.
        #[arg(long)]
        name: Option<String>,
        /// History entry to export. Defaults to the most recent one.
        #[arg(long)]
        from: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    List,
    /// Show an entry's figures again.
    Show { timestamp: DateTime<Utc> },
    Delete { timestamp: DateTime<Utc> },
    Clear,
}

#[derive(Debug, Subcommand)]
enum ScenarioAction {
    Save {
        #[arg(long)]
        name: String,
        #[arg(long)]
        form: PathBuf,
    },
    List,
    /// Calculate a saved scenario.
    Run { timestamp: DateTime<Utc> },
    Delete { timestamp: DateTime<Utc> },
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn calculate(
    workflow: &Workflow,
    form: &payroll_core::RawForm,
    surface: &mut impl PresentationSurface,
) {
    match workflow.submit(form).await {
        Ok(SubmitOutcome::Applied { view, .. }) => surface.show(&view),
        Ok(SubmitOutcome::Stale) => debug!("calculation superseded"),
        Err(e) => surface.show_error(&e.user_message()),
    }
}

async fn run(
    command: Command,
    workflow: &Workflow,
    surface: &mut TerminalSurface<std::io::Stdout>,
) -> anyhow::Result<()> {
    match command {
        Command::Calculate { form } => {
            let form = app::load_form(&form)?;
            calculate(workflow, &form, surface).await;
        }
        Command::History { action } => match action {
            HistoryAction::List => surface.history(&workflow.history().await)?,
            HistoryAction::Show { timestamp } => match workflow.reload_history(timestamp).await {
                Ok(view) => surface.show(&view),
                Err(e) => surface.show_error(&e.user_message()),
            },
            HistoryAction::Delete { timestamp } => workflow.delete_history(timestamp).await,
            HistoryAction::Clear => workflow.clear_history().await,
        },
        Command::Scenario { action } => match action {
            ScenarioAction::Save { name, form } => {
                let form = app::load_form(&form)?;
                let scenario = workflow.save_scenario(&name, &form).await;
                surface.message(&format!(
                    "Szenario gespeichert: {} ({})",
                    scenario.name,
                    scenario.timestamp.to_rfc3339()
                ))?;
            }
            ScenarioAction::List => surface.scenarios(&workflow.scenarios().await)?,
            ScenarioAction::Run { timestamp } => match workflow.load_scenario(timestamp).await {
                Ok(form) => calculate(workflow, &form, surface).await,
                Err(e) => surface.show_error(&e.user_message()),
            },
            ScenarioAction::Delete { timestamp } => workflow.delete_scenario(timestamp).await,
        },
        Command::Compare => surface.comparison(&workflow.compare().await)?,
        Command::Export { format, name, from } => {
            // The current result lives only as long as the process, so
            // reload the requested history entry first.
            let timestamp = match from {
                Some(ts) => Some(ts),
                None => workflow.history().await.first().map(|e| e.timestamp),
            };
            if let Some(timestamp) = timestamp {
                if let Err(e) = workflow.reload_history(timestamp).await {
                    surface.show_error(&e.user_message());
                    return Ok(());
                }
            }
            match workflow.export(format, name.as_deref()).await {
                Ok(receipt) => {
                    surface.message(&format!("Export gespeichert: {}", receipt.location))?
                }
                Err(e) => surface.show_error(&e.user_message()),
            }
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load_or_default(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.connection_string = db;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::apply(&config.logging)?;

    debug!(backend = %config.store.backend, "opening store");
    let workflow = app::build_workflow(&config).await?;
    let mut surface = TerminalSurface::stdout();

    run(cli.command, &workflow, &mut surface).await?;
    Ok(())
}
