use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::form::FormField;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "almanac",
    version,
    about = "Almanac: month and week calendar views over an event snapshot",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Calendar config file (TOML).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// JSON array of events to display.
    #[arg(long = "events", global = true)]
    pub events: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Six-week month grid around DATE.
    Month {
        #[arg(allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Hour-by-hour week containing DATE.
    Week {
        #[arg(allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Events touching DATE.
    Day {
        #[arg(allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Default form fields for a new event, as JSON.
    Fields {
        #[arg(allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Validate form fields and print the proposed change.
    Draft(DraftArgs),
    /// Print the removal of an existing event.
    Remove { id: String },
    /// List the colour palette and categories.
    Palette,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// Edit this existing event instead of creating one.
    #[arg(long)]
    pub id: Option<String>,
    /// Pin a new event's start date (date expression).
    #[arg(long)]
    pub on: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub start_time: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub end_time: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

impl DraftArgs {
    /// The fields given on the command line, in form order.
    pub fn overrides(&self) -> Vec<(FormField, String)> {
        [
            (FormField::Title, &self.title),
            (FormField::Description, &self.description),
            (FormField::StartDate, &self.start_date),
            (FormField::StartTime, &self.start_time),
            (FormField::EndDate, &self.end_date),
            (FormField::EndTime, &self.end_time),
            (FormField::Color, &self.color),
            (FormField::Category, &self.category),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
        .collect()
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
