pub mod bucket;
pub mod cli;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod event;
pub mod form;
pub mod grid;
pub mod layout;
pub mod navigation;
pub mod palette;
pub mod render;
pub mod session;
pub mod snapshot;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting almanac CLI"
  );

  let cfg = config::CalendarConfig::load(
    cli.config.as_deref()
  )?;

  let events_path = cli
    .events
    .clone()
    .or_else(|| cfg.events_file.clone());
  let events = match events_path {
    | Some(path) => {
      snapshot::load_events(&path)?
    }
    | None => {
      debug!(
        "no event snapshot configured; \
         showing an empty calendar"
      );
      Vec::new()
    }
  };

  let mut renderer =
    render::Renderer::new(
      cfg.display.color,
      cfg.layout.min_event_height_percent
    );

  commands::dispatch(
    &cfg,
    &mut renderer,
    &events,
    cli.command
  )?;

  info!("done");
  Ok(())
}
