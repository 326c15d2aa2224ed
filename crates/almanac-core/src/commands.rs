use std::io::{self, Write};

use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cli::{Command, DraftArgs};
use crate::config::CalendarConfig;
use crate::datetime::parse_date_expr;
use crate::event::{Event, EventChange, EventId};
use crate::form::fields_for_new_event;
use crate::navigation::{NavigationState, ViewMode};
use crate::render::Renderer;
use crate::session::{EditSession, SubmitOutcome};

#[instrument(skip(cfg, renderer, events, command))]
pub fn dispatch(
    cfg: &CalendarConfig,
    renderer: &mut Renderer,
    events: &[Event],
    command: Option<Command>,
) -> anyhow::Result<()> {
    let now = Local::now().naive_local();
    let command = command.unwrap_or_else(|| {
        let view = cfg.default_view();
        debug!(view = view.as_key(), "no explicit command, using default view");
        match view {
            ViewMode::Month => Command::Month { date: None },
            ViewMode::Week => Command::Week { date: None },
        }
    });

    match command {
        Command::Month { date } => cmd_view(cfg, renderer, events, ViewMode::Month, date, now),
        Command::Week { date } => cmd_view(cfg, renderer, events, ViewMode::Week, date, now),
        Command::Day { date } => {
            let date = resolve_date(date.as_deref(), now.date())?;
            renderer.print_day(date, events)
        }
        Command::Fields { date } => {
            let clicked = date
                .as_deref()
                .map(|raw| parse_date_expr(raw, now.date()))
                .transpose()?;
            print_json(&fields_for_new_event(now, clicked))
        }
        Command::Draft(args) => cmd_draft(renderer, events, &args, now),
        Command::Remove { id } => cmd_remove(events, &id),
        Command::Palette => renderer.print_palette(),
    }
}

fn resolve_date(raw: Option<&str>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date_expr(raw, today),
        None => Ok(today),
    }
}

fn cmd_view(
    cfg: &CalendarConfig,
    renderer: &mut Renderer,
    events: &[Event],
    view: ViewMode,
    date: Option<String>,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    let today = now.date();
    let focus = resolve_date(date.as_deref(), today)?;
    let state = NavigationState::new(view, focus);
    info!(view = view.as_key(), focus = %focus, events = events.len(), "rendering view");
    renderer.print_view(state, cfg.week_start(), today, events)
}

#[instrument(skip(renderer, events, args, now))]
fn cmd_draft(
    renderer: &mut Renderer,
    events: &[Event],
    args: &DraftArgs,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    let session = match args.id.as_deref() {
        Some(raw) => {
            let current = find_event(events, raw)?;
            if args.on.is_some() {
                warn!("--on only applies to new events; ignoring");
            }
            EditSession::open_existing(current)
        }
        None => {
            let clicked = args
                .on
                .as_deref()
                .map(|raw| parse_date_expr(raw, now.date()))
                .transpose()?;
            EditSession::open_new(now, clicked)
        }
    };

    let session = args
        .overrides()
        .into_iter()
        .fold(session, |session, (field, value)| session.set_field(field, value));

    match session.submit() {
        SubmitOutcome::Rejected(session) => {
            let errors = session.errors().cloned().unwrap_or_default();
            renderer.print_errors(&errors)?;
            Err(anyhow!("event fields failed validation: {errors}"))
        }
        SubmitOutcome::Committed(Some(change)) => {
            info!(target_id = %change.target(), "proposing change");
            print_json(&change)
        }
        SubmitOutcome::Committed(None) => {
            info!("no changes to propose");
            Ok(())
        }
    }
}

fn cmd_remove(events: &[Event], raw_id: &str) -> anyhow::Result<()> {
    let current = find_event(events, raw_id)?;
    let (_, change) = EditSession::open_existing(current).delete();
    let change: EventChange =
        change.ok_or_else(|| anyhow!("no removal proposed for {}", current.id))?;
    print_json(&change)
}

fn find_event<'a>(events: &'a [Event], raw_id: &str) -> anyhow::Result<&'a Event> {
    let id: EventId = raw_id.parse()?;
    events
        .iter()
        .find(|event| event.id == id)
        .ok_or_else(|| anyhow!("event not found in snapshot: {id}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}
