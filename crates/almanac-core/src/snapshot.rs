use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{
  info,
  warn
};

use crate::datetime::truncate_to_minute;
use crate::event::Event;

/// Reads a JSON array of events. The
/// file is never written back; callers
/// apply proposed changes themselves.
/// Times are kept to the minute, the
/// precision of the edit form.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_events(
  path: &Path
) -> anyhow::Result<Vec<Event>> {
  let raw = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let events = parse_events(&raw)
    .with_context(|| {
      format!(
        "failed to parse {}",
        path.display()
      )
    })?;

  info!(
    events = events.len(),
    "loaded event snapshot"
  );
  Ok(events)
}

pub fn parse_events(
  raw: &str
) -> anyhow::Result<Vec<Event>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }

  let mut events: Vec<Event> =
    serde_json::from_str(raw)
      .context("expected a JSON array of events")?;

  let mut seen = HashSet::new();
  for event in &mut events {
    let start =
      truncate_to_minute(event.start);
    let end = truncate_to_minute(event.end);
    if start != event.start
      || end != event.end
    {
      warn!(
        id = %event.id,
        start = %event.start,
        end = %event.end,
        "dropping sub-minute precision"
      );
      event.start = start;
      event.end = end;
    }

    if !event.is_well_formed() {
      warn!(
        id = %event.id,
        start = %event.start,
        end = %event.end,
        "event ends before it starts; \
         keeping it for display"
      );
    }
    if !seen.insert(event.id) {
      warn!(
        id = %event.id,
        "duplicate event id in snapshot"
      );
    }
  }

  Ok(events)
}
