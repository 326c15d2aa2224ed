//! Vertical placement of events inside
//! a 24-hour day column, as percentages
//! of the column height.
//!
//! An event is only placed on the day
//! it starts; blocks are never split
//! across day columns.

use chrono::{
  NaiveDate,
  NaiveDateTime,
  Timelike
};

use crate::event::Event;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Smallest height a renderer should
/// draw so short events stay clickable.
/// Not applied by `height_percentage`.
pub const MIN_VISUAL_HEIGHT_PERCENT: f64 =
  1.5;

/// Offset from the top of the column.
/// Only the time of day matters.
pub fn vertical_position(
  instant: NaiveDateTime
) -> f64 {
  let minutes = instant.hour() * 60
    + instant.minute();
  f64::from(minutes) / MINUTES_PER_DAY
    * 100.0
}

/// Share of the column covered by
/// `start..end`, clamped to `[0, 100]`.
pub fn height_percentage(
  start: NaiveDateTime,
  end: NaiveDateTime
) -> f64 {
  let minutes =
    (end - start).num_minutes().max(0);
  (minutes as f64 / MINUTES_PER_DAY
    * 100.0)
    .min(100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock<'a> {
  pub event:  &'a Event,
  pub top:    f64,
  pub height: f64
}

impl EventBlock<'_> {
  /// Height with the renderer's floor
  /// applied.
  pub fn visual_height(
    &self,
    min_height: f64
  ) -> f64 {
    self.height.max(min_height)
  }
}

/// Blocks for the events that start on
/// `day`, ordered by start.
pub fn day_column<'a>(
  events: &'a [Event],
  day: NaiveDate
) -> Vec<EventBlock<'a>> {
  let mut starting = events
    .iter()
    .filter(|event| {
      event.start.date() == day
    })
    .collect::<Vec<_>>();
  starting.sort_by_key(|event| event.start);

  starting
    .into_iter()
    .map(|event| EventBlock {
      event,
      top: vertical_position(event.start),
      height: height_percentage(
        event.start,
        event.end
      )
    })
    .collect()
}

/// Events that start on `day` within the
/// given hour row, ordered by start.
pub fn slot_events<'a>(
  events: &'a [Event],
  day: NaiveDate,
  hour: u32
) -> Vec<&'a Event> {
  let mut matched = events
    .iter()
    .filter(|event| {
      event.start.date() == day
        && event.start.hour() == hour
    })
    .collect::<Vec<_>>();
  matched.sort_by_key(|event| event.start);
  matched
}
