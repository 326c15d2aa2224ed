use chrono::{
  NaiveDate,
  NaiveDateTime
};

use crate::datetime::{
  next_midnight,
  start_of_day
};
use crate::event::Event;

/// One grid cell together with the
/// events that touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
  pub date:   NaiveDate,
  pub events: Vec<&'a Event>
}

impl DayBucket<'_> {
  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }
}

/// Events whose `[start, end]` span
/// touches any part of `date`, ordered
/// by start. Events spanning several
/// days appear on each of them.
pub fn events_on_date<'a>(
  events: &'a [Event],
  date: NaiveDate
) -> Vec<&'a Event> {
  events_in_range(events, date, date)
}

/// Events overlapping the days
/// `first_day..=last_day`, ordered by
/// start with ties in input order.
pub fn events_in_range<'a>(
  events: &'a [Event],
  first_day: NaiveDate,
  last_day: NaiveDate
) -> Vec<&'a Event> {
  let window_start =
    start_of_day(first_day);
  let window_end =
    next_midnight(last_day);

  let mut matched = events
    .iter()
    .filter(|event| {
      overlaps(
        event,
        window_start,
        window_end
      )
    })
    .collect::<Vec<_>>();

  // `sort_by_key` is stable, which
  // keeps input order for equal starts.
  matched.sort_by_key(|event| event.start);

  tracing::trace!(
    total = events.len(),
    matched = matched.len(),
    %first_day,
    %last_day,
    "bucketed events"
  );
  matched
}

/// Buckets for each supplied cell, in
/// cell order.
pub fn bucket_days<'a>(
  events: &'a [Event],
  days: &[NaiveDate]
) -> Vec<DayBucket<'a>> {
  days
    .iter()
    .map(|date| DayBucket {
      date:   *date,
      events: events_on_date(
        events, *date
      )
    })
    .collect()
}

fn overlaps(
  event: &Event,
  window_start: NaiveDateTime,
  window_end: NaiveDateTime
) -> bool {
  event.start < window_end
    && event.end >= window_start
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::event::EventId;
  use crate::palette::EventColor;

  fn ymd(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day)
      .expect("valid date")
  }

  fn at(
    day: u32,
    hour: u32,
    minute: u32
  ) -> NaiveDateTime {
    ymd(day)
      .and_hms_opt(hour, minute, 0)
      .expect("valid time")
  }

  fn event(
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime
  ) -> Event {
    Event {
      id: EventId::new(),
      title: title.to_string(),
      description: None,
      start,
      end,
      color: EventColor::default(),
      category: None
    }
  }

  fn titles(events: &[&Event]) -> Vec<String> {
    events
      .iter()
      .map(|event| event.title.clone())
      .collect()
  }

  #[test]
  fn single_day_events_land_on_their_day()
  {
    let events = vec![
      event("lunch", at(10, 12, 0), at(10, 13, 0)),
      event("other day", at(11, 9, 0), at(11, 10, 0)),
    ];
    assert_eq!(
      titles(&events_on_date(&events, ymd(10))),
      vec!["lunch"]
    );
    assert!(
      events_on_date(&events, ymd(12))
        .is_empty()
    );
  }

  #[test]
  fn multi_day_events_appear_on_every_day()
  {
    let events = vec![event(
      "conference",
      at(10, 15, 0),
      at(12, 11, 0)
    )];
    for day in [10, 11, 12] {
      assert_eq!(
        events_on_date(&events, ymd(day))
          .len(),
        1,
        "day {day}"
      );
    }
    assert!(
      events_on_date(&events, ymd(9))
        .is_empty()
    );
    assert!(
      events_on_date(&events, ymd(13))
        .is_empty()
    );
  }

  #[test]
  fn boundaries_follow_closed_day_span()
  {
    let events = vec![
      // Ends exactly at the start of the 10th.
      event("late night", at(9, 22, 0), at(10, 0, 0)),
      // Starts exactly at the start of the 11th.
      event("early", at(11, 0, 0), at(11, 1, 0)),
    ];
    assert_eq!(
      titles(&events_on_date(&events, ymd(10))),
      vec!["late night"]
    );
    assert_eq!(
      titles(&events_on_date(&events, ymd(11))),
      vec!["early"]
    );
  }

  #[test]
  fn results_sorted_by_start_with_stable_ties()
  {
    let events = vec![
      event("b", at(10, 14, 0), at(10, 15, 0)),
      event("a1", at(10, 9, 0), at(10, 10, 0)),
      event("a2", at(10, 9, 0), at(10, 9, 30)),
      event("overnight", at(9, 20, 0), at(10, 2, 0)),
    ];
    assert_eq!(
      titles(&events_on_date(&events, ymd(10))),
      vec!["overnight", "a1", "a2", "b"]
    );
  }

  #[test]
  fn inverted_events_are_tolerated() {
    let events = vec![event(
      "broken",
      at(10, 10, 0),
      at(10, 9, 0)
    )];
    assert_eq!(
      events_on_date(&events, ymd(10))
        .len(),
      1
    );
  }

  #[test]
  fn range_matches_union_of_days() {
    let events = vec![
      event("mon", at(11, 9, 0), at(11, 10, 0)),
      event("sun", at(17, 9, 0), at(17, 10, 0)),
      event("next week", at(18, 9, 0), at(18, 10, 0)),
      event("spanning in", at(8, 9, 0), at(10, 10, 0)),
    ];
    assert_eq!(
      titles(&events_in_range(
        &events,
        ymd(10),
        ymd(16)
      )),
      vec!["spanning in", "mon"]
    );
    assert_eq!(
      events_in_range(&events, ymd(17), ymd(17)),
      events_on_date(&events, ymd(17))
    );
  }

  #[test]
  fn input_is_left_untouched() {
    let events = vec![
      event("b", at(10, 14, 0), at(10, 15, 0)),
      event("a", at(10, 9, 0), at(10, 10, 0)),
    ];
    let before = events.clone();
    let _ = events_on_date(&events, ymd(10));
    assert_eq!(events, before);
  }

  #[test]
  fn buckets_follow_cell_order() {
    let events = vec![event(
      "two days",
      at(10, 20, 0),
      at(11, 8, 0)
    )];
    let days = [ymd(9), ymd(10), ymd(11)];
    let buckets = bucket_days(&events, &days);
    assert_eq!(buckets.len(), 3);
    assert!(buckets[0].is_empty());
    assert_eq!(buckets[1].len(), 1);
    assert_eq!(buckets[2].date, ymd(11));
    assert_eq!(buckets[2].len(), 1);
  }
}
