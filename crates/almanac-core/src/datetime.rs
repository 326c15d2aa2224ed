use std::sync::OnceLock;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Datelike,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  Timelike,
  Weekday
};
use regex::Regex;

use crate::grid::{
  add_days,
  checked_shift_months
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

fn date_shape()
-> anyhow::Result<&'static Regex> {
  static DATE_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  DATE_RE
    .get_or_init(|| {
      Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .ok()
    })
    .as_ref()
    .ok_or_else(|| {
      anyhow!(
        "internal date regex compile \
         failure"
      )
    })
}

fn time_shape()
-> anyhow::Result<&'static Regex> {
  static TIME_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  TIME_RE
    .get_or_init(|| {
      Regex::new(r"^\d{2}:\d{2}$").ok()
    })
    .as_ref()
    .ok_or_else(|| {
      anyhow!(
        "internal time regex compile \
         failure"
      )
    })
}

#[must_use]
pub fn format_date(
  date: NaiveDate
) -> String {
  date.format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn format_time(
  time: NaiveTime
) -> String {
  time.format(TIME_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD` with zero padding
/// required, so string order matches
/// date order.
pub fn parse_date(
  raw: &str
) -> anyhow::Result<NaiveDate> {
  let token = raw.trim();
  if !date_shape()?.is_match(token) {
    return Err(anyhow!(
      "expected YYYY-MM-DD, got \
       {token:?}"
    ));
  }
  NaiveDate::parse_from_str(
    token,
    DATE_FORMAT
  )
  .with_context(|| {
    format!("invalid date: {token}")
  })
}

/// Parses 24-hour `HH:MM`.
pub fn parse_time(
  raw: &str
) -> anyhow::Result<NaiveTime> {
  let token = raw.trim();
  if !time_shape()?.is_match(token) {
    return Err(anyhow!(
      "expected HH:MM, got {token:?}"
    ));
  }
  NaiveTime::parse_from_str(
    token,
    TIME_FORMAT
  )
  .with_context(|| {
    format!("invalid time: {token}")
  })
}

pub fn combine(
  date: &str,
  time: &str
) -> anyhow::Result<NaiveDateTime> {
  let date = parse_date(date)?;
  let time = parse_time(time)?;
  Ok(date.and_time(time))
}

pub fn start_of_day(
  date: NaiveDate
) -> NaiveDateTime {
  date.and_time(NaiveTime::MIN)
}

/// Midnight at the end of `date`, i.e.
/// the first instant of the next day.
pub fn next_midnight(
  date: NaiveDate
) -> NaiveDateTime {
  start_of_day(add_days(date, 1))
}

/// Drops minutes and smaller units.
pub fn truncate_to_hour(
  instant: NaiveDateTime
) -> NaiveDateTime {
  instant
    .date()
    .and_hms_opt(instant.hour(), 0, 0)
    .unwrap_or(instant)
}

/// Drops seconds and smaller units.
pub fn truncate_to_minute(
  instant: NaiveDateTime
) -> NaiveDateTime {
  instant
    .date()
    .and_hms_opt(
      instant.hour(),
      instant.minute(),
      0
    )
    .unwrap_or(instant)
}

/// Resolves a human date expression
/// relative to `today`.
///
/// Accepts `today`, `tomorrow`,
/// `yesterday`, weekday names (the next
/// such day), month names (the first of
/// that month this year), signed
/// offsets such as `+3d`, `-2w`, `+1m`
/// and plain `YYYY-MM-DD`.
#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_date_expr(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();
  let lower =
    token.to_ascii_lowercase();

  match lower.as_str() {
    | "today" | "now" => {
      return Ok(today);
    }
    | "tomorrow" => {
      return Ok(add_days(today, 1));
    }
    | "yesterday" => {
      return Ok(add_days(today, -1));
    }
    | _ => {}
  }

  if let Some(target) =
    parse_weekday_name(&lower)
  {
    return Ok(next_weekday_date(
      today, target
    ));
  }

  if let Some(month) =
    parse_month_name(&lower)
  {
    return NaiveDate::from_ymd_opt(
      today.year(),
      month,
      1
    )
    .ok_or_else(|| {
      anyhow!(
        "invalid month value: {month}"
      )
    });
  }

  if let Some(date) =
    parse_relative(token, today)?
  {
    return Ok(date);
  }

  parse_date(token).with_context(|| {
    "supported formats: \
     today/tomorrow/yesterday, \
     weekday names (e.g. monday), \
     month names (e.g. march), \
     +Nd/+Nw/+Nm, YYYY-MM-DD"
  })
}

fn relative_shape()
-> anyhow::Result<&'static Regex> {
  static RELATIVE_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  RELATIVE_RE
    .get_or_init(|| {
      Regex::new(
        r"^(?P<sign>[+-])(?P<num>\d+)(?P<unit>[dwm])$"
      )
      .ok()
    })
    .as_ref()
    .ok_or_else(|| {
      anyhow!(
        "internal relative regex \
         compile failure"
      )
    })
}

fn parse_relative(
  token: &str,
  today: NaiveDate
) -> anyhow::Result<Option<NaiveDate>> {
  let Some(caps) =
    relative_shape()?.captures(token)
  else {
    return Ok(None);
  };

  let sign = caps
    .name("sign")
    .map(|m| m.as_str())
    .ok_or_else(|| {
      anyhow!("missing relative sign")
    })?;
  let num: i64 = caps
    .name("num")
    .map(|m| m.as_str())
    .ok_or_else(|| {
      anyhow!("missing relative amount")
    })?
    .parse()
    .context("invalid relative number")?;
  let unit = caps
    .name("unit")
    .map(|m| m.as_str())
    .ok_or_else(|| {
      anyhow!("missing relative unit")
    })?;

  let num =
    if sign == "-" { -num } else { num };

  let date = match unit {
    | "d" => add_days(today, num),
    | "w" => {
      add_days(today, num.saturating_mul(7))
    }
    | "m" => {
      checked_shift_months(today, num)
        .ok_or_else(|| {
          anyhow!(
            "relative month offset out \
             of range: {token}"
          )
        })?
    }
    | _ => {
      return Err(anyhow!(
        "unknown relative unit: {unit}"
      ));
    }
  };

  Ok(Some(date))
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token.trim() {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

pub fn parse_week_start(
  raw: &str
) -> Option<Weekday> {
  parse_weekday_name(
    &raw.trim().to_ascii_lowercase()
  )
}

fn next_weekday_date(
  from: NaiveDate,
  target: Weekday
) -> NaiveDate {
  let from_idx = from
    .weekday()
    .num_days_from_monday()
    as i64;
  let target_idx = target
    .num_days_from_monday()
    as i64;
  let mut delta =
    (7 + target_idx - from_idx) % 7;
  if delta == 0 {
    delta = 7;
  }
  add_days(from, delta)
}

fn parse_month_name(
  token: &str
) -> Option<u32> {
  match token.trim() {
    | "january" | "jan" => Some(1),
    | "february" | "feb" => Some(2),
    | "march" | "mar" => Some(3),
    | "april" | "apr" => Some(4),
    | "may" => Some(5),
    | "june" | "jun" => Some(6),
    | "july" | "jul" => Some(7),
    | "august" | "aug" => Some(8),
    | "september" | "sep" | "sept" => {
      Some(9)
    }
    | "october" | "oct" => Some(10),
    | "november" | "nov" => Some(11),
    | "december" | "dec" => Some(12),
    | _ => None
  }
}
