//! Date sequences for the month and
//! week views.
//!
//! Every function here is a pure
//! function of its arguments; none of
//! them read the clock.

use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};

pub const MONTH_GRID_CELLS: usize = 42;
pub const WEEK_DAYS: usize = 7;
pub const HOURS_PER_DAY: usize = 24;

/// The 42 consecutive dates of a month
/// view, starting on the week-start day
/// on or before the first of the month.
pub fn month_grid(
  reference: NaiveDate,
  week_start: Weekday
) -> [NaiveDate; MONTH_GRID_CELLS] {
  let first = first_day_of_month(
    reference.year(),
    reference.month()
  );
  let grid_start =
    start_of_week(first, week_start);
  std::array::from_fn(|offset| {
    add_days(grid_start, offset as i64)
  })
}

/// The month grid split into its six
/// rows.
pub fn month_weeks(
  reference: NaiveDate,
  week_start: Weekday
) -> Vec<[NaiveDate; WEEK_DAYS]> {
  month_grid(reference, week_start)
    .chunks(WEEK_DAYS)
    .map(|row| {
      std::array::from_fn(|idx| row[idx])
    })
    .collect()
}

/// The calendar week containing
/// `reference`.
pub fn week_days(
  reference: NaiveDate,
  week_start: Weekday
) -> [NaiveDate; WEEK_DAYS] {
  let start =
    start_of_week(reference, week_start);
  std::array::from_fn(|offset| {
    add_days(start, offset as i64)
  })
}

pub fn hour_axis() -> [u32; HOURS_PER_DAY]
{
  std::array::from_fn(|hour| hour as u32)
}

pub fn weekday_labels(
  week_start: Weekday
) -> [&'static str; WEEK_DAYS] {
  let mut day = week_start;
  std::array::from_fn(|_| {
    let label = weekday_short_label(day);
    day = day.succ();
    label
  })
}

fn weekday_short_label(
  day: Weekday
) -> &'static str {
  match day {
    | Weekday::Mon => "Mon",
    | Weekday::Tue => "Tue",
    | Weekday::Wed => "Wed",
    | Weekday::Thu => "Thu",
    | Weekday::Fri => "Fri",
    | Weekday::Sat => "Sat",
    | Weekday::Sun => "Sun"
  }
}

pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

/// Saturates at the ends of chrono's
/// representable range.
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  Duration::try_days(days)
    .and_then(|delta| {
      date.checked_add_signed(delta)
    })
    .unwrap_or(date)
}

/// Moves by whole months, clamping the
/// day to the target month's length
/// (Jan 31 + 1 month is Feb 29 in a
/// leap year). Stays on `date` when the
/// result is out of chrono's range.
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  checked_shift_months(
    date,
    i64::from(months)
  )
  .unwrap_or(date)
}

/// Like [`shift_months`], but `None`
/// when the target month is outside
/// chrono's range.
pub fn checked_shift_months(
  date: NaiveDate,
  months: i64
) -> Option<NaiveDate> {
  let index = i64::from(date.year())
    .checked_mul(12)?
    .checked_add(i64::from(date.month0()))?
    .checked_add(months)?;
  let year =
    i32::try_from(index.div_euclid(12))
      .ok()?;
  let month =
    u32::try_from(index.rem_euclid(12))
      .ok()?
      + 1;

  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  fn assert_consecutive(days: &[NaiveDate]) {
    for pair in days.windows(2) {
      assert_eq!(
        pair[1],
        add_days(pair[0], 1),
        "grid must advance one day per step"
      );
    }
  }

  #[test]
  fn february_2024_grid_spans_six_weeks()
  {
    let grid = month_grid(
      ymd(2024, 2, 1),
      Weekday::Sun
    );
    assert_eq!(grid.len(), 42);
    assert_eq!(grid[0], ymd(2024, 1, 28));
    assert_eq!(grid[41], ymd(2024, 3, 9));
    assert_consecutive(&grid);
  }

  #[test]
  fn month_starting_on_week_start_has_no_leading_days()
  {
    // September 2024 begins on a Sunday.
    let grid = month_grid(
      ymd(2024, 9, 17),
      Weekday::Sun
    );
    assert_eq!(grid[0], ymd(2024, 9, 1));
    assert_eq!(grid[41], ymd(2024, 10, 12));
  }

  #[test]
  fn long_month_needing_sixth_week_is_covered()
  {
    // March 2024: 31 days, starts on a
    // Friday, so the 31st sits in row six.
    let grid = month_grid(
      ymd(2024, 3, 5),
      Weekday::Sun
    );
    assert_eq!(grid[0], ymd(2024, 2, 25));
    let last_of_month = grid
      .iter()
      .position(|day| {
        *day == ymd(2024, 3, 31)
      })
      .expect("month end in grid");
    assert!(last_of_month >= 35);
  }

  #[test]
  fn grid_contains_whole_month_for_every_month()
  {
    for week_start in
      [Weekday::Sun, Weekday::Mon]
    {
      for year in [2023, 2024, 2025] {
        for month in 1..=12 {
          let reference =
            ymd(year, month, 15);
          let grid =
            month_grid(reference, week_start);
          assert_consecutive(&grid);
          assert_eq!(
            grid[0].weekday(),
            week_start
          );
          let first = grid
            .iter()
            .position(|day| {
              *day == ymd(year, month, 1)
            })
            .expect("first of month");
          let len =
            days_in_month(year, month)
              as usize;
          assert!(first + len <= 42);
          assert_eq!(
            grid[first + len - 1],
            last_day_of_month(year, month)
          );
        }
      }
    }
  }

  #[test]
  fn grid_is_independent_of_day_within_month()
  {
    assert_eq!(
      month_grid(
        ymd(2024, 2, 1),
        Weekday::Sun
      ),
      month_grid(
        ymd(2024, 2, 29),
        Weekday::Sun
      )
    );
  }

  #[test]
  fn week_contains_reference() {
    let reference = ymd(2024, 2, 14);
    let sunday_week =
      week_days(reference, Weekday::Sun);
    assert_eq!(
      sunday_week[0],
      ymd(2024, 2, 11)
    );
    assert_eq!(
      sunday_week[6],
      ymd(2024, 2, 17)
    );
    assert!(sunday_week.contains(&reference));
    assert_consecutive(&sunday_week);

    let monday_week =
      week_days(reference, Weekday::Mon);
    assert_eq!(
      monday_week[0],
      ymd(2024, 2, 12)
    );
  }

  #[test]
  fn week_of_week_start_day_begins_on_it()
  {
    let sunday = ymd(2024, 3, 10);
    assert_eq!(
      week_days(sunday, Weekday::Sun)[0],
      sunday
    );
  }

  #[test]
  fn hour_axis_covers_the_day() {
    let axis = hour_axis();
    assert_eq!(axis.len(), 24);
    assert_eq!(axis[0], 0);
    assert_eq!(axis[23], 23);
  }

  #[test]
  fn month_weeks_are_six_rows() {
    let rows = month_weeks(
      ymd(2024, 2, 1),
      Weekday::Sun
    );
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[5][6], ymd(2024, 3, 9));
  }

  #[test]
  fn labels_follow_week_start() {
    assert_eq!(
      weekday_labels(Weekday::Sun)[0],
      "Sun"
    );
    assert_eq!(
      weekday_labels(Weekday::Mon)[6],
      "Sun"
    );
  }

  #[test]
  fn shift_months_clamps_day() {
    assert_eq!(
      shift_months(ymd(2024, 1, 31), 1),
      ymd(2024, 2, 29)
    );
    assert_eq!(
      shift_months(ymd(2024, 1, 15), -1),
      ymd(2023, 12, 15)
    );
    assert_eq!(
      shift_months(ymd(2024, 11, 30), 14),
      ymd(2026, 1, 30)
    );
    assert_eq!(
      shift_months(ymd(2024, 3, 10), -27),
      ymd(2021, 12, 10)
    );
  }

  #[test]
  fn month_shift_out_of_range_is_none() {
    let date = ymd(2024, 3, 10);
    assert_eq!(
      checked_shift_months(date, i64::MAX),
      None
    );
    assert_eq!(
      checked_shift_months(
        date,
        i64::from(i32::MIN)
      ),
      None
    );
    assert_eq!(
      shift_months(date, i32::MAX),
      date
    );
  }
}
