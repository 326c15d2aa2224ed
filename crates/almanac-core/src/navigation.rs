use chrono::{
  NaiveDate,
  Weekday
};
use serde::{
  Deserialize,
  Serialize
};

use crate::grid::{
  add_days,
  month_grid,
  shift_months,
  week_days
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  #[default]
  Month,
  Week
}

impl ViewMode {
  pub fn all() -> [Self; 2] {
    [Self::Month, Self::Week]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Month => "month",
      | Self::Week => "week"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Month => "Month",
      | Self::Week => "Week"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key.trim() {
      | "month" => Some(Self::Month),
      | "week" => Some(Self::Week),
      | _ => None
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Month => Self::Week,
      | Self::Week => Self::Month
    }
  }
}

/// Which period the widget shows. Owned
/// by the embedder; every transition
/// returns a new value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct NavigationState {
  pub view:  ViewMode,
  pub focus: NaiveDate
}

impl NavigationState {
  pub fn new(
    view: ViewMode,
    focus: NaiveDate
  ) -> Self {
    Self { view, focus }
  }

  #[must_use]
  pub fn next(self) -> Self {
    self.step(1)
  }

  #[must_use]
  pub fn previous(self) -> Self {
    self.step(-1)
  }

  #[must_use]
  pub fn today(
    self,
    today: NaiveDate
  ) -> Self {
    self.go_to(today)
  }

  #[must_use]
  pub fn go_to(
    self,
    date: NaiveDate
  ) -> Self {
    Self {
      focus: date,
      ..self
    }
  }

  #[must_use]
  pub fn with_view(
    self,
    view: ViewMode
  ) -> Self {
    Self { view, ..self }
  }

  #[must_use]
  pub fn toggle_view(self) -> Self {
    self.with_view(self.view.toggled())
  }

  fn step(self, step: i32) -> Self {
    let focus = match self.view {
      | ViewMode::Month => {
        shift_months(self.focus, step)
      }
      | ViewMode::Week => {
        add_days(
          self.focus,
          i64::from(step) * 7
        )
      }
    };
    tracing::debug!(
      view = self.view.as_key(),
      from = %self.focus,
      to = %focus,
      "navigated"
    );
    Self { focus, ..self }
  }

  /// First and last date of the cells
  /// the current view renders.
  pub fn visible_range(
    &self,
    week_start: Weekday
  ) -> (NaiveDate, NaiveDate) {
    match self.view {
      | ViewMode::Month => {
        let grid =
          month_grid(self.focus, week_start);
        (grid[0], grid[grid.len() - 1])
      }
      | ViewMode::Week => {
        let days =
          week_days(self.focus, week_start);
        (days[0], days[days.len() - 1])
      }
    }
  }

  pub fn title(
    &self,
    week_start: Weekday
  ) -> String {
    match self.view {
      | ViewMode::Month => {
        self
          .focus
          .format("%B %Y")
          .to_string()
      }
      | ViewMode::Week => {
        let (start, end) =
          self.visible_range(week_start);
        format!(
          "{} - {}",
          start.format("%b %d"),
          end.format("%b %d, %Y")
        )
      }
    }
  }
}
