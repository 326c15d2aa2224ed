use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
  #[default]
  Blue,
  Green,
  Red,
  Yellow,
  Purple,
  Orange
}

impl EventColor {
  pub const ALL: [Self; 6] = [
    Self::Blue,
    Self::Green,
    Self::Red,
    Self::Yellow,
    Self::Purple,
    Self::Orange
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Blue => "blue",
      | Self::Green => "green",
      | Self::Red => "red",
      | Self::Yellow => "yellow",
      | Self::Purple => "purple",
      | Self::Orange => "orange"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Blue => "Blue",
      | Self::Green => "Green",
      | Self::Red => "Red",
      | Self::Yellow => "Yellow",
      | Self::Purple => "Purple",
      | Self::Orange => "Orange"
    }
  }

  pub fn hex(self) -> &'static str {
    match self {
      | Self::Blue => "#3b82f6",
      | Self::Green => "#22c55e",
      | Self::Red => "#ef4444",
      | Self::Yellow => "#eab308",
      | Self::Purple => "#a855f7",
      | Self::Orange => "#f97316"
    }
  }

  /// ANSI foreground code used by the
  /// terminal renderer.
  pub fn ansi(self) -> &'static str {
    match self {
      | Self::Blue => "34",
      | Self::Green => "32",
      | Self::Red => "31",
      | Self::Yellow => "33",
      | Self::Purple => "35",
      | Self::Orange => "91"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    let key = key.trim();
    Self::ALL.into_iter().find(|color| {
      color
        .as_key()
        .eq_ignore_ascii_case(key)
    })
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Work,
  Personal,
  Meeting,
  Reminder,
  Holiday,
  Other
}

impl Category {
  pub const ALL: [Self; 6] = [
    Self::Work,
    Self::Personal,
    Self::Meeting,
    Self::Reminder,
    Self::Holiday,
    Self::Other
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Work => "work",
      | Self::Personal => "personal",
      | Self::Meeting => "meeting",
      | Self::Reminder => "reminder",
      | Self::Holiday => "holiday",
      | Self::Other => "other"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Work => "Work",
      | Self::Personal => "Personal",
      | Self::Meeting => "Meeting",
      | Self::Reminder => "Reminder",
      | Self::Holiday => "Holiday",
      | Self::Other => "Other"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    let key = key.trim();
    Self::ALL.into_iter().find(
      |category| {
        category
          .as_key()
          .eq_ignore_ascii_case(key)
      }
    )
  }
}

/// Ordered `(key, label)` pairs for a
/// colour select.
pub fn color_options()
-> Vec<(&'static str, &'static str)> {
  EventColor::ALL
    .into_iter()
    .map(|color| {
      (color.as_key(), color.label())
    })
    .collect()
}

/// Ordered `(key, label)` pairs for a
/// category select. The leading empty
/// key stands for "no category".
pub fn category_options()
-> Vec<(&'static str, &'static str)> {
  std::iter::once(("", "No category"))
    .chain(Category::ALL.into_iter().map(
      |category| {
        (
          category.as_key(),
          category.label()
        )
      }
    ))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_palette_entry_is_default() {
    assert_eq!(
      EventColor::default(),
      EventColor::ALL[0]
    );
    assert_eq!(
      color_options()[0],
      ("blue", "Blue")
    );
  }

  #[test]
  fn keys_resolve_case_insensitively() {
    assert_eq!(
      EventColor::from_key(" Purple "),
      Some(EventColor::Purple)
    );
    assert_eq!(
      Category::from_key("MEETING"),
      Some(Category::Meeting)
    );
    assert_eq!(
      Category::from_key("chores"),
      None
    );
  }

  #[test]
  fn category_options_lead_with_none() {
    let options = category_options();
    assert_eq!(options.len(), 7);
    assert_eq!(options[0].0, "");
    assert_eq!(options[1].0, "work");
  }
}
