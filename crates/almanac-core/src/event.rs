use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

use crate::palette::{
  Category,
  EventColor
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
  /// Mints a fresh identity.
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for EventId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for EventId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl FromStr for EventId {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let uuid = Uuid::parse_str(s.trim())
      .with_context(|| {
        format!("invalid event id: {s}")
      })?;
    Ok(Self(uuid))
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Event {
  pub id:          EventId,
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  pub start:       NaiveDateTime,
  pub end:         NaiveDateTime,
  #[serde(default)]
  pub color:       EventColor,
  #[serde(default)]
  pub category:    Option<Category>
}

impl Event {
  pub fn duration_minutes(&self) -> i64 {
    (self.end - self.start).num_minutes()
  }

  /// Events already in a list may
  /// violate the end-after-start rule;
  /// they are still displayed.
  pub fn is_well_formed(&self) -> bool {
    self.end > self.start
  }
}

/// Replacement values for an existing
/// event. `None` leaves a field as is.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct EventPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub title: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub description:
    Option<Option<String>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub start: Option<NaiveDateTime>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub end: Option<NaiveDateTime>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub color: Option<EventColor>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub category:
    Option<Option<Category>>
}

impl EventPatch {
  /// The fields of `updated` that
  /// differ from `current`.
  pub fn between(
    current: &Event,
    updated: &Event
  ) -> Self {
    Self {
      title:       (current.title
        != updated.title)
        .then(|| updated.title.clone()),
      description: (current.description
        != updated.description)
        .then(|| {
          updated.description.clone()
        }),
      start:       (current.start
        != updated.start)
        .then_some(updated.start),
      end:         (current.end
        != updated.end)
        .then_some(updated.end),
      color:       (current.color
        != updated.color)
        .then_some(updated.color),
      category:    (current.category
        != updated.category)
        .then_some(updated.category)
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  pub fn apply(
    &self,
    event: &Event
  ) -> Event {
    let mut next = event.clone();
    if let Some(title) = &self.title {
      next.title = title.clone();
    }
    if let Some(description) =
      &self.description
    {
      next.description =
        description.clone();
    }
    if let Some(start) = self.start {
      next.start = start;
    }
    if let Some(end) = self.end {
      next.end = end;
    }
    if let Some(color) = self.color {
      next.color = color;
    }
    if let Some(category) = self.category
    {
      next.category = category;
    }
    next
  }
}

/// A proposed mutation of the
/// embedder's event list.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(
  tag = "op",
  rename_all = "lowercase"
)]
pub enum EventChange {
  Add {
    event: Event
  },
  Update {
    id:    EventId,
    patch: EventPatch
  },
  Remove {
    id: EventId
  }
}

impl EventChange {
  pub fn target(&self) -> EventId {
    match self {
      | Self::Add { event } => event.id,
      | Self::Update { id, .. }
      | Self::Remove { id } => *id
    }
  }

  /// Returns a new list with the change
  /// applied. Updates and removals of
  /// unknown ids leave the list as is.
  pub fn apply_to(
    &self,
    events: &[Event]
  ) -> Vec<Event> {
    match self {
      | Self::Add { event } => {
        let mut next = events.to_vec();
        next.push(event.clone());
        next
      }
      | Self::Update { id, patch } => {
        events
          .iter()
          .map(|event| {
            if event.id == *id {
              patch.apply(event)
            } else {
              event.clone()
            }
          })
          .collect()
      }
      | Self::Remove { id } => {
        events
          .iter()
          .filter(|event| event.id != *id)
          .cloned()
          .collect()
      }
    }
  }
}
