//! String-typed projection of an
//! [`Event`] for edit forms, and the
//! validation that gates a commit.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Duration,
  NaiveDate,
  NaiveDateTime
};
use serde::{
  Deserialize,
  Serialize
};

use crate::datetime::{
  combine,
  format_date,
  format_time,
  parse_date,
  parse_time,
  truncate_to_hour
};
use crate::event::{
  Event,
  EventId
};
use crate::palette::{
  Category,
  EventColor
};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize =
  500;

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct EventFields {
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub start_date:  String,
  #[serde(default)]
  pub start_time:  String,
  #[serde(default)]
  pub end_date:    String,
  #[serde(default)]
  pub end_time:    String,
  #[serde(default)]
  pub color:       String,
  #[serde(default)]
  pub category:    String
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
  Title,
  Description,
  StartDate,
  StartTime,
  EndDate,
  EndTime,
  Color,
  Category
}

impl FormField {
  pub const ALL: [Self; 8] = [
    Self::Title,
    Self::Description,
    Self::StartDate,
    Self::StartTime,
    Self::EndDate,
    Self::EndTime,
    Self::Color,
    Self::Category
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Title => "title",
      | Self::Description => "description",
      | Self::StartDate => "start_date",
      | Self::StartTime => "start_time",
      | Self::EndDate => "end_date",
      | Self::EndTime => "end_time",
      | Self::Color => "color",
      | Self::Category => "category"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|field| field.as_key() == key)
  }
}

impl fmt::Display for FormField {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl EventFields {
  pub fn get(
    &self,
    field: FormField
  ) -> &str {
    match field {
      | FormField::Title => &self.title,
      | FormField::Description => {
        &self.description
      }
      | FormField::StartDate => {
        &self.start_date
      }
      | FormField::StartTime => {
        &self.start_time
      }
      | FormField::EndDate => {
        &self.end_date
      }
      | FormField::EndTime => {
        &self.end_time
      }
      | FormField::Color => &self.color,
      | FormField::Category => {
        &self.category
      }
    }
  }

  pub fn set(
    &mut self,
    field: FormField,
    value: impl Into<String>
  ) {
    let value = value.into();
    match field {
      | FormField::Title => {
        self.title = value
      }
      | FormField::Description => {
        self.description = value
      }
      | FormField::StartDate => {
        self.start_date = value
      }
      | FormField::StartTime => {
        self.start_time = value
      }
      | FormField::EndDate => {
        self.end_date = value
      }
      | FormField::EndTime => {
        self.end_time = value
      }
      | FormField::Color => {
        self.color = value
      }
      | FormField::Category => {
        self.category = value
      }
    }
  }
}

/// Field-keyed messages. Empty means
/// the fields may be committed.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct ValidationErrors(
  BTreeMap<FormField, String>
);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn get(
    &self,
    field: FormField
  ) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn contains(
    &self,
    field: FormField
  ) -> bool {
    self.0.contains_key(&field)
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (FormField, &str)>
  {
    self
      .0
      .iter()
      .map(|(field, message)| {
        (*field, message.as_str())
      })
  }

  fn insert(
    &mut self,
    field: FormField,
    message: impl Into<String>
  ) {
    self.0.insert(field, message.into());
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

pub fn to_fields(
  event: &Event
) -> EventFields {
  EventFields {
    title:       event.title.clone(),
    description: event
      .description
      .clone()
      .unwrap_or_default(),
    start_date:  format_date(
      event.start.date()
    ),
    start_time:  format_time(
      event.start.time()
    ),
    end_date:    format_date(
      event.end.date()
    ),
    end_time:    format_time(
      event.end.time()
    ),
    color:       event
      .color
      .as_key()
      .to_string(),
    category:    event
      .category
      .map(|category| {
        category.as_key().to_string()
      })
      .unwrap_or_default()
  }
}

/// Defaults for a fresh event: start at
/// the next top of the hour after
/// `now`, lasting one hour. A clicked
/// date replaces the start's date.
pub fn fields_for_new_event(
  now: NaiveDateTime,
  clicked_date: Option<NaiveDate>
) -> EventFields {
  let default_start =
    truncate_to_hour(now)
      + Duration::hours(1);
  let start = match clicked_date {
    | Some(date) => {
      date.and_time(default_start.time())
    }
    | None => default_start
  };
  let end = start + Duration::hours(1);

  EventFields {
    title:       String::new(),
    description: String::new(),
    start_date:  format_date(start.date()),
    start_time:  format_time(start.time()),
    end_date:    format_date(end.date()),
    end_time:    format_time(end.time()),
    color:       EventColor::default()
      .as_key()
      .to_string(),
    category:    String::new()
  }
}

/// Builds an event from fields that
/// passed [`validate`]. Reuses
/// `existing_id` when editing, mints a
/// new id otherwise.
#[tracing::instrument(skip(fields), fields(existing = ?existing_id))]
pub fn from_fields(
  fields: &EventFields,
  existing_id: Option<EventId>
) -> anyhow::Result<Event> {
  let start = combine(
    &fields.start_date,
    &fields.start_time
  )
  .context("invalid start")?;
  let end = combine(
    &fields.end_date,
    &fields.end_time
  )
  .context("invalid end")?;

  let color = parse_color(&fields.color)?;
  let category =
    parse_category(&fields.category)?;

  let description =
    fields.description.trim();
  let event = Event {
    id: existing_id
      .unwrap_or_else(EventId::new),
    title: fields.title.trim().to_string(),
    description: (!description.is_empty())
      .then(|| description.to_string()),
    start,
    end,
    color,
    category
  };

  tracing::debug!(
    id = %event.id,
    minted = existing_id.is_none(),
    "mapped fields to event"
  );
  Ok(event)
}

fn parse_color(
  raw: &str
) -> anyhow::Result<EventColor> {
  if raw.trim().is_empty() {
    return Ok(EventColor::default());
  }
  EventColor::from_key(raw).ok_or_else(
    || anyhow!("unknown color: {raw}")
  )
}

fn parse_category(
  raw: &str
) -> anyhow::Result<Option<Category>> {
  if raw.trim().is_empty() {
    return Ok(None);
  }
  Category::from_key(raw)
    .map(Some)
    .ok_or_else(|| {
      anyhow!("unknown category: {raw}")
    })
}

/// Runs every check and reports all
/// failures at once.
pub fn validate(
  fields: &EventFields
) -> ValidationErrors {
  let mut errors =
    ValidationErrors::default();

  let title = fields.title.trim();
  if title.is_empty() {
    errors.insert(
      FormField::Title,
      "Title is required"
    );
  } else if title.chars().count()
    > TITLE_MAX_CHARS
  {
    errors.insert(
      FormField::Title,
      format!(
        "Title must be \
         {TITLE_MAX_CHARS} characters \
         or fewer"
      )
    );
  }

  if fields.description.trim().chars().count()
    > DESCRIPTION_MAX_CHARS
  {
    errors.insert(
      FormField::Description,
      format!(
        "Description must be \
         {DESCRIPTION_MAX_CHARS} \
         characters or fewer"
      )
    );
  }

  let start_date = check_date(
    &mut errors,
    FormField::StartDate,
    &fields.start_date,
    "Start date"
  );
  let start_time = check_time(
    &mut errors,
    FormField::StartTime,
    &fields.start_time,
    "Start time"
  );
  let end_date = check_date(
    &mut errors,
    FormField::EndDate,
    &fields.end_date,
    "End date"
  );
  let end_time = check_time(
    &mut errors,
    FormField::EndTime,
    &fields.end_time,
    "End time"
  );

  if let (
    Some(start_date),
    Some(start_time),
    Some(end_date),
    Some(end_time)
  ) =
    (start_date, start_time, end_date, end_time)
  {
    let start =
      start_date.and_time(start_time);
    let end = end_date.and_time(end_time);
    if end <= start {
      errors.insert(
        FormField::EndDate,
        "End must be after start"
      );
    }
  }

  if parse_color(&fields.color).is_err() {
    errors.insert(
      FormField::Color,
      "Choose a color from the palette"
    );
  }
  if parse_category(&fields.category)
    .is_err()
  {
    errors.insert(
      FormField::Category,
      "Choose a listed category"
    );
  }

  if !errors.is_empty() {
    tracing::debug!(
      errors = %errors,
      "event fields failed validation"
    );
  }
  errors
}

fn check_date(
  errors: &mut ValidationErrors,
  field: FormField,
  raw: &str,
  label: &str
) -> Option<NaiveDate> {
  if raw.trim().is_empty() {
    errors.insert(
      field,
      format!("{label} is required")
    );
    return None;
  }
  match parse_date(raw) {
    | Ok(date) => Some(date),
    | Err(_) => {
      errors.insert(
        field,
        format!(
          "{label} must be YYYY-MM-DD"
        )
      );
      None
    }
  }
}

fn check_time(
  errors: &mut ValidationErrors,
  field: FormField,
  raw: &str,
  label: &str
) -> Option<chrono::NaiveTime> {
  if raw.trim().is_empty() {
    errors.insert(
      field,
      format!("{label} is required")
    );
    return None;
  }
  match parse_time(raw) {
    | Ok(time) => Some(time),
    | Err(_) => {
      errors.insert(
        field,
        format!("{label} must be HH:MM")
      );
      None
    }
  }
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

  fn at(
    date: NaiveDate,
    hour: u32,
    minute: u32
  ) -> NaiveDateTime {
    date
      .and_hms_opt(hour, minute, 0)
      .expect("valid time")
  }

  fn valid_fields() -> EventFields {
    EventFields {
      title:       "Planning".to_string(),
      description: String::new(),
      start_date:  "2024-03-10".to_string(),
      start_time:  "09:00".to_string(),
      end_date:    "2024-03-10".to_string(),
      end_time:    "10:00".to_string(),
      color:       "blue".to_string(),
      category:    String::new()
    }
  }

  #[test]
  fn fields_split_date_and_time() {
    let day = ymd(2024, 3, 10);
    let event = Event {
      id:          EventId::new(),
      title:       "Dentist".to_string(),
      description: Some("bring card".to_string()),
      start:       at(day, 9, 5),
      end:         at(day, 10, 30),
      color:       EventColor::Green,
      category:    Some(Category::Personal)
    };
    let fields = to_fields(&event);
    assert_eq!(fields.start_date, "2024-03-10");
    assert_eq!(fields.start_time, "09:05");
    assert_eq!(fields.end_time, "10:30");
    assert_eq!(fields.color, "green");
    assert_eq!(fields.category, "personal");
    assert_eq!(fields.description, "bring card");
  }

  #[test]
  fn round_trip_preserves_event() {
    let day = ymd(2024, 12, 31);
    let events = [
      Event {
        id:          EventId::new(),
        title:       "New year".to_string(),
        description: None,
        start:       at(day, 22, 0),
        end:         at(ymd(2025, 1, 1), 1, 30),
        color:       EventColor::Orange,
        category:    Some(Category::Holiday)
      },
      Event {
        id:          EventId::new(),
        title:       "Notes".to_string(),
        description: Some("agenda".to_string()),
        start:       at(day, 8, 0),
        end:         at(day, 8, 45),
        color:       EventColor::Blue,
        category:    None
      }
    ];
    for event in events {
      let rebuilt = from_fields(
        &to_fields(&event),
        Some(event.id)
      )
      .expect("rebuild event");
      assert_eq!(rebuilt, event);
    }
  }

  #[test]
  fn new_event_defaults_to_next_hour() {
    let now = at(ymd(2024, 3, 10), 14, 37);
    let fields =
      fields_for_new_event(now, None);
    assert_eq!(fields.start_date, "2024-03-10");
    assert_eq!(fields.start_time, "15:00");
    assert_eq!(fields.end_time, "16:00");
    assert_eq!(fields.title, "");
    assert_eq!(fields.color, "blue");
    assert_eq!(fields.category, "");
  }

  #[test]
  fn new_event_late_evening_rolls_over() {
    let now = at(ymd(2024, 3, 10), 23, 10);
    let fields =
      fields_for_new_event(now, None);
    assert_eq!(fields.start_date, "2024-03-11");
    assert_eq!(fields.start_time, "00:00");
    assert_eq!(fields.end_date, "2024-03-11");
    assert_eq!(fields.end_time, "01:00");
  }

  #[test]
  fn clicked_date_pins_start_date() {
    let now = at(ymd(2024, 3, 10), 14, 37);
    let fields = fields_for_new_event(
      now,
      Some(ymd(2024, 4, 2))
    );
    assert_eq!(fields.start_date, "2024-04-02");
    assert_eq!(fields.start_time, "15:00");
    assert_eq!(fields.end_date, "2024-04-02");
    assert_eq!(fields.end_time, "16:00");

    let late = fields_for_new_event(
      at(ymd(2024, 3, 10), 22, 30),
      Some(ymd(2024, 4, 2))
    );
    assert_eq!(late.start_time, "23:00");
    assert_eq!(late.end_date, "2024-04-03");
    assert!(validate(&EventFields {
      title: "x".to_string(),
      ..late
    })
    .is_empty());
  }

  #[test]
  fn from_fields_trims_and_mints() {
    let mut fields = valid_fields();
    fields.title = "  Planning  ".to_string();
    fields.description = "   ".to_string();
    let first =
      from_fields(&fields, None).expect("event");
    let second =
      from_fields(&fields, None).expect("event");
    assert_eq!(first.title, "Planning");
    assert_eq!(first.description, None);
    assert_ne!(first.id, second.id);

    let id = EventId::new();
    let kept = from_fields(&fields, Some(id))
      .expect("event");
    assert_eq!(kept.id, id);
  }

  #[test]
  fn valid_fields_have_no_errors() {
    assert!(validate(&valid_fields()).is_empty());
  }

  #[test]
  fn empty_title_always_reported() {
    let mut fields = EventFields::default();
    fields.title = "   ".to_string();
    let errors = validate(&fields);
    assert!(errors.contains(FormField::Title));
    assert!(errors.contains(FormField::StartDate));
    assert!(errors.contains(FormField::StartTime));
    assert!(errors.contains(FormField::EndDate));
    assert!(errors.contains(FormField::EndTime));

    let mut only_title = valid_fields();
    only_title.title.clear();
    let errors = validate(&only_title);
    assert_eq!(errors.len(), 1);
    assert_eq!(
      errors.get(FormField::Title),
      Some("Title is required")
    );
  }

  #[test]
  fn length_limits_count_characters() {
    let mut fields = valid_fields();
    fields.title = "é".repeat(TITLE_MAX_CHARS);
    assert!(validate(&fields).is_empty());
    fields.title.push('x');
    assert!(
      validate(&fields).contains(FormField::Title)
    );

    let mut fields = valid_fields();
    fields.description =
      "d".repeat(DESCRIPTION_MAX_CHARS + 1);
    assert!(
      validate(&fields)
        .contains(FormField::Description)
    );
  }

  #[test]
  fn end_before_start_flags_end_date() {
    let mut fields = valid_fields();
    fields.end_time = "08:00".to_string();
    let errors = validate(&fields);
    assert_eq!(
      errors.get(FormField::EndDate),
      Some("End must be after start")
    );

    fields.end_time = "09:00".to_string();
    assert!(
      validate(&fields).contains(FormField::EndDate)
    );

    fields.end_date = "2024-03-11".to_string();
    fields.end_time = "08:00".to_string();
    assert!(validate(&fields).is_empty());
  }

  #[test]
  fn ordering_check_skipped_when_fields_missing()
  {
    let mut fields = valid_fields();
    fields.end_time.clear();
    fields.end_date = "2024-03-01".to_string();
    let errors = validate(&fields);
    assert!(errors.contains(FormField::EndTime));
    assert!(!errors.contains(FormField::EndDate));
  }

  #[test]
  fn malformed_values_are_reported() {
    let mut fields = valid_fields();
    fields.start_date = "10/03/2024".to_string();
    fields.start_time = "9am".to_string();
    fields.color = "teal".to_string();
    fields.category = "chores".to_string();
    let errors = validate(&fields);
    assert_eq!(
      errors.get(FormField::StartDate),
      Some("Start date must be YYYY-MM-DD")
    );
    assert!(errors.contains(FormField::StartTime));
    assert!(errors.contains(FormField::Color));
    assert!(errors.contains(FormField::Category));
    assert!(from_fields(&fields, None).is_err());
  }

  #[test]
  fn errors_serialize_keyed_by_field() {
    let mut fields = valid_fields();
    fields.title.clear();
    let json = serde_json::to_value(
      validate(&fields)
    )
    .expect("serialize errors");
    assert_eq!(
      json["title"],
      "Title is required"
    );
  }

  #[test]
  fn field_accessors_cover_every_field() {
    let mut fields = EventFields::default();
    for field in FormField::ALL {
      fields.set(field, field.as_key());
      assert_eq!(fields.get(field), field.as_key());
      assert_eq!(
        FormField::from_key(field.as_key()),
        Some(field)
      );
    }
  }
}
