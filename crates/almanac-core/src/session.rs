//! Edit dialog lifecycle.
//!
//! `Closed -> Open -> [Open with
//! errors]* -> committed -> Closed`,
//! or `Open -> Closed` through cancel
//! or delete. The session value is
//! owned by the embedder and replaced
//! on every transition.

use chrono::{
  NaiveDate,
  NaiveDateTime
};

use crate::event::{
  Event,
  EventChange,
  EventId,
  EventPatch
};
use crate::form::{
  EventFields,
  FormField,
  ValidationErrors,
  fields_for_new_event,
  from_fields,
  to_fields,
  validate
};

#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
  New,
  Existing(Event)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
  #[default]
  Closed,
  Open {
    target: EditTarget,
    fields: EventFields,
    errors: ValidationErrors
  }
}

/// What a submit produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Validation failed; the session
  /// stays open with errors attached.
  Rejected(EditSession),
  /// The session closed. `None` when an
  /// edit changed nothing.
  Committed(Option<EventChange>)
}

impl EditSession {
  pub fn open_new(
    now: NaiveDateTime,
    clicked_date: Option<NaiveDate>
  ) -> Self {
    tracing::debug!(
      ?clicked_date,
      "opening new event form"
    );
    Self::Open {
      target: EditTarget::New,
      fields: fields_for_new_event(
        now,
        clicked_date
      ),
      errors: ValidationErrors::default()
    }
  }

  pub fn open_existing(
    event: &Event
  ) -> Self {
    tracing::debug!(
      id = %event.id,
      "opening event for edit"
    );
    Self::Open {
      target: EditTarget::Existing(
        event.clone()
      ),
      fields: to_fields(event),
      errors: ValidationErrors::default()
    }
  }

  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open { .. })
  }

  pub fn fields(
    &self
  ) -> Option<&EventFields> {
    match self {
      | Self::Open { fields, .. } => {
        Some(fields)
      }
      | Self::Closed => None
    }
  }

  pub fn errors(
    &self
  ) -> Option<&ValidationErrors> {
    match self {
      | Self::Open { errors, .. } => {
        Some(errors)
      }
      | Self::Closed => None
    }
  }

  pub fn editing_id(
    &self
  ) -> Option<EventId> {
    match self {
      | Self::Open {
        target: EditTarget::Existing(event),
        ..
      } => Some(event.id),
      | _ => None
    }
  }

  /// Updates one field. Previously
  /// shown errors stay until the next
  /// submit. No-op when closed.
  #[must_use]
  pub fn set_field(
    self,
    field: FormField,
    value: impl Into<String>
  ) -> Self {
    match self {
      | Self::Open {
        target,
        mut fields,
        errors
      } => {
        fields.set(field, value);
        Self::Open {
          target,
          fields,
          errors
        }
      }
      | Self::Closed => Self::Closed
    }
  }

  pub fn submit(self) -> SubmitOutcome {
    let Self::Open {
      target,
      fields,
      ..
    } = self
    else {
      return SubmitOutcome::Committed(
        None
      );
    };

    let errors = validate(&fields);
    if !errors.is_empty() {
      tracing::info!(
        errors = errors.len(),
        "event form rejected"
      );
      return SubmitOutcome::Rejected(
        Self::Open {
          target,
          fields,
          errors
        }
      );
    }

    let existing_id = match &target {
      | EditTarget::New => None,
      | EditTarget::Existing(event) => {
        Some(event.id)
      }
    };

    let event =
      match from_fields(&fields, existing_id)
      {
        | Ok(event) => event,
        | Err(err) => {
          // Unreachable while validate()
          // and from_fields() agree.
          tracing::error!(
            error = %format!("{err:#}"),
            "validated fields failed to map"
          );
          return SubmitOutcome::Rejected(
            Self::Open {
              target,
              fields,
              errors
            }
          );
        }
      };

    let change = match target {
      | EditTarget::New => {
        Some(EventChange::Add { event })
      }
      | EditTarget::Existing(current) => {
        let patch = EventPatch::between(
          &current, &event
        );
        (!patch.is_empty()).then_some(
          EventChange::Update {
            id: current.id,
            patch
          }
        )
      }
    };

    tracing::info!(
      change = ?change.as_ref().map(EventChange::target),
      "event form committed"
    );
    SubmitOutcome::Committed(change)
  }

  /// Closes without proposing anything.
  #[must_use]
  pub fn cancel(self) -> Self {
    Self::Closed
  }

  /// Closes and proposes removal when
  /// an existing event was being edited.
  pub fn delete(
    self
  ) -> (Self, Option<EventChange>) {
    let change = self
      .editing_id()
      .map(|id| EventChange::Remove { id });
    (Self::Closed, change)
  }
}
