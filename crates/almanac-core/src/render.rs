use std::io::{self, IsTerminal, Write};

use chrono::{Datelike, NaiveDate, Weekday};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::bucket::{DayBucket, bucket_days, events_on_date};
use crate::event::Event;
use crate::form::ValidationErrors;
use crate::grid::{hour_axis, month_weeks, week_days, weekday_labels};
use crate::layout::{day_column, slot_events};
use crate::navigation::{NavigationState, ViewMode};
use crate::palette::{EventColor, category_options};

const MONTH_CELL_WIDTH: usize = 9;
const WEEK_CELL_WIDTH: usize = 14;
const HOUR_LABEL_WIDTH: usize = 6;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    min_height: f64,
}

impl Renderer {
    pub fn new(color: bool, min_height: f64) -> Self {
        Self { color, min_height }
    }

    #[tracing::instrument(skip(self, events))]
    pub fn print_view(
        &mut self,
        state: NavigationState,
        week_start: Weekday,
        today: NaiveDate,
        events: &[Event],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        match state.view {
            ViewMode::Month => self.write_month(&mut out, state, week_start, today, events),
            ViewMode::Week => self.write_week(&mut out, state, week_start, today, events),
        }
    }

    #[tracing::instrument(skip(self, events))]
    pub fn print_day(&mut self, date: NaiveDate, events: &[Event]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_day(&mut out, date, events)
    }

    pub fn print_palette(&mut self) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_palette(&mut out)
    }

    pub fn print_errors(&mut self, errors: &ValidationErrors) -> anyhow::Result<()> {
        let mut err = io::stderr().lock();
        for (field, message) in errors.iter() {
            writeln!(err, "{}: {message}", self.paint(field.as_key(), "31"))?;
        }
        Ok(())
    }

    pub fn write_month<W: Write>(
        &self,
        mut out: W,
        state: NavigationState,
        week_start: Weekday,
        today: NaiveDate,
        events: &[Event],
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", state.title(week_start))?;
        for label in weekday_labels(week_start) {
            write!(out, "{}", pad(label, MONTH_CELL_WIDTH))?;
        }
        writeln!(out)?;

        let mut agenda: Vec<DayBucket<'_>> = Vec::new();
        for row in month_weeks(state.focus, week_start) {
            for bucket in bucket_days(events, &row) {
                let inside = bucket.date.month() == state.focus.month();
                let mut cell = format!("{:>2}", bucket.date.day());
                if !bucket.is_empty() {
                    cell.push_str(&format!(" ({})", bucket.len()));
                }
                let cell = pad(&cell, MONTH_CELL_WIDTH);
                let cell = if bucket.date == today {
                    self.paint(&cell, "7")
                } else if !inside {
                    self.paint(&cell, "2")
                } else {
                    cell
                };
                write!(out, "{cell}")?;
                if inside && !bucket.is_empty() {
                    agenda.push(bucket);
                }
            }
            writeln!(out)?;
        }

        if !agenda.is_empty() {
            writeln!(out)?;
        }
        for bucket in agenda {
            writeln!(out, "{}", bucket.date.format("%a %Y-%m-%d"))?;
            for event in bucket.events {
                writeln!(out, "  {}", self.event_line(event))?;
            }
        }
        Ok(())
    }

    pub fn write_week<W: Write>(
        &self,
        mut out: W,
        state: NavigationState,
        week_start: Weekday,
        today: NaiveDate,
        events: &[Event],
    ) -> anyhow::Result<()> {
        let days = week_days(state.focus, week_start);
        writeln!(out, "{}", state.title(week_start))?;

        write!(out, "{}", " ".repeat(HOUR_LABEL_WIDTH))?;
        for day in days {
            let label = pad(&day.format("%a %d").to_string(), WEEK_CELL_WIDTH);
            if day == today {
                write!(out, "{}", self.paint(&label, "7"))?;
            } else {
                write!(out, "{label}")?;
            }
        }
        writeln!(out)?;

        for hour in hour_axis() {
            write!(out, "{}", pad(&format!("{hour:02}:00"), HOUR_LABEL_WIDTH))?;
            for day in days {
                let starting = slot_events(events, day, hour);
                let cell = match starting.as_slice() {
                    [] => String::new(),
                    [only] => only.title.clone(),
                    [first, rest @ ..] => format!("{} +{}", first.title, rest.len()),
                };
                let fitted = pad(&truncate(&cell, WEEK_CELL_WIDTH - 1), WEEK_CELL_WIDTH);
                match starting.first() {
                    Some(event) => write!(out, "{}", self.paint(&fitted, event.color.ansi()))?,
                    None => write!(out, "{fitted}")?,
                }
            }
            writeln!(out)?;
        }

        writeln!(out)?;
        for day in days {
            for block in day_column(events, day) {
                writeln!(
                    out,
                    "{} {}  top {:>5.1}%  height {:>5.1}%  {}",
                    day.format("%a %d"),
                    block.event.start.format("%H:%M"),
                    block.top,
                    block.visual_height(self.min_height),
                    block.event.title
                )?;
            }
        }
        Ok(())
    }

    pub fn write_day<W: Write>(
        &self,
        mut out: W,
        date: NaiveDate,
        events: &[Event],
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", date.format("%A, %Y-%m-%d"))?;
        let bucket = events_on_date(events, date);
        if bucket.is_empty() {
            writeln!(out, "  no events")?;
        }
        for event in bucket {
            writeln!(out, "  {}", self.event_line(event))?;
            if let Some(description) = &event.description {
                writeln!(out, "      {description}")?;
            }
        }
        Ok(())
    }

    pub fn write_palette<W: Write>(&self, mut out: W) -> anyhow::Result<()> {
        writeln!(out, "Colors")?;
        for color in EventColor::ALL {
            writeln!(
                out,
                "  {} {}{}{}",
                self.paint("●", color.ansi()),
                pad(color.as_key(), 8),
                pad(color.label(), 8),
                color.hex()
            )?;
        }
        writeln!(out, "Categories")?;
        for (key, label) in category_options() {
            let key = if key.is_empty() { "-" } else { key };
            writeln!(out, "  {}{label}", pad(key, 10))?;
        }
        Ok(())
    }

    fn event_line(&self, event: &Event) -> String {
        let span = if event.start.date() == event.end.date() {
            format!(
                "{}-{}",
                event.start.format("%H:%M"),
                event.end.format("%H:%M")
            )
        } else {
            format!(
                "{} -> {}",
                event.start.format("%m-%d %H:%M"),
                event.end.format("%m-%d %H:%M")
            )
        };
        let category = event
            .category
            .map(|category| format!(" [{}]", category.label()))
            .unwrap_or_default();
        let marker = self.paint("●", event.color.ansi());
        format!("{marker} {span}  {}{category}", event.title)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn pad(text: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(visible)))
}

/// Cuts `text` to at most `width` terminal columns.
fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}
