use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono::Weekday;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::datetime::parse_week_start;
use crate::layout::MIN_VISUAL_HEIGHT_PERCENT;
use crate::navigation::ViewMode;

const CONFIG_ENV_VAR: &str =
  "ALMANAC_CONFIG";
const CONFIG_DIR_NAME: &str = "almanac";
const CONFIG_FILE_NAME: &str =
  "calendar.toml";

fn default_week_start() -> String {
  "sunday".to_string()
}

fn default_view() -> String {
  "month".to_string()
}

fn default_min_event_height() -> f64 {
  MIN_VISUAL_HEIGHT_PERCENT
}

fn default_true() -> bool {
  true
}

fn default_version() -> u32 {
  1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarConfig {
  #[serde(default = "default_version")]
  pub version:     u32,
  #[serde(default)]
  pub policies:    CalendarPolicies,
  #[serde(default)]
  pub layout:      CalendarLayout,
  #[serde(default)]
  pub display:     CalendarDisplay,
  #[serde(default)]
  pub events_file: Option<PathBuf>,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarPolicies {
  #[serde(default = "default_week_start")]
  pub week_start:   String,
  #[serde(default = "default_view")]
  pub default_view: String
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarLayout {
  #[serde(
    default = "default_min_event_height"
  )]
  pub min_event_height_percent: f64
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarDisplay {
  #[serde(default = "default_true")]
  pub color: bool
}

impl Default for CalendarDisplay {
  fn default() -> Self {
    Self { color: true }
  }
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      version:     default_version(),
      policies:    CalendarPolicies::default(),
      layout:      CalendarLayout::default(),
      display:     CalendarDisplay::default(),
      events_file: None,
      loaded_from: None
    }
  }
}

impl Default for CalendarPolicies {
  fn default() -> Self {
    Self {
      week_start:   default_week_start(),
      default_view: default_view()
    }
  }
}

impl Default for CalendarLayout {
  fn default() -> Self {
    Self {
      min_event_height_percent:
        default_min_event_height()
    }
  }
}

impl CalendarConfig {
  /// Loads from `path_override`, then
  /// `$ALMANAC_CONFIG`, then the user
  /// config dir. A missing file yields
  /// defaults; an unreadable or invalid
  /// one is an error.
  #[tracing::instrument(skip(path_override))]
  pub fn load(
    path_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(path_override)
    else {
      warn!(
        "no config location available; \
         using defaults"
      );
      return Ok(Self::default());
    };

    if !path.exists() {
      if path_override.is_some() {
        return Err(anyhow::anyhow!(
          "config file not found: {}",
          path.display()
        ));
      }
      info!(
        file = %path.display(),
        "config file not found; using defaults"
      );
      return Ok(Self::default());
    }

    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut config = Self::from_toml(&raw)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })?;

    if let Some(events_file) =
      config.events_file.take()
    {
      config.events_file = Some(
        resolve_relative(&path, &events_file)
      );
    }
    config.loaded_from = Some(path.clone());

    info!(
      file = %path.display(),
      version = config.version,
      week_start = %config.policies.week_start,
      default_view = %config.policies.default_view,
      "loaded calendar config"
    );
    Ok(config)
  }

  pub fn from_toml(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(raw)
        .context("invalid calendar config")?;
    config.sanitize();
    Ok(config)
  }

  fn sanitize(&mut self) {
    if parse_week_start(
      &self.policies.week_start
    )
    .is_none()
    {
      warn!(
        week_start = %self.policies.week_start,
        "unknown week start; using default"
      );
      self.policies.week_start =
        default_week_start();
    }

    if ViewMode::from_key(
      &self.policies.default_view
    )
    .is_none()
    {
      warn!(
        default_view = %self.policies.default_view,
        "unknown default view; using month"
      );
      self.policies.default_view =
        default_view();
    }

    let height =
      self.layout.min_event_height_percent;
    if !height.is_finite()
      || height < 0.0
      || height > 100.0
    {
      warn!(
        height,
        "min event height out of range; \
         using default"
      );
      self.layout.min_event_height_percent =
        default_min_event_height();
    }
  }

  pub fn week_start(&self) -> Weekday {
    parse_week_start(
      &self.policies.week_start
    )
    .unwrap_or(Weekday::Sun)
  }

  pub fn default_view(&self) -> ViewMode {
    ViewMode::from_key(
      &self.policies.default_view
    )
    .unwrap_or_default()
  }
}

fn resolve_config_path(
  path_override: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = path_override {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      debug!(
        path = trimmed,
        "config path from environment"
      );
      return Some(PathBuf::from(trimmed));
    }
  }

  dirs::config_dir().map(|dir| {
    dir
      .join(CONFIG_DIR_NAME)
      .join(CONFIG_FILE_NAME)
  })
}

fn resolve_relative(
  config_path: &Path,
  target: &Path
) -> PathBuf {
  let expanded = expand_tilde(target);
  if expanded.is_absolute() {
    return expanded;
  }
  config_path
    .parent()
    .map(|dir| dir.join(&expanded))
    .unwrap_or(expanded)
}

fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
