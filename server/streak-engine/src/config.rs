//! Classification configuration: status tiers, milestone table, message text.
//!
//! Loaded once per run from a JSON file and passed explicitly into the
//! classification and message functions. `Default` reproduces the tiers the
//! counter shipped with before the rules were externalised.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StreakError;

/// Placeholder replaced by the day count in `recurring_template`.
pub const DAYS_PLACEHOLDER: &str = "{days}";

/// One status tier: inclusive `[min_days, max_days]`, `max_days = null` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThreshold {
  pub min_days: u32,
  #[serde(default)]
  pub max_days: Option<u32>,
  pub emoji: String,
  #[serde(alias = "status")]
  pub status_label: String,
}

impl StatusThreshold {
  pub fn new(min_days: u32, max_days: Option<u32>, emoji: &str, status_label: &str) -> Self {
    Self {
      min_days,
      max_days,
      emoji: emoji.to_string(),
      status_label: status_label.to_string(),
    }
  }

  pub fn contains(&self, days: u32) -> bool {
    self.min_days <= days && self.max_days.map_or(true, |max| days <= max)
  }
}

/// Non-empty, ordered tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StatusThreshold>", into = "Vec<StatusThreshold>")]
pub struct StatusThresholds(Vec<StatusThreshold>);

impl StatusThresholds {
  pub fn iter(&self) -> std::slice::Iter<'_, StatusThreshold> {
    self.0.iter()
  }

  /// Final tier; the fallback when nothing matches.
  pub fn last(&self) -> &StatusThreshold {
    &self.0[self.0.len() - 1]
  }

  /// Human-readable descriptions of gaps, overlaps, and ordering problems.
  /// An empty result means every `days >= 0` matches exactly one tier.
  pub fn coverage_issues(&self) -> Vec<String> {
    let mut issues = Vec::new();
    let first = &self.0[0];
    if first.min_days != 0 {
      issues.push(format!(
        "first tier '{}' starts at {} days; lower counts are unclassified",
        first.status_label, first.min_days
      ));
    }
    for t in &self.0 {
      if let Some(max) = t.max_days {
        if max < t.min_days {
          issues.push(format!("tier '{}' has max_days {} below min_days {}", t.status_label, max, t.min_days));
        }
      }
    }
    for pair in self.0.windows(2) {
      let (a, b) = (&pair[0], &pair[1]);
      match a.max_days {
        None => issues.push(format!("unbounded tier '{}' is followed by '{}'", a.status_label, b.status_label)),
        Some(max) if b.min_days <= max => {
          issues.push(format!("tiers '{}' and '{}' overlap at {} days", a.status_label, b.status_label, b.min_days))
        }
        Some(max) if b.min_days > max.saturating_add(1) => issues.push(format!(
          "gap between '{}' and '{}': {}..{} days unclassified",
          a.status_label,
          b.status_label,
          max + 1,
          b.min_days - 1
        )),
        Some(_) => {}
      }
    }
    if let Some(max) = self.last().max_days {
      issues.push(format!("last tier '{}' ends at {} days; longer streaks are unclassified", self.last().status_label, max));
    }
    issues
  }
}

impl TryFrom<Vec<StatusThreshold>> for StatusThresholds {
  type Error = String;

  fn try_from(v: Vec<StatusThreshold>) -> Result<Self, Self::Error> {
    if v.is_empty() {
      return Err("status_thresholds must contain at least one tier".to_string());
    }
    Ok(Self(v))
  }
}

impl From<StatusThresholds> for Vec<StatusThreshold> {
  fn from(t: StatusThresholds) -> Self {
    t.0
  }
}

/// Rule for celebrating long streaks that have no exact milestone entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSettings {
  pub recurring_interval: u32,
  pub recurring_template: String,
}

impl Default for MilestoneSettings {
  fn default() -> Self {
    Self {
      recurring_interval: 50,
      recurring_template: "🏆 {days} Days! Amazing streak! 🏆".to_string(),
    }
  }
}

/// Fixed text used by the message builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
  /// Shown in the "Last Incident" field when the log is empty.
  pub no_incident_label: String,
  pub new_record_text: String,
  pub footer_motivation: String,
}

impl Default for MessageSettings {
  fn default() -> Self {
    Self {
      no_incident_label: "None recorded".to_string(),
      new_record_text: "🎊 *NEW RECORD!* 🎊\nThis is now the longest streak in company history!".to_string(),
      footer_motivation: "Every day without an incident is a win! 💪".to_string(),
    }
  }
}

/// Everything the classification and message engines need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
  pub status_thresholds: StatusThresholds,
  #[serde(default)]
  pub milestones: BTreeMap<u32, String>,
  #[serde(default)]
  pub milestone_settings: MilestoneSettings,
  #[serde(default)]
  pub messages: MessageSettings,
}

impl ClassificationConfig {
  /// Read and validate a JSON config file. A missing file is a config error, not an empty config.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, StreakError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => {
        StreakError::config(format!("configuration file not found: {}", path.display()))
      }
      _ => StreakError::io(path, e),
    })?;
    Self::from_json_str(&raw)
  }

  pub fn from_json_str(raw: &str) -> Result<Self, StreakError> {
    let config: Self =
      serde_json::from_str(raw).map_err(|e| StreakError::config(format!("invalid configuration JSON: {}", e)))?;
    config.validate()
  }

  /// Reject configs the engine cannot use; log tier-table defects it can tolerate.
  pub fn validate(self) -> Result<Self, StreakError> {
    if self.milestone_settings.recurring_interval == 0 {
      return Err(StreakError::config("milestone_settings.recurring_interval must be positive"));
    }
    if !self.milestone_settings.recurring_template.contains(DAYS_PLACEHOLDER) {
      warn!(
        template = %self.milestone_settings.recurring_template,
        "recurring milestone template has no {{days}} placeholder"
      );
    }
    for issue in self.status_thresholds.coverage_issues() {
      warn!(%issue, "status threshold table is malformed; unmatched streaks use the last tier");
    }
    Ok(self)
  }
}

impl Default for ClassificationConfig {
  fn default() -> Self {
    let tiers = vec![
      StatusThreshold::new(0, Some(0), "🔄", "Starting fresh"),
      StatusThreshold::new(1, Some(9), "🌱", "Building momentum"),
      StatusThreshold::new(10, Some(29), "🌿", "Growing strong"),
      StatusThreshold::new(30, Some(49), "🌳", "Solid foundation"),
      StatusThreshold::new(50, None, "🏆", "Excellence achieved"),
    ];
    let milestones = BTreeMap::from([
      (10, "🎉 10 Days! Team shoutout time! 🎉".to_string()),
      (30, "☕ 30 Days! Virtual coffee vouchers for everyone! ☕".to_string()),
      (50, "🍽️ 50 Days! Team lunch celebration! 🍽️".to_string()),
      (100, "🎁 100 Days! Custom swag incoming! 🎁".to_string()),
    ]);
    Self {
      status_thresholds: StatusThresholds(tiers),
      milestones,
      milestone_settings: MilestoneSettings::default(),
      messages: MessageSettings::default(),
    }
  }
}
