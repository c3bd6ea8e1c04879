//! Streak classification: status tier, milestone text, new-record detection.

use crate::config::{ClassificationConfig, StatusThreshold, DAYS_PLACEHOLDER};

/// First tier containing `days`. A table with a gap at `days` falls back to the
/// last tier; an imprecise status beats a missing notification.
pub fn classify_status(days: u32, config: &ClassificationConfig) -> &StatusThreshold {
  config
    .status_thresholds
    .iter()
    .find(|t| t.contains(days))
    .unwrap_or_else(|| config.status_thresholds.last())
}

/// Celebration text for `days`, if any.
///
/// Exact entries win over the recurring rule, which only applies past 100 days.
pub fn milestone_message(days: u32, config: &ClassificationConfig) -> Option<String> {
  if let Some(text) = config.milestones.get(&days) {
    return Some(text.clone());
  }
  let settings = &config.milestone_settings;
  if days > 100 && days.checked_rem(settings.recurring_interval) == Some(0) {
    return Some(
      settings
        .recurring_template
        .replace(DAYS_PLACEHOLDER, &days.to_string()),
    );
  }
  None
}

/// The live streak is the record. A zero streak never counts.
pub fn is_new_record(days_since: u32, record_streak: u32) -> bool {
  days_since > 0 && days_since == record_streak
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{MilestoneSettings, StatusThresholds};
  use std::collections::BTreeMap;

  fn milestone_config() -> ClassificationConfig {
    ClassificationConfig {
      milestones: BTreeMap::from([(10, "ten!".to_string()), (150, "exact 150".to_string())]),
      milestone_settings: MilestoneSettings {
        recurring_interval: 50,
        recurring_template: "{days} days!".to_string(),
      },
      ..ClassificationConfig::default()
    }
  }

  #[test]
  fn default_tiers_match_original_boundaries() {
    let config = ClassificationConfig::default();
    assert_eq!(classify_status(0, &config).status_label, "Starting fresh");
    assert_eq!(classify_status(1, &config).status_label, "Building momentum");
    assert_eq!(classify_status(9, &config).status_label, "Building momentum");
    assert_eq!(classify_status(10, &config).status_label, "Growing strong");
    assert_eq!(classify_status(49, &config).emoji, "🌳");
    assert_eq!(classify_status(50, &config).emoji, "🏆");
    assert_eq!(classify_status(u32::MAX, &config).emoji, "🏆");
  }

  #[test]
  fn gap_in_table_falls_back_to_last_tier() {
    let config = ClassificationConfig {
      status_thresholds: StatusThresholds::try_from(vec![
        StatusThreshold::new(0, Some(5), "a", "low"),
        StatusThreshold::new(10, Some(20), "b", "mid"),
        StatusThreshold::new(30, None, "c", "high"),
      ])
      .unwrap(),
      ..ClassificationConfig::default()
    };
    assert_eq!(classify_status(7, &config).status_label, "high");
    assert_eq!(classify_status(12, &config).status_label, "mid");
  }

  #[test]
  fn exact_milestone_beats_recurring_rule() {
    let config = milestone_config();
    assert_eq!(milestone_message(10, &config).as_deref(), Some("ten!"));
    assert_eq!(milestone_message(150, &config).as_deref(), Some("exact 150"));
  }

  #[test]
  fn recurring_rule_only_past_one_hundred() {
    let config = milestone_config();
    assert_eq!(milestone_message(200, &config).as_deref(), Some("200 days!"));
    assert_eq!(milestone_message(110, &config), None);
    assert_eq!(milestone_message(100, &config), None);
    assert_eq!(milestone_message(50, &config), None);
  }

  #[test]
  fn zero_interval_never_panics() {
    let mut config = milestone_config();
    config.milestone_settings.recurring_interval = 0;
    assert_eq!(milestone_message(300, &config), None);
  }

  #[test]
  fn new_record_requires_positive_streak() {
    assert!(!is_new_record(0, 0));
    assert!(is_new_record(30, 30));
    assert!(!is_new_record(5, 30));
  }
}
