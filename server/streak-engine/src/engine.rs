//! Core engine: ties metrics, classification, and message building to one config.

use chrono::NaiveDate;

use crate::config::ClassificationConfig;
use crate::error::StreakError;
use crate::message;
use crate::metrics::{self, StreakMetrics};
use crate::types::{IncidentLog, IncidentRecord, NotificationMessage};

/// Result of a streak check.
#[derive(Debug, Clone)]
pub struct CheckReport {
  pub metrics: StreakMetrics,
  pub message: NotificationMessage,
}

/// Result of recording an incident. `log` is the updated log to persist.
#[derive(Debug, Clone)]
pub struct IncidentReport {
  pub log: IncidentLog,
  pub days_lost: u32,
  pub message: NotificationMessage,
}

/// The streak engine. Stateless apart from its immutable config.
pub struct StreakEngine {
  config: ClassificationConfig,
}

impl StreakEngine {
  pub fn new(config: ClassificationConfig) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(ClassificationConfig::default())
  }

  /// Compute the streak as of `reference` and build the daily message.
  pub fn check(&self, log: &IncidentLog, reference: NaiveDate) -> Result<CheckReport, StreakError> {
    let metrics = StreakMetrics::compute(log, reference)?;
    let message = message::build_message(log, metrics.days_since, metrics.record_streak, &self.config)?;
    Ok(CheckReport { metrics, message })
  }
}

/// Append `incident`, measuring the lost streak up to the incident's own date.
///
/// Needs no classification config; the alert has fixed wording.
pub fn report_incident(log: IncidentLog, incident: IncidentRecord) -> Result<IncidentReport, StreakError> {
  let reference = incident.parsed_date()?;
  let (log, days_lost) = metrics::append_incident(log, incident.clone(), reference)?;
  let message = message::build_incident_report(&log, days_lost, &incident);
  Ok(IncidentReport {
    log,
    days_lost,
    message,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn check_combines_metrics_and_message() {
    let engine = StreakEngine::with_defaults();
    let log = IncidentLog::new(vec![IncidentRecord::new("2024-01-01"), IncidentRecord::new("2024-01-11")]);
    let report = engine.check(&log, d("2024-02-10")).unwrap();

    assert_eq!(report.metrics.days_since, 30);
    assert_eq!(report.metrics.record_streak, 30);
    assert_eq!(report.message.text, "Days Without Incident: 30");
  }

  #[test]
  fn report_incident_counts_days_up_to_incident_date() {
    let log = IncidentLog::new(vec![IncidentRecord::new("2024-05-01")]);
    let report = report_incident(log, IncidentRecord::new("2024-05-21").with_severity("Sev3")).unwrap();

    assert_eq!(report.days_lost, 20);
    assert_eq!(report.log.len(), 2);
    assert!(report
      .message
      .preview_lines()
      .contains(&"Field: *Days Lost:*\n20 days".to_string()));
  }

  #[test]
  fn report_incident_into_empty_log() {
    let report = report_incident(IncidentLog::default(), IncidentRecord::new("2024-05-21")).unwrap();
    assert_eq!(report.days_lost, 0);
    assert_eq!(report.log.len(), 1);
  }

  #[test]
  fn invalid_incident_date_is_rejected() {
    let err = report_incident(IncidentLog::default(), IncidentRecord::new("21/05/2024")).unwrap_err();
    assert!(err.to_string().contains("21/05/2024"));
  }
}
