//! Streak metrics: last incident, current streak, record streak, incident append.
//!
//! All functions take an explicit reference date so results are reproducible;
//! [`today`] supplies the live value. Every incident date is parsed before any
//! arithmetic, so one corrupt entry fails the whole computation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StreakError;
use crate::types::{IncidentLog, IncidentRecord};

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

/// Whole days from `from` to `to`, saturating at 0 when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> u32 {
  let days = (to - from).num_days().max(0);
  u32::try_from(days).unwrap_or(u32::MAX)
}

/// Date of the most recent incident, or `None` for an empty log.
pub fn last_incident_date(log: &IncidentLog) -> Result<Option<NaiveDate>, StreakError> {
  Ok(log.sorted_dates()?.last().copied())
}

/// Days from the most recent incident to `reference`; 0 when there are no incidents.
///
/// An incident dated after `reference` counts as a streak of 0.
pub fn days_since(log: &IncidentLog, reference: NaiveDate) -> Result<u32, StreakError> {
  let dates = log.sorted_dates()?;
  Ok(current_streak(&dates, reference))
}

/// Longest incident-free run: the widest gap between consecutive incidents or
/// the current streak, whichever is larger.
pub fn record_streak(log: &IncidentLog, reference: NaiveDate) -> Result<u32, StreakError> {
  let dates = log.sorted_dates()?;
  Ok(record_from_sorted(&dates, reference))
}

/// Append `record` and report how many streak days were lost.
///
/// `days_lost` is measured on the log *before* the append; measuring after
/// would always give 0.
pub fn append_incident(
  log: IncidentLog,
  record: IncidentRecord,
  reference: NaiveDate,
) -> Result<(IncidentLog, u32), StreakError> {
  record.parsed_date()?;
  let days_lost = days_since(&log, reference)?;
  let mut updated = log;
  updated.incidents.push(record);
  Ok((updated, days_lost))
}

fn current_streak(sorted: &[NaiveDate], reference: NaiveDate) -> u32 {
  sorted.last().map_or(0, |&last| days_between(last, reference))
}

fn record_from_sorted(sorted: &[NaiveDate], reference: NaiveDate) -> u32 {
  let longest_gap = sorted
    .windows(2)
    .map(|pair| days_between(pair[0], pair[1]))
    .max()
    .unwrap_or(0);
  longest_gap.max(current_streak(sorted, reference))
}

/// The streak figures for one reference date, computed from a single parse of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakMetrics {
  pub reference_date: NaiveDate,
  pub last_incident: Option<NaiveDate>,
  pub days_since: u32,
  pub record_streak: u32,
  pub incident_count: usize,
}

impl StreakMetrics {
  pub fn compute(log: &IncidentLog, reference: NaiveDate) -> Result<Self, StreakError> {
    let dates = log.sorted_dates()?;
    Ok(Self {
      reference_date: reference,
      last_incident: dates.last().copied(),
      days_since: current_streak(&dates, reference),
      record_streak: record_from_sorted(&dates, reference),
      incident_count: dates.len(),
    })
  }

  pub fn is_new_record(&self) -> bool {
    crate::classify::is_new_record(self.days_since, self.record_streak)
  }
}
