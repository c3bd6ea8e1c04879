//! Historical series: per-day streak values, best streak window, incidents per month.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StreakError;
use crate::metrics::days_between;
use crate::types::IncidentLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyStreak {
  pub date: NaiveDate,
  pub streak: u32,
}

/// A contiguous run of rising streak values ending at its peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakWindow {
  pub start: NaiveDate,
  pub end: NaiveDate,
  pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
  /// "YYYY-MM"
  pub month: String,
  pub count: usize,
}

/// Streak value for every day from the first incident through `reference`.
///
/// Incident days are 0. Incidents dated after `reference` are ignored.
pub fn daily_streak_series(log: &IncidentLog, reference: NaiveDate) -> Result<Vec<DailyStreak>, StreakError> {
  let dates = log.sorted_dates()?;
  let Some(&first) = dates.first() else {
    return Ok(Vec::new());
  };
  let incident_days: BTreeSet<NaiveDate> = dates.into_iter().collect();

  let mut last_incident = first;
  let series = first
    .iter_days()
    .take_while(|day| *day <= reference)
    .map(|day| {
      if incident_days.contains(&day) {
        last_incident = day;
      }
      DailyStreak {
        date: day,
        streak: days_between(last_incident, day),
      }
    })
    .collect();
  Ok(series)
}

/// Window of the best streak: the first peak, extended back while each prior
/// day is exactly one less. `None` when the series never leaves 0.
pub fn best_streak_window(series: &[DailyStreak]) -> Option<StreakWindow> {
  let peak = series.iter().map(|d| d.streak).max().filter(|&m| m > 0)?;
  let end_idx = series.iter().position(|d| d.streak == peak)?;
  let mut start_idx = end_idx;
  while start_idx > 0 && series[start_idx - 1].streak + 1 == series[start_idx].streak {
    start_idx -= 1;
  }
  Some(StreakWindow {
    start: series[start_idx].date,
    end: series[end_idx].date,
    days: peak,
  })
}

/// Incident counts per calendar month, chronological.
pub fn monthly_incident_counts(log: &IncidentLog) -> Result<Vec<MonthlyCount>, StreakError> {
  let mut counts: BTreeMap<String, usize> = BTreeMap::new();
  for date in log.sorted_dates()? {
    *counts.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1;
  }
  Ok(
    counts
      .into_iter()
      .map(|(month, count)| MonthlyCount { month, count })
      .collect(),
  )
}

/// Earliest month with the highest incident count.
pub fn worst_month(monthly: &[MonthlyCount]) -> Option<&MonthlyCount> {
  let max = monthly.iter().map(|m| m.count).max()?;
  monthly.iter().find(|m| m.count == max)
}

/// Everything the `history` command reports, for one reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryReport {
  pub reference_date: NaiveDate,
  pub best_streak: Option<StreakWindow>,
  pub worst_month: Option<MonthlyCount>,
  pub monthly: Vec<MonthlyCount>,
  pub daily: Vec<DailyStreak>,
}

impl HistoryReport {
  pub fn compute(log: &IncidentLog, reference: NaiveDate) -> Result<Self, StreakError> {
    let daily = daily_streak_series(log, reference)?;
    let monthly = monthly_incident_counts(log)?;
    Ok(Self {
      reference_date: reference,
      best_streak: best_streak_window(&daily),
      worst_month: worst_month(&monthly).cloned(),
      monthly,
      daily,
    })
  }
}
