//! Property tests for the streak metrics.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use streak_engine::classify::is_new_record;
use streak_engine::metrics::{append_incident, days_since, record_streak};
use streak_engine::{IncidentLog, IncidentRecord, StreakMetrics};

fn base() -> NaiveDate {
  NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn log_from_offsets(offsets: &[u16]) -> IncidentLog {
  IncidentLog::new(
    offsets
      .iter()
      .map(|&o| IncidentRecord::new((base() + Duration::days(i64::from(o))).format("%Y-%m-%d").to_string()))
      .collect(),
  )
}

proptest! {
  #[test]
  fn record_is_never_below_current(offsets in prop::collection::vec(0u16..2000, 0..30), extra in 0u16..500) {
    let log = log_from_offsets(&offsets);
    let reference = base() + Duration::days(2000 + i64::from(extra));
    let current = days_since(&log, reference).unwrap();
    let record = record_streak(&log, reference).unwrap();
    prop_assert!(record >= current);
  }

  #[test]
  fn single_incident_streak_is_plain_difference(offset in 0u16..2000, ahead in 0u16..2000) {
    let log = log_from_offsets(&[offset]);
    let reference = base() + Duration::days(i64::from(offset) + i64::from(ahead));
    prop_assert_eq!(days_since(&log, reference).unwrap(), u32::from(ahead));
    prop_assert_eq!(record_streak(&log, reference).unwrap(), u32::from(ahead));
  }

  #[test]
  fn insertion_order_does_not_matter(offsets in prop::collection::vec(0u16..2000, 1..20)) {
    let reference = base() + Duration::days(2500);
    let mut reversed = offsets.clone();
    reversed.reverse();
    let forward = StreakMetrics::compute(&log_from_offsets(&offsets), reference).unwrap();
    let backward = StreakMetrics::compute(&log_from_offsets(&reversed), reference).unwrap();
    prop_assert_eq!(forward, backward);
  }

  #[test]
  fn new_record_definition(current in 0u32..500, record in 0u32..500) {
    prop_assert_eq!(is_new_record(current, record), current > 0 && current == record);
  }

  #[test]
  fn append_grows_log_and_uses_pre_append_streak(offsets in prop::collection::vec(0u16..1000, 1..20), gap in 0u16..500) {
    let log = log_from_offsets(&offsets);
    let last = *offsets.iter().max().unwrap();
    let new_offset = last + gap;
    let new_date = base() + Duration::days(i64::from(new_offset));
    let record = IncidentRecord::new(new_date.format("%Y-%m-%d").to_string());

    let (updated, days_lost) = append_incident(log.clone(), record, new_date).unwrap();
    prop_assert_eq!(days_lost, u32::from(gap));
    prop_assert_eq!(updated.len(), log.len() + 1);
  }
}

#[test]
fn empty_log_is_zero_everywhere() {
  let log = IncidentLog::default();
  let reference = base();
  assert_eq!(days_since(&log, reference).unwrap(), 0);
  assert_eq!(record_streak(&log, reference).unwrap(), 0);
}
