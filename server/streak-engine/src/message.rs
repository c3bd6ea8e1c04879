//! Notification builders: the daily streak check and the incident-reported alert.
//!
//! Output is fully determined by the inputs; nothing here reads the clock or
//! touches I/O.

use crate::classify::{classify_status, is_new_record, milestone_message};
use crate::config::ClassificationConfig;
use crate::error::StreakError;
use crate::metrics::last_incident_date;
use crate::types::{Block, IncidentLog, IncidentRecord, NotificationMessage};

/// Build the daily "days without incident" message.
///
/// Block order: header, metric fields, new-record section, milestone section,
/// incident-count footer. The last three are conditional and may co-occur.
pub fn build_message(
  log: &IncidentLog,
  days_since: u32,
  record_streak: u32,
  config: &ClassificationConfig,
) -> Result<NotificationMessage, StreakError> {
  let last_incident = last_incident_date(log)?;
  let tier = classify_status(days_since, config);
  let texts = &config.messages;

  let last_incident_text = match last_incident {
    Some(date) => date.format("%Y-%m-%d").to_string(),
    None => texts.no_incident_label.clone(),
  };

  let mut blocks = vec![
    Block::header(format!("{} Days Without Incident", tier.emoji)),
    Block::field_section([
      format!("*Current Streak:*\n{} days", days_since),
      format!("*Status:*\n{}", tier.status_label),
      format!("*Last Incident:*\n{}", last_incident_text),
      format!("*Record Streak:*\n{} days", record_streak),
    ]),
  ];

  if is_new_record(days_since, record_streak) {
    blocks.push(Block::text_section(texts.new_record_text.clone()));
  }

  if let Some(milestone) = milestone_message(days_since, config) {
    blocks.push(Block::text_section(format!(
      "🎊 *MILESTONE REACHED!* 🎊\n{}",
      milestone
    )));
  }

  if days_since > 0 {
    blocks.push(Block::context(format!(
      "Total incidents recorded: {} | {}",
      log.len(),
      texts.footer_motivation
    )));
  }

  Ok(NotificationMessage {
    text: format!("Days Without Incident: {}", days_since),
    blocks,
  })
}

/// Build the alert sent when an incident is recorded.
///
/// `log` is the log *after* the append, so the total includes `incident`.
pub fn build_incident_report(
  log: &IncidentLog,
  days_lost: u32,
  incident: &IncidentRecord,
) -> NotificationMessage {
  let severity = incident
    .severity
    .as_ref()
    .map_or("Not specified", |s| s.as_str());

  let mut blocks = vec![
    Block::header("🚨 Incident Reported"),
    Block::text_section(format!(
      "An incident has been reported. Our streak of {} days has ended, but we're starting fresh!",
      days_lost
    )),
    Block::field_section([
      format!("*Incident Date:*\n{}", incident.date),
      format!("*Days Lost:*\n{} days", days_lost),
      format!("*Total Incidents:*\n{} recorded", log.len()),
      format!("*Severity:*\n{}", severity),
    ]),
  ];

  if let Some(description) = &incident.description {
    blocks.push(Block::text_section(format!("*Description:*\n{}", description)));
  }
  if let Some(minutes) = incident.duration_minutes {
    blocks.push(Block::text_section(format!("*Duration:*\n{} minutes", minutes)));
  }
  if let Some(link) = &incident.postmortem_link {
    blocks.push(Block::text_section(format!(
      "*Postmortem:*\n<{}|View Postmortem>",
      link
    )));
  }

  blocks.push(Block::Divider);
  blocks.push(Block::text_section(
    "💪 *Remember:* Incidents are learning opportunities. Let's use this to make our systems even stronger!",
  ));

  NotificationMessage {
    text: "Incident Reported - Counter Reset".to_string(),
    blocks,
  }
}
