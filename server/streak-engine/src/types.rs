//! Core types for the streak engine (persisted JSON contracts + notification output).

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::StreakError;

// ---------------------------------------------------------------------------
// Incident records (JSON contract: what the incident log file holds)
// ---------------------------------------------------------------------------

/// One recorded incident. Unknown fields are silently ignored.
///
/// `date` stays in its stored string form; it is parsed by the metric engine
/// so a corrupt entry surfaces as [`StreakError::InvalidDate`] instead of a
/// generic JSON error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
  pub date: String,
  #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, deserialize_with = "severity_or_none", skip_serializing_if = "Option::is_none")]
  pub severity: Option<Severity>,
  #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
  pub postmortem_link: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration_minutes: Option<u32>,
}

impl IncidentRecord {
  /// Record with only a date; metadata is attached with the `with_*` builders.
  pub fn new(date: impl Into<String>) -> Self {
    Self {
      date: date.into(),
      description: None,
      severity: None,
      postmortem_link: None,
      duration_minutes: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = non_empty(description.into());
    self
  }

  pub fn with_severity(mut self, severity: impl AsRef<str>) -> Self {
    self.severity = Severity::parse(severity.as_ref());
    self
  }

  pub fn with_postmortem_link(mut self, link: impl Into<String>) -> Self {
    self.postmortem_link = non_empty(link.into());
    self
  }

  pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
    self.duration_minutes = Some(minutes);
    self
  }

  /// Parse this record's date.
  pub fn parsed_date(&self) -> Result<NaiveDate, StreakError> {
    parse_incident_date(&self.date)
  }
}

/// The full incident history as persisted: `{"incidents": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentLog {
  #[serde(default)]
  pub incidents: Vec<IncidentRecord>,
}

impl IncidentLog {
  pub fn new(incidents: Vec<IncidentRecord>) -> Self {
    Self { incidents }
  }

  pub fn len(&self) -> usize {
    self.incidents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.incidents.is_empty()
  }

  /// All incident dates, parsed, sorted ascending.
  ///
  /// Fails on the first date that does not parse; a corrupt log is never
  /// partially interpreted.
  pub fn sorted_dates(&self) -> Result<Vec<NaiveDate>, StreakError> {
    let mut dates = self
      .incidents
      .iter()
      .map(IncidentRecord::parsed_date)
      .collect::<Result<Vec<_>, _>>()?;
    dates.sort_unstable();
    Ok(dates)
  }
}

/// Parse an incident date: `YYYY-MM-DD`, or the calendar date of an RFC 3339 timestamp.
pub fn parse_incident_date(raw: &str) -> Result<NaiveDate, StreakError> {
  let trimmed = raw.trim();
  if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
    return Ok(d);
  }
  DateTime::parse_from_rfc3339(trimmed)
    .map(|dt| dt.date_naive())
    .map_err(|e| StreakError::invalid_date(raw, &e.to_string()))
}

fn non_empty(s: String) -> Option<String> {
  if s.trim().is_empty() {
    None
  } else {
    Some(s)
  }
}

/// Older tooling wrote `""` for unset optional fields.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  Ok(raw.and_then(non_empty))
}

fn severity_or_none<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
  D: Deserializer<'de>,
{
  let severity: Option<Severity> = Option::deserialize(deserializer)?;
  Ok(severity.filter(|s| !s.as_str().trim().is_empty()))
}

// ---------------------------------------------------------------------------
// Severity tag
// ---------------------------------------------------------------------------

/// Incident severity. The `SevN` ladder is recognised; any other text is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
  Sev1,
  Sev2,
  Sev3,
  Sev4,
  Custom(String),
}

impl Severity {
  /// Parse a severity tag. Blank input means "not specified".
  pub fn parse(s: &str) -> Option<Self> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return None;
    }
    let sev = match trimmed.to_ascii_lowercase().as_str() {
      "sev1" => Self::Sev1,
      "sev2" => Self::Sev2,
      "sev3" => Self::Sev3,
      "sev4" => Self::Sev4,
      _ => Self::Custom(trimmed.to_string()),
    };
    Some(sev)
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Sev1 => "Sev1",
      Self::Sev2 => "Sev2",
      Self::Sev3 => "Sev3",
      Self::Sev4 => "Sev4",
      Self::Custom(s) => s,
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for Severity {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Severity {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Self::parse(&raw).unwrap_or_else(|| Self::Custom(raw)))
  }
}

// ---------------------------------------------------------------------------
// Notification output (Slack Block Kit shape)
// ---------------------------------------------------------------------------

/// Text object inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
  PlainText { text: String },
  Mrkdwn { text: String },
}

impl TextObject {
  pub fn plain(text: impl Into<String>) -> Self {
    Self::PlainText { text: text.into() }
  }

  pub fn mrkdwn(text: impl Into<String>) -> Self {
    Self::Mrkdwn { text: text.into() }
  }

  pub fn text(&self) -> &str {
    match self {
      Self::PlainText { text } | Self::Mrkdwn { text } => text,
    }
  }
}

/// One content block of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
  Header {
    text: TextObject,
  },
  /// Either a free-text section (`text`) or a field group (`fields`).
  Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextObject>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<TextObject>,
  },
  Divider,
  Context {
    elements: Vec<TextObject>,
  },
}

impl Block {
  pub fn header(text: impl Into<String>) -> Self {
    Self::Header { text: TextObject::plain(text) }
  }

  pub fn text_section(text: impl Into<String>) -> Self {
    Self::Section {
      text: Some(TextObject::mrkdwn(text)),
      fields: Vec::new(),
    }
  }

  pub fn field_section<I, S>(fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::Section {
      text: None,
      fields: fields.into_iter().map(TextObject::mrkdwn).collect(),
    }
  }

  pub fn context(text: impl Into<String>) -> Self {
    Self::Context {
      elements: vec![TextObject::mrkdwn(text)],
    }
  }
}

/// A complete notification: fallback summary text plus ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
  pub text: String,
  pub blocks: Vec<Block>,
}

impl NotificationMessage {
  /// Line-oriented rendering for dry runs and logs.
  pub fn preview_lines(&self) -> Vec<String> {
    let mut lines = vec![format!("Text: {}", self.text)];
    for block in &self.blocks {
      match block {
        Block::Header { text } => lines.push(format!("Header: {}", text.text())),
        Block::Section { text: Some(text), .. } => lines.push(format!("Section: {}", text.text())),
        Block::Section { text: None, fields } => {
          for field in fields {
            lines.push(format!("Field: {}", field.text()));
          }
        }
        Block::Divider => lines.push("---".to_string()),
        Block::Context { elements } => {
          for element in elements {
            lines.push(format!("Context: {}", element.text()));
          }
        }
      }
    }
    lines
  }
}
