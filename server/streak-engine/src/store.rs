//! Incident log persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StreakError;
use crate::types::IncidentLog;

/// Default incident log location, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "last_incident.json";

/// Durable storage for the incident log. Callers serialize runs externally;
/// implementations only need their own `save` to be all-or-nothing.
pub trait IncidentStore {
  /// Load the log; an absent store is an empty log, not an error.
  fn load(&self) -> Result<IncidentLog, StreakError>;

  fn save(&self, log: &IncidentLog) -> Result<(), StreakError>;
}

/// Pretty-printed JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn tmp_path(&self) -> PathBuf {
    let mut name = self.path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    self.path.with_file_name(name)
  }
}

impl IncidentStore for JsonFileStore {
  fn load(&self) -> Result<IncidentLog, StreakError> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "incident log not found; starting empty");
        return Ok(IncidentLog::default());
      }
      Err(e) => return Err(StreakError::io(&self.path, e)),
    };
    let log: IncidentLog = serde_json::from_str(&raw)?;
    debug!(path = %self.path.display(), incidents = log.len(), "incident log loaded");
    Ok(log)
  }

  fn save(&self, log: &IncidentLog) -> Result<(), StreakError> {
    let mut content = serde_json::to_string_pretty(log)?;
    content.push('\n');

    // Write-then-rename so readers never see a half-written file.
    let tmp = self.tmp_path();
    fs::write(&tmp, content).map_err(|e| StreakError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, &self.path) {
      let _ = fs::remove_file(&tmp);
      return Err(StreakError::io(&self.path, e));
    }
    debug!(path = %self.path.display(), incidents = log.len(), "incident log saved");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::IncidentRecord;

  #[test]
  fn missing_file_loads_as_empty_log() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("last_incident.json"));
    assert!(store.load().unwrap().is_empty());
  }

  #[test]
  fn save_then_load_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("last_incident.json"));
    let log = IncidentLog::new(vec![
      IncidentRecord::new("2024-01-01").with_severity("Sev1"),
      IncidentRecord::new("2024-02-01").with_description("cache stampede"),
    ]);

    store.save(&log).unwrap();
    assert_eq!(store.load().unwrap(), log);
    assert!(!dir.path().join("last_incident.json.tmp").exists());
  }

  #[test]
  fn reads_files_written_by_older_tooling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_incident.json");
    fs::write(
      &path,
      r#"{"incidents": [{"date": "2024-01-01", "description": "", "postmortem_link": "", "severity": ""}]}"#,
    )
    .unwrap();

    let log = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(log.incidents, vec![IncidentRecord::new("2024-01-01")]);
  }

  #[test]
  fn malformed_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_incident.json");
    fs::write(&path, "{ incidents: ").unwrap();
    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StreakError::Json(_)));
  }

  #[test]
  fn saved_file_uses_two_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("log.json"));
    store.save(&IncidentLog::new(vec![IncidentRecord::new("2024-01-01")])).unwrap();
    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(raw.starts_with("{\n  \"incidents\": [\n    {\n      \"date\": \"2024-01-01\""));
  }

  #[test]
  fn failed_rename_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory at the target path makes the rename fail.
    let target = dir.path().join("last_incident.json");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep"), "x").unwrap();

    let store = JsonFileStore::new(&target);
    let err = store.save(&IncidentLog::new(vec![IncidentRecord::new("2024-01-01")])).unwrap_err();

    assert!(matches!(err, StreakError::Io { .. }));
    assert!(!dir.path().join("last_incident.json.tmp").exists());
  }
}
