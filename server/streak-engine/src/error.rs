//! Structured error types for the streak engine.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreakError {
  #[error("invalid incident date '{date}': {reason}")]
  InvalidDate { date: String, reason: String },

  #[error("config: {0}")]
  Config(String),

  #[error("io: {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl StreakError {
  pub fn invalid_date(date: &str, reason: &str) -> Self {
    Self::InvalidDate {
      date: date.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
