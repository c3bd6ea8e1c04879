//! Incident Streak Engine: deterministic "days since last incident" tracking.
//!
//! Loads the incident log, computes the current and record streaks, classifies
//! the streak against an external tier/milestone config, and builds Slack
//! Block Kit notifications for the daily check and for newly reported
//! incidents.
//!
//! No network; pure computation + JSON file persistence.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod message;
pub mod metrics;
pub mod store;
pub mod types;

pub use config::ClassificationConfig;
pub use engine::{report_incident, CheckReport, IncidentReport, StreakEngine};
pub use error::StreakError;
pub use history::HistoryReport;
pub use metrics::StreakMetrics;
pub use store::{IncidentStore, JsonFileStore};
pub use types::{IncidentLog, IncidentRecord, NotificationMessage, Severity};
