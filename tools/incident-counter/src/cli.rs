//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use streak_engine::store::DEFAULT_LOG_PATH;

/// Default classification config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Daily incident counter: track days without incident and post the streak to Slack.
#[derive(Parser, Debug)]
#[command(name = "incident-counter")]
#[command(version)]
pub struct Cli {
    /// Incident history file
    #[arg(long, env = "INCIDENT_LOG_PATH", default_value = DEFAULT_LOG_PATH, global = true)]
    pub incidents: PathBuf,

    /// Classification config (status tiers and milestones)
    #[arg(long, env = "INCIDENT_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true, global = true)]
    pub webhook_url: Option<String>,

    /// Print messages instead of posting them
    #[arg(long, env = "TEST_MODE", value_parser = BoolishValueParser::new(), global = true)]
    pub test_mode: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the current streak and post it (scheduled job)
    Check {
        /// Reference date instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a new incident, ending the current streak
    ReportIncident {
        /// Incident date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Brief incident description
        #[arg(long)]
        description: Option<String>,

        /// Incident severity (e.g. Sev1, Sev2)
        #[arg(long)]
        severity: Option<String>,

        /// Link to the postmortem document
        #[arg(long)]
        postmortem: Option<String>,

        /// How long the incident lasted, in minutes
        #[arg(long)]
        duration_minutes: Option<u32>,

        /// Post an incident notification
        #[arg(long)]
        notify: bool,
    },

    /// Print per-day streaks and per-month incident counts as JSON
    History {
        /// Reference date instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    /// Webhook URL, treating an empty variable as unset.
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_incident_flags() {
        let cli = Cli::try_parse_from([
            "incident-counter",
            "report-incident",
            "--date",
            "2024-03-01",
            "--severity",
            "Sev2",
            "--duration-minutes",
            "45",
            "--notify",
        ])
        .unwrap();

        match cli.command {
            Command::ReportIncident {
                date,
                severity,
                duration_minutes,
                notify,
                description,
                ..
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(severity.as_deref(), Some("Sev2"));
                assert_eq!(duration_minutes, Some(45));
                assert!(notify);
                assert_eq!(description, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["incident-counter", "check", "--date", "03/01/2024"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "incident-counter",
            "check",
            "--incidents",
            "/tmp/log.json",
            "--webhook-url",
            "  ",
        ])
        .unwrap();
        assert_eq!(cli.incidents, PathBuf::from("/tmp/log.json"));
        assert_eq!(cli.webhook(), None);
    }
}
