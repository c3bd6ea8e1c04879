//! Command bodies, independent of argument parsing so they can be driven from tests.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use streak_engine::{
    report_incident, CheckReport, ClassificationConfig, HistoryReport, IncidentRecord, IncidentReport,
    IncidentStore, JsonFileStore, StreakEngine,
};
use tracing::{error, info, warn};

use crate::cli::{Cli, Command};
use crate::transport::{DryRun, SlackWebhook, Transport};

/// Result of one dispatched command.
#[derive(Debug)]
pub enum Outcome {
    Checked(CheckReport),
    Reported(IncidentReport),
    History(HistoryReport),
}

/// Transport selected by the global flags: dry run in test mode, Slack when a
/// webhook is configured, otherwise none.
pub fn select_transport(cli: &Cli) -> Result<Option<Box<dyn Transport>>> {
    if cli.test_mode {
        return Ok(Some(Box::new(DryRun)));
    }
    match cli.webhook() {
        Some(url) => {
            let webhook = SlackWebhook::new(url).context("failed to build webhook client")?;
            Ok(Some(Box::new(webhook)))
        }
        None => Ok(None),
    }
}

/// Run the parsed command. Dates left unset on the command line default to `today`.
pub fn dispatch(cli: &Cli, today: NaiveDate) -> Result<Outcome> {
    let store = JsonFileStore::new(&cli.incidents);

    match &cli.command {
        Command::Check { date } => {
            info!("Starting daily incident counter check");
            let Some(transport) = select_transport(cli)? else {
                bail!("SLACK_WEBHOOK_URL is not set (use TEST_MODE=true for local runs)");
            };
            let config = ClassificationConfig::load(&cli.config)
                .with_context(|| format!("cannot load classification config {}", cli.config.display()))?;
            let report = run_check(&store, config, date.unwrap_or(today), transport.as_ref())?;
            Ok(Outcome::Checked(report))
        }

        Command::ReportIncident {
            date,
            description,
            severity,
            postmortem,
            duration_minutes,
            notify,
        } => {
            let date = date.unwrap_or(today);
            let mut incident = IncidentRecord::new(date.format("%Y-%m-%d").to_string());
            if let Some(description) = description {
                incident = incident.with_description(description.as_str());
            }
            if let Some(severity) = severity {
                incident = incident.with_severity(severity);
            }
            if let Some(link) = postmortem {
                incident = incident.with_postmortem_link(link.as_str());
            }
            if let Some(minutes) = duration_minutes {
                incident = incident.with_duration_minutes(*minutes);
            }

            let transport = if *notify { select_transport(cli)? } else { None };
            if *notify && transport.is_none() {
                warn!("SLACK_WEBHOOK_URL not set, skipping notification");
            }
            let report = run_report(&store, incident, transport.as_deref())?;
            Ok(Outcome::Reported(report))
        }

        Command::History { date } => Ok(Outcome::History(run_history(&store, date.unwrap_or(today))?)),
    }
}

/// Compute the streak as of `reference` and deliver the daily message.
///
/// A delivery failure is returned as an error; the check itself has no state to roll back.
pub fn run_check(
    store: &dyn IncidentStore,
    config: ClassificationConfig,
    reference: NaiveDate,
    transport: &dyn Transport,
) -> Result<CheckReport> {
    let log = store.load().context("failed to load incident log")?;
    let engine = StreakEngine::new(config);
    let report = engine
        .check(&log, reference)
        .context("incident log is corrupt")?;

    let metrics = &report.metrics;
    let last_incident = metrics
        .last_incident
        .map_or_else(|| "none recorded".to_string(), |d| d.to_string());
    info!(
        last_incident = %last_incident,
        total_incidents = metrics.incident_count,
        days_since = metrics.days_since,
        record_streak = metrics.record_streak,
        new_record = metrics.is_new_record(),
        "Streak computed"
    );

    transport
        .send(&report.message)
        .with_context(|| format!("failed to deliver notification via {}", transport.name()))?;
    info!(channel = transport.name(), "Daily incident counter update delivered");
    Ok(report)
}

/// Append `incident`, persist the log, then optionally notify.
///
/// The save happens before any delivery attempt; a failed notification is
/// logged and does not fail the command.
pub fn run_report(
    store: &dyn IncidentStore,
    incident: IncidentRecord,
    transport: Option<&dyn Transport>,
) -> Result<IncidentReport> {
    let log = store.load().context("failed to load incident log")?;
    let date = incident.date.clone();
    let report = report_incident(log, incident).context("cannot record incident")?;
    store
        .save(&report.log)
        .context("failed to save incident log")?;

    info!(
        date = %date,
        total_incidents = report.log.len(),
        days_lost = report.days_lost,
        "Incident added to history"
    );

    if let Some(transport) = transport {
        match transport.send(&report.message) {
            Ok(()) => info!(channel = transport.name(), "Incident notification delivered"),
            Err(e) => error!(channel = transport.name(), error = %e, "Failed to deliver incident notification"),
        }
    }
    Ok(report)
}

/// Build the history report as of `reference`.
pub fn run_history(store: &dyn IncidentStore, reference: NaiveDate) -> Result<HistoryReport> {
    let log = store.load().context("failed to load incident log")?;
    HistoryReport::compute(&log, reference).context("incident log is corrupt")
}
