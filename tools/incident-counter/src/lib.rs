//! Incident counter job: the CLI, command bodies, and notification transports
//! around the `streak-engine` core.

pub mod cli;
pub mod commands;
pub mod transport;

pub use cli::{Cli, Command};
pub use transport::{DryRun, SlackWebhook, Transport, TransportError};
