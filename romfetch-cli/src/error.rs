use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Profile could not be activated; details are in the log
    #[error("could not activate profile {0} (run with -v for details)")]
    Init(i32),

    /// The service failed to start before issuing a ticket
    #[error("scrape service is not running")]
    NotRunning,

    #[error("no result for ticket {ticket} after {secs}s")]
    Timeout { ticket: i32, secs: u64 },

    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
