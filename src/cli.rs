//! Command-line arguments.
use clap::Parser;
use std::time::Duration;

use crate::error::{Result, simple_error};

#[derive(Debug, Clone, Parser)]
#[command(name = "user-directory")]
#[command(about = "Browse the users of a GraphQL service and add fake ones", long_about = None)]
#[command(version)]
pub struct Cli {
    /// GraphQL endpoint serving `allUsers`, `totalUsers` and `addFakeUsers`.
    #[arg(long, env = "USER_DIRECTORY_ENDPOINT", default_value = "http://localhost:4000/graphql")]
    pub endpoint: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Re-read the user list every N seconds.
    #[arg(long)]
    pub poll_interval: Option<u64>,

    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    #[arg(long, default_value = "user-directory.log")]
    pub log_file: String,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(simple_error(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(simple_error("timeout must be at least one second"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval.map(Duration::from_secs)
    }
}
