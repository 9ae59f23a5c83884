use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// A TUI for signing up, logging in, and parsing resumes with the resume
/// agent API
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// Base URL of the API server
    #[clap(long, env = "API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Give up on a request after this many seconds
    #[clap(long, env, default_value = "30", value_parser = duration_parser)]
    pub request_timeout: Duration,

    /// Where should we write logs?
    #[clap(long)]
    log_dir: Option<PathBuf>,
}

fn duration_parser(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

impl Config {
    /// Get either the configured or a default log directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("dev", "resume-agent", "resume")
                    .map(|dirs| dirs.data_local_dir().join("logs"))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
