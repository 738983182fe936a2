use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::logging::HttpLogLevel;
use crate::orchestrator::Strategy;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "github-repos-demo")]
#[command(about = "Lists a GitHub user's repositories using callback, async and blocking call styles")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub user whose repositories are listed
    #[arg(default_value = "square")]
    pub username: String,

    /// Invocation strategies to run, in order
    #[arg(
        long = "strategy",
        value_enum,
        default_values_t = [Strategy::Callback, Strategy::Coroutine, Strategy::Blocking]
    )]
    pub strategies: Vec<Strategy>,

    /// Run every strategy this many times back to back
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// API base URL, must end in /
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Connect, read and write timeout in seconds
    #[arg(
        long,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// HTTP logging verbosity
    #[arg(long, env = "HTTP_LOG_LEVEL", value_enum, default_value_t = HttpLogLevel::Body)]
    pub log_level: HttpLogLevel,

    /// GitHub token, sent as a bearer token when set
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeouts(Duration::from_secs(self.timeout_secs))
            .with_log_level(self.log_level)
            .with_token(self.token.clone())
    }

    /// Number of terminal states the run will produce.
    pub fn expected_outcomes(&self) -> usize {
        self.strategies.len() * self.repeat as usize
    }
}
