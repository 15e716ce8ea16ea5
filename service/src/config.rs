use clap::builder::TypedValueParser as _;
use clap::Parser;
use domain::error::Error as DomainError;
use dotenvy::dotenv;
use log::LevelFilter;
use sse::config::{OverrunPolicy, StreamConfig};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Milliseconds between two greetings on a continuous stream, unless the
    /// request asks for its own interval
    #[arg(long, env, default_value_t = 1000)]
    pub stream_interval_ms: u64,

    /// Smallest interval, in milliseconds, a client may request for its own stream
    #[arg(long, env, default_value_t = 100)]
    pub min_stream_interval_ms: u64,

    /// What a stream does when a tick fires before the client has taken the
    /// previous greeting: `drop` the tick, or `block` until the client catches up
    #[arg(
        long,
        env,
        default_value_t = OverrunPolicy::Drop,
        value_parser = clap::builder::PossibleValuesParser::new(["drop", "block", "DROP", "BLOCK"])
            .map(|s| s.parse::<OverrunPolicy>().unwrap()),
        )]
    pub overrun_policy: OverrunPolicy,

    /// Seconds between keep-alive comments sent on idle SSE connections, 0 disables them
    #[arg(long, env, default_value_t = 15)]
    pub keep_alive_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }

    /// Pacing for streams that do not ask for their own interval.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig::new(self.stream_interval(), self.overrun_policy)
    }

    pub fn min_stream_interval(&self) -> Duration {
        Duration::from_millis(self.min_stream_interval_ms)
    }

    /// Pacing for a stream that may ask for its own interval. A requested
    /// interval must be non-zero and at least the configured minimum.
    pub fn stream_config_for(
        &self,
        requested: Option<Duration>,
    ) -> Result<StreamConfig, DomainError> {
        let Some(interval) = requested else {
            return Ok(self.stream_config());
        };

        let minimum = self.min_stream_interval();
        if interval.is_zero() || interval < minimum {
            return Err(DomainError::invalid_interval(interval, minimum));
        }
        Ok(self.stream_config().with_interval(interval))
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
