use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Tick period used when neither the service configuration nor the request
/// asks for another one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// What a continuous stream does when a tick fires while the previous
/// greeting is still waiting to be taken by the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverrunPolicy {
    /// Skip the tick without computing a greeting and log the overrun.
    #[default]
    Drop,
    /// Hold the tick until the consumer has room. Later ticks are delayed.
    Block,
}

#[derive(Debug, PartialEq, Eq)]
pub struct OverrunPolicyParseError;

impl FromStr for OverrunPolicy {
    type Err = OverrunPolicyParseError;
    fn from_str(policy: &str) -> Result<OverrunPolicy, Self::Err> {
        match policy.to_lowercase().as_str() {
            "drop" => Ok(OverrunPolicy::Drop),
            "block" => Ok(OverrunPolicy::Block),
            _ => Err(OverrunPolicyParseError),
        }
    }
}

impl fmt::Display for OverrunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OverrunPolicy::Drop => write!(f, "drop"),
            OverrunPolicy::Block => write!(f, "block"),
        }
    }
}

/// Pacing settings for one continuous stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    pub interval: Duration,
    pub overrun_policy: OverrunPolicy,
}

impl StreamConfig {
    pub fn new(interval: Duration, overrun_policy: OverrunPolicy) -> Self {
        Self {
            interval,
            overrun_policy,
        }
    }

    /// Same policy, different tick period.
    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, OverrunPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_ticks_every_second_and_drops_overruns() {
        let config = StreamConfig::default();
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.overrun_policy, OverrunPolicy::Drop);
    }

    #[test]
    fn with_interval_keeps_the_policy() {
        let config = StreamConfig::new(DEFAULT_INTERVAL, OverrunPolicy::Block)
            .with_interval(Duration::from_millis(250));
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.overrun_policy, OverrunPolicy::Block);
    }

    #[test]
    fn overrun_policy_parses_case_insensitively() {
        assert_eq!("drop".parse(), Ok(OverrunPolicy::Drop));
        assert_eq!("BLOCK".parse(), Ok(OverrunPolicy::Block));
        assert_eq!("buffer".parse::<OverrunPolicy>(), Err(OverrunPolicyParseError));
    }

    #[test]
    fn overrun_policy_display_parses_back() {
        for policy in [OverrunPolicy::Drop, OverrunPolicy::Block] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
