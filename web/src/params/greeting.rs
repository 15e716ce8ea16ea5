use serde::Deserialize;
use std::time::Duration;
use utoipa::IntoParams;

/// Query string for the single-shot greeting when the name is not in the path.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct GreetingParams {
    /// Name to greet. May be empty, but must be present.
    pub(crate) name: Option<String>,
}

/// Query string for `GET /greetings/{name}`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IntervalParams {
    /// Milliseconds between greetings for this stream. Defaults to the server's configured interval.
    pub(crate) interval_ms: Option<u64>,
}

/// Query string for `GET /greetings`.
// Not flattened from IntervalParams: serde_urlencoded cannot parse numbers inside #[serde(flatten)].
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct StreamParams {
    /// Name to greet. May be empty, but must be present.
    pub(crate) name: Option<String>,
    /// Milliseconds between greetings for this stream. Defaults to the server's configured interval.
    pub(crate) interval_ms: Option<u64>,
}

impl IntervalParams {
    pub(crate) fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }
}

impl StreamParams {
    pub(crate) fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }
}
