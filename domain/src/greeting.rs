use crate::clock::Clock;
use crate::error::Error;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The name a client asked to be greeted with.
///
/// Only presence is required. An empty name is a valid request and is
/// greeted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingRequest {
    name: String,
}

impl GreetingRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Builds a request from an optional name, rejecting a missing one.
    pub fn try_from_name(name: Option<String>) -> Result<Self, Error> {
        name.map(Self::new).ok_or_else(Error::missing_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single computed greeting, e.g. `Hello Ada@2024-05-01T10:15:30.250Z`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GreetingResponse {
    /// "Hello " + name + "@" + the ISO-8601 instant the greeting was computed at
    #[schema(example = "Hello Ada@2024-05-01T10:15:30.250Z")]
    pub message: String,
}

impl GreetingResponse {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// Computes the greeting for `name` at `now`.
pub fn compute(name: &str, now: DateTime<Utc>) -> GreetingResponse {
    GreetingResponse::new(format!("Hello {name}@{}", render_instant(now)))
}

/// Reads `clock` once and greets the request's name at that instant.
pub fn greet_once(clock: &dyn Clock, request: &GreetingRequest) -> GreetingResponse {
    compute(request.name(), clock.now())
}

// UTC with a `Z` suffix and 0, 3, 6 or 9 fractional digits.
fn render_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
