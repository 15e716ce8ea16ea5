use crate::params::greeting::{IntervalParams, StreamParams};
use crate::{AppState, Error};
use ::sse::message;
use async_stream::stream;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use domain::GreetingRequest;
use futures::StreamExt;
use log::*;
use std::convert::Infallible;
use std::time::Duration;

/// GET a never-ending stream of greetings for the name in the path, one SSE
/// event per interval, until the client disconnects.
#[utoipa::path(
    get,
    path = "/greetings/{name}",
    params(
        ("name" = String, Path, description = "Name to greet"),
        IntervalParams
    ),
    responses(
        (status = 200, description = "One `data:` event per interval carrying a greeting", content_type = "text/event-stream", body = domain::GreetingResponse),
        (status = 400, description = "Bad Request: interval_ms is not a number, is zero or is below the server's minimum")
    )
)]
pub(crate) async fn greetings(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<IntervalParams>,
) -> Result<Response, Error> {
    stream_greetings(&app_state, GreetingRequest::new(name), params.interval())
}

/// GET the same stream as `/greetings/{name}`, served from a standalone
/// handler route.
#[utoipa::path(
    get,
    path = "/greetingWithHandler/{name}",
    params(
        ("name" = String, Path, description = "Name to greet"),
        IntervalParams
    ),
    responses(
        (status = 200, description = "One `data:` event per interval carrying a greeting", content_type = "text/event-stream", body = domain::GreetingResponse),
        (status = 400, description = "Bad Request: interval_ms is not a number, is zero or is below the server's minimum")
    )
)]
pub(crate) async fn greetings_with_handler(
    state: State<AppState>,
    path: Path<String>,
    query: Query<IntervalParams>,
) -> Result<Response, Error> {
    greetings(state, path, query).await
}

/// GET a never-ending stream of greetings for the name in the query string.
#[utoipa::path(
    get,
    path = "/greetings",
    params(StreamParams),
    responses(
        (status = 200, description = "One `data:` event per interval carrying a greeting", content_type = "text/event-stream", body = domain::GreetingResponse),
        (status = 400, description = "Bad Request: interval_ms is not a number, is zero or is below the server's minimum"),
        (status = 422, description = "Unprocessable Entity: no name was given")
    )
)]
pub(crate) async fn greetings_by_query(
    State(app_state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Response, Error> {
    let interval = params.interval();
    let request = GreetingRequest::try_from_name(params.name)?;
    stream_greetings(&app_state, request, interval)
}

/// Opens a registered greeting stream and frames each greeting as one SSE event.
///
/// A rejected interval fails the request before any stream is opened. The
/// greeting stream is owned by the response body, so when the client goes
/// away axum drops the body, which cancels the stream and unregisters it.
fn stream_greetings(
    app_state: &AppState,
    request: GreetingRequest,
    interval: Option<Duration>,
) -> Result<Response, Error> {
    let config = app_state.config.stream_config_for(interval)?;

    let mut greetings = app_state
        .sse_manager
        .open_stream(app_state.clock.clone(), request, config);
    debug!(
        "Established SSE greeting stream {} ({:?} interval)",
        greetings.id().as_str(),
        config.interval
    );

    let stream = stream! {
        while let Some(greeting) = greetings.next().await {
            if let Some(event) = message::to_event(&greeting) {
                yield Ok::<Event, Infallible>(event);
            }
        }

        // Only reached when the server ends the stream (shutdown or timer fault)
        debug!(
            "SSE greeting stream {} ended by the server ({:?})",
            greetings.id().as_str(),
            greetings.state()
        );
    };

    let sse = Sse::new(stream);
    let keep_alive = app_state.config.keep_alive_interval();
    if keep_alive.is_zero() {
        Ok(sse.into_response())
    } else {
        Ok(sse
            .keep_alive(KeepAlive::new().interval(keep_alive))
            .into_response())
    }
}
