use crate::params::greeting::GreetingParams;
use crate::{AppState, Error};
use ::sse::GreetingStream;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::GreetingRequest;
use futures::StreamExt;

use log::*;

/// GET a single greeting for the name in the path.
#[utoipa::path(
    get,
    path = "/greeting/{name}",
    params(
        ("name" = String, Path, description = "Name to greet")
    ),
    responses(
        (status = 200, description = "Successfully computed a greeting", body = domain::GreetingResponse),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET greeting for name: {name:?}");

    greet_once(&app_state, GreetingRequest::new(name)).await
}

/// GET a single greeting for the name in the path, served from the
/// functional-style route.
#[utoipa::path(
    get,
    path = "/functionalStyleGreeting/{name}",
    params(
        ("name" = String, Path, description = "Name to greet")
    ),
    responses(
        (status = 200, description = "Successfully computed a greeting", body = domain::GreetingResponse)
    )
)]
pub async fn functional_style_read(
    state: State<AppState>,
    path: Path<String>,
) -> Result<impl IntoResponse, Error> {
    read(state, path).await
}

/// GET a single greeting for the name in the path, served from the concise
/// functional-style route.
#[utoipa::path(
    get,
    path = "/conciseFunctionalStyleGreeting/{name}",
    params(
        ("name" = String, Path, description = "Name to greet")
    ),
    responses(
        (status = 200, description = "Successfully computed a greeting", body = domain::GreetingResponse)
    )
)]
pub async fn concise_functional_style_read(
    state: State<AppState>,
    path: Path<String>,
) -> Result<impl IntoResponse, Error> {
    read(state, path).await
}

/// GET a single greeting for the name in the query string.
#[utoipa::path(
    get,
    path = "/greeting",
    params(GreetingParams),
    responses(
        (status = 200, description = "Successfully computed a greeting", body = domain::GreetingResponse),
        (status = 422, description = "Unprocessable Entity: no name was given"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<GreetingParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET greeting with params: {params:?}");

    let request = GreetingRequest::try_from_name(params.name)?;
    greet_once(&app_state, request).await
}

// Single-shot responses take the one value of a single-shot greeting stream.
async fn greet_once(
    app_state: &AppState,
    request: GreetingRequest,
) -> Result<impl IntoResponse, Error> {
    let mut stream = GreetingStream::once(app_state.clock.clone(), request);

    match stream.next().await {
        Some(greeting) => Ok(Json(greeting)),
        None => Err(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(format!(
                "single-shot stream {} ended without a greeting ({:?})",
                stream.id().as_str(),
                stream.state()
            ))),
        }
        .into()),
    }
}
