use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError, InputErrorKind, InternalErrorKind};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Input(input_error_kind) => match input_error_kind {
                InputErrorKind::MissingName => {
                    debug!("Rejecting greeting request without a name");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "UNPROCESSABLE ENTITY: a name is required",
                    )
                        .into_response()
                }
                InputErrorKind::InvalidInterval => {
                    let reason = self
                        .0
                        .source
                        .map(|source| source.to_string())
                        .unwrap_or_default();
                    debug!("Rejecting greeting stream request: {reason}");
                    (StatusCode::BAD_REQUEST, format!("BAD REQUEST: {reason}")).into_response()
                }
            },
            DomainErrorKind::Internal(internal_error_kind) => {
                error!("Internal error while serving a greeting: {internal_error_kind:?}");
                match internal_error_kind {
                    InternalErrorKind::Timer
                    | InternalErrorKind::Serialization
                    | InternalErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                }
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_maps_to_unprocessable_entity() {
        let response = Error::from(DomainError::missing_name()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_interval_maps_to_bad_request() {
        let err = DomainError::invalid_interval(
            std::time::Duration::from_millis(1),
            std::time::Duration::from_millis(100),
        );
        let response = Error::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timer_fault_maps_to_internal_server_error() {
        let response = Error::from(DomainError::timer_fault("zero period")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn other_internal_errors_map_to_internal_server_error() {
        let err = DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other("boom".to_string())),
        };
        assert_eq!(
            Error::from(err).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
