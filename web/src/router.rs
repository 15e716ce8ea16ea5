use crate::{
    controller::{greeting_controller, health_check_controller},
    sse, AppState,
};
use axum::{routing::get, Router};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Greeting SSE API"
        ),
        paths(
            greeting_controller::read,
            greeting_controller::functional_style_read,
            greeting_controller::concise_functional_style_read,
            greeting_controller::index,
            sse::handler::greetings,
            sse::handler::greetings_with_handler,
            sse::handler::greetings_by_query,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::GreetingResponse,
            )
        ),
        tags(
            (name = "greeting_sse_rs", description = "Greetings, once or as a stream of server-sent events")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(greeting_routes(app_state.clone()))
        .merge(greeting_stream_routes(app_state))
        .merge(health_routes())
        .merge(
            RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"),
        )
}

fn greeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/greeting", get(greeting_controller::index))
        .route("/greeting/{name}", get(greeting_controller::read))
        .route(
            "/functionalStyleGreeting/{name}",
            get(greeting_controller::functional_style_read),
        )
        .route(
            "/conciseFunctionalStyleGreeting/{name}",
            get(greeting_controller::concise_functional_style_read),
        )
        .with_state(app_state)
}

fn greeting_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/greetings", get(sse::handler::greetings_by_query))
        .route("/greetings/{name}", get(sse::handler::greetings))
        .route(
            "/greetingWithHandler/{name}",
            get(sse::handler::greetings_with_handler),
        )
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use domain::clock::FixedClock;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let config = Config::try_parse_from(["greeting_sse_rs"]).unwrap();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap());
        AppState::new(config).with_clock(Arc::new(clock))
    }

    async fn get(app_state: &AppState, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        define_routes(app_state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn next_frame(body: &mut Body) -> Option<String> {
        let frame = body.frame().await?.unwrap();
        let data = frame.into_data().unwrap();
        Some(String::from_utf8(data.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn greeting_by_path_returns_a_json_greeting() {
        let response = get(&app_state(), "/greeting/Ada").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Hello Ada@2024-05-01T10:15:30Z"})
        );
    }

    #[tokio::test]
    async fn greeting_by_query_accepts_an_empty_name() {
        let response = get(&app_state(), "/greeting?name=").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Hello @2024-05-01T10:15:30Z"})
        );
    }

    #[tokio::test]
    async fn greeting_without_a_name_is_unprocessable() {
        let response = get(&app_state(), "/greeting").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test(start_paused = true)]
    async fn greetings_stream_frames_each_greeting_as_an_sse_event() {
        let app_state = app_state();
        let response = get(&app_state, "/greetings/Ada").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let mut body = response.into_body();
        for _ in 0..2 {
            assert_eq!(
                next_frame(&mut body).await.as_deref(),
                Some("data: {\"message\":\"Hello Ada@2024-05-01T10:15:30Z\"}\n\n")
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn greetings_by_query_honours_the_requested_interval() {
        let app_state = app_state();
        let response = get(&app_state, "/greetings?name=Grace&interval_ms=250").await;
        assert_eq!(response.status(), StatusCode::OK);

        let started = tokio::time::Instant::now();
        let mut body = response.into_body();
        let frame = next_frame(&mut body).await.unwrap();

        assert!(frame.starts_with("data: {\"message\":\"Hello Grace@"));
        let waited = started.elapsed();
        assert!(waited >= std::time::Duration::from_millis(250));
        assert!(waited < std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn greetings_without_a_name_is_rejected_before_a_stream_starts() {
        let app_state = app_state();
        let response = get(&app_state, "/greetings").await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app_state.sse_manager.active_connections(), 0);
    }

    #[tokio::test]
    async fn greetings_with_a_non_numeric_interval_is_a_bad_request() {
        let response = get(&app_state(), "/greetings/Ada?interval_ms=soon").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn client_disconnect_unregisters_the_stream() {
        let app_state = app_state();
        let response = get(&app_state, "/greetings/Ada").await;
        let mut body = response.into_body();
        assert!(next_frame(&mut body).await.is_some());
        assert_eq!(app_state.sse_manager.active_connections(), 1);

        drop(body);

        assert_eq!(app_state.sse_manager.active_connections(), 0);
    }

    #[tokio::test]
    async fn zero_interval_is_rejected_before_a_stream_starts() {
        let app_state = app_state();
        for uri in [
            "/greetings/Ada?interval_ms=0",
            "/greetings?name=Ada&interval_ms=0",
            "/greetingWithHandler/Ada?interval_ms=0",
        ] {
            let response = get(&app_state, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        assert_eq!(app_state.sse_manager.active_connections(), 0);
    }

    #[tokio::test]
    async fn interval_below_the_configured_minimum_is_rejected() {
        let app_state = app_state();
        for uri in [
            "/greetings/Ada?interval_ms=1",
            "/greetings?name=Ada&interval_ms=99",
        ] {
            let response = get(&app_state, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        assert_eq!(app_state.sse_manager.active_connections(), 0);

        let response = get(&app_state, "/greetings/Ada?interval_ms=100").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn functional_style_routes_return_a_json_greeting() {
        for uri in [
            "/functionalStyleGreeting/Ada",
            "/conciseFunctionalStyleGreeting/Ada",
        ] {
            let response = get(&app_state(), uri).await;

            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(
                json_body(response).await,
                json!({"message": "Hello Ada@2024-05-01T10:15:30Z"})
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn greeting_with_handler_streams_greetings() {
        let response = get(&app_state(), "/greetingWithHandler/Ada").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let mut body = response.into_body();
        assert_eq!(
            next_frame(&mut body).await.as_deref(),
            Some("data: {\"message\":\"Hello Ada@2024-05-01T10:15:30Z\"}\n\n")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_open_streams() {
        let app_state = app_state();
        let response = get(&app_state, "/greetings/Ada").await;
        let mut body = response.into_body();
        assert!(next_frame(&mut body).await.is_some());

        app_state.sse_manager.shutdown();

        assert_eq!(next_frame(&mut body).await, None);
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let response = get(&app_state(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"healthy");
    }

    #[tokio::test]
    async fn openapi_document_lists_every_greeting_path() {
        let response = get(&app_state(), "/api-docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let document = json_body(response).await;
        for path in [
            "/greeting",
            "/greeting/{name}",
            "/functionalStyleGreeting/{name}",
            "/conciseFunctionalStyleGreeting/{name}",
            "/greetings",
            "/greetings/{name}",
            "/greetingWithHandler/{name}",
            "/health",
        ] {
            assert!(
                document["paths"].get(path).is_some(),
                "{path} missing from the OpenAPI document"
            );
        }
    }
}
