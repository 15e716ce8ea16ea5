use axum::response::sse::Event;
use domain::GreetingResponse;
use log::*;

/// Serializes a greeting into the JSON carried by an event's `data:` line.
pub fn encode_payload(greeting: &GreetingResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string(greeting)
}

pub fn decode_payload(payload: &str) -> Result<GreetingResponse, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Frames a greeting as one unnamed SSE event (`data: {"message":"..."}`).
///
/// Returns `None` if the greeting cannot be serialized; the greeting is
/// skipped rather than ending the stream.
pub fn to_event(greeting: &GreetingResponse) -> Option<Event> {
    match encode_payload(greeting) {
        Ok(json) => Some(Event::default().data(json)),
        Err(e) => {
            error!("Failed to serialize SSE greeting: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::sse::Sse;
    use axum::response::IntoResponse;
    use futures::stream;
    use http_body_util::BodyExt;
    use std::convert::Infallible;

    #[test]
    fn payload_round_trips_the_message() {
        let greeting = GreetingResponse::new("Hello Ada@2024-05-01T10:15:30.250Z".to_string());
        let payload = encode_payload(&greeting).unwrap();
        assert_eq!(
            payload,
            r#"{"message":"Hello Ada@2024-05-01T10:15:30.250Z"}"#
        );
        assert_eq!(decode_payload(&payload).unwrap().message, greeting.message);
    }

    #[test]
    fn payload_escapes_names_that_need_it() {
        let greeting = GreetingResponse::new("Hello \"Ada\"\n@2024-05-01T10:15:30Z".to_string());
        let payload = encode_payload(&greeting).unwrap();
        assert!(!payload.contains('\n'));
        assert_eq!(decode_payload(&payload).unwrap(), greeting);
    }

    #[test]
    fn decode_rejects_payloads_without_a_message() {
        assert!(decode_payload(r#"{"greeting":"hi"}"#).is_err());
    }

    #[tokio::test]
    async fn to_event_frames_a_greeting_as_a_single_data_line() {
        let greeting = GreetingResponse::new("Hello Ada@2024-05-01T10:15:30Z".to_string());
        let event = to_event(&greeting).unwrap();

        let response = Sse::new(stream::iter([Ok::<_, Infallible>(event)])).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        assert_eq!(
            &bytes[..],
            b"data: {\"message\":\"Hello Ada@2024-05-01T10:15:30Z\"}\n\n"
        );
    }
}
