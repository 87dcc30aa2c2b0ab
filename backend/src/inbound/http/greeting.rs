//! Greeting endpoints.
//!
//! ```text
//! GET  /            -> Hello, world!
//! GET  /ping        -> Pong
//! POST /reflection  {"greeting":"hi"} -> {"greeting":"hi"}
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, post, route, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body of `POST /reflection`, echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Greeting {
    /// Free-form greeting text; empty when the field is absent.
    #[serde(default)]
    pub greeting: String,
}

/// Landing page.
#[route("/", method = "GET", method = "POST")]
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Hello, world!")
}

/// Liveness check answering a fixed body.
#[route("/ping", method = "GET", method = "POST")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Pong")
}

/// Echo the decoded greeting.
#[post("/reflection")]
pub async fn reflection(
    state: web::Data<HttpState>,
    payload: web::Json<Greeting>,
) -> ApiResult<HttpResponse> {
    state.json(StatusCode::OK, &payload.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPostRepository;
    use crate::inbound::http::app::configure;
    use crate::inbound::http::error::StatusPolicy;
    use actix_web::http::Method;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn call(
        policy: StatusPolicy,
        request: actix_test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = web::Data::new(HttpState::new(
            Arc::new(MockPostRepository::new()),
            policy,
        ));
        let app =
            actix_test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;
        actix_test::call_service(&app, request.to_request()).await
    }

    #[rstest]
    #[case(Method::GET, "/", "Hello, world!")]
    #[case(Method::POST, "/", "Hello, world!")]
    #[case(Method::GET, "/ping", "Pong")]
    #[case(Method::POST, "/ping", "Pong")]
    #[actix_web::test]
    async fn fixed_text_endpoints(
        #[case] method: Method,
        #[case] uri: &str,
        #[case] expected: &str,
    ) {
        let request = actix_test::TestRequest::default().method(method).uri(uri);
        let response = call(StatusPolicy::Flat, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), expected.as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn reflection_echoes_greeting() {
        let request = actix_test::TestRequest::post()
            .uri("/reflection")
            .set_json(json!({ "greeting": "hi there" }));
        let response = call(StatusPolicy::Flat, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value, json!({ "greeting": "hi there" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn reflection_defaults_missing_greeting_to_empty() {
        let request = actix_test::TestRequest::post()
            .uri("/reflection")
            .set_json(json!({ "salutation": "hi" }));
        let response = call(StatusPolicy::Flat, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value, json!({ "greeting": "" }));
    }

    #[rstest]
    #[case(StatusPolicy::Flat, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(StatusPolicy::Differentiated, StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn reflection_rejects_malformed_json(
        #[case] policy: StatusPolicy,
        #[case] expected: StatusCode,
    ) {
        let request = actix_test::TestRequest::post()
            .uri("/reflection")
            .set_payload("{\"greeting\":");
        let response = call(policy, request).await;
        assert_eq!(response.status(), expected);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert!(value.get("error").and_then(Value::as_str).is_some());
    }
}
