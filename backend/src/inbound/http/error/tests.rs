//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::header;
use rstest::rstest;
use serde::ser::Error as _;

#[rstest]
#[case(Error::invalid_input("bad"))]
#[case(Error::not_found("missing"))]
#[case(Error::storage_failure("down"))]
#[case(Error::internal("boom"))]
fn flat_policy_always_answers_500(#[case] error: Error) {
    let api_error = StatusPolicy::Flat.reject(error);
    assert_eq!(
        ResponseError::status_code(&api_error),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[rstest]
#[case(Error::invalid_input("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::storage_failure("down"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn differentiated_policy_separates_codes(#[case] error: Error, #[case] expected: StatusCode) {
    let api_error = StatusPolicy::Differentiated.reject(error);
    assert_eq!(ResponseError::status_code(&api_error), expected);
}

#[rstest]
fn policy_defaults_to_flat() {
    assert_eq!(StatusPolicy::default(), StatusPolicy::Flat);
}

#[rstest]
#[case("\"flat\"", StatusPolicy::Flat)]
#[case("\"differentiated\"", StatusPolicy::Differentiated)]
#[case("\"Differentiated\"", StatusPolicy::Differentiated)]
#[case("\"FLAT\"", StatusPolicy::Flat)]
fn policy_deserialises_ignoring_case(#[case] raw: &str, #[case] expected: StatusPolicy) {
    let policy: StatusPolicy = serde_json::from_str(raw).expect("policy");
    assert_eq!(policy, expected);
}

#[rstest]
fn unknown_policy_fails_to_deserialise() {
    let err = serde_json::from_str::<StatusPolicy>("\"strict\"").expect_err("unknown policy");
    assert!(err.to_string().contains("strict"));
}

#[rstest]
fn policy_serialises_as_snake_case() {
    let raw = serde_json::to_string(&StatusPolicy::Differentiated).expect("serialise");
    assert_eq!(raw, "\"differentiated\"");
}

#[rstest]
#[actix_web::test]
async fn error_response_is_json_with_message() {
    let api_error = StatusPolicy::Flat.reject(Error::storage_failure("connection refused"));
    let response = ResponseError::error_response(&api_error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let body = to_bytes(response.into_body()).await.expect("read body");
    let payload: ErrorResponse = serde_json::from_slice(&body).expect("error payload");
    assert_eq!(payload.error, "connection refused");
}

#[rstest]
#[actix_web::test]
async fn encode_failure_falls_back_to_plain_text() {
    let response = encode_error(StatusCode::NOT_FOUND, "missing", |_| {
        Err(serde_json::Error::custom("refused"))
    });

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body()).await.expect("read body");
    assert_eq!(body.as_ref(), ENCODE_FAILURE_BODY.as_bytes());
}

#[rstest]
#[case("flat", StatusPolicy::Flat)]
#[case("Differentiated", StatusPolicy::Differentiated)]
#[case(" differentiated ", StatusPolicy::Differentiated)]
fn policy_parses_from_text(#[case] raw: &str, #[case] expected: StatusPolicy) {
    assert_eq!(raw.parse::<StatusPolicy>(), Ok(expected));
}

#[rstest]
fn unknown_policy_name_is_rejected() {
    let err = "strict".parse::<StatusPolicy>().expect_err("unknown policy");
    assert!(err.to_string().contains("strict"));
}
