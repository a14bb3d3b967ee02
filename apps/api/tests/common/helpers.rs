//! Request and response helpers for API integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use serde_json::Value;

/// Build a `POST /graphql` request, optionally with an Authorization header
pub fn graphql_request(query: &str, variables: Value, authorization: Option<&str>) -> Request<Body> {
    let body = serde_json::json!({ "query": query, "variables": variables });
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Parse response body as JSON
pub async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Error code of the first GraphQL error, if any
pub fn first_error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

/// Titles of an `allBooks` result, in order
pub fn titles(response: &Value) -> Vec<String> {
    response["data"]["allBooks"]
        .as_array()
        .map(|books| {
            books
                .iter()
                .filter_map(|b| b["title"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
