//! Blocking GraphQL transport.
//!
//! One POST per request, JSON in and out. Server-side `errors` arrays become
//! [`RegistryError`]s via [`RegistryError::from_messages`], so config-syntax
//! rejections are classified here rather than by callers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use orbport_core::RegistryError;

/// A GraphQL query or mutation with its variables.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub query: &'static str,
    pub variables: Map<String, Value>,
}

impl Request {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            variables: Map::new(),
        }
    }

    pub fn var(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(key.to_owned(), value.into());
        self
    }
}

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

/// Turn a payload-level `errors` list into a result.
pub fn check_errors(errors: &[ServerError]) -> Result<(), RegistryError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(RegistryError::from_messages(
        errors.iter().map(|e| e.message.clone()).collect(),
    ))
}

/// Resolve `endpoint` against `host`.
///
/// An absolute endpoint URL is used as-is. Otherwise the host must carry an
/// `http://` or `https://` scheme.
pub fn server_address(host: &str, endpoint: &str) -> Result<String, RegistryError> {
    if has_scheme(endpoint) {
        return Ok(endpoint.to_owned());
    }
    if !has_scheme(host) {
        return Err(RegistryError::Address(format!(
            "host ({host}) must be absolute URL, including scheme"
        )));
    }
    let host = host.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.is_empty() {
        return Ok(host.to_owned());
    }
    Ok(format!("{host}/{endpoint}"))
}

fn has_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Blocking client for one GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    agent: ureq::Agent,
    address: String,
    token: Option<String>,
}

impl GraphqlClient {
    pub fn new(
        host: &str,
        endpoint: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let address = server_address(host, endpoint)?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self {
            agent,
            address,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send `request` and decode the `data` member of the response.
    pub fn run<T: DeserializeOwned>(&self, request: &Request) -> Result<T, RegistryError> {
        tracing::debug!(address = %self.address, variables = ?request.variables, "graphql request");

        let mut call = self
            .agent
            .post(&self.address)
            .set("Content-Type", "application/json; charset=utf-8")
            .set("Accept", "application/json; charset=utf-8");
        if let Some(token) = &self.token {
            call = call.set("Authorization", token);
        }

        let response = match call.send_json(request) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(RegistryError::Status {
                    status,
                    reason: response.status_text().to_owned(),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(RegistryError::Transport {
                    address: self.address.clone(),
                    message: transport.to_string(),
                });
            }
        };

        tracing::debug!(
            request_id = response.header("X-Request-Id").unwrap_or("-"),
            status = response.status(),
            "graphql response"
        );

        let envelope: Envelope<T> = response
            .into_json()
            .map_err(|e| RegistryError::Decode(e.to_string()))?;
        check_errors(&envelope.errors)?;
        envelope
            .data
            .ok_or_else(|| RegistryError::Decode("response contained no data".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://circleci.com", "graphql-unstable", "https://circleci.com/graphql-unstable")]
    #[case("https://circleci.com/", "/graphql-unstable", "https://circleci.com/graphql-unstable")]
    #[case("http://localhost:8080", "", "http://localhost:8080")]
    #[case("https://ignored", "https://orbs.internal/api/graphql", "https://orbs.internal/api/graphql")]
    fn resolves_server_address(#[case] host: &str, #[case] endpoint: &str, #[case] want: &str) {
        assert_eq!(server_address(host, endpoint).expect("address"), want);
    }

    #[test]
    fn relative_host_is_rejected() {
        let err = server_address("circleci.com", "graphql-unstable").unwrap_err();
        assert!(matches!(err, RegistryError::Address(_)));
        assert!(err.to_string().contains("must be absolute URL"));
    }

    #[test]
    fn request_serializes_query_and_variables() {
        let req = Request::new("query { x }").var("name", "acme");
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["query"], "query { x }");
        assert_eq!(json["variables"]["name"], "acme");
    }

    #[test]
    fn envelope_errors_are_classified() {
        let envelope: Envelope<Value> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "ERROR IN CONFIG FILE:\nbad"}]}"#,
        )
        .expect("decode");
        let err = check_errors(&envelope.errors).unwrap_err();
        assert!(err.is_config_syntax());
    }

    #[test]
    fn empty_token_is_dropped() {
        let client = GraphqlClient::new(
            "https://circleci.com",
            "graphql-unstable",
            Some(String::new()),
            Duration::from_secs(1),
        )
        .expect("client");
        assert!(client.token.is_none());
        assert_eq!(client.address(), "https://circleci.com/graphql-unstable");
    }
}
