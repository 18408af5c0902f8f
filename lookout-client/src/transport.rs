//! Transport seam
//!
//! Everything above this layer deals in [`ApiRequest`] / [`ApiResponse`]
//! values; only [`HttpTransport`] knows about reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A fully resolved request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response
    ///
    /// Only network failures are errors here; non-2xx statuses are returned
    /// as responses.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport honoring the configured timeout and token
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config.token.clone()))
    }

    /// Wrap a preconfigured reqwest client
    pub fn with_client(client: Client, token: Option<String>) -> Self {
        Self { client, token }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::page_query;
    use lookout_core::dto::page::PageRequest;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(token: Option<&str>) -> HttpTransport {
        HttpTransport::with_client(Client::new(), token.map(str::to_string))
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token_and_repeated_query_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/observability/v1/runs"))
            .and(header("authorization", "Bearer secret"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": [], "total": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        let query = page_query(&PageRequest::new(0, 20).with_filter("status", json!(["A", "B"])));
        let request = ApiRequest::new(Method::Get, format!("{}/observability/v1/runs", server.uri()))
            .with_query(query);

        let response = transport(Some("secret")).send(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            serde_json::from_str::<Value>(&response.body).unwrap(),
            json!({ "entities": [], "total": 0 })
        );

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].url.query(), Some("page=1&count=20&status=A&status=B"));
    }

    #[tokio::test]
    async fn test_patch_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/observability/v1/projects/42"))
            .and(body_json(json!({ "name": "renamed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "renamed" })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::new(
            Method::Patch,
            format!("{}/observability/v1/projects/42", server.uri()),
        )
        .with_body(json!({ "name": "renamed" }));

        let response = transport(None).send(request).await.unwrap();
        assert!(response.is_success());

        let received = server.received_requests().await.unwrap();
        assert!(!received[0].headers.contains_key("authorization"));
        assert_eq!(
            received[0]
                .headers
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such project"))
            .mount(&server)
            .await;

        let request = ApiRequest::new(
            Method::Delete,
            format!("{}/observability/v1/projects/42", server.uri()),
        );

        let response = transport(Some("secret")).send(request).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "no such project");
        assert!(!response.is_success());
    }
}
