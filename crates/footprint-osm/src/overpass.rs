use async_trait::async_trait;
use footprint_core::config::DEFAULT_USER_AGENT;
use footprint_core::error::Result;
use footprint_core::ports::{GeodataTransport, TransportError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

use crate::http::{build_client, classify, read_body};

/// Overpass API transport
///
/// Queries are sent as `application/x-www-form-urlencoded` with the QL text in
/// the `data` field, which every public Overpass instance accepts.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    /// HTTP client
    client: reqwest::Client,

    /// User-Agent sent with every request
    user_agent: String,
}

impl OverpassClient {
    /// Create a new client identifying itself as `user_agent`
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        Ok(Self { client: build_client(&user_agent)?, user_agent })
    }

    /// Create with the default application User-Agent
    pub fn with_default_agent() -> Result<Self> {
        Self::new(DEFAULT_USER_AGENT)
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Form body carrying an Overpass QL query
pub fn form_body(query: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new()).append_pair("data", query).finish()
}

#[async_trait]
impl GeodataTransport for OverpassClient {
    async fn post_query(
        &self,
        endpoint: &str,
        query: &str,
        timeout: Duration,
    ) -> std::result::Result<String, TransportError> {
        debug!(%endpoint, ?timeout, "POST Overpass query");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(query))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        read_body(response, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_client_creation() {
        let client = OverpassClient::with_default_agent().unwrap();
        assert_eq!(client.user_agent(), "building-density-app");
    }

    #[test]
    fn test_form_body_escapes_query() {
        let body = form_body("[out:json][timeout:120];\nway[\"building\"](around:1000,1,2);");
        assert!(body.starts_with("data="));
        assert!(!body.contains('\n'));
        assert!(!body.contains('"'));
        assert!(body.contains("%5Bout%3Ajson%5D"));
    }

    proptest! {
        #[test]
        fn prop_form_body_is_a_single_data_field(query in ".{0,200}") {
            let body = form_body(&query);
            let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
                .into_owned()
                .collect();
            prop_assert_eq!(pairs.len(), 1);
            prop_assert_eq!(&pairs[0].0, "data");
            prop_assert_eq!(&pairs[0].1, &query);
        }
    }
}
