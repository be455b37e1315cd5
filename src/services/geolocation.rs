use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::GeolocationConfig;
use crate::error::StatsError;

pub const IPINFO_URL: &str = "https://ipinfo.io/json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub region: String,
    pub country: String,
    #[serde(rename = "ip")]
    pub ip_address: String,
    #[serde(rename = "org")]
    pub organization: String,
}

impl LocationInfo {
    /// `City, Region, Country`
    pub fn display(&self) -> String {
        format!("{}, {}, {}", self.city, self.region, self.country)
    }
}

/// Looks up the public address of this host. One call per invocation,
/// no retry, no caching.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<LocationInfo, StatsError>;
}

#[derive(Clone)]
pub struct IpInfoClient {
    client: Client,
    url: String,
}

impl IpInfoClient {
    pub fn new(config: &GeolocationConfig) -> Self {
        Self::with_url(IPINFO_URL, config)
    }

    pub fn with_url(url: &str, config: &GeolocationConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            client: builder.build().unwrap_or_default(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpInfoClient {
    async fn locate(&self) -> Result<LocationInfo, StatsError> {
        debug!(url = %self.url, "Requesting geolocation");

        let info = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<LocationInfo>()
            .await?;

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, config: &GeolocationConfig) -> IpInfoClient {
        IpInfoClient::with_url(&format!("{}/json", server.uri()), config)
    }

    fn body() -> serde_json::Value {
        serde_json::json!({
            "ip": "203.0.113.7",
            "hostname": "node1.example.net",
            "city": "Frankfurt am Main",
            "region": "Hesse",
            "country": "DE",
            "loc": "50.1155,8.6842",
            "org": "AS24940 Hetzner Online GmbH",
            "timezone": "Europe/Berlin"
        })
    }

    #[tokio::test]
    async fn test_locate_parses_ipinfo_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &GeolocationConfig::default());
        let info = client.locate().await.unwrap();

        assert_eq!(info.ip_address, "203.0.113.7");
        assert_eq!(info.organization, "AS24940 Hetzner Online GmbH");
        assert_eq!(info.display(), "Frankfurt am Main, Hesse, DE");
    }

    #[tokio::test]
    async fn test_locate_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, &GeolocationConfig::default());
        let err = client.locate().await.unwrap_err();
        assert!(err.to_string().contains("503"), "{}", err);
    }

    #[tokio::test]
    async fn test_locate_fails_on_missing_fields() {
        let server = MockServer::start().await;
        let partial = serde_json::json!({ "ip": "203.0.113.7" });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial))
            .mount(&server)
            .await;

        let client = client_for(&server, &GeolocationConfig::default());
        assert!(client.locate().await.is_err());
    }

    #[tokio::test]
    async fn test_locate_honours_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = GeolocationConfig {
            timeout_secs: Some(1),
        };
        let client = client_for(&server, &config);
        assert!(client.locate().await.is_err());
    }
}
