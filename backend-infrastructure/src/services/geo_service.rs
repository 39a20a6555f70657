// Geolocation lookup over the provider's `GET /<ip>/json` endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use backend_domain::ports::GeoLookup;
use backend_domain::GeoInfo;

pub struct HttpGeoService {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGeoService {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token,
        }
    }
}

/// Provider response body; missing fields stay empty.
#[derive(Debug, Default, Deserialize)]
struct ProviderGeo {
    #[serde(default)]
    country: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    city: String,
}

impl From<ProviderGeo> for GeoInfo {
    fn from(value: ProviderGeo) -> Self {
        GeoInfo {
            country: value.country,
            region: value.region,
            city: value.city,
        }
    }
}

#[async_trait]
impl GeoLookup for HttpGeoService {
    async fn lookup(&self, ip: &str) -> anyhow::Result<GeoInfo> {
        let mut url = format!("{}/{}/json", self.base_url.trim_end_matches('/'), ip);
        if let Some(token) = &self.token {
            url.push_str(&format!("?token={}", token));
        }
        let body: ProviderGeo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_body_parses_with_missing_fields() {
        let full: ProviderGeo =
            serde_json::from_str(r#"{"country":"CZ","region":"Jihomoravský kraj","city":"Brno"}"#)
                .expect("parse");
        let info = GeoInfo::from(full);
        assert_eq!(info.country, "CZ");
        assert_eq!(info.city, "Brno");

        let partial: ProviderGeo =
            serde_json::from_str(r#"{"country":"DE","bogon":false}"#).expect("parse");
        let info = GeoInfo::from(partial);
        assert_eq!(info.country, "DE");
        assert_eq!(info.region, "");
    }
}
