//! Client for the API Ninjas phone intelligence endpoints.
//
// Two operations are consumed: phone validation (which also yields the
// number's country and candidate timezones) and current-time lookup for a
// timezone. Both require the API key from process configuration.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{ContactError, ContactResult};

/// Validation result for a phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timezones: Vec<String>,
}

/// Current-time lookup result for a timezone.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldTime {
    pub datetime: String,
}

/// Phone intelligence operations the resolvers need.
///
/// Behind a trait so tests can substitute a stub instead of making live
/// network calls.
#[async_trait]
pub trait PhoneApi: Send + Sync {
    async fn validate_number(&self, number: &str) -> ContactResult<PhoneValidation>;

    async fn current_time(&self, timezone: &str) -> ContactResult<WorldTime>;
}

/// Live client against api-ninjas.com.
pub struct ApiNinjas {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ApiNinjas {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.phone_api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn get<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> ContactResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::UpstreamStatus(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PhoneApi for ApiNinjas {
    async fn validate_number(&self, number: &str) -> ContactResult<PhoneValidation> {
        self.get("validatephone", &[("number", number)]).await
    }

    async fn current_time(&self, timezone: &str) -> ContactResult<WorldTime> {
        self.get("worldtime", &[("timezone", timezone)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_payload_shape() {
        // Payload as documented by api-ninjas; extra fields must not break us.
        let payload = r#"{
            "is_valid": true,
            "is_formatted_properly": true,
            "country": "United States",
            "location": "California",
            "timezones": ["America/Los_Angeles"],
            "format_national": "(415) 867 5309",
            "format_international": "+1 415-867-5309"
        }"#;
        let parsed: PhoneValidation = serde_json::from_str(payload).unwrap();
        assert!(parsed.is_valid);
        assert_eq!(parsed.country, "United States");
        assert_eq!(parsed.timezones, vec!["America/Los_Angeles".to_string()]);
    }

    #[test]
    fn test_invalid_number_payload_omits_details() {
        let payload = r#"{"is_valid": false}"#;
        let parsed: PhoneValidation = serde_json::from_str(payload).unwrap();
        assert!(!parsed.is_valid);
        assert!(parsed.country.is_empty());
        assert!(parsed.timezones.is_empty());
    }

    #[test]
    fn test_worldtime_payload_shape() {
        let payload = r#"{
            "timezone": "Europe/Madrid",
            "datetime": "2024-01-01 00:00:00",
            "date": "2024-01-01",
            "time": "00:00:00"
        }"#;
        let parsed: WorldTime = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.datetime, "2024-01-01 00:00:00");
    }
}
