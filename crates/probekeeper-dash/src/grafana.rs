//! Grafana dashboard registry

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::error::DashError;
use crate::traits::DashboardRegistry;

/// Dashboard registry backed by the Grafana import API
pub struct GrafanaRegistry {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GrafanaRegistry {
    /// Create a new registry client
    ///
    /// `base_url` is the Grafana root, e.g. `http://grafana:3000`; `token`
    /// an optional API token sent as a bearer header.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Build the import payload for a named dashboard document
    fn import_payload(name: &str, dashboard: &str) -> Result<Value, DashError> {
        let parsed: Value =
            serde_json::from_str(dashboard).map_err(|e| DashError::InvalidDashboard {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(json!({
            "dashboard": parsed,
            "overwrite": true,
            "message": format!("probekeeper update of {name}"),
        }))
    }
}

#[async_trait]
impl DashboardRegistry for GrafanaRegistry {
    #[instrument(skip(self, dashboard))]
    async fn register_dashboard(&self, name: &str, dashboard: &str) -> Result<(), DashError> {
        let payload = Self::import_payload(name, dashboard)?;

        let url = format!("{}/api/dashboards/db", self.base_url);
        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DashError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DashError::Api { status, message });
        }

        info!(name = %name, "registered dashboard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_payload_wraps_dashboard() {
        let payload =
            GrafanaRegistry::import_payload("blackbox", "{\"title\": \"Blackbox\"}").unwrap();

        assert_eq!(payload["dashboard"]["title"], "Blackbox");
        assert_eq!(payload["overwrite"], true);
    }

    #[test]
    fn test_import_payload_rejects_invalid_json() {
        let result = GrafanaRegistry::import_payload("broken", "{not json");

        assert!(matches!(
            result,
            Err(DashError::InvalidDashboard { name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let registry = GrafanaRegistry::new("http://grafana:3000/", None);

        assert_eq!(registry.base_url, "http://grafana:3000");
    }
}
