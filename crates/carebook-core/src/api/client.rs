//! Client for an openiban-style bank lookup service.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::iban;

use super::BankLookupError;

// ============================================================================
// Constants
// ============================================================================

/// Public lookup service used when the configuration names none.
pub const DEFAULT_BASE_URL: &str = "https://openiban.com";

/// HTTP request timeout in seconds when the configuration names none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "bankData", default)]
    bank_data: Option<BankData>,
}

#[derive(Debug, Deserialize)]
struct BankData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bic: Option<String>,
}

/// What the lookup service knows about an IBAN's bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub name: Option<String>,
    pub bic: Option<String>,
}

impl BankInfo {
    fn from_response(response: LookupResponse) -> Self {
        let non_empty = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let data = response.bank_data;
        Self {
            name: non_empty(data.as_ref().and_then(|d| d.name.clone())),
            bic: non_empty(data.and_then(|d| d.bic)),
        }
    }

    /// Display line: `name (BIC)`, the name alone, or `placeholder` when the
    /// service returned no name.
    pub fn describe(&self, placeholder: &str) -> String {
        match (&self.name, &self.bic) {
            (Some(name), Some(bic)) => format!("{} ({})", name, bic),
            (Some(name), None) => name.clone(),
            (None, _) => placeholder.to_string(),
        }
    }
}

/// Client for the bank lookup service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct BankLookupClient {
    client: Client,
    base_url: String,
}

impl BankLookupClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn lookup_url(&self, compact_iban: &str) -> String {
        format!(
            "{}/validate/{}?getBIC=true&validateBankCode=true",
            self.base_url, compact_iban
        )
    }

    /// Ask the service for the bank behind a structurally valid IBAN.
    pub async fn lookup(&self, iban: &str) -> Result<BankInfo, BankLookupError> {
        iban::validate(iban)?;
        let url = self.lookup_url(&iban::compact(iban));
        debug!(url = %url, "Looking up bank");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let body = response.text().await?;
        let parsed: LookupResponse = serde_json::from_str(&body)
            .map_err(|e| BankLookupError::InvalidResponse(e.to_string()))?;

        Ok(BankInfo::from_response(parsed))
    }

    /// Best-effort lookup. Any failure, including an invalid IBAN, yields
    /// `None` and is only logged.
    pub async fn enrich(&self, iban: &str) -> Option<BankInfo> {
        match self.lookup(iban).await {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(error = %e, "Bank lookup failed");
                None
            }
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, BankLookupError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(BankLookupError::from_status(status, &body))
        }
    }
}
