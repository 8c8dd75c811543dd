//! CourtListener dockets API.

use crate::config::{CourtListenerConfig, HttpConfig};
use crate::error::{Result, TrackerError};
use crate::refresh::DocketLookup;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ApiKey
// ---------------------------------------------------------------------------

/// CourtListener API token. Construction is the credential check: a run that
/// has an `ApiKey` is allowed to touch the network.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: Option<String>) -> Result<Self> {
        match raw.map(|s| s.trim().to_string()) {
            Some(key) if !key.is_empty() => Ok(Self(key)),
            _ => Err(TrackerError::MissingCredential),
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

// ---------------------------------------------------------------------------
// CourtListenerClient
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DocketResponse {
    #[serde(default)]
    date_last_filing: Option<String>,
}

pub struct CourtListenerClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl CourtListenerClient {
    pub fn new(config: &CourtListenerConfig, http: &HttpConfig, api_key: ApiKey) -> Result<Self> {
        let mut builder = Client::builder();
        if http.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(http.timeout_secs));
        }
        let client = builder.user_agent(config.user_agent.clone()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Docket ids are CourtListener primary keys; anything else never reaches
    /// the URL path.
    fn docket_url(&self, docket_id: &str) -> Result<String> {
        if docket_id.is_empty() || !docket_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrackerError::InvalidDocketId(docket_id.to_string()));
        }
        Ok(format!("{}/dockets/{}/", self.base_url, docket_id))
    }

    /// Fetch the docket and read its last filing date. Every failure is
    /// returned so the caller can decide how loudly to report it.
    pub fn fetch_latest_filing(&self, docket_id: &str) -> Result<Option<DateTime<Utc>>> {
        let url = self.docket_url(docket_id)?;
        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key.expose()))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }
        let body: DocketResponse = resp.json()?;
        Ok(body.date_last_filing.as_deref().and_then(parse_filing_date))
    }
}

impl DocketLookup for CourtListenerClient {
    fn latest_filing(&self, docket_id: &str) -> Option<DateTime<Utc>> {
        match self.fetch_latest_filing(docket_id) {
            Ok(Some(ts)) => Some(ts),
            Ok(None) => {
                tracing::warn!(docket = %docket_id, "docket has no usable date_last_filing");
                None
            }
            Err(e) => {
                tracing::warn!(docket = %docket_id, error = %e, "docket lookup failed");
                None
            }
        }
    }
}

/// `YYYY-MM-DD` as midnight UTC. Full RFC 3339 timestamps are accepted too.
pub fn parse_filing_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
