//! Federal Register documents API.

use crate::config::{HttpConfig, RegistryConfig};
use crate::error::{Result, TrackerError};
use crate::types::{Action, ActionId};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const FIELDS: [&str; 4] = [
    "presidential_document_number",
    "title",
    "publication_date",
    "html_url",
];

/// One search result, restricted to the fields we request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub presidential_document_number: Option<ActionId>,
    pub title: String,
    pub publication_date: String,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct DocumentPage {
    #[serde(default)]
    results: Vec<RegistryDocument>,
    #[serde(default)]
    next_page_url: Option<String>,
}

pub trait RegistrySource {
    fn fetch_documents(&self) -> Result<Vec<RegistryDocument>>;
}

pub struct FederalRegisterClient {
    client: Client,
    config: RegistryConfig,
}

impl FederalRegisterClient {
    pub fn new(config: RegistryConfig, http: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if http.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(http.timeout_secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/documents.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Query pairs for the first page. Array parameters repeat their key.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("per_page", self.config.per_page.to_string()),
            ("order", "newest".to_string()),
            ("conditions[president][]", self.config.president.clone()),
            ("conditions[type][]", "PRESDOCU".to_string()),
        ];
        for kind in &self.config.document_types {
            q.push(("conditions[presidential_document_type][]", kind.clone()));
        }
        q.push((
            "conditions[publication_date][gte]",
            self.config.published_since.clone(),
        ));
        for field in FIELDS {
            q.push(("fields[]", field.to_string()));
        }
        q
    }

    fn get_page(&self, url: &str, query: &[(&str, String)]) -> Result<DocumentPage> {
        tracing::debug!(url, "fetching registry page");
        let mut req = self.client.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json()?)
    }
}

impl RegistrySource for FederalRegisterClient {
    fn fetch_documents(&self) -> Result<Vec<RegistryDocument>> {
        let mut page = self.get_page(&self.search_url(), &self.query())?;
        let mut documents = std::mem::take(&mut page.results);
        let mut pages = 1;

        while let Some(next) = page.next_page_url.take() {
            if pages >= self.config.max_pages {
                tracing::warn!(pages, "stopping at registry.max_pages; later results not fetched");
                break;
            }
            page = self.get_page(&next, &[])?;
            documents.append(&mut page.results);
            pages += 1;
        }

        tracing::info!(count = documents.len(), pages, "fetched registry documents");
        Ok(documents)
    }
}

/// Turn registry documents into actions with default status and no
/// challenges. Documents without a presidential document number cannot be
/// identified and are skipped.
pub fn format_documents(documents: Vec<RegistryDocument>) -> Vec<Action> {
    documents
        .into_iter()
        .filter_map(|doc| match doc.presidential_document_number {
            Some(id) => Some(Action::new(id, doc.title, doc.publication_date, doc.html_url)),
            None => {
                tracing::warn!(title = %doc.title, "registry document has no number, skipping");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
