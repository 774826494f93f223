//! Google Sheets v4 HTTP client.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tasklog_core::{CellRef, Error, Result, RetryPolicy, SheetRows, SheetStore, TabName};
use tasklog_gcp_auth::{SCOPE_SPREADSHEETS, SCOPE_SPREADSHEETS_READONLY, TokenProvider};

use crate::wire::{Spreadsheet, UpdateValuesResponse, ValueRange};

/// Root of the spreadsheets collection.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const SERVICE: &str = "sheets";

/// Builder for a [`SheetsClient`] bound to one spreadsheet.
pub struct SheetsClientBuilder {
    spreadsheet_id: String,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    retry: RetryPolicy,
    timeout: Duration,
}

impl SheetsClientBuilder {
    /// Create a builder for `spreadsheet_id`, authenticating with `tokens`.
    pub fn new(spreadsheet_id: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the spreadsheets collection URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the timeout for each HTTP request. The default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client, consuming the builder.
    pub fn build(self) -> Result<SheetsClient> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(Error::config("spreadsheet ID is empty"));
        }
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid Sheets URL {}: {e}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Sheets URL {} cannot carry a path",
                self.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::http_with_source("cannot build HTTP client", e))?;
        Ok(SheetsClient {
            http,
            spreadsheet_id: self.spreadsheet_id,
            base_url,
            tokens: self.tokens,
            retry: self.retry,
        })
    }
}

/// Client for one Google spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
    retry: RetryPolicy,
}

impl SheetsClient {
    /// Start building a client for `spreadsheet_id`.
    pub fn builder(
        spreadsheet_id: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> SheetsClientBuilder {
        SheetsClientBuilder::new(spreadsheet_id, tokens)
    }

    /// The spreadsheet this client reads and writes.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Titles of every tab, in sheet order.
    pub async fn tab_titles(&self) -> Result<Vec<String>> {
        let url = self.url(&[])?;
        let meta: Spreadsheet = self
            .retry
            .run("sheets.get", || {
                self.get_json(&url, &[("fields", "sheets.properties.title")])
            })
            .await?;
        Ok(meta.titles())
    }

    /// Values of `range` (A1 notation) as text rows.
    pub async fn values(&self, range: &str) -> Result<SheetRows> {
        let url = self.url(&["values", range])?;
        let values: ValueRange = self
            .retry
            .run("sheets.values.get", || self.get_json(&url, &[]))
            .await?;
        Ok(values.into_rows())
    }

    /// Writes `value` into `range` as-is (no formula or date parsing).
    pub async fn update_value(&self, range: &str, value: &str) -> Result<u32> {
        let url = self.url(&["values", range])?;
        let body = ValueRange::single(value);
        let response: UpdateValuesResponse = self
            .retry
            .run("sheets.values.update", || async {
                let token = self.tokens.access_token(SCOPE_SPREADSHEETS).await?;
                let response = self
                    .http
                    .put(url.clone())
                    .bearer_auth(token)
                    .query(&[("valueInputOption", "RAW")])
                    .json(&body)
                    .send()
                    .await
                    .map_err(transport_error)?;
                decode::<UpdateValuesResponse>(response).await
            })
            .await?;
        tracing::info!(
            range,
            updated_cells = response.updated_cells,
            "Successfully updated {} cells in the Google Sheet",
            response.updated_cells
        );
        Ok(response.updated_cells)
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Sheets URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, query: &[(&str, &str)]) -> Result<T> {
        let token = self
            .tokens
            .access_token(SCOPE_SPREADSHEETS_READONLY)
            .await?;
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::api(SERVICE, status.as_u16(), body));
    }
    response
        .json()
        .await
        .map_err(|e| Error::decode(format!("{SERVICE} response: {e}")))
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::http_with_source(format!("{SERVICE} request failed"), err)
}

impl fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsClient")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SheetStore for SheetsClient {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        self.tab_titles().await
    }

    async fn rows(&self, tab: &TabName) -> Result<SheetRows> {
        self.values(&tab.rows_range()).await
    }

    async fn cell(&self, cell: &CellRef) -> Result<Option<String>> {
        let rows = self.values(&cell.a1()).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .filter(|value| !value.is_empty()))
    }

    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<u32> {
        self.update_value(&cell.a1(), value).await
    }
}
