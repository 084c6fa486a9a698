//! Airtable records-provider client.
//!
//! Implements [`RecordsProvider`] over the Airtable REST API: paged reads
//! sorted newest-first by the `Created` column, and per-record PATCH
//! writes for the stage, flag, and notes columns. Credentials come from
//! the environment (`AIRTABLE`, `AIRTABLE_BASE_ID`, `AIRTABLE_TABLE_NAME`).
//!
//! All calls are blocking; the binary runs writes on a dedicated worker
//! thread so the input loop never waits on the network.

pub mod fields;

pub use fields::standard_field_map;

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use sift_core::provider::{ProviderError, RawRecord, RecordsPage, RecordsProvider};
use sift_core::stage::Stage;
use std::collections::BTreeMap;
use std::env;

const AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";
const DEFAULT_TABLE_NAME: &str = "Applications";

/// Airtable credentials and table coordinates.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub token: String,
    pub base_id: String,
    pub table_name: String,
}

impl AirtableConfig {
    /// Read configuration from the environment.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Config`] when the token or base id is missing;
    /// the table name defaults to "Applications".
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_vars(
            env::var("AIRTABLE").ok(),
            env::var("AIRTABLE_BASE_ID").ok(),
            env::var("AIRTABLE_TABLE_NAME").ok(),
        )
    }

    fn from_vars(
        token: Option<String>,
        base_id: Option<String>,
        table_name: Option<String>,
    ) -> Result<Self, ProviderError> {
        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
            ProviderError::Config(
                "AIRTABLE token not configured. Set the AIRTABLE environment variable.".into(),
            )
        })?;
        let base_id = base_id.filter(|b| !b.is_empty()).ok_or_else(|| {
            ProviderError::Config(
                "AIRTABLE_BASE_ID not configured. Set the AIRTABLE_BASE_ID environment variable."
                    .into(),
            )
        })?;

        Ok(Self {
            token,
            base_id,
            table_name: table_name
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{AIRTABLE_API_BASE}/{}/{}",
            self.base_id,
            encode_path_component(&self.table_name)
        )
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.table_url(), encode_path_component(record_id))
    }
}

/// The blocking Airtable client.
pub struct AirtableProvider {
    config: AirtableConfig,
}

impl AirtableProvider {
    #[must_use]
    pub const fn new(config: AirtableConfig) -> Self {
        Self { config }
    }

    /// Build a client from environment configuration.
    pub fn from_env() -> Result<Self, ProviderError> {
        AirtableConfig::from_env().map(Self::new)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.token)
    }

    fn patch_fields(
        &self,
        record_id: &str,
        fields: &BTreeMap<&str, JsonValue>,
    ) -> Result<(), ProviderError> {
        let url = self.config.record_url(record_id);
        let response = ureq::request("PATCH", &url)
            .set("Authorization", &self.bearer())
            .send_json(json!({ "fields": fields }));

        match response {
            Ok(_) => Ok(()),
            Err(err) => Err(ProviderError::Write(request_error_detail(err))),
        }
    }
}

impl RecordsProvider for AirtableProvider {
    fn fetch_page(
        &self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<RecordsPage, ProviderError> {
        let mut request = ureq::get(&self.config.table_url())
            .set("Authorization", &self.bearer())
            .query("pageSize", &page_size.clamp(1, 100).to_string())
            .query("sort[0][field]", "Created")
            .query("sort[0][direction]", "desc");
        if let Some(cursor) = cursor {
            request = request.query("offset", cursor);
        }

        let response = request
            .call()
            .map_err(|err| ProviderError::Fetch(request_error_detail(err)))?;
        let body: ListResponse = response
            .into_json()
            .map_err(|err| ProviderError::Fetch(format!("invalid response body: {err}")))?;

        let records = body
            .records
            .into_iter()
            .map(|record| {
                let created_at_us = parse_created_time(&record.created_time).unwrap_or_else(|| {
                    tracing::warn!(
                        record_id = %record.id,
                        created_time = %record.created_time,
                        "record has unparsable creation time"
                    );
                    0
                });
                RawRecord {
                    id: record.id,
                    created_at_us,
                    fields: record.fields,
                }
            })
            .collect();

        Ok(RecordsPage {
            records,
            next_cursor: body.offset,
        })
    }

    fn write_stage(&self, record_id: &str, stage: &Stage) -> Result<(), ProviderError> {
        self.patch_fields(
            record_id,
            &[(fields::STAGE_COLUMN, json!(stage.label()))]
                .into_iter()
                .collect(),
        )
    }

    fn write_flag(&self, record_id: &str, flagged: bool) -> Result<(), ProviderError> {
        self.patch_fields(
            record_id,
            &[(fields::FLAG_COLUMN, json!(flagged))].into_iter().collect(),
        )
    }

    fn write_notes(&self, record_id: &str, notes: &str) -> Result<(), ProviderError> {
        self.patch_fields(
            record_id,
            &[(fields::NOTES_COLUMN, json!(notes))].into_iter().collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<WireRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    id: String,
    #[serde(rename = "createdTime")]
    created_time: String,
    #[serde(default)]
    fields: BTreeMap<String, JsonValue>,
}

/// RFC 3339 creation time to microseconds since the Unix epoch.
fn parse_created_time(raw: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp_micros())
}

/// Human-readable detail for a failed request, preferring the Airtable
/// error envelope's message when one is present.
fn request_error_detail(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let status_text = response.status_text().to_string();
            let message = response
                .into_json::<JsonValue>()
                .ok()
                .and_then(|body| envelope_message(&body))
                .unwrap_or(status_text);
            format!("Airtable API error: {code} - {message}")
        }
        ureq::Error::Transport(transport) => format!("transport error: {transport}"),
    }
}

/// Extract the message from an Airtable error envelope body, if any.
///
/// Airtable returns either `{"error": {"type": ..., "message": ...}}` or
/// `{"error": "NOT_FOUND"}` depending on the failure.
fn envelope_message(body: &JsonValue) -> Option<String> {
    match body.get("error")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Object(obj) => obj
            .get("message")
            .and_then(JsonValue::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

/// Percent-encode one URL path segment (table names contain spaces).
fn encode_path_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}
