//! Candidate model and provider-field mapping.
//!
//! A [`Candidate`] is built once from a [`RawRecord`] and is immutable
//! afterwards except for the two provider-synced reviewer fields (`flag`,
//! `notes`). The [`FieldMap`] translates provider column names to internal
//! attribute keys; columns with no mapping fall back to a derived
//! snake_case key and land in `extra`.

use crate::provider::RawRecord;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Neutral midpoint used when the provider carries no relevance score.
pub const NEUTRAL_SCORE: u8 = 50;

/// Static table translating provider column names to internal attribute
/// keys. Pure, stateless, deterministic.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: BTreeMap<String, String>,
}

impl FieldMap {
    /// Build a map from `(provider column, internal key)` pairs.
    pub fn from_entries<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(column, key)| (column.into(), key.into()))
                .collect(),
        }
    }

    /// Look up the internal key for a provider column, if mapped.
    #[must_use]
    pub fn lookup(&self, column: &str) -> Option<&str> {
        self.entries.get(column).map(String::as_str)
    }

    /// Derive a snake_case key for an unmapped provider column.
    #[must_use]
    pub fn fallback_key(column: &str) -> String {
        column
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// One applicant row, normalized for display and triage.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Provider-assigned record id. Stable and unique.
    pub id: String,
    /// Creation time in microseconds since the Unix epoch.
    pub created_at_us: i64,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub birthday: String,
    pub location: String,
    pub technical: String,
    pub previously_applied: String,
    pub website: String,
    pub video_link: String,
    /// Raw stage string from the provider, absent when untriaged.
    pub remote_stage: Option<String>,
    /// Reviewer notes, provider-synced.
    pub notes: String,
    /// Spotlight flag, provider-synced.
    pub flag: bool,
    /// Relevance score 0–100; [`NEUTRAL_SCORE`] when absent.
    pub score: u8,
    /// Long-form application answers, keyed by internal attribute name.
    pub answers: BTreeMap<String, String>,
    /// Provider columns with no mapping, keyed by derived fallback key.
    pub extra: BTreeMap<String, JsonValue>,
}

impl Candidate {
    /// Normalize a raw provider record into a candidate.
    ///
    /// Missing display fields default to empty strings ("Unknown" /
    /// "No Project" for the name and company headline slots); a combined
    /// "name" column is split into first/last when the separate columns
    /// are absent.
    #[must_use]
    pub fn from_raw(record: &RawRecord, map: &FieldMap) -> Self {
        let mut candidate = Self {
            id: record.id.clone(),
            created_at_us: record.created_at_us,
            first_name: String::new(),
            last_name: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            birthday: String::new(),
            location: String::new(),
            technical: String::new(),
            previously_applied: String::new(),
            website: String::new(),
            video_link: String::new(),
            remote_stage: None,
            notes: String::new(),
            flag: false,
            score: NEUTRAL_SCORE,
            answers: BTreeMap::new(),
            extra: BTreeMap::new(),
        };
        let mut combined_name = String::new();

        for (column, value) in &record.fields {
            match map.lookup(column) {
                Some(key) => {
                    candidate.assign(key, value, &mut combined_name);
                }
                None => {
                    let key = FieldMap::fallback_key(column);
                    candidate.extra.entry(key).or_insert_with(|| value.clone());
                }
            }
        }

        if candidate.first_name.is_empty()
            && candidate.last_name.is_empty()
            && !combined_name.is_empty()
        {
            let mut parts = combined_name.split_whitespace();
            candidate.first_name = parts.next().unwrap_or_default().to_string();
            candidate.last_name = parts.collect::<Vec<_>>().join(" ");
        }

        if candidate.first_name.is_empty() {
            candidate.first_name = "Unknown".to_string();
        }
        if candidate.company.is_empty() {
            candidate.company = "No Project".to_string();
        }

        candidate
    }

    fn assign(&mut self, key: &str, value: &JsonValue, combined_name: &mut String) {
        match key {
            "first_name" => self.first_name = display_text(value),
            "last_name" => self.last_name = display_text(value),
            "name" => *combined_name = display_text(value),
            "company" => self.company = display_text(value),
            "email" => self.email = display_text(value),
            "phone" => self.phone = display_text(value),
            "birthday" => self.birthday = display_text(value),
            "location" => self.location = display_text(value),
            "technical" => self.technical = display_text(value),
            "previously_applied" => self.previously_applied = display_text(value),
            "website" => self.website = display_text(value),
            "video_link" => self.video_link = display_text(value),
            "stage" => {
                let text = display_text(value);
                if !text.is_empty() {
                    self.remote_stage = Some(text);
                }
            }
            "notes" => self.notes = display_text(value),
            "flag" => self.flag = value.as_bool().unwrap_or(false),
            "score" => {
                if let Some(n) = value.as_f64() {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let clamped = n.clamp(0.0, 100.0).round() as u8;
                    self.score = clamped;
                }
            }
            _ => {
                self.answers.insert(key.to_string(), display_text(value));
            }
        }
    }

    /// "First Last" headline, collapsing a missing last name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Flatten a sparse provider value to display text.
fn display_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        JsonValue::Array(items) => items
            .iter()
            .map(display_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        JsonValue::Null | JsonValue::Object(_) => String::new(),
    }
}
