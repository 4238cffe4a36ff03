//! JSON loaders for profiles and ground-truth labels.
//!
//! Accepted document shapes:
//!
//! - a list of records
//! - an object wrapping the list under `profiles` / `labels` / `data`
//! - a single record object
//!
//! A bad record is rejected and counted; the rest of the batch still loads.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use personality_knot_core::{Dimension, KnotError, TraitProfile};
use serde::Serialize;
use serde_json::{Map, Value};

use super::ground_truth::GroundTruthLabel;
use crate::error::{BenchError, BenchResult};

const PROFILE_WRAPPERS: [&str; 2] = ["profiles", "data"];
const LABEL_WRAPPERS: [&str; 3] = ["labels", "ground_truth", "data"];

/// A record that was not loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// Position in the source list.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Accepted items plus rejections.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport<T> {
    pub items: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> LoadReport<T> {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

pub struct ProfileLoader;

impl ProfileLoader {
    pub fn load_profiles(path: impl AsRef<Path>) -> BenchResult<LoadReport<TraitProfile>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let report = Self::profiles_from_str(&text, path)?;
        tracing::info!(
            path = %path.display(),
            loaded = report.items.len(),
            rejected = report.rejected_count(),
            "loaded profiles"
        );
        Ok(report)
    }

    pub fn profiles_from_str(text: &str, source: &Path) -> BenchResult<LoadReport<TraitProfile>> {
        let doc: Value = serde_json::from_str(text)?;
        let records = extract_records(doc, &PROFILE_WRAPPERS, source)?;

        let mut seen = HashSet::new();
        let mut report = LoadReport {
            items: Vec::with_capacity(records.len()),
            rejected: Vec::new(),
        };
        for (index, record) in records.iter().enumerate() {
            match parse_profile(record) {
                Ok(profile) if !seen.insert(profile.id().to_string()) => {
                    reject(&mut report.rejected, index, Some(profile.id().to_string()), "duplicate profile id");
                }
                Ok(profile) => report.items.push(profile),
                Err(err) => reject(&mut report.rejected, index, record_id(record), &err.to_string()),
            }
        }
        Ok(report)
    }

    pub fn load_labels(path: impl AsRef<Path>) -> BenchResult<LoadReport<GroundTruthLabel>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let report = Self::labels_from_str(&text, path)?;
        tracing::info!(
            path = %path.display(),
            loaded = report.items.len(),
            rejected = report.rejected_count(),
            "loaded ground-truth labels"
        );
        Ok(report)
    }

    pub fn labels_from_str(text: &str, source: &Path) -> BenchResult<LoadReport<GroundTruthLabel>> {
        let doc: Value = serde_json::from_str(text)?;
        let records = extract_records(doc, &LABEL_WRAPPERS, source)?;

        let mut report = LoadReport {
            items: Vec::with_capacity(records.len()),
            rejected: Vec::new(),
        };
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<GroundTruthLabel>(record) {
                Ok(label) if !(0.0..=1.0).contains(&label.compatibility_score) => {
                    let reason = format!("compatibility_score {} outside [0, 1]", label.compatibility_score);
                    reject(&mut report.rejected, index, Some(label.id_a), &reason);
                }
                Ok(label) => report.items.push(label),
                Err(err) => reject(&mut report.rejected, index, None, &err.to_string()),
            }
        }
        Ok(report)
    }
}

fn reject(rejected: &mut Vec<Rejection>, index: usize, id: Option<String>, reason: &str) {
    tracing::warn!(index, id = ?id, reason, "rejected record");
    rejected.push(Rejection {
        index,
        id,
        reason: reason.to_string(),
    });
}

fn extract_records(doc: Value, wrappers: &[&str], source: &Path) -> BenchResult<Vec<Value>> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in wrappers {
                if let Some(Value::Array(_)) = map.get(*key) {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return Ok(items);
                    }
                }
            }
            Ok(vec![Value::Object(map)])
        }
        other => Err(BenchError::UnsupportedFormat {
            path: source.to_path_buf(),
            reason: format!("expected a list or object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn record_id(record: &Value) -> Option<String> {
    let map = record.as_object()?;
    ["user_id", "id"].iter().find_map(|k| match map.get(*k)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn parse_profile(record: &Value) -> Result<TraitProfile, KnotError> {
    let map = record
        .as_object()
        .ok_or_else(|| KnotError::invalid_param("record", json_kind(record), "expected an object"))?;
    let id = record_id(record).unwrap_or_default();
    if id.trim().is_empty() {
        return Err(KnotError::EmptyProfileId);
    }

    let dimensions: &Map<String, Value> = match map.get("dimensions") {
        Some(Value::Object(dims)) => dims,
        Some(other) => {
            return Err(KnotError::invalid_param("dimensions", json_kind(other), "expected an object"))
        }
        None => map,
    };

    let mut profile = TraitProfile::new(id.clone());
    for (key, value) in dimensions {
        let Some(dim) = Dimension::from_str(key) else {
            continue;
        };
        let number = value
            .as_f64()
            .ok_or_else(|| KnotError::invalid_trait(&id, dim.as_str(), value))?;
        profile = profile.try_with_value(dim, number)?;
    }

    if let Some(Value::String(raw)) = map.get("created_at") {
        match parse_timestamp(raw) {
            Some(ts) => profile = profile.with_created_at(ts),
            None => tracing::debug!(id = %id, raw = %raw, "unparseable created_at ignored"),
        }
    }
    Ok(profile)
}

/// RFC 3339 or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
