//! Immutable data snapshots consumed by the renderer
//!
//! A snapshot is one capture of the business data tree, tagged with an ISO
//! week identifier and a generation timestamp, plus provenance describing
//! which acquisition strategy produced it and whether it is a degraded
//! (fallback) capture.

use chrono::{DateTime, Datelike, Local};
use serde_json::Value;
use std::fmt;

/// Acquisition strategy kinds, mirroring the `data_source.type` config values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HTTP GET against a configured endpoint
    Api,
    /// Local JSON document
    Json,
    /// Reserved; always degrades to the built-in sample
    Database,
    /// Deterministic built-in sample
    Sample,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Api => "api",
            SourceKind::Json => "json",
            SourceKind::Database => "database",
            SourceKind::Sample => "builtin-sample",
        };
        f.write_str(name)
    }
}

/// Where a snapshot came from, and whether the configured strategy failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    /// The strategy that was configured for the run
    pub strategy: SourceKind,
    /// True when the strategy failed and the built-in sample was substituted
    pub degraded: bool,
}

/// One immutable data capture consumed by a single render
#[derive(Debug, Clone)]
pub struct Snapshot {
    data: Value,
    week: String,
    generated_at: DateTime<Local>,
    provenance: Provenance,
}

impl Snapshot {
    /// Build a snapshot from a raw data tree.
    ///
    /// `metadata.week` and `metadata.generated_at` are taken from the data
    /// when present (remote payloads carry their own) and stamped from `now`
    /// otherwise, so the renderer can always resolve them.
    pub fn new(mut data: Value, provenance: Provenance, now: DateTime<Local>) -> Self {
        let week = data
            .pointer("/metadata/week")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| iso_week(now));

        if let Some(meta) = ensure_metadata(&mut data) {
            meta.entry("week").or_insert_with(|| Value::from(week.clone()));
            meta.entry("generated_at")
                .or_insert_with(|| Value::from(now.to_rfc3339()));
        }

        Snapshot {
            data,
            week,
            generated_at: now,
            provenance,
        }
    }

    /// ISO week identifier, e.g. `"2025-W33"`
    pub fn week(&self) -> &str {
        &self.week
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// The full data tree
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Resolve a dotted path like `tckt.overview.receivables.total`.
    ///
    /// Numeric segments index into sequences (`ship_schedule.0.ship_name`).
    /// Returns `None` when any segment is absent; callers are expected to
    /// substitute a safe default rather than fail.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn ensure_metadata(data: &mut Value) -> Option<&mut serde_json::Map<String, Value>> {
    let root = data.as_object_mut()?;
    root.entry("metadata")
        .or_insert_with(|| Value::Object(Default::default()))
        .as_object_mut()
}

/// Format a timestamp as an ISO week identifier (`YYYY-WNN`, ISO year)
pub fn iso_week(now: DateTime<Local>) -> String {
    let week = now.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn provenance() -> Provenance {
        Provenance {
            strategy: SourceKind::Sample,
            degraded: false,
        }
    }

    #[test]
    fn test_week_stamped_when_absent() {
        let now = Local.with_ymd_and_hms(2025, 8, 13, 9, 0, 0).unwrap();
        let snapshot = Snapshot::new(json!({"tckt": {}}), provenance(), now);
        assert_eq!(snapshot.week(), "2025-W33");
        assert_eq!(
            snapshot.lookup("metadata.week").and_then(Value::as_str),
            Some("2025-W33")
        );
        assert!(snapshot.lookup("metadata.generated_at").is_some());
    }

    #[test]
    fn test_week_from_payload_preserved() {
        let now = Local.with_ymd_and_hms(2025, 8, 13, 9, 0, 0).unwrap();
        let snapshot = Snapshot::new(
            json!({"metadata": {"week": "2025-W01"}}),
            provenance(),
            now,
        );
        assert_eq!(snapshot.week(), "2025-W01");
    }

    #[test]
    fn test_lookup_nested_path() {
        let now = Local::now();
        let snapshot = Snapshot::new(
            json!({"tckt": {"overview": {"receivables": {"total": 112282563}}}}),
            provenance(),
            now,
        );
        assert_eq!(
            snapshot
                .lookup("tckt.overview.receivables.total")
                .and_then(Value::as_i64),
            Some(112282563)
        );
    }

    #[test]
    fn test_lookup_sequence_index() {
        let snapshot = Snapshot::new(
            json!({"ops": {"ship_schedule": [{"ship_name": "MTT LimBang"}]}}),
            provenance(),
            Local::now(),
        );
        assert_eq!(
            snapshot
                .lookup("ops.ship_schedule.0.ship_name")
                .and_then(Value::as_str),
            Some("MTT LimBang")
        );
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let snapshot = Snapshot::new(json!({"tckt": {}}), provenance(), Local::now());
        assert_eq!(snapshot.lookup("tckt.overview.receivables.total"), None);
        assert_eq!(snapshot.lookup("nope.0.nested"), None);
    }

    #[test]
    fn test_iso_week_uses_iso_year() {
        // 2024-12-30 falls in ISO week 1 of 2025
        let now = Local.with_ymd_and_hms(2024, 12, 30, 12, 0, 0).unwrap();
        assert_eq!(iso_week(now), "2025-W01");
    }
}
