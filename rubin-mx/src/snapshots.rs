//! Named analysis snapshots and their structural diffs

use chrono::{DateTime, Utc};
use rubin_common::analysis::AudioAnalysis;
use rubin_common::{Error, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub captured_at: DateTime<Utc>,
    pub analysis: AudioAnalysis,
}

/// Shared in-memory snapshot store; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `analysis` under `name`, replacing any earlier snapshot
    pub async fn insert(&self, name: impl Into<String>, analysis: AudioAnalysis) -> Snapshot {
        let snapshot = Snapshot {
            name: name.into(),
            captured_at: Utc::now(),
            analysis,
        };
        let replaced = self
            .inner
            .write()
            .await
            .insert(snapshot.name.clone(), snapshot.clone())
            .is_some();
        info!(snapshot = %snapshot.name, replaced, "Stored snapshot");
        snapshot
    }

    pub async fn get(&self, name: &str) -> Option<Snapshot> {
        self.inner.read().await.get(name).cloned()
    }

    /// Snapshot names, sorted
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Per-metric differences from snapshot `a` to snapshot `b`
    pub async fn compare(&self, a: &str, b: &str) -> Result<Value> {
        let snapshots = self.inner.read().await;
        let first = snapshots
            .get(a)
            .ok_or_else(|| Error::NotFound(format!("snapshot '{}'", a)))?;
        let second = snapshots
            .get(b)
            .ok_or_else(|| Error::NotFound(format!("snapshot '{}'", b)))?;

        Ok(diff(
            &serde_json::to_value(&first.analysis)?,
            &serde_json::to_value(&second.analysis)?,
        ))
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Recursive structural diff of two JSON values
///
/// Objects recurse key by key (keys of `a` drive the walk). Numeric leaves
/// become `{a, b, delta}`, arrays `{a, b, delta[]}` with element-wise deltas
/// over the shorter length, anything else `{a, b}`.
pub fn diff(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let fields: Map<String, Value> = left
                .iter()
                .map(|(key, va)| (key.clone(), diff(va, right.get(key).unwrap_or(&Value::Null))))
                .collect();
            Value::Object(fields)
        }
        (Value::Array(left), Value::Array(right)) => {
            let delta: Vec<Value> = left
                .iter()
                .zip(right)
                .map(|(va, vb)| match (va.as_f64(), vb.as_f64()) {
                    (Some(x), Some(y)) => json!(round6(y - x)),
                    _ => Value::Null,
                })
                .collect();
            json!({ "a": a, "b": b, "delta": delta })
        }
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => json!({ "a": a, "b": b, "delta": round6(y - x) }),
            _ => json!({ "a": a, "b": b }),
        },
        _ => json!({ "a": a, "b": b }),
    }
}
