//! State reader - fetches and normalizes current device state
//!
//! `get` results come back either as a document mapping path strings to
//! `{"value": ...}` entries, or as a sequence of such documents. Every
//! shape is folded into a [`Snapshot`] here so nothing downstream has to
//! care.

use crate::error::Result;
use crate::executor::BatchExecutor;
use crate::path::ResourcePath;
use crate::types::Snapshot;
use serde_json::Value;
use std::collections::HashMap;

/// Reads snapshots through a [`BatchExecutor`]
pub struct StateReader<'e, 'a> {
    executor: &'e BatchExecutor<'a>,
}

impl<'e, 'a> StateReader<'e, 'a> {
    pub fn new(executor: &'e BatchExecutor<'a>) -> Self {
        Self { executor }
    }

    /// Read one path with a single-path `get`
    pub fn read(&self, path: &ResourcePath) -> Result<Snapshot> {
        let result = self.executor.query(std::slice::from_ref(path))?;
        Ok(normalize(&result, path))
    }

    /// Whether anything is configured at `path`
    pub fn exists(&self, path: &ResourcePath) -> Result<bool> {
        Ok(self.read(path)?.is_present())
    }

    /// Read several paths, one single-path `get` each
    ///
    /// Duplicate paths are queried once. Every requested path has an entry
    /// in the returned map.
    pub fn read_many(&self, paths: &[ResourcePath]) -> Result<HashMap<ResourcePath, Snapshot>> {
        let mut unique: Vec<ResourcePath> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(path) {
                unique.push(path.clone());
            }
        }
        unique
            .into_iter()
            .map(|path| {
                let snapshot = self.read(&path)?;
                Ok((path, snapshot))
            })
            .collect()
    }
}

/// Extract the snapshot for `path` from a `get` result
///
/// A sequence is searched element by element for the path key. An empty
/// sequence, a missing key, a null entry and a null `value` all mean
/// [`Snapshot::Absent`].
pub fn normalize(result: &Value, path: &ResourcePath) -> Snapshot {
    let key = path.to_string();
    let entry = match result {
        Value::Array(items) => items.iter().find_map(|item| item.get(&key)),
        document => document.get(&key),
    };
    let Some(entry) = entry else {
        return Snapshot::Absent;
    };

    match entry {
        Value::Object(fields) if fields.len() == 1 && fields.contains_key("value") => {
            Snapshot::from(fields.get("value").cloned())
        }
        other => Snapshot::from(Some(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc::{MemoryTransport, MockTransport, ResultShape, SequentialIds};
    use serde_json::json;

    fn blue() -> ResourcePath {
        ResourcePath::new("network-instance").with_key("name", "blue")
    }

    const BLUE: &str = "/network-instance[name=\"blue\"]";

    #[test]
    fn test_normalize_document_and_sequence_alike() {
        let doc = json!({BLUE: {"value": {"type": "ip-vrf"}}});
        let seq = json!([{BLUE: {"value": {"type": "ip-vrf"}}}]);
        let expected = Snapshot::Present(json!({"type": "ip-vrf"}));
        assert_eq!(normalize(&doc, &blue()), expected);
        assert_eq!(normalize(&seq, &blue()), expected);
    }

    #[test]
    fn test_normalize_searches_every_sequence_element() {
        let red = ResourcePath::new("network-instance").with_key("name", "red");
        let result = json!([
            {"/network-instance[name=\"red\"]": {"value": {"type": "mac-vrf"}}},
            {BLUE: {"value": {"type": "ip-vrf"}}}
        ]);
        assert_eq!(normalize(&result, &blue()), Snapshot::Present(json!({"type": "ip-vrf"})));
        assert_eq!(normalize(&result, &red), Snapshot::Present(json!({"type": "mac-vrf"})));

        let one_per_command = json!([{}, {BLUE: {"value": {}}}]);
        assert_eq!(normalize(&one_per_command, &blue()), Snapshot::Present(json!({})));
        assert!(normalize(&one_per_command, &red).is_absent());
    }

    #[test]
    fn test_normalize_absent_forms() {
        assert!(normalize(&json!([]), &blue()).is_absent());
        assert!(normalize(&json!({}), &blue()).is_absent());
        assert!(normalize(&Value::Null, &blue()).is_absent());
        assert!(normalize(&json!({BLUE: null}), &blue()).is_absent());
        assert!(normalize(&json!({BLUE: {"value": null}}), &blue()).is_absent());
    }

    #[test]
    fn test_normalize_empty_container_is_present() {
        let snapshot = normalize(&json!({BLUE: {"value": {}}}), &blue());
        assert_eq!(snapshot, Snapshot::Present(json!({})));
    }

    #[test]
    fn test_normalize_unwrapped_entry() {
        let snapshot = normalize(&json!({BLUE: {"type": "ip-vrf", "admin-state": "enable"}}), &blue());
        assert_eq!(
            snapshot,
            Snapshot::Present(json!({"type": "ip-vrf", "admin-state": "enable"}))
        );
    }

    #[test]
    fn test_read_issues_single_path_get() {
        let mock = MockTransport::new();
        mock.respond_result(json!([]));
        let ids = SequentialIds::new();
        let executor = BatchExecutor::new(&mock, &ids);

        let snapshot = StateReader::new(&executor).read(&blue()).unwrap();
        assert!(snapshot.is_absent());

        let request = &mock.requests()[0];
        assert_eq!(request.params.commands.len(), 1);
        assert_eq!(request.params.commands[0].path, BLUE);
    }

    #[test]
    fn test_exists_against_memory_device() {
        for shape in [ResultShape::Document, ResultShape::Sequence, ResultShape::PerCommand] {
            let device = MemoryTransport::new()
                .with_shape(shape)
                .with_entry(BLUE, json!({"type": "ip-vrf"}));
            let ids = SequentialIds::new();
            let executor = BatchExecutor::new(&device, &ids);
            let reader = StateReader::new(&executor);

            assert!(reader.exists(&blue()).unwrap());
            let red = ResourcePath::new("network-instance").with_key("name", "red");
            assert!(!reader.exists(&red).unwrap());
        }
    }

    #[test]
    fn test_read_many_dedupes_and_covers_all() {
        for shape in [ResultShape::Document, ResultShape::Sequence, ResultShape::PerCommand] {
            let device = MemoryTransport::new()
                .with_shape(shape)
                .with_entry(BLUE, json!({"type": "ip-vrf"}));
            let ids = SequentialIds::new();
            let executor = BatchExecutor::new(&device, &ids);
            let red = ResourcePath::new("network-instance").with_key("name", "red");

            let snapshots = StateReader::new(&executor)
                .read_many(&[blue(), red.clone(), blue()])
                .unwrap();

            assert_eq!(snapshots.len(), 2);
            assert!(snapshots[&blue()].is_present());
            assert!(snapshots[&red].is_absent());
            let requests = device.requests();
            assert_eq!(requests.len(), 2);
            assert!(requests.iter().all(|r| r.params.commands.len() == 1));
        }
    }

    #[test]
    fn test_read_many_sequence_reply_per_path() {
        let mock = MockTransport::new();
        mock.respond_result(json!([{BLUE: {"value": {"type": "ip-vrf"}}}]));
        mock.respond_result(json!([{}]));
        let ids = SequentialIds::new();
        let executor = BatchExecutor::new(&mock, &ids);
        let red = ResourcePath::new("network-instance").with_key("name", "red");

        let snapshots = StateReader::new(&executor)
            .read_many(&[blue(), red.clone()])
            .unwrap();

        assert_eq!(snapshots[&blue()], Snapshot::Present(json!({"type": "ip-vrf"})));
        assert!(snapshots[&red].is_absent());
    }
}
