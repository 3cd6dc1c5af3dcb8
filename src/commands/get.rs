//! `get`: read one resource path

use anyhow::{Context as AnyhowContext, Result};
use declarative::{BatchExecutor, ResourcePath, Snapshot, StateReader};
use jsonrpc::{RequestIdSource, SequentialIds, Transport};

use crate::cli::DeviceArgs;

/// Run `srlctl get`
pub fn run(device: &DeviceArgs, path: &str) -> Result<()> {
    let path = ResourcePath::parse(path).context("Invalid resource path")?;
    let transport = super::connect(device)?;
    let snapshot = read(&transport, &SequentialIds::new(), &path)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn read(
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
    path: &ResourcePath,
) -> Result<Snapshot> {
    let executor = BatchExecutor::new(transport, ids);
    StateReader::new(&executor)
        .read(path)
        .with_context(|| format!("Could not read {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc::MemoryTransport;
    use serde_json::json;

    #[test]
    fn test_read_present_and_absent() {
        let device = MemoryTransport::new().with_entry("/system/name/host-name", json!("leaf1"));
        let ids = SequentialIds::new();

        let present = read(&device, &ids, &ResourcePath::parse("/system/name/host-name").unwrap())
            .unwrap();
        assert_eq!(present, Snapshot::Present(json!("leaf1")));

        let absent = read(&device, &ids, &ResourcePath::parse("/system/banner").unwrap()).unwrap();
        assert!(absent.is_absent());
        assert_eq!(serde_json::to_string(&absent).unwrap(), "null");
    }
}
