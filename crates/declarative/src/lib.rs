//! # Declarative
//!
//! Declarative configuration reconciliation over path-addressed JSON-RPC.
//!
//! This crate provides the domain-agnostic engine: callers describe desired
//! items, the engine reads what the device has, drops what already matches
//! and sends the rest as one ordered `set` per item.
//!
//! ## Core Concepts
//!
//! - **ResourcePath**: key-qualified address of one configuration node
//! - **Resource**: one desired item that compiles itself into a [`Plan`]
//! - **Snapshot**: current state at a path, `Absent` or `Present(value)`
//! - **BatchExecutor**: wraps operations in `get`/`set` envelopes
//! - **reconcile**: drives every item to `NoopDone`, `DryRunReported` or
//!   `Executed`
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     reconcile, Document, Mode, NoProgress, Plan, ReconcileOptions, Resource, ResourcePath,
//!     Result,
//! };
//! use jsonrpc::{MemoryTransport, SequentialIds};
//!
//! #[derive(Debug)]
//! struct Hostname(String);
//!
//! impl Resource for Hostname {
//!     fn id(&self) -> String { self.0.clone() }
//!     fn resource_type(&self) -> &'static str { "hostname" }
//!
//!     fn compile(&self, mode: Mode) -> Result<Plan> {
//!         let path = ResourcePath::new("system").child("name").child("host-name");
//!         let mut plan = Plan::new(self.resource_type(), self.id(), path.clone());
//!         match mode {
//!             Mode::Merged => plan.update(path, serde_json::json!(self.0)),
//!             Mode::Deleted => plan.delete(path),
//!         };
//!         Ok(plan)
//!     }
//! }
//!
//! let device = MemoryTransport::new();
//! let ids = SequentialIds::new();
//! let resources: Vec<Box<dyn Resource>> = vec![Box::new(Hostname("leaf1".into()))];
//!
//! let first = reconcile(&resources, &device, &ids, ReconcileOptions::default(), &mut NoProgress)?;
//! assert!(first.changed);
//!
//! let second = reconcile(&resources, &device, &ids, ReconcileOptions::default(), &mut NoProgress)?;
//! assert!(!second.changed);
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`jsonrpc::Transport`]: moves request payloads to the device
//! - [`jsonrpc::RequestIdSource`]: hands out request identifiers
//! - [`ProgressCallback`]: receives per-item progress updates
//!
//! This allows the crate to be used without hard dependencies on a specific
//! HTTP stack or UI framework.

pub mod compiler;
pub mod context;
pub mod diff;
pub mod driver;
pub mod error;
pub mod executor;
pub mod path;
pub mod reader;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use compiler::{Document, Guard, Plan, Step};
pub use context::{NoProgress, ProgressCallback, ReconcileOptions};
pub use diff::{DiffSummary, is_noop, is_submatch};
pub use driver::{reconcile, run_plan};
pub use error::{Error, Result};
pub use executor::BatchExecutor;
pub use path::{Key, KeyValue, ResourcePath, Segment};
pub use reader::{StateReader, normalize};
pub use resource::{BoxedResource, Resource};
pub use types::{ItemResult, Mode, Operation, Outcome, Report, Snapshot, Summary};
