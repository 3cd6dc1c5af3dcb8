//! # jsonrpc
//!
//! JSON-RPC 2.0 plumbing for path-addressed network device APIs.
//!
//! This crate provides:
//! - The request/response envelope ([`Request`], [`Response`], [`Command`])
//! - Request identifier sources ([`RequestIdSource`], [`SequentialIds`])
//! - The [`Transport`] seam with an HTTP implementation and two test doubles
//!
//! Transports only move payloads. Interpreting `result` and `error` is left
//! to the caller.
//!
//! ## Example
//!
//! ```
//! use jsonrpc::{Command, Method, Request, RequestIdSource, SequentialIds};
//! use jsonrpc::transport::{Transport, memory::MemoryTransport};
//! use serde_json::json;
//!
//! let device = MemoryTransport::new().with_entry("/system/name/host-name", json!("srl01"));
//! let ids = SequentialIds::new();
//!
//! let request = Request::new(Method::Get, vec![Command::get("/system/name/host-name")], ids.next_id());
//! let response = device.post(&request.to_payload().unwrap()).unwrap();
//! assert_eq!(response["result"]["/system/name/host-name"]["value"], "srl01");
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod transport;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use ids::{RequestIdSource, SequentialIds};
pub use transport::memory::{MemoryTransport, ResultShape};
pub use transport::{MockTransport, Transport};
pub use types::{Action, Command, JSON_RPC_VERSION, Method, Params, Request, Response};
