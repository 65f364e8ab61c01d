//! Async client for the building-automation host object API.
//!
//! The host exposes a tree of objects (servers, interfaces, networks,
//! devices, files) addressed by slash-separated paths. This crate provides:
//!
//! - [`HostApi`]: the capability trait consumed by `logsweep-core`.
//!   Server-root resolution, children listing, batched object info, and
//!   text file reads.
//! - [`RestHost`]: the production implementation over the host's JSON
//!   REST surface, built on `reqwest` with configurable TLS via
//!   [`TransportConfig`].
//! - [`FakeHost`]: a seedable in-memory implementation for tests.
//! - Wire types ([`types`]): serde models for the host's object records,
//!   including its `{high, low, unsigned}` 64-bit integer encoding.
//!
//! Authentication and session handling are deliberately absent: callers
//! point the client at a host (or gateway) that already accepts them.

pub mod error;
pub mod fake;
pub mod host;
pub mod rest;
pub mod transport;
pub mod types;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::Error;
pub use fake::FakeHost;
pub use host::HostApi;
pub use rest::RestHost;
pub use transport::{TlsMode, TransportConfig};
pub use types::{ChildInfo, ObjectInfo, PropertyMap, PropertyValue};
