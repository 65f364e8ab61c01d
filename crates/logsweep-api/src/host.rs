// ── Host API capability ──

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Error;
use crate::types::{ChildInfo, ObjectInfo};

/// The host capabilities the acquisition pipeline consumes.
///
/// Implemented by [`RestHost`](crate::rest::RestHost) against the host's
/// JSON REST surface and by [`FakeHost`](crate::fake::FakeHost) for tests.
/// Consumers take it as an injected trait object so either can be
/// substituted.
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Resolve the server root the current viewer lives under.
    async fn resolve_server_root(&self) -> Result<String, Error>;

    /// List the direct children of an object.
    async fn list_children(
        &self,
        path: &str,
        include_property_names: bool,
    ) -> Result<Vec<ChildInfo>, Error>;

    /// Resolve full object info for a batch of paths in one round trip.
    ///
    /// Paths the host does not know are absent from the result map, not an
    /// error.
    async fn get_objects(&self, paths: &[String]) -> Result<HashMap<String, ObjectInfo>, Error>;

    /// Read a file object's content as text.
    async fn read_file(&self, path: &str) -> Result<String, Error>;
}
