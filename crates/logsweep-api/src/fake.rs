//! In-memory test double for the host API.
//!
//! A deterministic [`HostApi`] implementation seeded with a children tree,
//! object infos, and file contents. Supports induced per-path failures and
//! a configurable read delay so scheduler tests can observe how many reads
//! overlap.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::host::HostApi;
use crate::types::{ChildInfo, ObjectInfo, PropertyValue};

// ── In-memory state ─────────────────────────────────────────────

/// Mutable inner state protected by a mutex.
#[derive(Default)]
struct Inner {
    server_root: String,
    children: HashMap<String, Vec<ChildInfo>>,
    objects: HashMap<String, ObjectInfo>,
    files: HashMap<String, String>,
    fail_children: HashSet<String>,
    fail_objects: bool,
    fail_files: HashSet<String>,
    read_delay: Duration,
}

/// A fake host for deterministic testing.
///
/// All methods operate on in-memory state; the seed methods pre-populate it
/// before running test code.
pub struct FakeHost {
    inner: Mutex<Inner>,
    reads_in_flight: AtomicUsize,
    max_reads_in_flight: AtomicUsize,
}

impl FakeHost {
    /// Create a fake rooted at the given server path.
    pub fn new(server_root: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                server_root: server_root.into(),
                ..Inner::default()
            }),
            reads_in_flight: AtomicUsize::new(0),
            max_reads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Seed a child under a parent path.
    pub async fn add_child(&self, parent: &str, path: &str, type_name: &str) {
        let child = ChildInfo::new(path, type_name);
        self.inner
            .lock()
            .await
            .children
            .entry(parent.to_owned())
            .or_default()
            .push(child);
    }

    /// Seed full object info for a path.
    pub async fn add_object(
        &self,
        path: &str,
        type_name: &str,
        properties: impl IntoIterator<Item = (String, PropertyValue)>,
    ) {
        let info = ObjectInfo {
            path: path.to_owned(),
            type_name: type_name.to_owned(),
            properties: properties.into_iter().collect(),
        };
        self.inner.lock().await.objects.insert(path.to_owned(), info);
    }

    /// Seed a file's text content.
    pub async fn add_file(&self, path: &str, text: &str) {
        self.inner
            .lock()
            .await
            .files
            .insert(path.to_owned(), text.to_owned());
    }

    /// Make children listings fail for one path.
    pub async fn fail_children_of(&self, path: &str) {
        self.inner.lock().await.fail_children.insert(path.to_owned());
    }

    /// Make object-info batches fail.
    pub async fn fail_objects(&self) {
        self.inner.lock().await.fail_objects = true;
    }

    /// Make file reads fail for one path.
    pub async fn fail_file(&self, path: &str) {
        self.inner.lock().await.fail_files.insert(path.to_owned());
    }

    /// Delay every file read, so overlapping reads become observable.
    pub async fn set_read_delay(&self, delay: Duration) {
        self.inner.lock().await.read_delay = delay;
    }

    /// High-water mark of concurrent `read_file` calls.
    pub fn max_concurrent_reads(&self) -> usize {
        self.max_reads_in_flight.load(Ordering::SeqCst)
    }
}

// ── HostApi implementation ──────────────────────────────────────

#[async_trait]
impl HostApi for FakeHost {
    async fn resolve_server_root(&self) -> Result<String, Error> {
        Ok(self.inner.lock().await.server_root.clone())
    }

    async fn list_children(
        &self,
        path: &str,
        _include_property_names: bool,
    ) -> Result<Vec<ChildInfo>, Error> {
        let state = self.inner.lock().await;
        if state.fail_children.contains(path) {
            return Err(Error::Host {
                status: 500,
                message: format!("listing failed for {path}"),
            });
        }
        Ok(state.children.get(path).cloned().unwrap_or_default())
    }

    async fn get_objects(&self, paths: &[String]) -> Result<HashMap<String, ObjectInfo>, Error> {
        let state = self.inner.lock().await;
        if state.fail_objects {
            return Err(Error::Host {
                status: 500,
                message: "object batch failed".to_owned(),
            });
        }
        Ok(paths
            .iter()
            .filter_map(|p| state.objects.get(p).map(|o| (p.clone(), o.clone())))
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<String, Error> {
        let (delay, result) = {
            let state = self.inner.lock().await;
            let result = if state.fail_files.contains(path) {
                Err(Error::Host {
                    status: 500,
                    message: format!("read failed for {path}"),
                })
            } else {
                state.files.get(path).cloned().ok_or_else(|| Error::Host {
                    status: 404,
                    message: format!("no such file: {path}"),
                })
            };
            (state.read_delay, result)
        };

        let _guard = ReadGuard::enter(&self.reads_in_flight, &self.max_reads_in_flight);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

/// Holds one in-flight read slot. Dropping releases the slot even when the
/// read future is dropped at a caller-side timeout.
struct ReadGuard<'a>(&'a AtomicUsize);

impl<'a> ReadGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, high_water: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        high_water.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
