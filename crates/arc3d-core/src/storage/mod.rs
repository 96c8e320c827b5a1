//! Project persistence: the store contract plus in-memory and file backends.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_DELAY};
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::document::ProjectState;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by store operations. `Send` so stores can be shared
/// behind an `Arc` across server tasks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Metadata of a saved version snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: String,
    pub project_id: String,
    /// 1-based, increasing per project.
    pub number: u32,
    pub description: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl VersionInfo {
    pub(crate) fn next(project_id: &str, number: u32, description: &str) -> Self {
        Self {
            id: crate::shapes::generate_id("version"),
            project_id: project_id.to_string(),
            number,
            description: description.to_string(),
            created_at: now_millis(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Persistence contract for projects.
///
/// Saves are last-writer-wins. Versions are immutable snapshots listed in
/// creation order.
pub trait ProjectStore: Send + Sync {
    /// Save the current state of a project.
    fn save(&self, project_id: &str, state: &ProjectState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the current state of a project.
    fn load(&self, project_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>>;

    /// Store an immutable snapshot of `state`.
    fn create_version_snapshot(
        &self,
        project_id: &str,
        state: &ProjectState,
        description: &str,
    ) -> BoxFuture<'_, StorageResult<VersionInfo>>;

    /// Versions of a project, oldest first.
    fn list_versions(&self, project_id: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>>;

    /// Load the state captured by a version.
    fn load_version(&self, project_id: &str, version_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>>;

    /// Delete a project and its versions.
    fn delete(&self, project_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all project ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a project exists.
    fn exists(&self, project_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal executor for driving store futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
