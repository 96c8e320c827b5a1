//! In-memory store.

use super::{BoxFuture, ProjectStore, StorageError, StorageResult, VersionInfo};
use crate::document::ProjectState;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct Inner {
    projects: HashMap<String, ProjectState>,
    versions: HashMap<String, Vec<(VersionInfo, ProjectState)>>,
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

fn lock_error<T>(e: PoisonError<T>) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn save(&self, project_id: &str, state: &ProjectState) -> BoxFuture<'_, StorageResult<()>> {
        let id = project_id.to_string();
        let state = state.clone();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner.projects.insert(id, state);
            Ok(())
        })
    }

    fn load(&self, project_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
        let id = project_id.to_string();
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            inner
                .projects
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn create_version_snapshot(
        &self,
        project_id: &str,
        state: &ProjectState,
        description: &str,
    ) -> BoxFuture<'_, StorageResult<VersionInfo>> {
        let id = project_id.to_string();
        let state = state.clone();
        let description = description.to_string();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            let versions = inner.versions.entry(id.clone()).or_default();
            let info = VersionInfo::next(&id, versions.len() as u32 + 1, &description);
            versions.push((info.clone(), state));
            Ok(info)
        })
    }

    fn list_versions(&self, project_id: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>> {
        let id = project_id.to_string();
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner
                .versions
                .get(&id)
                .map(|versions| versions.iter().map(|(info, _)| info.clone()).collect())
                .unwrap_or_default())
        })
    }

    fn load_version(&self, project_id: &str, version_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
        let id = project_id.to_string();
        let version_id = version_id.to_string();
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            inner
                .versions
                .get(&id)
                .and_then(|versions| versions.iter().find(|(info, _)| info.id == version_id))
                .map(|(_, state)| state.clone())
                .ok_or(StorageError::NotFound(version_id))
        })
    }

    fn delete(&self, project_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = project_id.to_string();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner.projects.remove(&id);
            inner.versions.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.projects.keys().cloned().collect())
        })
    }

    fn exists(&self, project_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = project_id.to_string();
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.projects.contains_key(&id))
        })
    }
}
