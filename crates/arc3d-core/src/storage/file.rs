//! File-backed store for native platforms.
//!
//! Layout under the base directory:
//! - `<id>.json`: current project state
//! - `<id>.versions/<version-id>.json`: snapshots with their metadata

use super::{BoxFuture, ProjectStore, StorageError, StorageResult, VersionInfo};
use crate::document::ProjectState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk version snapshot.
#[derive(Serialize, Deserialize)]
struct VersionFile {
    info: VersionInfo,
    state: ProjectState,
}

/// Stores projects as JSON files in a directory.
pub struct FileStore {
    base_path: PathBuf,
}

/// Map an id to a filesystem-safe name.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
}

fn read_version(path: &Path) -> StorageResult<VersionFile> {
    let json = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    serde_json::from_str(&json)
        .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| io_error("create", &base_path, e))?;
        }
        Ok(Self { base_path })
    }

    /// Store in the platform data directory, e.g. `~/.local/share/arc3d/projects`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("arc3d").join("projects"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn project_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", sanitize(id)))
    }

    fn versions_dir(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.versions", sanitize(id)))
    }

    fn read_versions(&self, id: &str) -> StorageResult<Vec<VersionFile>> {
        let dir = self.versions_dir(id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|e| io_error("read", &dir, e))?;
        let mut versions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                versions.push(read_version(&path)?);
            }
        }
        versions.sort_by_key(|v| v.info.number);
        Ok(versions)
    }
}

impl ProjectStore for FileStore {
    fn save(&self, project_id: &str, state: &ProjectState) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(project_id);
        let json = state.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| io_error("write", &path, e))
        })
    }

    fn load(&self, project_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
        let path = self.project_path(project_id);
        let id = project_id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path).map_err(|e| io_error("read", &path, e))?;
            ProjectState::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
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
            let number = self.read_versions(&id)?.len() as u32 + 1;
            let info = VersionInfo::next(&id, number, &description);

            let dir = self.versions_dir(&id);
            fs::create_dir_all(&dir).map_err(|e| io_error("create", &dir, e))?;
            let path = dir.join(format!("{}.json", sanitize(&info.id)));
            let file = VersionFile { info, state };
            let json = serde_json::to_string_pretty(&file)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| io_error("write", &path, e))?;
            Ok(file.info)
        })
    }

    fn list_versions(&self, project_id: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>> {
        let id = project_id.to_string();
        Box::pin(async move {
            Ok(self.read_versions(&id)?.into_iter().map(|v| v.info).collect())
        })
    }

    fn load_version(&self, project_id: &str, version_id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
        let path = self
            .versions_dir(project_id)
            .join(format!("{}.json", sanitize(version_id)));
        let version_id = version_id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(version_id));
            }
            Ok(read_version(&path)?.state)
        })
    }

    fn delete(&self, project_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(project_id);
        let versions = self.versions_dir(project_id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| io_error("delete", &path, e))?;
            }
            if versions.exists() {
                fs::remove_dir_all(&versions).map_err(|e| io_error("delete", &versions, e))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base).map_err(|e| io_error("read", &base, e))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                // Version directories end in `.versions` and are skipped here.
                if !path.is_file() || !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, project_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(project_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
