//! Debounced auto-save.
//!
//! Every change pushes the save deadline out by the delay; the save fires
//! once the project has been quiet for that long and reads the state at
//! fire time.

use super::{ProjectStore, StorageResult};
use crate::config::EditorConfig;
use crate::document::ProjectState;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default quiet period before an auto-save.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(3);

/// Debounces saves of one project.
pub struct AutoSaveManager<S: ProjectStore> {
    storage: Arc<S>,
    project_id: String,
    delay: Duration,
    /// When the pending save fires.
    deadline: Option<Instant>,
    dirty: bool,
    /// Last editor revision seen by [`Self::observe`].
    seen_revision: u64,
}

impl<S: ProjectStore> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>, project_id: impl Into<String>) -> Self {
        Self {
            storage,
            project_id: project_id.into(),
            delay: DEFAULT_AUTOSAVE_DELAY,
            deadline: None,
            dirty: false,
            seen_revision: 0,
        }
    }

    /// A manager using the configured auto-save delay.
    pub fn from_config(storage: Arc<S>, project_id: impl Into<String>, config: &EditorConfig) -> Self {
        Self::new(storage, project_id).with_delay(config.autosave_delay())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record a change at `now`, restarting the debounce window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        self.deadline = Some(now + self.delay);
    }

    /// Mark dirty when the editor revision moved since the last call.
    pub fn observe(&mut self, revision: u64, now: Instant) {
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.mark_dirty(now);
        }
    }

    /// Dirty and quiet for at least the delay.
    pub fn is_due(&self, now: Instant) -> bool {
        self.dirty && self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Save if due. Failures are logged and leave the project dirty with a
    /// fresh deadline, so the next cycle retries. Returns whether a save
    /// succeeded.
    pub async fn maybe_save(&mut self, now: Instant, state: &ProjectState) -> bool {
        if !self.is_due(now) {
            return false;
        }
        match self.save(state).await {
            Ok(()) => {
                log::debug!("Auto-saved project {}", self.project_id);
                true
            }
            Err(e) => {
                log::warn!("Auto-save of project {} failed: {}", self.project_id, e);
                self.deadline = Some(now + self.delay);
                false
            }
        }
    }

    /// Save immediately, clearing the dirty flag on success.
    pub async fn save(&mut self, state: &ProjectState) -> StorageResult<()> {
        self.storage.save(&self.project_id, state).await?;
        self.dirty = false;
        self.deadline = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use crate::storage::{BoxFuture, MemoryStore, StorageError, VersionInfo, block_on};
    use kurbo::Point;

    fn manager() -> AutoSaveManager<MemoryStore> {
        AutoSaveManager::new(Arc::new(MemoryStore::new()), "p")
    }

    #[test]
    fn test_clean_manager_never_saves() {
        let m = manager();
        let t0 = Instant::now();
        assert!(!m.is_dirty());
        assert!(!m.is_due(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_debounce_restarts_on_each_change() {
        let mut m = manager();
        let t0 = Instant::now();
        m.mark_dirty(t0);
        m.mark_dirty(t0 + Duration::from_secs(2));

        assert!(!m.is_due(t0 + Duration::from_secs(3)));
        assert!(m.is_due(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_maybe_save_reads_state_at_fire_time() {
        let mut m = manager();
        let t0 = Instant::now();
        m.mark_dirty(t0);

        let mut state = ProjectState::new();
        assert!(!block_on(m.maybe_save(t0 + Duration::from_secs(1), &state)));

        state.insert_shape(Rectangle::new(Point::ZERO).into()).unwrap();
        assert!(block_on(m.maybe_save(t0 + Duration::from_secs(3), &state)));
        assert!(!m.is_dirty());

        let saved = block_on(m.storage().load("p")).unwrap();
        assert_eq!(saved.shapes().len(), 1);
    }

    #[test]
    fn test_observe_revision() {
        let mut m = manager();
        let t0 = Instant::now();
        m.observe(0, t0);
        assert!(!m.is_dirty());
        m.observe(1, t0);
        assert!(m.is_dirty());
        assert_eq!(m.deadline(), Some(t0 + DEFAULT_AUTOSAVE_DELAY));
    }

    #[test]
    fn test_editor_changes_are_saved_after_quiet_period() {
        use crate::editor::Editor;
        use crate::input::Modifiers;
        use crate::tools::ToolKind;

        let config = EditorConfig::default();
        let mut editor = Editor::new(config.clone());
        let mut m = AutoSaveManager::from_config(Arc::new(MemoryStore::new()), "p", &config);
        assert_eq!(m.delay(), Duration::from_secs(3));

        let t0 = Instant::now();
        editor.set_tool(ToolKind::Rectangle);
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::NONE, t0).unwrap();
        m.observe(editor.revision(), t0);

        assert!(!block_on(m.maybe_save(t0 + Duration::from_secs(2), editor.state())));
        assert!(!block_on(m.storage().exists("p")).unwrap());

        editor.insert_asset("https://cdn.example/chair.glb", Point::ZERO).unwrap();
        assert!(block_on(m.maybe_save(t0 + Duration::from_secs(3), editor.state())));
        let saved = block_on(m.storage().load("p")).unwrap();
        assert_eq!(&saved, editor.state());
        assert_eq!(saved.shapes().len(), 2);
    }

    #[test]
    fn test_configured_delay() {
        let config = EditorConfig::from_json(r#"{"autosaveDelayMs": 500}"#).unwrap();
        let mut m = AutoSaveManager::from_config(Arc::new(MemoryStore::new()), "p", &config);
        let t0 = Instant::now();
        m.mark_dirty(t0);
        assert!(m.is_due(t0 + Duration::from_millis(500)));
    }

    struct FailingStore;

    impl ProjectStore for FailingStore {
        fn save(&self, _: &str, _: &ProjectState) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".into())) })
        }
        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
            let id = id.to_string();
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }
        fn create_version_snapshot(
            &self,
            _: &str,
            _: &ProjectState,
            _: &str,
        ) -> BoxFuture<'_, StorageResult<VersionInfo>> {
            Box::pin(async { Err(StorageError::Other("unsupported".into())) })
        }
        fn list_versions(&self, _: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn load_version(&self, _: &str, id: &str) -> BoxFuture<'_, StorageResult<ProjectState>> {
            let id = id.to_string();
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }
        fn delete(&self, _: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn exists(&self, _: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_failed_save_stays_dirty_and_retries() {
        let mut m = AutoSaveManager::new(Arc::new(FailingStore), "p");
        let t0 = Instant::now();
        m.mark_dirty(t0);

        let fire = t0 + Duration::from_secs(3);
        assert!(!block_on(m.maybe_save(fire, &ProjectState::new())));
        assert!(m.is_dirty());
        assert_eq!(m.deadline(), Some(fire + DEFAULT_AUTOSAVE_DELAY));
    }
}
