//! Arc3D Core Library
//!
//! Platform-agnostic canvas model for the Arc3D overlay designer: shapes,
//! the layer tree, compositing, selection and persistence.

pub mod clipboard;
pub mod compositor;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod generation;
pub mod input;
pub mod layers;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod tools;
pub mod upload;

pub use clipboard::{Clipboard, ClipboardEntry};
pub use compositor::{ClipRegion, RenderBackend, RenderItem, RenderList, compose};
pub use config::EditorConfig;
pub use document::{IntegrityIssue, ProjectState};
pub use editor::{Editor, PointerOutcome};
pub use error::{EditError, EditResult};
pub use generation::{GenerationService, GenerationTracker, JobHandle, JobStatus};
pub use input::{KeyCommand, Modifiers};
pub use layers::{BlendMode, Layer, LayerKind, LayerPatch, LayerTree, ZOrder};
pub use selection::{InteractionMode, Selection};
pub use shapes::{ElementId, Shape, ShapeKind, ShapePatch, ShapeStore, ShapeTrait};
pub use storage::{AutoSaveManager, MemoryStore, ProjectStore, StorageError, VersionInfo};
pub use tools::ToolKind;
pub use upload::{ModelFormat, UploadError, validate_model_upload};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
