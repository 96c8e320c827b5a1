//! Error types for canvas editing operations

use thiserror::Error;

/// Rejected edits. Every variant leaves the model unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Grouping needs at least 2 selected layers, got {0}")]
    NotEnoughSelected(usize),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Shape not found: {0}")]
    ShapeNotFound(String),

    #[error("Identifier already in use: {0}")]
    DuplicateId(String),

    #[error("Shape {shape} cannot be paired with layer {layer}")]
    IdMismatch { shape: String, layer: String },

    #[error("Layer {0} is not a group")]
    NotAGroup(String),

    #[error("Group {0} has no children")]
    EmptyGroup(String),

    #[error("Layer {0} is not at the top level")]
    NotTopLevel(String),

    #[error("Layer {0} is structural and has no shape")]
    StructuralLayer(String),

    #[error("Layer {0} is already the bottom layer, nothing to mask")]
    NoLayerBeneath(String),

    #[error("Layer {0} already takes part in a mask")]
    AlreadyMasked(String),

    #[error("Layer {0} is not masked")]
    NotMasked(String),

    #[error("Layer {0} is locked")]
    Locked(String),

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("Nothing is selected")]
    NothingSelected,
}

pub type EditResult<T> = std::result::Result<T, EditError>;
