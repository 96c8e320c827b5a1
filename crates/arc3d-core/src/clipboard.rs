//! Single-slot clipboard for shape/layer pairs.

use crate::layers::Layer;
use crate::shapes::{Shape, ShapeTrait};

/// A copied shape with its layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    pub shape: Shape,
    pub layer: Layer,
}

/// Holds at most one entry at a time.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
}

/// Copy a pair under a fresh id, offset by `(dx, dy)`.
///
/// Mask flags are dropped: a copy never takes part in the source's mask.
pub fn offset_copy(shape: &Shape, layer: &Layer, dx: f64, dy: f64) -> (Shape, Layer) {
    let mut shape = shape.with_new_id();
    shape.translate(dx, dy);

    let mut layer = layer.clone();
    layer.id = shape.id().to_string();
    layer.name = format!("{} copy", layer.name);
    layer.clear_mask_flags();
    layer.children.clear();
    if let (Some(x), Some(y)) = (layer.x, layer.y) {
        layer.x = Some(x + dx);
        layer.y = Some(y + dy);
    }
    (shape, layer)
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard content.
    pub fn copy(&mut self, shape: Shape, layer: Layer) {
        self.entry = Some(ClipboardEntry { shape, layer });
    }

    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Produce a new pair from the clipboard, offset from the copied source.
    /// The clipboard keeps its content.
    pub fn paste(&self, offset: f64) -> Option<(Shape, Layer)> {
        self.entry
            .as_ref()
            .map(|e| offset_copy(&e.shape, &e.layer, offset, offset))
    }
}
