//! The layer tree: an ordered top-level sequence with nested group children.

use super::{Layer, LayerPatch};
use crate::error::{EditError, EditResult};
use crate::shapes::ElementId;
use serde::{Deserialize, Serialize};

/// Z-order move within the containing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZOrder {
    /// Move to the end (drawn last, on top).
    ToFront,
    /// Move to the start (drawn first, at the bottom).
    ToBack,
    /// Swap with the next entry.
    Forward,
    /// Swap with the previous entry.
    Backward,
}

/// Ordered layer hierarchy. Array position is z-order: later entries render
/// on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerTree {
    pub(super) layers: Vec<Layer>,
}

fn find_in<'a>(layers: &'a [Layer], id: &str) -> Option<&'a Layer> {
    for layer in layers {
        if layer.id == id {
            return Some(layer);
        }
        if let Some(found) = find_in(&layer.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(layers: &'a mut [Layer], id: &str) -> Option<&'a mut Layer> {
    for layer in layers.iter_mut() {
        if layer.id == id {
            return Some(layer);
        }
        if let Some(found) = find_in_mut(&mut layer.children, id) {
            return Some(found);
        }
    }
    None
}

/// The sequence holding `id`, with the entry's index in it.
fn sequence_containing<'a>(layers: &'a mut Vec<Layer>, id: &str) -> Option<(&'a mut Vec<Layer>, usize)> {
    if let Some(pos) = layers.iter().position(|l| l.id == id) {
        return Some((layers, pos));
    }
    for layer in layers.iter_mut() {
        if let Some(found) = sequence_containing(&mut layer.children, id) {
            return Some(found);
        }
    }
    None
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Top-level layers, bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of top-level layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Add a layer at the top of the root sequence, or of a group's children.
    pub fn add_layer(&mut self, layer: Layer, parent_group_id: Option<&str>) -> EditResult<()> {
        if self.contains(&layer.id) {
            return Err(EditError::DuplicateId(layer.id));
        }
        match parent_group_id {
            None => self.layers.push(layer),
            Some(parent_id) => {
                let parent = self
                    .find_layer_mut(parent_id)
                    .ok_or_else(|| EditError::LayerNotFound(parent_id.to_string()))?;
                if !parent.is_group() {
                    return Err(EditError::NotAGroup(parent_id.to_string()));
                }
                parent.children.push(layer);
            }
        }
        Ok(())
    }

    /// Depth-first search through all levels.
    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        find_in(&self.layers, id)
    }

    pub fn find_layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        find_in_mut(&mut self.layers, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_layer(id).is_some()
    }

    /// Index of a top-level layer.
    pub fn top_level_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Id of the top-level layer whose subtree contains `id`.
    pub fn top_level_ancestor(&self, id: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|top| find_in(std::slice::from_ref(*top), id).is_some())
            .map(|top| top.id.as_str())
    }

    /// Whether `id` sits somewhere beneath `ancestor_id`.
    pub fn is_descendant_of(&self, id: &str, ancestor_id: &str) -> bool {
        self.find_layer(ancestor_id)
            .is_some_and(|ancestor| find_in(&ancestor.children, id).is_some())
    }

    pub fn update_layer(&mut self, id: &str, patch: &LayerPatch) -> EditResult<()> {
        let layer = self
            .find_layer_mut(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        patch.apply_to(layer);
        Ok(())
    }

    /// Detach a layer from its sequence without touching mask relations.
    pub(super) fn detach(&mut self, id: &str) -> Option<Layer> {
        let (seq, pos) = sequence_containing(&mut self.layers, id)?;
        Some(seq.remove(pos))
    }

    /// Remove a layer (and its subtree). Mask relations pointing at or from
    /// any removed layer are cleared on the surviving side. The caller is
    /// responsible for removing the parallel shapes.
    pub fn remove_layer(&mut self, id: &str) -> Option<Layer> {
        let removed = self.detach(id)?;
        let mut removed_ids = Vec::new();
        let mut mask_targets = Vec::new();
        removed.visit(&mut |l| {
            removed_ids.push(l.id.clone());
            if let Some(target) = l.mask_target_id.as_ref().filter(|_| l.is_mask) {
                mask_targets.push(target.clone());
            }
        });

        // A surviving target loses its mask source.
        for target in &mask_targets {
            if let Some(layer) = self.find_layer_mut(target) {
                layer.has_mask = false;
            }
        }
        // A surviving mask loses its target.
        self.visit_mut(&mut |l| {
            let orphaned = l.is_mask
                && l.mask_target_id
                    .as_ref()
                    .is_some_and(|t| removed_ids.contains(t));
            if orphaned {
                l.clear_mask_flags();
            }
        });
        Some(removed)
    }

    /// Move a layer within its containing sequence.
    pub fn reorder(&mut self, id: &str, order: ZOrder) -> EditResult<()> {
        let (seq, pos) = sequence_containing(&mut self.layers, id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        match order {
            ZOrder::ToFront => {
                let layer = seq.remove(pos);
                seq.push(layer);
            }
            ZOrder::ToBack => {
                let layer = seq.remove(pos);
                seq.insert(0, layer);
            }
            ZOrder::Forward => {
                if pos + 1 < seq.len() {
                    seq.swap(pos, pos + 1);
                }
            }
            ZOrder::Backward => {
                if pos > 0 {
                    seq.swap(pos, pos - 1);
                }
            }
        }
        Ok(())
    }

    /// Depth-first visit of every layer.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Layer)) {
        for layer in &self.layers {
            layer.visit(f);
        }
    }

    pub(super) fn visit_mut(&mut self, f: &mut impl FnMut(&mut Layer)) {
        fn walk(layers: &mut [Layer], f: &mut impl FnMut(&mut Layer)) {
            for layer in layers {
                f(&mut *layer);
                walk(&mut layer.children, f);
            }
        }
        walk(&mut self.layers, f);
    }

    /// Every layer in depth-first order.
    pub fn all_layers(&self) -> Vec<&Layer> {
        let mut out = Vec::new();
        self.visit(&mut |l| out.push(l));
        out
    }

    /// Ids of every layer in depth-first order.
    pub fn all_ids(&self) -> Vec<ElementId> {
        self.all_layers().into_iter().map(|l| l.id.clone()).collect()
    }
}
