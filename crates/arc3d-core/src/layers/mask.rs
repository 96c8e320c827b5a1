//! Mask relations between adjacent top-level layers.

use super::{Layer, LayerTree};
use crate::error::{EditError, EditResult};
use crate::shapes::ElementId;
use serde::{Deserialize, Serialize};

/// A mask layer and the layer it clips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskRelation {
    pub mask_id: ElementId,
    pub target_id: ElementId,
}

impl LayerTree {
    /// Turn a top-level layer into the mask of the layer directly beneath it.
    ///
    /// The mask is forced visible so it stays editable. Nested layers are
    /// not supported, and neither side may be a group or adjustment layer.
    pub fn use_as_mask(&mut self, id: &str) -> EditResult<MaskRelation> {
        let pos = match self.top_level_index(id) {
            Some(pos) => pos,
            None if self.contains(id) => return Err(EditError::NotTopLevel(id.to_string())),
            None => return Err(EditError::LayerNotFound(id.to_string())),
        };
        if pos == 0 {
            return Err(EditError::NoLayerBeneath(id.to_string()));
        }
        if self.layers[pos].in_mask_relation() {
            return Err(EditError::AlreadyMasked(id.to_string()));
        }
        if self.layers[pos - 1].in_mask_relation() {
            return Err(EditError::AlreadyMasked(self.layers[pos - 1].id.clone()));
        }
        // Clipping happens per shape, so both sides need geometry.
        for layer in [&self.layers[pos], &self.layers[pos - 1]] {
            if layer.is_structural() {
                return Err(EditError::StructuralLayer(layer.id.clone()));
            }
        }

        let target_id = self.layers[pos - 1].id.clone();
        self.layers[pos - 1].has_mask = true;
        let mask = &mut self.layers[pos];
        mask.is_mask = true;
        mask.mask_target_id = Some(target_id.clone());
        mask.visible = true;

        Ok(MaskRelation {
            mask_id: id.to_string(),
            target_id,
        })
    }

    /// Remove the mask relation `id` takes part in.
    ///
    /// Checked in order: `id` is a masked layer, `id` is a mask, `id` is the
    /// target named by some other mask. The first match is cleared on both
    /// sides.
    pub fn unmask(&mut self, id: &str) -> EditResult<MaskRelation> {
        let layer = self
            .find_layer(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;

        let relation = if layer.has_mask {
            match self.mask_source_for(id) {
                Some(mask) => MaskRelation {
                    mask_id: mask.id.clone(),
                    target_id: id.to_string(),
                },
                None => {
                    // Flag without a source: just drop the flag.
                    log::warn!("Layer {} flagged as masked but no mask layer found", id);
                    if let Some(layer) = self.find_layer_mut(id) {
                        layer.has_mask = false;
                    }
                    return Ok(MaskRelation {
                        mask_id: String::new(),
                        target_id: id.to_string(),
                    });
                }
            }
        } else if let Some(target) = layer.mask_target_id.clone().filter(|_| layer.is_mask) {
            MaskRelation {
                mask_id: id.to_string(),
                target_id: target,
            }
        } else if let Some(mask) = self.mask_source_for(id) {
            MaskRelation {
                mask_id: mask.id.clone(),
                target_id: id.to_string(),
            }
        } else {
            return Err(EditError::NotMasked(id.to_string()));
        };

        if let Some(mask) = self.find_layer_mut(&relation.mask_id) {
            mask.clear_mask_flags();
        }
        if let Some(target) = self.find_layer_mut(&relation.target_id) {
            target.has_mask = false;
        }
        Ok(relation)
    }

    /// The mask layer clipping `target_id`, if any.
    pub fn mask_source_for(&self, target_id: &str) -> Option<&Layer> {
        let mut found = None;
        self.visit(&mut |l| {
            if found.is_none() && l.is_mask && l.mask_target_id.as_deref() == Some(target_id) {
                found = Some(l);
            }
        });
        found
    }

    /// All mask relations present in the tree.
    pub fn mask_relations(&self) -> Vec<MaskRelation> {
        let mut out = Vec::new();
        self.visit(&mut |l| {
            if let Some(target) = l.mask_target_id.as_ref().filter(|_| l.is_mask) {
                out.push(MaskRelation {
                    mask_id: l.id.clone(),
                    target_id: target.clone(),
                });
            }
        });
        out
    }
}
