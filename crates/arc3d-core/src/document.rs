//! Project state: the shape store and layer tree kept in lockstep.

use crate::error::{EditError, EditResult};
use crate::layers::{Layer, LayerPatch, LayerTree};
use crate::shapes::{ElementId, Shape, ShapePatch, ShapeStore, ShapeTrait};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A consistency problem found by [`ProjectState::integrity_issues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A shape with no layer of the same id.
    ShapeWithoutLayer(ElementId),
    /// A non-structural layer with no shape of the same id.
    LayerWithoutShape(ElementId),
    /// A structural layer that also has a shape.
    ShapeOnStructuralLayer(ElementId),
    /// A layer flagged `hasMask` without exactly one mask source.
    UnpairedMask { target_id: ElementId, sources: usize },
    /// A mask naming a target that is missing or not flagged.
    DanglingMask { mask_id: ElementId, target_id: ElementId },
}

/// The persisted `{shapes, layers}` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    shapes: ShapeStore,
    layers: LayerTree,
}

impl ProjectState {
    /// Create an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parts without validation. Use [`Self::integrity_issues`]
    /// to inspect the result.
    pub fn from_parts(shapes: ShapeStore, layers: LayerTree) -> Self {
        Self { shapes, layers }
    }

    pub fn shapes(&self) -> &ShapeStore {
        &self.shapes
    }

    pub fn layers(&self) -> &LayerTree {
        &self.layers
    }

    /// Direct access to the tree for structural operations that never touch
    /// shapes (reorder, group, mask).
    pub fn layers_mut(&mut self) -> &mut LayerTree {
        &mut self.layers
    }

    pub fn get_shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get_shape(id)
    }

    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        self.layers.find_layer(id)
    }

    /// Insert a shape together with its default layer at the top level.
    pub fn insert_shape(&mut self, shape: Shape) -> EditResult<ElementId> {
        let layer = Layer::for_shape(&shape);
        let id = layer.id.clone();
        self.insert_element(shape, layer, None)?;
        Ok(id)
    }

    /// Insert a shape/layer pair. Ids must match and be unused.
    pub fn insert_element(
        &mut self,
        shape: Shape,
        layer: Layer,
        parent_group_id: Option<&str>,
    ) -> EditResult<()> {
        if shape.id() != layer.id {
            return Err(EditError::IdMismatch {
                shape: shape.id().to_string(),
                layer: layer.id,
            });
        }
        if layer.is_structural() {
            return Err(EditError::StructuralLayer(layer.id));
        }
        if self.shapes.contains(shape.id()) {
            return Err(EditError::DuplicateId(layer.id));
        }
        self.layers.add_layer(layer, parent_group_id)?;
        self.shapes.add_shape(shape);
        Ok(())
    }

    /// Remove a layer with its subtree and every parallel shape.
    pub fn remove_element(&mut self, id: &str) -> EditResult<Layer> {
        let removed = self
            .layers
            .remove_layer(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        for layer_id in removed.subtree_ids() {
            self.shapes.remove_shape(&layer_id);
        }
        Ok(removed)
    }

    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> EditResult<bool> {
        if !self.shapes.contains(id) {
            return Err(EditError::ShapeNotFound(id.to_string()));
        }
        Ok(self.shapes.update_shape(id, patch))
    }

    pub fn update_layer(&mut self, id: &str, patch: &LayerPatch) -> EditResult<()> {
        self.layers.update_layer(id, patch)
    }

    /// Position a shape is drawn at: the layer override when set, else the
    /// shape's own anchor.
    pub fn effective_position(&self, layer: &Layer, shape: &Shape) -> Point {
        layer.position_override().unwrap_or_else(|| shape.position())
    }

    /// Move an element (a group moves its subtree). A locked layer refuses
    /// to move; locked members inside a moved group stay where they are.
    pub fn translate_element(&mut self, id: &str, dx: f64, dy: f64) -> EditResult<()> {
        let layer = self
            .layers
            .find_layer(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        if layer.locked {
            return Err(EditError::Locked(id.to_string()));
        }
        let ids = layer.movable_ids();
        for member in &ids {
            if let Some(layer) = self.layers.find_layer_mut(member) {
                if let (Some(x), Some(y)) = (layer.x, layer.y) {
                    layer.x = Some(x + dx);
                    layer.y = Some(y + dy);
                }
            }
            if let Some(shape) = self.shapes.get_shape_mut(member) {
                shape.translate(dx, dy);
            }
        }
        Ok(())
    }

    /// Check the shape/layer pairing and the mask pairing.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for shape in self.shapes.iter() {
            match self.layers.find_layer(shape.id()) {
                None => issues.push(IntegrityIssue::ShapeWithoutLayer(shape.id().to_string())),
                Some(layer) if layer.is_structural() => {
                    issues.push(IntegrityIssue::ShapeOnStructuralLayer(layer.id.clone()))
                }
                Some(_) => {}
            }
        }

        let all = self.layers.all_layers();
        for layer in &all {
            if !layer.is_structural() && !self.shapes.contains(&layer.id) {
                issues.push(IntegrityIssue::LayerWithoutShape(layer.id.clone()));
            }
            if layer.has_mask {
                let sources = all
                    .iter()
                    .filter(|m| m.is_mask && m.mask_target_id.as_deref() == Some(layer.id.as_str()))
                    .count();
                if sources != 1 {
                    issues.push(IntegrityIssue::UnpairedMask {
                        target_id: layer.id.clone(),
                        sources,
                    });
                }
            }
        }

        for relation in self.layers.mask_relations() {
            let target_ok = self
                .layers
                .find_layer(&relation.target_id)
                .is_some_and(|t| t.has_mask);
            if !target_ok {
                issues.push(IntegrityIssue::DanglingMask {
                    mask_id: relation.mask_id,
                    target_id: relation.target_id,
                });
            }
        }

        issues
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.layers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.layers.is_empty()
    }

    /// Serialize the project to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a project from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use crate::shapes::{Circle, Rectangle, Text};

    fn sample() -> (ProjectState, ElementId, ElementId) {
        let mut state = ProjectState::new();
        let a = state
            .insert_shape(Rectangle::new(Point::new(0.0, 0.0)).into())
            .unwrap();
        let b = state
            .insert_shape(Circle::new(Point::new(50.0, 50.0)).into())
            .unwrap();
        (state, a, b)
    }

    #[test]
    fn test_insert_creates_pair() {
        let (state, a, _) = sample();
        assert!(state.get_shape(&a).is_some());
        let layer = state.find_layer(&a).unwrap();
        assert_eq!(layer.kind, LayerKind::Shape);
        assert!(state.integrity_issues().is_empty());
    }

    #[test]
    fn test_insert_rejects_mismatch_and_duplicates() {
        let (mut state, a, _) = sample();
        let shape: Shape = Rectangle::with_id(a.clone(), Point::ZERO).into();
        let layer = Layer::for_shape(&shape);
        assert_eq!(
            state.insert_element(shape, layer, None),
            Err(EditError::DuplicateId(a))
        );

        let shape: Shape = Text::new(Point::ZERO).into();
        let layer = Layer::new("other", "Other", LayerKind::Text);
        assert!(matches!(
            state.insert_element(shape, layer, None),
            Err(EditError::IdMismatch { .. })
        ));
        assert!(state.integrity_issues().is_empty());
    }

    #[test]
    fn test_remove_cascades_to_shape() {
        let (mut state, a, b) = sample();
        state.remove_element(&a).unwrap();
        assert!(state.get_shape(&a).is_none());
        assert!(state.find_layer(&a).is_none());
        assert!(state.get_shape(&b).is_some());
        assert!(state.integrity_issues().is_empty());
    }

    #[test]
    fn test_remove_group_cascades_to_members() {
        let (mut state, a, b) = sample();
        let gid = state.layers_mut().group(&[a.clone(), b.clone()]).unwrap();
        state.remove_element(&gid).unwrap();
        assert!(state.shapes().is_empty());
        assert!(state.layers().is_empty());
    }

    #[test]
    fn test_translate_respects_lock_and_override() {
        let (mut state, a, b) = sample();
        state.update_layer(&b, &LayerPatch::locked(true)).unwrap();
        assert_eq!(state.translate_element(&b, 5.0, 5.0), Err(EditError::Locked(b.clone())));

        let patch = LayerPatch {
            x: Some(10.0),
            y: Some(10.0),
            ..LayerPatch::default()
        };
        state.update_layer(&a, &patch).unwrap();
        state.translate_element(&a, 5.0, 0.0).unwrap();
        let layer = state.find_layer(&a).unwrap();
        assert_eq!(layer.position_override(), Some(Point::new(15.0, 10.0)));
        let shape = state.get_shape(&a).unwrap();
        assert_eq!(shape.position(), Point::new(5.0, 0.0));
        assert_eq!(state.effective_position(layer, shape), Point::new(15.0, 10.0));
    }

    #[test]
    fn test_translate_group_leaves_locked_member() {
        let (mut state, a, b) = sample();
        state.update_layer(&b, &LayerPatch::locked(true)).unwrap();
        let gid = state.layers_mut().group(&[a.clone(), b.clone()]).unwrap();

        state.translate_element(&gid, 10.0, 0.0).unwrap();
        assert_eq!(state.get_shape(&a).unwrap().position(), Point::new(10.0, 0.0));
        assert_eq!(state.get_shape(&b).unwrap().position(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_integrity_reports_orphans() {
        let mut shapes = ShapeStore::new();
        shapes.add_shape(Rectangle::with_id("lonely", Point::ZERO).into());
        let layers = LayerTree::from_layers(vec![Layer::new("ghost", "Ghost", LayerKind::Shape)]);
        let state = ProjectState::from_parts(shapes, layers);

        let issues = state.integrity_issues();
        assert!(issues.contains(&IntegrityIssue::ShapeWithoutLayer("lonely".into())));
        assert!(issues.contains(&IntegrityIssue::LayerWithoutShape("ghost".into())));
    }

    #[test]
    fn test_json_roundtrip() {
        let (mut state, a, b) = sample();
        state.layers_mut().use_as_mask(&b).unwrap();
        state.update_layer(&a, &LayerPatch::opacity(40)).unwrap();

        let json = state.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["shapes"].is_array());
        assert!(value["layers"].is_array());

        let restored = ProjectState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }
}
