//! Compositor: turns the project state and selection into an ordered list of
//! draw instructions.
//!
//! The list is bottom-to-top. A renderer consumes it through
//! [`RenderBackend`]; nothing here touches a graphics API.

use crate::document::ProjectState;
use crate::layers::{BlendMode, Layer};
use crate::selection::Selection;
use crate::shapes::{ElementId, Shape, ShapeTrait};
use kurbo::{Circle, Point, Rect, Shape as _};

/// Clip geometry taken from a mask layer's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipRegion {
    Rect(Rect),
    Circle(Circle),
}

impl ClipRegion {
    pub fn contains(&self, point: Point) -> bool {
        match self {
            ClipRegion::Rect(rect) => rect.contains(point),
            ClipRegion::Circle(circle) => circle.contains(point),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            ClipRegion::Rect(rect) => *rect,
            ClipRegion::Circle(circle) => circle.bounding_box(),
        }
    }
}

/// One draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub layer_id: ElementId,
    /// Shape with the layer's position override already applied.
    pub shape: Shape,
    /// Own opacity multiplied by every ancestor group's opacity. Never zero.
    pub alpha: f64,
    pub blend_mode: BlendMode,
    pub clip: Option<ClipRegion>,
    pub selected: bool,
    pub locked: bool,
    /// Nesting depth; top-level layers are at 0.
    pub depth: usize,
}

impl RenderItem {
    /// Canvas composite operation name for the blend mode.
    pub fn composite_operation(&self) -> &'static str {
        self.blend_mode.composite_operation()
    }

    pub fn peniko_blend(&self) -> peniko::BlendMode {
        self.blend_mode.to_peniko()
    }

    /// Whether `point` hits the visible part of this item.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let clipped_out = self.clip.as_ref().is_some_and(|clip| !clip.contains(point));
        !clipped_out && self.shape.hit_test(point, tolerance)
    }
}

/// Anything that can draw a render list.
pub trait RenderBackend {
    /// Called once before the first item.
    fn begin(&mut self) {}

    /// Draw one item on top of everything drawn so far.
    fn draw(&mut self, item: &RenderItem);

    /// Called once after the last item.
    fn finish(&mut self) {}
}

/// Ordered draw instructions, bottom to top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, layer_id: &str) -> Option<&RenderItem> {
        self.items.iter().find(|item| item.layer_id == layer_id)
    }

    /// Layer ids in draw order.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.layer_id.as_str()).collect()
    }

    /// Drive a backend through the whole list.
    pub fn replay(&self, backend: &mut impl RenderBackend) {
        backend.begin();
        for item in &self.items {
            backend.draw(item);
        }
        backend.finish();
    }

    /// Topmost item under `point`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<&RenderItem> {
        self.items.iter().rev().find(|item| item.hit_test(point, tolerance))
    }
}

/// State inherited from ancestor groups.
#[derive(Debug, Clone, Copy)]
struct Inherited {
    alpha: f64,
    selected: bool,
    locked: bool,
    depth: usize,
}

/// Build the render list for the current state.
pub fn compose(state: &ProjectState, selection: &Selection) -> RenderList {
    let mut items = Vec::new();
    let root = Inherited {
        alpha: 1.0,
        selected: false,
        locked: false,
        depth: 0,
    };
    for layer in state.layers().layers() {
        compose_layer(state, selection, layer, root, &mut items);
    }
    RenderList { items }
}

fn compose_layer(
    state: &ProjectState,
    selection: &Selection,
    layer: &Layer,
    inherited: Inherited,
    items: &mut Vec<RenderItem>,
) {
    if !layer.visible || layer.is_mask {
        return;
    }
    let alpha = inherited.alpha * layer.alpha();
    if alpha <= 0.0 {
        return;
    }
    let here = Inherited {
        alpha,
        selected: inherited.selected || selection.is_selected(&layer.id),
        locked: inherited.locked || layer.locked,
        depth: inherited.depth,
    };

    if layer.is_group() {
        let nested = Inherited {
            depth: here.depth + 1,
            ..here
        };
        for child in &layer.children {
            compose_layer(state, selection, child, nested, items);
        }
        return;
    }
    if layer.is_structural() {
        // Adjustment layers carry no geometry.
        return;
    }

    let Some(shape) = state.get_shape(&layer.id) else {
        log::warn!("Skipping layer {} with no shape", layer.id);
        return;
    };

    let clip = if layer.has_mask {
        mask_clip(state, &layer.id)
    } else {
        None
    };

    items.push(RenderItem {
        layer_id: layer.id.clone(),
        shape: positioned(layer, shape),
        alpha,
        blend_mode: layer.blend_mode,
        clip,
        selected: here.selected,
        locked: here.locked,
        depth: here.depth,
    });
}

/// The shape as drawn: the layer's position override wins.
fn positioned(layer: &Layer, shape: &Shape) -> Shape {
    let mut shape = shape.clone();
    if let Some(position) = layer.position_override() {
        shape.set_position(position);
    }
    shape
}

fn mask_clip(state: &ProjectState, target_id: &str) -> Option<ClipRegion> {
    let Some(mask) = state.layers().mask_source_for(target_id) else {
        log::warn!("Layer {} is flagged as masked but has no mask layer", target_id);
        return None;
    };
    let Some(shape) = state.get_shape(&mask.id) else {
        log::warn!("Mask layer {} has no shape", mask.id);
        return None;
    };
    match positioned(mask, shape) {
        Shape::Rectangle(rect) => Some(ClipRegion::Rect(rect.bounds())),
        Shape::Circle(circle) => Some(ClipRegion::Circle(circle.as_kurbo())),
        other => {
            log::debug!(
                "Mask shape type {} is not supported for clipping; drawing {} unclipped",
                other.kind().as_str(),
                target_id
            );
            None
        }
    }
}
