//! Layer hierarchy: compositing and organizational metadata over shapes.

mod group;
mod mask;
mod tree;

pub use mask::MaskRelation;
pub use tree::{LayerTree, ZOrder};

use crate::shapes::{ElementId, Shape, ShapeKind, ShapeTrait, generate_id};
use peniko::{Compose, Mix};
use serde::{Deserialize, Deserializer, Serialize};

/// Layer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Shape,
    Text,
    Image,
    Group,
    Adjustment,
    Mask,
}

impl LayerKind {
    /// Structural layers have no shape counterpart.
    pub fn is_structural(self) -> bool {
        matches!(self, LayerKind::Group | LayerKind::Adjustment | LayerKind::Mask)
    }

    /// Layer type used for a shape of the given kind.
    pub fn for_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Text => LayerKind::Text,
            ShapeKind::Asset => LayerKind::Image,
            _ => LayerKind::Shape,
        }
    }
}

/// Blend mode used when compositing a layer onto what lies beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    /// List all available blend modes
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
        ]
    }

    /// Standard 2D-canvas composite operation name.
    pub fn composite_operation(self) -> &'static str {
        match self {
            BlendMode::Normal => "source-over",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }

    /// Equivalent peniko blend mode (mix over source-over composition).
    pub fn to_peniko(self) -> peniko::BlendMode {
        let mix = match self {
            BlendMode::Normal => Mix::Normal,
            BlendMode::Multiply => Mix::Multiply,
            BlendMode::Screen => Mix::Screen,
            BlendMode::Overlay => Mix::Overlay,
            BlendMode::Darken => Mix::Darken,
            BlendMode::Lighten => Mix::Lighten,
            BlendMode::ColorDodge => Mix::ColorDodge,
            BlendMode::ColorBurn => Mix::ColorBurn,
            BlendMode::HardLight => Mix::HardLight,
            BlendMode::SoftLight => Mix::SoftLight,
            BlendMode::Difference => Mix::Difference,
            BlendMode::Exclusion => Mix::Exclusion,
        };
        peniko::BlendMode::new(mix, Compose::SrcOver)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn full_opacity() -> u8 {
    Layer::MAX_OPACITY
}

fn visible_by_default() -> bool {
    true
}

fn clamped_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    u8::deserialize(deserializer).map(|opacity| opacity.min(Layer::MAX_OPACITY))
}

/// A node in the layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: ElementId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// 0..=100.
    #[serde(default = "full_opacity", deserialize_with = "clamped_opacity")]
    pub opacity: u8,
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Child layers (group layers only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Layer>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_mask: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_mask: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_target_id: Option<ElementId>,
    /// Position override; wins over the shape's own position once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Layer {
    pub const MAX_OPACITY: u8 = 100;

    /// Create a layer with default compositing state.
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            visible: true,
            locked: false,
            opacity: Self::MAX_OPACITY,
            blend_mode: BlendMode::Normal,
            children: Vec::new(),
            has_mask: false,
            is_mask: false,
            mask_target_id: None,
            x: None,
            y: None,
        }
    }

    /// The layer paired with a shape (same id).
    pub fn for_shape(shape: &Shape) -> Self {
        Self::new(
            shape.id(),
            shape.kind().display_name(),
            LayerKind::for_shape(shape.kind()),
        )
    }

    /// A new group layer holding `children`.
    pub fn group(name: impl Into<String>, children: Vec<Layer>) -> Self {
        let mut layer = Self::new(generate_id("group"), name, LayerKind::Group);
        layer.children = children;
        layer
    }

    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }

    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }

    /// Whether this layer takes part in a mask relation on either side.
    pub fn in_mask_relation(&self) -> bool {
        self.has_mask || self.is_mask
    }

    /// Opacity as an alpha factor in 0.0..=1.0.
    pub fn alpha(&self) -> f64 {
        f64::from(self.opacity.min(Self::MAX_OPACITY)) / f64::from(Self::MAX_OPACITY)
    }

    /// Position override, if both coordinates are set.
    pub fn position_override(&self) -> Option<kurbo::Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(kurbo::Point::new(x, y)),
            _ => None,
        }
    }

    /// Depth-first visit of this layer and its descendants.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Layer)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Ids of this layer and all descendants.
    pub fn subtree_ids(&self) -> Vec<ElementId> {
        let mut ids = Vec::new();
        self.visit(&mut |l| ids.push(l.id.clone()));
        ids
    }

    /// Ids of this layer and the descendants that move with it. A locked
    /// layer stays put together with everything beneath it.
    pub fn movable_ids(&self) -> Vec<ElementId> {
        let mut ids = Vec::new();
        if !self.locked {
            ids.push(self.id.clone());
            for child in &self.children {
                ids.extend(child.movable_ids());
            }
        }
        ids
    }

    pub(crate) fn clear_mask_flags(&mut self) {
        self.has_mask = false;
        self.is_mask = false;
        self.mask_target_id = None;
    }
}

/// A partial layer update. Masking and children are managed by the tree's
/// structural operations, not by patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl LayerPatch {
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    pub fn opacity(opacity: u8) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    pub fn blend_mode(mode: BlendMode) -> Self {
        Self {
            blend_mode: Some(mode),
            ..Self::default()
        }
    }

    /// Write the provided fields into `layer`. Opacity is clamped to 100.
    pub fn apply_to(&self, layer: &mut Layer) {
        if let Some(name) = &self.name {
            layer.name = name.clone();
        }
        if let Some(visible) = self.visible {
            layer.visible = visible;
        }
        if let Some(locked) = self.locked {
            layer.locked = locked;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity.min(Layer::MAX_OPACITY);
        }
        if let Some(mode) = self.blend_mode {
            layer.blend_mode = mode;
        }
        if let Some(x) = self.x {
            layer.x = Some(x);
        }
        if let Some(y) = self.y {
            layer.y = Some(y);
        }
    }
}
