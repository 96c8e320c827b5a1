//! The interaction state machine tying the model together.
//!
//! [`Editor`] owns the project state, the selection, the clipboard and the
//! active tool. Every input goes through it; every mutation bumps
//! [`Editor::revision`], which the auto-save scheduler watches.

use crate::clipboard::{Clipboard, offset_copy};
use crate::compositor::{RenderList, compose};
use crate::config::EditorConfig;
use crate::document::ProjectState;
use crate::error::{EditError, EditResult};
use crate::input::{ClickKind, ClickTracker, KeyCommand, Modifiers};
use crate::layers::{Layer, LayerPatch, MaskRelation, ZOrder};
use crate::selection::{InteractionMode, Selection};
use crate::shapes::{Asset, ElementId, Shape, ShapePatch};
use crate::tools::ToolKind;
use kurbo::Point;
use std::time::Instant;

/// What a pointer press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// A placement tool created this element.
    Placed(ElementId),
    /// Single selection of this element.
    Selected(ElementId),
    /// Toggled this element in or out of the multi-selection.
    Toggled(ElementId),
    /// Second click on the same element within the double-click window.
    /// Selection is left as it was.
    DrillIntent(ElementId),
    /// Click on empty canvas cleared the selection.
    Cleared,
}

fn logged<T>(action: &str, result: EditResult<T>) -> EditResult<T> {
    if let Err(e) = &result {
        log::warn!("{} rejected: {}", action, e);
    }
    result
}

/// Canvas editor session.
#[derive(Debug, Clone)]
pub struct Editor {
    state: ProjectState,
    selection: Selection,
    clipboard: Clipboard,
    tool: ToolKind,
    mode: InteractionMode,
    clicks: ClickTracker,
    config: EditorConfig,
    text_input_focused: bool,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(ProjectState::new(), config)
    }

    /// Open an existing project.
    pub fn with_state(state: ProjectState, config: EditorConfig) -> Self {
        Self {
            state,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            tool: ToolKind::Select,
            mode: InteractionMode::Default,
            clicks: ClickTracker::new(config.double_click_window()),
            config,
            text_input_focused: false,
            revision: 0,
        }
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Incremented by every model mutation. Selection changes do not count.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// While a text input has focus, keyboard shortcuts are ignored.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Track held modifiers; holding the drill-down modifier enters
    /// drill-down mode until it is released.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.mode = if modifiers.drill_down() {
            InteractionMode::DrillDown
        } else {
            InteractionMode::Default
        };
    }

    /// Replace the whole project, e.g. after loading. Not counted as an edit.
    pub fn load_state(&mut self, state: ProjectState) {
        self.state = state;
        self.selection.clear();
        self.clicks.reset();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn prune_selection(&mut self) {
        self.selection.retain(|id| self.state.find_layer(id).is_some());
    }

    /// Current render list.
    pub fn compose(&self) -> RenderList {
        compose(&self.state, &self.selection)
    }

    /// Element a click at `point` resolves to in the current mode.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        let list = self.compose();
        let hit = list.hit_test(point, self.config.hit_tolerance)?;
        match self.mode {
            InteractionMode::DrillDown => Some(hit.layer_id.clone()),
            _ => self
                .state
                .layers()
                .top_level_ancestor(&hit.layer_id)
                .map(str::to_string),
        }
    }

    // --- Pointer input ---

    /// Handle a primary-button press on the canvas.
    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers, now: Instant) -> EditResult<PointerOutcome> {
        self.set_modifiers(modifiers);

        if let Some(shape) = self.tool.create_shape(point, self.config.default_fill) {
            let id = logged("Place shape", self.state.insert_shape(shape))?;
            log::debug!("Placed {} at ({}, {})", id, point.x, point.y);
            self.selection.select(id.clone());
            self.tool = ToolKind::Select;
            self.touch();
            return Ok(PointerOutcome::Placed(id));
        }

        match self.element_at(point) {
            Some(id) => self.click_element(&id, modifiers, now),
            None => {
                self.clicks.reset();
                self.selection.clear();
                Ok(PointerOutcome::Cleared)
            }
        }
    }

    /// Click on a known element (canvas hit or layer panel row).
    pub fn click_element(&mut self, id: &str, modifiers: Modifiers, now: Instant) -> EditResult<PointerOutcome> {
        if !self.state.layers().contains(id) {
            return logged("Select", Err(EditError::LayerNotFound(id.to_string())));
        }
        if self.clicks.register(id, now) == ClickKind::Double {
            return Ok(PointerOutcome::DrillIntent(id.to_string()));
        }
        if modifiers.command() {
            self.selection.toggle(id);
            Ok(PointerOutcome::Toggled(id.to_string()))
        } else {
            self.selection.select(id);
            Ok(PointerOutcome::Selected(id.to_string()))
        }
    }

    /// Move every selected element. Locked elements stay put; the call fails
    /// only when nothing could move. A selected layer inside a selected group
    /// moves once, with the group.
    pub fn drag_selected(&mut self, dx: f64, dy: f64) -> EditResult<usize> {
        let selected = self.selection.ids();
        if selected.is_empty() {
            return Err(EditError::NothingSelected);
        }
        let layers = self.state.layers();
        let ids: Vec<ElementId> = selected
            .iter()
            .filter(|id| !selected.iter().any(|other| layers.is_descendant_of(id, other)))
            .cloned()
            .collect();
        let mut moved = 0;
        let mut refused = None;
        for id in &ids {
            match self.state.translate_element(id, dx, dy) {
                Ok(()) => moved += 1,
                Err(e) => {
                    log::debug!("Not dragging {}: {}", id, e);
                    refused.get_or_insert(e);
                }
            }
        }
        if moved > 0 {
            self.touch();
            return Ok(moved);
        }
        logged("Drag", Err(refused.unwrap_or(EditError::NothingSelected)))
    }

    // --- Selection ---

    /// Select every top-level layer; the first becomes primary.
    pub fn select_all(&mut self) {
        let ids = self.state.layers().layers().iter().map(|l| l.id.clone()).collect();
        self.selection.select_many(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn primary(&self) -> EditResult<ElementId> {
        self.selection
            .primary()
            .map(str::to_string)
            .ok_or(EditError::NothingSelected)
    }

    // --- Clipboard ---

    fn primary_pair(&self) -> EditResult<(Shape, Layer)> {
        let id = self.primary()?;
        let layer = self
            .state
            .find_layer(&id)
            .ok_or_else(|| EditError::LayerNotFound(id.clone()))?;
        if layer.is_structural() {
            return Err(EditError::StructuralLayer(id));
        }
        let shape = self
            .state
            .get_shape(&id)
            .ok_or_else(|| EditError::ShapeNotFound(id.clone()))?;
        Ok((shape.clone(), layer.clone()))
    }

    /// Copy the primary element.
    pub fn copy(&mut self) -> EditResult<()> {
        let (shape, layer) = logged("Copy", self.primary_pair())?;
        self.clipboard.copy(shape, layer);
        Ok(())
    }

    /// Copy the primary element, then delete it.
    pub fn cut(&mut self) -> EditResult<ElementId> {
        let (shape, layer) = logged("Cut", self.primary_pair())?;
        let id = layer.id.clone();
        self.state.remove_element(&id)?;
        self.clipboard.copy(shape, layer);
        self.prune_selection();
        self.touch();
        Ok(id)
    }

    /// Insert a copy of the clipboard, offset from the copied source, and
    /// select it.
    pub fn paste(&mut self) -> EditResult<ElementId> {
        let (shape, layer) = logged(
            "Paste",
            self.clipboard
                .paste(self.config.paste_offset)
                .ok_or(EditError::ClipboardEmpty),
        )?;
        self.insert_copy(shape, layer)
    }

    /// Copy the primary element in place (offset), without touching the
    /// clipboard.
    pub fn duplicate(&mut self) -> EditResult<ElementId> {
        let (shape, layer) = logged("Duplicate", self.primary_pair())?;
        let offset = self.config.paste_offset;
        let (shape, layer) = offset_copy(&shape, &layer, offset, offset);
        self.insert_copy(shape, layer)
    }

    fn insert_copy(&mut self, shape: Shape, layer: Layer) -> EditResult<ElementId> {
        let id = layer.id.clone();
        logged("Insert copy", self.state.insert_element(shape, layer, None))?;
        self.selection.select(id.clone());
        self.touch();
        Ok(id)
    }

    // --- Structural edits ---

    /// Delete every selected element (groups take their subtree along).
    pub fn delete_selected(&mut self) -> EditResult<Vec<ElementId>> {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return logged("Delete", Err(EditError::NothingSelected));
        }
        let mut removed = Vec::new();
        for id in ids {
            // Already gone if an earlier id was its group.
            if self.state.find_layer(&id).is_some() {
                self.state.remove_element(&id)?;
                removed.push(id);
            }
        }
        self.prune_selection();
        self.touch();
        Ok(removed)
    }

    /// Delete one element.
    pub fn remove_element(&mut self, id: &str) -> EditResult<()> {
        logged("Delete", self.state.remove_element(id))?;
        self.prune_selection();
        self.touch();
        Ok(())
    }

    /// Group the multi-selection. The new group becomes the primary selection.
    pub fn group_selected(&mut self) -> EditResult<ElementId> {
        let ids = self.selection.multi().to_vec();
        if ids.len() < 2 {
            return logged("Group", Err(EditError::NotEnoughSelected(ids.len())));
        }
        let group_id = logged("Group", self.state.layers_mut().group(&ids))?;
        self.selection.select(group_id.clone());
        self.touch();
        Ok(group_id)
    }

    /// Ungroup a group layer and clear the selection.
    pub fn ungroup(&mut self, id: &str) -> EditResult<Vec<ElementId>> {
        let children = logged("Ungroup", self.state.layers_mut().ungroup(id))?;
        self.selection.clear();
        self.touch();
        Ok(children)
    }

    pub fn ungroup_selected(&mut self) -> EditResult<Vec<ElementId>> {
        let id = logged("Ungroup", self.primary())?;
        self.ungroup(&id)
    }

    /// Use `id` as the mask of the layer directly beneath it.
    pub fn use_as_mask(&mut self, id: &str) -> EditResult<MaskRelation> {
        let relation = logged("Use as mask", self.state.layers_mut().use_as_mask(id))?;
        self.touch();
        Ok(relation)
    }

    pub fn unmask(&mut self, id: &str) -> EditResult<MaskRelation> {
        let relation = logged("Unmask", self.state.layers_mut().unmask(id))?;
        self.touch();
        Ok(relation)
    }

    pub fn reorder(&mut self, id: &str, order: ZOrder) -> EditResult<()> {
        logged("Reorder", self.state.layers_mut().reorder(id, order))?;
        self.touch();
        Ok(())
    }

    pub fn reorder_selected(&mut self, order: ZOrder) -> EditResult<()> {
        let id = logged("Reorder", self.primary())?;
        self.reorder(&id, order)
    }

    // --- Property edits ---

    /// Returns whether anything changed.
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> EditResult<bool> {
        let changed = logged("Update shape", self.state.update_shape(id, patch))?;
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    pub fn update_layer(&mut self, id: &str, patch: &LayerPatch) -> EditResult<()> {
        logged("Update layer", self.state.update_layer(id, patch))?;
        self.touch();
        Ok(())
    }

    /// Insert a model reference (upload or finished generation) at
    /// `origin`. The selection is left alone.
    pub fn insert_asset(&mut self, url: impl Into<String>, origin: Point) -> EditResult<ElementId> {
        let shape = Asset::new(url, origin);
        let id = logged("Insert asset", self.state.insert_shape(shape.into()))?;
        self.touch();
        Ok(id)
    }

    // --- Keyboard ---

    /// Handle a key press. Returns the command that ran, if the key is
    /// bound and no text input has focus. Command failures are logged.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> Option<KeyCommand> {
        if self.text_input_focused {
            return None;
        }
        let command = KeyCommand::from_key(key, modifiers)?;
        // Failures were already logged where they were detected.
        let _ = self.execute(command);
        Some(command)
    }

    /// Run an editor command.
    pub fn execute(&mut self, command: KeyCommand) -> EditResult<()> {
        match command {
            KeyCommand::Copy => self.copy(),
            KeyCommand::Cut => self.cut().map(drop),
            KeyCommand::Paste => self.paste().map(drop),
            KeyCommand::Duplicate => self.duplicate().map(drop),
            KeyCommand::Delete => self.delete_selected().map(drop),
            KeyCommand::SelectAll => {
                self.select_all();
                Ok(())
            }
            KeyCommand::Group => self.group_selected().map(drop),
            KeyCommand::Ungroup => self.ungroup_selected().map(drop),
            KeyCommand::BringToFront => self.reorder_selected(ZOrder::ToFront),
            KeyCommand::SendToBack => self.reorder_selected(ZOrder::ToBack),
            KeyCommand::ClearSelection => {
                self.clear_selection();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use crate::shapes::{ShapeKind, ShapeTrait};
    use kurbo::Size;
    use std::time::Duration;

    fn place(editor: &mut Editor, tool: ToolKind, at: Point, now: Instant) -> ElementId {
        editor.set_tool(tool);
        match editor.pointer_down(at, Modifiers::NONE, now).unwrap() {
            PointerOutcome::Placed(id) => id,
            other => panic!("expected placement, got {other:?}"),
        }
    }

    /// Two rectangles far apart, nothing selected.
    fn two_rects() -> (Editor, ElementId, ElementId, Instant) {
        let mut editor = Editor::default();
        let t0 = Instant::now();
        let a = place(&mut editor, ToolKind::Rectangle, Point::new(100.0, 100.0), t0);
        let b = place(&mut editor, ToolKind::Rectangle, Point::new(400.0, 100.0), t0);
        editor.clear_selection();
        (editor, a, b, t0 + Duration::from_secs(1))
    }

    fn later(t: Instant, n: u64) -> Instant {
        t + Duration::from_millis(500 * n)
    }

    #[test]
    fn test_rectangle_placement() {
        let mut editor = Editor::default();
        let id = place(&mut editor, ToolKind::Rectangle, Point::new(100.0, 100.0), Instant::now());

        let shape = editor.state().get_shape(&id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.position(), Point::new(100.0, 100.0));
        assert_eq!(shape.bounds().size(), Size::new(150.0, 100.0));
        assert_eq!(shape.fill().to_hex(), "#9146ff");

        let layer = editor.state().find_layer(&id).unwrap();
        assert_eq!(layer.kind, LayerKind::Shape);
        assert_eq!(layer.opacity, 100);
        assert!(layer.visible && !layer.locked);

        assert_eq!(editor.selection().primary(), Some(id.as_str()));
        assert_eq!(editor.tool(), ToolKind::Select);
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn test_click_empty_canvas_clears() {
        let (mut editor, a, _, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        let outcome = editor.pointer_down(Point::new(900.0, 900.0), Modifiers::NONE, later(t, 1));
        assert_eq!(outcome, Ok(PointerOutcome::Cleared));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_modifier_click_scenario() {
        let (mut editor, a, b, t) = two_rects();
        let pa = Point::new(120.0, 120.0);
        let pb = Point::new(420.0, 120.0);

        assert_eq!(
            editor.pointer_down(pa, Modifiers::NONE, t),
            Ok(PointerOutcome::Selected(a.clone()))
        );
        assert_eq!(
            editor.pointer_down(pb, Modifiers::COMMAND, later(t, 1)),
            Ok(PointerOutcome::Toggled(b.clone()))
        );
        assert_eq!(editor.selection().multi(), [a.clone(), b.clone()]);
        assert_eq!(editor.selection().primary(), Some(b.as_str()));

        editor.pointer_down(pa, Modifiers::COMMAND, later(t, 2)).unwrap();
        assert_eq!(editor.selection().multi(), [b.clone()]);
        assert_eq!(editor.selection().primary(), Some(b.as_str()));
        // Selection alone is not an edit.
        assert_eq!(editor.revision(), 2);
    }

    #[test]
    fn test_double_click_reports_intent_only() {
        let (mut editor, a, _, t) = two_rects();
        let p = Point::new(120.0, 120.0);
        editor.pointer_down(p, Modifiers::NONE, t).unwrap();
        let outcome = editor.pointer_down(p, Modifiers::NONE, t + Duration::from_millis(150));
        assert_eq!(outcome, Ok(PointerOutcome::DrillIntent(a.clone())));
        assert_eq!(editor.selection().primary(), Some(a.as_str()));
    }

    #[test]
    fn test_drill_down_resolves_innermost() {
        let (mut editor, a, b, t) = two_rects();
        editor.select_all();
        let gid = editor.group_selected().unwrap();
        editor.clear_selection();
        assert_eq!(editor.state().find_layer(&gid).unwrap().subtree_ids()[1..], [a.clone(), b]);

        let p = Point::new(120.0, 120.0);
        assert_eq!(
            editor.pointer_down(p, Modifiers::NONE, t),
            Ok(PointerOutcome::Selected(gid.clone()))
        );
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            editor.pointer_down(p, alt, later(t, 1)),
            Ok(PointerOutcome::Selected(a.clone()))
        );
        assert_eq!(editor.mode(), InteractionMode::DrillDown);
        editor.set_modifiers(Modifiers::NONE);
        assert_eq!(editor.mode(), InteractionMode::Default);
    }

    #[test]
    fn test_duplicate_offsets_by_twenty() {
        let mut editor = Editor::default();
        let id = place(&mut editor, ToolKind::Circle, Point::new(100.0, 100.0), Instant::now());

        assert_eq!(editor.key_down("d", Modifiers::COMMAND), Some(KeyCommand::Duplicate));
        let copy = editor.selection().primary().unwrap().to_string();
        assert_ne!(copy, id);
        assert_eq!(
            editor.state().get_shape(&copy).unwrap().position(),
            Point::new(120.0, 120.0)
        );
        assert_eq!(editor.state().find_layer(&copy).unwrap().name, "Circle copy");
        assert!(editor.clipboard().is_empty());
        assert!(editor.state().integrity_issues().is_empty());
    }

    #[test]
    fn test_copy_paste_always_offsets_from_source() {
        let mut editor = Editor::default();
        place(&mut editor, ToolKind::Diamond, Point::new(0.0, 0.0), Instant::now());
        editor.copy().unwrap();

        let first = editor.paste().unwrap();
        let second = editor.paste().unwrap();
        assert_ne!(first, second);
        for id in [&first, &second] {
            assert_eq!(editor.state().get_shape(id).unwrap().position(), Point::new(20.0, 20.0));
        }
        assert_eq!(editor.state().shapes().len(), 3);
    }

    #[test]
    fn test_paste_empty_clipboard_fails_cleanly() {
        let mut editor = Editor::default();
        assert_eq!(editor.paste(), Err(EditError::ClipboardEmpty));
        assert_eq!(editor.copy(), Err(EditError::NothingSelected));
        assert!(editor.state().is_empty());
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_cut_removes_and_fills_clipboard() {
        let (mut editor, a, _, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        editor.key_down("x", Modifiers::COMMAND);

        assert!(editor.state().get_shape(&a).is_none());
        assert!(editor.selection().is_empty());
        assert_eq!(editor.clipboard().entry().unwrap().layer.id, a);

        let pasted = editor.paste().unwrap();
        assert_eq!(
            editor.state().get_shape(&pasted).unwrap().position(),
            Point::new(120.0, 120.0)
        );
    }

    #[test]
    fn test_delete_selected() {
        let (mut editor, a, b, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        assert_eq!(editor.key_down("Delete", Modifiers::NONE), Some(KeyCommand::Delete));

        assert!(editor.state().get_shape(&a).is_none());
        assert!(editor.state().find_layer(&a).is_none());
        assert!(editor.state().get_shape(&b).is_some());
        assert!(editor.selection().is_empty());
        assert!(editor.state().integrity_issues().is_empty());
    }

    #[test]
    fn test_group_and_ungroup_shortcuts() {
        let (mut editor, a, b, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        editor.click_element(&b, Modifiers::COMMAND, later(t, 1)).unwrap();

        editor.key_down("g", Modifiers::COMMAND);
        let gid = editor.selection().primary().unwrap().to_string();
        assert!(editor.selection().multi().is_empty());
        let group = editor.state().find_layer(&gid).unwrap();
        assert!(group.is_group());
        assert_eq!(group.children.len(), 2);
        assert_eq!(editor.state().layers().len(), 1);

        let shift_cmd = Modifiers {
            shift: true,
            ..Modifiers::COMMAND
        };
        editor.key_down("G", shift_cmd);
        assert!(editor.state().find_layer(&gid).is_none());
        assert_eq!(editor.state().layers().len(), 2);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_group_needs_two() {
        let (mut editor, a, _, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        assert_eq!(editor.group_selected(), Err(EditError::NotEnoughSelected(0)));
        assert_eq!(editor.state().layers().len(), 2);
    }

    #[test]
    fn test_select_all_top_level() {
        let (mut editor, a, b, _) = two_rects();
        editor.key_down("a", Modifiers::COMMAND);
        assert_eq!(editor.selection().primary(), Some(a.as_str()));
        assert_eq!(editor.selection().ids(), vec![a, b]);

        editor.key_down("Escape", Modifiers::NONE);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_shortcuts_ignored_in_text_input() {
        let (mut editor, a, _, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        editor.set_text_input_focused(true);
        assert_eq!(editor.key_down("Backspace", Modifiers::NONE), None);
        assert!(editor.state().get_shape(&a).is_some());
    }

    #[test]
    fn test_reorder_shortcuts() {
        let (mut editor, a, b, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        editor.key_down("]", Modifiers::NONE);
        let order: Vec<&str> = editor.state().layers().layers().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec![b.as_str(), a.as_str()]);

        editor.key_down("[", Modifiers::NONE);
        let order: Vec<&str> = editor.state().layers().layers().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_drag_skips_locked() {
        let (mut editor, a, b, t) = two_rects();
        editor.update_layer(&b, &LayerPatch::locked(true)).unwrap();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        editor.click_element(&b, Modifiers::COMMAND, later(t, 1)).unwrap();

        assert_eq!(editor.drag_selected(10.0, 5.0), Ok(1));
        assert_eq!(editor.state().get_shape(&a).unwrap().position(), Point::new(110.0, 105.0));
        assert_eq!(editor.state().get_shape(&b).unwrap().position(), Point::new(400.0, 100.0));

        editor.click_element(&b, Modifiers::NONE, later(t, 2)).unwrap();
        assert_eq!(editor.drag_selected(10.0, 5.0), Err(EditError::Locked(b)));
    }

    #[test]
    fn test_drag_group_leaves_locked_member() {
        let (mut editor, a, b, t) = two_rects();
        editor.update_layer(&b, &LayerPatch::locked(true)).unwrap();
        editor.click_element(&a, Modifiers::COMMAND, t).unwrap();
        editor.click_element(&b, Modifiers::COMMAND, later(t, 1)).unwrap();
        editor.group_selected().unwrap();

        assert_eq!(editor.drag_selected(10.0, 0.0), Ok(1));
        assert_eq!(editor.state().get_shape(&a).unwrap().position(), Point::new(110.0, 100.0));
        assert_eq!(editor.state().get_shape(&b).unwrap().position(), Point::new(400.0, 100.0));
    }

    #[test]
    fn test_drag_group_and_member_moves_member_once() {
        let (mut editor, a, b, t) = two_rects();
        editor.click_element(&a, Modifiers::COMMAND, t).unwrap();
        editor.click_element(&b, Modifiers::COMMAND, later(t, 1)).unwrap();
        let gid = editor.group_selected().unwrap();
        editor.click_element(&a, Modifiers::COMMAND, later(t, 2)).unwrap();
        assert_eq!(editor.selection().ids(), vec![gid, a.clone()]);

        assert_eq!(editor.drag_selected(10.0, 0.0), Ok(1));
        assert_eq!(editor.state().get_shape(&a).unwrap().position(), Point::new(110.0, 100.0));
        assert_eq!(editor.state().get_shape(&b).unwrap().position(), Point::new(410.0, 100.0));
    }

    #[test]
    fn test_mask_over_group_is_rejected() {
        let (mut editor, a, b, t) = two_rects();
        editor.click_element(&a, Modifiers::COMMAND, t).unwrap();
        editor.click_element(&b, Modifiers::COMMAND, later(t, 1)).unwrap();
        let gid = editor.group_selected().unwrap();
        let circle = place(&mut editor, ToolKind::Circle, Point::new(150.0, 150.0), later(t, 2));
        let revision = editor.revision();

        assert_eq!(editor.use_as_mask(&circle), Err(EditError::StructuralLayer(gid)));
        assert_eq!(editor.revision(), revision);
        let list = editor.compose();
        assert_eq!(list.len(), 3);
        assert!(list.get(&circle).is_some());
        assert!(list.get(&a).unwrap().clip.is_none());
    }

    #[test]
    fn test_mask_and_unmask() {
        let (mut editor, a, b, _) = two_rects();
        let relation = editor.use_as_mask(&b).unwrap();
        assert_eq!(relation.target_id, a);
        assert!(editor.state().find_layer(&a).unwrap().has_mask);

        editor.unmask(&a).unwrap();
        assert!(!editor.state().find_layer(&b).unwrap().is_mask);
        assert_eq!(editor.unmask(&a), Err(EditError::NotMasked(a.clone())));
    }

    #[test]
    fn test_zero_opacity_layer_is_not_rendered() {
        let (mut editor, a, b, _) = two_rects();
        editor.update_layer(&a, &LayerPatch::opacity(0)).unwrap();
        let list = editor.compose();
        assert_eq!(list.layer_ids(), vec![b.as_str()]);
        // Invisible to clicks as well.
        assert_eq!(editor.element_at(Point::new(120.0, 120.0)), None);
    }

    #[test]
    fn test_insert_asset_keeps_selection() {
        let (mut editor, a, _, t) = two_rects();
        editor.click_element(&a, Modifiers::NONE, t).unwrap();
        let id = editor
            .insert_asset("https://cdn.example/robot.glb", Point::new(0.0, 400.0))
            .unwrap();
        assert!(matches!(editor.state().get_shape(&id), Some(Shape::Asset(_))));
        assert_eq!(editor.state().find_layer(&id).unwrap().kind, LayerKind::Image);
        assert_eq!(editor.selection().primary(), Some(a.as_str()));
    }

    #[test]
    fn test_update_shape_counts_only_changes() {
        let (mut editor, a, _, _) = two_rects();
        let before = editor.revision();
        assert_eq!(editor.update_shape(&a, &ShapePatch::default()), Ok(false));
        assert_eq!(editor.revision(), before);
        assert_eq!(editor.update_shape(&a, &ShapePatch::size(10.0, 10.0)), Ok(true));
        assert_eq!(editor.revision(), before + 1);
        assert!(matches!(
            editor.update_shape("missing", &ShapePatch::size(1.0, 1.0)),
            Err(EditError::ShapeNotFound(_))
        ));
    }
}
