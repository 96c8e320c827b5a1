//! Selection state: a primary id plus an ordered multi-select set.

use crate::shapes::ElementId;
use serde::{Deserialize, Serialize};

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Clicks resolve to top-level layers.
    #[default]
    Default,
    /// Drill-down modifier held: clicks resolve to the innermost layer hit.
    DrillDown,
    /// Reserved for editing inside a single group. Never entered.
    Isolated,
}

/// Transient selection. Not persisted.
///
/// `multi` is kept in toggle order so the primary id can follow the most
/// recently toggled-in member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    primary: Option<ElementId>,
    multi: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary (canvas) selection.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Multi-select members, oldest toggle first.
    pub fn multi(&self) -> &[ElementId] {
        &self.multi
    }

    /// Select exactly one id; clears multi-select.
    pub fn select(&mut self, id: impl Into<ElementId>) {
        self.multi.clear();
        self.primary = Some(id.into());
    }

    /// Toggle membership in the multi-select set.
    ///
    /// An empty set is first seeded with the current primary so that a plain
    /// click followed by a modifier click selects both.
    pub fn toggle(&mut self, id: impl Into<ElementId>) {
        let id = id.into();
        if self.multi.is_empty() {
            if let Some(primary) = self.primary.take() {
                self.multi.push(primary);
            }
        }
        if let Some(pos) = self.multi.iter().position(|m| *m == id) {
            self.multi.remove(pos);
        } else {
            self.multi.push(id);
        }
        self.primary = self.multi.last().cloned();
    }

    /// Replace the selection with `ids`; the first becomes primary.
    pub fn select_many(&mut self, ids: Vec<ElementId>) {
        self.primary = ids.first().cloned();
        self.multi = if ids.len() > 1 { ids } else { Vec::new() };
    }

    pub fn clear(&mut self) {
        self.primary = None;
        self.multi.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.multi.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.primary.as_deref() == Some(id) || self.multi.iter().any(|m| m == id)
    }

    /// Everything selected: the multi-select set, or just the primary.
    pub fn ids(&self) -> Vec<ElementId> {
        if self.multi.is_empty() {
            self.primary.iter().cloned().collect()
        } else {
            self.multi.clone()
        }
    }

    /// Drop ids that no longer exist, keeping the primary consistent.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.multi.retain(|id| keep(id));
        let primary_gone = self.primary.as_deref().is_some_and(|p| !keep(p));
        if primary_gone {
            self.primary = self.multi.last().cloned();
        }
    }
}
