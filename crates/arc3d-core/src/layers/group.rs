//! Grouping and ungrouping of top-level layers.

use super::{Layer, LayerTree};
use crate::error::{EditError, EditResult};
use crate::shapes::ElementId;

impl LayerTree {
    /// Nest the given top-level layers under a new group appended at the top.
    ///
    /// Members keep their ids and relative z-order. Returns the group id.
    pub fn group(&mut self, ids: &[ElementId]) -> EditResult<ElementId> {
        let mut unique: Vec<&ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return Err(EditError::NotEnoughSelected(unique.len()));
        }
        for id in &unique {
            if self.top_level_index(id).is_none() {
                return Err(if self.contains(id) {
                    EditError::NotTopLevel((*id).clone())
                } else {
                    EditError::LayerNotFound((*id).clone())
                });
            }
        }

        let (members, rest): (Vec<Layer>, Vec<Layer>) = std::mem::take(&mut self.layers)
            .into_iter()
            .partition(|l| unique.contains(&&l.id));
        self.layers = rest;

        let name = format!("Group {}", self.count_groups() + 1);
        let group = Layer::group(name, members);
        let group_id = group.id.clone();
        self.layers.push(group);
        Ok(group_id)
    }

    /// Dissolve a group, appending its children to the end of the top-level
    /// sequence. Returns the ids of the released children.
    pub fn ungroup(&mut self, id: &str) -> EditResult<Vec<ElementId>> {
        let layer = self
            .find_layer(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        if !layer.is_group() {
            return Err(EditError::NotAGroup(id.to_string()));
        }
        if layer.children.is_empty() {
            return Err(EditError::EmptyGroup(id.to_string()));
        }

        let group = self
            .detach(id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))?;
        let child_ids = group.children.iter().map(|c| c.id.clone()).collect();
        self.layers.extend(group.children);
        Ok(child_ids)
    }

    fn count_groups(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |l| {
            if l.is_group() {
                count += 1;
            }
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EditError;
    use crate::layers::{Layer, LayerKind, LayerTree};

    fn tree(ids: &[&str]) -> LayerTree {
        LayerTree::from_layers(
            ids.iter()
                .map(|id| Layer::new(*id, *id, LayerKind::Shape))
                .collect(),
        )
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_moves_members_under_new_group() {
        let mut t = tree(&["a", "b", "c", "d"]);
        let gid = t.group(&ids(&["d", "b"])).unwrap();

        let top: Vec<&str> = t.layers().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(top, vec!["a", "c", gid.as_str()]);

        let group = t.find_layer(&gid).unwrap();
        assert_eq!(group.kind, LayerKind::Group);
        // Existing z-order of the members is preserved.
        let children: Vec<&str> = group.children.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(children, vec!["b", "d"]);
    }

    #[test]
    fn test_group_needs_two() {
        let mut t = tree(&["a", "b"]);
        assert_eq!(t.group(&ids(&["a"])), Err(EditError::NotEnoughSelected(1)));
        assert_eq!(t.group(&ids(&["a", "a"])), Err(EditError::NotEnoughSelected(1)));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_group_rejects_unknown_without_mutating() {
        let mut t = tree(&["a", "b"]);
        assert_eq!(
            t.group(&ids(&["a", "zz"])),
            Err(EditError::LayerNotFound("zz".into()))
        );
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_ungroup_restores_children_at_end() {
        let mut t = tree(&["a", "b", "c"]);
        let gid = t.group(&ids(&["a", "b"])).unwrap();
        t.add_layer(Layer::new("e", "e", LayerKind::Shape), None).unwrap();

        let released = t.ungroup(&gid).unwrap();
        assert_eq!(released, ids(&["a", "b"]));
        let top: Vec<&str> = t.layers().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(top, vec!["c", "e", "a", "b"]);
        assert!(t.find_layer(&gid).is_none());
    }

    #[test]
    fn test_ungroup_invalid_targets() {
        let mut t = tree(&["a"]);
        assert_eq!(t.ungroup("a"), Err(EditError::NotAGroup("a".into())));
        assert_eq!(t.ungroup("zz"), Err(EditError::LayerNotFound("zz".into())));

        let empty = Layer::group("Empty", Vec::new());
        let eid = empty.id.clone();
        t.add_layer(empty, None).unwrap();
        assert_eq!(t.ungroup(&eid), Err(EditError::EmptyGroup(eid.clone())));
        assert!(t.find_layer(&eid).is_some());
    }
}
