//! Selection set over scene entities.

use crate::shapes::{ConnectorId, ShapeId};
use std::collections::BTreeSet;

/// Reference to a selectable scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneRef {
    Shape(ShapeId),
    Connector(ConnectorId),
}

/// The set of currently selected entities.
///
/// Holds ids only; entries may go stale when the document changes underneath
/// (undo, load). Callers clear the selection on those transitions.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: BTreeSet<SceneRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single entity.
    pub fn select(&mut self, item: SceneRef) {
        self.items.clear();
        self.items.insert(item);
    }

    pub fn add(&mut self, item: SceneRef) {
        self.items.insert(item);
    }

    /// Toggle membership, for shift-click style interaction.
    pub fn toggle(&mut self, item: SceneRef) {
        if !self.items.remove(&item) {
            self.items.insert(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item: SceneRef) -> bool {
        self.items.contains(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = SceneRef> + '_ {
        self.items.iter().copied()
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.items
            .iter()
            .filter_map(|r| match r {
                SceneRef::Shape(id) => Some(*id),
                SceneRef::Connector(_) => None,
            })
            .collect()
    }

    pub fn connector_ids(&self) -> Vec<ConnectorId> {
        self.items
            .iter()
            .filter_map(|r| match r {
                SceneRef::Connector(id) => Some(*id),
                SceneRef::Shape(_) => None,
            })
            .collect()
    }

    /// The selected shape, when exactly one shape is selected. Connectors in
    /// the selection do not disqualify it.
    pub fn only_shape(&self) -> Option<ShapeId> {
        let shapes = self.shape_ids();
        match shapes.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}
