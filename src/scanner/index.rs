//! Entity lookup by tag.
//!
//! Hosts keep their own registries of placed objects; the scanner only
//! needs to ask for every object carrying a tag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Opaque host-side object identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Vegetation categories the scanner knows how to look up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationKind {
    Tree,
    Bush,
}

impl VegetationKind {
    /// Host tag under which objects of this kind are registered
    pub fn tag(&self) -> &'static str {
        match self {
            VegetationKind::Tree => "Trees",
            VegetationKind::Bush => "Bushes",
        }
    }

    /// Plural name for log messages
    pub fn display_name(&self) -> &'static str {
        match self {
            VegetationKind::Tree => "trees",
            VegetationKind::Bush => "bushes",
        }
    }

    /// Parse a kind from a user-supplied name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tree" | "trees" => Some(VegetationKind::Tree),
            "bush" | "bushes" => Some(VegetationKind::Bush),
            _ => None,
        }
    }
}

/// Source of tagged entity positions (world XZ plane as a 2D vector).
pub trait SpatialIndex: Send + Sync {
    /// All entities registered under `tag`, in no particular order.
    fn query(&self, tag: &str) -> Vec<(EntityId, Vec2)>;
}

/// In-memory `SpatialIndex`.
#[derive(Clone, Debug, Default)]
pub struct TaggedIndex {
    by_tag: HashMap<String, Vec<(EntityId, Vec2)>>,
    next_id: u64,
}

impl TaggedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under `tag`, returning its new id.
    pub fn insert(&mut self, tag: &str, position: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.by_tag
            .entry(tag.to_string())
            .or_insert_with(|| Vec::with_capacity(64))
            .push((id, position));
        id
    }

    /// Register many entities of one kind.
    pub fn insert_all(&mut self, kind: VegetationKind, positions: &[Vec2]) -> Vec<EntityId> {
        positions.iter().map(|&p| self.insert(kind.tag(), p)).collect()
    }

    /// Remove an entity. Returns its position if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<Vec2> {
        for entries in self.by_tag.values_mut() {
            if let Some(idx) = entries.iter().position(|(e, _)| *e == id) {
                return Some(entries.swap_remove(idx).1);
            }
        }
        None
    }

    /// Number of entities under `tag`
    pub fn count(&self, tag: &str) -> usize {
        self.by_tag.get(tag).map_or(0, Vec::len)
    }

    /// Total number of entities
    pub fn len(&self) -> usize {
        self.by_tag.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpatialIndex for TaggedIndex {
    fn query(&self, tag: &str) -> Vec<(EntityId, Vec2)> {
        self.by_tag.get(tag).cloned().unwrap_or_default()
    }
}
