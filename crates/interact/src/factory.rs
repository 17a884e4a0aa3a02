use std::collections::BTreeMap;

use glam::Vec2;
use tilestream_kernel::{InteractableError, InteractableFactory};

use crate::tree::{TreeSnapshot, WoodTree};

/// Static data shared by every tree of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeKind {
    pub name: String,
    /// Health of a freshly generated standing tree.
    pub health: i32,
    /// Health a tree resets to when it falls and becomes a stump.
    pub stump_health: i32,
    /// Relative weight when a generator picks a kind.
    pub spawn_weight: u32,
}

impl TreeKind {
    pub fn new(name: impl Into<String>, health: i32, stump_health: i32, spawn_weight: u32) -> Self {
        Self {
            name: name.into(),
            health,
            stump_health,
            spawn_weight,
        }
    }

    /// Snapshot of a fresh standing tree of this kind.
    pub fn spawn(&self) -> TreeSnapshot {
        TreeSnapshot::standing(self.name.clone(), self.health)
    }
}

/// Known tree kinds, keyed by name.
#[derive(Debug, Clone)]
pub struct TreeCatalogue {
    kinds: BTreeMap<String, TreeKind>,
}

impl TreeCatalogue {
    pub fn new(kinds: impl IntoIterator<Item = TreeKind>) -> Self {
        Self {
            kinds: kinds.into_iter().map(|k| (k.name.clone(), k)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TreeKind> {
        self.kinds.get(name)
    }

    /// Kinds in name order.
    pub fn kinds(&self) -> impl Iterator<Item = &TreeKind> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for TreeCatalogue {
    fn default() -> Self {
        Self::new([
            TreeKind::new("oak", 3, 3, 50),
            TreeKind::new("birch", 2, 2, 30),
            TreeKind::new("pine", 4, 3, 20),
        ])
    }
}

/// Builds [`WoodTree`] handles, rejecting snapshots the catalogue can't back.
#[derive(Debug, Default)]
pub struct TreeFactory {
    catalogue: TreeCatalogue,
    created: u64,
}

impl TreeFactory {
    pub fn new(catalogue: TreeCatalogue) -> Self {
        Self {
            catalogue,
            created: 0,
        }
    }

    pub fn catalogue(&self) -> &TreeCatalogue {
        &self.catalogue
    }

    /// Handles built so far.
    pub fn created(&self) -> u64 {
        self.created
    }

    fn validate(&self, snapshot: &TreeSnapshot) -> Result<&TreeKind, InteractableError> {
        if snapshot.kind.is_empty() || snapshot.instance.is_nil() {
            return Err(InteractableError::MissingIdentifier);
        }
        if snapshot.health < 0 {
            return Err(InteractableError::NegativeCounter {
                field: "health",
                value: snapshot.health.into(),
            });
        }
        self.catalogue
            .get(&snapshot.kind)
            .ok_or_else(|| InteractableError::UnknownKind(snapshot.kind.clone()))
    }
}

impl InteractableFactory for TreeFactory {
    type Handle = WoodTree;

    fn create(
        &mut self,
        attach_point: Vec2,
        snapshot: &TreeSnapshot,
    ) -> Result<WoodTree, InteractableError> {
        let stump_health = self.validate(snapshot)?.stump_health;
        self.created += 1;
        Ok(WoodTree::from_snapshot(
            snapshot.clone(),
            stump_health,
            attach_point,
        ))
    }
}
