use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilestream_common::{InstanceId, TileCoord};
use tilestream_kernel::Interactable;

use crate::animation::{Animation, AnimationKind};

/// Complete mutable state of one wood tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Catalogue key of the tree kind, e.g. `"oak"`.
    pub kind: String,
    pub instance: InstanceId,
    /// Hits left before the tree falls (standing) or the stump is gone (chopped).
    pub health: i32,
    pub is_chopped: bool,
}

impl TreeSnapshot {
    /// Fresh standing tree of a kind.
    pub fn standing(kind: impl Into<String>, health: i32) -> Self {
        Self {
            kind: kind.into(),
            instance: InstanceId::new(),
            health,
            is_chopped: false,
        }
    }

    /// A stump with no health left has been fully cleared.
    pub fn is_cleared(&self) -> bool {
        self.is_chopped && self.health <= 0
    }
}

/// Result of one chop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChopOutcome {
    /// Hidden, animating or already cleared; nothing changed.
    Ignored,
    /// Health went down and the tree is still there.
    Hit { remaining: i32 },
    /// A standing tree fell and is now a stump.
    Felled,
    /// The stump is gone. The owning tile drops the tree on the next tick.
    Cleared,
}

/// Live wood tree handle.
#[derive(Debug)]
pub struct WoodTree {
    state: TreeSnapshot,
    stump_health: i32,
    active: bool,
    position: Vec2,
    has_leaves: bool,
    animation: Option<Animation>,
}

impl WoodTree {
    /// Rebuild a tree from its snapshot. `stump_health` comes from its kind.
    pub fn from_snapshot(state: TreeSnapshot, stump_health: i32, position: Vec2) -> Self {
        let has_leaves = !state.is_chopped;
        Self {
            state,
            stump_health,
            active: true,
            position,
            has_leaves,
            animation: None,
        }
    }

    pub fn state(&self) -> &TreeSnapshot {
        &self.state
    }

    pub fn health(&self) -> i32 {
        self.state.health
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn has_leaves(&self) -> bool {
        self.has_leaves
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Set health directly, e.g. from damage dealt by something other than chopping.
    pub fn set_health(&mut self, health: i32) {
        self.state.health = health;
    }

    /// One hit. Blocked while hidden, while an animation runs, or once cleared.
    pub fn chop(&mut self) -> ChopOutcome {
        if !self.active || self.animation.is_some() || self.state.is_cleared() {
            return ChopOutcome::Ignored;
        }

        self.state.health -= 1;
        tracing::debug!(instance = ?self.state.instance, health = self.state.health, "tree hit");

        match (self.state.is_chopped, self.state.health > 0) {
            (true, true) => {
                self.animation = Some(Animation::start(AnimationKind::RootDelay));
                ChopOutcome::Hit {
                    remaining: self.state.health,
                }
            }
            (true, false) => ChopOutcome::Cleared,
            (false, true) => {
                self.animation = Some(Animation::start(AnimationKind::Shake));
                ChopOutcome::Hit {
                    remaining: self.state.health,
                }
            }
            (false, false) => {
                self.state.is_chopped = true;
                self.state.health = self.stump_health;
                self.animation = Some(Animation::start(AnimationKind::Fall));
                ChopOutcome::Felled
            }
        }
    }

    /// Advance the running animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if animation.advance(dt) {
            if animation.kind() == AnimationKind::Fall {
                self.has_leaves = false;
            }
            self.animation = None;
        }
    }

    fn cancel_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            tracing::trace!(kind = ?animation.kind(), "animation cancelled");
            if self.state.is_chopped {
                self.has_leaves = false;
            }
        }
    }
}

impl Interactable for WoodTree {
    type Snapshot = TreeSnapshot;

    fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if !active {
            self.cancel_animation();
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn capture_snapshot(&self) -> TreeSnapshot {
        self.state.clone()
    }

    fn on_tile_loaded(&mut self, _tile: TileCoord) {
        // A felled tree comes back as a stump; no fall replay.
        if self.state.is_chopped && self.animation.is_none() {
            self.has_leaves = false;
        }
    }

    /// A cleared stump is gone for good; its tile drops it.
    fn is_spent(&self) -> bool {
        self.state.is_cleared()
    }

    fn destroy(mut self) {
        self.cancel_animation();
        tracing::trace!(instance = ?self.state.instance, "tree destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oak(health: i32) -> WoodTree {
        WoodTree::from_snapshot(TreeSnapshot::standing("oak", health), 3, Vec2::ZERO)
    }

    fn settle(tree: &mut WoodTree) {
        tree.tick(10.0);
    }

    #[test]
    fn chop_reduces_health_and_shakes() {
        let mut tree = oak(3);
        assert_eq!(tree.chop(), ChopOutcome::Hit { remaining: 2 });
        assert_eq!(tree.animation().map(Animation::kind), Some(AnimationKind::Shake));
        assert_eq!(tree.chop(), ChopOutcome::Ignored);
        settle(&mut tree);
        assert_eq!(tree.chop(), ChopOutcome::Hit { remaining: 1 });
    }

    #[test]
    fn last_hit_fells_then_stump_clears() {
        let mut tree = oak(1);
        assert_eq!(tree.chop(), ChopOutcome::Felled);
        assert!(tree.state().is_chopped);
        assert_eq!(tree.health(), 3);
        assert!(tree.has_leaves());
        settle(&mut tree);
        assert!(!tree.has_leaves());

        for _ in 0..2 {
            assert!(matches!(tree.chop(), ChopOutcome::Hit { .. }));
            settle(&mut tree);
        }
        assert!(!tree.is_spent());
        assert_eq!(tree.chop(), ChopOutcome::Cleared);
        assert!(tree.state().is_cleared());
        assert!(tree.is_spent());
        assert_eq!(tree.chop(), ChopOutcome::Ignored);
    }

    #[test]
    fn hidden_tree_ignores_chops() {
        let mut tree = oak(3);
        tree.set_active(false);
        assert_eq!(tree.chop(), ChopOutcome::Ignored);
        assert_eq!(tree.health(), 3);
    }

    #[test]
    fn deactivation_cancels_fall_and_drops_leaves() {
        let mut tree = oak(1);
        tree.chop();
        tree.set_active(false);
        assert!(tree.animation().is_none());
        assert!(!tree.has_leaves());
    }

    #[test]
    fn reloaded_stump_has_no_leaves() {
        let mut snapshot = TreeSnapshot::standing("oak", 2);
        snapshot.is_chopped = true;
        let mut tree = WoodTree::from_snapshot(snapshot, 3, Vec2::ZERO);
        tree.on_tile_loaded(TileCoord::new(0, 0));
        assert!(!tree.has_leaves());
    }

    #[test]
    fn snapshot_does_not_mutate_and_matches_state() {
        let mut tree = oak(3);
        tree.chop();
        let a = tree.capture_snapshot();
        let b = tree.capture_snapshot();
        assert_eq!(a, b);
        assert_eq!(a.health, 2);
    }

    #[test]
    fn snapshot_survives_serialization() {
        let mut snapshot = TreeSnapshot::standing("birch", 0);
        snapshot.is_chopped = true;
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: TreeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
