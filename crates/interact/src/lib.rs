//! Interactables: the wood tree handle, the factory that rebuilds it from
//! snapshots, and a seeded forest generator.
//!
//! # Invariants
//! - A tree's snapshot is its complete mutable state; rebuilding from it
//!   yields a tree whose next snapshot is equal.
//! - Animations belong to the tree and advance only when the tree is ticked.

mod animation;
mod factory;
mod generator;
mod tree;

pub use animation::{Animation, AnimationKind};
pub use factory::{TreeCatalogue, TreeFactory, TreeKind};
pub use generator::ForestGenerator;
pub use tree::{ChopOutcome, TreeSnapshot, WoodTree};
