use tilestream_common::{GridLayer, InstanceId, SoilType};
use tilestream_kernel::{Generator, LayerStack, TileSeed};

use crate::factory::{TreeCatalogue, TreeKind};
use crate::tree::TreeSnapshot;

/// Seeded forest: grass everywhere, scattered sand and ponds, weighted trees.
///
/// Output depends only on the seed and the world size, so the same seed
/// always produces the same world, instance ids included.
#[derive(Debug, Clone)]
pub struct ForestGenerator {
    pub seed: u64,
    /// Chance in percent that a dry tile grows a tree.
    pub tree_chance: u32,
    /// Chance in percent that a tile is a pond.
    pub water_chance: u32,
    pub catalogue: TreeCatalogue,
}

impl ForestGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tree_chance: 30,
            water_chance: 5,
            catalogue: TreeCatalogue::default(),
        }
    }

    pub fn with_tree_chance(mut self, percent: u32) -> Self {
        self.tree_chance = percent.min(100);
        self
    }

    pub fn with_water_chance(mut self, percent: u32) -> Self {
        self.water_chance = percent.min(100);
        self
    }

    fn seed_tile(&self, x: u32, y: u32) -> TileSeed<TreeSnapshot> {
        let mut rng = TileRng::new(self.seed, x, y);
        let mut layers = LayerStack::new();

        let ground = if rng.percent() < 60 {
            SoilType::ForestGrass
        } else {
            SoilType::FertileGrass
        };
        layers.set(GridLayer::Ground, ground);

        if rng.percent() < self.water_chance {
            layers.set(GridLayer::Water, SoilType::Water);
            return TileSeed {
                layers,
                interactable: None,
            };
        }
        match rng.percent() {
            0..10 => layers.set(GridLayer::Sand, SoilType::Sand),
            10..25 => layers.set(GridLayer::Plains, SoilType::PlainsGrass),
            _ => {}
        }

        let interactable = (rng.percent() < self.tree_chance)
            .then(|| self.pick_kind(&mut rng))
            .flatten()
            .map(|kind| TreeSnapshot {
                instance: InstanceId::from_bits(rng.id_bits()),
                ..kind.spawn()
            });

        TileSeed {
            layers,
            interactable,
        }
    }

    /// Weighted pick over the catalogue, in name order.
    fn pick_kind(&self, rng: &mut TileRng) -> Option<&TreeKind> {
        let total: u64 = self.catalogue.kinds().map(|k| k.spawn_weight as u64).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.next() % total;
        for kind in self.catalogue.kinds() {
            let weight = kind.spawn_weight as u64;
            if roll < weight {
                return Some(kind);
            }
            roll -= weight;
        }
        None
    }
}

impl Generator for ForestGenerator {
    type Snapshot = TreeSnapshot;

    fn generate(&mut self, width: u32, height: u32) -> Vec<TileSeed<TreeSnapshot>> {
        let mut seeds = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                seeds.push(self.seed_tile(x, y));
            }
        }
        tracing::debug!(
            width,
            height,
            trees = seeds.iter().filter(|s| s.interactable.is_some()).count(),
            "forest generated"
        );
        seeds
    }
}

/// Per-tile splitmix64 stream, keyed on the world seed and the cell.
struct TileRng {
    state: u64,
}

impl TileRng {
    fn new(seed: u64, x: u32, y: u32) -> Self {
        Self {
            state: seed ^ ((x as u64) << 32 | y as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn percent(&mut self) -> u32 {
        (self.next() % 100) as u32
    }

    /// Non-zero 128-bit id.
    fn id_bits(&mut self) -> u128 {
        ((self.next() as u128) << 64 | self.next() as u128) | 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_world() {
        let a = ForestGenerator::new(42).generate(16, 16);
        let b = ForestGenerator::new(42).generate(16, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = ForestGenerator::new(1).generate(16, 16);
        let b = ForestGenerator::new(2).generate(16, 16);
        assert_ne!(a, b);
    }

    #[test]
    fn produces_one_seed_per_tile_with_ground() {
        let seeds = ForestGenerator::new(7).generate(8, 5);
        assert_eq!(seeds.len(), 40);
        assert!(seeds.iter().all(|s| s.layers.get(GridLayer::Ground).is_some()));
    }

    #[test]
    fn tree_chance_bounds() {
        let none = ForestGenerator::new(3).with_tree_chance(0).generate(10, 10);
        assert!(none.iter().all(|s| s.interactable.is_none()));

        let all = ForestGenerator::new(3)
            .with_tree_chance(100)
            .with_water_chance(0)
            .generate(10, 10);
        assert!(all.iter().all(|s| s.interactable.is_some()));
    }

    #[test]
    fn ponds_never_grow_trees() {
        let seeds = ForestGenerator::new(9)
            .with_tree_chance(100)
            .with_water_chance(50)
            .generate(20, 20);
        for seed in &seeds {
            if seed.layers.get(GridLayer::Water).is_some() {
                assert!(seed.interactable.is_none());
            }
        }
    }

    #[test]
    fn generated_trees_are_valid_catalogue_kinds() {
        let generator = ForestGenerator::new(11).with_tree_chance(100);
        let catalogue = generator.catalogue.clone();
        let seeds = generator.clone().generate(12, 12);
        for tree in seeds.iter().filter_map(|s| s.interactable.as_ref()) {
            let kind = catalogue.get(&tree.kind).unwrap();
            assert_eq!(tree.health, kind.health);
            assert!(!tree.instance.is_nil());
            assert!(!tree.is_chopped);
        }
    }
}
