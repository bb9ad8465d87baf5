//! # Biome Registry
//!
//! Maps integer biome codes to the descriptors the layers consult:
//! - Symbolic name (for rule tables and config files)
//! - Temperature category (cold / medium / warm / ocean)
//! - Family (the equivalence class used for plateau matching)
//!
//! The registry is populated once, before a pipeline is built, and is
//! read-only afterwards.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use serde::Deserialize;

use crate::error::{LayerError, LayerResult};

/// Integer code identifying a biome in a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct BiomeId(pub u16);

impl BiomeId {
    /// Returns the raw code.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for BiomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse climate class deciding whether two biomes may touch directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TempCategory {
    /// Oceans, regardless of temperature.
    Ocean,
    /// Temperature below 0.2.
    Cold,
    /// Temperature in [0.2, 1.0).
    Medium,
    /// Temperature of 1.0 or more.
    Warm,
}

impl TempCategory {
    /// Classifies a biome from its temperature.
    #[must_use]
    pub fn from_temperature(temperature: f32, ocean: bool) -> Self {
        if ocean {
            Self::Ocean
        } else if temperature < 0.2 {
            Self::Cold
        } else if temperature < 1.0 {
            Self::Medium
        } else {
            Self::Warm
        }
    }
}

/// Equivalence class of biomes that count as "the same" at an edge.
///
/// Two biomes of the same family never need a buffering edge between them,
/// except for [`BiomeFamily::Unique`], which only matches its own code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeFamily {
    /// Ocean, frozen ocean, deep ocean.
    Ocean,
    /// Plains and sunflower plains.
    Plains,
    /// Desert and desert hills.
    Desert,
    /// Extreme hills, its edge and its wooded variant.
    Hills,
    /// Forest, forest hills, birch and roofed forests.
    Forest,
    /// All taigas: plain, cold and redwood, with their hills.
    Taiga,
    /// Swampland.
    Swamp,
    /// River and frozen river.
    River,
    /// The nether.
    Hell,
    /// The end.
    End,
    /// Ice plains and ice mountains.
    Snow,
    /// Mushroom island and its shore.
    Mushroom,
    /// Beach and cold beach. Stone beach stands alone.
    Beach,
    /// Jungle, jungle hills, jungle edge.
    Jungle,
    /// Savanna and savanna plateau.
    Savanna,
    /// Mesa and both mesa plateaus.
    Mesa,
    /// Mountain peaks and mountain foothills.
    Mountain,
    /// Wasteland.
    Wasteland,
    /// A family of one: matches only the biome's own code.
    #[default]
    Unique,
}

/// Everything the layers need to know about one biome.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDescriptor {
    /// The biome's code.
    pub id: BiomeId,
    /// Symbolic name, unique within a registry.
    pub name: String,
    /// Base temperature.
    pub temperature: f32,
    /// Plateau-matching family.
    pub family: BiomeFamily,
    /// Temperature category derived from `temperature`.
    pub category: TempCategory,
    /// Plateau variant: at an edge it only matches other plateaus of its
    /// family, never the family's lowland biomes.
    pub plateau: bool,
}

impl BiomeDescriptor {
    /// Creates a land (or ocean) biome descriptor.
    #[must_use]
    pub fn new(
        id: u16,
        name: impl Into<String>,
        temperature: f32,
        family: BiomeFamily,
        ocean: bool,
    ) -> Self {
        Self {
            id: BiomeId(id),
            name: name.into(),
            temperature,
            family,
            category: TempCategory::from_temperature(temperature, ocean),
            plateau: false,
        }
    }

    /// Marks the biome as a plateau variant.
    #[must_use]
    pub fn with_plateau(mut self, plateau: bool) -> Self {
        self.plateau = plateau;
        self
    }
}

/// Built-in biome table: (id, name, temperature, family, ocean, plateau).
const VANILLA_BIOMES: &[(u16, &str, f32, BiomeFamily, bool, bool)] = &[
    (0, "ocean", 0.5, BiomeFamily::Ocean, true, false),
    (1, "plains", 0.8, BiomeFamily::Plains, false, false),
    (2, "desert", 2.0, BiomeFamily::Desert, false, false),
    (3, "extreme_hills", 0.2, BiomeFamily::Hills, false, false),
    (4, "forest", 0.7, BiomeFamily::Forest, false, false),
    (5, "taiga", 0.25, BiomeFamily::Taiga, false, false),
    (6, "swampland", 0.8, BiomeFamily::Swamp, false, false),
    (7, "river", 0.5, BiomeFamily::River, false, false),
    (8, "hell", 2.0, BiomeFamily::Hell, false, false),
    (9, "sky", 0.5, BiomeFamily::End, false, false),
    (10, "frozen_ocean", 0.0, BiomeFamily::Ocean, true, false),
    (11, "frozen_river", 0.0, BiomeFamily::River, false, false),
    (12, "ice_plains", 0.0, BiomeFamily::Snow, false, false),
    (13, "ice_mountains", 0.0, BiomeFamily::Snow, false, false),
    (14, "mushroom_island", 0.9, BiomeFamily::Mushroom, false, false),
    (15, "mushroom_island_shore", 0.9, BiomeFamily::Mushroom, false, false),
    (16, "beach", 0.8, BiomeFamily::Beach, false, false),
    (17, "desert_hills", 2.0, BiomeFamily::Desert, false, false),
    (18, "forest_hills", 0.7, BiomeFamily::Forest, false, false),
    (19, "taiga_hills", 0.25, BiomeFamily::Taiga, false, false),
    (20, "extreme_hills_edge", 0.2, BiomeFamily::Hills, false, false),
    (21, "jungle", 0.95, BiomeFamily::Jungle, false, false),
    (22, "jungle_hills", 0.95, BiomeFamily::Jungle, false, false),
    (23, "jungle_edge", 0.95, BiomeFamily::Jungle, false, false),
    (24, "deep_ocean", 0.5, BiomeFamily::Ocean, true, false),
    (25, "stone_beach", 0.2, BiomeFamily::Unique, false, false),
    (26, "cold_beach", 0.05, BiomeFamily::Beach, false, false),
    (27, "birch_forest", 0.6, BiomeFamily::Forest, false, false),
    (28, "birch_forest_hills", 0.6, BiomeFamily::Forest, false, false),
    (29, "roofed_forest", 0.7, BiomeFamily::Forest, false, false),
    (30, "cold_taiga", -0.5, BiomeFamily::Taiga, false, false),
    (31, "cold_taiga_hills", -0.5, BiomeFamily::Taiga, false, false),
    (32, "redwood_taiga", 0.3, BiomeFamily::Taiga, false, false),
    (33, "redwood_taiga_hills", 0.3, BiomeFamily::Taiga, false, false),
    (34, "extreme_hills_with_trees", 0.2, BiomeFamily::Hills, false, false),
    (35, "savanna", 1.2, BiomeFamily::Savanna, false, false),
    (36, "savanna_rock", 1.0, BiomeFamily::Savanna, false, false),
    (37, "mesa", 2.0, BiomeFamily::Mesa, false, false),
    (38, "mesa_rock", 2.0, BiomeFamily::Mesa, false, true),
    (39, "mesa_clear_rock", 2.0, BiomeFamily::Mesa, false, true),
    (40, "mountain", 0.4, BiomeFamily::Mountain, false, false),
    (41, "mountain_foothills", 0.5, BiomeFamily::Mountain, false, false),
    (42, "wasteland", 2.0, BiomeFamily::Wasteland, false, false),
    (129, "sunflower_plains", 0.8, BiomeFamily::Plains, false, false),
];

/// Read-only lookup table from biome codes to descriptors.
///
/// # Example
///
/// ```rust
/// use stratum_layers::{BiomeRegistry, TempCategory};
///
/// let registry = BiomeRegistry::vanilla();
/// let desert = registry.code_for_name("desert").unwrap();
/// assert_eq!(registry.temperature_category_of(desert), Some(TempCategory::Warm));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    /// Descriptors indexed by raw code.
    entries: Vec<Option<BiomeDescriptor>>,
    /// Name to code.
    by_name: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: the 1.9 overworld set, sunflower plains and the
    /// mountain / foothills / wasteland biomes.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut registry = Self::new();
        for &(id, name, temperature, family, ocean, plateau) in VANILLA_BIOMES {
            let descriptor =
                BiomeDescriptor::new(id, name, temperature, family, ocean).with_plateau(plateau);
            let inserted = registry.register(descriptor);
            debug_assert!(inserted.is_ok(), "built-in biome table has a duplicate");
        }
        registry
    }

    /// Adds a biome.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or the name is already registered.
    pub fn register(&mut self, descriptor: BiomeDescriptor) -> LayerResult<()> {
        let index = usize::from(descriptor.id.raw());

        if self.contains(descriptor.id) {
            return Err(LayerError::DuplicateBiomeId(descriptor.id.raw()));
        }
        if self.by_name.contains_key(&descriptor.name) {
            return Err(LayerError::DuplicateBiomeName(descriptor.name));
        }

        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        self.by_name.insert(descriptor.name.clone(), descriptor.id);
        self.entries[index] = Some(descriptor);
        Ok(())
    }

    /// Parses a registry from TOML `[[biome]]` tables.
    ///
    /// ```toml
    /// [[biome]]
    /// id = 2
    /// name = "desert"
    /// temperature = 2.0
    /// family = "desert"
    ///
    /// [[biome]]
    /// id = 38
    /// name = "mesa_rock"
    /// temperature = 2.0
    /// family = "mesa"
    /// plateau = true
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or duplicate entries.
    pub fn from_toml_str(text: &str) -> LayerResult<Self> {
        let file: RegistryFile =
            toml::from_str(text).map_err(|e| LayerError::InvalidConfig(e.to_string()))?;

        let mut registry = Self::new();
        for entry in file.biome {
            registry.register(BiomeDescriptor::new(
                entry.id,
                entry.name,
                entry.temperature,
                entry.family,
                entry.ocean,
            )
            .with_plateau(entry.plateau))?;
        }
        Ok(registry)
    }

    /// Looks up a biome by code.
    #[inline]
    #[must_use]
    pub fn get(&self, id: BiomeId) -> Option<&BiomeDescriptor> {
        self.entries.get(usize::from(id.raw()))?.as_ref()
    }

    /// Returns true if the code is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: BiomeId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a biome code by symbolic name.
    #[must_use]
    pub fn code_for_name(&self, name: &str) -> Option<BiomeId> {
        self.by_name.get(name).copied()
    }

    /// Like [`code_for_name`](Self::code_for_name), but a missing name is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::UnknownBiomeName`] if the name is not registered.
    pub fn require(&self, name: &str) -> LayerResult<BiomeId> {
        self.code_for_name(name)
            .ok_or_else(|| LayerError::UnknownBiomeName(name.to_owned()))
    }

    /// Temperature category of a code, or `None` for unknown codes.
    #[inline]
    #[must_use]
    pub fn temperature_category_of(&self, id: BiomeId) -> Option<TempCategory> {
        self.get(id).map(|d| d.category)
    }

    /// Number of registered biomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates over registered biomes in code order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomeDescriptor> {
        self.entries.iter().flatten()
    }
}

/// TOML shape of a registry file.
#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    biome: Vec<RegistryEntry>,
}

/// TOML shape of one `[[biome]]` table.
#[derive(Deserialize)]
struct RegistryEntry {
    id: u16,
    name: String,
    temperature: f32,
    #[serde(default)]
    family: BiomeFamily,
    #[serde(default)]
    ocean: bool,
    #[serde(default)]
    plateau: bool,
}
