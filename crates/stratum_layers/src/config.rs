//! # Pipeline Configuration
//!
//! Pipelines are described in TOML and built once at startup:
//!
//! ```toml
//! world_seed = 42
//!
//! [[layer]]
//! kind = "source"
//! seed = 200
//! biomes = [
//!     { name = "plains", weight = 3 },
//!     { name = "desert" },
//! ]
//!
//! [[layer]]
//! kind = "rare_variant"
//! seed = 1001
//! from = "plains"
//! to = "sunflower_plains"
//! chance = 57
//!
//! [[layer]]
//! kind = "biome_edge"
//! seed = 1000
//! ```
//!
//! Layers are listed root first. Biomes are referred to by registry name.

use std::sync::Arc;

use serde::Deserialize;
use stratum_core::WorldSeed;

use crate::biome::BiomeRegistry;
use crate::edge::BiomeEdge;
use crate::error::{LayerError, LayerResult};
use crate::pipeline::{LayerPipeline, PipelineBuilder};
use crate::rare::{RareVariant, SUNFLOWER_CHANCE};

/// A whole pipeline description.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Seed every layer derives from.
    pub world_seed: i64,
    /// Layers, root first.
    #[serde(rename = "layer", default)]
    pub layers: Vec<LayerConfig>,
}

/// One `[[layer]]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerConfig {
    /// Weighted random root layer.
    Source {
        /// Layer seed constant.
        seed: i64,
        /// Candidate biomes.
        biomes: Vec<WeightedBiome>,
    },
    /// Edge smoothing with the standard rule table.
    BiomeEdge {
        /// Layer seed constant.
        seed: i64,
    },
    /// Rare variant of a biome.
    RareVariant {
        /// Layer seed constant.
        seed: i64,
        /// Biome that may be replaced.
        from: String,
        /// The rare variant.
        to: String,
        /// One in `chance` cells are replaced.
        #[serde(default = "default_chance")]
        chance: u32,
    },
}

/// A biome name with a selection weight.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WeightedBiome {
    /// Registry name.
    pub name: String,
    /// Relative weight, 1 if omitted.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

fn default_chance() -> u32 {
    SUNFLOWER_CHANCE
}

impl PipelineConfig {
    /// Parses a pipeline description.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidConfig`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> LayerResult<Self> {
        toml::from_str(text).map_err(|e| LayerError::InvalidConfig(e.to_string()))
    }

    /// Builds the described pipeline, resolving names against `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown biome names, a missing or misplaced
    /// source layer, or an empty layer list.
    pub fn build(&self, registry: &Arc<BiomeRegistry>) -> LayerResult<LayerPipeline> {
        let mut builder = PipelineBuilder::new(WorldSeed::new(self.world_seed));

        for layer in &self.layers {
            builder = match layer {
                LayerConfig::Source { seed, biomes } => {
                    let weighted = biomes
                        .iter()
                        .map(|entry| Ok((registry.require(&entry.name)?, entry.weight)))
                        .collect::<LayerResult<Vec<_>>>()?;
                    builder.source(*seed, &weighted)
                }
                LayerConfig::BiomeEdge { seed } => {
                    builder.transform(*seed, BiomeEdge::new(Arc::clone(registry))?)
                }
                LayerConfig::RareVariant {
                    seed,
                    from,
                    to,
                    chance,
                } => {
                    let variant =
                        RareVariant::new(registry.require(from)?, registry.require(to)?, *chance);
                    builder.transform(*seed, variant)
                }
            };
        }

        builder.build()
    }
}
