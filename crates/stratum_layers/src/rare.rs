//! # Rare Variants
//!
//! Sprinkles a rare variant of a biome over the map, e.g. sunflower plains
//! inside ordinary plains. Unlike edge smoothing this transform draws on the
//! per-cell random stream.

use stratum_core::CellRng;

use crate::biome::{BiomeId, BiomeRegistry};
use crate::error::LayerResult;
use crate::layer::{CellTransform, Neighborhood};

/// Chance denominator of the standard sunflower-plains variant.
pub const SUNFLOWER_CHANCE: u32 = 57;

/// Turns `from` into `to` with probability `1 / chance` per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RareVariant {
    /// Biome that may be replaced.
    pub from: BiomeId,
    /// The rare variant.
    pub to: BiomeId,
    /// One in `chance` cells of `from` become `to`.
    pub chance: u32,
}

impl RareVariant {
    /// Creates a variant rule.
    #[must_use]
    pub const fn new(from: BiomeId, to: BiomeId, chance: u32) -> Self {
        Self { from, to, chance }
    }

    /// Plains to sunflower plains, one in 57.
    ///
    /// # Errors
    ///
    /// Returns an error if either biome is not registered.
    pub fn sunflower_plains(registry: &BiomeRegistry) -> LayerResult<Self> {
        Ok(Self::new(
            registry.require("plains")?,
            registry.require("sunflower_plains")?,
            SUNFLOWER_CHANCE,
        ))
    }
}

impl CellTransform for RareVariant {
    const NAME: &'static str = "rare_variant";

    fn apply(&self, cell: &Neighborhood, _x: i32, _y: i32, rng: &mut CellRng) -> BiomeId {
        // draw first so the stream position never depends on the cell's value
        let roll = rng.next_int(self.chance);
        if cell.center == self.from && roll == 0 {
            self.to
        } else {
            cell.center
        }
    }
}
