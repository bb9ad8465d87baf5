//! # STRATUM Biome Layers
//!
//! Deterministic biome maps built from a chain of grid-transform layers.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same world seed always produces the same map
//! 2. **Windowed**: Any rectangle can be requested; tiles never show seams
//! 3. **Recursive**: Each layer pads its request and pulls from its parent
//! 4. **Fast**: Scratch buffers come from a pool, not the allocator
//!
//! ## Core Components
//!
//! - `BiomeRegistry`: Codes, names, families and temperature categories
//! - `Layer` / `CellTransform`: The layer contract and per-cell rewrites
//! - `BiomeEdge`: Ordered edge-smoothing rules with desert/swamp cases
//! - `RareVariant`: Seeded rare-biome sprinkling
//! - `LayerPipeline`: The assembled chain, queried at its terminal layer
//! - `PipelineConfig`: TOML pipeline descriptions
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stratum_core::BufferPool;
//! use stratum_layers::{Area, BiomeRegistry, PipelineConfig};
//!
//! let registry = Arc::new(BiomeRegistry::vanilla());
//! let config = PipelineConfig::from_toml_str(r#"
//!     world_seed = 42
//!
//!     [[layer]]
//!     kind = "source"
//!     seed = 200
//!     biomes = [{ name = "plains" }, { name = "swampland" }, { name = "jungle" }]
//!
//!     [[layer]]
//!     kind = "biome_edge"
//!     seed = 1000
//! "#).unwrap();
//!
//! let pipeline = config.build(&registry).unwrap();
//! let mut pool = BufferPool::new();
//! let grid = pipeline.get_grid(Area::new(-16, -16, 32, 32), &mut pool).unwrap();
//! assert_eq!(grid.width(), 32);
//! pool.release(grid.into_data());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod config;
pub mod edge;
pub mod error;
pub mod grid;
pub mod layer;
pub mod pipeline;
pub mod rare;

pub use biome::{BiomeDescriptor, BiomeFamily, BiomeId, BiomeRegistry, TempCategory};
pub use config::{LayerConfig, PipelineConfig, WeightedBiome};
pub use edge::{can_neighbor, compatible, standard_rules, BiomeEdge, EdgeMatch, EdgeRule};
pub use error::{LayerError, LayerResult};
pub use grid::{Area, Grid};
pub use layer::{CellTransform, Layer, LayerRef, Neighborhood, SourceLayer, TransformLayer};
pub use pipeline::{LayerPipeline, PipelineBuilder};
pub use rare::{RareVariant, SUNFLOWER_CHANCE};
