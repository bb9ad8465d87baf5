//! # Layer Pipeline
//!
//! The assembled chain of layers for one world. Layers are built bottom-up
//! from a single world seed, so every pipeline is an acyclic chain by
//! construction and can be shared read-only between threads.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stratum_core::{BufferPool, WorldSeed};
//! use stratum_layers::{Area, BiomeEdge, BiomeRegistry, PipelineBuilder};
//!
//! let registry = Arc::new(BiomeRegistry::vanilla());
//! let desert = registry.code_for_name("desert").unwrap();
//! let ice = registry.code_for_name("ice_plains").unwrap();
//!
//! let pipeline = PipelineBuilder::new(WorldSeed::new(42))
//!     .source(200, &[(desert, 3), (ice, 1)])
//!     .transform(1000, BiomeEdge::new(Arc::clone(&registry)).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut pool = BufferPool::new();
//! let grid = pipeline.get_grid(Area::new(0, 0, 16, 16), &mut pool).unwrap();
//! assert_eq!(grid.data().len(), 256);
//! ```

use std::sync::Arc;

use stratum_core::{BufferSource, LayerSeed, SharedBufferPool, WorldSeed};
use tracing::debug;

use crate::biome::BiomeId;
use crate::error::{LayerError, LayerResult};
use crate::grid::{Area, Grid};
use crate::layer::{CellTransform, LayerRef, SourceLayer, TransformLayer};

/// A built chain of layers; queries go to the terminal layer.
#[derive(Clone)]
pub struct LayerPipeline {
    /// The seed every layer was derived from.
    world_seed: WorldSeed,
    /// Layers from the root up to the terminal.
    layers: Vec<LayerRef>,
}

impl LayerPipeline {
    /// The world seed.
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        self.world_seed
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a built pipeline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer by position, root first.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&LayerRef> {
        self.layers.get(index)
    }

    /// The layer answering [`get_grid`](Self::get_grid).
    #[must_use]
    pub fn terminal(&self) -> &LayerRef {
        // non-empty by construction
        &self.layers[self.layers.len() - 1]
    }

    /// Biome codes covering `area`, from the terminal layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidArea`] for a non-positive width or
    /// height.
    pub fn get_grid(
        &self,
        area: Area,
        pool: &mut dyn BufferSource<BiomeId>,
    ) -> LayerResult<Grid> {
        self.terminal().get_grid(area, pool)
    }

    /// Like [`get_grid`](Self::get_grid), drawing buffers from a pool shared
    /// with other workers.
    ///
    /// The pool is locked once per acquire or release, never for the whole
    /// request, so workers generate in parallel.
    ///
    /// # Errors
    ///
    /// Same as [`get_grid`](Self::get_grid).
    pub fn get_grid_shared(
        &self,
        area: Area,
        pool: &SharedBufferPool<BiomeId>,
    ) -> LayerResult<Grid> {
        let mut handle = pool;
        self.get_grid(area, &mut handle)
    }
}

impl std::fmt::Debug for LayerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.layers.iter().map(|layer| layer.name()).collect();
        f.debug_struct("LayerPipeline")
            .field("world_seed", &self.world_seed)
            .field("layers", &names)
            .finish()
    }
}

/// Assembles a [`LayerPipeline`] bottom-up.
///
/// The first layer must be a root (a source, or a custom layer without a
/// parent); every [`transform`](Self::transform) stacks on the layer added
/// before it. Errors are collected and reported by [`build`](Self::build).
pub struct PipelineBuilder {
    /// Seed handed to every layer.
    world_seed: WorldSeed,
    /// Layers so far, root first.
    layers: Vec<LayerRef>,
    /// First error met while adding layers.
    error: Option<LayerError>,
}

impl PipelineBuilder {
    /// Starts an empty pipeline for `world_seed`.
    #[must_use]
    pub fn new(world_seed: WorldSeed) -> Self {
        Self {
            world_seed,
            layers: Vec::new(),
            error: None,
        }
    }

    /// Seed state a layer with constant `seed` gets in this pipeline.
    #[must_use]
    pub const fn layer_seed(&self, seed: i64) -> LayerSeed {
        LayerSeed::new(seed, self.world_seed)
    }

    /// The most recently added layer, for building custom layers on top.
    #[must_use]
    pub fn top(&self) -> Option<&LayerRef> {
        self.layers.last()
    }

    /// Adds a weighted random source as the root layer.
    #[must_use]
    pub fn source(mut self, seed: i64, weighted: &[(BiomeId, u32)]) -> Self {
        if !self.layers.is_empty() {
            self.fail(LayerError::InvalidConfig(
                "source layer must be the first layer".to_owned(),
            ));
            return self;
        }

        match SourceLayer::new(self.layer_seed(seed), weighted) {
            Ok(layer) => self.layers.push(Arc::new(layer)),
            Err(error) => self.fail(error),
        }
        self
    }

    /// Stacks a transform on the current top layer.
    #[must_use]
    pub fn transform<T: CellTransform + 'static>(mut self, seed: i64, transform: T) -> Self {
        let Some(parent) = self.layers.last().cloned() else {
            self.fail(LayerError::InvalidConfig(format!(
                "{} layer needs a parent",
                T::NAME
            )));
            return self;
        };

        let layer = TransformLayer::new(self.layer_seed(seed), parent, transform);
        self.layers.push(Arc::new(layer));
        self
    }

    /// Adds an already built layer on top.
    #[must_use]
    pub fn layer(mut self, layer: LayerRef) -> Self {
        self.layers.push(layer);
        self
    }

    /// Finishes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first error met while adding layers, or
    /// [`LayerError::EmptyPipeline`] if no layer was added.
    pub fn build(self) -> LayerResult<LayerPipeline> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.layers.is_empty() {
            return Err(LayerError::EmptyPipeline);
        }

        debug!(
            world_seed = self.world_seed.value(),
            layers = self.layers.len(),
            "pipeline assembled"
        );
        Ok(LayerPipeline {
            world_seed: self.world_seed,
            layers: self.layers,
        })
    }

    /// Keeps the first error only.
    fn fail(&mut self, error: LayerError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}
