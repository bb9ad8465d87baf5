//! # Layers
//!
//! A layer answers one question: which biome codes cover this rectangle?
//!
//! ```text
//!   consumer ──get_grid(x, y, w, h)──▶ TransformLayer
//!                                         │ pad by 1
//!                                         ▼
//!                        parent.get_grid(x-1, y-1, w+2, h+2)
//!                                         │
//!                  for each output cell:  │ seed CellRng from (x, y)
//!                                         │ read center + N/E/W/S
//!                                         ▼
//!                             CellTransform::apply ──▶ pooled output buffer
//! ```
//!
//! Layers are immutable once built. A layer holds an `Arc` to its parent, so
//! one parent can feed several children and whole pipelines can be shared
//! read-only between threads.

use std::sync::Arc;

use stratum_core::{BufferSource, CellRng, LayerSeed};
use tracing::trace;

use crate::biome::BiomeId;
use crate::error::{LayerError, LayerResult};
use crate::grid::{Area, Grid};

/// Shared handle to a layer.
pub type LayerRef = Arc<dyn Layer>;

/// A deterministic grid-producing stage.
pub trait Layer: Send + Sync {
    /// Produces the cells covering exactly `area`.
    ///
    /// The result depends only on `area` and the layer's seed chain. The
    /// output buffer is drawn from `pool`; the caller owns the returned grid
    /// and may hand its buffer back with
    /// `pool.release(grid.into_data())`. Pass a `BufferPool` per worker, or
    /// `&mut &shared` for a `SharedBufferPool` locked once per call.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidArea`] for a non-positive width or height
    /// (or one too large to pad) and [`LayerError::ParentSizeMismatch`] if a
    /// parent misbehaves.
    fn get_grid(&self, area: Area, pool: &mut dyn BufferSource<BiomeId>) -> LayerResult<Grid>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// This layer's seed state, if it draws on one.
    fn seed(&self) -> Option<LayerSeed> {
        None
    }

    /// The layer this one reads from, if any.
    fn parent(&self) -> Option<&LayerRef> {
        None
    }
}

/// A cell and its four orthogonal neighbours, read from a padded grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    /// The cell being rewritten.
    pub center: BiomeId,
    /// Cell at `y - 1`.
    pub north: BiomeId,
    /// Cell at `x + 1`.
    pub east: BiomeId,
    /// Cell at `x - 1`.
    pub west: BiomeId,
    /// Cell at `y + 1`.
    pub south: BiomeId,
}

impl Neighborhood {
    /// A neighbourhood where every cell is `id`.
    #[must_use]
    pub const fn uniform(id: BiomeId) -> Self {
        Self {
            center: id,
            north: id,
            east: id,
            west: id,
            south: id,
        }
    }

    /// Reads the neighbourhood of output cell `(column, row)` from a grid
    /// padded by one cell on every side.
    ///
    /// `stride` is the padded width. The caller guarantees that
    /// `column + 2 < stride` and that the padded grid has at least
    /// `row + 3` rows.
    #[inline]
    #[must_use]
    pub fn read(padded: &[BiomeId], stride: usize, column: usize, row: usize) -> Self {
        let center = (row + 1) * stride + column + 1;
        Self {
            center: padded[center],
            north: padded[center - stride],
            east: padded[center + 1],
            west: padded[center - 1],
            south: padded[center + stride],
        }
    }

    /// The four neighbours in N, E, W, S order.
    #[inline]
    #[must_use]
    pub const fn neighbors(&self) -> [BiomeId; 4] {
        [self.north, self.east, self.west, self.south]
    }

    /// Returns true if any neighbour satisfies `predicate`.
    #[inline]
    pub fn any_neighbor(&self, predicate: impl FnMut(BiomeId) -> bool) -> bool {
        self.neighbors().into_iter().any(predicate)
    }

    /// Returns true if every neighbour satisfies `predicate`.
    #[inline]
    pub fn all_neighbors(&self, predicate: impl FnMut(BiomeId) -> bool) -> bool {
        self.neighbors().into_iter().all(predicate)
    }
}

/// The per-cell rewrite a [`TransformLayer`] applies.
///
/// Implementations see only the cell's neighbourhood, its world coordinates
/// and a random stream seeded from those coordinates, which keeps every
/// output cell independent of every other.
pub trait CellTransform: Send + Sync {
    /// Short name for diagnostics.
    const NAME: &'static str;

    /// Computes the output code for the cell at world `(x, y)`.
    fn apply(&self, cell: &Neighborhood, x: i32, y: i32, rng: &mut CellRng) -> BiomeId;
}

/// A layer applying a [`CellTransform`] over its parent padded by one cell.
pub struct TransformLayer<T> {
    /// Seed state for the per-cell random streams.
    seed: LayerSeed,
    /// Source of the padded input.
    parent: LayerRef,
    /// The rewrite.
    transform: T,
}

impl<T: CellTransform> TransformLayer<T> {
    /// Neighbourhood radius the transform reads.
    pub const RADIUS: i32 = 1;

    /// Creates a layer reading from `parent`.
    #[must_use]
    pub fn new(seed: LayerSeed, parent: LayerRef, transform: T) -> Self {
        Self {
            seed,
            parent,
            transform,
        }
    }

    /// The wrapped transform.
    #[must_use]
    pub fn transform(&self) -> &T {
        &self.transform
    }
}

impl<T: CellTransform> Layer for TransformLayer<T> {
    fn get_grid(&self, area: Area, pool: &mut dyn BufferSource<BiomeId>) -> LayerResult<Grid> {
        let area = area.validate()?;
        trace!(
            layer = T::NAME,
            x = area.x,
            y = area.y,
            width = area.width,
            height = area.height,
            "get_grid"
        );

        let padded_area = area.padded(Self::RADIUS)?;
        let parent = self.parent.get_grid(padded_area, pool)?;
        if parent.area() != padded_area {
            return Err(LayerError::ParentSizeMismatch {
                expected: padded_area.cell_count(),
                actual: parent.data().len(),
            });
        }

        let stride = usize::try_from(padded_area.width).unwrap_or(0);
        let width = usize::try_from(area.width).unwrap_or(0);
        let mut out = pool.acquire(area.cell_count());

        for ((row, y), out_row) in area.rows().enumerate().zip(out.chunks_exact_mut(width)) {
            for ((column, x), slot) in area.columns().enumerate().zip(out_row.iter_mut()) {
                let mut rng = self.seed.cell_rng(x, y);
                let cell = Neighborhood::read(parent.data(), stride, column, row);
                *slot = self.transform.apply(&cell, x, y, &mut rng);
            }
        }

        pool.release(parent.into_data());
        Grid::new(area, out)
    }

    fn name(&self) -> &'static str {
        T::NAME
    }

    fn seed(&self) -> Option<LayerSeed> {
        Some(self.seed)
    }

    fn parent(&self) -> Option<&LayerRef> {
        Some(&self.parent)
    }
}

/// Root layer: picks a biome per cell from a weighted list.
///
/// Each cell draws from its own [`CellRng`], so any window of the plane can
/// be produced independently.
pub struct SourceLayer {
    /// Seed state for the per-cell draws.
    seed: LayerSeed,
    /// Biomes with a positive weight, in declaration order.
    biomes: Vec<BiomeId>,
    /// Running weight total up to and including each biome.
    cumulative: Vec<u32>,
}

impl SourceLayer {
    /// Creates a source layer from `(biome, weight)` pairs.
    ///
    /// Zero weights are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the total weight is zero or does not fit in a
    /// `u32`.
    pub fn new(seed: LayerSeed, weighted: &[(BiomeId, u32)]) -> LayerResult<Self> {
        let mut biomes = Vec::with_capacity(weighted.len());
        let mut cumulative = Vec::with_capacity(weighted.len());
        let mut total: u32 = 0;

        for &(id, weight) in weighted.iter().filter(|&&(_, weight)| weight > 0) {
            total = total.checked_add(weight).ok_or_else(|| {
                LayerError::InvalidConfig("source layer weights overflow u32".to_owned())
            })?;
            biomes.push(id);
            cumulative.push(total);
        }

        if total == 0 {
            return Err(LayerError::InvalidConfig(
                "source layer needs at least one biome with a positive weight".to_owned(),
            ));
        }
        Ok(Self {
            seed,
            biomes,
            cumulative,
        })
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Maps a roll in `0..total_weight()` to its biome.
    fn pick(&self, roll: u32) -> BiomeId {
        let index = self.cumulative.partition_point(|&bound| bound <= roll);
        self.biomes.get(index).copied().unwrap_or_default()
    }
}

impl Layer for SourceLayer {
    fn get_grid(&self, area: Area, pool: &mut dyn BufferSource<BiomeId>) -> LayerResult<Grid> {
        let area = area.validate()?;
        let width = usize::try_from(area.width).unwrap_or(0);
        let total = self.total_weight();
        let mut out = pool.acquire(area.cell_count());

        for (y, out_row) in area.rows().zip(out.chunks_exact_mut(width)) {
            for (x, slot) in area.columns().zip(out_row.iter_mut()) {
                let mut rng = self.seed.cell_rng(x, y);
                *slot = self.pick(rng.next_int(total));
            }
        }

        Grid::new(area, out)
    }

    fn name(&self) -> &'static str {
        "source"
    }

    fn seed(&self) -> Option<LayerSeed> {
        Some(self.seed)
    }
}
