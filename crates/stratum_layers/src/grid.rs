//! # Biome Grids
//!
//! A grid is a rectangular window onto the unbounded biome plane, stored
//! row-major. Grids are transient: they are produced per request and their
//! buffers go back to a [`BufferPool`](stratum_core::BufferPool) once the
//! caller is done with them.

use crate::biome::BiomeId;
use crate::error::{LayerError, LayerResult};

/// A rectangle on the biome plane.
///
/// Coordinates may be negative; the plane has no edge. World coordinates
/// wrap around at the `i32` limits, so a window starting at `i32::MAX`
/// continues at `i32::MIN` and every cell keeps exactly four neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Area {
    /// X of the top-left cell.
    pub x: i32,
    /// Y of the top-left cell.
    pub y: i32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl Area {
    /// Creates a new area.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Fails fast on a non-positive width or height.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidArea`].
    pub fn validate(self) -> LayerResult<Self> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LayerError::InvalidArea {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    /// Grows the area by `radius` cells on every side.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidArea`] if the grown width or height no
    /// longer fits in an `i32`.
    pub fn padded(self, radius: i32) -> LayerResult<Self> {
        let grow = |extent: i32| radius.checked_mul(2).and_then(|twice| extent.checked_add(twice));

        match (grow(self.width), grow(self.height)) {
            (Some(width), Some(height)) => Ok(Self {
                x: self.x.wrapping_sub(radius),
                y: self.y.wrapping_sub(radius),
                width,
                height,
            }),
            _ => Err(LayerError::InvalidArea {
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Number of cells covered. Zero for an invalid area.
    #[inline]
    #[must_use]
    pub fn cell_count(self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(0);
        let height = usize::try_from(self.height).unwrap_or(0);
        width * height
    }

    /// World x of every column, left to right.
    pub fn columns(self) -> impl Iterator<Item = i32> {
        (0..self.width.max(0)).map(move |dx| self.x.wrapping_add(dx))
    }

    /// World y of every row, top to bottom.
    pub fn rows(self) -> impl Iterator<Item = i32> {
        (0..self.height.max(0)).map(move |dy| self.y.wrapping_add(dy))
    }

    /// Returns true if world cell `(x, y)` lies inside the area.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        let dx = x.wrapping_sub(self.x);
        let dy = y.wrapping_sub(self.y);
        dx >= 0 && dx < self.width && dy >= 0 && dy < self.height
    }

    /// Returns true if `other` lies entirely inside this area.
    #[must_use]
    pub fn encloses(self, other: Self) -> bool {
        let dx = other.x.wrapping_sub(self.x);
        let dy = other.y.wrapping_sub(self.y);
        dx >= 0
            && dy >= 0
            && i64::from(dx) + i64::from(other.width) <= i64::from(self.width)
            && i64::from(dy) + i64::from(other.height) <= i64::from(self.height)
    }
}

/// A window of biome codes.
///
/// # Invariant
///
/// `data.len() == area.width * area.height`, enforced by every constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// The window this grid covers.
    area: Area,
    /// Row-major cells.
    data: Vec<BiomeId>,
}

impl Grid {
    /// Wraps `data` as the contents of `area`.
    ///
    /// # Errors
    ///
    /// Returns an error if the area is invalid or the data length does not
    /// match it.
    pub fn new(area: Area, data: Vec<BiomeId>) -> LayerResult<Self> {
        let area = area.validate()?;
        let expected = area.cell_count();
        if data.len() != expected {
            return Err(LayerError::GridSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { area, data })
    }

    /// Builds a grid by evaluating `f(x, y)` at every world cell of `area`.
    ///
    /// # Errors
    ///
    /// Returns an error if the area is invalid.
    pub fn from_fn(area: Area, mut f: impl FnMut(i32, i32) -> BiomeId) -> LayerResult<Self> {
        let area = area.validate()?;
        let mut data = Vec::with_capacity(area.cell_count());
        for y in area.rows() {
            for x in area.columns() {
                data.push(f(x, y));
            }
        }
        Ok(Self { area, data })
    }

    /// The covered window.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Area {
        self.area
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.area.width
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.area.height
    }

    /// Row-major cells.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[BiomeId] {
        &self.data
    }

    /// Cell at world coordinates `(x, y)`, or `None` outside the window.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<BiomeId> {
        if !self.area.contains(x, y) {
            return None;
        }
        let column = usize::try_from(x.wrapping_sub(self.area.x)).ok()?;
        let row = usize::try_from(y.wrapping_sub(self.area.y)).ok()?;
        let stride = usize::try_from(self.area.width).ok()?;
        self.data.get(row * stride + column).copied()
    }

    /// Cell at local offset `(column, row)` from the top-left corner.
    #[must_use]
    pub fn local(&self, column: usize, row: usize) -> Option<BiomeId> {
        let stride = usize::try_from(self.area.width).ok()?;
        if column >= stride {
            return None;
        }
        self.data.get(row * stride + column).copied()
    }

    /// Copies out the part of this grid covering `area`.
    ///
    /// # Errors
    ///
    /// Returns an error if `area` is invalid or not fully inside this grid.
    pub fn sub_grid(&self, area: Area) -> LayerResult<Self> {
        let area = area.validate()?;
        if !self.area.encloses(area) {
            return Err(LayerError::GridSizeMismatch {
                expected: area.cell_count(),
                actual: 0,
            });
        }
        Self::from_fn(area, |x, y| self.get(x, y).unwrap_or_default())
    }

    /// Raw little-endian bytes of the cells, for export and hashing.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Gives up the cell buffer, typically to return it to a pool.
    #[must_use]
    pub fn into_data(self) -> Vec<BiomeId> {
        self.data
    }
}
