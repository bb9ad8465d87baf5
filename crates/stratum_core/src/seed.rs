//! # Deterministic Seeding
//!
//! Every layer derives its randomness from three inputs only: the world seed,
//! the layer's own seed constant and the cell coordinates. Call order,
//! history and thread never influence a value.
//!
//! ## Mixing
//!
//! All steps use the same 64-bit linear congruential mix
//! `s = s * (s * MUL + INC)` followed by adding a salt:
//!
//! 1. Layer base seed: the constant, mixed three times with itself.
//! 2. World-gen seed: the world seed, mixed three times with the base seed.
//! 3. Cell state: the world-gen seed, mixed with `x`, `y`, `x`, `y`.
//!
//! ## Determinism Guarantee
//!
//! Only wrapping integer arithmetic is involved, so the state is identical on
//! every platform and every build profile.

/// Multiplier of the 64-bit LCG mix.
const LCG_MULTIPLIER: i64 = 6_364_136_223_846_793_005;
/// Increment of the 64-bit LCG mix.
const LCG_INCREMENT: i64 = 1_442_695_040_888_963_407;

/// One mixing round: `state * (state * MUL + INC) + salt`.
#[inline]
const fn mix(state: i64, salt: i64) -> i64 {
    state
        .wrapping_mul(state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT))
        .wrapping_add(salt)
}

/// World seed for deterministic generation.
///
/// All layer seeds derive from this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed(i64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

/// The immutable seed state of one layer in a pipeline.
///
/// Built once at pipeline assembly from the layer's seed constant and the
/// world seed; never mutated afterwards, so it can be shared freely across
/// threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerSeed {
    /// The layer's seed constant as configured.
    constant: i64,
    /// Constant after self-mixing.
    base: i64,
    /// World seed after mixing with `base`.
    world_gen: i64,
}

impl LayerSeed {
    /// Derives a layer's seed state from its constant and the world seed.
    #[must_use]
    pub const fn new(constant: i64, world: WorldSeed) -> Self {
        let mut base = constant;
        base = mix(base, constant);
        base = mix(base, constant);
        base = mix(base, constant);

        let mut world_gen = world.value();
        world_gen = mix(world_gen, base);
        world_gen = mix(world_gen, base);
        world_gen = mix(world_gen, base);

        Self {
            constant,
            base,
            world_gen,
        }
    }

    /// The seed constant this state was derived from.
    #[inline]
    #[must_use]
    pub const fn constant(&self) -> i64 {
        self.constant
    }

    /// The world-gen seed (world seed mixed with this layer's base seed).
    #[inline]
    #[must_use]
    pub const fn world_gen(&self) -> i64 {
        self.world_gen
    }

    /// Per-cell state for the cell at world coordinates `(x, y)`.
    #[must_use]
    pub const fn cell_state(&self, x: i32, y: i32) -> i64 {
        let x = x as i64;
        let y = y as i64;

        let mut state = self.world_gen;
        state = mix(state, x);
        state = mix(state, y);
        state = mix(state, x);
        mix(state, y)
    }

    /// Random stream for the cell at world coordinates `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn cell_rng(&self, x: i32, y: i32) -> CellRng {
        CellRng {
            state: self.cell_state(x, y),
            world_gen: self.world_gen,
        }
    }
}

/// Free-function form of [`LayerSeed::cell_state`].
///
/// Pipelines cache the [`LayerSeed`]; this is for callers that only hold the
/// raw numbers.
#[must_use]
pub const fn seed_for(cell_x: i32, cell_y: i32, layer_seed: i64, world_seed: i64) -> i64 {
    LayerSeed::new(layer_seed, WorldSeed::new(world_seed)).cell_state(cell_x, cell_y)
}

/// Deterministic random stream scoped to a single cell.
///
/// Created fresh for every cell, so the values drawn depend only on the
/// cell's coordinates and its layer's seed chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRng {
    /// Current state.
    state: i64,
    /// Salt added after each draw.
    world_gen: i64,
}

impl CellRng {
    /// Returns the current raw state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> i64 {
        self.state
    }

    /// Draws an integer in `[0, bound)` and advances the stream.
    ///
    /// A `bound` of zero is treated as one.
    #[must_use]
    pub fn next_int(&mut self, bound: u32) -> u32 {
        let bound = i64::from(bound.max(1));
        let value = (self.state >> 24).rem_euclid(bound);
        self.state = mix(self.state, self.world_gen);
        // 0 <= value < bound <= u32::MAX
        u32::try_from(value).unwrap_or(0)
    }

    /// Picks one of `choices` uniformly.
    ///
    /// Returns `None` for an empty slice.
    pub fn select<'a, T>(&mut self, choices: &'a [T]) -> Option<&'a T> {
        let len = u32::try_from(choices.len()).ok()?;
        if len == 0 {
            return None;
        }
        choices.get(self.next_int(len) as usize)
    }
}
