//! # Biome Edge Smoothing
//!
//! Rewrites biomes that touch an unsuitable neighbour into a buffering edge
//! biome, so that e.g. mountain peaks are ringed by foothills and deserts
//! never sit directly against ice plains.
//!
//! ## Evaluation Order
//!
//! For every cell:
//!
//! 1. The ordered [`EdgeRule`] list is scanned. The first rule whose `from`
//!    matches the center claims the cell and decides its output; no later
//!    rule is looked at.
//! 2. If no rule claimed the cell, the desert and swamp special cases run.
//! 3. Otherwise the center passes through unchanged.
//!
//! ## Matching
//!
//! Two predicates decide whether a neighbour is acceptable:
//!
//! - [`compatible`]: equal codes, or the same family. Plateau biomes only
//!   accept other plateaus of their family. Note the asymmetry: a mesa
//!   accepts a mesa plateau, a mesa plateau does not accept a mesa.
//! - [`can_neighbor`]: [`compatible`], or known biomes whose temperature
//!   categories agree or where either side is [`TempCategory::Medium`].
//!
//! Smoothing never consumes randomness; the result is fully rule-driven.

use std::sync::Arc;

use stratum_core::CellRng;
use tracing::{debug, warn};

use crate::biome::{BiomeFamily, BiomeId, BiomeRegistry, TempCategory};
use crate::error::{LayerError, LayerResult};
use crate::layer::{CellTransform, Neighborhood};

/// "Equal or plateau" test of `a` against `b`.
///
/// Unknown codes are only compatible with themselves.
#[must_use]
pub fn compatible(registry: &BiomeRegistry, a: BiomeId, b: BiomeId) -> bool {
    if a == b {
        return true;
    }

    let (Some(first), Some(second)) = (registry.get(a), registry.get(b)) else {
        return false;
    };

    if first.plateau {
        return second.plateau && first.family == second.family;
    }
    first.family == second.family && first.family != BiomeFamily::Unique
}

/// Whether `a` may border `b` without an edge biome in between.
///
/// Unknown codes may only border themselves.
#[must_use]
pub fn can_neighbor(registry: &BiomeRegistry, a: BiomeId, b: BiomeId) -> bool {
    if compatible(registry, a, b) {
        return true;
    }

    match (registry.temperature_category_of(a), registry.temperature_category_of(b)) {
        (Some(first), Some(second)) => {
            first == second || first == TempCategory::Medium || second == TempCategory::Medium
        }
        _ => false,
    }
}

/// How an [`EdgeRule`] recognises its cell and judges the neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMatch {
    /// Claims only `center == from`; neighbours must be [`compatible`].
    Exact,
    /// Claims any center [`compatible`] with `from`; neighbours must satisfy
    /// [`can_neighbor`].
    Compatible,
}

/// One substitution candidate: `from` becomes `to` at an unsuitable edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRule {
    /// Biome being edged.
    pub from: BiomeId,
    /// Edge biome written when a neighbour does not fit.
    pub to: BiomeId,
    /// Matching mode.
    pub matching: EdgeMatch,
}

impl EdgeRule {
    /// A rule matching `from` exactly.
    #[must_use]
    pub const fn exact(from: BiomeId, to: BiomeId) -> Self {
        Self {
            from,
            to,
            matching: EdgeMatch::Exact,
        }
    }

    /// A rule matching anything compatible with `from`, judged by
    /// temperature category.
    #[must_use]
    pub const fn compatible(from: BiomeId, to: BiomeId) -> Self {
        Self {
            from,
            to,
            matching: EdgeMatch::Compatible,
        }
    }

    /// Returns the output if this rule claims the cell, `None` otherwise.
    #[must_use]
    pub fn claim(&self, registry: &BiomeRegistry, cell: &Neighborhood) -> Option<BiomeId> {
        let settled = match self.matching {
            EdgeMatch::Exact => {
                if cell.center != self.from {
                    return None;
                }
                cell.all_neighbors(|n| compatible(registry, n, self.from))
            }
            EdgeMatch::Compatible => {
                if !compatible(registry, cell.center, self.from) {
                    return None;
                }
                cell.all_neighbors(|n| can_neighbor(registry, n, self.from))
            }
        };

        Some(if settled { cell.center } else { self.to })
    }
}

/// Standard rules by name, highest priority first.
const STANDARD_RULES: &[(&str, &str, EdgeMatch)] = &[
    ("mountain", "mountain_foothills", EdgeMatch::Exact),
    ("wasteland", "desert", EdgeMatch::Exact),
    ("extreme_hills", "extreme_hills_edge", EdgeMatch::Compatible),
    ("mesa_rock", "mesa", EdgeMatch::Exact),
    ("mesa_clear_rock", "mesa", EdgeMatch::Exact),
    ("redwood_taiga", "taiga", EdgeMatch::Exact),
];

/// Resolves the standard rule table against `registry`.
///
/// Rules naming a biome the registry lacks are left out, so optional biome
/// sets can be switched off without touching the table.
#[must_use]
pub fn standard_rules(registry: &BiomeRegistry) -> Vec<EdgeRule> {
    STANDARD_RULES
        .iter()
        .filter_map(|&(from, to, matching)| {
            match (registry.code_for_name(from), registry.code_for_name(to)) {
                (Some(from), Some(to)) => Some(EdgeRule { from, to, matching }),
                _ => {
                    debug!(from, to, "edge rule skipped, biome not registered");
                    None
                }
            }
        })
        .collect()
}

/// Biomes the special cases refer to.
#[derive(Clone, Copy, Debug)]
struct SpecialBiomes {
    desert: BiomeId,
    ice_plains: BiomeId,
    hills_with_trees: BiomeId,
    swamp: BiomeId,
    cold_taiga: BiomeId,
    plains: BiomeId,
    jungle: BiomeId,
    jungle_edge: BiomeId,
}

impl SpecialBiomes {
    fn resolve(registry: &BiomeRegistry) -> LayerResult<Self> {
        Ok(Self {
            desert: registry.require("desert")?,
            ice_plains: registry.require("ice_plains")?,
            hills_with_trees: registry.require("extreme_hills_with_trees")?,
            swamp: registry.require("swampland")?,
            cold_taiga: registry.require("cold_taiga")?,
            plains: registry.require("plains")?,
            jungle: registry.require("jungle")?,
            jungle_edge: registry.require("jungle_edge")?,
        })
    }
}

/// The edge-smoothing transform.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stratum_layers::{BiomeEdge, BiomeRegistry, Neighborhood};
///
/// let registry = Arc::new(BiomeRegistry::vanilla());
/// let desert = registry.code_for_name("desert").unwrap();
/// let ice = registry.code_for_name("ice_plains").unwrap();
/// let edge = BiomeEdge::new(Arc::clone(&registry)).unwrap();
///
/// let cell = Neighborhood { north: ice, ..Neighborhood::uniform(desert) };
/// assert_eq!(
///     edge.smooth(&cell),
///     registry.code_for_name("extreme_hills_with_trees").unwrap()
/// );
/// ```
pub struct BiomeEdge {
    /// Descriptor lookup for the predicates.
    registry: Arc<BiomeRegistry>,
    /// Rules in priority order.
    rules: Vec<EdgeRule>,
    /// Special-case biomes.
    special: SpecialBiomes,
}

impl BiomeEdge {
    /// Creates the transform with the standard rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if a biome used by the desert or swamp special cases
    /// is missing from the registry.
    pub fn new(registry: Arc<BiomeRegistry>) -> LayerResult<Self> {
        let rules = standard_rules(&registry);
        Self::with_rules(registry, rules)
    }

    /// Creates the transform with a custom rule list, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule or special case names an unregistered
    /// biome.
    pub fn with_rules(registry: Arc<BiomeRegistry>, rules: Vec<EdgeRule>) -> LayerResult<Self> {
        if let Some(unknown) = rules
            .iter()
            .flat_map(|rule| [rule.from, rule.to])
            .find(|&id| !registry.contains(id))
        {
            return Err(LayerError::InvalidConfig(format!(
                "edge rule refers to unregistered biome {unknown}"
            )));
        }

        let special = SpecialBiomes::resolve(&registry)?;
        Ok(Self {
            registry,
            rules,
            special,
        })
    }

    /// The rules in priority order.
    #[must_use]
    pub fn rules(&self) -> &[EdgeRule] {
        &self.rules
    }

    /// Computes the smoothed code for one neighbourhood.
    #[must_use]
    pub fn smooth(&self, cell: &Neighborhood) -> BiomeId {
        self.rules
            .iter()
            .find_map(|rule| rule.claim(&self.registry, cell))
            .unwrap_or_else(|| self.special_case(cell))
    }

    /// Desert and swamp handling for cells no rule claimed.
    fn special_case(&self, cell: &Neighborhood) -> BiomeId {
        let s = &self.special;

        if cell.center == s.desert {
            // separate ice and desert with a wooded mountain
            if cell.any_neighbor(|n| n == s.ice_plains) {
                return s.hills_with_trees;
            }
        } else if cell.center == s.swamp {
            if cell.any_neighbor(|n| n == s.desert || n == s.cold_taiga || n == s.ice_plains) {
                return s.plains;
            }
            if cell.any_neighbor(|n| n == s.jungle) {
                return s.jungle_edge;
            }
        }

        cell.center
    }
}

impl CellTransform for BiomeEdge {
    const NAME: &'static str = "biome_edge";

    fn apply(&self, cell: &Neighborhood, x: i32, y: i32, _rng: &mut CellRng) -> BiomeId {
        if !self.registry.contains(cell.center) {
            warn!(x, y, code = cell.center.raw(), "unknown biome code, passed through");
            return cell.center;
        }
        for neighbor in cell.neighbors() {
            if !self.registry.contains(neighbor) {
                warn!(
                    x,
                    y,
                    code = neighbor.raw(),
                    "unknown neighbour biome code, treated as unfit"
                );
            }
        }
        self.smooth(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stratum_core::{LayerSeed, WorldSeed};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    const UNKNOWN: BiomeId = BiomeId(200);

    fn registry() -> Arc<BiomeRegistry> {
        Arc::new(BiomeRegistry::vanilla())
    }

    fn id(registry: &BiomeRegistry, name: &str) -> BiomeId {
        registry.code_for_name(name).unwrap()
    }

    fn surrounded(center: BiomeId, neighbor: BiomeId) -> Neighborhood {
        Neighborhood {
            center,
            ..Neighborhood::uniform(neighbor)
        }
    }

    #[test]
    fn test_compatible_families() {
        let r = registry();

        assert!(compatible(&r, id(&r, "plains"), id(&r, "plains")));
        assert!(compatible(&r, id(&r, "extreme_hills_edge"), id(&r, "extreme_hills")));
        assert!(compatible(&r, id(&r, "taiga"), id(&r, "redwood_taiga")));
        assert!(compatible(&r, id(&r, "mountain_foothills"), id(&r, "mountain")));
        assert!(!compatible(&r, id(&r, "plains"), id(&r, "desert")));
        assert!(!compatible(&r, id(&r, "wasteland"), id(&r, "desert")));
    }

    #[test]
    fn test_compatible_mesa_plateau_is_asymmetric() {
        let r = registry();
        let mesa = id(&r, "mesa");
        let rock = id(&r, "mesa_rock");
        let clear = id(&r, "mesa_clear_rock");

        assert!(compatible(&r, mesa, rock));
        assert!(!compatible(&r, rock, mesa));
        assert!(compatible(&r, rock, clear));
        assert!(compatible(&r, clear, rock));
    }

    #[test]
    fn test_compatible_unknown() {
        let r = registry();

        assert!(compatible(&r, UNKNOWN, UNKNOWN));
        assert!(!compatible(&r, UNKNOWN, id(&r, "plains")));
        assert!(!compatible(&r, id(&r, "plains"), UNKNOWN));
    }

    #[test]
    fn test_unique_family_only_matches_itself() {
        let mut r = BiomeRegistry::vanilla();
        r.register(BiomeDescriptor::new(300, "glade", 0.5, BiomeFamily::Unique, false))
            .unwrap();
        r.register(BiomeDescriptor::new(301, "grove", 0.5, BiomeFamily::Unique, false))
            .unwrap();

        assert!(compatible(&r, BiomeId(300), BiomeId(300)));
        assert!(!compatible(&r, BiomeId(300), BiomeId(301)));
    }

    #[test]
    fn test_can_neighbor_categories() {
        let r = registry();

        // warm vs cold
        assert!(!can_neighbor(&r, id(&r, "desert"), id(&r, "ice_plains")));
        // warm vs warm
        assert!(can_neighbor(&r, id(&r, "desert"), id(&r, "savanna")));
        // medium on either side
        assert!(can_neighbor(&r, id(&r, "desert"), id(&r, "plains")));
        assert!(can_neighbor(&r, id(&r, "plains"), id(&r, "ice_plains")));
        // ocean vs cold
        assert!(!can_neighbor(&r, id(&r, "ocean"), id(&r, "ice_plains")));
        // unknown
        assert!(!can_neighbor(&r, UNKNOWN, id(&r, "plains")));
    }

    #[test]
    fn test_standard_rule_order() {
        let r = registry();
        let rules = standard_rules(&r);

        assert_eq!(
            rules,
            vec![
                EdgeRule::exact(id(&r, "mountain"), id(&r, "mountain_foothills")),
                EdgeRule::exact(id(&r, "wasteland"), id(&r, "desert")),
                EdgeRule::compatible(id(&r, "extreme_hills"), id(&r, "extreme_hills_edge")),
                EdgeRule::exact(id(&r, "mesa_rock"), id(&r, "mesa")),
                EdgeRule::exact(id(&r, "mesa_clear_rock"), id(&r, "mesa")),
                EdgeRule::exact(id(&r, "redwood_taiga"), id(&r, "taiga")),
            ]
        );
    }

    #[test]
    fn test_optional_biomes_drop_rules() {
        let text = r#"
            [[biome]]
            id = 1
            name = "plains"
            temperature = 0.8
            family = "plains"

            [[biome]]
            id = 2
            name = "desert"
            temperature = 2.0
            family = "desert"

            [[biome]]
            id = 42
            name = "wasteland"
            temperature = 2.0
            family = "wasteland"
        "#;
        let r = BiomeRegistry::from_toml_str(text).unwrap();
        let rules = standard_rules(&r);

        assert_eq!(rules, vec![EdgeRule::exact(BiomeId(42), BiomeId(2))]);
    }

    #[test]
    fn test_mountain_gets_foothills() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let mountain = id(&r, "mountain");

        let cell = Neighborhood {
            south: id(&r, "plains"),
            ..Neighborhood::uniform(mountain)
        };
        assert_eq!(edge.smooth(&cell), id(&r, "mountain_foothills"));

        let cell = Neighborhood {
            south: id(&r, "mountain_foothills"),
            ..Neighborhood::uniform(mountain)
        };
        assert_eq!(edge.smooth(&cell), mountain);
    }

    #[test]
    fn test_wasteland_lined_with_desert() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();

        let cell = surrounded(id(&r, "wasteland"), id(&r, "desert"));
        assert_eq!(edge.smooth(&cell), id(&r, "desert"));
    }

    #[test]
    fn test_extreme_hills_uses_categories() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let hills = id(&r, "extreme_hills");

        // medium hills may touch anything known
        assert_eq!(edge.smooth(&surrounded(hills, id(&r, "desert"))), hills);
        assert_eq!(edge.smooth(&surrounded(hills, id(&r, "ice_plains"))), hills);

        // unknown neighbour forces the edge
        let cell = Neighborhood {
            east: UNKNOWN,
            ..Neighborhood::uniform(hills)
        };
        assert_eq!(edge.smooth(&cell), id(&r, "extreme_hills_edge"));
    }

    #[test]
    fn test_extreme_hills_family_claimed() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();

        // the wooded variant is claimed by the hills rule through its family
        let cell = Neighborhood {
            west: UNKNOWN,
            ..Neighborhood::uniform(id(&r, "extreme_hills_with_trees"))
        };
        assert_eq!(edge.smooth(&cell), id(&r, "extreme_hills_edge"));
    }

    #[test]
    fn test_cold_hills_edged_against_desert() {
        let mut r = BiomeRegistry::new();
        for (code, name, temperature, family) in [
            (1, "plains", 0.8, BiomeFamily::Plains),
            (2, "desert", 2.0, BiomeFamily::Desert),
            (3, "extreme_hills", 0.0, BiomeFamily::Hills),
            (6, "swampland", 0.8, BiomeFamily::Swamp),
            (12, "ice_plains", 0.0, BiomeFamily::Snow),
            (20, "extreme_hills_edge", 0.0, BiomeFamily::Hills),
            (21, "jungle", 0.95, BiomeFamily::Jungle),
            (23, "jungle_edge", 0.95, BiomeFamily::Jungle),
            (30, "cold_taiga", -0.5, BiomeFamily::Taiga),
            (34, "extreme_hills_with_trees", 0.2, BiomeFamily::Hills),
        ] {
            r.register(BiomeDescriptor::new(code, name, temperature, family, false))
                .unwrap();
        }
        let r = Arc::new(r);
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();

        assert_eq!(edge.smooth(&surrounded(BiomeId(3), BiomeId(2))), BiomeId(20));
        assert_eq!(edge.smooth(&surrounded(BiomeId(3), BiomeId(12))), BiomeId(3));
    }

    #[test]
    fn test_mesa_plateaus_lined_with_mesa() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let mesa = id(&r, "mesa");
        let rock = id(&r, "mesa_rock");
        let clear = id(&r, "mesa_clear_rock");

        assert_eq!(edge.smooth(&surrounded(rock, id(&r, "desert"))), mesa);
        assert_eq!(edge.smooth(&surrounded(clear, id(&r, "desert"))), mesa);
        assert_eq!(edge.smooth(&surrounded(rock, clear)), rock);
        // a mesa neighbour accepts the plateau
        assert_eq!(edge.smooth(&surrounded(rock, mesa)), rock);
    }

    #[test]
    fn test_redwood_taiga_lined_with_taiga() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let redwood = id(&r, "redwood_taiga");

        assert_eq!(edge.smooth(&surrounded(redwood, id(&r, "plains"))), id(&r, "taiga"));
        assert_eq!(edge.smooth(&surrounded(redwood, id(&r, "cold_taiga"))), redwood);
    }

    #[test]
    fn test_desert_next_to_ice() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let desert = id(&r, "desert");

        let cell = Neighborhood {
            north: id(&r, "ice_plains"),
            ..Neighborhood::uniform(desert)
        };
        assert_eq!(cell.center, BiomeId(2));
        assert_eq!(edge.smooth(&cell), BiomeId(34));

        assert_eq!(edge.smooth(&surrounded(desert, id(&r, "plains"))), desert);
    }

    #[test]
    fn test_swamp_edges() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let swamp = id(&r, "swampland");
        let plains = id(&r, "plains");

        for cold_or_dry in ["desert", "cold_taiga", "ice_plains"] {
            let cell = Neighborhood {
                west: id(&r, cold_or_dry),
                ..Neighborhood::uniform(swamp)
            };
            assert_eq!(edge.smooth(&cell), plains, "swamp next to {cold_or_dry}");
        }

        let jungle_east = Neighborhood {
            east: id(&r, "jungle"),
            ..Neighborhood::uniform(swamp)
        };
        assert_eq!(edge.smooth(&jungle_east), id(&r, "jungle_edge"));

        // the plains check wins over the jungle check
        let both = Neighborhood {
            east: id(&r, "jungle"),
            south: id(&r, "desert"),
            ..Neighborhood::uniform(swamp)
        };
        assert_eq!(edge.smooth(&both), plains);

        assert_eq!(edge.smooth(&Neighborhood::uniform(swamp)), swamp);
    }

    #[test]
    fn test_pass_through() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let plains = id(&r, "plains");

        assert_eq!(edge.smooth(&Neighborhood::uniform(plains)), plains);
        assert_eq!(edge.smooth(&surrounded(plains, id(&r, "ice_plains"))), plains);
    }

    #[test]
    fn test_homogeneous_interior_is_stable() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();

        for rule in edge.rules() {
            assert_eq!(edge.smooth(&Neighborhood::uniform(rule.from)), rule.from);
        }
        for descriptor in r.iter() {
            assert_eq!(edge.smooth(&Neighborhood::uniform(descriptor.id)), descriptor.id);
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let r = registry();
        let trees = id(&r, "extreme_hills_with_trees");
        let hills_rule =
            EdgeRule::compatible(id(&r, "extreme_hills"), id(&r, "extreme_hills_edge"));
        let trees_rule = EdgeRule::exact(trees, id(&r, "plains"));

        let cell = Neighborhood {
            north: UNKNOWN,
            ..Neighborhood::uniform(trees)
        };

        let hills_first =
            BiomeEdge::with_rules(Arc::clone(&r), vec![hills_rule, trees_rule]).unwrap();
        assert_eq!(hills_first.smooth(&cell), id(&r, "extreme_hills_edge"));

        let trees_first =
            BiomeEdge::with_rules(Arc::clone(&r), vec![trees_rule, hills_rule]).unwrap();
        assert_eq!(trees_first.smooth(&cell), id(&r, "plains"));
    }

    #[test]
    fn test_claimed_cell_skips_special_cases() {
        let r = registry();
        let desert = id(&r, "desert");
        let rule = EdgeRule::exact(desert, id(&r, "mesa"));
        let edge = BiomeEdge::with_rules(Arc::clone(&r), vec![rule]).unwrap();

        let cell = Neighborhood {
            north: id(&r, "ice_plains"),
            ..Neighborhood::uniform(desert)
        };
        assert_eq!(edge.smooth(&cell), id(&r, "mesa"));
    }

    #[test]
    fn test_unknown_center_passes_through() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let mut rng = LayerSeed::new(1, WorldSeed::new(1)).cell_rng(0, 0);

        let cell = surrounded(UNKNOWN, id(&r, "ice_plains"));
        assert_eq!(edge.apply(&cell, 5, -5, &mut rng), UNKNOWN);
    }

    /// Counts `warn!` events emitted while it is the default subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl Subscriber for WarnCounter {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    /// Runs `f` and returns how many warnings it logged.
    fn warnings_during(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        tracing::subscriber::with_default(WarnCounter(Arc::clone(&count)), f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_unknown_codes_are_logged() {
        let r = registry();
        let edge = BiomeEdge::new(Arc::clone(&r)).unwrap();
        let mut rng = LayerSeed::new(1, WorldSeed::new(1)).cell_rng(0, 0);
        let hills = id(&r, "extreme_hills");

        let known = surrounded(hills, id(&r, "plains"));
        let warned = warnings_during(|| {
            assert_eq!(edge.apply(&known, 0, 0, &mut rng), hills);
        });
        assert_eq!(warned, 0);

        let one_unknown = Neighborhood {
            south: UNKNOWN,
            ..known
        };
        let warned = warnings_during(|| {
            let smoothed = edge.apply(&one_unknown, 0, 0, &mut rng);
            assert_eq!(smoothed, id(&r, "extreme_hills_edge"));
        });
        assert_eq!(warned, 1);

        let two_unknown = Neighborhood {
            north: UNKNOWN,
            ..one_unknown
        };
        let warned = warnings_during(|| {
            let _ = edge.apply(&two_unknown, 0, 0, &mut rng);
        });
        assert_eq!(warned, 2);

        let unknown_center = surrounded(UNKNOWN, hills);
        let warned = warnings_during(|| {
            assert_eq!(edge.apply(&unknown_center, 0, 0, &mut rng), UNKNOWN);
        });
        assert_eq!(warned, 1);
    }

    #[test]
    fn test_stone_beach_stands_alone() {
        let r = registry();
        let stone = id(&r, "stone_beach");

        assert!(compatible(&r, id(&r, "beach"), id(&r, "cold_beach")));
        assert!(!compatible(&r, stone, id(&r, "beach")));
        assert!(!compatible(&r, id(&r, "cold_beach"), stone));
        assert!(compatible(&r, stone, stone));
    }

    #[test]
    fn test_unknown_rule_biome_rejected() {
        let r = registry();
        let rule = EdgeRule::exact(id(&r, "plains"), UNKNOWN);

        assert!(matches!(
            BiomeEdge::with_rules(r, vec![rule]),
            Err(LayerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_special_biome_rejected() {
        let mut r = BiomeRegistry::new();
        r.register(BiomeDescriptor::new(1, "plains", 0.8, BiomeFamily::Plains, false))
            .unwrap();

        assert_eq!(
            BiomeEdge::new(Arc::new(r)).err(),
            Some(LayerError::UnknownBiomeName("desert".to_owned()))
        );
    }
}
