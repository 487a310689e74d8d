// Plant catalog entries, planted instances, and grid pots.
//
// A `PlantType` is a catalog entry — starter or bred — whose observable
// attributes all derive from its chromosome's popcounts:
//
//   peppers per harvest = popcount(yield) × yield_per_bit
//   pepper size         = max(1, popcount(size))
//   heat                = popcount(potency)² × 1000 SHU
//   growth scale        = max(min_growth_scale, 1 − popcount(growth) / 128)
//
// Fewer set growth bits means a slower plant; a fully loaded growth gene
// hits the configured floor instead of zero. Starters are built from fixed
// per-type bit counts through the same formulas, so catalog stats and bred
// stats share one source of truth.
//
// A `Plant` is a planted instance. It stamps the light strength and medium
// effectiveness that were in force at planting time — harvest yield uses
// the stamps, not the live equipment, so upgrading a lamp never
// retroactively boosts plants already in the ground.

use crate::config::GameConfig;
use crate::genetics::{Chromosome, GENE_BITS, Gene};
use crate::growth::{Phase, PhaseDurations};
use crate::types::{Currency, PlantTypeId, Scovilles};
use capsica_prng::GameRng;
use serde::{Deserialize, Serialize};

/// Fixed ids for the starter catalog. Bred variants mint ids from the
/// breeding session's rng instead.
pub const BELL_PEPPER_ID: PlantTypeId = PlantTypeId(1);
pub const POBLANO_ID: PlantTypeId = PlantTypeId(2);
pub const GUAJILLO_ID: PlantTypeId = PlantTypeId(3);
pub const JALAPENO_ID: PlantTypeId = PlantTypeId(4);
pub const BIRDS_EYE_ID: PlantTypeId = PlantTypeId(5);

/// A catalog entry: display metadata plus the chromosome every derived
/// attribute comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantType {
    pub id: PlantTypeId,
    pub display_name: String,
    pub chromosome: Chromosome,
    pub phases: PhaseDurations,
    /// Seed price. `None` means the seed cannot be bought.
    pub seed_cost: Option<Currency>,
    /// Parents, for bred variants.
    pub lineage: Option<(PlantTypeId, PlantTypeId)>,
    /// Whether the auto-planter may sow this type.
    pub auto_plant: bool,
    /// Starter catalog entry (fixed id, never bred).
    pub starter: bool,
}

impl PlantType {
    pub fn pepper_yield(&self, config: &GameConfig) -> i64 {
        self.chromosome.yield_gene.popcount() as i64 * config.yield_per_bit
    }

    pub fn pepper_size(&self) -> u32 {
        self.chromosome.size.popcount().max(1)
    }

    pub fn scovilles(&self) -> Scovilles {
        let pop = self.chromosome.potency.popcount() as i64;
        Scovilles(pop * pop * 1000)
    }

    pub fn growth_scale(&self, config: &GameConfig) -> f32 {
        let fraction = self.chromosome.growth.popcount() as f32 / GENE_BITS as f32;
        (1.0 - fraction).max(config.min_growth_scale)
    }

    fn starter(
        id: PlantTypeId,
        display_name: &str,
        seed_cost: i64,
        yield_bits: u32,
        size_bits: u32,
        potency_bits: u32,
    ) -> PlantType {
        // Starter chromosomes are scattered from a fixed per-type seed so
        // every game sees identical starters. Growth genes stay empty:
        // starters grow at the unscaled default pace.
        let mut rng = GameRng::new(0xC0FFEE ^ id.0);
        PlantType {
            id,
            display_name: display_name.to_string(),
            chromosome: Chromosome {
                yield_gene: Gene::with_one_bits(yield_bits, &mut rng),
                size: Gene::with_one_bits(size_bits, &mut rng),
                potency: Gene::with_one_bits(potency_bits, &mut rng),
                growth: Gene::EMPTY,
            },
            phases: PhaseDurations::default(),
            seed_cost: Some(Currency(seed_cost)),
            lineage: None,
            auto_plant: false,
            starter: true,
        }
    }

    pub fn bell_pepper() -> PlantType {
        Self::starter(BELL_PEPPER_ID, "Bell Pepper", 2, 5, 6, 0)
    }

    pub fn poblano() -> PlantType {
        Self::starter(POBLANO_ID, "Poblano", 2, 4, 5, 1)
    }

    pub fn guajillo() -> PlantType {
        Self::starter(GUAJILLO_ID, "Guajillo", 5, 4, 4, 2)
    }

    pub fn jalapeno() -> PlantType {
        Self::starter(JALAPENO_ID, "Jalapeño", 10, 5, 4, 3)
    }

    pub fn birds_eye() -> PlantType {
        Self::starter(BIRDS_EYE_ID, "Bird's Eye", 20, 3, 2, 9)
    }
}

/// A planted instance occupying one pot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub type_id: PlantTypeId,
    /// Virtual clock value at planting.
    pub planted_at_millis: i64,
    /// Light strength in force at planting time.
    pub light_strength: i64,
    /// Medium effectiveness in force at planting time.
    pub medium_effectiveness: i64,
}

impl Plant {
    pub fn current_phase(
        &self,
        plant_type: &PlantType,
        now_millis: i64,
        config: &GameConfig,
    ) -> Option<Phase> {
        plant_type.phases.phase_at(
            now_millis - self.planted_at_millis,
            plant_type.growth_scale(config),
        )
    }

    pub fn is_ripe(&self, plant_type: &PlantType, now_millis: i64, config: &GameConfig) -> bool {
        self.current_phase(plant_type, now_millis, config)
            .is_some_and(Phase::is_ripe)
    }

    pub fn is_dead(&self, plant_type: &PlantType, now_millis: i64, config: &GameConfig) -> bool {
        self.current_phase(plant_type, now_millis, config).is_none()
    }

    /// Peppers produced by harvesting this plant, using the equipment
    /// stamped at planting time.
    pub fn harvest_yield(&self, plant_type: &PlantType, config: &GameConfig) -> i64 {
        plant_type.pepper_yield(config) * self.light_strength * self.medium_effectiveness
    }
}

/// One cell of the growing grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantPot {
    pub plant: Option<Plant>,
}
