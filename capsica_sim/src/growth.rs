// Plant growth lifecycle: phases and their durations.
//
// A plant moves through six phases in strict order — Sprout, Seedling,
// Vegetative, Budding, Flowering, Ripening — each lasting a whole number of
// virtual days, scaled per plant type by its growth-speed trait. Elapsed
// time past the final phase means the plant is dead, represented as "no
// current phase" (`None`). Only Ripening is harvestable; only a dead plant
// is compostable.

use crate::config::MILLIS_PER_DAY;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One growth phase. Ordering is the lifecycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Sprout,
    Seedling,
    Vegetative,
    Budding,
    Flowering,
    Ripening,
}

impl Phase {
    /// Only the Ripening phase can be harvested.
    pub fn is_ripe(self) -> bool {
        self == Phase::Ripening
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Sprout => "Sprout",
            Phase::Seedling => "Seedling",
            Phase::Vegetative => "Vegetative",
            Phase::Budding => "Budding",
            Phase::Flowering => "Flowering",
            Phase::Ripening => "Ripening",
        };
        f.write_str(name)
    }
}

/// Per-phase durations in virtual days, before growth-speed scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub sprout_days: i64,
    pub seedling_days: i64,
    pub vegetative_days: i64,
    pub budding_days: i64,
    pub flowering_days: i64,
    pub ripening_days: i64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            sprout_days: 7,
            seedling_days: 20,
            vegetative_days: 40,
            budding_days: 7,
            flowering_days: 7,
            ripening_days: 7,
        }
    }
}

impl PhaseDurations {
    fn ordered(&self) -> [(i64, Phase); 6] {
        [
            (self.sprout_days, Phase::Sprout),
            (self.seedling_days, Phase::Seedling),
            (self.vegetative_days, Phase::Vegetative),
            (self.budding_days, Phase::Budding),
            (self.flowering_days, Phase::Flowering),
            (self.ripening_days, Phase::Ripening),
        ]
    }

    fn scaled_millis(days: i64, scale: f32) -> i64 {
        (days as f64 * scale as f64 * MILLIS_PER_DAY as f64) as i64
    }

    /// The phase after `elapsed_millis` of growth, walking the table and
    /// subtracting each phase's scaled duration until the remainder is
    /// non-positive. Exhausting the table means the plant is dead: `None`.
    pub fn phase_at(&self, elapsed_millis: i64, scale: f32) -> Option<Phase> {
        let mut remaining = elapsed_millis;
        for (days, phase) in self.ordered() {
            remaining -= Self::scaled_millis(days, scale);
            if remaining <= 0 {
                return Some(phase);
            }
        }
        None
    }

    /// Total lifetime in virtual milliseconds at the given scale.
    pub fn total_millis(&self, scale: f32) -> i64 {
        self.ordered()
            .iter()
            .map(|(days, _)| Self::scaled_millis(*days, scale))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = MILLIS_PER_DAY;

    #[test]
    fn phase_walk_in_order() {
        let durations = PhaseDurations::default();
        assert_eq!(durations.phase_at(0, 1.0), Some(Phase::Sprout));
        assert_eq!(durations.phase_at(6 * DAY, 1.0), Some(Phase::Sprout));
        assert_eq!(durations.phase_at(7 * DAY, 1.0), Some(Phase::Sprout));
        assert_eq!(durations.phase_at(7 * DAY + 1, 1.0), Some(Phase::Seedling));
        assert_eq!(durations.phase_at(27 * DAY + 1, 1.0), Some(Phase::Vegetative));
        assert_eq!(durations.phase_at(67 * DAY + 1, 1.0), Some(Phase::Budding));
        assert_eq!(durations.phase_at(74 * DAY + 1, 1.0), Some(Phase::Flowering));
        assert_eq!(durations.phase_at(81 * DAY + 1, 1.0), Some(Phase::Ripening));
    }

    #[test]
    fn exceeding_all_phases_is_dead() {
        let durations = PhaseDurations::default();
        let total = durations.total_millis(1.0);
        assert_eq!(durations.phase_at(total, 1.0), Some(Phase::Ripening));
        assert_eq!(durations.phase_at(total + 1, 1.0), None);
        assert_eq!(durations.phase_at(total * 10, 1.0), None);
    }

    #[test]
    fn growth_scale_shortens_every_phase() {
        let durations = PhaseDurations::default();
        // At half scale the whole lifecycle fits in half the time.
        assert_eq!(durations.total_millis(0.5), durations.total_millis(1.0) / 2);
        // 4 days at half scale is already past the 3.5-day sprout window.
        assert_eq!(durations.phase_at(4 * DAY, 0.5), Some(Phase::Seedling));
    }

    #[test]
    fn only_ripening_is_ripe() {
        assert!(Phase::Ripening.is_ripe());
        for phase in [
            Phase::Sprout,
            Phase::Seedling,
            Phase::Vegetative,
            Phase::Budding,
            Phase::Flowering,
        ] {
            assert!(!phase.is_ripe());
        }
    }
}
