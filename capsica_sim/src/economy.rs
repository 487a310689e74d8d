// Money flows: upkeep, produce pricing, and the distillate catalog.
//
// Upkeep is charged once per cost tick (one virtual day):
//
//   (light joules × electricity price + medium litres × water price)
//       × max(1, growing plant count)
//
// "Growing" means any phase that is neither ripe nor dead. The `max(1, _)`
// floor means powered equipment draws even over an empty grid; the free
// starting tiers draw nothing at all. An upkeep bill the balance cannot
// cover is the game's sole terminal condition — the bill is not deducted,
// the session just ends.
//
// Produce sells through the buyer membership: peppers at a flat 2 per unit
// plus a potency-proportional component, distillates at their concentrated
// scoville value times a per-distillate multiplier.

use crate::config::GameConfig;
use crate::types::{Currency, Scovilles};
use crate::upgrades::{Describe, Light, Medium, Membership};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Distillates
// ---------------------------------------------------------------------------

/// Concentrated pepper products. One unit requires `required_scovilles`
/// worth of raw peppers; Quantum Capsicum is the breeding catalyst and has
/// no sale value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Distillate {
    ChilliOil,
    HotSauce,
    QuantumCapsicum,
}

impl Distillate {
    pub const ALL: [Distillate; 3] = [
        Distillate::ChilliOil,
        Distillate::HotSauce,
        Distillate::QuantumCapsicum,
    ];

    /// Raw scovilles consumed per distilled unit.
    pub fn required_scovilles(self) -> Scovilles {
        match self {
            Distillate::ChilliOil => Scovilles(15_000_000),
            Distillate::HotSauce => Scovilles(90_000_000),
            Distillate::QuantumCapsicum => Scovilles(25_000_000_000),
        }
    }

    /// Sale price multiplier. Zero means unsellable.
    pub fn price_multiplier(self) -> i64 {
        match self {
            Distillate::ChilliOil => 2,
            Distillate::HotSauce => 4,
            Distillate::QuantumCapsicum => 0,
        }
    }
}

impl Describe for Distillate {
    fn display_name(&self) -> &'static str {
        match self {
            Distillate::ChilliOil => "Chilli Oil",
            Distillate::HotSauce => "Hot Sauce",
            Distillate::QuantumCapsicum => "Quantum Capsicum",
        }
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// The upkeep bill for one cost tick.
pub fn upkeep(light: Light, medium: Medium, growing_count: usize, config: &GameConfig) -> Currency {
    let equipment_draw = light.joules_per_cost_tick() * config.electricity_unit_cost
        + medium.litres_per_cost_tick() * config.water_unit_cost;
    Currency(equipment_draw * (growing_count as i64).max(1))
}

/// Sale proceeds for `quantity` peppers of the given heat.
pub fn pepper_sale_total(
    membership: Membership,
    scovilles: Scovilles,
    quantity: i64,
) -> Currency {
    let per_pepper = 2 + (scovilles.0 / 1000).max(1) * membership.price_per_scoville();
    Currency(per_pepper * quantity)
}

/// Sale proceeds for `units` whole units of a distillate.
pub fn distillate_sale_total(
    membership: Membership,
    distillate: Distillate,
    units: i64,
) -> Currency {
    let per_unit =
        distillate.required_scovilles().0 / 1000 * membership.price_per_scoville();
    Currency(per_unit * units * distillate.price_multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_equipment_draws_nothing() {
        let config = GameConfig::default();
        assert_eq!(upkeep(Light::Ambient, Medium::Soil, 0, &config), Currency(0));
        assert_eq!(upkeep(Light::Ambient, Medium::Soil, 12, &config), Currency(0));
    }

    #[test]
    fn powered_equipment_draws_even_over_an_empty_grid() {
        let config = GameConfig::default();
        // CFL: 1 joule × 3 per joule, floored at one plant's worth.
        assert_eq!(upkeep(Light::Cfl, Medium::Soil, 0, &config), Currency(3));
    }

    #[test]
    fn upkeep_scales_with_growing_plants() {
        let config = GameConfig::default();
        let one = upkeep(Light::Halogen, Medium::Hydroponics, 1, &config);
        let five = upkeep(Light::Halogen, Medium::Hydroponics, 5, &config);
        assert_eq!(one, Currency(32)); // 10×3 + 2×1
        assert_eq!(five, Currency(160));
    }

    #[test]
    fn pepper_price_has_a_flat_part_and_a_heat_part() {
        // Heatless peppers still fetch the potency floor of 1.
        assert_eq!(
            pepper_sale_total(Membership::Friends, Scovilles(0), 10),
            Currency(30) // (2 + 1×1) × 10
        );
        assert_eq!(
            pepper_sale_total(Membership::Club, Scovilles(16_000), 5),
            Currency(170) // (2 + 16×2) × 5
        );
    }

    #[test]
    fn better_memberships_pay_strictly_more_for_hot_peppers() {
        let heat = Scovilles(81_000);
        let friends = pepper_sale_total(Membership::Friends, heat, 1);
        let club = pepper_sale_total(Membership::Club, heat, 1);
        let exchange = pepper_sale_total(Membership::HeatExchange, heat, 1);
        assert!(friends < club && club < exchange);
    }

    #[test]
    fn distillate_sale_uses_the_multiplier() {
        assert_eq!(
            distillate_sale_total(Membership::Friends, Distillate::ChilliOil, 2),
            Currency(60_000) // 15,000 per unit × 2 units × multiplier 2
        );
        // The catalyst is never worth money.
        assert_eq!(
            distillate_sale_total(Membership::HeatExchange, Distillate::QuantumCapsicum, 3),
            Currency(0)
        );
    }
}
