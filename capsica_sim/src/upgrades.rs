// Equipment tiers and the capability traits they share.
//
// Each upgrade track is an ordered enum: growing area, light rig, growth
// medium, harvesting tool, and buyer membership. Tiers ratchet — a purchase
// only ever moves to the immediate next tier, and nothing ever moves back.
// Effectiveness strictly increases along every track.
//
// The shared surfaces are three small capability traits instead of enum-
// specific duplication: `Describe` (display name), `Purchasable` (price
// tag), `Upgradable` (next tier lookup). `state.rs` funnels every tier
// purchase through the same cost-gated path.

use crate::types::Currency;
use serde::{Deserialize, Serialize};

/// Anything with a player-facing name.
pub trait Describe {
    fn display_name(&self) -> &'static str;
}

/// Anything with a price tag. `None` means it cannot be bought (the free
/// starting tier, or an entry acquired some other way).
pub trait Purchasable {
    fn cost(&self) -> Option<Currency>;
}

/// An ordered upgrade track. `next` is the only legal transition.
pub trait Upgradable: Sized + Copy + Eq {
    fn next(self) -> Option<Self>;
}

// ---------------------------------------------------------------------------
// Growing area
// ---------------------------------------------------------------------------

/// Square growing areas. The pot grid is `dimension × dimension`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    WindowSill,
    Bedroom,
    SpareRoom,
    Apartment,
    Warehouse,
    BusinessPark,
}

impl Area {
    pub fn dimension(self) -> usize {
        match self {
            Area::WindowSill => 1,
            Area::Bedroom => 2,
            Area::SpareRoom => 4,
            Area::Apartment => 8,
            Area::Warehouse => 16,
            Area::BusinessPark => 32,
        }
    }

    /// Total pot count for this area.
    pub fn total(self) -> usize {
        self.dimension() * self.dimension()
    }
}

impl Describe for Area {
    fn display_name(&self) -> &'static str {
        match self {
            Area::WindowSill => "Window Sill",
            Area::Bedroom => "Bedroom",
            Area::SpareRoom => "Spare Room",
            Area::Apartment => "Apartment",
            Area::Warehouse => "Warehouse",
            Area::BusinessPark => "Business Park",
        }
    }
}

impl Purchasable for Area {
    fn cost(&self) -> Option<Currency> {
        match self {
            Area::WindowSill => None,
            Area::Bedroom => Some(Currency(5_000)),
            Area::SpareRoom => Some(Currency(50_000)),
            Area::Apartment => Some(Currency(1_000_000)),
            Area::Warehouse => Some(Currency(90_000_000)),
            Area::BusinessPark => Some(Currency(1_000_000_000)),
        }
    }
}

impl Upgradable for Area {
    fn next(self) -> Option<Self> {
        match self {
            Area::WindowSill => Some(Area::Bedroom),
            Area::Bedroom => Some(Area::SpareRoom),
            Area::SpareRoom => Some(Area::Apartment),
            Area::Apartment => Some(Area::Warehouse),
            Area::Warehouse => Some(Area::BusinessPark),
            Area::BusinessPark => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Light rig
// ---------------------------------------------------------------------------

/// Light sources. Strength multiplies harvest yield (stamped at planting);
/// joules are the per-cost-tick electricity draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Light {
    Ambient,
    Cfl,
    Halogen,
    Led,
}

impl Light {
    pub fn strength(self) -> i64 {
        match self {
            Light::Ambient => 1,
            Light::Cfl => 2,
            Light::Halogen => 5,
            Light::Led => 7,
        }
    }

    pub fn joules_per_cost_tick(self) -> i64 {
        match self {
            Light::Ambient => 0,
            Light::Cfl => 1,
            Light::Halogen => 10,
            Light::Led => 1,
        }
    }
}

impl Describe for Light {
    fn display_name(&self) -> &'static str {
        match self {
            Light::Ambient => "Ambient Light",
            Light::Cfl => "CFL",
            Light::Halogen => "Halogen",
            Light::Led => "LED",
        }
    }
}

impl Purchasable for Light {
    fn cost(&self) -> Option<Currency> {
        match self {
            Light::Ambient => None,
            Light::Cfl => Some(Currency(5_000)),
            Light::Halogen => Some(Currency(350_000)),
            Light::Led => Some(Currency(4_200_000)),
        }
    }
}

impl Upgradable for Light {
    fn next(self) -> Option<Self> {
        match self {
            Light::Ambient => Some(Light::Cfl),
            Light::Cfl => Some(Light::Halogen),
            Light::Halogen => Some(Light::Led),
            Light::Led => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Growth medium
// ---------------------------------------------------------------------------

/// Growth media. Effectiveness multiplies harvest yield (stamped at
/// planting); litres are the per-cost-tick water draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Medium {
    Soil,
    SoilPerlite,
    Hydroponics,
}

impl Medium {
    pub fn effectiveness(self) -> i64 {
        match self {
            Medium::Soil => 2,
            Medium::SoilPerlite => 3,
            Medium::Hydroponics => 5,
        }
    }

    pub fn litres_per_cost_tick(self) -> i64 {
        match self {
            // Plain soil is hand-watered; only the piped tiers draw.
            Medium::Soil => 0,
            Medium::SoilPerlite => 1,
            Medium::Hydroponics => 2,
        }
    }
}

impl Describe for Medium {
    fn display_name(&self) -> &'static str {
        match self {
            Medium::Soil => "Soil",
            Medium::SoilPerlite => "Soil & Perlite",
            Medium::Hydroponics => "Hydroponics",
        }
    }
}

impl Purchasable for Medium {
    fn cost(&self) -> Option<Currency> {
        match self {
            Medium::Soil => None,
            Medium::SoilPerlite => Some(Currency(500)),
            Medium::Hydroponics => Some(Currency(50_000)),
        }
    }
}

impl Upgradable for Medium {
    fn next(self) -> Option<Self> {
        match self {
            Medium::Soil => Some(Medium::SoilPerlite),
            Medium::SoilPerlite => Some(Medium::Hydroponics),
            Medium::Hydroponics => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Harvesting tool
// ---------------------------------------------------------------------------

/// Harvesting tools. The scythe unlocks adjacency harvesting: one tap
/// clears the whole orthogonally-connected cluster in the same matured
/// state (see `state.rs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tool {
    Hands,
    Scythe,
}

impl Describe for Tool {
    fn display_name(&self) -> &'static str {
        match self {
            Tool::Hands => "Bare Hands",
            Tool::Scythe => "Scythe",
        }
    }
}

impl Purchasable for Tool {
    fn cost(&self) -> Option<Currency> {
        match self {
            Tool::Hands => None,
            Tool::Scythe => Some(Currency(1_000_000)),
        }
    }
}

impl Upgradable for Tool {
    fn next(self) -> Option<Self> {
        match self {
            Tool::Hands => Some(Tool::Scythe),
            Tool::Scythe => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Buyer membership
// ---------------------------------------------------------------------------

/// Buyer tiers. Better memberships pay more per unit of potency — see
/// `economy.rs` for the sale formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Membership {
    Friends,
    Club,
    HeatExchange,
}

impl Membership {
    pub fn price_per_scoville(self) -> i64 {
        match self {
            Membership::Friends => 1,
            Membership::Club => 2,
            Membership::HeatExchange => 4,
        }
    }
}

impl Describe for Membership {
    fn display_name(&self) -> &'static str {
        match self {
            Membership::Friends => "Friends",
            Membership::Club => "Local Chilli Club",
            Membership::HeatExchange => "Heat Exchange",
        }
    }
}

impl Purchasable for Membership {
    fn cost(&self) -> Option<Currency> {
        match self {
            Membership::Friends => None,
            Membership::Club => Some(Currency(150_000)),
            Membership::HeatExchange => Some(Currency(500_000_000)),
        }
    }
}

impl Upgradable for Membership {
    fn next(self) -> Option<Self> {
        match self {
            Membership::Friends => Some(Membership::Club),
            Membership::Club => Some(Membership::HeatExchange),
            Membership::HeatExchange => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<T: Upgradable>(mut tier: T) -> Vec<T> {
        let mut tiers = vec![tier];
        while let Some(next) = tier.next() {
            tiers.push(next);
            tier = next;
        }
        tiers
    }

    #[test]
    fn area_totals_are_squares() {
        assert_eq!(Area::WindowSill.total(), 1);
        assert_eq!(Area::SpareRoom.total(), 16);
        assert_eq!(Area::BusinessPark.total(), 1024);
    }

    #[test]
    fn tracks_terminate_and_never_cycle() {
        assert_eq!(walk(Area::WindowSill).len(), 6);
        assert_eq!(walk(Light::Ambient).len(), 4);
        assert_eq!(walk(Medium::Soil).len(), 3);
        assert_eq!(walk(Tool::Hands).len(), 2);
        assert_eq!(walk(Membership::Friends).len(), 3);
    }

    #[test]
    fn effectiveness_strictly_increases_along_each_track() {
        let lights = walk(Light::Ambient);
        assert!(lights.windows(2).all(|w| w[0].strength() < w[1].strength()));

        let media = walk(Medium::Soil);
        assert!(
            media
                .windows(2)
                .all(|w| w[0].effectiveness() < w[1].effectiveness())
        );

        let areas = walk(Area::WindowSill);
        assert!(areas.windows(2).all(|w| w[0].total() < w[1].total()));

        let memberships = walk(Membership::Friends);
        assert!(
            memberships
                .windows(2)
                .all(|w| w[0].price_per_scoville() < w[1].price_per_scoville())
        );
    }

    #[test]
    fn only_starting_tiers_are_free() {
        assert!(Area::WindowSill.cost().is_none());
        assert!(Light::Ambient.cost().is_none());
        assert!(Medium::Soil.cost().is_none());
        assert!(Tool::Hands.cost().is_none());
        assert!(Membership::Friends.cost().is_none());
        assert!(Area::Bedroom.cost().is_some());
        assert!(Light::Cfl.cost().is_some());
    }
}
