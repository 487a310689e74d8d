// The technology catalog and the progression ratchet.
//
// `TechnologyLevel` only ever moves forward. It gates which catalog entries
// the player can see (and therefore buy); the actual purchases are
// player-driven and cost-gated in `state.rs`.
//
// Progression itself is data: two ordered rule lists — one raising the
// level, one unlocking new plant-catalog entries — each rule a guarded
// one-shot transition. The aggregate stores an index into each list; at
// every cost tick the front rule is evaluated and, once satisfied, fires
// and retires permanently. Rules never re-fire and never run out of order,
// which is what makes the whole thing a ratchet.

use crate::config::MILLIS_PER_DAY;
use crate::plants::PlantType;
use crate::state::GameState;
use crate::types::Currency;
use crate::upgrades::{Describe, Purchasable};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Levels and the technology catalog
// ---------------------------------------------------------------------------

/// Overall progression tier. Ordering is progression order; the level on
/// the aggregate never decreases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TechnologyLevel {
    None,
    Amateur,
    Basic,
    Intermediate,
    Advanced,
    Quantum,
}

impl TechnologyLevel {
    /// The technologies visible (purchasable) at this level.
    pub fn visible_technologies(self) -> Vec<Technology> {
        Technology::ALL
            .into_iter()
            .filter(|t| t.visibility_level() <= self)
            .collect()
    }
}

/// A purchasable technology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    ChilliDex,
    AutoPlanter,
    AutoHarvester,
    ScovilleDistillery,
    ChimoleonGenetics,
    TemporalDistortionField,
}

impl Technology {
    pub const ALL: [Technology; 6] = [
        Technology::ChilliDex,
        Technology::AutoPlanter,
        Technology::AutoHarvester,
        Technology::ScovilleDistillery,
        Technology::ChimoleonGenetics,
        Technology::TemporalDistortionField,
    ];

    /// The level at which this technology appears in the shop.
    pub fn visibility_level(self) -> TechnologyLevel {
        match self {
            Technology::ChilliDex => TechnologyLevel::Amateur,
            Technology::AutoPlanter => TechnologyLevel::Basic,
            Technology::AutoHarvester => TechnologyLevel::Basic,
            Technology::ScovilleDistillery => TechnologyLevel::Intermediate,
            Technology::ChimoleonGenetics => TechnologyLevel::Advanced,
            Technology::TemporalDistortionField => TechnologyLevel::Quantum,
        }
    }

    /// Repeatable technologies stack: each AutoPlanter bought sows one more
    /// seed per cost tick.
    pub fn repeatable(self) -> bool {
        matches!(self, Technology::AutoPlanter)
    }
}

impl Describe for Technology {
    fn display_name(&self) -> &'static str {
        match self {
            Technology::ChilliDex => "ChilliDex",
            Technology::AutoPlanter => "AutoPlanter",
            Technology::AutoHarvester => "AutoHarvester",
            Technology::ScovilleDistillery => "Scoville Distillery",
            Technology::ChimoleonGenetics => "Chimoleon Genetics",
            Technology::TemporalDistortionField => "Temporal Distortion Field",
        }
    }
}

impl Purchasable for Technology {
    fn cost(&self) -> Option<Currency> {
        match self {
            Technology::ChilliDex => Some(Currency(250_000)),
            Technology::AutoPlanter => Some(Currency(5_000_000)),
            Technology::AutoHarvester => Some(Currency(10_000_000)),
            Technology::ScovilleDistillery => Some(Currency(50_000_000)),
            Technology::ChimoleonGenetics => Some(Currency(2_000_000_000)),
            Technology::TemporalDistortionField => Some(Currency(999_999_999_999)),
        }
    }
}

// ---------------------------------------------------------------------------
// Progression rules
// ---------------------------------------------------------------------------

/// A guarded one-shot transition raising the technology level.
pub struct LevelRule {
    pub target: TechnologyLevel,
    /// Virtual days since epoch that must have passed, if any.
    pub min_elapsed_days: Option<i64>,
    pub condition: fn(&GameState) -> bool,
}

/// A guarded one-shot transition adding a starter entry to the plant
/// catalog.
pub struct CatalogRule {
    pub min_elapsed_days: Option<i64>,
    pub condition: fn(&GameState) -> bool,
    pub unlock: fn() -> PlantType,
}

fn elapsed_at_least(state: &GameState, days: Option<i64>) -> bool {
    days.is_none_or(|d| state.date_millis >= d * MILLIS_PER_DAY)
}

impl LevelRule {
    pub fn satisfied(&self, state: &GameState) -> bool {
        elapsed_at_least(state, self.min_elapsed_days) && (self.condition)(state)
    }
}

impl CatalogRule {
    pub fn satisfied(&self, state: &GameState) -> bool {
        elapsed_at_least(state, self.min_elapsed_days) && (self.condition)(state)
    }
}

fn always(_: &GameState) -> bool {
    true
}

fn balance_at_least_20k(state: &GameState) -> bool {
    state.balance.0 >= 20_000
}

fn balance_at_least_2m(state: &GameState) -> bool {
    state.balance.0 >= 2_000_000
}

fn balance_at_least_200m(state: &GameState) -> bool {
    state.balance.0 >= 200_000_000
}

fn balance_at_least_20b(state: &GameState) -> bool {
    state.balance.0 >= 20_000_000_000
}

fn balance_at_least_10k(state: &GameState) -> bool {
    state.balance.0 >= 10_000
}

fn reached_basic(state: &GameState) -> bool {
    state.technology_level >= TechnologyLevel::Basic
}

/// Level rules in firing order. Targets are strictly increasing, so
/// replaying the retired prefix always reproduces the same level.
pub static LEVEL_RULES: [LevelRule; 5] = [
    LevelRule {
        target: TechnologyLevel::Amateur,
        min_elapsed_days: Some(2),
        condition: always,
    },
    LevelRule {
        target: TechnologyLevel::Basic,
        min_elapsed_days: None,
        condition: balance_at_least_20k,
    },
    LevelRule {
        target: TechnologyLevel::Intermediate,
        min_elapsed_days: Some(30),
        condition: balance_at_least_2m,
    },
    LevelRule {
        target: TechnologyLevel::Advanced,
        min_elapsed_days: None,
        condition: balance_at_least_200m,
    },
    LevelRule {
        target: TechnologyLevel::Quantum,
        min_elapsed_days: Some(365),
        condition: balance_at_least_20b,
    },
];

/// Plant-catalog unlock rules in firing order.
pub static CATALOG_RULES: [CatalogRule; 3] = [
    CatalogRule {
        min_elapsed_days: Some(10),
        condition: always,
        unlock: PlantType::guajillo,
    },
    CatalogRule {
        min_elapsed_days: None,
        condition: balance_at_least_10k,
        unlock: PlantType::jalapeno,
    },
    CatalogRule {
        min_elapsed_days: None,
        condition: reached_basic,
        unlock: PlantType::birds_eye,
    },
];
