// The game aggregate and every command applier.
//
// `GameState` is the single source of truth: balance, the virtual clock,
// equipment tiers, the pot grid, inventories, owned technologies, the
// discovered plant catalog, and the breeding session. It is a plain value —
// `Clone + Serialize + Deserialize` all the way down — so a snapshot is a
// clone and a save is a serialization. Exactly one consumer (the runtime's
// executor thread) ever calls `apply`; everything here is single-threaded
// by construction.
//
// ## Tick flow
//
// `Tick` advances the virtual clock by the configured quantum (doubled
// under the Temporal Distortion Field), runs one breeding generation if a
// session is active (burning Quantum Capsicum, auto-pausing when the jar
// runs dry), then settles any cost-tick boundaries the clock crossed:
// upkeep first — an unpayable bill ends the game without deducting — then
// the progression rule queues, then automation (auto-harvest, then
// auto-planters so freed pots can be resown the same day).
//
// ## Failure policy
//
// Recoverable failures are silent no-ops: planting with no free pot or no
// funds, harvesting a pot that is not ripe, composting one that is not
// dead, selling empty stock, distilling below the threshold, buying what
// is not affordable, not visible, or already owned. Observers see them
// only as an unchanged snapshot. The sole fatal path is the upkeep bill.
//
// See also: `command.rs` for the command set, `genetics.rs` for the
// breeding session, `technology.rs` for the rule queues, `economy.rs` for
// the money formulas.
//
// **Critical constraint: determinism.** All collections iterate in a
// deterministic order (`BTreeMap`, `Vec`); the only hash set is the
// flood-fill visited set, whose iteration order is never observed. All
// randomness flows from the rngs serialized inside the state.

use crate::command::{CommandOutcome, GameCommand};
use crate::config::GameConfig;
use crate::economy::{self, Distillate};
use crate::genetics::{GeneticComputationState, GeneticTrait};
use crate::growth::{Phase, PhaseDurations};
use crate::naming;
use crate::plants::{BELL_PEPPER_ID, Plant, PlantPot, PlantType};
use crate::technology::{CATALOG_RULES, LEVEL_RULES, Technology, TechnologyLevel};
use crate::types::{Currency, FractionalStockLevel, PlantTypeId, StockLevel};
use crate::upgrades::{Area, Light, Medium, Membership, Purchasable, Tool, Upgradable};
use capsica_prng::GameRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// The matured, clearable states a pot can be in. Adjacency harvesting
/// only spreads between pots in the SAME matured state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MaturedState {
    Ripe,
    Dead,
}

/// Top-level game state. This is the entire simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Balance tuning. Persisted with the state so a save keeps the rules
    /// it was played under.
    pub config: GameConfig,

    /// The aggregate's deterministic rng (starter scatter aside, currently
    /// only used to seed the breeding session's own rng).
    pub rng: GameRng,

    pub balance: Currency,

    /// Virtual clock, milliseconds since the game's epoch.
    pub date_millis: i64,

    /// Milliseconds accumulated toward the next cost tick.
    pub milli_counter: i64,

    pub area: Area,
    pub light: Light,
    pub medium: Medium,
    pub tool: Tool,
    pub membership: Membership,

    /// The growing grid. Invariant: `plant_pots.len() == area.total()`;
    /// area upgrades only ever append empty pots.
    pub plant_pots: Vec<PlantPot>,

    pub pepper_inventory: BTreeMap<PlantTypeId, StockLevel>,
    pub distillate_inventory: BTreeMap<Distillate, FractionalStockLevel>,

    /// Owned technologies and how many copies of each (only the
    /// AutoPlanter stacks).
    pub technologies: BTreeMap<Technology, u32>,
    pub auto_harvest_enabled: bool,

    /// The progression ratchet. Never decreases.
    pub technology_level: TechnologyLevel,
    /// Next unfired rule in `LEVEL_RULES`.
    pub level_rule_index: usize,
    /// Next unfired rule in `CATALOG_RULES`.
    pub catalog_rule_index: usize,

    /// Discovered catalog, in discovery order.
    pub plant_types: Vec<PlantType>,

    pub genetics: GeneticComputationState,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let mut rng = GameRng::new(seed);
        let genetics_rng = GameRng::new(rng.next_u64());

        let area = Area::WindowSill;
        let mut pepper_inventory = BTreeMap::new();
        pepper_inventory.insert(BELL_PEPPER_ID, StockLevel { peppers: 5 });
        pepper_inventory.insert(crate::plants::POBLANO_ID, StockLevel { peppers: 5 });

        Self {
            balance: Currency(config.starting_balance),
            config,
            rng,
            date_millis: 0,
            milli_counter: 0,
            area,
            light: Light::Ambient,
            medium: Medium::Soil,
            tool: Tool::Hands,
            membership: Membership::Friends,
            plant_pots: vec![PlantPot::default(); area.total()],
            pepper_inventory,
            distillate_inventory: BTreeMap::new(),
            technologies: BTreeMap::new(),
            auto_harvest_enabled: false,
            technology_level: TechnologyLevel::None,
            level_rule_index: 0,
            catalog_rule_index: 0,
            plant_types: vec![PlantType::bell_pepper(), PlantType::poblano()],
            genetics: GeneticComputationState::new(BELL_PEPPER_ID, BELL_PEPPER_ID, genetics_rng),
        }
    }

    /// An immutable copy for publication or persistence. Taken only from
    /// the consumer context, so it is always command-consistent.
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<GameState> {
        serde_json::from_str(json)
    }

    pub fn plant_type(&self, id: PlantTypeId) -> Option<&PlantType> {
        self.plant_types.iter().find(|t| t.id == id)
    }

    pub fn owns(&self, tech: Technology) -> bool {
        self.tech_count(tech) > 0
    }

    pub fn tech_count(&self, tech: Technology) -> u32 {
        self.technologies.get(&tech).copied().unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    /// Apply one command. Only `Tick` can end the game; only `Save` asks
    /// anything of the runtime.
    pub fn apply(&mut self, command: &GameCommand) -> CommandOutcome {
        match command {
            GameCommand::Tick => {
                if self.on_tick() {
                    return CommandOutcome::GameOver;
                }
            }
            GameCommand::Save => return CommandOutcome::SaveRequested,
            GameCommand::PlantSeed(id) => self.plant_seed(*id),
            GameCommand::HarvestOrCompost { pot } => self.harvest_or_compost(*pot),
            GameCommand::SellPeppers(id) => self.sell_peppers(*id),
            GameCommand::SellDistillate(d) => self.sell_distillate(*d),
            GameCommand::Distill(d) => self.distill(*d),
            GameCommand::UpgradeLight => self.upgrade_light(),
            GameCommand::UpgradeMedium => self.upgrade_medium(),
            GameCommand::UpgradeArea => self.upgrade_area(),
            GameCommand::UpgradeTool => self.upgrade_tool(),
            GameCommand::UpgradeMembership => self.upgrade_membership(),
            GameCommand::PurchaseTechnology(tech) => self.purchase_technology(*tech),
            GameCommand::SetLeftParent(id) => self.set_left_parent(*id),
            GameCommand::SetRightParent(id) => self.set_right_parent(*id),
            GameCommand::SetFitnessWeight { target, value } => {
                self.set_fitness_weight(*target, *value)
            }
            GameCommand::ToggleComputation => self.toggle_computation(),
            GameCommand::ResetComputation => self.reset_computation(),
            GameCommand::SetAutoPlant {
                plant_type,
                enabled,
            } => self.set_auto_plant(*plant_type, *enabled),
            GameCommand::ToggleAutoHarvest => self.toggle_auto_harvest(),
        }
        CommandOutcome::Applied
    }

    // -----------------------------------------------------------------------
    // Planting and harvesting
    // -----------------------------------------------------------------------

    /// Buy a seed and sow it into the first free pot. The planted instance
    /// stamps today's light strength and medium effectiveness — later
    /// equipment upgrades never reach plants already in the ground.
    pub fn plant_seed(&mut self, type_id: PlantTypeId) {
        let Some(free) = self.plant_pots.iter().position(|p| p.plant.is_none()) else {
            return;
        };
        let Some(plant_type) = self.plant_type(type_id) else {
            return;
        };
        let cost = plant_type.seed_cost;
        if !self.try_spend(cost) {
            return;
        }
        self.plant_pots[free].plant = Some(Plant {
            type_id,
            planted_at_millis: self.date_millis,
            light_strength: self.light.strength(),
            medium_effectiveness: self.medium.effectiveness(),
        });
    }

    /// Harvest a ripe pot or compost a dead one. Growing pots reject both.
    /// With the scythe owned, the whole orthogonally-connected cluster in
    /// the same matured state as the tapped pot clears in one action.
    pub fn harvest_or_compost(&mut self, pot: usize) {
        let Some(origin_state) = self.matured_state(pot) else {
            return;
        };
        let cluster = if self.tool == Tool::Scythe {
            self.cluster_from(pot, origin_state)
        } else {
            vec![pot]
        };
        // Cluster indices are captured before any pot mutates, so each pot
        // clears exactly once.
        for idx in cluster {
            match origin_state {
                MaturedState::Ripe => self.harvest_pot(idx),
                MaturedState::Dead => self.compost_pot(idx),
            }
        }
    }

    fn matured_state(&self, idx: usize) -> Option<MaturedState> {
        let pot = self.plant_pots.get(idx)?;
        let plant = pot.plant.as_ref()?;
        let plant_type = self.plant_type(plant.type_id)?;
        match plant.current_phase(plant_type, self.date_millis, &self.config) {
            Some(Phase::Ripening) => Some(MaturedState::Ripe),
            None => Some(MaturedState::Dead),
            Some(_) => None,
        }
    }

    /// Iterative flood fill over 4-orthogonal neighbors in the same matured
    /// state. Explicit stack and visited set — the grid can be 32×32 and
    /// recursion depth should not depend on cluster shape.
    fn cluster_from(&self, origin: usize, matured: MaturedState) -> Vec<usize> {
        let dim = self.area.dimension();
        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[usize; 16]> = SmallVec::new();
        let mut cluster = Vec::new();

        visited.insert(origin);
        stack.push(origin);
        while let Some(idx) = stack.pop() {
            if self.matured_state(idx) != Some(matured) {
                continue;
            }
            cluster.push(idx);

            let x = idx % dim;
            let y = idx / dim;
            let mut neighbors: SmallVec<[usize; 4]> = SmallVec::new();
            if x > 0 {
                neighbors.push(idx - 1);
            }
            if x + 1 < dim {
                neighbors.push(idx + 1);
            }
            if y > 0 {
                neighbors.push(idx - dim);
            }
            if idx + dim < self.plant_pots.len() {
                neighbors.push(idx + dim);
            }
            for neighbor in neighbors {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        cluster
    }

    fn harvest_pot(&mut self, idx: usize) {
        let Some(plant) = self.plant_pots[idx].plant.take() else {
            return;
        };
        let Some(plant_type) = self.plant_type(plant.type_id) else {
            return;
        };
        let gain = plant.harvest_yield(plant_type, &self.config);
        self.pepper_inventory
            .entry(plant.type_id)
            .or_default()
            .peppers += gain;
    }

    fn compost_pot(&mut self, idx: usize) {
        self.plant_pots[idx].plant = None;
    }

    // -----------------------------------------------------------------------
    // Selling and distilling
    // -----------------------------------------------------------------------

    /// Sell every held pepper of one type and zero that stock.
    pub fn sell_peppers(&mut self, type_id: PlantTypeId) {
        let Some(plant_type) = self.plant_type(type_id) else {
            return;
        };
        let heat = plant_type.scovilles();
        let Some(stock) = self.pepper_inventory.get_mut(&type_id) else {
            return;
        };
        let quantity = std::mem::take(&mut stock.peppers);
        self.balance.0 += economy::pepper_sale_total(self.membership, heat, quantity).0;
    }

    /// Sell every whole unit of one distillate, keeping the fractional
    /// remainder. The catalyst has no sale value and is never consumed here.
    pub fn sell_distillate(&mut self, distillate: Distillate) {
        if distillate.price_multiplier() == 0 {
            return;
        }
        let Some(stock) = self.distillate_inventory.get_mut(&distillate) else {
            return;
        };
        let units = stock.take_units();
        self.balance.0 += economy::distillate_sale_total(self.membership, distillate, units).0;
    }

    /// Convert the entire pepper inventory into the chosen distillate, at
    /// thousandth-of-a-unit precision. Requires the distillery and at least
    /// one full unit's worth of raw scovilles.
    pub fn distill(&mut self, distillate: Distillate) {
        if !self.owns(Technology::ScovilleDistillery) {
            return;
        }
        let total = self.total_inventory_scovilles();
        let required = distillate.required_scovilles().0;
        if total < required {
            return;
        }
        let thousandths = (total as i128 * 1000 / required as i128) as i64;
        self.distillate_inventory
            .entry(distillate)
            .or_default()
            .add_thousandths(thousandths);
        for stock in self.pepper_inventory.values_mut() {
            stock.peppers = 0;
        }
    }

    fn total_inventory_scovilles(&self) -> i64 {
        self.pepper_inventory
            .iter()
            .filter_map(|(id, stock)| {
                let plant_type = self.plant_type(*id)?;
                Some(plant_type.scovilles().0.saturating_mul(stock.peppers))
            })
            .fold(0i64, i64::saturating_add)
    }

    // -----------------------------------------------------------------------
    // Upgrades and technology
    // -----------------------------------------------------------------------

    fn try_spend(&mut self, cost: Option<Currency>) -> bool {
        let Some(cost) = cost else {
            return false;
        };
        if self.balance.can_afford(cost) {
            self.balance.0 -= cost.0;
            true
        } else {
            false
        }
    }

    pub fn upgrade_light(&mut self) {
        let Some(next) = self.light.next() else {
            return;
        };
        if self.try_spend(next.cost()) {
            self.light = next;
        }
    }

    pub fn upgrade_medium(&mut self) {
        let Some(next) = self.medium.next() else {
            return;
        };
        if self.try_spend(next.cost()) {
            self.medium = next;
        }
    }

    /// Upgrading the area appends new empty pots; existing pots (and their
    /// plants) are untouched.
    pub fn upgrade_area(&mut self) {
        let Some(next) = self.area.next() else {
            return;
        };
        if self.try_spend(next.cost()) {
            self.area = next;
            self.plant_pots.resize_with(next.total(), PlantPot::default);
        }
    }

    pub fn upgrade_tool(&mut self) {
        let Some(next) = self.tool.next() else {
            return;
        };
        if self.try_spend(next.cost()) {
            self.tool = next;
        }
    }

    pub fn upgrade_membership(&mut self) {
        let Some(next) = self.membership.next() else {
            return;
        };
        if self.try_spend(next.cost()) {
            self.membership = next;
        }
    }

    /// Buy a technology: it must be visible at the current level,
    /// affordable, and not already owned unless it stacks.
    pub fn purchase_technology(&mut self, tech: Technology) {
        if tech.visibility_level() > self.technology_level {
            return;
        }
        if !tech.repeatable() && self.owns(tech) {
            return;
        }
        if self.try_spend(tech.cost()) {
            *self.technologies.entry(tech).or_insert(0) += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Breeding commands
    // -----------------------------------------------------------------------

    pub fn set_left_parent(&mut self, id: PlantTypeId) {
        if !self.owns(Technology::ChimoleonGenetics) || self.plant_type(id).is_none() {
            return;
        }
        self.genetics.set_left_parent(id);
    }

    pub fn set_right_parent(&mut self, id: PlantTypeId) {
        if !self.owns(Technology::ChimoleonGenetics) || self.plant_type(id).is_none() {
            return;
        }
        self.genetics.set_right_parent(id);
    }

    pub fn set_fitness_weight(&mut self, target: GeneticTrait, value: f32) {
        if !self.owns(Technology::ChimoleonGenetics) {
            return;
        }
        self.genetics.set_weight(target, value);
    }

    /// Pause an active session, or start/resume an inactive one.
    pub fn toggle_computation(&mut self) {
        if !self.owns(Technology::ChimoleonGenetics) {
            return;
        }
        if self.genetics.is_active {
            self.genetics.pause();
            return;
        }
        let Some(left) = self.plant_type(self.genetics.left_parent) else {
            return;
        };
        let Some(right) = self.plant_type(self.genetics.right_parent) else {
            return;
        };
        let left_chromosome = left.chromosome;
        let right_chromosome = right.chromosome;
        let population_size = self.config.population_size;
        let margin = self.config.improvement_margin;
        self.genetics
            .activate(&left_chromosome, &right_chromosome, population_size, margin);
    }

    pub fn reset_computation(&mut self) {
        if !self.owns(Technology::ChimoleonGenetics) {
            return;
        }
        self.genetics.reset();
    }

    pub fn set_auto_plant(&mut self, id: PlantTypeId, enabled: bool) {
        if !self.owns(Technology::AutoPlanter) {
            return;
        }
        if let Some(plant_type) = self.plant_types.iter_mut().find(|t| t.id == id) {
            plant_type.auto_plant = enabled;
        }
    }

    pub fn toggle_auto_harvest(&mut self) {
        if self.owns(Technology::AutoHarvester) {
            self.auto_harvest_enabled = !self.auto_harvest_enabled;
        }
    }

    // -----------------------------------------------------------------------
    // The tick
    // -----------------------------------------------------------------------

    /// Advance one tick of virtual time. Returns `true` when the game is
    /// over — upkeep exceeded the balance on a cost tick. The failed bill
    /// is not deducted.
    pub fn on_tick(&mut self) -> bool {
        let mut quantum = self.config.tick_virtual_millis;
        if self.owns(Technology::TemporalDistortionField) {
            quantum *= 2;
        }
        self.date_millis += quantum;
        self.milli_counter += quantum;

        self.advance_genetics();

        while self.milli_counter >= self.config.cost_tick_millis {
            self.milli_counter -= self.config.cost_tick_millis;
            if self.run_cost_tick() {
                return true;
            }
        }
        false
    }

    fn run_cost_tick(&mut self) -> bool {
        let bill = economy::upkeep(self.light, self.medium, self.growing_count(), &self.config);
        if bill.0 > self.balance.0 {
            return true;
        }
        self.balance.0 -= bill.0;
        self.run_progression_rules();
        self.run_automation();
        false
    }

    /// Plants currently in a growing phase — neither ripe nor dead.
    fn growing_count(&self) -> usize {
        self.plant_pots
            .iter()
            .filter_map(|pot| pot.plant.as_ref())
            .filter(|plant| {
                self.plant_type(plant.type_id).is_some_and(|plant_type| {
                    plant
                        .current_phase(plant_type, self.date_millis, &self.config)
                        .is_some_and(|phase| !phase.is_ripe())
                })
            })
            .count()
    }

    /// Evaluate the front of both rule queues; every satisfied rule fires
    /// once and retires (the index moves past it, permanently).
    fn run_progression_rules(&mut self) {
        while let Some(rule) = LEVEL_RULES.get(self.level_rule_index) {
            if !rule.satisfied(self) {
                break;
            }
            self.technology_level = self.technology_level.max(rule.target);
            self.level_rule_index += 1;
        }
        while let Some(rule) = CATALOG_RULES.get(self.catalog_rule_index) {
            if !rule.satisfied(self) {
                break;
            }
            let unlocked = (rule.unlock)();
            if self.plant_type(unlocked.id).is_none() {
                self.plant_types.push(unlocked);
            }
            self.catalog_rule_index += 1;
        }
    }

    fn run_automation(&mut self) {
        // Harvest before planting so pots freed this cost tick can be
        // resown the same day.
        if self.auto_harvest_enabled && self.owns(Technology::AutoHarvester) {
            for idx in 0..self.plant_pots.len() {
                match self.matured_state(idx) {
                    Some(MaturedState::Ripe) => self.harvest_pot(idx),
                    Some(MaturedState::Dead) => self.compost_pot(idx),
                    None => {}
                }
            }
        }

        let planters = self.tech_count(Technology::AutoPlanter) as usize;
        if planters == 0 {
            return;
        }
        let enabled: Vec<PlantTypeId> = self
            .plant_types
            .iter()
            .filter(|t| t.auto_plant)
            .map(|t| t.id)
            .collect();
        if enabled.is_empty() {
            return;
        }
        for slot in 0..planters {
            let id = enabled[slot % enabled.len()];
            let occupied_before = self.occupied_count();
            self.plant_seed(id);
            if self.occupied_count() == occupied_before {
                // Out of pots or out of funds; further slots would fail too.
                break;
            }
        }
    }

    fn occupied_count(&self) -> usize {
        self.plant_pots.iter().filter(|p| p.plant.is_some()).count()
    }

    /// One breeding generation per tick while active. Each generation burns
    /// catalyst; an empty jar pauses the session instead of erroring.
    fn advance_genetics(&mut self) {
        if !self.genetics.is_active {
            return;
        }
        let burn = self.config.catalyst_burn_thousandths;
        let paid = self
            .distillate_inventory
            .entry(Distillate::QuantumCapsicum)
            .or_default()
            .try_take_thousandths(burn);
        if !paid {
            self.genetics.pause();
            return;
        }
        let population_size = self.config.population_size;
        let mutation_chance = self.config.mutation_chance;
        self.genetics
            .tick_generations(1, population_size, mutation_chance);
        if self.genetics.is_complete() {
            self.finalize_breeding();
        }
    }

    /// Turn the winning candidate into a catalog entry. A name collision
    /// discards the newcomer — the first discovered variant keeps the name.
    fn finalize_breeding(&mut self) {
        let left = self.genetics.left_parent;
        let right = self.genetics.right_parent;
        let Some(winner) = self.genetics.finalize() else {
            return;
        };
        let name = naming::name_cross(&winner.chromosome);
        if self.plant_types.iter().any(|t| t.display_name == name) {
            return;
        }
        let seed_cost =
            Currency(winner.chromosome.total_popcount() as i64 * self.config.seed_cost_per_bit);
        self.plant_types.push(PlantType {
            id: winner.id,
            display_name: name,
            chromosome: winner.chromosome,
            phases: PhaseDurations::default(),
            seed_cost: Some(seed_cost),
            lineage: Some((left, right)),
            auto_plant: false,
            starter: false,
        });
    }
}
