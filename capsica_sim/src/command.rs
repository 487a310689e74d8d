// Commands that mutate game state.
//
// All external mutation goes through `GameCommand` — the engine is a pure
// function `(state, command) -> state'`, and commands are the input. The
// runtime's executor feeds commands to the single consumer that owns the
// `GameState`; two of the variants (`Tick`, `Save`) are produced by the
// runtime's own timers and interleave with player commands in strict FIFO
// order.
//
// Commands carry no reply channel. Failures — insufficient funds, a full
// grid, a wrongly-staged pot — are silent no-ops, observable only through
// the next published snapshot being unchanged (see `state.rs` for the
// per-command rules).

use crate::economy::Distillate;
use crate::genetics::GeneticTrait;
use crate::technology::Technology;
use crate::types::PlantTypeId;
use serde::{Deserialize, Serialize};

/// One mutation of the game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameCommand {
    /// Advance the virtual clock by one tick. Produced by the tick timer.
    Tick,
    /// Capture a consistent snapshot for the persistence collaborator.
    /// Produced by the save timer.
    Save,
    /// Buy and sow one seed of the given catalog entry into the first free
    /// pot.
    PlantSeed(PlantTypeId),
    /// Harvest a ripe pot or compost a dead one. With the scythe owned, the
    /// whole orthogonally-connected same-state cluster clears in one tap.
    HarvestOrCompost { pot: usize },
    /// Sell every held pepper of one type.
    SellPeppers(PlantTypeId),
    /// Sell every whole unit of one distillate.
    SellDistillate(Distillate),
    /// Convert the entire pepper inventory into the given distillate.
    Distill(Distillate),
    UpgradeLight,
    UpgradeMedium,
    UpgradeArea,
    UpgradeTool,
    UpgradeMembership,
    PurchaseTechnology(Technology),
    /// Select the left breeding parent. Ignored mid-session.
    SetLeftParent(PlantTypeId),
    /// Select the right breeding parent. Ignored mid-session.
    SetRightParent(PlantTypeId),
    /// Adjust one fitness weight. Ignored once a session has started.
    SetFitnessWeight { target: GeneticTrait, value: f32 },
    /// Start, resume, or pause the breeding computation.
    ToggleComputation,
    /// Abandon the current breeding session, keeping parent selections.
    ResetComputation,
    /// Allow or forbid the auto-planter to sow this catalog entry.
    SetAutoPlant { plant_type: PlantTypeId, enabled: bool },
    ToggleAutoHarvest,
}

/// What applying a command asks of the surrounding runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State updated (possibly a silent no-op); keep going.
    Applied,
    /// A `Save` command: hand the current snapshot to persistence.
    SaveRequested,
    /// A terminal `Tick`: upkeep exceeded the balance. Stop everything.
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization_roundtrip() {
        let commands = vec![
            GameCommand::Tick,
            GameCommand::PlantSeed(PlantTypeId(42)),
            GameCommand::HarvestOrCompost { pot: 7 },
            GameCommand::Distill(Distillate::QuantumCapsicum),
            GameCommand::SetFitnessWeight {
                target: GeneticTrait::Potency,
                value: 0.6,
            },
            GameCommand::SetAutoPlant {
                plant_type: PlantTypeId(3),
                enabled: true,
            },
        ];
        let json = serde_json::to_string(&commands).unwrap();
        let restored: Vec<GameCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(commands, restored);
    }
}
