//! Energy: costs, regeneration, momentum and decay.

mod ledger;

pub use ledger::{
    action_cost, field_regen, max_energy, EnergyLedger, RegenReport, ATTACK_COST, DEFEND_COST,
    SPELL_COST, TOOL_COST,
};
