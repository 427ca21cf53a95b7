//! Domain entities - the ledgers that make up a spellcaster

mod bonuses;
mod extra_uses;
mod slot_ledger;
mod spell;
mod spell_roster;
mod tasks;

pub use bonuses::{
    total_bonus_cantrips, total_bonus_prepared, BonusPreparedSpell, BonusPreparedStatus,
    SpellBonuses,
};
pub use extra_uses::{ExtraSpellUse, ExtraUseLedger};
pub use slot_ledger::{BonusSlot, SlotEntry, SlotLedger};
pub use spell::{PreparationState, Spell};
pub use spell_roster::{
    count_toward_limit, max_cantrips, max_prepared, LevelFilter, PreparationLimits, SpellRoster,
};
pub use tasks::{daily_tasks, DailyTask, TaskChecklist};
