//! Cast resolution: decides what a cast spends.

use crate::entities::{ExtraUseLedger, SlotLedger, Spell};
use crate::events::CastOutcome;

/// Spend the cheapest resource that can cast `spell`.
///
/// Order: an extra use of the spell, nothing for a cantrip, a slot at the
/// spell's level, then the lowest higher-level slot. `NoSlotsAvailable`
/// leaves both ledgers untouched.
pub fn resolve_cast(
    spell: &Spell,
    slots: &mut SlotLedger,
    extra_uses: &mut ExtraUseLedger,
) -> CastOutcome {
    if let Ok(remaining) = extra_uses.consume(spell.name().as_str()) {
        return CastOutcome::UsedExtraUse { remaining };
    }

    let level = spell.level().as_number();
    if spell.is_cantrip() {
        return CastOutcome::UsedCantrip;
    }

    if slots.use_slot(level).is_ok() {
        return CastOutcome::UsedSlotAtLevel(level);
    }

    match slots.lowest_available_above(level) {
        Some(upcast) if slots.use_slot(upcast).is_ok() => CastOutcome::UsedUpcastSlot(upcast),
        _ => CastOutcome::NoSlotsAvailable,
    }
}
