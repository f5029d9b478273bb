mod ledger;
mod slot;

pub use ledger::WorkDay;
pub use slot::{TimeSlot, TimeSlotKind, WorkSummary};
