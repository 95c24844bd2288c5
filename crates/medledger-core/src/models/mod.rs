//! Domain models for the medicine ledger.

mod medicine;
mod stats;

pub use medicine::*;
pub use stats::*;
